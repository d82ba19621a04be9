//! Tenant resolution and per-request client construction
//!
//! A [`TenantScope`] exists only for a resolved tenant. Validators and storage
//! clients are built from its config on demand and never outlive the request.

use crate::error::HttpAppError;
use crate::state::AppState;
use formgate_core::{AppError, FormId, TenantConfig};
use formgate_storage::StorageClient;

pub struct TenantScope<'a> {
    state: &'a AppState,
    instance: &'a str,
    config: TenantConfig,
}

impl<'a> TenantScope<'a> {
    /// Resolve `instance`, failing with `TenantNotFound` for unknown or empty records.
    pub async fn resolve(state: &'a AppState, instance: &'a str) -> Result<Self, HttpAppError> {
        let config = state
            .resolver
            .resolve(instance)
            .await?
            .ok_or_else(|| AppError::TenantNotFound(instance.to_string()))?;

        tracing::debug!(instance = %instance, bucket = %config.bucket_name, "Resolved tenant");

        Ok(Self {
            state,
            instance,
            config,
        })
    }

    pub fn instance(&self) -> &str {
        self.instance
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket_name
    }

    /// Fail with `InvalidFormId` unless the tenant's identity service knows `form_id`.
    ///
    /// The zero id is rejected without building a validator.
    pub async fn ensure_form_exists(&self, form_id: FormId) -> Result<(), HttpAppError> {
        if form_id.is_zero() {
            return Err(AppError::InvalidFormId(form_id.to_string()).into());
        }

        let validator = self
            .state
            .validators
            .build(&self.config.identity_credential)
            .await?;

        if !validator.validate(form_id).await? {
            return Err(AppError::InvalidFormId(form_id.to_string()).into());
        }
        Ok(())
    }

    pub fn storage(&self) -> Result<Box<dyn StorageClient>, HttpAppError> {
        let client = self.state.storage.build(
            &self.config.bucket_name,
            &self.config.storage_access_id,
            &self.config.storage_secret,
        )?;
        Ok(client)
    }
}
