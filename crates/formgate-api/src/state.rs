//! Application state
//!
//! The gateway keeps no per-tenant state between requests. `AppState` only carries the
//! collaborators that turn a tenant name into per-request clients.

use formgate_core::{Config, ConfigResolver};
use formgate_services::ValidatorFactory;
use formgate_storage::StorageClientFactory;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Tenant name to configuration record
    pub resolver: Arc<dyn ConfigResolver>,
    /// Builds a form validator from a tenant's identity credential
    pub validators: Arc<dyn ValidatorFactory>,
    /// Builds a bucket-scoped storage client from a tenant's storage credentials
    pub storage: Arc<dyn StorageClientFactory>,
}

impl AppState {
    pub fn new(
        config: Config,
        resolver: Arc<dyn ConfigResolver>,
        validators: Arc<dyn ValidatorFactory>,
        storage: Arc<dyn StorageClientFactory>,
    ) -> Self {
        Self {
            config,
            resolver,
            validators,
            storage,
        }
    }
}
