//! Form identity validation seam

mod datastore;

pub use datastore::{
    DatastoreValidator, DatastoreValidatorFactory, ServiceAccountKey, DATASTORE_SCOPE,
    SURVEY_KIND,
};

use async_trait::async_trait;
use formgate_core::FormId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidatorError {
    /// The tenant's identity credential could not be read or used
    #[error("Invalid identity credential: {0}")]
    Credential(String),

    /// The identity service could not be reached or answered with an error
    #[error("Identity service error: {0}")]
    Backend(String),
}

/// Answers whether a form id is known to a tenant's identity service.
#[async_trait]
pub trait FormValidator: Send + Sync {
    /// `Ok(false)` means the service answered and the id is unknown.
    async fn validate(&self, form_id: FormId) -> Result<bool, ValidatorError>;
}

/// Builds a [`FormValidator`] from a tenant's identity credential.
#[async_trait]
pub trait ValidatorFactory: Send + Sync {
    async fn build(&self, credential: &str) -> Result<Box<dyn FormValidator>, ValidatorError>;
}
