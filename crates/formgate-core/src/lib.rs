//! Formgate Core Library
//!
//! Domain models, error types, configuration and the tenant configuration seam
//! shared by every formgate crate.

pub mod config;
pub mod error;
pub mod models;
pub mod tenant_config;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    CannedAcl, Folder, FormId, FormIdError, MessageStatus, ObjectKey, ResultEnvelope,
    TenantConfig, UploadMetadata, VersionedFormId,
};
pub use tenant_config::{ConfigError, ConfigResolver, FileConfigResolver};
