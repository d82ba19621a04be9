//! Error types module
//!
//! Every failure a request can end in is an `AppError`. Handlers translate the
//! categories they understand (unknown tenant, invalid form id, missing object)
//! into 404s; configuration, validation-backend and upload failures surface as 5xx.

use crate::tenant_config::ConfigError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Expected outcomes such as unknown tenants or ids
    Debug,
    /// Recoverable or client-side issues
    Warn,
    /// Unexpected failures
    Error,
}

/// Metadata for error responses: how an error should be presented over HTTP.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "TENANT_NOT_FOUND")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (never carries internal detail)
    fn client_message(&self) -> String;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unknown instance: {0}")]
    TenantNotFound(String),

    #[error("Invalid form id: {0}")]
    InvalidFormId(String),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Form validation backend failed: {0}")]
    ValidationBackend(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

impl AppError {
    /// Variant name, used as a structured logging field
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::TenantNotFound(_) => "TenantNotFound",
            AppError::InvalidFormId(_) => "InvalidFormId",
            AppError::ObjectNotFound(_) => "ObjectNotFound",
            AppError::BadRequest(_) => "BadRequest",
            AppError::UploadFailed(_) => "UploadFailed",
            AppError::ValidationBackend(_) => "ValidationBackend",
            AppError::Configuration(_) => "Configuration",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::TenantNotFound(_)
            | AppError::InvalidFormId(_)
            | AppError::ObjectNotFound(_) => 404,
            AppError::BadRequest(_) => 400,
            AppError::UploadFailed(_)
            | AppError::ValidationBackend(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::TenantNotFound(_) => "TENANT_NOT_FOUND",
            AppError::InvalidFormId(_) => "INVALID_FORM_ID",
            AppError::ObjectNotFound(_) => "OBJECT_NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::UploadFailed(_) => "UPLOAD_FAILED",
            AppError::ValidationBackend(_) => "VALIDATION_BACKEND_ERROR",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn client_message(&self) -> String {
        match self {
            AppError::TenantNotFound(_)
            | AppError::InvalidFormId(_)
            | AppError::ObjectNotFound(_) => "Not Found".to_string(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::UploadFailed(_) => "Upload failed".to_string(),
            AppError::ValidationBackend(_) => "Form validation unavailable".to_string(),
            AppError::Configuration(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::TenantNotFound(_)
            | AppError::InvalidFormId(_)
            | AppError::ObjectNotFound(_) => LogLevel::Debug,
            AppError::BadRequest(_) => LogLevel::Warn,
            AppError::UploadFailed(_)
            | AppError::ValidationBackend(_)
            | AppError::Configuration(_)
            | AppError::Internal(_) => LogLevel::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_family_maps_to_404() {
        for err in [
            AppError::TenantNotFound("acme".to_string()),
            AppError::InvalidFormId("0".to_string()),
            AppError::ObjectNotFound("images/x.jpg".to_string()),
        ] {
            assert_eq!(err.http_status_code(), 404);
            assert_eq!(err.client_message(), "Not Found");
            assert_eq!(err.log_level(), LogLevel::Debug);
        }
    }

    #[test]
    fn test_validation_backend_is_not_a_404() {
        let err = AppError::ValidationBackend("token endpoint returned 503".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert!(!err.client_message().contains("503"));
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let err = AppError::Configuration("record for acme is missing s3Bucket".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Internal server error");
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }

    #[test]
    fn test_upload_failure_is_an_error() {
        let err = AppError::UploadFailed("connection reset".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.client_message(), "Upload failed");
        assert_eq!(err.log_level(), LogLevel::Error);
    }
}
