//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`. Every error renders as a [`ResultEnvelope`]:
//! 404s as `{"status":"fail","message":"Not Found"}`, 400s as a `fail` envelope carrying
//! the reason, and 5xx as an `error` envelope with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use formgate_core::{AppError, ConfigError, ErrorMetadata, LogLevel, ResultEnvelope};
use formgate_services::ValidatorError;
use formgate_storage::StorageError;

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from formgate-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<ConfigError> for HttpAppError {
    fn from(err: ConfigError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<ValidatorError> for HttpAppError {
    fn from(err: ValidatorError) -> Self {
        let app = match err {
            ValidatorError::Credential(msg) => AppError::Configuration(msg),
            ValidatorError::Backend(msg) => AppError::ValidationBackend(msg),
        };
        HttpAppError(app)
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::UploadFailed(msg) => AppError::UploadFailed(msg),
            StorageError::DownloadFailed(msg) => AppError::ObjectNotFound(msg),
            StorageError::ConfigError(msg) => AppError::Configuration(msg),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
        };
        HttpAppError(app)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, error_code, "Request rejected");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, error_code, "Request rejected");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, error_code, "Request failed");
        }
    }
}

/// Envelope rendered for an error: `error` for server faults, `fail` otherwise.
pub fn envelope_for(error: &AppError) -> ResultEnvelope {
    if error.http_status_code() >= 500 {
        ResultEnvelope::error(error.client_message())
    } else {
        ResultEnvelope::fail(error.client_message())
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        (status, Json(envelope_for(app_error))).into_response()
    }
}
