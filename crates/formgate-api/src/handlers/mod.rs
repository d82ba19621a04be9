pub mod health;
pub mod image_download;
pub mod survey_download;
pub mod upload;

use crate::error::HttpAppError;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use formgate_core::{AppError, FormId, ObjectKey, VersionedFormId};
use formgate_storage::{DownloadResult, StorageClient};
use futures::StreamExt;

/// Suffix of survey archive names in the URL and in storage
const ARCHIVE_SUFFIX: &str = ".zip";

/// Parse a `^\d+$` path segment. Anything else is reported as not found.
pub(crate) fn parse_form_id(raw: &str) -> Result<FormId, HttpAppError> {
    raw.parse::<FormId>()
        .map_err(|e| AppError::InvalidFormId(e.to_string()).into())
}

/// Parse `{id}[v{major}.{minor}].zip`. Anything else is reported as not found.
pub(crate) fn parse_survey_archive(raw: &str) -> Result<VersionedFormId, HttpAppError> {
    let stem = raw
        .strip_suffix(ARCHIVE_SUFFIX)
        .ok_or_else(|| AppError::InvalidFormId(raw.to_string()))?;
    let versioned = stem
        .parse::<VersionedFormId>()
        .map_err(|e| AppError::InvalidFormId(e.to_string()))?;
    Ok(versioned)
}

/// Stream `key` back to the client with the content type stored alongside it.
///
/// Every failure is reported as 404; backend failures are additionally logged at error level.
pub(crate) async fn stream_object(
    storage: &dyn StorageClient,
    key: &ObjectKey,
) -> Result<Response, HttpAppError> {
    let object = match storage.download(key).await {
        DownloadResult::Found(object) => object,
        DownloadResult::NotFound => {
            return Err(AppError::ObjectNotFound(key.to_string()).into());
        }
        DownloadResult::BackendError(e) => {
            tracing::error!(
                error = %e,
                bucket = %storage.bucket(),
                key = %key,
                "Storage backend failed during download, responding 404"
            );
            return Err(AppError::ObjectNotFound(key.to_string()).into());
        }
    };

    tracing::debug!(
        key = %key,
        content_type = %object.content_type,
        content_length = ?object.content_length,
        "Streaming object"
    );

    let body_stream = object.body.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let mut builder = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, object.content_type);
    if let Some(length) = object.content_length {
        builder = builder.header(header::CONTENT_LENGTH, length);
    }

    let response = builder.body(Body::from_stream(body_stream)).map_err(|e| {
        tracing::error!(error = %e, key = %key, "Failed to build response");
        AppError::Internal(e.to_string())
    })?;

    Ok(response)
}

/// Fallback for requests matching no route
pub async fn not_found() -> HttpAppError {
    HttpAppError(AppError::ObjectNotFound("no matching route".to_string()))
}
