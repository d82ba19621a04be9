use crate::error::HttpAppError;
use crate::handlers::stream_object;
use crate::services::TenantScope;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
};
use formgate_core::{AppError, Folder, ObjectKey, ResultEnvelope};
use std::sync::Arc;

/// Stream an image. Images are public, so no form validation happens here.
#[utoipa::path(
    get,
    path = "/{instance}/images/{filename}",
    tag = "downloads",
    params(
        ("instance" = String, Path, description = "Tenant name"),
        ("filename" = String, Path, description = "Object name under `images/`")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown tenant or image", body = ResultEnvelope)
    )
)]
#[tracing::instrument(skip_all, fields(instance = %instance, filename = %filename))]
pub async fn download_image(
    State(state): State<Arc<AppState>>,
    Path((instance, filename)): Path<(String, String)>,
) -> Result<Response, HttpAppError> {
    let key = ObjectKey::new(Folder::Images, &filename)
        .map_err(|e| AppError::ObjectNotFound(e.to_string()))?;

    let scope = TenantScope::resolve(&state, &instance).await?;
    let storage = scope.storage()?;

    stream_object(storage.as_ref(), &key).await
}
