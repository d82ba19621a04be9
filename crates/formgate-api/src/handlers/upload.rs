//! Multipart uploads into the `devicezip/` and `images/` folders

use crate::error::HttpAppError;
use crate::handlers::parse_form_id;
use crate::services::TenantScope;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use formgate_core::{AppError, Folder, ObjectKey, ResultEnvelope, UploadMetadata};
use formgate_storage::DEFAULT_CONTENT_TYPE;
use futures::StreamExt;
use std::sync::Arc;
use tokio_util::io::StreamReader;

/// Multipart field carrying the uploaded bytes
pub const FILE_FIELD: &str = "file";

type UploadResponse = (StatusCode, Json<ResultEnvelope>);

/// Upload a device export archive
#[utoipa::path(
    put,
    path = "/{instance}/devicezip/{form_id}/{filename}",
    tag = "uploads",
    params(
        ("instance" = String, Path, description = "Tenant name"),
        ("form_id" = String, Path, description = "Numeric form id (`^\\d+$`)"),
        ("filename" = String, Path, description = "Object name under `devicezip/`")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Multipart body with a `file` field"),
    responses(
        (status = 201, description = "Archive stored", body = ResultEnvelope),
        (status = 400, description = "Missing or unreadable `file` field", body = ResultEnvelope),
        (status = 404, description = "Unknown tenant or form", body = ResultEnvelope),
        (status = 500, description = "Upload or validation failure", body = ResultEnvelope)
    )
)]
#[tracing::instrument(
    skip_all,
    fields(instance = %instance, form_id = %form_id, filename = %filename, folder = "devicezip")
)]
pub async fn upload_devicezip(
    State(state): State<Arc<AppState>>,
    Path((instance, form_id, filename)): Path<(String, String, String)>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadResponse, HttpAppError> {
    upload_to_folder(&state, Folder::Devicezip, &instance, &form_id, &filename, multipart).await
}

/// Upload an image; stored objects are publicly readable
#[utoipa::path(
    put,
    path = "/{instance}/images/{form_id}/{filename}",
    tag = "uploads",
    params(
        ("instance" = String, Path, description = "Tenant name"),
        ("form_id" = String, Path, description = "Numeric form id (`^\\d+$`)"),
        ("filename" = String, Path, description = "Object name under `images/`")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data", description = "Multipart body with a `file` field"),
    responses(
        (status = 201, description = "Image stored with public-read ACL", body = ResultEnvelope),
        (status = 400, description = "Missing or unreadable `file` field", body = ResultEnvelope),
        (status = 404, description = "Unknown tenant or form", body = ResultEnvelope),
        (status = 500, description = "Upload or validation failure", body = ResultEnvelope)
    )
)]
#[tracing::instrument(
    skip_all,
    fields(instance = %instance, form_id = %form_id, filename = %filename, folder = "images")
)]
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    Path((instance, form_id, filename)): Path<(String, String, String)>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadResponse, HttpAppError> {
    upload_to_folder(&state, Folder::Images, &instance, &form_id, &filename, multipart).await
}

async fn upload_to_folder(
    state: &AppState,
    folder: Folder,
    instance: &str,
    raw_form_id: &str,
    filename: &str,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<UploadResponse, HttpAppError> {
    let form_id = parse_form_id(raw_form_id)?;
    let key = ObjectKey::new(folder, filename)
        .map_err(|e| AppError::ObjectNotFound(e.to_string()))?;

    let scope = TenantScope::resolve(state, instance).await?;
    scope.ensure_form_exists(form_id).await?;
    let storage = scope.storage()?;

    let mut multipart = multipart
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text())))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e.body_text())))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field
            .content_type()
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let metadata = UploadMetadata::for_folder(folder, content_type);

        let body = StreamReader::new(field.map(|chunk| chunk.map_err(std::io::Error::other)));
        storage.upload(Box::pin(body), &key, &metadata).await?;

        tracing::info!(
            instance = %scope.instance(),
            bucket = %scope.bucket(),
            key = %key,
            content_type = %metadata.content_type,
            "Upload stored"
        );
        return Ok((StatusCode::CREATED, Json(ResultEnvelope::success("OK!"))));
    }

    Err(AppError::BadRequest(format!("Missing `{}` field", FILE_FIELD)).into())
}
