use crate::error::HttpAppError;
use crate::handlers::{parse_survey_archive, stream_object};
use crate::services::TenantScope;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::Response,
};
use formgate_core::{ObjectKey, ResultEnvelope};
use std::sync::Arc;

/// Stream a survey archive. The numeric prefix of the id is validated; the full,
/// possibly versioned, id names the object.
#[utoipa::path(
    get,
    path = "/{instance}/surveys/{archive}",
    tag = "downloads",
    params(
        ("instance" = String, Path, description = "Tenant name"),
        ("archive" = String, Path, description = "`{form_id}[v{major}.{minor}].zip`, e.g. `1234567890v12.0.zip`")
    ),
    responses(
        (status = 200, description = "Archive bytes", content_type = "application/octet-stream"),
        (status = 404, description = "Unknown tenant, form or archive", body = ResultEnvelope),
        (status = 500, description = "Validation failure", body = ResultEnvelope)
    )
)]
#[tracing::instrument(skip_all, fields(instance = %instance, archive = %archive))]
pub async fn download_survey(
    State(state): State<Arc<AppState>>,
    Path((instance, archive)): Path<(String, String)>,
) -> Result<Response, HttpAppError> {
    let versioned_id = parse_survey_archive(&archive)?;
    tracing::debug!(
        form_id = %versioned_id.form_id(),
        versioned = versioned_id.is_versioned(),
        "Survey archive requested"
    );

    let scope = TenantScope::resolve(&state, &instance).await?;
    scope.ensure_form_exists(versioned_id.form_id()).await?;
    let storage = scope.storage()?;

    let key = ObjectKey::survey_archive(&versioned_id);
    stream_object(storage.as_ref(), &key).await
}
