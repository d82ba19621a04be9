use axum::Json;
use formgate_core::ResultEnvelope;

/// Liveness probe. Touches no tenant, config or storage state.
pub async fn health_check() -> Json<ResultEnvelope> {
    Json(ResultEnvelope::success("OK!"))
}
