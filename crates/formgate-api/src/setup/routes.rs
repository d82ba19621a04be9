//! Route configuration and setup

use crate::api_doc::ApiDoc;
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, put},
    Json, Router,
};
use formgate_core::Config;
use formgate_infra::request_id_middleware;
use std::sync::Arc;
use formgate_storage::PART_SIZE;
use tower::limit::{ConcurrencyLimitLayer, GlobalConcurrencyLimitLayer};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        upload_concurrency_limit = config.upload_concurrency_limit,
        upload_buffer_bytes_max = config.upload_concurrency_limit.saturating_mul(PART_SIZE),
        max_upload_size_bytes = config.max_upload_size_bytes,
        "HTTP limits configured"
    );

    let app = upload_routes(config.upload_concurrency_limit)
        .merge(download_routes())
        .route("/healtz", get(handlers::health::health_check))
        .route(
            "/api/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .fallback(handlers::not_found)
        // Uploads are streamed; the limit is enforced on the body itself
        .layer(DefaultBodyLimit::disable())
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit.max(1)))
        .layer(RequestBodyLimitLayer::new(config.max_upload_size_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .with_state(state);

    Ok(app)
}

/// Tenant-scoped upload routes, sharing one in-flight limit
fn upload_routes(limit: usize) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/{instance}/devicezip/{form_id}/{filename}",
            put(handlers::upload::upload_devicezip),
        )
        .route(
            "/{instance}/images/{form_id}/{filename}",
            put(handlers::upload::upload_image),
        )
        .route_layer(GlobalConcurrencyLimitLayer::new(limit.max(1)))
}

/// Tenant-scoped download routes
fn download_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/{instance}/surveys/{archive}",
            get(handlers::survey_download::download_survey),
        )
        .route(
            "/{instance}/images/{filename}",
            get(handlers::image_download::download_image),
        )
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::PUT, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}
