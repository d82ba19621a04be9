//! OpenAPI documentation for the tenant file routes.
//! `/healtz` is deliberately left out of the document.

use utoipa::OpenApi;

use crate::handlers;
use formgate_core::{MessageStatus, ResultEnvelope};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Formgate API",
        version = "0.1.0",
        description = "Multi-tenant file gateway for form artifacts. Device export archives and images are uploaded per form id into the tenant's bucket; survey archives and images are streamed back. Every route is scoped by the `{instance}` tenant name."
    ),
    paths(
        handlers::upload::upload_devicezip,
        handlers::upload::upload_image,
        handlers::survey_download::download_survey,
        handlers::image_download::download_image,
    ),
    components(
        schemas(ResultEnvelope, MessageStatus)
    ),
    tags(
        (name = "uploads", description = "Multipart uploads gated by form validation"),
        (name = "downloads", description = "Streaming downloads of stored archives and images")
    )
)]
pub struct ApiDoc;
