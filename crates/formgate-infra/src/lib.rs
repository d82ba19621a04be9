//! Formgate Infrastructure Library
//!
//! Shared plumbing for the gateway binary:
//! - Request ID middleware
//! - Tracing initialization

pub mod middleware;
pub mod telemetry;

pub use middleware::{request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};
