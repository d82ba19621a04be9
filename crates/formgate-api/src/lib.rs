//! Formgate API Library
//!
//! HTTP surface of the gateway: route setup, handlers and the mapping from
//! [`formgate_core::AppError`] to responses.

mod api_doc;
mod handlers;
mod services;

pub mod error;
pub mod setup;
pub mod state;

pub use error::HttpAppError;
pub use state::AppState;
