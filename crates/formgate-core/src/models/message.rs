//! Acknowledgement envelope returned by the non-streaming endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Success,
    Fail,
    Error,
}

/// `{"status": "success"|"fail"|"error", "message": string|null}`
///
/// Built only through [`ResultEnvelope::success`], [`ResultEnvelope::fail`] and
/// [`ResultEnvelope::error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ResultEnvelope {
    status: MessageStatus,
    message: Option<String>,
}

impl ResultEnvelope {
    pub fn success(message: impl Into<String>) -> Self {
        Self::with_status(MessageStatus::Success, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::with_status(MessageStatus::Fail, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::with_status(MessageStatus::Error, message)
    }

    fn with_status(status: MessageStatus, message: impl Into<String>) -> Self {
        ResultEnvelope {
            status,
            message: Some(message.into()),
        }
    }

    pub fn status(&self) -> MessageStatus {
        self.status
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}
