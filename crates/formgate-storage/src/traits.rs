//! Storage abstraction trait
//!
//! This module defines the StorageClient trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use formgate_core::{ObjectKey, UploadMetadata};
use futures::Stream;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Content type reported when the backend has none stored for an object
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Request body handed to [`StorageClient::upload`]; consumed until EOF.
pub type ByteReader<'a> = Pin<Box<dyn AsyncRead + Send + 'a>>;

/// Object body yielded by [`StorageClient::download`].
pub type ObjectStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// A downloaded object: its byte stream plus the metadata the backend stored with it.
pub struct StoredObject {
    pub body: ObjectStream,
    pub content_type: String,
    pub content_length: Option<u64>,
}

impl Debug for StoredObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("StoredObject")
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Outcome of a download. Absence and backend failure stay distinguishable here even
/// though the HTTP layer reports both as 404.
#[derive(Debug)]
pub enum DownloadResult {
    Found(StoredObject),
    NotFound,
    BackendError(StorageError),
}

/// A storage client bound to a single bucket.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Name of the bucket this client is bound to
    fn bucket(&self) -> &str;

    /// Stream `body` into `key`, applying the content type and ACL from `metadata`.
    ///
    /// Must not report success unless the backend acknowledged the whole object.
    async fn upload(
        &self,
        body: ByteReader<'_>,
        key: &ObjectKey,
        metadata: &UploadMetadata,
    ) -> StorageResult<()>;

    /// Fetch `key` as a stream together with its stored content type
    async fn download(&self, key: &ObjectKey) -> DownloadResult;
}
