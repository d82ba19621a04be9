//! Formgate Storage Library
//!
//! Tenant-scoped object storage. A [`StorageClient`] is bound to exactly one bucket
//! and is built per request by a [`StorageClientFactory`] from that tenant's credentials.
//!
//! Keys always come from [`formgate_core::ObjectKey`], so every object lives under one
//! of the `devicezip/`, `images/` or `surveys/` prefixes.

pub mod factory;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{S3StorageFactory, StorageClientFactory};
pub use s3::{S3Storage, PART_SIZE};
pub use traits::{
    ByteReader, DownloadResult, ObjectStream, StorageClient, StorageError, StorageResult,
    StoredObject, DEFAULT_CONTENT_TYPE,
};
