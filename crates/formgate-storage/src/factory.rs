//! Per-tenant storage client construction

use crate::s3::S3Storage;
use crate::traits::{StorageClient, StorageResult};
use formgate_core::Config;

/// Builds a bucket-scoped [`StorageClient`] from a tenant's storage credentials.
///
/// Building must not perform network I/O; failures surface on first use.
pub trait StorageClientFactory: Send + Sync {
    fn build(
        &self,
        bucket: &str,
        access_id: &str,
        secret: &str,
    ) -> StorageResult<Box<dyn StorageClient>>;
}

/// Factory producing [`S3Storage`] clients that share region and endpoint settings
#[derive(Clone, Debug)]
pub struct S3StorageFactory {
    region: String,
    endpoint_url: Option<String>,
}

impl S3StorageFactory {
    pub fn new(region: impl Into<String>, endpoint_url: Option<String>) -> Self {
        Self {
            region: region.into(),
            endpoint_url,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.s3_region.clone(), config.s3_endpoint.clone())
    }
}

impl StorageClientFactory for S3StorageFactory {
    fn build(
        &self,
        bucket: &str,
        access_id: &str,
        secret: &str,
    ) -> StorageResult<Box<dyn StorageClient>> {
        let storage = S3Storage::new(
            bucket,
            access_id,
            secret,
            &self.region,
            self.endpoint_url.as_deref(),
        )?;
        tracing::debug!(bucket = %bucket, region = %self.region, "Built S3 storage client");
        Ok(Box::new(storage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_binds_requested_bucket() {
        let factory = S3StorageFactory::new("us-east-1", None);
        let client = factory.build("tenant-a", "AKIA", "secret").unwrap();
        assert_eq!(client.bucket(), "tenant-a");

        let other = factory.build("tenant-b", "AKIB", "secret").unwrap();
        assert_eq!(other.bucket(), "tenant-b");
    }

    #[test]
    fn test_build_rejects_empty_bucket() {
        let factory = S3StorageFactory::new("us-east-1", Some("http://localhost:9000".into()));
        assert!(factory.build("", "AKIA", "secret").is_err());
    }
}
