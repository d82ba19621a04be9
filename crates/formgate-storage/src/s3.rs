use crate::traits::{
    ByteReader, DownloadResult, StorageClient, StorageError, StorageResult, StoredObject,
    DEFAULT_CONTENT_TYPE,
};
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart, ObjectCannedAcl};
use aws_sdk_s3::Client;
use formgate_core::{CannedAcl, ObjectKey, UploadMetadata};
use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio_util::io::ReaderStream;

/// Part size for multipart uploads (S3 minimum is 5MB except for the last part).
/// Each upload in flight buffers at most one part.
pub const PART_SIZE: usize = 8 * 1024 * 1024;

/// S3 storage client bound to one tenant bucket
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: String,
}

impl S3Storage {
    /// Create a client with static credentials. Performs no I/O.
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `access_key_id` / `secret_access_key` - Tenant storage credentials
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO); enables path-style addressing
    pub fn new(
        bucket: &str,
        access_key_id: &str,
        secret_access_key: &str,
        region: &str,
        endpoint_url: Option<&str>,
    ) -> StorageResult<Self> {
        if bucket.is_empty() {
            return Err(StorageError::ConfigError("bucket name is empty".to_string()));
        }

        let credentials = Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "formgate-tenant",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials);

        if let Some(endpoint) = endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(S3Storage {
            client: Client::from_conf(builder.build()),
            bucket: bucket.to_string(),
        })
    }

    fn sdk_acl(acl: Option<CannedAcl>) -> Option<ObjectCannedAcl> {
        acl.map(|acl| match acl {
            CannedAcl::PublicRead => ObjectCannedAcl::PublicRead,
        })
    }

    async fn put_single(
        &self,
        key: &str,
        metadata: &UploadMetadata,
        data: Vec<u8>,
    ) -> StorageResult<u64> {
        let size = data.len() as u64;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(&metadata.content_type)
            .set_acl(Self::sdk_acl(metadata.acl))
            .content_length(size as i64)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(DisplayErrorContext(&e).to_string()))?;

        Ok(size)
    }

    /// Multipart upload starting with an already-read first part.
    async fn put_multipart(
        &self,
        key: &str,
        metadata: &UploadMetadata,
        first_part: Vec<u8>,
        body: &mut ByteReader<'_>,
    ) -> StorageResult<(u64, i32)> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .content_type(&metadata.content_type)
            .set_acl(Self::sdk_acl(metadata.acl))
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(DisplayErrorContext(&e).to_string()))?;

        let upload_id = created
            .upload_id()
            .ok_or_else(|| StorageError::UploadFailed("No upload ID returned from S3".to_string()))?
            .to_string();

        match self.upload_parts(key, &upload_id, first_part, body).await {
            Ok(result) => Ok(result),
            Err(e) => {
                if let Err(abort_err) = self
                    .client
                    .abort_multipart_upload()
                    .bucket(&self.bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .send()
                    .await
                {
                    tracing::warn!(
                        error = %DisplayErrorContext(&abort_err),
                        bucket = %self.bucket,
                        key = %key,
                        "Failed to abort multipart upload"
                    );
                }
                Err(e)
            }
        }
    }

    async fn upload_parts(
        &self,
        key: &str,
        upload_id: &str,
        first_part: Vec<u8>,
        body: &mut ByteReader<'_>,
    ) -> StorageResult<(u64, i32)> {
        let mut parts = Vec::new();
        let mut part_number = 1i32;
        let mut total_size = 0u64;
        let mut part = first_part;

        loop {
            let part_len = part.len();
            total_size += part_len as u64;

            let uploaded = self
                .client
                .upload_part()
                .bucket(&self.bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .content_length(part_len as i64)
                .body(ByteStream::from(part))
                .send()
                .await
                .map_err(|e| {
                    tracing::error!(
                        error = %DisplayErrorContext(&e),
                        bucket = %self.bucket,
                        key = %key,
                        part_number,
                        "Failed to upload part"
                    );
                    StorageError::UploadFailed(DisplayErrorContext(&e).to_string())
                })?;

            let etag = uploaded.e_tag().ok_or_else(|| {
                StorageError::UploadFailed(format!("No ETag returned for part {}", part_number))
            })?;

            parts.push(
                CompletedPart::builder()
                    .part_number(part_number)
                    .e_tag(etag)
                    .build(),
            );

            if part_len < PART_SIZE {
                break;
            }

            part = read_part(body).await?;
            if part.is_empty() {
                break;
            }
            part_number += 1;
        }

        self.client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(
                CompletedMultipartUpload::builder()
                    .set_parts(Some(parts))
                    .build(),
            )
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(DisplayErrorContext(&e).to_string()))?;

        Ok((total_size, part_number))
    }
}

/// Read up to [`PART_SIZE`] bytes, stopping early only at EOF.
async fn read_part<R>(reader: &mut R) -> StorageResult<Vec<u8>>
where
    R: AsyncRead + Unpin + ?Sized,
{
    let mut buffer = vec![0u8; PART_SIZE];
    let mut filled = 0usize;

    while filled < PART_SIZE {
        let bytes_read = reader.read(&mut buffer[filled..]).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to read from stream: {}", e))
        })?;
        if bytes_read == 0 {
            break;
        }
        filled += bytes_read;
    }

    buffer.truncate(filled);
    Ok(buffer)
}

fn is_not_found(err: &SdkError<GetObjectError>) -> bool {
    match err {
        SdkError::ServiceError(service_err) => {
            matches!(service_err.err(), GetObjectError::NoSuchKey(_))
                || service_err.raw().status().as_u16() == 404
        }
        _ => false,
    }
}

#[async_trait]
impl StorageClient for S3Storage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(
        &self,
        mut body: ByteReader<'_>,
        key: &ObjectKey,
        metadata: &UploadMetadata,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();
        let first_part = read_part(&mut body).await?;

        let result = if first_part.len() < PART_SIZE {
            self.put_single(key.as_str(), metadata, first_part)
                .await
                .map(|size| (size, 1))
        } else {
            self.put_multipart(key.as_str(), metadata, first_part, &mut body)
                .await
        };

        match result {
            Ok((size, parts)) => {
                tracing::info!(
                    bucket = %self.bucket,
                    key = %key,
                    content_type = %metadata.content_type,
                    acl = metadata.acl.map(CannedAcl::as_str),
                    size_bytes = size,
                    parts,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload successful"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    error = %e,
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                Err(e)
            }
        }
    }

    async fn download(&self, key: &ObjectKey) -> DownloadResult {
        let start = std::time::Instant::now();

        let response = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key.as_str())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if is_not_found(&e) => {
                tracing::debug!(bucket = %self.bucket, key = %key, "S3 object not found");
                return DownloadResult::NotFound;
            }
            Err(e) => {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    bucket = %self.bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 download failed"
                );
                return DownloadResult::BackendError(StorageError::DownloadFailed(
                    DisplayErrorContext(&e).to_string(),
                ));
            }
        };

        let content_type = response
            .content_type()
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let content_length = response
            .content_length()
            .and_then(|len| u64::try_from(len).ok());

        tracing::debug!(
            bucket = %self.bucket,
            key = %key,
            content_type = %content_type,
            content_length = ?content_length,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 download started"
        );

        let bucket = self.bucket.clone();
        let logged_key = key.to_string();
        let stream = ReaderStream::new(response.body.into_async_read()).map(move |item| {
            item.map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %logged_key,
                    "S3 stream download error"
                );
                StorageError::DownloadFailed(e.to_string())
            })
        });

        DownloadResult::Found(StoredObject {
            body: Box::pin(stream),
            content_type,
            content_length,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_bucket() {
        let result = S3Storage::new("", "id", "secret", "us-east-1", None);
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[test]
    fn test_new_binds_bucket() {
        let storage = S3Storage::new(
            "acme-bucket",
            "id",
            "secret",
            "eu-west-1",
            Some("http://localhost:9000"),
        )
        .unwrap();
        assert_eq!(storage.bucket(), "acme-bucket");
    }

    #[test]
    fn test_sdk_acl_mapping() {
        assert_eq!(
            S3Storage::sdk_acl(Some(CannedAcl::PublicRead)),
            Some(ObjectCannedAcl::PublicRead)
        );
        assert_eq!(S3Storage::sdk_acl(None), None);
    }

    #[tokio::test]
    async fn test_read_part_short_body() {
        let mut reader: &[u8] = b"hello world";
        let part = read_part(&mut reader).await.unwrap();
        assert_eq!(part, b"hello world");

        let rest = read_part(&mut reader).await.unwrap();
        assert!(rest.is_empty());
    }

    #[tokio::test]
    async fn test_read_part_fills_whole_part() {
        let data = vec![7u8; PART_SIZE + 10];
        let mut reader: &[u8] = &data;

        let first = read_part(&mut reader).await.unwrap();
        assert_eq!(first.len(), PART_SIZE);

        let second = read_part(&mut reader).await.unwrap();
        assert_eq!(second.len(), 10);
    }
}
