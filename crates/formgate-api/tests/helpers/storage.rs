//! In-memory, recording storage backend

use async_trait::async_trait;
use bytes::Bytes;
use formgate_core::{ObjectKey, UploadMetadata};
use formgate_storage::{
    ByteReader, DownloadResult, StorageClient, StorageClientFactory, StorageError, StorageResult,
    StoredObject,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::io::AsyncReadExt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedUpload {
    pub bucket: String,
    pub key: String,
    pub metadata: UploadMetadata,
    pub body: Vec<u8>,
}

#[derive(Default)]
struct Backend {
    objects: HashMap<(String, String), (Vec<u8>, String)>,
    builds: Vec<(String, String, String)>,
    uploads: Vec<RecordedUpload>,
    downloads: Vec<(String, String)>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StorageMode {
    #[default]
    Healthy,
    UploadsFail,
    DownloadsFail,
}

#[derive(Default)]
pub struct MemoryStorageFactory {
    mode: StorageMode,
    backend: Arc<Mutex<Backend>>,
}

impl MemoryStorageFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: StorageMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Seed an object as if it had been uploaded earlier
    pub fn put(&self, bucket: &str, key: &str, body: &[u8], content_type: &str) {
        self.backend.lock().unwrap().objects.insert(
            (bucket.to_string(), key.to_string()),
            (body.to_vec(), content_type.to_string()),
        );
    }

    /// `(bucket, access id, secret)` of every client built
    pub fn builds(&self) -> Vec<(String, String, String)> {
        self.backend.lock().unwrap().builds.clone()
    }

    pub fn uploads(&self) -> Vec<RecordedUpload> {
        self.backend.lock().unwrap().uploads.clone()
    }

    /// `(bucket, key)` of every download attempted
    pub fn downloads(&self) -> Vec<(String, String)> {
        self.backend.lock().unwrap().downloads.clone()
    }
}

impl StorageClientFactory for MemoryStorageFactory {
    fn build(
        &self,
        bucket: &str,
        access_id: &str,
        secret: &str,
    ) -> StorageResult<Box<dyn StorageClient>> {
        self.backend.lock().unwrap().builds.push((
            bucket.to_string(),
            access_id.to_string(),
            secret.to_string(),
        ));
        Ok(Box::new(MemoryStorage {
            bucket: bucket.to_string(),
            mode: self.mode,
            backend: self.backend.clone(),
        }))
    }
}

struct MemoryStorage {
    bucket: String,
    mode: StorageMode,
    backend: Arc<Mutex<Backend>>,
}

#[async_trait]
impl StorageClient for MemoryStorage {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn upload(
        &self,
        mut body: ByteReader<'_>,
        key: &ObjectKey,
        metadata: &UploadMetadata,
    ) -> StorageResult<()> {
        let mut data = Vec::new();
        body.read_to_end(&mut data).await?;

        if self.mode == StorageMode::UploadsFail {
            return Err(StorageError::UploadFailed("connection reset".into()));
        }

        let mut backend = self.backend.lock().unwrap();
        backend.uploads.push(RecordedUpload {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            metadata: metadata.clone(),
            body: data.clone(),
        });
        backend.objects.insert(
            (self.bucket.clone(), key.to_string()),
            (data, metadata.content_type.clone()),
        );
        Ok(())
    }

    async fn download(&self, key: &ObjectKey) -> DownloadResult {
        let mut backend = self.backend.lock().unwrap();
        backend
            .downloads
            .push((self.bucket.clone(), key.to_string()));

        if self.mode == StorageMode::DownloadsFail {
            return DownloadResult::BackendError(StorageError::DownloadFailed(
                "service unavailable".into(),
            ));
        }

        match backend.objects.get(&(self.bucket.clone(), key.to_string())) {
            Some((data, content_type)) => {
                let chunk = Bytes::from(data.clone());
                DownloadResult::Found(StoredObject {
                    content_length: Some(chunk.len() as u64),
                    body: Box::pin(futures::stream::once(async move { Ok(chunk) })),
                    content_type: content_type.clone(),
                })
            }
            None => DownloadResult::NotFound,
        }
    }
}
