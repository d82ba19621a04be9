//! Tenant configuration lookup.
//!
//! The gateway never owns tenant configuration: it reads a snapshot of records keyed
//! by instance name, each record being a map of named string fields
//! (see [`crate::models::tenant`] for the field names).

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;

use crate::models::TenantConfig;

/// Raw record of named string fields for one instance
pub type TenantRecord = HashMap<String, String>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read tenant configuration from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse tenant configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Configuration for instance '{instance}' is missing fields: {fields}")]
    Malformed { instance: String, fields: String },
}

/// Resolves an instance name to its configuration.
///
/// `Ok(None)` means the instance is unknown (or its record is empty).
#[async_trait]
pub trait ConfigResolver: Send + Sync {
    async fn resolve(&self, instance: &str) -> Result<Option<TenantConfig>, ConfigError>;
}

/// Resolver over a JSON document of `{ "<instance>": { "<field>": "<value>", ... } }`,
/// loaded once.
#[derive(Debug, Clone, Default)]
pub struct FileConfigResolver {
    records: HashMap<String, TenantRecord>,
}

impl FileConfigResolver {
    /// Load the snapshot from a JSON file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;

        let resolver = Self::from_json(&contents)?;
        tracing::info!(
            path = %path.display(),
            instances = resolver.instance_count(),
            "Tenant configuration loaded"
        );
        Ok(resolver)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let records: HashMap<String, TenantRecord> = serde_json::from_str(json)?;
        Ok(Self::from_records(records))
    }

    pub fn from_records(records: HashMap<String, TenantRecord>) -> Self {
        FileConfigResolver { records }
    }

    pub fn instance_count(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl ConfigResolver for FileConfigResolver {
    async fn resolve(&self, instance: &str) -> Result<Option<TenantConfig>, ConfigError> {
        let Some(record) = self.records.get(instance) else {
            return Ok(None);
        };

        TenantConfig::from_record(record).map_err(|missing| ConfigError::Malformed {
            instance: instance.to_string(),
            fields: missing.join(", "),
        })
    }
}
