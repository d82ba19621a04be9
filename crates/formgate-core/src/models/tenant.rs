use std::collections::HashMap;
use std::fmt::{Debug, Formatter, Result as FmtResult};

/// Record field holding the tenant's bucket name.
pub const BUCKET_FIELD: &str = "s3Bucket";
/// Record field holding the storage access key id.
pub const ACCESS_ID_FIELD: &str = "s3AccessKeyId";
/// Record field holding the storage secret key.
pub const SECRET_FIELD: &str = "s3SecretKey";
/// Record field holding the identity-validation credential (service-account key file).
pub const IDENTITY_CREDENTIAL_FIELD: &str = "datastoreCredential";

/// Per-tenant configuration resolved for a single request.
#[derive(Clone, PartialEq, Eq)]
pub struct TenantConfig {
    pub bucket_name: String,
    pub storage_access_id: String,
    pub storage_secret: String,
    pub identity_credential: String,
}

impl Debug for TenantConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("TenantConfig")
            .field("bucket_name", &self.bucket_name)
            .field("storage_access_id", &self.storage_access_id)
            .field("storage_secret", &"<redacted>")
            .field("identity_credential", &self.identity_credential)
            .finish()
    }
}

impl TenantConfig {
    /// Build a config from a record of named string fields.
    ///
    /// Returns `Ok(None)` for an empty record. A non-empty record must carry every
    /// field with a non-empty value; otherwise the names of the missing fields are returned.
    pub fn from_record(record: &HashMap<String, String>) -> Result<Option<Self>, Vec<&'static str>> {
        if record.is_empty() {
            return Ok(None);
        }

        let mut missing = Vec::new();
        let mut field = |name: &'static str| -> String {
            match record.get(name).map(|v| v.trim()) {
                Some(value) if !value.is_empty() => value.to_string(),
                _ => {
                    missing.push(name);
                    String::new()
                }
            }
        };

        let config = TenantConfig {
            bucket_name: field(BUCKET_FIELD),
            storage_access_id: field(ACCESS_ID_FIELD),
            storage_secret: field(SECRET_FIELD),
            identity_credential: field(IDENTITY_CREDENTIAL_FIELD),
        };

        if missing.is_empty() {
            Ok(Some(config))
        } else {
            Err(missing)
        }
    }
}
