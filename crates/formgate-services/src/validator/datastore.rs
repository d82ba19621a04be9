//! Google Cloud Datastore backed form validation
//!
//! A form id is valid when an entity of kind [`SURVEY_KIND`] with that numeric id exists
//! in the tenant's project. Requests are authenticated with an OAuth2 access token obtained
//! through the JWT bearer grant, signed with the service-account key named by the tenant's
//! `datastoreCredential` field. Against an emulator no token is requested.

use super::{FormValidator, ValidatorError, ValidatorFactory};
use async_trait::async_trait;
use formgate_core::{Config, FormId};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

/// Entity kind holding form definitions
pub const SURVEY_KIND: &str = "Survey";

/// OAuth2 scope granting Datastore access
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const TOKEN_LIFETIME_SECS: i64 = 3600;
const HTTP_TIMEOUT_SECS: u64 = 30;

/// The subset of a Google service-account key file used here
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    #[serde(default)]
    pub client_email: String,
    #[serde(default)]
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default)]
    pub token_uri: String,
}

impl Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

impl ServiceAccountKey {
    pub fn from_json(raw: &str) -> Result<Self, ValidatorError> {
        let key: ServiceAccountKey = serde_json::from_str(raw)
            .map_err(|e| ValidatorError::Credential(format!("Invalid key file: {}", e)))?;
        if key.project_id.is_empty() {
            return Err(ValidatorError::Credential(
                "Key file has no project_id".to_string(),
            ));
        }
        Ok(key)
    }
}

#[derive(Debug, Serialize)]
struct GrantClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    found: Vec<serde_json::Value>,
}

/// Signing material for the JWT bearer grant
struct TokenSigner {
    client_email: String,
    token_uri: String,
    key_id: Option<String>,
    encoding_key: EncodingKey,
}

impl TokenSigner {
    fn from_key(key: &ServiceAccountKey) -> Result<Self, ValidatorError> {
        if key.client_email.is_empty() || key.token_uri.is_empty() {
            return Err(ValidatorError::Credential(
                "Key file needs client_email and token_uri".to_string(),
            ));
        }
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
            .map_err(|e| ValidatorError::Credential(format!("Invalid private key: {}", e)))?;

        Ok(Self {
            client_email: key.client_email.clone(),
            token_uri: key.token_uri.clone(),
            key_id: key.private_key_id.clone(),
            encoding_key,
        })
    }

    fn assertion(&self) -> Result<String, ValidatorError> {
        let now = chrono::Utc::now().timestamp();
        let claims = GrantClaims {
            iss: &self.client_email,
            scope: DATASTORE_SCOPE,
            aud: &self.token_uri,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        let mut header = Header::new(Algorithm::RS256);
        header.kid = self.key_id.clone();

        encode(&header, &claims, &self.encoding_key)
            .map_err(|e| ValidatorError::Credential(format!("Failed to sign assertion: {}", e)))
    }
}

/// Validator bound to one tenant's Datastore project
pub struct DatastoreValidator {
    http_client: reqwest::Client,
    base_url: String,
    project_id: String,
    signer: Option<TokenSigner>,
}

impl Debug for DatastoreValidator {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("DatastoreValidator")
            .field("base_url", &self.base_url)
            .field("project_id", &self.project_id)
            .field("authenticated", &self.signer.is_some())
            .finish()
    }
}

impl DatastoreValidator {
    /// Validator that authenticates every lookup with the given key.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        key: &ServiceAccountKey,
    ) -> Result<Self, ValidatorError> {
        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: key.project_id.clone(),
            signer: Some(TokenSigner::from_key(key)?),
        })
    }

    /// Validator for a Datastore emulator; lookups carry no credentials.
    pub fn unauthenticated(http_client: reqwest::Client, base_url: &str, project_id: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project_id: project_id.to_string(),
            signer: None,
        }
    }

    async fn access_token(&self, signer: &TokenSigner) -> Result<String, ValidatorError> {
        let assertion = signer.assertion()?;

        let response = self
            .http_client
            .post(&signer.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await
            .map_err(|e| ValidatorError::Backend(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ValidatorError::Backend(format!(
                "Token endpoint returned {} - {}",
                status, error_text
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ValidatorError::Backend(format!("Invalid token response: {}", e)))?;

        Ok(token.access_token)
    }

    fn lookup_url(&self) -> String {
        format!("{}/v1/projects/{}:lookup", self.base_url, self.project_id)
    }

    /// `LookupRequest` for a single Survey key; the partition lives on the key only.
    fn lookup_body(&self, form_id: FormId) -> serde_json::Value {
        json!({
            "keys": [{
                "partitionId": { "projectId": self.project_id },
                "path": [{ "kind": SURVEY_KIND, "id": form_id.get().to_string() }]
            }]
        })
    }
}

#[async_trait]
impl FormValidator for DatastoreValidator {
    #[tracing::instrument(skip(self), fields(project_id = %self.project_id))]
    async fn validate(&self, form_id: FormId) -> Result<bool, ValidatorError> {
        let start = std::time::Instant::now();

        let mut request = self
            .http_client
            .post(self.lookup_url())
            .json(&self.lookup_body(form_id));
        if let Some(signer) = &self.signer {
            let token = self.access_token(signer).await?;
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ValidatorError::Backend(format!("Lookup request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::error!(
                status = %status,
                form_id = %form_id,
                error = %error_text,
                "Datastore lookup failed"
            );
            return Err(ValidatorError::Backend(format!(
                "Lookup returned {} - {}",
                status, error_text
            )));
        }

        let lookup: LookupResponse = response
            .json()
            .await
            .map_err(|e| ValidatorError::Backend(format!("Invalid lookup response: {}", e)))?;

        let exists = !lookup.found.is_empty();
        tracing::debug!(
            form_id = %form_id,
            exists,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Datastore lookup completed"
        );
        Ok(exists)
    }
}

/// Builds [`DatastoreValidator`]s from service-account key files.
#[derive(Clone, Debug)]
pub struct DatastoreValidatorFactory {
    http_client: reqwest::Client,
    base_url: String,
    emulator: bool,
}

impl DatastoreValidatorFactory {
    pub fn new(base_url: impl Into<String>, emulator: bool) -> Result<Self, ValidatorError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| ValidatorError::Backend(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: base_url.into(),
            emulator,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, ValidatorError> {
        Self::new(
            config.datastore_base_url(),
            config.datastore_emulator_host.is_some(),
        )
    }
}

#[async_trait]
impl ValidatorFactory for DatastoreValidatorFactory {
    async fn build(&self, credential: &str) -> Result<Box<dyn FormValidator>, ValidatorError> {
        let raw = tokio::fs::read_to_string(credential).await.map_err(|e| {
            ValidatorError::Credential(format!("Failed to read key file {}: {}", credential, e))
        })?;
        let key = ServiceAccountKey::from_json(&raw)?;

        if self.emulator {
            return Ok(Box::new(DatastoreValidator::unauthenticated(
                self.http_client.clone(),
                &self.base_url,
                &key.project_id,
            )));
        }

        Ok(Box::new(DatastoreValidator::new(
            self.http_client.clone(),
            &self.base_url,
            &key,
        )?))
    }
}
