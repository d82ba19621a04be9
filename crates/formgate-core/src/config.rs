//! Configuration module
//!
//! Process-level settings read from the environment (a `.env` file is honoured).
//! Per-tenant settings are not here: they come from the tenant configuration snapshot
//! named by `TENANT_CONFIG_PATH`.

use std::env;

const SERVER_PORT: u16 = 8000;
const MAX_UPLOAD_SIZE_MB: usize = 100;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const UPLOAD_CONCURRENCY_LIMIT: usize = 64;
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_DATASTORE_ENDPOINT: &str = "https://datastore.googleapis.com";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub environment: String,
    pub cors_origins: Vec<String>,
    /// JSON snapshot of tenant records
    pub tenant_config_path: String,
    pub s3_region: String,
    /// Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub s3_endpoint: Option<String>,
    pub datastore_endpoint: String,
    /// `host:port` of a Datastore emulator; lookups then skip authentication
    pub datastore_emulator_host: Option<String>,
    pub max_upload_size_bytes: usize,
    pub http_concurrency_limit: usize,
    /// Uploads in flight at once; each may hold one multipart part in memory
    pub upload_concurrency_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_upload_size_mb = env::var("MAX_UPLOAD_SIZE_MB")
            .unwrap_or_else(|_| MAX_UPLOAD_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_UPLOAD_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            environment,
            cors_origins,
            tenant_config_path: env::var("TENANT_CONFIG_PATH")
                .map_err(|_| anyhow::anyhow!("TENANT_CONFIG_PATH must be set"))?,
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .unwrap_or_else(|_| DEFAULT_REGION.to_string()),
            s3_endpoint: env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            datastore_endpoint: env::var("DATASTORE_ENDPOINT")
                .unwrap_or_else(|_| DEFAULT_DATASTORE_ENDPOINT.to_string()),
            datastore_emulator_host: env::var("DATASTORE_EMULATOR_HOST")
                .ok()
                .filter(|s| !s.is_empty()),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
            upload_concurrency_limit: env::var("UPLOAD_CONCURRENCY_LIMIT")
                .ok()
                .and_then(|s| s.parse::<usize>().ok())
                .unwrap_or(UPLOAD_CONCURRENCY_LIMIT),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    /// Fail fast on settings that would make the server unusable or unsafe.
    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB cannot be 0"));
        }
        if self.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT cannot be 0"));
        }
        if self.upload_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("UPLOAD_CONCURRENCY_LIMIT cannot be 0"));
        }
        if self.tenant_config_path.trim().is_empty() {
            return Err(anyhow::anyhow!("TENANT_CONFIG_PATH cannot be empty"));
        }
        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        Ok(())
    }

    /// Base URL for Datastore REST calls, honouring the emulator override.
    pub fn datastore_base_url(&self) -> String {
        match &self.datastore_emulator_host {
            Some(host) if host.starts_with("http://") || host.starts_with("https://") => {
                host.trim_end_matches('/').to_string()
            }
            Some(host) => format!("http://{}", host.trim_end_matches('/')),
            None => self.datastore_endpoint.trim_end_matches('/').to_string(),
        }
    }
}
