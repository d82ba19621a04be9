//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use formgate_core::{Config, FileConfigResolver};
use formgate_infra::{init_telemetry, LogFormat};
use formgate_services::DatastoreValidatorFactory;
use formgate_storage::S3StorageFactory;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    init_telemetry(LogFormat::for_environment(&config.environment))
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    validation::validate_config(&config).context("Configuration validation failed")?;

    let resolver = FileConfigResolver::load(&config.tenant_config_path)
        .await
        .with_context(|| {
            format!(
                "Failed to load tenant configuration from {}",
                config.tenant_config_path
            )
        })?;
    validation::check_tenant_snapshot(&resolver);

    let validators = DatastoreValidatorFactory::from_config(&config)
        .map_err(|e| anyhow::anyhow!("Failed to create validator factory: {}", e))?;
    let storage = S3StorageFactory::from_config(&config);

    tracing::info!(
        environment = %config.environment,
        s3_region = %config.s3_region,
        s3_endpoint = ?config.s3_endpoint,
        datastore = %config.datastore_base_url(),
        "Configuration loaded and validated successfully"
    );

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(resolver),
        Arc::new(validators),
        Arc::new(storage),
    ));

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
