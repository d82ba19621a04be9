//! Startup checks beyond `Config::validate`

use anyhow::Result;
use formgate_core::{Config, FileConfigResolver};

/// Reject deployments that would validate forms or store files somewhere unintended.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.is_production() && config.datastore_emulator_host.is_some() {
        return Err(anyhow::anyhow!(
            "DATASTORE_EMULATOR_HOST is set in production - form lookups would skip authentication"
        ));
    }

    if let Some(endpoint) = &config.s3_endpoint {
        if config.is_production() && endpoint.starts_with("http://") {
            tracing::warn!(
                s3_endpoint = %endpoint,
                "S3 endpoint uses plain HTTP in production - tenant credentials travel unencrypted"
            );
        }
    }

    Ok(())
}

pub fn check_tenant_snapshot(resolver: &FileConfigResolver) {
    if resolver.instance_count() == 0 {
        tracing::warn!("Tenant configuration is empty - every tenant request will return 404");
    }
}
