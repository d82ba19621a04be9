//! Test helpers: build AppState and router for integration tests.
//!
//! Tenants come from an in-memory `FileConfigResolver`; validation and storage are
//! recording fakes so tests can assert which backend calls a request made.
//!
//! Run with: `cargo test -p formgate-api`

#![allow(dead_code)]

pub mod storage;
pub mod validator;

use axum_test::TestServer;
use formgate_api::setup::routes;
use formgate_api::AppState;
use formgate_core::{Config, FileConfigResolver};
use std::collections::HashMap;
use std::sync::Arc;

use storage::MemoryStorageFactory;
use validator::FakeValidatorFactory;

pub const TENANT: &str = "acme";
pub const TENANT_BUCKET: &str = "acme-bucket";
pub const TENANT_CREDENTIAL: &str = "/secrets/acme-datastore.json";

/// Test application: server plus handles on the fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub validators: Arc<FakeValidatorFactory>,
    pub storage: Arc<MemoryStorageFactory>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn test_config() -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        tenant_config_path: "unused.json".to_string(),
        s3_region: "us-east-1".to_string(),
        s3_endpoint: None,
        datastore_endpoint: "http://localhost:1".to_string(),
        datastore_emulator_host: None,
        max_upload_size_bytes: 1024 * 1024,
        http_concurrency_limit: 64,
        upload_concurrency_limit: 1,
    }
}

pub fn tenant_record() -> HashMap<String, String> {
    HashMap::from([
        ("s3Bucket".to_string(), TENANT_BUCKET.to_string()),
        ("s3AccessKeyId".to_string(), "AKIAACME".to_string()),
        ("s3SecretKey".to_string(), "acme-secret".to_string()),
        ("datastoreCredential".to_string(), TENANT_CREDENTIAL.to_string()),
    ])
}

/// Tenant `acme` configured, `ghost` present with an empty record, `broken` missing its secret.
pub fn default_tenants() -> HashMap<String, HashMap<String, String>> {
    let mut broken = tenant_record();
    broken.remove("s3SecretKey");

    HashMap::from([
        (TENANT.to_string(), tenant_record()),
        ("ghost".to_string(), HashMap::new()),
        ("broken".to_string(), broken),
    ])
}

/// Setup test app where the validator knows `known_forms`.
pub fn setup_test_app(known_forms: &[u64]) -> TestApp {
    setup_test_app_with(FakeValidatorFactory::new(known_forms), MemoryStorageFactory::new())
}

pub fn setup_test_app_with(validators: FakeValidatorFactory, storage: MemoryStorageFactory) -> TestApp {
    let config = test_config();
    let validators = Arc::new(validators);
    let storage = Arc::new(storage);

    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(FileConfigResolver::from_records(default_tenants())),
        validators.clone(),
        storage.clone(),
    ));

    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        validators,
        storage,
    }
}
