//! Download integration tests.
//!
//! Run with: `cargo test -p formgate-api --test downloads_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::storage::{MemoryStorageFactory, StorageMode};
use helpers::validator::FakeValidatorFactory;
use helpers::{setup_test_app, setup_test_app_with, TENANT_BUCKET};
use serde_json::json;

#[tokio::test]
async fn test_versioned_survey_validates_numeric_prefix() {
    let app = setup_test_app(&[1234567890]);
    app.storage.put(
        TENANT_BUCKET,
        "surveys/1234567890v12.0.zip",
        b"PK-survey",
        "application/zip",
    );

    let response = app.client().get("/acme/surveys/1234567890v12.0.zip").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "application/zip");
    assert_eq!(response.as_bytes().as_ref(), b"PK-survey");
    assert_eq!(app.validators.lookups(), vec![1234567890]);
    assert_eq!(
        app.storage.downloads(),
        vec![(TENANT_BUCKET.to_string(), "surveys/1234567890v12.0.zip".to_string())]
    );
}

#[tokio::test]
async fn test_unversioned_survey_download() {
    let app = setup_test_app(&[99]);
    app.storage.put(TENANT_BUCKET, "surveys/99.zip", b"zip", "application/zip");

    let response = app.client().get("/acme/surveys/99.zip").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.as_bytes().as_ref(), b"zip");
}

#[tokio::test]
async fn test_survey_unknown_form_never_downloads() {
    let app = setup_test_app(&[]);
    app.storage.put(TENANT_BUCKET, "surveys/99.zip", b"zip", "application/zip");

    let response = app.client().get("/acme/surveys/99.zip").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(app.validators.lookups(), vec![99]);
    assert!(app.storage.downloads().is_empty());
}

#[tokio::test]
async fn test_survey_path_pattern_mismatch_is_not_found() {
    let app = setup_test_app(&[99]);

    for path in [
        "/acme/surveys/99",
        "/acme/surveys/99v1.zip",
        "/acme/surveys/abc.zip",
        "/acme/surveys/99v1.0.tar",
    ] {
        let response = app.client().get(path).await;
        assert_eq!(response.status_code(), 404, "{}", path);
    }

    assert!(app.validators.builds().is_empty());
    assert!(app.storage.builds().is_empty());
}

#[tokio::test]
async fn test_survey_zero_form_id_is_not_found() {
    let app = setup_test_app(&[0]);

    let response = app.client().get("/acme/surveys/0v1.0.zip").await;

    assert_eq!(response.status_code(), 404);
    assert!(app.validators.builds().is_empty());
    assert!(app.storage.downloads().is_empty());
}

#[tokio::test]
async fn test_survey_unknown_tenant_touches_nothing() {
    let app = setup_test_app(&[99]);
    app.storage.put(TENANT_BUCKET, "surveys/99.zip", b"zip", "application/zip");

    for path in ["/nobody/surveys/99.zip", "/ghost/surveys/99.zip"] {
        let response = app.client().get(path).await;
        assert_eq!(response.status_code(), 404, "{}", path);
        assert_eq!(
            response.json::<serde_json::Value>(),
            json!({"status": "fail", "message": "Not Found"})
        );
    }

    assert!(app.validators.builds().is_empty());
    assert!(app.validators.lookups().is_empty());
    assert!(app.storage.builds().is_empty());
    assert!(app.storage.downloads().is_empty());
}

#[tokio::test]
async fn test_survey_id_beyond_signed_range_is_not_found() {
    let app = setup_test_app(&[]);

    let response = app.client().get("/acme/surveys/9223372036854775808.zip").await;

    assert_eq!(response.status_code(), 404);
    assert!(app.validators.builds().is_empty());
    assert!(app.storage.builds().is_empty());
}

#[tokio::test]
async fn test_image_download_skips_validation() {
    let app = setup_test_app(&[]);
    app.storage.put(TENANT_BUCKET, "images/photo.jpg", b"jpeg", "image/jpeg");

    let response = app.client().get("/acme/images/photo.jpg").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "image/jpeg");
    assert_eq!(response.as_bytes().as_ref(), b"jpeg");
    assert!(app.validators.builds().is_empty());
}

#[tokio::test]
async fn test_image_download_unknown_tenant_never_contacts_storage() {
    let app = setup_test_app(&[]);

    let response = app.client().get("/acme-unknown/images/photo.jpg").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(
        response.json::<serde_json::Value>(),
        json!({"status": "fail", "message": "Not Found"})
    );
    assert!(app.storage.builds().is_empty());
}

#[tokio::test]
async fn test_missing_object_is_not_found() {
    let app = setup_test_app(&[]);

    let response = app.client().get("/acme/images/missing.jpg").await;

    assert_eq!(response.status_code(), 404);
    assert_eq!(app.storage.downloads().len(), 1);
}

#[tokio::test]
async fn test_download_backend_failure_is_reported_as_not_found() {
    let app = setup_test_app_with(
        FakeValidatorFactory::new(&[99]),
        MemoryStorageFactory::with_mode(StorageMode::DownloadsFail),
    );

    let response = app.client().get("/acme/surveys/99.zip").await;
    assert_eq!(response.status_code(), 404);

    let response = app.client().get("/acme/images/photo.jpg").await;
    assert_eq!(response.status_code(), 404);
    assert_eq!(app.storage.downloads().len(), 2);
}

#[tokio::test]
async fn test_uploaded_content_type_round_trips() {
    let app = setup_test_app(&[42]);

    let part = Part::bytes(bytes::Bytes::from_static(b"GIF89a"))
        .file_name("anim.gif")
        .mime_type("image/gif");
    let response = app
        .client()
        .put("/acme/images/42/anim.gif")
        .multipart(MultipartForm::new().add_part("file", part))
        .await;
    assert_eq!(response.status_code(), 201);

    let response = app.client().get("/acme/images/anim.gif").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.header("content-type"), "image/gif");
    assert_eq!(response.as_bytes().as_ref(), b"GIF89a");
}
