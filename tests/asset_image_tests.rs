//! Tests for the atomic image+entity write: if the image host fails, no asset
//! row is persisted; on success the stored value is the host's durable URL.

use anyhow::Result;
use base64::{Engine as _, engine::general_purpose};
use hospadmin::models::StaffRole;
use hospadmin::mutations::asset::{self, AssetForm, PLACEHOLDER_IMAGE_URL};
use hospadmin::upload::HttpImageStore;
use sea_orm::EntityTrait;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{acting_user, seed_hospital, seed_user, setup_test_db};

fn form_with_image(image: Option<&[u8]>) -> AssetForm {
    AssetForm {
        name: Some("X-ray machine".to_string()),
        description: Some("Radiology department".to_string()),
        value: Some("125000".to_string()),
        status: Some("working".to_string()),
        image_base64: image.map(|bytes| general_purpose::STANDARD.encode(bytes)),
        image_content_type: image.map(|_| "image/jpeg".to_string()),
    }
}

fn image_store(server: &MockServer) -> HttpImageStore {
    HttpImageStore::new(
        format!("{}/upload", server.uri()).parse().unwrap(),
        Some("test-api-key".to_string()),
    )
    .unwrap()
}

#[tokio::test]
async fn upload_failure_persists_no_asset_row() -> Result<()> {
    let db = setup_test_db().await?;
    let config = hospadmin::config::AppConfig::default();

    let owner = seed_user(&db, "owner@example.com", None).await?;
    let hospital_id = seed_hospital(&db, owner, "General").await?;
    let user_id = seed_user(&db, "staff@example.com", Some(hospital_id)).await?;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let images = image_store(&server);
    let err = asset::create_asset(
        &db,
        &images,
        &config,
        &acting_user(user_id, StaffRole::User),
        form_with_image(Some(b"fake-jpeg-bytes")),
    )
    .await
    .unwrap_err();

    assert_eq!(err.code, Box::from("UPLOAD_FAILED"));
    assert!(hospadmin::models::Asset::find().all(&db).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn successful_upload_stores_the_durable_url() -> Result<()> {
    let db = setup_test_db().await?;
    let config = hospadmin::config::AppConfig::default();

    let owner = seed_user(&db, "owner@example.com", None).await?;
    let hospital_id = seed_hospital(&db, owner, "General").await?;
    let user_id = seed_user(&db, "staff@example.com", Some(hospital_id)).await?;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": "https://img.example.com/assets/xray.jpg"
        })))
        .mount(&server)
        .await;

    let images = image_store(&server);
    let outcome = asset::create_asset(
        &db,
        &images,
        &config,
        &acting_user(user_id, StaffRole::User),
        form_with_image(Some(b"fake-jpeg-bytes")),
    )
    .await
    .unwrap();

    assert_eq!(
        outcome.record.image_url,
        "https://img.example.com/assets/xray.jpg"
    );
    assert_eq!(outcome.record.hospital_id, hospital_id);
    assert_eq!(outcome.invalidated.as_str(), "assets");

    Ok(())
}

#[tokio::test]
async fn missing_image_falls_back_to_the_placeholder() -> Result<()> {
    let db = setup_test_db().await?;
    let config = hospadmin::config::AppConfig::default();

    let owner = seed_user(&db, "owner@example.com", None).await?;
    let hospital_id = seed_hospital(&db, owner, "General").await?;
    let user_id = seed_user(&db, "staff@example.com", Some(hospital_id)).await?;

    let server = MockServer::start().await;
    // No image attached: the host must not be called at all.
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let images = image_store(&server);
    let outcome = asset::create_asset(
        &db,
        &images,
        &config,
        &acting_user(user_id, StaffRole::User),
        form_with_image(None),
    )
    .await
    .unwrap();

    assert_eq!(outcome.record.image_url, PLACEHOLDER_IMAGE_URL);

    Ok(())
}

#[tokio::test]
async fn oversized_image_is_rejected_before_the_host_is_called() -> Result<()> {
    let db = setup_test_db().await?;
    let config = hospadmin::config::AppConfig {
        image_max_bytes: 2048,
        ..Default::default()
    };

    let owner = seed_user(&db, "owner@example.com", None).await?;
    let hospital_id = seed_hospital(&db, owner, "General").await?;
    let user_id = seed_user(&db, "staff@example.com", Some(hospital_id)).await?;

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let big_image = vec![0u8; 4096];
    let images = image_store(&server);
    let err = asset::create_asset(
        &db,
        &images,
        &config,
        &acting_user(user_id, StaffRole::User),
        form_with_image(Some(&big_image)),
    )
    .await
    .unwrap_err();

    assert_eq!(err.code, Box::from("VALIDATION_FAILED"));
    assert!(hospadmin::models::Asset::find().all(&db).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn update_keeps_the_stored_image_when_no_new_upload() -> Result<()> {
    let db = setup_test_db().await?;
    let config = hospadmin::config::AppConfig::default();

    let owner = seed_user(&db, "owner@example.com", None).await?;
    let hospital_id = seed_hospital(&db, owner, "General").await?;
    let user_id = seed_user(&db, "staff@example.com", Some(hospital_id)).await?;
    let actor = acting_user(user_id, StaffRole::User);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/upload"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "url": "https://img.example.com/assets/original.jpg"
        })))
        .mount(&server)
        .await;

    let images = image_store(&server);
    let created = asset::create_asset(
        &db,
        &images,
        &config,
        &actor,
        form_with_image(Some(b"fake-jpeg-bytes")),
    )
    .await
    .unwrap();

    let updated = asset::update_asset(
        &db,
        &images,
        &config,
        &actor,
        created.record.id,
        AssetForm {
            name: Some("X-ray machine (serviced)".to_string()),
            ..form_with_image(None)
        },
    )
    .await
    .unwrap();

    assert_eq!(
        updated.record.image_url,
        "https://img.example.com/assets/original.jpg"
    );
    assert_eq!(updated.record.name, "X-ray machine (serviced)");

    Ok(())
}
