//! Tests for the tenant-isolation invariants: cross-tenant writes are denied
//! and leave records unchanged, tenants can never be chosen by the payload,
//! and unassigned identities can never write.

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::NaiveDate;
use hospadmin::models::StaffRole;
use hospadmin::mutations::patient::{self, PatientForm};
use hospadmin::mutations::supplier::{self, SupplierForm};
use hospadmin::repositories::PatientRepository;
use hospadmin::repositories::patient::PatientRecord;
use hospadmin::server::create_app;
use hospadmin::session::StaticSessionProvider;
use sea_orm::EntityTrait;
use tower::ServiceExt;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{
    acting_user, identity, patient_form_json, seed_hospital, seed_user, setup_test_db, test_state,
};

fn patient_record(name: &str) -> PatientRecord {
    PatientRecord {
        full_name: name.to_string(),
        email: None,
        tel1: "0700000000".to_string(),
        tel2: None,
        identity_no: "ID-0001".to_string(),
        dob: NaiveDate::from_ymd_opt(1985, 1, 15).unwrap(),
        sex: "male".to_string(),
        location: "East Wing".to_string(),
        medical_history: None,
        notes: None,
        referred_by: None,
    }
}

fn complete_patient_form() -> PatientForm {
    PatientForm {
        full_name: Some("Updated Name".to_string()),
        tel1: Some("0711111111".to_string()),
        identity_no: Some("ID-9999".to_string()),
        dob: Some("1985-01-15".to_string()),
        sex: Some("male".to_string()),
        location: Some("West Wing".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn cross_tenant_update_is_denied_and_record_unchanged() -> Result<()> {
    let db = setup_test_db().await?;

    let owner = seed_user(&db, "owner@example.com", None).await?;
    let h1 = seed_hospital(&db, owner, "General One").await?;
    let h2 = seed_hospital(&db, owner, "General Two").await?;

    let u1 = seed_user(&db, "u1@example.com", Some(h1)).await?;
    let u2 = seed_user(&db, "u2@example.com", Some(h2)).await?;

    let repo = PatientRepository::new(&db);
    let patient = repo.create(h1, u1, patient_record("Original Name")).await?;

    // A member of H2 tries to update the H1 patient.
    let err = patient::update_patient(
        &db,
        &acting_user(u2, StaffRole::User),
        patient.id,
        complete_patient_form(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.code, Box::from("FORBIDDEN"));
    assert_eq!(err.message, Box::from("You do not have access to this record"));

    // The record is untouched.
    let unchanged = repo.find_scoped(h1, patient.id).await?.unwrap();
    assert_eq!(unchanged.full_name, "Original Name");
    assert_eq!(unchanged.hospital_id, h1);

    Ok(())
}

#[tokio::test]
async fn cross_tenant_delete_is_denied_and_record_survives() -> Result<()> {
    let db = setup_test_db().await?;

    let owner = seed_user(&db, "owner@example.com", None).await?;
    let h1 = seed_hospital(&db, owner, "General One").await?;
    let h2 = seed_hospital(&db, owner, "General Two").await?;

    let u1 = seed_user(&db, "u1@example.com", Some(h1)).await?;
    let u2 = seed_user(&db, "u2@example.com", Some(h2)).await?;

    let repo = PatientRepository::new(&db);
    let patient = repo.create(h1, u1, patient_record("Keep Me")).await?;

    let err = patient::delete_patient(&db, &acting_user(u2, StaffRole::User), patient.id)
        .await
        .unwrap_err();
    assert_eq!(err.code, Box::from("FORBIDDEN"));

    assert!(repo.find_scoped(h1, patient.id).await?.is_some());

    Ok(())
}

#[tokio::test]
async fn denial_does_not_reveal_whether_the_record_exists() -> Result<()> {
    let db = setup_test_db().await?;

    let owner = seed_user(&db, "owner@example.com", None).await?;
    let h1 = seed_hospital(&db, owner, "General One").await?;
    let h2 = seed_hospital(&db, owner, "General Two").await?;

    let u1 = seed_user(&db, "u1@example.com", Some(h1)).await?;
    let u2 = seed_user(&db, "u2@example.com", Some(h2)).await?;

    let repo = PatientRepository::new(&db);
    let patient = repo.create(h1, u1, patient_record("Hidden")).await?;

    let actor = acting_user(u2, StaffRole::User);

    // Existing record in another hospital vs a record that does not exist at
    // all: the external responses must be identical.
    let cross_tenant = patient::delete_patient(&db, &actor, patient.id)
        .await
        .unwrap_err();
    let missing = patient::delete_patient(&db, &actor, Uuid::new_v4())
        .await
        .unwrap_err();

    assert_eq!(cross_tenant.status, missing.status);
    assert_eq!(cross_tenant.code, missing.code);
    assert_eq!(cross_tenant.message, missing.message);

    Ok(())
}

#[tokio::test]
async fn tenant_cannot_be_spoofed_through_the_payload() -> Result<()> {
    let db = setup_test_db().await?;

    let owner = seed_user(&db, "owner@example.com", None).await?;
    let h1 = seed_hospital(&db, owner, "General One").await?;
    let h2 = seed_hospital(&db, owner, "General Two").await?;

    let u1 = seed_user(&db, "u1@example.com", Some(h1)).await?;

    let sessions = StaticSessionProvider::default()
        .with_identity("u1-token", identity(u1, "u1@example.com"));
    let state = test_state(db.clone(), sessions);
    let app = create_app(state);

    // The payload tries to plant a different hospital id.
    let mut form = patient_form_json();
    form["hospital_id"] = serde_json::json!(h2.to_string());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/patients")
                .header("Authorization", "Bearer u1-token")
                .header("Content-Type", "application/json")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);

    // The persisted row belongs to the acting user's hospital, not the one in
    // the payload.
    let rows = hospadmin::models::Patient::find().all(&db).await?;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].hospital_id, h1);
    assert_ne!(rows[0].hospital_id, h2);

    Ok(())
}

#[tokio::test]
async fn unassigned_identity_cannot_write_tenant_scoped_entities() -> Result<()> {
    let db = setup_test_db().await?;

    let lone = seed_user(&db, "lone@example.com", None).await?;
    let actor = acting_user(lone, StaffRole::User);

    let create_err = patient::create_patient(
        &db,
        &actor,
        PatientForm {
            full_name: Some("Jane Doe".to_string()),
            tel1: Some("0700000000".to_string()),
            identity_no: Some("ID-1234".to_string()),
            dob: Some("1990-04-02".to_string()),
            sex: Some("female".to_string()),
            location: Some("North Ward".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();
    assert_eq!(create_err.code, Box::from("NO_HOSPITAL_ASSIGNED"));

    let supplier_err = supplier::create_supplier(
        &db,
        &actor,
        SupplierForm {
            name: Some("MedSupply".to_string()),
            tel: Some("0711000000".to_string()),
            description: Some("Consumables".to_string()),
        },
    )
    .await
    .unwrap_err();
    assert_eq!(supplier_err.code, Box::from("NO_HOSPITAL_ASSIGNED"));

    // Nothing was persisted.
    assert!(hospadmin::models::Patient::find().all(&db).await?.is_empty());
    assert!(hospadmin::models::Supplier::find().all(&db).await?.is_empty());

    Ok(())
}

#[tokio::test]
async fn unassigned_list_state_is_distinct_from_an_empty_dataset() -> Result<()> {
    let db = setup_test_db().await?;

    let owner = seed_user(&db, "owner@example.com", None).await?;
    let h1 = seed_hospital(&db, owner, "General One").await?;

    let assigned = seed_user(&db, "assigned@example.com", Some(h1)).await?;
    let unassigned = seed_user(&db, "lone@example.com", None).await?;

    // Assigned user with no data gets an empty list.
    let empty = patient::list_patients(&db, &acting_user(assigned, StaffRole::User)).await?;
    assert!(empty.is_empty());

    // Unassigned user gets the distinct error state instead.
    let err = patient::list_patients(&db, &acting_user(unassigned, StaffRole::User))
        .await
        .unwrap_err();
    assert_eq!(err.code, Box::from("NO_HOSPITAL_ASSIGNED"));

    Ok(())
}

#[tokio::test]
async fn anonymous_create_is_rejected_with_zero_writes() -> Result<()> {
    let db = setup_test_db().await?;
    let state = test_state(db.clone(), StaticSessionProvider::default());
    let app = create_app(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/suppliers")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "name": "MedSupply",
                        "tel": "0711000000",
                        "description": "Consumables"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(hospadmin::models::Supplier::find().all(&db).await?.is_empty());

    Ok(())
}
