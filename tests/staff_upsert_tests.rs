//! Tests for the idempotent staff upsert keyed by user id.

use anyhow::Result;
use hospadmin::models::StaffRole;
use hospadmin::mutations::staff::{self, StaffForm};
use hospadmin::repositories::ProfileRepository;
use sea_orm::EntityTrait;
use uuid::Uuid;

#[path = "test_utils/mod.rs"]
mod test_utils;
use test_utils::{acting_user, seed_hospital, seed_user, setup_test_db};

#[tokio::test]
async fn saving_twice_leaves_one_profile_with_latest_fields() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = seed_user(&db, "admin@example.com", None).await?;
    let actor = acting_user(admin, StaffRole::Admin);

    let staff_id = Uuid::new_v4();

    staff::save_staff(
        &db,
        &actor,
        StaffForm {
            user_id: Some(staff_id.to_string()),
            full_name: Some("First Version".to_string()),
            contact1: Some("0700000001".to_string()),
            role: Some("nurse".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    let outcome = staff::save_staff(
        &db,
        &actor,
        StaffForm {
            user_id: Some(staff_id.to_string()),
            full_name: Some("Second Version".to_string()),
            contact1: Some("0700000002".to_string()),
            contact2: Some("0700000003".to_string()),
            role: Some("nurse".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    assert_eq!(outcome.invalidated.as_str(), "staff");

    let profiles = hospadmin::models::Profile::find().all(&db).await?;
    let matching: Vec<_> = profiles
        .iter()
        .filter(|p| p.user_id == staff_id)
        .collect();
    assert_eq!(matching.len(), 1);
    assert_eq!(matching[0].full_name.as_deref(), Some("Second Version"));
    assert_eq!(matching[0].contact1.as_deref(), Some("0700000002"));
    assert_eq!(matching[0].contact2.as_deref(), Some("0700000003"));

    Ok(())
}

#[tokio::test]
async fn hospital_assignment_is_applied_and_cleared() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = seed_user(&db, "admin@example.com", None).await?;
    let actor = acting_user(admin, StaffRole::Admin);
    let hospital_id = seed_hospital(&db, admin, "St. Mary").await?;

    let staff_id = Uuid::new_v4();

    let outcome = staff::save_staff(
        &db,
        &actor,
        StaffForm {
            user_id: Some(staff_id.to_string()),
            hospital_id: Some(hospital_id.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(outcome.record.hospital_id, Some(hospital_id));
    // Blank role defaulted.
    assert_eq!(outcome.record.role, "staff");

    // Saving again without a hospital clears the assignment.
    let outcome = staff::save_staff(
        &db,
        &actor,
        StaffForm {
            user_id: Some(staff_id.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(outcome.record.hospital_id, None);

    Ok(())
}

#[tokio::test]
async fn unknown_hospital_assignment_is_rejected() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = seed_user(&db, "admin@example.com", None).await?;
    let actor = acting_user(admin, StaffRole::Admin);

    let err = staff::save_staff(
        &db,
        &actor,
        StaffForm {
            user_id: Some(Uuid::new_v4().to_string()),
            hospital_id: Some(Uuid::new_v4().to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap_err();

    assert_eq!(err.code, Box::from("VALIDATION_FAILED"));
    assert!(err.details.unwrap().get("hospital_id").is_some());

    Ok(())
}

#[tokio::test]
async fn deleting_a_missing_profile_is_not_found() -> Result<()> {
    let db = setup_test_db().await?;
    let admin = seed_user(&db, "admin@example.com", None).await?;
    let actor = acting_user(admin, StaffRole::Admin);

    let err = staff::delete_staff(&db, &actor, Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err.code, Box::from("NOT_FOUND"));

    // Existing profiles delete cleanly.
    let staff_id = Uuid::new_v4();
    staff::save_staff(
        &db,
        &actor,
        StaffForm {
            user_id: Some(staff_id.to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();

    staff::delete_staff(&db, &actor, staff_id).await.unwrap();
    let repo = ProfileRepository::new(&db);
    assert!(repo.find_by_user_id(staff_id).await?.is_none());

    Ok(())
}
