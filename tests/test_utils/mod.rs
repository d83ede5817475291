//! Test utilities for database and router testing.
//!
//! This module provides helpers for setting up in-memory SQLite databases
//! with migrations applied, seeding identities and hospitals, and building
//! the full router around a static session provider.

use std::sync::Arc;

use anyhow::Result;
use hospadmin::config::AppConfig;
use hospadmin::migration::{Migrator, MigratorTrait};
use hospadmin::models::StaffRole;
use hospadmin::repositories::hospital::HospitalRecord;
use hospadmin::repositories::profile::StaffProfileUpdate;
use hospadmin::repositories::{HospitalRepository, ProfileRepository};
use hospadmin::server::AppState;
use hospadmin::session::{CurrentUser, ProviderIdentity, StaticSessionProvider};
use hospadmin::upload::{ImageStore, StaticImageStore};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Statement};
use uuid::Uuid;

/// Sets up an in-memory SQLite database with all migrations applied.
#[allow(dead_code)]
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = Database::connect("sqlite::memory:").await?;

    Migrator::up(&db, None).await?;

    // SQLite does not enforce our Postgres foreign key semantics; disable FK
    // checks so fixtures can be inserted without the full relation graph.
    db.execute(Statement::from_string(
        db.get_database_backend(),
        "PRAGMA foreign_keys = OFF".to_string(),
    ))
    .await?;

    Ok(db)
}

/// Builds an application state around the given database and session
/// provider, with an image store that succeeds with a fixed URL.
#[allow(dead_code)]
pub fn test_state(db: DatabaseConnection, sessions: StaticSessionProvider) -> AppState {
    test_state_with_images(
        db,
        sessions,
        Arc::new(StaticImageStore::with_url("https://img.example.com/fixed.jpg")),
    )
}

/// Builds an application state with an explicit image store.
#[allow(dead_code)]
pub fn test_state_with_images(
    db: DatabaseConnection,
    sessions: StaticSessionProvider,
    images: Arc<dyn ImageStore>,
) -> AppState {
    AppState {
        config: Arc::new(AppConfig::default()),
        db,
        sessions: Arc::new(sessions),
        images,
    }
}

/// Provider identity fixture.
#[allow(dead_code)]
pub fn identity(id: Uuid, email: &str) -> ProviderIdentity {
    ProviderIdentity {
        id,
        email: Some(email.to_string()),
        name: Some("Test Staff".to_string()),
        avatar_url: None,
    }
}

/// Acting-user fixture for direct mutator calls.
#[allow(dead_code)]
pub fn acting_user(id: Uuid, role: StaffRole) -> CurrentUser {
    CurrentUser {
        id,
        email: Some("staff@example.com".to_string()),
        name: Some("Test Staff".to_string()),
        avatar_url: None,
        role,
    }
}

/// Creates a user mirror + profile, optionally assigned to a hospital.
#[allow(dead_code)]
pub async fn seed_user(
    db: &DatabaseConnection,
    email: &str,
    hospital_id: Option<Uuid>,
) -> Result<Uuid> {
    let user_id = Uuid::new_v4();
    let repo = ProfileRepository::new(db);
    repo.sync_identity(&identity(user_id, email)).await?;

    if hospital_id.is_some() {
        repo.upsert_staff(
            user_id,
            StaffProfileUpdate {
                full_name: None,
                contact1: None,
                contact2: None,
                role: "user".to_string(),
                hospital_id,
            },
        )
        .await?;
    }

    Ok(user_id)
}

/// Creates a hospital owned by the given user and returns its id.
#[allow(dead_code)]
pub async fn seed_hospital(db: &DatabaseConnection, owner: Uuid, name: &str) -> Result<Uuid> {
    let repo = HospitalRepository::new(db);
    let hospital = repo
        .create(
            owner,
            HospitalRecord {
                name: name.to_string(),
                location: "Test Location".to_string(),
                registration_no: format!("REG-{}", Uuid::new_v4()),
                incharge: None,
            },
        )
        .await?;

    Ok(hospital.id)
}

/// A complete patient form as a JSON value, for router-level tests.
#[allow(dead_code)]
pub fn patient_form_json() -> serde_json::Value {
    serde_json::json!({
        "full_name": "Jane Doe",
        "email": "jane@example.com",
        "tel1": "0700000000",
        "identity_no": "ID-1234",
        "dob": "1990-04-02",
        "sex": "female",
        "location": "North Ward"
    })
}
