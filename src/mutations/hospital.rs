//! Hospital mutator: validation and persistence for hospital (tenant)
//! records.
//!
//! Hospitals are global entities: any authenticated identity may read them,
//! but create, update and delete require the `admin` role.

use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, forbidden, record_access_denied};
use crate::models::hospital::Model as HospitalModel;
use crate::mutations::{FieldErrors, MutationOutcome, ViewKey, normalize};
use crate::repositories::RepoError;
use crate::repositories::hospital::{HospitalRecord, HospitalRepository};
use crate::session::CurrentUser;

/// Flat form payload for creating or updating a hospital.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct HospitalForm {
    pub name: Option<String>,
    pub location: Option<String>,
    pub registration_no: Option<String>,
    pub incharge: Option<String>,
}

fn validate(form: &HospitalForm) -> Result<HospitalRecord, ApiError> {
    let mut errors = FieldErrors::new();

    let name = errors.require("name", form.name.as_deref());
    let location = errors.require("location", form.location.as_deref());
    let registration_no = errors.require("registration_no", form.registration_no.as_deref());

    errors.finish()?;

    Ok(HospitalRecord {
        name: name.unwrap(),
        location: location.unwrap(),
        registration_no: registration_no.unwrap(),
        incharge: normalize(form.incharge.as_deref()),
    })
}

fn require_admin(user: &CurrentUser) -> Result<(), ApiError> {
    if user.role.is_admin() {
        Ok(())
    } else {
        metrics::counter!("authz_denials_total", "reason" => "not_admin").increment(1);
        tracing::warn!(user_id = %user.id, role = %user.role, "Non-admin attempted hospital mutation");
        Err(forbidden(Some("Managing hospitals requires the admin role")))
    }
}

fn map_hospital_miss(hospital_id: Uuid, err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound => {
            tracing::warn!(hospital_id = %hospital_id, "Hospital mutation targeted a missing record");
            record_access_denied()
        }
        RepoError::Db(db_err) => db_err.into(),
    }
}

/// List all hospitals, newest first. Open to any authenticated identity.
pub async fn list_hospitals(
    db: &DatabaseConnection,
    _user: &CurrentUser,
) -> Result<Vec<HospitalModel>, ApiError> {
    let repo = HospitalRepository::new(db);
    let hospitals = repo.list().await?;
    Ok(hospitals)
}

/// Register a new hospital. Admin only; the acting user is recorded as the
/// owner.
pub async fn create_hospital(
    db: &DatabaseConnection,
    user: &CurrentUser,
    form: HospitalForm,
) -> Result<MutationOutcome<HospitalModel>, ApiError> {
    let record = validate(&form)?;
    require_admin(user)?;

    let repo = HospitalRepository::new(db);
    let created = repo.create(user.id, record).await?;

    metrics::counter!("mutations_total", "entity" => "hospital", "op" => "create").increment(1);
    tracing::info!(hospital_id = %created.id, "Hospital registered");

    Ok(MutationOutcome {
        record: created,
        invalidated: ViewKey::Hospitals,
    })
}

/// Update a hospital. Admin only.
pub async fn update_hospital(
    db: &DatabaseConnection,
    user: &CurrentUser,
    hospital_id: Uuid,
    form: HospitalForm,
) -> Result<MutationOutcome<HospitalModel>, ApiError> {
    let record = validate(&form)?;
    require_admin(user)?;

    let repo = HospitalRepository::new(db);
    let updated = repo
        .update(hospital_id, record)
        .await
        .map_err(|err| map_hospital_miss(hospital_id, err))?;

    metrics::counter!("mutations_total", "entity" => "hospital", "op" => "update").increment(1);
    tracing::info!(hospital_id = %updated.id, "Hospital updated");

    Ok(MutationOutcome {
        record: updated,
        invalidated: ViewKey::Hospitals,
    })
}

/// Delete a hospital. Admin only.
pub async fn delete_hospital(
    db: &DatabaseConnection,
    user: &CurrentUser,
    hospital_id: Uuid,
) -> Result<MutationOutcome<()>, ApiError> {
    require_admin(user)?;

    let repo = HospitalRepository::new(db);
    repo.delete(hospital_id)
        .await
        .map_err(|err| map_hospital_miss(hospital_id, err))?;

    metrics::counter!("mutations_total", "entity" => "hospital", "op" => "delete").increment(1);
    tracing::info!(hospital_id = %hospital_id, "Hospital deleted");

    Ok(MutationOutcome {
        record: (),
        invalidated: ViewKey::Hospitals,
    })
}
