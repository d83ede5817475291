//! Patient mutator: validation and tenant-scoped persistence for patient
//! records.

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::patient::Model as PatientModel;
use crate::mutations::{FieldErrors, MutationOutcome, ViewKey, normalize};
use crate::repositories::patient::{PatientRecord, PatientRepository};
use crate::session::CurrentUser;
use crate::tenancy;

/// Allowed values for the patient sex field.
pub const SEX_VALUES: &[&str] = &["male", "female", "other"];

/// Flat form payload for creating or updating a patient. Every field is
/// untrusted and re-validated server-side.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct PatientForm {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub tel1: Option<String>,
    pub tel2: Option<String>,
    pub identity_no: Option<String>,
    /// Date of birth in `YYYY-MM-DD` form
    pub dob: Option<String>,
    /// One of `male`, `female`, `other`
    pub sex: Option<String>,
    pub location: Option<String>,
    pub medical_history: Option<String>,
    pub notes: Option<String>,
    pub referred_by: Option<String>,
}

fn validate(form: &PatientForm) -> Result<PatientRecord, ApiError> {
    let mut errors = FieldErrors::new();

    let full_name = errors.require("full_name", form.full_name.as_deref());
    let tel1 = errors.require("tel1", form.tel1.as_deref());
    let identity_no = errors.require("identity_no", form.identity_no.as_deref());
    let location = errors.require("location", form.location.as_deref());

    let dob = match errors.require("dob", form.dob.as_deref()) {
        Some(raw) => match NaiveDate::parse_from_str(&raw, "%Y-%m-%d") {
            Ok(date) => Some(date),
            Err(_) => {
                errors.reject("dob", "Must be a date in YYYY-MM-DD form");
                None
            }
        },
        None => None,
    };

    let sex = match errors.require("sex", form.sex.as_deref()) {
        Some(value) if SEX_VALUES.contains(&value.as_str()) => Some(value),
        Some(_) => {
            errors.reject("sex", "Must be one of: male, female, other");
            None
        }
        None => None,
    };

    errors.finish()?;

    Ok(PatientRecord {
        full_name: full_name.unwrap(),
        email: normalize(form.email.as_deref()),
        tel1: tel1.unwrap(),
        tel2: normalize(form.tel2.as_deref()),
        identity_no: identity_no.unwrap(),
        dob: dob.unwrap(),
        sex: sex.unwrap(),
        location: location.unwrap(),
        medical_history: normalize(form.medical_history.as_deref()),
        notes: normalize(form.notes.as_deref()),
        referred_by: normalize(form.referred_by.as_deref()),
    })
}

/// List patients for the acting user's hospital, newest first.
pub async fn list_patients(
    db: &DatabaseConnection,
    user: &CurrentUser,
) -> Result<Vec<PatientModel>, ApiError> {
    let scope = tenancy::resolve_assignment(db, user.id)
        .await?
        .require_scope()?;

    let repo = PatientRepository::new(db);
    let patients = repo.list_by_hospital(scope.0).await?;

    Ok(patients)
}

/// Register a patient under the acting user's hospital.
///
/// The owning hospital and the serving user are derived server-side from the
/// resolved session, regardless of anything present in the payload.
pub async fn create_patient(
    db: &DatabaseConnection,
    user: &CurrentUser,
    form: PatientForm,
) -> Result<MutationOutcome<PatientModel>, ApiError> {
    let record = validate(&form)?;
    let scope = tenancy::require_scope(db, user.id).await?;

    let repo = PatientRepository::new(db);
    let created = repo.create(scope.0, user.id, record).await?;

    metrics::counter!("mutations_total", "entity" => "patient", "op" => "create").increment(1);
    tracing::info!(patient_id = %created.id, hospital_id = %scope.0, "Patient registered");

    Ok(MutationOutcome {
        record: created,
        invalidated: ViewKey::Patients,
    })
}

/// Update a patient owned by the acting user's hospital.
pub async fn update_patient(
    db: &DatabaseConnection,
    user: &CurrentUser,
    patient_id: Uuid,
    form: PatientForm,
) -> Result<MutationOutcome<PatientModel>, ApiError> {
    let record = validate(&form)?;
    let scope = tenancy::require_scope(db, user.id).await?;

    let repo = PatientRepository::new(db);
    let updated = repo
        .update_scoped(scope.0, patient_id, record)
        .await
        .map_err(|err| tenancy::deny_out_of_scope("patient", patient_id, err))?;

    metrics::counter!("mutations_total", "entity" => "patient", "op" => "update").increment(1);
    tracing::info!(patient_id = %updated.id, hospital_id = %scope.0, "Patient updated");

    Ok(MutationOutcome {
        record: updated,
        invalidated: ViewKey::Patients,
    })
}

/// Delete a patient owned by the acting user's hospital.
pub async fn delete_patient(
    db: &DatabaseConnection,
    user: &CurrentUser,
    patient_id: Uuid,
) -> Result<MutationOutcome<()>, ApiError> {
    let scope = tenancy::require_scope(db, user.id).await?;

    let repo = PatientRepository::new(db);
    repo.delete_scoped(scope.0, patient_id)
        .await
        .map_err(|err| tenancy::deny_out_of_scope("patient", patient_id, err))?;

    metrics::counter!("mutations_total", "entity" => "patient", "op" => "delete").increment(1);
    tracing::info!(patient_id = %patient_id, hospital_id = %scope.0, "Patient deleted");

    Ok(MutationOutcome {
        record: (),
        invalidated: ViewKey::Patients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> PatientForm {
        PatientForm {
            full_name: Some("Jane Doe".to_string()),
            email: Some("jane@example.com".to_string()),
            tel1: Some("0700000000".to_string()),
            tel2: None,
            identity_no: Some("ID-1234".to_string()),
            dob: Some("1990-04-02".to_string()),
            sex: Some("female".to_string()),
            location: Some("North Ward".to_string()),
            medical_history: Some("  ".to_string()),
            notes: None,
            referred_by: Some(" Dr. Amin ".to_string()),
        }
    }

    #[test]
    fn validate_accepts_a_complete_form() {
        let record = validate(&complete_form()).unwrap();
        assert_eq!(record.full_name, "Jane Doe");
        assert_eq!(record.dob, NaiveDate::from_ymd_opt(1990, 4, 2).unwrap());
        // Blank optional fields collapse to None; others are trimmed.
        assert_eq!(record.medical_history, None);
        assert_eq!(record.referred_by.as_deref(), Some("Dr. Amin"));
    }

    #[test]
    fn validate_rejects_missing_required_fields() {
        let form = PatientForm {
            full_name: Some("   ".to_string()),
            tel1: None,
            ..complete_form()
        };
        let err = validate(&form).unwrap_err();
        assert_eq!(err.code, Box::from("VALIDATION_FAILED"));
        let details = err.details.unwrap();
        assert!(details.get("full_name").is_some());
        assert!(details.get("tel1").is_some());
    }

    #[test]
    fn validate_rejects_malformed_dob() {
        let form = PatientForm {
            dob: Some("02/04/1990".to_string()),
            ..complete_form()
        };
        let err = validate(&form).unwrap_err();
        assert!(err.details.unwrap().get("dob").is_some());
    }

    #[test]
    fn validate_rejects_sex_outside_fixed_set() {
        let form = PatientForm {
            sex: Some("unknown".to_string()),
            ..complete_form()
        };
        let err = validate(&form).unwrap_err();
        assert!(err.details.unwrap().get("sex").is_some());
    }
}
