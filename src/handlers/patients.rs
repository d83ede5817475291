//! # Patients API Handlers
//!
//! Tenant-scoped patient CRUD. Every operation resolves the acting user's
//! hospital server-side; the payload never chooses the tenant.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::DeletionResponse;
use crate::models::patient::Model as PatientModel;
use crate::mutations::patient::{self, PatientForm};
use crate::server::AppState;
use crate::session::CurrentUser;

/// Patient record for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientDto {
    /// Unique identifier for the patient
    #[schema(value_type = String)]
    pub id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub tel1: String,
    pub tel2: Option<String>,
    pub identity_no: String,
    /// Date of birth in `YYYY-MM-DD` form
    #[schema(example = "1990-04-02")]
    pub dob: String,
    pub sex: String,
    pub location: String,
    pub medical_history: Option<String>,
    pub notes: Option<String>,
    pub referred_by: Option<String>,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl From<PatientModel> for PatientDto {
    fn from(model: PatientModel) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            email: model.email,
            tel1: model.tel1,
            tel2: model.tel2,
            identity_no: model.identity_no,
            dob: model.dob.to_string(),
            sex: model.sex,
            location: model.location,
            medical_history: model.medical_history,
            notes: model.notes,
            referred_by: model.referred_by,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Response wrapper for patient listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientsResponse {
    pub data: Vec<PatientDto>,
}

/// Response wrapper for patient mutations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PatientMutationResponse {
    pub data: PatientDto,
    /// View the caller should refresh
    #[schema(example = "patients")]
    pub invalidated: String,
}

/// List patients for the acting user's hospital
#[utoipa::path(
    get,
    path = "/api/v1/patients",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Patients for the caller's hospital", body = PatientsResponse),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "No hospital assigned", body = ApiError)
    ),
    tag = "patients"
)]
pub async fn list_patients(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<PatientsResponse>, ApiError> {
    let patients = patient::list_patients(&state.db, &user).await?;

    Ok(Json(PatientsResponse {
        data: patients.into_iter().map(PatientDto::from).collect(),
    }))
}

/// Register a new patient
#[utoipa::path(
    post,
    path = "/api/v1/patients",
    security(("bearer_auth" = [])),
    request_body = PatientForm,
    responses(
        (status = 201, description = "Patient registered", body = PatientMutationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "No hospital assigned", body = ApiError)
    ),
    tag = "patients"
)]
pub async fn create_patient(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<PatientForm>,
) -> Result<(StatusCode, Json<PatientMutationResponse>), ApiError> {
    let outcome = patient::create_patient(&state.db, &user, form).await?;

    Ok((
        StatusCode::CREATED,
        Json(PatientMutationResponse {
            data: outcome.record.into(),
            invalidated: outcome.invalidated.as_str().to_string(),
        }),
    ))
}

/// Update a patient owned by the acting user's hospital
#[utoipa::path(
    put,
    path = "/api/v1/patients/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Patient UUID")),
    request_body = PatientForm,
    responses(
        (status = 200, description = "Patient updated", body = PatientMutationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "Access denied", body = ApiError)
    ),
    tag = "patients"
)]
pub async fn update_patient(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(form): Json<PatientForm>,
) -> Result<Json<PatientMutationResponse>, ApiError> {
    let outcome = patient::update_patient(&state.db, &user, id, form).await?;

    Ok(Json(PatientMutationResponse {
        data: outcome.record.into(),
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}

/// Delete a patient owned by the acting user's hospital
#[utoipa::path(
    delete,
    path = "/api/v1/patients/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Patient UUID")),
    responses(
        (status = 200, description = "Patient deleted", body = DeletionResponse),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "Access denied", body = ApiError)
    ),
    tag = "patients"
)]
pub async fn delete_patient(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletionResponse>, ApiError> {
    let outcome = patient::delete_patient(&state.db, &user, id).await?;

    Ok(Json(DeletionResponse {
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}
