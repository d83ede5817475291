//! # Hospitals API Handlers
//!
//! Hospitals are global entities: listings are open to any authenticated
//! identity, while create, update and delete are restricted to the `admin`
//! role by the hospital mutator.

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
use crate::models::hospital::Model as HospitalModel;
use crate::mutations::hospital::{self, HospitalForm};
use crate::server::AppState;
use crate::session::CurrentUser;

/// Hospital record for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HospitalDto {
    /// Unique identifier for the hospital
    #[schema(value_type = String)]
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub registration_no: String,
    pub incharge: Option<String>,
    /// Creation date (`YYYY-MM-DD`)
    #[schema(example = "2025-06-10")]
    pub date_created: String,
    /// Last update date (`YYYY-MM-DD`)
    #[schema(example = "2025-06-12")]
    pub updated_date: String,
}

impl From<HospitalModel> for HospitalDto {
    fn from(model: HospitalModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            location: model.location,
            registration_no: model.registration_no,
            incharge: model.incharge,
            date_created: model.created_at.date_naive().to_string(),
            updated_date: model.updated_at.date_naive().to_string(),
        }
    }
}

/// Response wrapper for hospital listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HospitalsResponse {
    pub data: Vec<HospitalDto>,
}

/// Response wrapper for hospital mutations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HospitalMutationResponse {
    pub data: HospitalDto,
    /// View the caller should refresh
    #[schema(example = "hospitals")]
    pub invalidated: String,
}

/// List all hospitals
#[utoipa::path(
    get,
    path = "/api/v1/hospitals",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All registered hospitals", body = HospitalsResponse),
        (status = 401, description = "Not signed in", body = ApiError)
    ),
    tag = "hospitals"
)]
pub async fn list_hospitals(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<HospitalsResponse>, ApiError> {
    let hospitals = hospital::list_hospitals(&state.db, &user).await?;

    Ok(Json(HospitalsResponse {
        data: hospitals.into_iter().map(HospitalDto::from).collect(),
    }))
}

/// Register a new hospital (admin only)
#[utoipa::path(
    post,
    path = "/api/v1/hospitals",
    security(("bearer_auth" = [])),
    request_body = HospitalForm,
    responses(
        (status = 201, description = "Hospital registered", body = HospitalMutationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "Admin role required", body = ApiError),
        (status = 409, description = "Registration number already in use", body = ApiError)
    ),
    tag = "hospitals"
)]
pub async fn create_hospital(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<HospitalForm>,
) -> Result<(StatusCode, Json<HospitalMutationResponse>), ApiError> {
    let outcome = hospital::create_hospital(&state.db, &user, form).await?;

    Ok((
        StatusCode::CREATED,
        Json(HospitalMutationResponse {
            data: outcome.record.into(),
            invalidated: outcome.invalidated.as_str().to_string(),
        }),
    ))
}

/// Update a hospital (admin only)
#[utoipa::path(
    put,
    path = "/api/v1/hospitals/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Hospital UUID")),
    request_body = HospitalForm,
    responses(
        (status = 200, description = "Hospital updated", body = HospitalMutationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "Admin role required or unknown record", body = ApiError)
    ),
    tag = "hospitals"
)]
pub async fn update_hospital(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(form): Json<HospitalForm>,
) -> Result<Json<HospitalMutationResponse>, ApiError> {
    let outcome = hospital::update_hospital(&state.db, &user, id, form).await?;

    Ok(Json(HospitalMutationResponse {
        data: outcome.record.into(),
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}

/// Delete a hospital (admin only)
#[utoipa::path(
    delete,
    path = "/api/v1/hospitals/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Hospital UUID")),
    responses(
        (status = 200, description = "Hospital deleted", body = DeletionResponse),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "Admin role required or unknown record", body = ApiError)
    ),
    tag = "hospitals"
)]
pub async fn delete_hospital(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletionResponse>, ApiError> {
    let outcome = hospital::delete_hospital(&state.db, &user, id).await?;

    Ok(Json(DeletionResponse {
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}
