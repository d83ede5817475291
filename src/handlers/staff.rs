//! # Staff API Handlers
//!
//! Staff management: the combined directory for the management view, the
//! idempotent profile upsert keyed by user id, and profile removal.

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::handlers::DeletionResponse;
use crate::models::profile::Model as ProfileModel;
use crate::mutations::staff::{self, StaffForm};
use crate::server::AppState;
use crate::session::CurrentUser;

/// User option for the staff management view
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StaffUserDto {
    /// User id
    #[schema(value_type = String)]
    pub id: Uuid,
    pub email: Option<String>,
}

/// Staff profile for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StaffProfileDto {
    /// User the profile belongs to
    #[schema(value_type = String)]
    pub user_id: Uuid,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub contact1: Option<String>,
    pub contact2: Option<String>,
    pub role: String,
    /// Assigned hospital, if any
    #[schema(value_type = Option<String>)]
    pub hospital_id: Option<Uuid>,
}

impl From<ProfileModel> for StaffProfileDto {
    fn from(model: ProfileModel) -> Self {
        Self {
            user_id: model.user_id,
            email: model.email,
            full_name: model.full_name,
            contact1: model.contact1,
            contact2: model.contact2,
            role: model.role,
            hospital_id: model.hospital_id,
        }
    }
}

/// Named option for dropdowns in the staff management view
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NamedOptionDto {
    /// Record id
    #[schema(value_type = String)]
    pub id: Uuid,
    pub name: String,
}

/// Combined directory backing the staff management view
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StaffDirectoryResponse {
    pub users: Vec<StaffUserDto>,
    pub profiles: Vec<StaffProfileDto>,
    pub roles: Vec<NamedOptionDto>,
    pub hospitals: Vec<NamedOptionDto>,
}

/// Response wrapper for the staff upsert
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StaffMutationResponse {
    pub data: StaffProfileDto,
    /// View the caller should refresh
    #[schema(example = "staff")]
    pub invalidated: String,
}

/// Load the staff directory: users, profiles, roles and hospitals
#[utoipa::path(
    get,
    path = "/api/v1/staff",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Staff directory", body = StaffDirectoryResponse),
        (status = 401, description = "Not signed in", body = ApiError)
    ),
    tag = "staff"
)]
pub async fn list_staff(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<StaffDirectoryResponse>, ApiError> {
    let directory = staff::list_staff(&state.db, &user).await?;

    Ok(Json(StaffDirectoryResponse {
        users: directory
            .users
            .into_iter()
            .map(|u| StaffUserDto {
                id: u.id,
                email: u.email,
            })
            .collect(),
        profiles: directory
            .profiles
            .into_iter()
            .map(StaffProfileDto::from)
            .collect(),
        roles: directory
            .roles
            .into_iter()
            .map(|r| NamedOptionDto {
                id: r.id,
                name: r.name,
            })
            .collect(),
        hospitals: directory
            .hospitals
            .into_iter()
            .map(|h| NamedOptionDto {
                id: h.id,
                name: h.name,
            })
            .collect(),
    }))
}

/// Create or update a staff profile, keyed by the user id in the form
#[utoipa::path(
    put,
    path = "/api/v1/staff",
    security(("bearer_auth" = [])),
    request_body = StaffForm,
    responses(
        (status = 200, description = "Staff profile saved", body = StaffMutationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not signed in", body = ApiError)
    ),
    tag = "staff"
)]
pub async fn save_staff(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<StaffForm>,
) -> Result<Json<StaffMutationResponse>, ApiError> {
    let outcome = staff::save_staff(&state.db, &user, form).await?;

    Ok(Json(StaffMutationResponse {
        data: outcome.record.into(),
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}

/// Remove a staff profile
#[utoipa::path(
    delete,
    path = "/api/v1/staff/{user_id}",
    security(("bearer_auth" = [])),
    params(("user_id" = Uuid, Path, description = "User UUID the profile belongs to")),
    responses(
        (status = 200, description = "Staff profile deleted", body = DeletionResponse),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 404, description = "Profile not found", body = ApiError)
    ),
    tag = "staff"
)]
pub async fn delete_staff(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> Result<Json<DeletionResponse>, ApiError> {
    let outcome = staff::delete_staff(&state.db, &user, user_id).await?;

    Ok(Json(DeletionResponse {
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}
