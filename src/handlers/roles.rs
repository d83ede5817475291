//! # Roles API Handlers
//!
//! CRUD for the global role catalog.

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
use crate::models::role::Model as RoleModel;
use crate::mutations::role::{self, RoleForm};
use crate::server::AppState;
use crate::session::CurrentUser;

/// Role record for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    /// Unique identifier for the role
    #[schema(value_type = String)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl From<RoleModel> for RoleDto {
    fn from(model: RoleModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Response wrapper for role listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RolesResponse {
    pub data: Vec<RoleDto>,
}

/// Response wrapper for role mutations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleMutationResponse {
    pub data: RoleDto,
    /// View the caller should refresh
    #[schema(example = "roles")]
    pub invalidated: String,
}

/// List all roles
#[utoipa::path(
    get,
    path = "/api/v1/roles",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All catalog roles", body = RolesResponse),
        (status = 401, description = "Not signed in", body = ApiError)
    ),
    tag = "roles"
)]
pub async fn list_roles(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<RolesResponse>, ApiError> {
    let roles = role::list_roles(&state.db, &user).await?;

    Ok(Json(RolesResponse {
        data: roles.into_iter().map(RoleDto::from).collect(),
    }))
}

/// Add a role to the catalog
#[utoipa::path(
    post,
    path = "/api/v1/roles",
    security(("bearer_auth" = [])),
    request_body = RoleForm,
    responses(
        (status = 201, description = "Role created", body = RoleMutationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 409, description = "Role name already exists", body = ApiError)
    ),
    tag = "roles"
)]
pub async fn create_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<RoleForm>,
) -> Result<(StatusCode, Json<RoleMutationResponse>), ApiError> {
    let outcome = role::create_role(&state.db, &user, form).await?;

    Ok((
        StatusCode::CREATED,
        Json(RoleMutationResponse {
            data: outcome.record.into(),
            invalidated: outcome.invalidated.as_str().to_string(),
        }),
    ))
}

/// Update a role in the catalog
#[utoipa::path(
    put,
    path = "/api/v1/roles/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Role UUID")),
    request_body = RoleForm,
    responses(
        (status = 200, description = "Role updated", body = RoleMutationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 404, description = "Role not found", body = ApiError)
    ),
    tag = "roles"
)]
pub async fn update_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(form): Json<RoleForm>,
) -> Result<Json<RoleMutationResponse>, ApiError> {
    let outcome = role::update_role(&state.db, &user, id, form).await?;

    Ok(Json(RoleMutationResponse {
        data: outcome.record.into(),
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}

/// Remove a role from the catalog
#[utoipa::path(
    delete,
    path = "/api/v1/roles/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Role UUID")),
    responses(
        (status = 200, description = "Role deleted", body = DeletionResponse),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 404, description = "Role not found", body = ApiError)
    ),
    tag = "roles"
)]
pub async fn delete_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletionResponse>, ApiError> {
    let outcome = role::delete_role(&state.db, &user, id).await?;

    Ok(Json(DeletionResponse {
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}
