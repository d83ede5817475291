//! # Identity Handler
//!
//! Returns the resolved identity and hospital assignment for the acting user,
//! surfacing the distinct "no hospital assigned" state so callers never
//! confuse it with an empty dataset.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::StaffRole;
use crate::server::AppState;
use crate::session::CurrentUser;
use crate::tenancy;

/// The acting user's identity and tenant assignment
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    /// Stable user id
    #[schema(value_type = String)]
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: StaffRole,
    /// Assigned hospital id, absent while unassigned
    #[schema(value_type = Option<String>)]
    pub hospital_id: Option<Uuid>,
    /// True once an administrator has assigned a hospital
    pub hospital_assigned: bool,
}

/// Describe the acting user
#[utoipa::path(
    get,
    path = "/api/v1/me",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Resolved identity and assignment", body = MeResponse),
        (status = 401, description = "Not signed in", body = ApiError)
    ),
    tag = "identity"
)]
pub async fn me(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<MeResponse>, ApiError> {
    let assignment = tenancy::resolve_assignment(&state.db, user.id).await?;
    let hospital_id = assignment.hospital_id();

    Ok(Json(MeResponse {
        id: user.id,
        email: user.email,
        name: user.name,
        avatar_url: user.avatar_url,
        role: user.role,
        hospital_id,
        hospital_assigned: hospital_id.is_some(),
    }))
}
