//! # Admin Section Handlers
//!
//! Routes in this module sit behind the admin section gate: anonymous and
//! non-admin identities are redirected to the public landing location before
//! a handler runs.

use axum::{extract::State, response::Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::models::StaffRole;
use crate::repositories::{HospitalRepository, ProfileRepository};
use crate::server::AppState;
use crate::session::CurrentUser;

/// Administrative overview: the admin's own identity plus headline counts
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminOverviewResponse {
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: StaffRole,
    /// Number of registered hospitals
    pub hospitals: usize,
    /// Number of staff profiles
    pub profiles: usize,
}

/// Overview for the admin section
#[utoipa::path(
    get,
    path = "/api/v1/admin/overview",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin overview", body = AdminOverviewResponse),
        (status = 303, description = "Redirected to the public landing location")
    ),
    tag = "admin"
)]
pub async fn admin_overview(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AdminOverviewResponse>, ApiError> {
    let hospitals = HospitalRepository::new(&state.db).list().await?;
    let profiles = ProfileRepository::new(&state.db).list_profiles().await?;

    Ok(Json(AdminOverviewResponse {
        email: user.email,
        name: user.name,
        role: user.role,
        hospitals: hospitals.len(),
        profiles: profiles.len(),
    }))
}
