//! # API Handlers
//!
//! This module contains all the HTTP endpoint handlers for the hospital
//! administration API. Handlers are thin wrappers: they parse the request,
//! hand the acting identity and the form to the matching mutator, and shape
//! the response.

use crate::models::ServiceInfo;
use axum::response::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod admin;
pub mod assets;
pub mod hospitals;
pub mod me;
pub mod patients;
pub mod roles;
pub mod staff;
pub mod suppliers;

/// Response for deletions: nothing to return but the invalidation signal.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletionResponse {
    /// View the caller should refresh
    #[schema(example = "patients")]
    pub invalidated: String,
}

/// Root handler that returns basic service information
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service information", body = ServiceInfo)
    ),
    tag = "root"
)]
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn root_reports_service_name_and_version() {
        let Json(info) = root().await;
        assert_eq!(info.service, "hospadmin");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
    }
}
