//! # Suppliers API Handlers
//!
//! Tenant-scoped supplier CRUD.

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
use crate::models::supplier::Model as SupplierModel;
use crate::mutations::supplier::{self, SupplierForm};
use crate::server::AppState;
use crate::session::CurrentUser;

/// Supplier record for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SupplierDto {
    /// Unique identifier for the supplier
    #[schema(value_type = String)]
    pub id: Uuid,
    pub name: String,
    pub tel: String,
    pub description: String,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
}

impl From<SupplierModel> for SupplierDto {
    fn from(model: SupplierModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            tel: model.tel,
            description: model.description,
            created_at: model.created_at.to_rfc3339(),
        }
    }
}

/// Response wrapper for supplier listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuppliersResponse {
    pub data: Vec<SupplierDto>,
}

/// Response wrapper for supplier mutations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SupplierMutationResponse {
    pub data: SupplierDto,
    /// View the caller should refresh
    #[schema(example = "suppliers")]
    pub invalidated: String,
}

/// List suppliers for the acting user's hospital
#[utoipa::path(
    get,
    path = "/api/v1/suppliers",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Suppliers for the caller's hospital", body = SuppliersResponse),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "No hospital assigned", body = ApiError)
    ),
    tag = "suppliers"
)]
pub async fn list_suppliers(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<SuppliersResponse>, ApiError> {
    let suppliers = supplier::list_suppliers(&state.db, &user).await?;

    Ok(Json(SuppliersResponse {
        data: suppliers.into_iter().map(SupplierDto::from).collect(),
    }))
}

/// Create a new supplier
#[utoipa::path(
    post,
    path = "/api/v1/suppliers",
    security(("bearer_auth" = [])),
    request_body = SupplierForm,
    responses(
        (status = 201, description = "Supplier created", body = SupplierMutationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "No hospital assigned", body = ApiError)
    ),
    tag = "suppliers"
)]
pub async fn create_supplier(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<SupplierForm>,
) -> Result<(StatusCode, Json<SupplierMutationResponse>), ApiError> {
    let outcome = supplier::create_supplier(&state.db, &user, form).await?;

    Ok((
        StatusCode::CREATED,
        Json(SupplierMutationResponse {
            data: outcome.record.into(),
            invalidated: outcome.invalidated.as_str().to_string(),
        }),
    ))
}

/// Update a supplier owned by the acting user's hospital
#[utoipa::path(
    put,
    path = "/api/v1/suppliers/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Supplier UUID")),
    request_body = SupplierForm,
    responses(
        (status = 200, description = "Supplier updated", body = SupplierMutationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "Access denied", body = ApiError)
    ),
    tag = "suppliers"
)]
pub async fn update_supplier(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(form): Json<SupplierForm>,
) -> Result<Json<SupplierMutationResponse>, ApiError> {
    let outcome = supplier::update_supplier(&state.db, &user, id, form).await?;

    Ok(Json(SupplierMutationResponse {
        data: outcome.record.into(),
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}

/// Delete a supplier owned by the acting user's hospital
#[utoipa::path(
    delete,
    path = "/api/v1/suppliers/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Supplier UUID")),
    responses(
        (status = 200, description = "Supplier deleted", body = DeletionResponse),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "Access denied", body = ApiError)
    ),
    tag = "suppliers"
)]
pub async fn delete_supplier(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletionResponse>, ApiError> {
    let outcome = supplier::delete_supplier(&state.db, &user, id).await?;

    Ok(Json(DeletionResponse {
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}
