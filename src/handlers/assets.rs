//! # Assets API Handlers
//!
//! Tenant-scoped asset CRUD with optional image upload. The mutation fails
//! whole when the image host rejects the upload; no partial row is persisted.

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
use crate::models::asset::Model as AssetModel;
use crate::mutations::asset::{self, AssetForm};
use crate::server::AppState;
use crate::session::CurrentUser;

/// Asset record for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssetDto {
    /// Unique identifier for the asset
    #[schema(value_type = String)]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub value: f64,
    /// One of `good`, `working`, `bad`
    pub status: String,
    /// Durable image URL
    pub image_url: String,
    /// Creation timestamp (ISO 8601)
    pub created_at: String,
    /// Last update timestamp (ISO 8601)
    pub updated_at: String,
}

impl From<AssetModel> for AssetDto {
    fn from(model: AssetModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            value: model.value,
            status: model.status,
            image_url: model.image_url,
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        }
    }
}

/// Response wrapper for asset listings
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssetsResponse {
    pub data: Vec<AssetDto>,
}

/// Response wrapper for asset mutations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AssetMutationResponse {
    pub data: AssetDto,
    /// View the caller should refresh
    #[schema(example = "assets")]
    pub invalidated: String,
}

/// List assets for the acting user's hospital
#[utoipa::path(
    get,
    path = "/api/v1/assets",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Assets for the caller's hospital", body = AssetsResponse),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "No hospital assigned", body = ApiError)
    ),
    tag = "assets"
)]
pub async fn list_assets(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<AssetsResponse>, ApiError> {
    let assets = asset::list_assets(&state.db, &user).await?;

    Ok(Json(AssetsResponse {
        data: assets.into_iter().map(AssetDto::from).collect(),
    }))
}

/// Create a new asset, uploading its image first when one is attached
#[utoipa::path(
    post,
    path = "/api/v1/assets",
    security(("bearer_auth" = [])),
    request_body = AssetForm,
    responses(
        (status = 201, description = "Asset created", body = AssetMutationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "No hospital assigned", body = ApiError),
        (status = 502, description = "Image host failure", body = ApiError)
    ),
    tag = "assets"
)]
pub async fn create_asset(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(form): Json<AssetForm>,
) -> Result<(StatusCode, Json<AssetMutationResponse>), ApiError> {
    let outcome =
        asset::create_asset(&state.db, state.images.as_ref(), &state.config, &user, form).await?;

    Ok((
        StatusCode::CREATED,
        Json(AssetMutationResponse {
            data: outcome.record.into(),
            invalidated: outcome.invalidated.as_str().to_string(),
        }),
    ))
}

/// Update an asset owned by the acting user's hospital
#[utoipa::path(
    put,
    path = "/api/v1/assets/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Asset UUID")),
    request_body = AssetForm,
    responses(
        (status = 200, description = "Asset updated", body = AssetMutationResponse),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "Access denied", body = ApiError),
        (status = 502, description = "Image host failure", body = ApiError)
    ),
    tag = "assets"
)]
pub async fn update_asset(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(form): Json<AssetForm>,
) -> Result<Json<AssetMutationResponse>, ApiError> {
    let outcome = asset::update_asset(
        &state.db,
        state.images.as_ref(),
        &state.config,
        &user,
        id,
        form,
    )
    .await?;

    Ok(Json(AssetMutationResponse {
        data: outcome.record.into(),
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}

/// Delete an asset owned by the acting user's hospital
#[utoipa::path(
    delete,
    path = "/api/v1/assets/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Asset UUID")),
    responses(
        (status = 200, description = "Asset deleted", body = DeletionResponse),
        (status = 401, description = "Not signed in", body = ApiError),
        (status = 403, description = "Access denied", body = ApiError)
    ),
    tag = "assets"
)]
pub async fn delete_asset(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeletionResponse>, ApiError> {
    let outcome = asset::delete_asset(&state.db, &user, id).await?;

    Ok(Json(DeletionResponse {
        invalidated: outcome.invalidated.as_str().to_string(),
    }))
}
