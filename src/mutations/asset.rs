//! Asset mutator: validation, optional image upload, and tenant-scoped
//! persistence for asset records.
//!
//! The image host is called before anything is written: if the upload fails,
//! the whole mutation fails and no row is persisted.

use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{ApiError, upload_failed};
use crate::models::asset::Model as AssetModel;
use crate::mutations::{FieldErrors, MutationOutcome, ViewKey};
use crate::repositories::asset::{AssetChanges, AssetRepository, NewAsset};
use crate::session::CurrentUser;
use crate::tenancy;
use crate::upload::{ImageStore, decode_image};

/// Allowed values for the asset status field.
pub const STATUS_VALUES: &[&str] = &["good", "working", "bad"];

/// URL stored when an asset is created without an image.
pub const PLACEHOLDER_IMAGE_URL: &str = "/images/asset-placeholder.jpg";

/// Flat form payload for creating or updating an asset. An image may ride
/// along as base64 data plus its content type.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct AssetForm {
    pub name: Option<String>,
    pub description: Option<String>,
    /// Monetary value; must parse to a number greater than zero
    pub value: Option<String>,
    /// One of `good`, `working`, `bad`
    pub status: Option<String>,
    /// Optional image bytes, base64-encoded
    pub image_base64: Option<String>,
    /// Content type of the image (required when `image_base64` is present)
    pub image_content_type: Option<String>,
}

#[derive(Debug)]
struct ValidatedAsset {
    name: String,
    description: String,
    value: f64,
    status: String,
}

fn validate(form: &AssetForm) -> Result<ValidatedAsset, ApiError> {
    let mut errors = FieldErrors::new();

    let name = errors.require("name", form.name.as_deref());
    let description = errors.require("description", form.description.as_deref());

    let value = match errors.require("value", form.value.as_deref()) {
        Some(raw) => match raw.parse::<f64>() {
            Ok(parsed) if parsed.is_finite() && parsed > 0.0 => Some(parsed),
            _ => {
                errors.reject("value", "Value must be a positive number");
                None
            }
        },
        None => None,
    };

    let status = match errors.require("status", form.status.as_deref()) {
        Some(value) if STATUS_VALUES.contains(&value.as_str()) => Some(value),
        Some(_) => {
            errors.reject("status", "Invalid status value");
            None
        }
        None => None,
    };

    errors.finish()?;

    Ok(ValidatedAsset {
        name: name.unwrap(),
        description: description.unwrap(),
        value: value.unwrap(),
        status: status.unwrap(),
    })
}

/// Upload the optional image, returning the durable URL to store. Called only
/// after validation and authorization have passed, and always before any row
/// is written.
async fn upload_image(
    images: &dyn ImageStore,
    config: &AppConfig,
    form: &AssetForm,
) -> Result<Option<String>, ApiError> {
    let Some(data) = form
        .image_base64
        .as_deref()
        .map(str::trim)
        .filter(|data| !data.is_empty())
    else {
        return Ok(None);
    };

    let content_type = form.image_content_type.as_deref().unwrap_or_default();
    let payload = decode_image(data, content_type, config)?;

    let url = images.upload(&payload).await.map_err(|err| {
        tracing::error!(error = ?err, "Image host upload failed");
        upload_failed()
    })?;

    Ok(Some(url))
}

/// List assets for the acting user's hospital, newest first.
pub async fn list_assets(
    db: &DatabaseConnection,
    user: &CurrentUser,
) -> Result<Vec<AssetModel>, ApiError> {
    let scope = tenancy::resolve_assignment(db, user.id)
        .await?
        .require_scope()?;

    let repo = AssetRepository::new(db);
    let assets = repo.list_by_hospital(scope.0).await?;

    Ok(assets)
}

/// Create an asset under the acting user's hospital.
pub async fn create_asset(
    db: &DatabaseConnection,
    images: &dyn ImageStore,
    config: &AppConfig,
    user: &CurrentUser,
    form: AssetForm,
) -> Result<MutationOutcome<AssetModel>, ApiError> {
    let validated = validate(&form)?;
    let scope = tenancy::require_scope(db, user.id).await?;
    let image_url = upload_image(images, config, &form).await?;

    let repo = AssetRepository::new(db);
    let created = repo
        .create(
            scope.0,
            NewAsset {
                name: validated.name,
                description: validated.description,
                value: validated.value,
                status: validated.status,
                image_url: image_url.unwrap_or_else(|| PLACEHOLDER_IMAGE_URL.to_string()),
            },
        )
        .await?;

    metrics::counter!("mutations_total", "entity" => "asset", "op" => "create").increment(1);
    tracing::info!(asset_id = %created.id, hospital_id = %scope.0, "Asset created");

    Ok(MutationOutcome {
        record: created,
        invalidated: ViewKey::Assets,
    })
}

/// Update an asset owned by the acting user's hospital. The stored image URL
/// is only replaced when a new image was uploaded.
pub async fn update_asset(
    db: &DatabaseConnection,
    images: &dyn ImageStore,
    config: &AppConfig,
    user: &CurrentUser,
    asset_id: Uuid,
    form: AssetForm,
) -> Result<MutationOutcome<AssetModel>, ApiError> {
    let validated = validate(&form)?;
    let scope = tenancy::require_scope(db, user.id).await?;
    let image_url = upload_image(images, config, &form).await?;

    let repo = AssetRepository::new(db);
    let updated = repo
        .update_scoped(
            scope.0,
            asset_id,
            AssetChanges {
                name: validated.name,
                description: validated.description,
                value: validated.value,
                status: validated.status,
                image_url,
            },
        )
        .await
        .map_err(|err| tenancy::deny_out_of_scope("asset", asset_id, err))?;

    metrics::counter!("mutations_total", "entity" => "asset", "op" => "update").increment(1);
    tracing::info!(asset_id = %updated.id, hospital_id = %scope.0, "Asset updated");

    Ok(MutationOutcome {
        record: updated,
        invalidated: ViewKey::Assets,
    })
}

/// Delete an asset owned by the acting user's hospital.
pub async fn delete_asset(
    db: &DatabaseConnection,
    user: &CurrentUser,
    asset_id: Uuid,
) -> Result<MutationOutcome<()>, ApiError> {
    let scope = tenancy::require_scope(db, user.id).await?;

    let repo = AssetRepository::new(db);
    repo.delete_scoped(scope.0, asset_id)
        .await
        .map_err(|err| tenancy::deny_out_of_scope("asset", asset_id, err))?;

    metrics::counter!("mutations_total", "entity" => "asset", "op" => "delete").increment(1);
    tracing::info!(asset_id = %asset_id, hospital_id = %scope.0, "Asset deleted");

    Ok(MutationOutcome {
        record: (),
        invalidated: ViewKey::Assets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> AssetForm {
        AssetForm {
            name: Some("Ultrasound scanner".to_string()),
            description: Some("Portable scanner for ward rounds".to_string()),
            value: Some("2500.50".to_string()),
            status: Some("good".to_string()),
            image_base64: None,
            image_content_type: None,
        }
    }

    #[test]
    fn validate_accepts_a_complete_form() {
        let validated = validate(&complete_form()).unwrap();
        assert_eq!(validated.name, "Ultrasound scanner");
        assert_eq!(validated.value, 2500.50);
        assert_eq!(validated.status, "good");
    }

    #[test]
    fn validate_rejects_non_positive_values() {
        for bad in ["0", "-10", "NaN", "abc", "inf"] {
            let form = AssetForm {
                value: Some(bad.to_string()),
                ..complete_form()
            };
            let err = validate(&form).unwrap_err();
            assert!(
                err.details.unwrap().get("value").is_some(),
                "value '{bad}' should be rejected"
            );
        }
    }

    #[test]
    fn validate_rejects_status_outside_fixed_set() {
        let form = AssetForm {
            status: Some("broken".to_string()),
            ..complete_form()
        };
        let err = validate(&form).unwrap_err();
        assert!(err.details.unwrap().get("status").is_some());
    }

    #[test]
    fn validate_rejects_missing_required_fields() {
        let err = validate(&AssetForm::default()).unwrap_err();
        let details = err.details.unwrap();
        for field in ["name", "description", "value", "status"] {
            assert!(details.get(field).is_some(), "{field} should be required");
        }
    }
}
