//! # Asset Repository
//!
//! Tenant-scoped persistence for asset records. The stored image value is
//! always the durable URL handed back by the image host.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::models::asset::{self, Entity as Asset, Model as AssetModel};
use crate::repositories::RepoError;

/// Validated asset fields for creation.
#[derive(Debug, Clone)]
pub struct NewAsset {
    pub name: String,
    pub description: String,
    pub value: f64,
    pub status: String,
    pub image_url: String,
}

/// Validated asset fields for update. The image URL is only overwritten when
/// a new upload produced one.
#[derive(Debug, Clone)]
pub struct AssetChanges {
    pub name: String,
    pub description: String,
    pub value: f64,
    pub status: String,
    pub image_url: Option<String>,
}

/// Repository for asset database operations
pub struct AssetRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AssetRepository<'a> {
    /// Create a new AssetRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert an asset owned by the given hospital
    pub async fn create(&self, hospital_id: Uuid, record: NewAsset) -> Result<AssetModel, RepoError> {
        let now = Utc::now();
        let asset = asset::ActiveModel {
            id: Set(Uuid::new_v4()),
            hospital_id: Set(hospital_id),
            name: Set(record.name),
            description: Set(record.description),
            value: Set(record.value),
            status: Set(record.status),
            image_url: Set(record.image_url),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let result = asset.insert(self.db).await?;
        Ok(result)
    }

    /// List all assets for a hospital, newest first
    pub async fn list_by_hospital(&self, hospital_id: Uuid) -> Result<Vec<AssetModel>, RepoError> {
        let assets = Asset::find()
            .filter(asset::Column::HospitalId.eq(hospital_id))
            .order_by_desc(asset::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(assets)
    }

    /// Find an asset by id within a hospital scope
    pub async fn find_scoped(
        &self,
        hospital_id: Uuid,
        id: Uuid,
    ) -> Result<Option<AssetModel>, RepoError> {
        let asset = Asset::find_by_id(id)
            .filter(asset::Column::HospitalId.eq(hospital_id))
            .one(self.db)
            .await?;

        Ok(asset)
    }

    /// Update the mutable fields of an asset within a hospital scope
    pub async fn update_scoped(
        &self,
        hospital_id: Uuid,
        id: Uuid,
        changes: AssetChanges,
    ) -> Result<AssetModel, RepoError> {
        let existing = Asset::find_by_id(id)
            .filter(asset::Column::HospitalId.eq(hospital_id))
            .one(self.db)
            .await?
            .ok_or(RepoError::NotFound)?;

        let mut model = existing.into_active_model();
        model.name = Set(changes.name);
        model.description = Set(changes.description);
        model.value = Set(changes.value);
        model.status = Set(changes.status);
        if let Some(image_url) = changes.image_url {
            model.image_url = Set(image_url);
        }
        model.updated_at = Set(Utc::now().into());

        let updated = model.update(self.db).await?;
        Ok(updated)
    }

    /// Delete an asset within a hospital scope
    pub async fn delete_scoped(&self, hospital_id: Uuid, id: Uuid) -> Result<(), RepoError> {
        let result = Asset::delete_by_id(id)
            .filter(asset::Column::HospitalId.eq(hospital_id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
