//! # Hospital Repository
//!
//! Persistence for hospital (tenant) records. Hospitals are global entities:
//! reads are not tenant-filtered, and mutation access is decided at the
//! mutator layer, not here.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use uuid::Uuid;

use crate::models::hospital::{self, Entity as Hospital, Model as HospitalModel};
use crate::repositories::RepoError;

/// Validated hospital fields shared by create and update.
#[derive(Debug, Clone)]
pub struct HospitalRecord {
    pub name: String,
    pub location: String,
    pub registration_no: String,
    pub incharge: Option<String>,
}

/// Repository for hospital database operations
pub struct HospitalRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> HospitalRepository<'a> {
    /// Create a new HospitalRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Register a new hospital owned by the given user
    pub async fn create(
        &self,
        user_id: Uuid,
        record: HospitalRecord,
    ) -> Result<HospitalModel, RepoError> {
        let now = Utc::now();
        let hospital = hospital::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(record.name),
            location: Set(record.location),
            registration_no: Set(record.registration_no),
            incharge: Set(record.incharge),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let result = hospital.insert(self.db).await?;
        Ok(result)
    }

    /// List all hospitals, newest first
    pub async fn list(&self) -> Result<Vec<HospitalModel>, RepoError> {
        let hospitals = Hospital::find()
            .order_by_desc(hospital::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(hospitals)
    }

    /// Get a hospital by id
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<HospitalModel>, RepoError> {
        let hospital = Hospital::find_by_id(id).one(self.db).await?;
        Ok(hospital)
    }

    /// Check whether a hospital exists
    pub async fn exists(&self, id: Uuid) -> Result<bool, RepoError> {
        Ok(self.get_by_id(id).await?.is_some())
    }

    /// Replace the mutable fields of a hospital
    pub async fn update(
        &self,
        id: Uuid,
        record: HospitalRecord,
    ) -> Result<HospitalModel, RepoError> {
        let existing = Hospital::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(RepoError::NotFound)?;

        let mut model = existing.into_active_model();
        model.name = Set(record.name);
        model.location = Set(record.location);
        model.registration_no = Set(record.registration_no);
        model.incharge = Set(record.incharge);
        model.updated_at = Set(Utc::now().into());

        let updated = model.update(self.db).await?;
        Ok(updated)
    }

    /// Delete a hospital
    pub async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = Hospital::delete_by_id(id).exec(self.db).await?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
