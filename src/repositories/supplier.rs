//! # Supplier Repository
//!
//! Tenant-scoped persistence for supplier contacts.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::models::supplier::{self, Entity as Supplier, Model as SupplierModel};
use crate::repositories::RepoError;

/// Validated supplier fields shared by create and update.
#[derive(Debug, Clone)]
pub struct SupplierRecord {
    pub name: String,
    pub tel: String,
    pub description: String,
}

/// Repository for supplier database operations
pub struct SupplierRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SupplierRepository<'a> {
    /// Create a new SupplierRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a supplier owned by the given hospital
    pub async fn create(
        &self,
        hospital_id: Uuid,
        record: SupplierRecord,
    ) -> Result<SupplierModel, RepoError> {
        let now = Utc::now();
        let supplier = supplier::ActiveModel {
            id: Set(Uuid::new_v4()),
            hospital_id: Set(hospital_id),
            name: Set(record.name),
            tel: Set(record.tel),
            description: Set(record.description),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        let result = supplier.insert(self.db).await?;
        Ok(result)
    }

    /// List all suppliers for a hospital, newest first
    pub async fn list_by_hospital(
        &self,
        hospital_id: Uuid,
    ) -> Result<Vec<SupplierModel>, RepoError> {
        let suppliers = Supplier::find()
            .filter(supplier::Column::HospitalId.eq(hospital_id))
            .order_by_desc(supplier::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(suppliers)
    }

    /// Find a supplier by id within a hospital scope
    pub async fn find_scoped(
        &self,
        hospital_id: Uuid,
        id: Uuid,
    ) -> Result<Option<SupplierModel>, RepoError> {
        let supplier = Supplier::find_by_id(id)
            .filter(supplier::Column::HospitalId.eq(hospital_id))
            .one(self.db)
            .await?;

        Ok(supplier)
    }

    /// Replace the mutable fields of a supplier within a hospital scope
    pub async fn update_scoped(
        &self,
        hospital_id: Uuid,
        id: Uuid,
        record: SupplierRecord,
    ) -> Result<SupplierModel, RepoError> {
        let existing = Supplier::find_by_id(id)
            .filter(supplier::Column::HospitalId.eq(hospital_id))
            .one(self.db)
            .await?
            .ok_or(RepoError::NotFound)?;

        let mut model = existing.into_active_model();
        model.name = Set(record.name);
        model.tel = Set(record.tel);
        model.description = Set(record.description);
        model.updated_at = Set(Utc::now().into());

        let updated = model.update(self.db).await?;
        Ok(updated)
    }

    /// Delete a supplier within a hospital scope
    pub async fn delete_scoped(&self, hospital_id: Uuid, id: Uuid) -> Result<(), RepoError> {
        let result = Supplier::delete_by_id(id)
            .filter(supplier::Column::HospitalId.eq(hospital_id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
