//! # Role Repository
//!
//! Persistence for the global role catalog.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder, Set,
};
use uuid::Uuid;

use crate::models::role::{self, Entity as Role, Model as RoleModel};
use crate::repositories::RepoError;

/// Repository for role database operations
pub struct RoleRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> RoleRepository<'a> {
    /// Create a new RoleRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a new role
    pub async fn create(&self, name: String, description: String) -> Result<RoleModel, RepoError> {
        let role = role::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            created_at: Set(Utc::now().into()),
        };

        let result = role.insert(self.db).await?;
        Ok(result)
    }

    /// List all roles, newest first
    pub async fn list(&self) -> Result<Vec<RoleModel>, RepoError> {
        let roles = Role::find()
            .order_by_desc(role::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(roles)
    }

    /// List all roles ordered by name, for the staff management view
    pub async fn list_by_name(&self) -> Result<Vec<RoleModel>, RepoError> {
        let roles = Role::find()
            .order_by_asc(role::Column::Name)
            .all(self.db)
            .await?;

        Ok(roles)
    }

    /// Replace the name and description of a role
    pub async fn update(
        &self,
        id: Uuid,
        name: String,
        description: String,
    ) -> Result<RoleModel, RepoError> {
        let existing = Role::find_by_id(id)
            .one(self.db)
            .await?
            .ok_or(RepoError::NotFound)?;

        let mut model = existing.into_active_model();
        model.name = Set(name);
        model.description = Set(description);

        let updated = model.update(self.db).await?;
        Ok(updated)
    }

    /// Delete a role
    pub async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let result = Role::delete_by_id(id).exec(self.db).await?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
