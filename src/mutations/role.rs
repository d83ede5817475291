//! Role mutator: validation and persistence for the global role catalog.

use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, ErrorType};
use crate::models::role::Model as RoleModel;
use crate::mutations::{FieldErrors, MutationOutcome, ViewKey};
use crate::repositories::{RepoError, RoleRepository};
use crate::session::CurrentUser;

/// Flat form payload for creating or updating a role.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct RoleForm {
    pub name: Option<String>,
    pub description: Option<String>,
}

fn validate(form: &RoleForm) -> Result<(String, String), ApiError> {
    let mut errors = FieldErrors::new();

    let name = errors.require("name", form.name.as_deref());
    let description = errors.require("description", form.description.as_deref());

    errors.finish()?;

    Ok((name.unwrap(), description.unwrap()))
}

fn map_role_miss(err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound => ErrorType::NotFound.into(),
        RepoError::Db(db_err) => db_err.into(),
    }
}

/// List all roles, newest first.
pub async fn list_roles(
    db: &DatabaseConnection,
    _user: &CurrentUser,
) -> Result<Vec<RoleModel>, ApiError> {
    let repo = RoleRepository::new(db);
    let roles = repo.list().await?;
    Ok(roles)
}

/// Add a role to the catalog.
pub async fn create_role(
    db: &DatabaseConnection,
    _user: &CurrentUser,
    form: RoleForm,
) -> Result<MutationOutcome<RoleModel>, ApiError> {
    let (name, description) = validate(&form)?;

    let repo = RoleRepository::new(db);
    let created = repo.create(name, description).await?;

    metrics::counter!("mutations_total", "entity" => "role", "op" => "create").increment(1);
    tracing::info!(role_id = %created.id, "Role created");

    Ok(MutationOutcome {
        record: created,
        invalidated: ViewKey::Roles,
    })
}

/// Rename or re-describe a role.
pub async fn update_role(
    db: &DatabaseConnection,
    _user: &CurrentUser,
    role_id: Uuid,
    form: RoleForm,
) -> Result<MutationOutcome<RoleModel>, ApiError> {
    let (name, description) = validate(&form)?;

    let repo = RoleRepository::new(db);
    let updated = repo
        .update(role_id, name, description)
        .await
        .map_err(map_role_miss)?;

    metrics::counter!("mutations_total", "entity" => "role", "op" => "update").increment(1);
    tracing::info!(role_id = %updated.id, "Role updated");

    Ok(MutationOutcome {
        record: updated,
        invalidated: ViewKey::Roles,
    })
}

/// Remove a role from the catalog.
pub async fn delete_role(
    db: &DatabaseConnection,
    _user: &CurrentUser,
    role_id: Uuid,
) -> Result<MutationOutcome<()>, ApiError> {
    let repo = RoleRepository::new(db);
    repo.delete(role_id).await.map_err(map_role_miss)?;

    metrics::counter!("mutations_total", "entity" => "role", "op" => "delete").increment(1);
    tracing::info!(role_id = %role_id, "Role deleted");

    Ok(MutationOutcome {
        record: (),
        invalidated: ViewKey::Roles,
    })
}
