//! Supplier mutator: validation and tenant-scoped persistence for supplier
//! contacts.

use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::models::supplier::Model as SupplierModel;
use crate::mutations::{FieldErrors, MutationOutcome, ViewKey};
use crate::repositories::supplier::{SupplierRecord, SupplierRepository};
use crate::session::CurrentUser;
use crate::tenancy;

/// Flat form payload for creating or updating a supplier.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct SupplierForm {
    pub name: Option<String>,
    pub tel: Option<String>,
    pub description: Option<String>,
}

fn validate(form: &SupplierForm) -> Result<SupplierRecord, ApiError> {
    let mut errors = FieldErrors::new();

    let name = errors.require("name", form.name.as_deref());
    let tel = errors.require("tel", form.tel.as_deref());
    let description = errors.require("description", form.description.as_deref());

    errors.finish()?;

    Ok(SupplierRecord {
        name: name.unwrap(),
        tel: tel.unwrap(),
        description: description.unwrap(),
    })
}

/// List suppliers for the acting user's hospital, newest first.
pub async fn list_suppliers(
    db: &DatabaseConnection,
    user: &CurrentUser,
) -> Result<Vec<SupplierModel>, ApiError> {
    let scope = tenancy::resolve_assignment(db, user.id)
        .await?
        .require_scope()?;

    let repo = SupplierRepository::new(db);
    let suppliers = repo.list_by_hospital(scope.0).await?;

    Ok(suppliers)
}

/// Create a supplier under the acting user's hospital.
pub async fn create_supplier(
    db: &DatabaseConnection,
    user: &CurrentUser,
    form: SupplierForm,
) -> Result<MutationOutcome<SupplierModel>, ApiError> {
    let record = validate(&form)?;
    let scope = tenancy::require_scope(db, user.id).await?;

    let repo = SupplierRepository::new(db);
    let created = repo.create(scope.0, record).await?;

    metrics::counter!("mutations_total", "entity" => "supplier", "op" => "create").increment(1);
    tracing::info!(supplier_id = %created.id, hospital_id = %scope.0, "Supplier created");

    Ok(MutationOutcome {
        record: created,
        invalidated: ViewKey::Suppliers,
    })
}

/// Update a supplier owned by the acting user's hospital.
pub async fn update_supplier(
    db: &DatabaseConnection,
    user: &CurrentUser,
    supplier_id: Uuid,
    form: SupplierForm,
) -> Result<MutationOutcome<SupplierModel>, ApiError> {
    let record = validate(&form)?;
    let scope = tenancy::require_scope(db, user.id).await?;

    let repo = SupplierRepository::new(db);
    let updated = repo
        .update_scoped(scope.0, supplier_id, record)
        .await
        .map_err(|err| tenancy::deny_out_of_scope("supplier", supplier_id, err))?;

    metrics::counter!("mutations_total", "entity" => "supplier", "op" => "update").increment(1);
    tracing::info!(supplier_id = %updated.id, hospital_id = %scope.0, "Supplier updated");

    Ok(MutationOutcome {
        record: updated,
        invalidated: ViewKey::Suppliers,
    })
}

/// Delete a supplier owned by the acting user's hospital.
pub async fn delete_supplier(
    db: &DatabaseConnection,
    user: &CurrentUser,
    supplier_id: Uuid,
) -> Result<MutationOutcome<()>, ApiError> {
    let scope = tenancy::require_scope(db, user.id).await?;

    let repo = SupplierRepository::new(db);
    repo.delete_scoped(scope.0, supplier_id)
        .await
        .map_err(|err| tenancy::deny_out_of_scope("supplier", supplier_id, err))?;

    metrics::counter!("mutations_total", "entity" => "supplier", "op" => "delete").increment(1);
    tracing::info!(supplier_id = %supplier_id, hospital_id = %scope.0, "Supplier deleted");

    Ok(MutationOutcome {
        record: (),
        invalidated: ViewKey::Suppliers,
    })
}
