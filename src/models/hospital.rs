//! Hospital entity model
//!
//! This module contains the SeaORM entity model for the hospitals table.
//! Hospitals are the tenant boundary for patients, assets and suppliers.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Hospital entity representing a tenant
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "hospitals")]
pub struct Model {
    /// Unique identifier for the hospital (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// User who registered the hospital
    pub user_id: Uuid,

    /// Display name for the hospital
    pub name: String,

    /// Physical location
    pub location: String,

    /// Facility registration number (unique)
    pub registration_no: String,

    /// Designation of the person in charge (optional)
    pub incharge: Option<String>,

    /// Timestamp when the hospital was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the hospital was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::patient::Entity")]
    Patients,
    #[sea_orm(has_many = "super::asset::Entity")]
    Assets,
    #[sea_orm(has_many = "super::supplier::Entity")]
    Suppliers,
}

impl Related<super::patient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Patients.def()
    }
}

impl Related<super::asset::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assets.def()
    }
}

impl Related<super::supplier::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
