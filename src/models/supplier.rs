//! Supplier entity model
//!
//! This module contains the SeaORM entity model for the suppliers table,
//! which stores hospital-scoped supplier contacts.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Supplier entity scoped to the owning hospital
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "suppliers")]
pub struct Model {
    /// Unique identifier for the supplier (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Hospital that owns this record; set server-side, never from payload
    pub hospital_id: Uuid,

    /// Supplier name
    pub name: String,

    /// Telephone number
    pub tel: String,

    /// Description of goods or services supplied
    pub description: String,

    /// Timestamp when the supplier was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the supplier was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hospital::Entity",
        from = "Column::HospitalId",
        to = "super::hospital::Column::Id"
    )]
    Hospital,
}

impl Related<super::hospital::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hospital.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
