//! Asset entity model
//!
//! This module contains the SeaORM entity model for the assets table, which
//! stores hospital-scoped equipment records with an image reference.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Asset entity scoped to the owning hospital
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assets")]
pub struct Model {
    /// Unique identifier for the asset (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Hospital that owns this record; set server-side, never from payload
    pub hospital_id: Uuid,

    /// Asset name
    pub name: String,

    /// Asset description
    pub description: String,

    /// Monetary value; strictly positive
    pub value: f64,

    /// Condition status (one of `good`, `working`, `bad`)
    pub status: String,

    /// Durable URL returned by the image host (never raw bytes)
    pub image_url: String,

    /// Timestamp when the asset was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the asset was last updated
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
