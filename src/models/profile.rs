//! Profile entity model
//!
//! This module contains the SeaORM entity model for the profiles table. A
//! profile is keyed one-to-one by user id and carries the role plus the
//! hospital assignment that scopes all tenant-bound operations.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Profile entity carrying role and hospital assignment per user
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    /// User this profile belongs to (primary key, one-to-one)
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: Uuid,

    /// Email cached from the identity provider on every session resolution
    pub email: Option<String>,

    /// Full name entered through the staff management view
    pub full_name: Option<String>,

    /// Primary contact number
    pub contact1: Option<String>,

    /// Secondary contact number
    pub contact2: Option<String>,

    /// Stored role text; parsed into [`crate::models::StaffRole`] at the edge
    pub role: String,

    /// Assigned hospital; the scoping key for every tenant-bound operation
    pub hospital_id: Option<Uuid>,

    /// Timestamp when the profile was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the profile was last updated
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
    #[sea_orm(
        belongs_to = "super::hospital::Entity",
        from = "Column::HospitalId",
        to = "super::hospital::Column::Id"
    )]
    Hospital,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::hospital::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hospital.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
