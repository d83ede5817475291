//! Role entity model
//!
//! Roles are a global catalog of labels applied to staff profiles; they are
//! not tenant-scoped.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Role catalog entry
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "roles")]
pub struct Model {
    /// Unique identifier for the role (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Role name (unique)
    pub name: String,

    /// Role description
    pub description: String,

    /// Timestamp when the role was created; default list ordering key
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
