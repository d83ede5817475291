//! User entity model
//!
//! This module contains the SeaORM entity model for the users table, which
//! mirrors the identity provider's account records.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// User entity mirroring the identity provider's record
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Email address cached from the identity provider
    pub email: Option<String>,

    /// Display name cached from the identity provider
    pub name: Option<String>,

    /// Avatar URL cached from the identity provider
    pub avatar_url: Option<String>,

    /// Timestamp when the user was first seen
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::profile::Entity")]
    Profile,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
