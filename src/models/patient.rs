//! Patient entity model
//!
//! This module contains the SeaORM entity model for the patients table, which
//! stores hospital-scoped patient records.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

/// Patient entity scoped to the owning hospital
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "patients")]
pub struct Model {
    /// Unique identifier for the patient (primary key)
    #[sea_orm(primary_key)]
    pub id: Uuid,

    /// Hospital that owns this record; set server-side, never from payload
    pub hospital_id: Uuid,

    /// User who registered the patient
    pub served_by: Uuid,

    /// Patient full name
    pub full_name: String,

    /// Email address (optional)
    pub email: Option<String>,

    /// Primary telephone number
    pub tel1: String,

    /// Secondary telephone number (optional)
    pub tel2: Option<String>,

    /// Identity card number
    pub identity_no: String,

    /// Date of birth
    pub dob: Date,

    /// Sex (one of `male`, `female`, `other`)
    pub sex: String,

    /// Home location
    pub location: String,

    /// Medical history notes (optional)
    pub medical_history: Option<String>,

    /// Free-form notes (optional)
    pub notes: Option<String>,

    /// Who referred the patient (optional)
    pub referred_by: Option<String>,

    /// Timestamp when the patient was registered; default list ordering key
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::hospital::Entity",
        from = "Column::HospitalId",
        to = "super::hospital::Column::Id"
    )]
    Hospital,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ServedBy",
        to = "super::user::Column::Id"
    )]
    ServedBy,
}

impl Related<super::hospital::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hospital.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
