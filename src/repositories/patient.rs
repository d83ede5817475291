//! # Patient Repository
//!
//! Tenant-scoped persistence for patient records. Every read and write
//! filters on the owning hospital column; a row outside the caller's hospital
//! is indistinguishable from a missing one.

use chrono::Utc;
use sea_orm::prelude::Date;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::models::patient::{self, Entity as Patient, Model as PatientModel};
use crate::repositories::RepoError;

/// Validated patient fields shared by create and update.
#[derive(Debug, Clone)]
pub struct PatientRecord {
    pub full_name: String,
    pub email: Option<String>,
    pub tel1: String,
    pub tel2: Option<String>,
    pub identity_no: String,
    pub dob: Date,
    pub sex: String,
    pub location: String,
    pub medical_history: Option<String>,
    pub notes: Option<String>,
    pub referred_by: Option<String>,
}

/// Repository for patient database operations
pub struct PatientRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PatientRepository<'a> {
    /// Create a new PatientRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Insert a patient owned by the given hospital.
    ///
    /// The hospital id always comes from the caller's resolved assignment,
    /// never from client input.
    pub async fn create(
        &self,
        hospital_id: Uuid,
        served_by: Uuid,
        record: PatientRecord,
    ) -> Result<PatientModel, RepoError> {
        let patient = patient::ActiveModel {
            id: Set(Uuid::new_v4()),
            hospital_id: Set(hospital_id),
            served_by: Set(served_by),
            full_name: Set(record.full_name),
            email: Set(record.email),
            tel1: Set(record.tel1),
            tel2: Set(record.tel2),
            identity_no: Set(record.identity_no),
            dob: Set(record.dob),
            sex: Set(record.sex),
            location: Set(record.location),
            medical_history: Set(record.medical_history),
            notes: Set(record.notes),
            referred_by: Set(record.referred_by),
            created_at: Set(Utc::now().into()),
        };

        let result = patient.insert(self.db).await?;
        Ok(result)
    }

    /// List all patients for a hospital, newest first
    pub async fn list_by_hospital(
        &self,
        hospital_id: Uuid,
    ) -> Result<Vec<PatientModel>, RepoError> {
        let patients = Patient::find()
            .filter(patient::Column::HospitalId.eq(hospital_id))
            .order_by_desc(patient::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(patients)
    }

    /// Find a patient by id within a hospital scope
    pub async fn find_scoped(
        &self,
        hospital_id: Uuid,
        id: Uuid,
    ) -> Result<Option<PatientModel>, RepoError> {
        let patient = Patient::find_by_id(id)
            .filter(patient::Column::HospitalId.eq(hospital_id))
            .one(self.db)
            .await?;

        Ok(patient)
    }

    /// Replace the mutable fields of a patient within a hospital scope.
    ///
    /// The hospital column itself is never touched by an update.
    pub async fn update_scoped(
        &self,
        hospital_id: Uuid,
        id: Uuid,
        record: PatientRecord,
    ) -> Result<PatientModel, RepoError> {
        let existing = Patient::find_by_id(id)
            .filter(patient::Column::HospitalId.eq(hospital_id))
            .one(self.db)
            .await?
            .ok_or(RepoError::NotFound)?;

        let mut model = existing.into_active_model();
        model.full_name = Set(record.full_name);
        model.email = Set(record.email);
        model.tel1 = Set(record.tel1);
        model.tel2 = Set(record.tel2);
        model.identity_no = Set(record.identity_no);
        model.dob = Set(record.dob);
        model.sex = Set(record.sex);
        model.location = Set(record.location);
        model.medical_history = Set(record.medical_history);
        model.notes = Set(record.notes);
        model.referred_by = Set(record.referred_by);

        let updated = model.update(self.db).await?;
        Ok(updated)
    }

    /// Delete a patient within a hospital scope
    pub async fn delete_scoped(&self, hospital_id: Uuid, id: Uuid) -> Result<(), RepoError> {
        let result = Patient::delete_by_id(id)
            .filter(patient::Column::HospitalId.eq(hospital_id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
