//! # Repositories
//!
//! This module contains the repository implementations that encapsulate all
//! SeaORM operations. Tenant-scoped repositories (patients, assets,
//! suppliers) filter every read and write on the owning hospital column.

pub mod asset;
pub mod hospital;
pub mod patient;
pub mod profile;
pub mod role;
pub mod supplier;

pub use asset::AssetRepository;
pub use hospital::HospitalRepository;
pub use patient::PatientRepository;
pub use profile::ProfileRepository;
pub use role::RoleRepository;
pub use supplier::SupplierRepository;

/// Errors surfaced by repository operations.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// No matching row for the requested id within the query's scope. For
    /// tenant-scoped entities this covers both "does not exist" and "belongs
    /// to another hospital" — callers decide how much of that to reveal.
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
}

impl From<RepoError> for crate::error::ApiError {
    fn from(err: RepoError) -> Self {
        match err {
            // Default to the uniform denial; tenant-aware callers map this
            // through the gate instead for internal logging.
            RepoError::NotFound => crate::error::record_access_denied(),
            RepoError::Db(db_err) => db_err.into(),
        }
    }
}
