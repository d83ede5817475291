//! # Tenancy
//!
//! Tenant resolution and the authorization gate. Every tenant-scoped
//! operation re-derives the acting user's hospital from their profile on each
//! request — never from client input — and uses that resolved scope as the
//! exclusive key for reads and writes.
//!
//! Denials are deliberately uninformative: a record in another hospital and a
//! record that does not exist produce the same external response. The
//! difference is only visible in server-side logs.

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::error::{ApiError, no_hospital_assigned, record_access_denied};
use crate::repositories::{ProfileRepository, RepoError};

/// A resolved hospital scope. Constructing one is the only way to reach the
/// tenant-scoped repositories from a mutation, which keeps the derivation
/// path server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HospitalScope(pub Uuid);

/// Outcome of resolving the acting user's hospital assignment.
///
/// `Unassigned` is a first-class result, not an error: list views render a
/// distinct "no hospital assigned" state, and writes refuse to proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantAssignment {
    Assigned(HospitalScope),
    Unassigned,
}

impl TenantAssignment {
    /// Returns the scope for a tenant-bound operation, or the distinct
    /// unassigned denial.
    pub fn require_scope(self) -> Result<HospitalScope, ApiError> {
        match self {
            TenantAssignment::Assigned(scope) => Ok(scope),
            TenantAssignment::Unassigned => {
                metrics::counter!("authz_denials_total", "reason" => "unassigned").increment(1);
                Err(no_hospital_assigned())
            }
        }
    }

    pub fn hospital_id(&self) -> Option<Uuid> {
        match self {
            TenantAssignment::Assigned(HospitalScope(id)) => Some(*id),
            TenantAssignment::Unassigned => None,
        }
    }
}

/// Look up the acting user's hospital assignment from their profile.
///
/// Pure per-request lookup with no caching: assignments can change between
/// requests through staff management.
pub async fn resolve_assignment(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<TenantAssignment, ApiError> {
    let repo = ProfileRepository::new(db);
    let profile = repo.find_by_user_id(user_id).await.map_err(db_failure)?;

    Ok(match profile.and_then(|p| p.hospital_id) {
        Some(hospital_id) => TenantAssignment::Assigned(HospitalScope(hospital_id)),
        None => TenantAssignment::Unassigned,
    })
}

/// Resolve and require a scope in one step, for mutations.
pub async fn require_scope(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<HospitalScope, ApiError> {
    resolve_assignment(db, user_id).await?.require_scope()
}

/// Convert a scoped repository miss into the uniform external denial,
/// recording the internal reason where only operators can see it.
pub fn deny_out_of_scope(entity: &'static str, id: Uuid, err: RepoError) -> ApiError {
    match err {
        RepoError::NotFound => {
            tracing::warn!(entity, record_id = %id, "Denied access to record outside caller's hospital (missing or cross-tenant)");
            metrics::counter!("authz_denials_total", "reason" => "out_of_scope").increment(1);
            record_access_denied()
        }
        RepoError::Db(db_err) => db_err.into(),
    }
}

fn db_failure(err: RepoError) -> ApiError {
    match err {
        RepoError::Db(db_err) => db_err.into(),
        RepoError::NotFound => record_access_denied(),
    }
}
