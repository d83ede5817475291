//! Staff mutator: idempotent profile upsert keyed by user id, profile
//! removal, and the combined directory for the staff management view.
//!
//! "Create" and "update" collapse into a single upsert: a profile always
//! exists once a user has signed in, so the operation is keyed by user id
//! rather than a separate entity id.

use sea_orm::DatabaseConnection;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ApiError, ErrorType};
use crate::models::hospital::Model as HospitalModel;
use crate::models::profile::Model as ProfileModel;
use crate::models::role::Model as RoleModel;
use crate::models::user::Model as UserModel;
use crate::mutations::{FieldErrors, MutationOutcome, ViewKey, normalize};
use crate::repositories::profile::{ProfileRepository, StaffProfileUpdate};
use crate::repositories::{HospitalRepository, RepoError, RoleRepository};
use crate::session::CurrentUser;

/// Role applied when the staff form leaves the role blank.
const DEFAULT_STAFF_ROLE: &str = "staff";

/// Flat form payload for the staff upsert.
#[derive(Debug, Default, Clone, Deserialize, ToSchema)]
pub struct StaffForm {
    /// User the profile belongs to
    pub user_id: Option<String>,
    pub full_name: Option<String>,
    pub contact1: Option<String>,
    pub contact2: Option<String>,
    /// Role label; defaults to `staff` when blank
    pub role: Option<String>,
    /// Hospital assignment; clears the assignment when absent
    pub hospital_id: Option<String>,
}

#[derive(Debug)]
struct ValidatedStaff {
    user_id: Uuid,
    update: StaffProfileUpdate,
}

fn validate(form: &StaffForm) -> Result<ValidatedStaff, ApiError> {
    let mut errors = FieldErrors::new();

    let user_id = match errors.require("user_id", form.user_id.as_deref()) {
        Some(raw) => match raw.parse::<Uuid>() {
            Ok(id) => Some(id),
            Err(_) => {
                errors.reject("user_id", "Must be a valid UUID");
                None
            }
        },
        None => None,
    };

    let hospital_id = match normalize(form.hospital_id.as_deref()) {
        Some(raw) => match raw.parse::<Uuid>() {
            Ok(id) => Some(Some(id)),
            Err(_) => {
                errors.reject("hospital_id", "Must be a valid UUID");
                None
            }
        },
        None => Some(None),
    };

    errors.finish()?;

    let role = normalize(form.role.as_deref()).unwrap_or_else(|| DEFAULT_STAFF_ROLE.to_string());

    Ok(ValidatedStaff {
        user_id: user_id.unwrap(),
        update: StaffProfileUpdate {
            full_name: normalize(form.full_name.as_deref()),
            contact1: normalize(form.contact1.as_deref()),
            contact2: normalize(form.contact2.as_deref()),
            role,
            hospital_id: hospital_id.unwrap(),
        },
    })
}

/// Apply staff fields for a user, creating or updating the profile in place.
/// Calling this twice with the same user id leaves exactly one profile row
/// with the latest fields.
pub async fn save_staff(
    db: &DatabaseConnection,
    _user: &CurrentUser,
    form: StaffForm,
) -> Result<MutationOutcome<ProfileModel>, ApiError> {
    let validated = validate(&form)?;

    // A dangling assignment would silently strand the staff member; surface
    // it as a field error instead.
    if let Some(hospital_id) = validated.update.hospital_id {
        let hospitals = HospitalRepository::new(db);
        if !hospitals.exists(hospital_id).await? {
            let mut errors = FieldErrors::new();
            errors.reject("hospital_id", "Unknown hospital");
            errors.finish()?;
        }
    }

    let repo = ProfileRepository::new(db);
    let profile = repo.upsert_staff(validated.user_id, validated.update).await?;

    metrics::counter!("mutations_total", "entity" => "staff", "op" => "upsert").increment(1);
    tracing::info!(user_id = %profile.user_id, "Staff profile saved");

    Ok(MutationOutcome {
        record: profile,
        invalidated: ViewKey::Staff,
    })
}

/// Remove the profile for a user id.
pub async fn delete_staff(
    db: &DatabaseConnection,
    _user: &CurrentUser,
    user_id: Uuid,
) -> Result<MutationOutcome<()>, ApiError> {
    let repo = ProfileRepository::new(db);
    repo.delete_by_user_id(user_id).await.map_err(|err| -> ApiError {
        match err {
            RepoError::NotFound => ErrorType::NotFound.into(),
            RepoError::Db(db_err) => db_err.into(),
        }
    })?;

    metrics::counter!("mutations_total", "entity" => "staff", "op" => "delete").increment(1);
    tracing::info!(user_id = %user_id, "Staff profile deleted");

    Ok(MutationOutcome {
        record: (),
        invalidated: ViewKey::Staff,
    })
}

/// Combined listing backing the staff management view: users with an email,
/// their profiles, the role catalog, and the hospitals they can be assigned
/// to.
#[derive(Debug)]
pub struct StaffDirectory {
    pub users: Vec<UserModel>,
    pub profiles: Vec<ProfileModel>,
    pub roles: Vec<RoleModel>,
    pub hospitals: Vec<HospitalModel>,
}

/// Load the staff directory. Global data, open to any authenticated identity.
pub async fn list_staff(
    db: &DatabaseConnection,
    _user: &CurrentUser,
) -> Result<StaffDirectory, ApiError> {
    let profiles_repo = ProfileRepository::new(db);
    let roles_repo = RoleRepository::new(db);
    let hospitals_repo = HospitalRepository::new(db);

    let users = profiles_repo.list_users_with_email().await?;
    let profiles = profiles_repo.list_profiles().await?;
    let roles = roles_repo.list_by_name().await?;
    let mut hospitals = hospitals_repo.list().await?;
    hospitals.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(StaffDirectory {
        users,
        profiles,
        roles,
        hospitals,
    })
}
