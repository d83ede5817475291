//! # Profile Repository
//!
//! Persistence for user mirrors and their one-to-one profiles. Profiles are
//! created lazily on first session resolution and upserted afterwards to keep
//! the cached email in sync with the identity provider.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::models::profile::{
    ActiveModel as ProfileActiveModel, Entity as Profile, Model as ProfileModel,
};
use crate::models::user::{ActiveModel as UserActiveModel, Entity as User, Model as UserModel};
use crate::repositories::RepoError;
use crate::session::ProviderIdentity;

/// Staff fields applied through the idempotent upsert keyed by user id.
#[derive(Debug, Clone)]
pub struct StaffProfileUpdate {
    pub full_name: Option<String>,
    pub contact1: Option<String>,
    pub contact2: Option<String>,
    pub role: String,
    pub hospital_id: Option<Uuid>,
}

/// Repository for user and profile database operations
pub struct ProfileRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new ProfileRepository with the given database connection
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Get the profile for a user id
    pub async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ProfileModel>, RepoError> {
        let profile = Profile::find_by_id(user_id).one(self.db).await?;
        Ok(profile)
    }

    /// Mirror a freshly resolved identity into the users and profiles tables.
    ///
    /// First resolution inserts both rows (profile role defaults to `user`);
    /// later resolutions refresh the cached identity fields so the identity
    /// provider stays the authoritative source. Returns the profile.
    pub async fn sync_identity(
        &self,
        identity: &ProviderIdentity,
    ) -> Result<ProfileModel, RepoError> {
        let now = Utc::now();

        match User::find_by_id(identity.id).one(self.db).await? {
            Some(existing) => {
                let mut user = existing.into_active_model();
                user.email = Set(identity.email.clone());
                user.name = Set(identity.name.clone());
                user.avatar_url = Set(identity.avatar_url.clone());
                user.update(self.db).await?;
            }
            None => {
                let user = UserActiveModel {
                    id: Set(identity.id),
                    email: Set(identity.email.clone()),
                    name: Set(identity.name.clone()),
                    avatar_url: Set(identity.avatar_url.clone()),
                    created_at: Set(now.into()),
                };
                user.insert(self.db).await?;
            }
        }

        let profile = match Profile::find_by_id(identity.id).one(self.db).await? {
            Some(existing) => {
                let mut profile = existing.into_active_model();
                profile.email = Set(identity.email.clone());
                profile.updated_at = Set(now.into());
                profile.update(self.db).await?
            }
            None => {
                let profile = ProfileActiveModel {
                    user_id: Set(identity.id),
                    email: Set(identity.email.clone()),
                    full_name: Set(None),
                    contact1: Set(None),
                    contact2: Set(None),
                    role: Set("user".to_string()),
                    hospital_id: Set(None),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                };
                let inserted = profile.insert(self.db).await?;
                tracing::info!(user_id = %identity.id, "Created profile for new user");
                inserted
            }
        };

        Ok(profile)
    }

    /// Apply staff fields for a user id, creating the profile if it does not
    /// exist yet. Calling this twice with the same user id leaves exactly one
    /// row with the latest fields applied.
    pub async fn upsert_staff(
        &self,
        user_id: Uuid,
        update: StaffProfileUpdate,
    ) -> Result<ProfileModel, RepoError> {
        let now = Utc::now();

        let profile = match Profile::find_by_id(user_id).one(self.db).await? {
            Some(existing) => {
                let mut profile = existing.into_active_model();
                profile.full_name = Set(update.full_name);
                profile.contact1 = Set(update.contact1);
                profile.contact2 = Set(update.contact2);
                profile.role = Set(update.role);
                profile.hospital_id = Set(update.hospital_id);
                profile.updated_at = Set(now.into());
                profile.update(self.db).await?
            }
            None => {
                let profile = ProfileActiveModel {
                    user_id: Set(user_id),
                    email: Set(None),
                    full_name: Set(update.full_name),
                    contact1: Set(update.contact1),
                    contact2: Set(update.contact2),
                    role: Set(update.role),
                    hospital_id: Set(update.hospital_id),
                    created_at: Set(now.into()),
                    updated_at: Set(now.into()),
                };
                profile.insert(self.db).await?
            }
        };

        Ok(profile)
    }

    /// Remove the profile for a user id
    pub async fn delete_by_user_id(&self, user_id: Uuid) -> Result<(), RepoError> {
        let result = Profile::delete_by_id(user_id).exec(self.db).await?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    /// List all profiles ordered by creation time
    pub async fn list_profiles(&self) -> Result<Vec<ProfileModel>, RepoError> {
        let profiles = Profile::find()
            .order_by_asc(crate::models::profile::Column::CreatedAt)
            .all(self.db)
            .await?;

        Ok(profiles)
    }

    /// List users that have an email, ordered by email, for the staff
    /// management view.
    pub async fn list_users_with_email(&self) -> Result<Vec<UserModel>, RepoError> {
        let users = User::find()
            .filter(crate::models::user::Column::Email.is_not_null())
            .order_by_asc(crate::models::user::Column::Email)
            .all(self.db)
            .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::MigratorTrait;
    use sea_orm::Database;

    async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        // Fixtures insert profiles without the full relation graph.
        use sea_orm::{ConnectionTrait, Statement};
        db.execute(Statement::from_string(
            db.get_database_backend(),
            "PRAGMA foreign_keys = OFF".to_string(),
        ))
        .await
        .unwrap();
        db
    }

    fn identity(id: Uuid, email: &str) -> ProviderIdentity {
        ProviderIdentity {
            id,
            email: Some(email.to_string()),
            name: Some("Test User".to_string()),
            avatar_url: None,
        }
    }

    #[tokio::test]
    async fn first_sync_creates_user_and_profile_with_default_role() {
        let db = setup_test_db().await;
        let repo = ProfileRepository::new(&db);

        let user_id = Uuid::new_v4();
        let profile = repo
            .sync_identity(&identity(user_id, "nurse@example.com"))
            .await
            .unwrap();

        assert_eq!(profile.user_id, user_id);
        assert_eq!(profile.role, "user");
        assert_eq!(profile.email.as_deref(), Some("nurse@example.com"));
        assert!(profile.hospital_id.is_none());
    }

    #[tokio::test]
    async fn later_sync_refreshes_email_without_touching_role() {
        let db = setup_test_db().await;
        let repo = ProfileRepository::new(&db);
        let user_id = Uuid::new_v4();

        repo.sync_identity(&identity(user_id, "old@example.com"))
            .await
            .unwrap();

        // Promote through the staff upsert, then resolve a session again.
        repo.upsert_staff(
            user_id,
            StaffProfileUpdate {
                full_name: Some("Jo Staff".to_string()),
                contact1: None,
                contact2: None,
                role: "admin".to_string(),
                hospital_id: None,
            },
        )
        .await
        .unwrap();

        let profile = repo
            .sync_identity(&identity(user_id, "new@example.com"))
            .await
            .unwrap();

        assert_eq!(profile.email.as_deref(), Some("new@example.com"));
        assert_eq!(profile.role, "admin");
        assert_eq!(profile.full_name.as_deref(), Some("Jo Staff"));
    }

    #[tokio::test]
    async fn staff_upsert_is_idempotent_per_user_id() {
        let db = setup_test_db().await;
        let repo = ProfileRepository::new(&db);
        let user_id = Uuid::new_v4();

        repo.upsert_staff(
            user_id,
            StaffProfileUpdate {
                full_name: Some("First".to_string()),
                contact1: Some("0700000001".to_string()),
                contact2: None,
                role: "staff".to_string(),
                hospital_id: None,
            },
        )
        .await
        .unwrap();

        repo.upsert_staff(
            user_id,
            StaffProfileUpdate {
                full_name: Some("Second".to_string()),
                contact1: Some("0700000002".to_string()),
                contact2: Some("0700000003".to_string()),
                role: "staff".to_string(),
                hospital_id: None,
            },
        )
        .await
        .unwrap();

        let profiles = repo.list_profiles().await.unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].full_name.as_deref(), Some("Second"));
        assert_eq!(profiles[0].contact1.as_deref(), Some("0700000002"));
    }

    #[tokio::test]
    async fn delete_missing_profile_reports_not_found() {
        let db = setup_test_db().await;
        let repo = ProfileRepository::new(&db);

        let result = repo.delete_by_user_id(Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
