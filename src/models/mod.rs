//! # Data Models
//!
//! This module contains all the data models used throughout the hospital
//! administration API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod asset;
pub mod hospital;
pub mod patient;
pub mod profile;
pub mod role;
pub mod supplier;
pub mod user;

pub use asset::Entity as Asset;
pub use hospital::Entity as Hospital;
pub use patient::Entity as Patient;
pub use profile::Entity as Profile;
pub use role::Entity as Role;
pub use supplier::Entity as Supplier;
pub use user::Entity as User;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "hospadmin".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Staff role parsed from the profile's stored text value.
///
/// The store keeps the role as free text; parsing it into a tagged value keeps
/// the admin gate an exhaustive match while still round-tripping custom
/// labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "String", into = "String")]
#[schema(example = "user")]
pub enum StaffRole {
    Admin,
    User,
    /// Any other label applied through the staff management view.
    Custom(String),
}

impl From<String> for StaffRole {
    fn from(value: String) -> Self {
        StaffRole::parse(&value)
    }
}

impl From<StaffRole> for String {
    fn from(role: StaffRole) -> Self {
        role.as_str().to_string()
    }
}

impl StaffRole {
    /// Parse a stored role value. Blank input falls back to `user`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" => StaffRole::User,
            "admin" => StaffRole::Admin,
            "user" => StaffRole::User,
            other => StaffRole::Custom(other.to_string()),
        }
    }

    /// The stored text form of this role.
    pub fn as_str(&self) -> &str {
        match self {
            StaffRole::Admin => "admin",
            StaffRole::User => "user",
            StaffRole::Custom(label) => label,
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, StaffRole::Admin)
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staff_role_parses_known_and_custom_values() {
        assert_eq!(StaffRole::parse("admin"), StaffRole::Admin);
        assert_eq!(StaffRole::parse("user"), StaffRole::User);
        assert_eq!(StaffRole::parse(""), StaffRole::User);
        assert_eq!(
            StaffRole::parse("staff"),
            StaffRole::Custom("staff".to_string())
        );
    }

    #[test]
    fn staff_role_round_trips_through_text() {
        for raw in ["admin", "user", "staff", "nurse"] {
            assert_eq!(StaffRole::parse(raw).as_str(), raw);
        }
    }

    #[test]
    fn only_admin_passes_the_admin_check() {
        assert!(StaffRole::Admin.is_admin());
        assert!(!StaffRole::User.is_admin());
        assert!(!StaffRole::Custom("administrator".to_string()).is_admin());
    }
}
