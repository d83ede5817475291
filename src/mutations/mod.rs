//! # Entity Mutators
//!
//! One module per resource type. Every mutation runs the same pipeline:
//! validate the submitted fields, authorize through the tenancy gate, persist
//! through the repository, then report the view to invalidate. Any failure
//! before persistence leaves no stored side effect.
//!
//! The acting identity is passed in explicitly; mutators never read ambient
//! session state, which keeps them unit-testable without a live session
//! provider.

use serde::Serialize;
use utoipa::ToSchema;

use crate::error::ApiError;

pub mod asset;
pub mod hospital;
pub mod patient;
pub mod role;
pub mod staff;
pub mod supplier;

/// View keys reported by successful mutations. The presentation layer decides
/// how to act on one (re-render, refetch, or navigate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ViewKey {
    Patients,
    Assets,
    Suppliers,
    Hospitals,
    Staff,
    Roles,
}

impl ViewKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewKey::Patients => "patients",
            ViewKey::Assets => "assets",
            ViewKey::Suppliers => "suppliers",
            ViewKey::Hospitals => "hospitals",
            ViewKey::Staff => "staff",
            ViewKey::Roles => "roles",
        }
    }
}

/// Result of a successful mutation: the persisted record plus the explicit
/// invalidation signal.
#[derive(Debug)]
pub struct MutationOutcome<T> {
    pub record: T,
    pub invalidated: ViewKey,
}

/// Collector for per-field validation problems across a submitted form.
///
/// Every field arrives as an untrusted string and is trimmed before any
/// check; the collected map becomes the `details` of a single validation
/// error so the caller can render inline feedback.
#[derive(Debug, Default)]
pub struct FieldErrors {
    errors: serde_json::Map<String, serde_json::Value>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require a non-empty trimmed value, recording a field error otherwise.
    pub fn require(&mut self, field: &str, value: Option<&str>) -> Option<String> {
        match normalize(value) {
            Some(trimmed) => Some(trimmed),
            None => {
                self.reject(field, "Required field cannot be empty");
                None
            }
        }
    }

    /// Record a field-level problem.
    pub fn reject(&mut self, field: &str, message: &str) {
        self.errors
            .insert(field.to_string(), serde_json::Value::String(message.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Finish validation: no errors, or one validation failure carrying all
    /// of them.
    pub fn finish(self) -> Result<(), ApiError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(crate::error::validation_error(
                "All required fields must be filled",
                serde_json::Value::Object(self.errors),
            ))
        }
    }
}

/// Trim an optional form value, mapping blank input to `None`.
pub fn normalize(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_drops_blank_values() {
        assert_eq!(normalize(Some("  ward 4  ")), Some("ward 4".to_string()));
        assert_eq!(normalize(Some("   ")), None);
        assert_eq!(normalize(None), None);
    }

    #[test]
    fn field_errors_collect_all_problems() {
        let mut errors = FieldErrors::new();
        assert!(errors.require("name", Some("Main Wing")).is_some());
        assert!(errors.require("tel", Some("  ")).is_none());
        errors.reject("status", "Invalid status value");

        let err = errors.finish().unwrap_err();
        assert_eq!(err.code, Box::from("VALIDATION_FAILED"));
        let details = err.details.unwrap();
        assert!(details.get("tel").is_some());
        assert!(details.get("status").is_some());
        assert!(details.get("name").is_none());
    }

    #[test]
    fn view_keys_render_stable_strings() {
        assert_eq!(ViewKey::Patients.as_str(), "patients");
        assert_eq!(
            serde_json::to_value(ViewKey::Suppliers).unwrap(),
            serde_json::json!("suppliers")
        );
    }
}
