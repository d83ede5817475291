//! # Session Resolution
//!
//! Resolves an inbound request into an authenticated identity by delegating
//! token verification to the external session provider. No independent
//! cryptographic logic lives here: the provider is a trusted oracle.
//!
//! On every successful resolution the provider's user record is mirrored into
//! the local users/profiles tables (first resolution creates the profile with
//! the default `user` role; later resolutions keep the cached email in sync).
//! Requests without a valid session are treated as anonymous, not as errors —
//! handlers that need an identity reject them through the [`CurrentUser`]
//! extractor.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::error::{ApiError, unauthorized};
use crate::models::StaffRole;
use crate::repositories::ProfileRepository;
use crate::server::AppState;

/// Identity as vouched for by the session provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderIdentity {
    /// Stable user id
    pub id: Uuid,
    /// Email address
    pub email: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Avatar URL
    pub avatar_url: Option<String>,
}

/// External session provider boundary.
///
/// `Ok(None)` means "no valid session" and must be treated as anonymous;
/// `Err` means the provider itself could not be reached.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn verify(&self, token: &str) -> anyhow::Result<Option<ProviderIdentity>>;
}

/// Session provider that verifies tokens against an HTTP identity endpoint.
pub struct HttpSessionProvider {
    client: reqwest::Client,
    verify_url: Url,
}

impl HttpSessionProvider {
    pub fn new(verify_url: Url, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, verify_url })
    }
}

#[async_trait]
impl SessionProvider for HttpSessionProvider {
    async fn verify(&self, token: &str) -> anyhow::Result<Option<ProviderIdentity>> {
        let response = self
            .client
            .get(self.verify_url.clone())
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let identity = response.json::<ProviderIdentity>().await?;
            Ok(Some(identity))
        } else if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::NOT_FOUND
        {
            Ok(None)
        } else {
            Err(anyhow::anyhow!(
                "session provider returned unexpected status {}",
                status
            ))
        }
    }
}

/// In-memory session provider for the local profile and tests.
#[derive(Debug, Default)]
pub struct StaticSessionProvider {
    identities: HashMap<String, ProviderIdentity>,
}

impl StaticSessionProvider {
    pub fn new(identities: HashMap<String, ProviderIdentity>) -> Self {
        Self { identities }
    }

    pub fn with_identity(mut self, token: &str, identity: ProviderIdentity) -> Self {
        self.identities.insert(token.to_string(), identity);
        self
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn verify(&self, token: &str) -> anyhow::Result<Option<ProviderIdentity>> {
        Ok(self.identities.get(token).cloned())
    }
}

/// The acting user for a request: provider identity enriched with the
/// profile's role. Passed explicitly into every mutator call.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub role: StaffRole,
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| unauthorized(None))
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Middleware that resolves the session for every request.
///
/// A missing or rejected token leaves the request anonymous; downstream
/// extractors decide whether that is acceptable.
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = bearer_token(request.headers()) {
        match state.sessions.verify(&token).await {
            Ok(Some(identity)) => {
                let repo = ProfileRepository::new(&state.db);
                match repo.sync_identity(&identity).await {
                    Ok(profile) => {
                        let user = CurrentUser {
                            id: identity.id,
                            email: identity.email,
                            name: identity.name,
                            avatar_url: identity.avatar_url,
                            role: StaffRole::parse(&profile.role),
                        };
                        tracing::debug!(user_id = %user.id, role = %user.role, "Resolved session");
                        request.extensions_mut().insert(user);
                    }
                    Err(err) => {
                        // Fail closed: the request proceeds as anonymous.
                        tracing::error!(user_id = %identity.id, error = ?err, "Failed to mirror identity into profile");
                    }
                }
            }
            Ok(None) => {
                tracing::debug!("Session token rejected by identity provider");
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Session provider unreachable; treating request as anonymous");
            }
        }
    }

    next.run(request).await
}

/// Route-level gate for the admin section.
///
/// Anonymous and non-admin identities are redirected to the public landing
/// location rather than handed an API error.
pub async fn admin_section_gate(request: Request, next: Next) -> Response {
    let is_admin = request
        .extensions()
        .get::<CurrentUser>()
        .is_some_and(|user| user.role.is_admin());

    if !is_admin {
        return Redirect::to("/").into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::server::AppState;
    use crate::upload::StaticImageStore;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        routing::get,
    };
    use migration::MigratorTrait;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_identity(id: Uuid) -> ProviderIdentity {
        ProviderIdentity {
            id,
            email: Some("doctor@example.com".to_string()),
            name: Some("Doc Tor".to_string()),
            avatar_url: None,
        }
    }

    async fn test_state(sessions: StaticSessionProvider) -> AppState {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();

        AppState {
            config: Arc::new(AppConfig::default()),
            db,
            sessions: Arc::new(sessions),
            images: Arc::new(StaticImageStore::default()),
        }
    }

    fn app(state: AppState) -> Router {
        async fn whoami(user: CurrentUser) -> String {
            user.id.to_string()
        }

        async fn landing() -> &'static str {
            "public"
        }

        Router::new()
            .route("/whoami", get(whoami))
            .route(
                "/admin/overview",
                get(landing).layer(axum::middleware::from_fn(admin_section_gate)),
            )
            .layer(axum::middleware::from_fn_with_state(
                state.clone(),
                session_middleware,
            ))
            .with_state(state)
    }

    #[tokio::test]
    async fn missing_token_is_anonymous_and_rejected_by_extractor() {
        let state = test_state(StaticSessionProvider::default()).await;
        let app = app(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_token_is_anonymous() {
        let user_id = Uuid::new_v4();
        let provider =
            StaticSessionProvider::default().with_identity("good-token", test_identity(user_id));
        let app = app(test_state(provider).await);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("Authorization", "Bearer wrong-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_resolves_identity_and_mirrors_profile() {
        let user_id = Uuid::new_v4();
        let provider =
            StaticSessionProvider::default().with_identity("good-token", test_identity(user_id));
        let state = test_state(provider).await;
        let app = app(state.clone());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/whoami")
                    .header("Authorization", "Bearer good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(String::from_utf8_lossy(&body), user_id.to_string());

        // The profile mirror was created with the default role.
        let repo = ProfileRepository::new(&state.db);
        let profile = repo.find_by_user_id(user_id).await.unwrap().unwrap();
        assert_eq!(profile.role, "user");
        assert_eq!(profile.email.as_deref(), Some("doctor@example.com"));
    }

    #[tokio::test]
    async fn admin_section_redirects_non_admins_to_landing() {
        let user_id = Uuid::new_v4();
        let provider =
            StaticSessionProvider::default().with_identity("good-token", test_identity(user_id));
        let app = app(test_state(provider).await);

        // Anonymous request
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin/overview")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers().get("location").unwrap(), "/");

        // Authenticated but not admin
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/overview")
                    .header("Authorization", "Bearer good-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(response.headers().get("location").unwrap(), "/");
    }

    #[tokio::test]
    async fn admin_role_passes_the_section_gate() {
        let user_id = Uuid::new_v4();
        let provider =
            StaticSessionProvider::default().with_identity("admin-token", test_identity(user_id));
        let state = test_state(provider).await;

        // Promote the user before the request resolves the session again.
        let repo = ProfileRepository::new(&state.db);
        repo.sync_identity(&test_identity(user_id)).await.unwrap();
        repo.upsert_staff(
            user_id,
            crate::repositories::profile::StaffProfileUpdate {
                full_name: None,
                contact1: None,
                contact2: None,
                role: "admin".to_string(),
                hospital_id: None,
            },
        )
        .await
        .unwrap();

        let app = app(state);
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/admin/overview")
                    .header("Authorization", "Bearer admin-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
