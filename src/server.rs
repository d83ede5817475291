//! # Server Configuration
//!
//! This module contains the server setup and configuration for the hospital
//! administration API.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    routing::{delete, get, put},
};
use sea_orm::DatabaseConnection;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::AppConfig;
use crate::handlers;
use crate::session::{self, HttpSessionProvider, SessionProvider, StaticSessionProvider};
use crate::telemetry;
use crate::upload::{HttpImageStore, ImageStore, StaticImageStore};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub db: DatabaseConnection,
    pub sessions: Arc<dyn SessionProvider>,
    pub images: Arc<dyn ImageStore>,
}

/// Creates and configures the Axum application router
pub fn create_app(state: AppState) -> Router {
    let admin_routes = Router::new()
        .route(
            "/api/v1/admin/overview",
            get(handlers::admin::admin_overview),
        )
        .route_layer(axum::middleware::from_fn(session::admin_section_gate));

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/v1/me", get(handlers::me::me))
        .route(
            "/api/v1/patients",
            get(handlers::patients::list_patients).post(handlers::patients::create_patient),
        )
        .route(
            "/api/v1/patients/{id}",
            put(handlers::patients::update_patient).delete(handlers::patients::delete_patient),
        )
        .route(
            "/api/v1/assets",
            get(handlers::assets::list_assets).post(handlers::assets::create_asset),
        )
        .route(
            "/api/v1/assets/{id}",
            put(handlers::assets::update_asset).delete(handlers::assets::delete_asset),
        )
        .route(
            "/api/v1/suppliers",
            get(handlers::suppliers::list_suppliers).post(handlers::suppliers::create_supplier),
        )
        .route(
            "/api/v1/suppliers/{id}",
            put(handlers::suppliers::update_supplier).delete(handlers::suppliers::delete_supplier),
        )
        .route(
            "/api/v1/hospitals",
            get(handlers::hospitals::list_hospitals).post(handlers::hospitals::create_hospital),
        )
        .route(
            "/api/v1/hospitals/{id}",
            put(handlers::hospitals::update_hospital).delete(handlers::hospitals::delete_hospital),
        )
        .route(
            "/api/v1/roles",
            get(handlers::roles::list_roles).post(handlers::roles::create_role),
        )
        .route(
            "/api/v1/roles/{id}",
            put(handlers::roles::update_role).delete(handlers::roles::delete_role),
        )
        .route(
            "/api/v1/staff",
            get(handlers::staff::list_staff).put(handlers::staff::save_staff),
        )
        .route("/api/v1/staff/{user_id}", delete(handlers::staff::delete_staff))
        .merge(admin_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session::session_middleware,
        ))
        .layer(axum::middleware::from_fn(
            telemetry::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()))
}

/// Starts the server with the given configuration
pub async fn run_server(
    config: AppConfig,
    db: DatabaseConnection,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = Arc::new(config);

    let sessions: Arc<dyn SessionProvider> = match &config.session_verify_url {
        Some(url) => Arc::new(HttpSessionProvider::new(
            url.clone(),
            Duration::from_millis(config.session_timeout_ms),
        )?),
        None => {
            tracing::warn!(
                "No session verify URL configured; every request will resolve as anonymous"
            );
            Arc::new(StaticSessionProvider::default())
        }
    };

    let images: Arc<dyn ImageStore> = match &config.image_upload_url {
        Some(url) => Arc::new(HttpImageStore::new(
            url.clone(),
            config.image_api_key.clone(),
        )?),
        None => {
            tracing::warn!("No image upload URL configured; image uploads will be refused");
            Arc::new(StaticImageStore::default())
        }
    };

    let addr = config
        .bind_addr()
        .map_err(|e| format!("Invalid server address: {}", e))?;

    let state = AppState {
        config: Arc::clone(&config),
        db,
        sessions,
        images,
    };
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, profile = %config.profile, "Server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build()),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::root,
        crate::handlers::me::me,
        crate::handlers::patients::list_patients,
        crate::handlers::patients::create_patient,
        crate::handlers::patients::update_patient,
        crate::handlers::patients::delete_patient,
        crate::handlers::assets::list_assets,
        crate::handlers::assets::create_asset,
        crate::handlers::assets::update_asset,
        crate::handlers::assets::delete_asset,
        crate::handlers::suppliers::list_suppliers,
        crate::handlers::suppliers::create_supplier,
        crate::handlers::suppliers::update_supplier,
        crate::handlers::suppliers::delete_supplier,
        crate::handlers::hospitals::list_hospitals,
        crate::handlers::hospitals::create_hospital,
        crate::handlers::hospitals::update_hospital,
        crate::handlers::hospitals::delete_hospital,
        crate::handlers::roles::list_roles,
        crate::handlers::roles::create_role,
        crate::handlers::roles::update_role,
        crate::handlers::roles::delete_role,
        crate::handlers::staff::list_staff,
        crate::handlers::staff::save_staff,
        crate::handlers::staff::delete_staff,
        crate::handlers::admin::admin_overview,
    ),
    components(
        schemas(
            crate::models::ServiceInfo,
            crate::models::StaffRole,
            crate::error::ApiError,
            crate::handlers::DeletionResponse,
            crate::handlers::me::MeResponse,
            crate::handlers::patients::PatientDto,
            crate::handlers::patients::PatientsResponse,
            crate::handlers::patients::PatientMutationResponse,
            crate::handlers::assets::AssetDto,
            crate::handlers::assets::AssetsResponse,
            crate::handlers::assets::AssetMutationResponse,
            crate::handlers::suppliers::SupplierDto,
            crate::handlers::suppliers::SuppliersResponse,
            crate::handlers::suppliers::SupplierMutationResponse,
            crate::handlers::hospitals::HospitalDto,
            crate::handlers::hospitals::HospitalsResponse,
            crate::handlers::hospitals::HospitalMutationResponse,
            crate::handlers::roles::RoleDto,
            crate::handlers::roles::RolesResponse,
            crate::handlers::roles::RoleMutationResponse,
            crate::handlers::staff::StaffUserDto,
            crate::handlers::staff::StaffProfileDto,
            crate::handlers::staff::NamedOptionDto,
            crate::handlers::staff::StaffDirectoryResponse,
            crate::handlers::staff::StaffMutationResponse,
            crate::handlers::admin::AdminOverviewResponse,
            crate::mutations::patient::PatientForm,
            crate::mutations::asset::AssetForm,
            crate::mutations::supplier::SupplierForm,
            crate::mutations::hospital::HospitalForm,
            crate::mutations::role::RoleForm,
            crate::mutations::staff::StaffForm,
        )
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Hospital Administration API",
        description = "Tenant-scoped hospital administration: patients, assets, suppliers, hospitals, staff and roles",
        version = env!("CARGO_PKG_VERSION"),
    )
)]
pub struct ApiDoc;
