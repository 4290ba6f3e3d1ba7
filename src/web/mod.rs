use axum::{
    http::{HeaderValue, Method},
    middleware as axum_middleware,
    routing::get,
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tera::Tera;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::db::services::UserManager;
use crate::server::config::ServerConfig;
use crate::services::password::PasswordHasher;
use crate::web::{middleware::auth, routes::*};

pub mod error;
pub mod extract;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod templates;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub users: UserManager,
    pub templates: Arc<Tera>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(
        db_pool: DatabaseConnection,
        config: Arc<ServerConfig>,
    ) -> Result<Self, tera::Error> {
        let users = UserManager::new(db_pool.clone(), PasswordHasher::new(config.bcrypt_cost));
        Ok(Self {
            db_pool,
            users,
            templates: Arc::new(templates::admin_templates()?),
            config,
        })
    }
}

async fn health_check_handler() -> &'static str {
    "OK"
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origin = match config.cors_allow_origin.as_deref().map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            warn!(error = %e, "Ignoring unparsable CORS origin; allowing any origin.");
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(vec![Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::OPTIONS])
        .allow_headers(Any)
}

pub fn create_axum_router(app_state: Arc<AppState>) -> Router {
    // `layer` rather than `route_layer`: unauthenticated requests must be
    // rejected before method dispatch answers 405.
    let profile = user_routes::create_profile_router()
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::require_token));

    let tags = tag_routes::create_tags_router()
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::require_user));

    let admin = admin_routes::create_admin_router()
        .layer(axum_middleware::from_fn(auth::require_staff))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth::require_token));

    Router::new()
        .route(paths::HEALTH, get(health_check_handler))
        .merge(user_routes::create_public_user_router())
        .merge(profile)
        .merge(tags)
        .merge(admin)
        .with_state(app_state.clone())
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&app_state.config))
}
