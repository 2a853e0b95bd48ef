//! # percale_api
//!
//! HTTP API library for Percale.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod session;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use percale_core::auth::assertion::IdentityVerifier;
use percale_core::mail::Mailer;
use percale_core::store::UserStore;

use crate::config::ApiConfig;
use crate::handlers::{account, auth, health, password_reset};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// User datastore.
    pub store: Arc<dyn UserStore>,
    /// Outbound mail.
    pub mailer: Arc<dyn Mailer>,
    /// Social login assertion verifier.
    pub verifier: Arc<dyn IdentityVerifier>,
    /// API configuration.
    pub config: ApiConfig,
}

/// Run embedded database migrations.
///
/// Delegates to `percale_core::migrate::migrate()` which owns the migration
/// files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    percale_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
///
/// The session gate wraps the whole router, so protected path prefixes are
/// enforced even where no route is registered.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/healthz", get(health::healthz))
        .route("/signup", post(auth::signup_handler))
        .route("/login", post(auth::login_handler))
        .route("/social-login", post(auth::social_login_handler))
        .route("/logout", post(auth::logout_handler))
        .route(
            "/me",
            get(account::current_user_handler).put(account::update_profile_handler),
        )
        .route("/change-password", post(account::change_password_handler))
        .route(
            "/forgot-password",
            post(password_reset::forgot_password_handler),
        )
        .route(
            "/reset-password",
            post(password_reset::reset_password_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::gate::session_gate,
        ))
        .layer(cors)
        .with_state(state)
}
