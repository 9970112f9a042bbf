//! HTTP API server

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{seed, AuthService, RequestAuthenticator, TokenCodec};
use crate::config::Config;
use crate::error::Result;
use crate::store::{MemoryRoleStore, MemoryUserStore, RoleStore, UserStore};

use super::routes;

/// Application state shared across handlers. Read-only after startup.
pub struct AppState {
    pub auth: AuthService,
    pub authenticator: Arc<RequestAuthenticator>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wire the core around the given stores
    pub fn new(config: &Config, users: Arc<dyn UserStore>, roles: Arc<dyn RoleStore>) -> Result<Self> {
        config.validate()?;

        let codec = Arc::new(TokenCodec::from_config(&config.auth)?);
        let authenticator = Arc::new(RequestAuthenticator::new(
            codec.clone(),
            users.clone(),
            &config.auth,
        )?);
        let auth = AuthService::new(users, roles, codec, config.auth.bcrypt_cost)?;

        Ok(Self {
            auth,
            authenticator,
        })
    }

    /// State over fresh in-memory stores, seeded with default roles and the
    /// configured admin account
    pub async fn in_memory(config: Config) -> Result<Self> {
        let users = Arc::new(MemoryUserStore::new());
        let roles = Arc::new(MemoryRoleStore::new());
        seed::seed(
            users.as_ref(),
            roles.as_ref(),
            &config.seed,
            config.auth.bcrypt_cost,
        )
        .await?;
        Self::new(&config, users, roles)
    }
}

/// Run the HTTP API server
pub async fn run_server(config: Config, host: &str, port: u16) -> Result<()> {
    let state = Arc::new(AppState::in_memory(config).await?);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on {}", addr);

    serve(listener, state).await
}

/// Serve the API on an already bound listener
pub async fn serve(listener: TcpListener, state: SharedState) -> Result<()> {
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

/// Create the router with all routes
pub fn create_router(state: SharedState) -> Router {
    let authenticator = state.authenticator.clone();

    Router::new()
        .route("/api/health", get(routes::health))
        // Auth routes
        .route("/api/auth/signin", post(routes::sign_in))
        .route("/api/auth/signup", post(routes::sign_up))
        // User routes
        .route("/api/user/me", get(routes::current_user))
        .route(
            "/api/users/{username}",
            get(routes::user_profile).delete(routes::delete_user),
        )
        // Middleware
        .layer(middleware::from_fn_with_state(
            authenticator,
            crate::auth::authenticate,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
