//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::require_auth;

/// Create the auth router with the PostgreSQL repository
pub fn auth_router(users: PgUserRepository, config: AuthConfig) -> Router {
    auth_router_generic(users, config)
}

/// Create an auth router for any repository implementation
pub fn auth_router_generic<R>(users: R, config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState {
        users: Arc::new(users),
        config: Arc::new(config),
    };

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route("/logout", post(handlers::logout::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .route("/remember", post(handlers::remember_login::<R>))
        .route(
            "/me",
            get(handlers::me).route_layer(middleware::from_fn_with_state(
                state.clone(),
                require_auth::<R>,
            )),
        )
        .with_state(state)
}
