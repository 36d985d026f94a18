//! HTTP Handlers
//!
//! The boundary layer: maps use-case outcomes to status codes and JSON
//! bodies, and owns cookie mechanics for the remember-me token.

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use axum::Extension;
use std::sync::Arc;

use platform::cookie::{self, CookieConfig};

use crate::application::{
    AuthConfig, AuthenticateUseCase, LoginInput, LoginUseCase, LogoutUseCase, RefreshTokenUseCase,
    RegisterInput, RegisterUseCase, RememberLoginUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, RegisterRequest,
    RegisterResponse, RememberResponse, UserResponse,
};
use crate::presentation::middleware::{CurrentUser, extract_bearer_token};

/// Shared state for auth handlers and guard middleware
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub users: Arc<R>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /api/auth/register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RegisterRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(state.users.clone(), state.config.clone());

    let input = RegisterInput {
        email: req.email,
        password: req.password,
        first_name: req.first_name,
        last_name: req.last_name,
    };

    let user = use_case.execute(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            user: UserResponse::from(&user),
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /api/auth/login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<LoginRequest>,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(state.users.clone(), state.config.clone());

    let input = LoginInput {
        email: req.email,
        password: req.password,
        remember: req.remember_me,
    };

    let output = use_case.execute(input).await?;

    let body = Json(LoginResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
        user: UserResponse::from(&output.user),
    });

    // Remembered sessions also get the persistent-login cookie
    match output.remember_token {
        Some(token) => {
            let cookie = remember_cookie_config(&state.config).build_set_cookie(token.as_str());
            Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], body).into_response())
        }
        None => Ok((StatusCode::OK, body).into_response()),
    }
}

// ============================================================================
// Logout
// ============================================================================

/// POST /api/auth/logout
///
/// Clears the remember token server-side when the caller can be
/// identified; the cookie is cleared either way and the request never
/// fails because of it.
pub async fn logout<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<impl IntoResponse>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    if let Some(token) = extract_bearer_token(&headers) {
        let authenticate = AuthenticateUseCase::new(state.users.clone(), state.config.clone());
        if let Ok(user) = authenticate.require_authentication(token).await {
            let use_case = LogoutUseCase::new(state.users.clone());
            use_case.execute(user.user_id).await?;
        }
    }

    let cookie = remember_cookie_config(&state.config).build_delete_cookie();

    Ok((StatusCode::NO_CONTENT, [(header::SET_COOKIE, cookie)]))
}

// ============================================================================
// Refresh
// ============================================================================

/// POST /api/auth/refresh
pub async fn refresh<R>(
    State(state): State<AuthAppState<R>>,
    Json(req): Json<RefreshRequest>,
) -> AuthResult<Json<RefreshResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = RefreshTokenUseCase::new(state.users.clone(), state.config.clone());

    let output = use_case.execute(&req.refresh_token).await?;

    Ok(Json(RefreshResponse {
        access_token: output.access_token,
        refresh_token: output.refresh_token,
    }))
}

// ============================================================================
// Remember (silent re-authentication)
// ============================================================================

/// POST /api/auth/remember
///
/// Always 200: a missing or stale cookie yields `authenticated: false`,
/// never an error the UI has to handle.
pub async fn remember_login<R>(
    State(state): State<AuthAppState<R>>,
    headers: HeaderMap,
) -> AuthResult<Json<RememberResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token = cookie::extract_cookie(&headers, &state.config.remember_cookie_name);

    let Some(token) = token else {
        return Ok(Json(RememberResponse::anonymous()));
    };

    let use_case = RememberLoginUseCase::new(state.users.clone(), state.config.clone());

    match use_case.execute(&token).await? {
        Some(output) => Ok(Json(RememberResponse {
            authenticated: true,
            access_token: Some(output.access_token),
            refresh_token: Some(output.refresh_token),
            user: Some(UserResponse::from(&output.user)),
        })),
        None => Ok(Json(RememberResponse::anonymous())),
    }
}

// ============================================================================
// Current user
// ============================================================================

/// GET /api/auth/me (behind the access guard)
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> Json<UserResponse> {
    Json(UserResponse::from(&user))
}

// ============================================================================
// Helper Functions
// ============================================================================

fn remember_cookie_config(config: &AuthConfig) -> CookieConfig {
    CookieConfig {
        name: config.remember_cookie_name.clone(),
        secure: config.cookie_secure,
        http_only: true,
        same_site: config.cookie_same_site,
        path: "/".to_string(),
        max_age_secs: Some(config.remember_ttl.as_secs() as i64),
    }
}
