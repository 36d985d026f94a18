//! Access Guard Middleware
//!
//! Per-request gate for protected routes: extracts the bearer token,
//! resolves the acting user and stores it as a request extension. The
//! guard knows nothing about response bodies beyond delegating to the
//! error type's `IntoResponse`.

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Request, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::application::AuthenticateUseCase;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::user_role::UserRole;
use crate::error::AuthError;
use crate::presentation::handlers::AuthAppState;

/// The resolved acting user, stored in request extensions by the guard
#[derive(Clone)]
pub struct CurrentUser(pub User);

/// Extract the token from `Authorization: Bearer <token>`
///
/// The scheme match is case-insensitive; a missing token after the scheme
/// counts as absent.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Middleware that requires a valid access token
pub async fn require_auth<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = resolve_user(&state, req.headers(), None).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Middleware that requires a valid access token for an admin account
pub async fn require_admin<R>(
    State(state): State<AuthAppState<R>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user = resolve_user(&state, req.headers(), Some(UserRole::Admin)).await?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

async fn resolve_user<R>(
    state: &AuthAppState<R>,
    headers: &HeaderMap,
    required_role: Option<UserRole>,
) -> Result<User, Response>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let token =
        extract_bearer_token(headers).ok_or_else(|| AuthError::Unauthorized.into_response())?;

    let use_case = AuthenticateUseCase::new(state.users.clone(), state.config.clone());

    let result = match required_role {
        Some(role) => use_case.require_role(token, role).await,
        None => use_case.require_authentication(token).await,
    };

    result.map_err(IntoResponse::into_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_authorization(value: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(value));
        headers
    }

    #[test]
    fn test_extract_bearer_token() {
        let headers = headers_with_authorization("Bearer abc.def.ghi");
        assert_eq!(extract_bearer_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        for value in ["bearer tok", "BEARER tok", "BeArEr tok"] {
            let mut headers = HeaderMap::new();
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
            assert_eq!(extract_bearer_token(&headers), Some("tok"), "value: {value}");
        }
    }

    #[test]
    fn test_rejects_other_schemes_and_empty_tokens() {
        assert_eq!(
            extract_bearer_token(&headers_with_authorization("Basic dXNlcjpwYXNz")),
            None
        );
        assert_eq!(
            extract_bearer_token(&headers_with_authorization("Bearer ")),
            None
        );
        assert_eq!(
            extract_bearer_token(&headers_with_authorization("Bearer")),
            None
        );
        assert_eq!(extract_bearer_token(&HeaderMap::new()), None);
    }
}
