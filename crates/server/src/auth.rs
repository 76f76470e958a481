//! Dashboard access control.
//!
//! The token comes from `Authorization: Bearer <token>` or, failing that, the
//! `auth_token` cookie. Missing token is 400, a bad or expired one 401, and a
//! signed-in user without the needed role 403.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::warn;

use models::profile::Role;
use service::auth::domain::AuthUser;

use crate::errors::ApiError;
use crate::state::AppState;

pub const AUTH_COOKIE: &str = "auth_token";

/// The signed-in profile, inserted into request extensions by the guards.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub AuthUser);

pub fn token_from_headers(headers: &HeaderMap) -> Result<String, ApiError> {
    if let Some(h) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(ApiError::unauthorized("expected `Authorization: Bearer <token>`")),
        };
    }
    match CookieJar::from_headers(headers).get(AUTH_COOKIE) {
        Some(c) if !c.value().is_empty() => Ok(c.value().to_string()),
        _ => Err(ApiError::bad_request("missing Authorization header and auth_token cookie")),
    }
}

/// Resolve the caller from the token, re-reading the profile so role changes apply at once.
pub async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<AuthUser, ApiError> {
    let token = token_from_headers(headers)?;
    Ok(state.auth.me(&token).await?)
}

async fn guard(state: AppState, mut req: Request, next: Next, allowed: fn(Role) -> bool) -> Result<Response, ApiError> {
    let user = authenticate(&state, req.headers()).await.map_err(|e| {
        warn!(path = %req.uri().path(), status = e.status.as_u16(), "dashboard request rejected");
        e
    })?;
    if !allowed(user.role) {
        warn!(path = %req.uri().path(), user_id = %user.id, role = %user.role, "insufficient role");
        return Err(ApiError::forbidden("insufficient role"));
    }
    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Admins and employees.
pub async fn require_staff(State(state): State<AppState>, req: Request, next: Next) -> Result<Response, ApiError> {
    guard(state, req, next, Role::is_staff).await
}

pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Result<Response, ApiError> {
    guard(state, req, next, |role| role == Role::Admin).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn bearer_header_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        headers.insert(header::COOKIE, HeaderValue::from_static("auth_token=xyz"));
        assert_eq!(token_from_headers(&headers).unwrap(), "abc");
    }

    #[test]
    fn cookie_is_the_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_static("visitor_id=1; auth_token=xyz"));
        assert_eq!(token_from_headers(&headers).unwrap(), "xyz");
    }

    #[test]
    fn missing_is_400_malformed_is_401() {
        assert_eq!(token_from_headers(&HeaderMap::new()).unwrap_err().status, StatusCode::BAD_REQUEST);
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic Zm9vOmJhcg=="));
        assert_eq!(token_from_headers(&headers).unwrap_err().status, StatusCode::UNAUTHORIZED);
    }
}
