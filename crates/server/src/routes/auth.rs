use axum::{extract::State, http::{HeaderMap, StatusCode}, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use service::auth::domain::{AuthSession, AuthUser, ChangePasswordInput, LoginInput, RegisterInput};

use crate::auth::{authenticate, AUTH_COOKIE};
use crate::errors::ApiError;
use crate::state::AppState;

#[utoipa::path(post, path = "/auth/register", tag = "auth", request_body = RegisterInput,
    responses((status = 201, body = AuthUser), (status = 400, description = "Bad Request"), (status = 409, description = "Conflict")))]
pub async fn register(State(state): State<AppState>, Json(input): Json<RegisterInput>) -> Result<(StatusCode, Json<AuthUser>), ApiError> {
    let user = state.auth.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Sets the `auth_token` cookie and returns the token in the body too.
#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = LoginInput,
    responses((status = 200, body = AuthSession), (status = 401, description = "Unauthorized")))]
pub async fn login(State(state): State<AppState>, jar: CookieJar, Json(input): Json<LoginInput>) -> Result<(CookieJar, Json<AuthSession>), ApiError> {
    let session = state.auth.login(input).await?;
    let cookie = Cookie::build((AUTH_COOKIE, session.token.clone()))
        .path("/")
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(SameSite::Lax)
        .build();
    Ok((jar.add(cookie), Json(session)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Signed out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    let jar = jar.remove(cookie);
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth",
    responses((status = 200, body = AuthUser), (status = 400, description = "No token"), (status = 401, description = "Invalid token")))]
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<AuthUser>, ApiError> {
    Ok(Json(authenticate(&state, &headers).await?))
}

#[utoipa::path(post, path = "/auth/password", tag = "auth", request_body = ChangePasswordInput,
    responses((status = 204, description = "Changed"), (status = 401, description = "Wrong current password")))]
pub async fn change_password(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ChangePasswordInput>,
) -> Result<StatusCode, ApiError> {
    let user = authenticate(&state, &headers).await?;
    state.auth.change_password(user.id, input).await?;
    Ok(StatusCode::NO_CONTENT)
}
