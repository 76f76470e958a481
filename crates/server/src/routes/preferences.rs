//! Visitor preferences keyed by the `visitor_id` cookie, issued on first use.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

use service::preferences::{PreferencesPatch, PreferencesView};

use crate::errors::ApiError;
use crate::state::AppState;

pub const VISITOR_COOKIE: &str = "visitor_id";

/// Existing visitor id, or a fresh one added to the jar.
fn visitor(state: &AppState, jar: CookieJar) -> (CookieJar, String) {
    if let Some(c) = jar.get(VISITOR_COOKIE).filter(|c| Uuid::parse_str(c.value()).is_ok()) {
        let id = c.value().to_string();
        return (jar, id);
    }
    let id = Uuid::new_v4().to_string();
    let cookie = Cookie::build((VISITOR_COOKIE, id.clone()))
        .path("/")
        .http_only(true)
        .secure(state.cookie_secure)
        .same_site(SameSite::Lax)
        .permanent()
        .build();
    (jar.add(cookie), id)
}

#[utoipa::path(get, path = "/api/preferences", tag = "preferences", responses((status = 200, body = PreferencesView)))]
pub async fn get(State(state): State<AppState>, jar: CookieJar) -> Result<(CookieJar, Json<PreferencesView>), ApiError> {
    let (jar, scope) = visitor(&state, jar);
    let prefs = state.preferences.load(&scope).await?;
    Ok((jar, Json(prefs.view())))
}

#[utoipa::path(put, path = "/api/preferences", tag = "preferences", request_body = PreferencesPatch,
    responses((status = 200, body = PreferencesView)))]
pub async fn update(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(patch): Json<PreferencesPatch>,
) -> Result<(CookieJar, Json<PreferencesView>), ApiError> {
    let (jar, scope) = visitor(&state, jar);
    let prefs = state.preferences.update(&scope, patch).await?;
    Ok((jar, Json(prefs.view())))
}

#[utoipa::path(post, path = "/api/preferences/theme/toggle", tag = "preferences", responses((status = 200, body = PreferencesView)))]
pub async fn toggle_theme(State(state): State<AppState>, jar: CookieJar) -> Result<(CookieJar, Json<PreferencesView>), ApiError> {
    let (jar, scope) = visitor(&state, jar);
    let prefs = state.preferences.toggle_theme(&scope).await?;
    Ok((jar, Json(prefs.view())))
}

#[utoipa::path(post, path = "/api/preferences/language/toggle", tag = "preferences", responses((status = 200, body = PreferencesView)))]
pub async fn toggle_language(State(state): State<AppState>, jar: CookieJar) -> Result<(CookieJar, Json<PreferencesView>), ApiError> {
    let (jar, scope) = visitor(&state, jar);
    let prefs = state.preferences.toggle_language(&scope).await?;
    Ok((jar, Json(prefs.view())))
}
