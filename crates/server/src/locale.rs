//! Per-request locale: `?lang=`, then the visitor's saved language, then
//! `Accept-Language`, then the server default.

use async_trait::async_trait;
use axum::extract::{FromRequestParts, Query};
use axum::http::header::ACCEPT_LANGUAGE;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use common::i18n::resolve_locale;
use common::Locale;

use crate::errors::ApiError;
use crate::routes::preferences::VISITOR_COOKIE;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
struct LangQuery {
    lang: Option<String>,
}

#[derive(Clone, Copy, Debug)]
pub struct RequestLocale(pub Locale);

#[async_trait]
impl FromRequestParts<AppState> for RequestLocale {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<LangQuery>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::bad_request(e.body_text()))?;

        let stored = match CookieJar::from_headers(&parts.headers).get(VISITOR_COOKIE) {
            Some(visitor) => state.preferences.saved_language(visitor.value()).await?,
            None => None,
        };
        let accept = parts.headers.get(ACCEPT_LANGUAGE).and_then(|v| v.to_str().ok());

        Ok(RequestLocale(resolve_locale(
            query.lang.as_deref(),
            stored.map(Locale::as_str),
            accept,
            state.default_locale,
        )))
    }
}
