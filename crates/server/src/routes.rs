use axum::{
    http::{header, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::auth::{require_admin, require_staff};
use crate::errors::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod contact;
pub mod preferences;
pub mod site;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK")))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> Result<impl IntoResponse, ApiError> {
    let body = service::metrics::encode_metrics()?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn public_api() -> Router<AppState> {
    Router::new()
        .route("/api/site", get(site::landing))
        .route("/api/services", get(site::services))
        .route("/api/services/:id", get(site::service))
        .route("/api/team", get(site::team))
        .route("/api/team/:id", get(site::team_member))
        .route("/api/projects", get(site::projects))
        .route("/api/projects/:id", get(site::project))
        .route("/api/reviews", get(site::reviews).post(site::submit_review))
        .route("/api/blog", get(site::blog))
        .route("/api/blog/:slug", get(site::blog_post))
        .route("/api/history", get(site::history))
        .route("/api/statistics", get(site::statistics))
        .route("/api/contact", post(contact::submit))
        .route("/api/preferences", get(preferences::get).put(preferences::update))
        .route("/api/preferences/theme/toggle", post(preferences::toggle_theme))
        .route("/api/preferences/language/toggle", post(preferences::toggle_language))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .route("/auth/password", post(auth::change_password))
}

/// Build the full application router: public API, dashboard, docs and the static front end.
pub fn build_router(state: AppState, frontend_dir: &str, cors: CorsLayer) -> Router {
    let static_dir = ServeDir::new(frontend_dir).fallback(ServeFile::new(format!("{frontend_dir}/index.html")));

    let staff = admin::staff_routes().route_layer(middleware::from_fn_with_state(state.clone(), require_staff));
    let admins = admin::admin_routes().route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(public_api())
        .merge(staff)
        .merge(admins)
        .fallback_service(static_dir)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
