//! Public, localized content.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use models::blog_post::BlogPostView;
use models::company_history::MilestoneView;
use models::offering::ServiceView;
use models::project::ProjectView;
use models::review::{ReviewView, SubmitReview};
use models::site_statistic::StatisticView;
use models::team_member::TeamMemberView;
use service::site::LandingPage;

use crate::errors::ApiError;
use crate::locale::RequestLocale;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ProjectQuery {
    pub category: Option<String>,
}

fn found<T>(row: Option<T>, what: &str) -> Result<Json<T>, ApiError> {
    row.map(Json).ok_or_else(|| ApiError::not_found(format!("{what} not found")))
}

#[utoipa::path(get, path = "/api/site", tag = "site",
    params(("lang" = Option<String>, Query, description = "`en` or `ar`")),
    responses((status = 200, body = LandingPage)))]
pub async fn landing(State(state): State<AppState>, RequestLocale(locale): RequestLocale) -> Result<Json<LandingPage>, ApiError> {
    Ok(Json(state.site.landing(locale).await?))
}

#[utoipa::path(get, path = "/api/services", tag = "site", responses((status = 200, body = [ServiceView])))]
pub async fn services(State(state): State<AppState>, RequestLocale(locale): RequestLocale) -> Result<Json<Vec<ServiceView>>, ApiError> {
    Ok(Json(state.site.services(locale).await?))
}

#[utoipa::path(get, path = "/api/services/{id}", tag = "site",
    params(("id" = Uuid, Path, description = "service id")),
    responses((status = 200, body = ServiceView), (status = 404, body = crate::errors::JsonApiError)))]
pub async fn service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    RequestLocale(locale): RequestLocale,
) -> Result<Json<ServiceView>, ApiError> {
    found(state.site.service(id, locale).await?, "service")
}

#[utoipa::path(get, path = "/api/team", tag = "site", responses((status = 200, body = [TeamMemberView])))]
pub async fn team(State(state): State<AppState>, RequestLocale(locale): RequestLocale) -> Result<Json<Vec<TeamMemberView>>, ApiError> {
    Ok(Json(state.site.team(locale).await?))
}

pub async fn team_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    RequestLocale(locale): RequestLocale,
) -> Result<Json<TeamMemberView>, ApiError> {
    found(state.site.team_member(id, locale).await?, "team member")
}

#[utoipa::path(get, path = "/api/projects", tag = "site",
    params(("category" = Option<String>, Query, description = "exact category match")),
    responses((status = 200, body = [ProjectView])))]
pub async fn projects(
    State(state): State<AppState>,
    Query(q): Query<ProjectQuery>,
    RequestLocale(locale): RequestLocale,
) -> Result<Json<Vec<ProjectView>>, ApiError> {
    Ok(Json(state.site.projects(q.category.as_deref(), locale).await?))
}

pub async fn project(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    RequestLocale(locale): RequestLocale,
) -> Result<Json<ProjectView>, ApiError> {
    found(state.site.project(id, locale).await?, "project")
}

#[utoipa::path(get, path = "/api/reviews", tag = "site", responses((status = 200, body = [ReviewView])))]
pub async fn reviews(State(state): State<AppState>, RequestLocale(locale): RequestLocale) -> Result<Json<Vec<ReviewView>>, ApiError> {
    Ok(Json(state.site.reviews(locale).await?))
}

/// Stored unapproved; the response only confirms receipt.
#[utoipa::path(post, path = "/api/reviews", tag = "site", request_body = SubmitReview,
    responses((status = 201, description = "Received, pending approval"), (status = 400, body = crate::errors::JsonApiError)))]
pub async fn submit_review(
    State(state): State<AppState>,
    Json(input): Json<SubmitReview>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let stored = state.site.submit_review(input).await?;
    Ok((StatusCode::CREATED, Json(serde_json::json!({ "id": stored.id, "approved": stored.approved }))))
}

#[utoipa::path(get, path = "/api/blog", tag = "site", responses((status = 200, body = [BlogPostView])))]
pub async fn blog(State(state): State<AppState>, RequestLocale(locale): RequestLocale) -> Result<Json<Vec<BlogPostView>>, ApiError> {
    Ok(Json(state.site.blog_posts(locale).await?))
}

#[utoipa::path(get, path = "/api/blog/{slug}", tag = "site",
    params(("slug" = String, Path, description = "post slug")),
    responses((status = 200, body = BlogPostView), (status = 404, body = crate::errors::JsonApiError)))]
pub async fn blog_post(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    RequestLocale(locale): RequestLocale,
) -> Result<Json<BlogPostView>, ApiError> {
    found(state.site.blog_post(&slug, locale).await?, "post")
}

#[utoipa::path(get, path = "/api/history", tag = "site", responses((status = 200, body = [MilestoneView])))]
pub async fn history(State(state): State<AppState>, RequestLocale(locale): RequestLocale) -> Result<Json<Vec<MilestoneView>>, ApiError> {
    Ok(Json(state.site.history(locale).await?))
}

#[utoipa::path(get, path = "/api/statistics", tag = "site", responses((status = 200, body = [StatisticView])))]
pub async fn statistics(State(state): State<AppState>, RequestLocale(locale): RequestLocale) -> Result<Json<Vec<StatisticView>>, ApiError> {
    Ok(Json(state.site.statistics(locale).await?))
}
