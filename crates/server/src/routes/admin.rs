//! Dashboard endpoints: one generic CRUD router per table, plus reorder,
//! user administration and the overview counts.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Extension, Json, Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use models::{
    blog_post, company_history, contact_message, offering, profile, project, review, site_statistic, task,
    team_member, Filter, Ordinal, Resource,
};
use service::auth::domain::{AuthUser, CreateStaffInput};
use service::dashboard::{self, Overview};
use service::pagination::{Page, Pagination};
use service::CrudService;

use crate::auth::CurrentUser;
use crate::errors::ApiError;
use crate::state::AppState;

pub const DEFAULT_PER_PAGE: u32 = 20;

/// A table the dashboard manages.
pub trait Managed: Resource {
    fn service(state: &AppState) -> &Arc<CrudService<Self>>;

    /// Fill create input from the signed-in user.
    fn prepare(_input: &mut Self::Create, _user: &AuthUser) {}
}

macro_rules! managed {
    ($($model:ty => $field:ident),* $(,)?) => {
        $(impl Managed for $model {
            fn service(state: &AppState) -> &Arc<CrudService<Self>> {
                &state.catalog.$field
            }
        })*
    };
}

managed! {
    offering::Model => services,
    team_member::Model => team,
    project::Model => projects,
    review::Model => reviews,
    contact_message::Model => messages,
    company_history::Model => history,
    site_statistic::Model => statistics,
    profile::Model => profiles,
}

impl Managed for blog_post::Model {
    fn service(state: &AppState) -> &Arc<CrudService<Self>> {
        &state.catalog.blog
    }

    fn prepare(input: &mut blog_post::CreateBlogPost, user: &AuthUser) {
        input.author_id.get_or_insert(user.id);
    }
}

impl Managed for task::Model {
    fn service(state: &AppState) -> &Arc<CrudService<Self>> {
        &state.catalog.tasks
    }

    fn prepare(input: &mut task::CreateTask, user: &AuthUser) {
        input.created_by.get_or_insert(user.id);
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub field: Option<String>,
    pub value: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ListQuery {
    fn filter<M: Resource>(&self) -> Result<Option<Filter>, ApiError> {
        match (&self.field, &self.value) {
            (Some(field), Some(value)) => Ok(Some(M::parse_filter(field, value)?)),
            (None, None) => Ok(None),
            _ => Err(ApiError::bad_request("`field` and `value` must be given together")),
        }
    }

    fn pagination(&self) -> Pagination {
        Pagination { page: self.page.unwrap_or(1), per_page: self.per_page.unwrap_or(DEFAULT_PER_PAGE) }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReorderRequest {
    /// Ids in their new display order; position becomes `order`.
    pub ids: Vec<Uuid>,
}

async fn list<M: Managed>(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Result<Json<Page<M>>, ApiError> {
    let filter = q.filter::<M>()?;
    Ok(Json(M::service(&state).list_page(filter, q.pagination()).await?))
}

async fn create<M: Managed>(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(mut input): Json<M::Create>,
) -> Result<(StatusCode, Json<M>), ApiError> {
    M::prepare(&mut input, &user);
    Ok((StatusCode::CREATED, Json(M::service(&state).create(input).await?)))
}

async fn read<M: Managed>(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<M>, ApiError> {
    Ok(Json(M::service(&state).require(id).await?))
}

async fn update<M: Managed>(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(patch): Json<M::Patch>,
) -> Result<Json<M>, ApiError> {
    Ok(Json(M::service(&state).update(id, patch).await?))
}

async fn remove<M: Managed>(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    M::service(&state).delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn reorder<M: Managed + Ordinal>(
    State(state): State<AppState>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<Vec<M>>, ApiError> {
    Ok(Json(M::service(&state).reorder(&req.ids).await?))
}

/// `GET|POST {base}` and `GET|PUT|DELETE {base}/:id`.
pub fn crud_routes<M: Managed>(base: &str) -> Router<AppState> {
    Router::new()
        .route(base, get(list::<M>).post(create::<M>))
        .route(&format!("{base}/:id"), get(read::<M>).put(update::<M>).delete(remove::<M>))
}

fn ordered_routes<M: Managed + Ordinal>(base: &str) -> Router<AppState> {
    crud_routes::<M>(base).route(&format!("{base}/order"), put(reorder::<M>))
}

#[utoipa::path(get, path = "/admin/overview", tag = "admin", responses((status = 200, body = Overview)))]
pub async fn overview(State(state): State<AppState>) -> Result<Json<Overview>, ApiError> {
    Ok(Json(dashboard::overview(&state.catalog).await?))
}

#[utoipa::path(post, path = "/admin/users", tag = "admin", request_body = CreateStaffInput,
    responses((status = 201, body = AuthUser), (status = 403, description = "Admins only"), (status = 409, description = "Conflict")))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateStaffInput>,
) -> Result<(StatusCode, Json<AuthUser>), ApiError> {
    Ok((StatusCode::CREATED, Json(state.auth.create_user(input).await?)))
}

/// Content, messages and tasks; open to staff.
pub fn staff_routes() -> Router<AppState> {
    Router::new()
        .merge(ordered_routes::<offering::Model>("/admin/services"))
        .merge(ordered_routes::<team_member::Model>("/admin/team-members"))
        .merge(ordered_routes::<site_statistic::Model>("/admin/statistics"))
        .merge(crud_routes::<project::Model>("/admin/projects"))
        .merge(crud_routes::<review::Model>("/admin/reviews"))
        .merge(crud_routes::<blog_post::Model>("/admin/blog-posts"))
        .merge(crud_routes::<contact_message::Model>("/admin/contact-messages"))
        .merge(crud_routes::<company_history::Model>("/admin/history"))
        .merge(crud_routes::<task::Model>("/admin/tasks"))
        .route("/admin/overview", get(overview))
}

/// Accounts; admins only. Profiles are created through `/admin/users`.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/profiles", get(list::<profile::Model>))
        .route(
            "/admin/profiles/:id",
            get(read::<profile::Model>).put(update::<profile::Model>).delete(remove::<profile::Model>),
        )
        .route("/admin/users", axum::routing::post(create_user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_builds_filters() {
        let q = ListQuery { field: Some("approved".into()), value: Some("true".into()), ..Default::default() };
        assert!(q.filter::<review::Model>().unwrap().is_some());

        let q = ListQuery { field: Some("rating".into()), value: Some("5".into()), ..Default::default() };
        assert_eq!(q.filter::<review::Model>().unwrap_err().status, StatusCode::BAD_REQUEST);

        let q = ListQuery { field: Some("approved".into()), ..Default::default() };
        assert!(q.filter::<review::Model>().is_err());

        let p = ListQuery::default().pagination();
        assert_eq!((p.page, p.per_page), (1, DEFAULT_PER_PAGE));
    }
}
