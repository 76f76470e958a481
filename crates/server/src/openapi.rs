use utoipa::OpenApi;

use models::blog_post::BlogPostView;
use models::company_history::MilestoneView;
use models::contact_message::CreateContactMessage;
use models::offering::ServiceView;
use models::profile::Role;
use models::project::ProjectView;
use models::review::{ReviewView, SubmitReview};
use models::site_statistic::StatisticView;
use models::team_member::TeamMemberView;
use service::auth::domain::{AuthSession, AuthUser, ChangePasswordInput, CreateStaffInput, LoginInput, RegisterInput};
use service::contact::ContactReceipt;
use service::dashboard::Overview;
use service::preferences::{PreferencesPatch, PreferencesView, Theme};
use service::site::LandingPage;

use crate::errors::JsonApiError;
use crate::routes::admin::ReorderRequest;

/// Public, auth and preference endpoints. The per-table `/admin/*` CRUD
/// routes share one shape and are described by the `admin` tag.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::site::landing,
        crate::routes::site::services,
        crate::routes::site::service,
        crate::routes::site::team,
        crate::routes::site::projects,
        crate::routes::site::reviews,
        crate::routes::site::submit_review,
        crate::routes::site::blog,
        crate::routes::site::blog_post,
        crate::routes::site::history,
        crate::routes::site::statistics,
        crate::routes::contact::submit,
        crate::routes::preferences::get,
        crate::routes::preferences::update,
        crate::routes::preferences::toggle_theme,
        crate::routes::preferences::toggle_language,
        crate::routes::auth::register,
        crate::routes::auth::login,
        crate::routes::auth::logout,
        crate::routes::auth::me,
        crate::routes::auth::change_password,
        crate::routes::admin::overview,
        crate::routes::admin::create_user,
    ),
    components(
        schemas(
            JsonApiError,
            LandingPage,
            ServiceView,
            TeamMemberView,
            ProjectView,
            ReviewView,
            SubmitReview,
            BlogPostView,
            MilestoneView,
            StatisticView,
            CreateContactMessage,
            ContactReceipt,
            PreferencesView,
            PreferencesPatch,
            Theme,
            RegisterInput,
            LoginInput,
            ChangePasswordInput,
            CreateStaffInput,
            AuthUser,
            AuthSession,
            Role,
            Overview,
            ReorderRequest,
        )
    ),
    tags(
        (name = "health"),
        (name = "site", description = "Localized public content; `lang` query, saved preference or Accept-Language"),
        (name = "preferences"),
        (name = "auth"),
        (name = "admin", description = "Staff dashboard. Every table under /admin supports list (field, value, page, per_page), create, get, update and delete")
    )
)]
pub struct ApiDoc;
