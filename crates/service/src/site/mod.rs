//! Public, localized site content.
//!
//! One [`SiteContent`] serves the landing page and the public listings from
//! a single configured source: the database tables the dashboard edits, or
//! read-only JSON fixtures.

use std::path::Path;
use std::sync::Arc;

use common::{Direction, Locale};
use configs::ContentSource;
use serde::Serialize;
use serde_json::json;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

use models::blog_post::BlogPostView;
use models::company_history::MilestoneView;
use models::offering::ServiceView;
use models::project::ProjectView;
use models::review::{ReviewView, SubmitReview};
use models::site_statistic::StatisticView;
use models::team_member::TeamMemberView;
use models::{
    blog_post, company_history, offering, project, review, site_statistic, team_member, Filter, FilterValue,
    Localize, Resource,
};

use crate::cache::CacheSettings;
use crate::catalog::Catalog;
use crate::crud::CrudService;
use crate::errors::ServiceError;
use crate::repository::{MemoryRepository, Repository};

pub mod fixtures;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LandingPage {
    #[schema(value_type = String, example = "ar")]
    pub locale: Locale,
    #[schema(value_type = String, example = "rtl")]
    pub direction: Direction,
    pub services: Vec<ServiceView>,
    pub team: Vec<TeamMemberView>,
    pub projects: Vec<ProjectView>,
    pub reviews: Vec<ReviewView>,
    pub statistics: Vec<StatisticView>,
    pub history: Vec<MilestoneView>,
}

pub struct SiteContent {
    source: ContentSource,
    services: Arc<CrudService<offering::Model>>,
    team: Arc<CrudService<team_member::Model>>,
    projects: Arc<CrudService<project::Model>>,
    reviews: Arc<CrudService<review::Model>>,
    statistics: Arc<CrudService<site_statistic::Model>>,
    history: Arc<CrudService<company_history::Model>>,
    blog: Arc<CrudService<blog_post::Model>>,
    submissions: Arc<CrudService<review::Model>>,
}

fn approved() -> Filter {
    Filter::eq("approved", FilterValue::Bool(true))
}

fn published() -> Filter {
    Filter::eq("published", FilterValue::Bool(true))
}

async fn localized<M: Resource + Localize>(
    svc: &CrudService<M>,
    filter: Option<Filter>,
    locale: Locale,
) -> Result<Vec<M::View>, ServiceError> {
    Ok(svc.list(filter).await?.iter().map(|m| m.localize(locale)).collect())
}

fn fixture_service<M: Resource>(rows: Vec<M>, settings: CacheSettings) -> Arc<CrudService<M>> {
    let repo: Arc<dyn Repository<M>> = Arc::new(MemoryRepository::read_only(rows));
    Arc::new(CrudService::new(repo, settings))
}

impl SiteContent {
    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            source: ContentSource::Database,
            services: catalog.services.clone(),
            team: catalog.team.clone(),
            projects: catalog.projects.clone(),
            reviews: catalog.reviews.clone(),
            statistics: catalog.statistics.clone(),
            history: catalog.history.clone(),
            blog: catalog.blog.clone(),
            submissions: catalog.reviews.clone(),
        }
    }

    /// Landing content from `services.json`, `team.json`, `projects.json`,
    /// `reviews.json`, `statistics.json` and `history.json` under `dir`.
    /// The blog and review submissions still go through `catalog`.
    pub async fn from_fixtures(dir: &Path, catalog: &Catalog, settings: CacheSettings) -> Result<Self, ServiceError> {
        let services = fixtures::load::<offering::Model>(dir, "services.json", &[]).await?;
        let team = fixtures::load::<team_member::Model>(dir, "team.json", &[]).await?;
        let projects = fixtures::load::<project::Model>(dir, "projects.json", &[]).await?;
        let reviews = fixtures::load::<review::Model>(dir, "reviews.json", &[("approved", json!(true))]).await?;
        let statistics = fixtures::load::<site_statistic::Model>(dir, "statistics.json", &[]).await?;
        let history = fixtures::load::<company_history::Model>(dir, "history.json", &[]).await?;
        info!(dir = %dir.display(), "site content served from fixtures");
        Ok(Self {
            source: ContentSource::Fixtures,
            services: fixture_service(services, settings),
            team: fixture_service(team, settings),
            projects: fixture_service(projects, settings),
            reviews: fixture_service(reviews, settings),
            statistics: fixture_service(statistics, settings),
            history: fixture_service(history, settings),
            blog: catalog.blog.clone(),
            submissions: catalog.reviews.clone(),
        })
    }

    pub fn source(&self) -> ContentSource {
        self.source
    }

    #[instrument(skip(self), fields(locale = %locale))]
    pub async fn landing(&self, locale: Locale) -> Result<LandingPage, ServiceError> {
        let (services, team, projects, reviews, statistics, history) = tokio::try_join!(
            localized(&self.services, None, locale),
            localized(&self.team, None, locale),
            localized(&self.projects, None, locale),
            localized(&self.reviews, Some(approved()), locale),
            localized(&self.statistics, None, locale),
            localized(&self.history, None, locale),
        )?;
        Ok(LandingPage {
            locale,
            direction: locale.direction(),
            services,
            team,
            projects,
            reviews,
            statistics,
            history,
        })
    }

    pub async fn services(&self, locale: Locale) -> Result<Vec<ServiceView>, ServiceError> {
        localized(&self.services, None, locale).await
    }

    pub async fn service(&self, id: Uuid, locale: Locale) -> Result<Option<ServiceView>, ServiceError> {
        Ok(self.services.get(Some(id)).await?.map(|m| m.localize(locale)))
    }

    pub async fn team(&self, locale: Locale) -> Result<Vec<TeamMemberView>, ServiceError> {
        localized(&self.team, None, locale).await
    }

    pub async fn team_member(&self, id: Uuid, locale: Locale) -> Result<Option<TeamMemberView>, ServiceError> {
        Ok(self.team.get(Some(id)).await?.map(|m| m.localize(locale)))
    }

    pub async fn projects(&self, category: Option<&str>, locale: Locale) -> Result<Vec<ProjectView>, ServiceError> {
        let filter = category.map(|c| Filter::eq("category", FilterValue::Text(c.to_string())));
        localized(&self.projects, filter, locale).await
    }

    pub async fn project(&self, id: Uuid, locale: Locale) -> Result<Option<ProjectView>, ServiceError> {
        Ok(self.projects.get(Some(id)).await?.map(|m| m.localize(locale)))
    }

    /// Approved reviews only.
    pub async fn reviews(&self, locale: Locale) -> Result<Vec<ReviewView>, ServiceError> {
        localized(&self.reviews, Some(approved()), locale).await
    }

    pub async fn statistics(&self, locale: Locale) -> Result<Vec<StatisticView>, ServiceError> {
        localized(&self.statistics, None, locale).await
    }

    pub async fn history(&self, locale: Locale) -> Result<Vec<MilestoneView>, ServiceError> {
        localized(&self.history, None, locale).await
    }

    /// Published posts, newest first.
    pub async fn blog_posts(&self, locale: Locale) -> Result<Vec<BlogPostView>, ServiceError> {
        localized(&self.blog, Some(published()), locale).await
    }

    /// A published post by slug; drafts are invisible.
    pub async fn blog_post(&self, slug: &str, locale: Locale) -> Result<Option<BlogPostView>, ServiceError> {
        let rows = self
            .blog
            .list(Some(Filter::eq("slug", FilterValue::Text(slug.to_string()))))
            .await?;
        Ok(rows.iter().find(|p| p.published).map(|p| p.localize(locale)))
    }

    /// Store a visitor review; it stays hidden until approved from the dashboard.
    #[instrument(skip(self, input), fields(client = %input.client_name))]
    pub async fn submit_review(&self, input: SubmitReview) -> Result<review::Model, ServiceError> {
        self.submissions.create(input.into()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded() -> (Catalog, SiteContent) {
        let catalog = Catalog::memory(CacheSettings::default());
        catalog
            .services
            .create(offering::CreateService {
                title: "Consulting".into(),
                description: "Strategy".into(),
                order: Some(1),
                translations: Some(json!({"ar": {"title": "استشارات"}})),
                ..Default::default()
            })
            .await
            .unwrap();
        catalog
            .services
            .create(offering::CreateService {
                title: "Design".into(),
                description: "Visual identity".into(),
                order: Some(0),
                ..Default::default()
            })
            .await
            .unwrap();
        let site = SiteContent::from_catalog(&catalog);
        (catalog, site)
    }

    #[tokio::test]
    async fn landing_is_localized_and_directional() {
        let (_, site) = seeded().await;
        let ar = site.landing(Locale::Ar).await.unwrap();
        assert_eq!(ar.direction, Direction::Rtl);
        let titles: Vec<&str> = ar.services.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Design", "استشارات"]);

        let en = site.landing(Locale::En).await.unwrap();
        assert_eq!(en.direction, Direction::Ltr);
        assert_eq!(en.services[1].title, "Consulting");
    }

    #[tokio::test]
    async fn submitted_reviews_wait_for_approval() {
        let (catalog, site) = seeded().await;
        let stored = site
            .submit_review(SubmitReview {
                client_name: "Nour".into(),
                company: Some("Acme".into()),
                content: "Delivered on time".into(),
                rating: 5,
            })
            .await
            .unwrap();
        assert!(site.reviews(Locale::En).await.unwrap().is_empty());

        catalog
            .reviews
            .update(stored.id, review::UpdateReview { approved: Some(true), ..Default::default() })
            .await
            .unwrap();
        assert_eq!(site.reviews(Locale::En).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn drafts_are_hidden_from_the_blog() {
        let (catalog, site) = seeded().await;
        for (slug, published) in [("live", true), ("draft", false)] {
            catalog
                .blog
                .create(blog_post::CreateBlogPost {
                    title: slug.into(),
                    slug: Some(slug.into()),
                    content: "text".into(),
                    published,
                    ..Default::default()
                })
                .await
                .unwrap();
        }
        assert_eq!(site.blog_posts(Locale::En).await.unwrap().len(), 1);
        assert!(site.blog_post("live", Locale::En).await.unwrap().is_some());
        assert!(site.blog_post("draft", Locale::En).await.unwrap().is_none());
        assert!(site.blog_post("nope", Locale::En).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn fixtures_are_read_only_and_missing_files_are_empty() {
        let dir = std::env::temp_dir().join(format!("site_fixtures_{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(
            dir.join("services.json"),
            r#"[{"title": "SEO", "description": "Search", "translations": {"ar": {"title": "تحسين محركات البحث"}}}]"#,
        )
        .await
        .unwrap();
        tokio::fs::write(dir.join("reviews.json"), r#"[{"client_name": "Sam", "content": "Great", "rating": 4}]"#)
            .await
            .unwrap();

        let catalog = Catalog::memory(CacheSettings::default());
        let site = SiteContent::from_fixtures(&dir, &catalog, CacheSettings::default()).await.unwrap();
        assert_eq!(site.source(), ContentSource::Fixtures);

        let page = site.landing(Locale::Ar).await.unwrap();
        assert_eq!(page.services[0].title, "تحسين محركات البحث");
        assert_eq!(page.reviews.len(), 1);
        assert!(page.team.is_empty());
        assert!(page.history.is_empty());

        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
