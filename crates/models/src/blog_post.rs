use common::Locale;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ModelError;
use crate::resource::{FilterField, FilterKind, Resource, SortKey, SortValue, Timestamp};
use crate::translations::{self, Localize};
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "blog_posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(unique)]
    pub slug: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub excerpt: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub cover_image: Option<String>,
    pub author_id: Option<Uuid>,
    pub published: bool,
    #[sea_orm(column_type = "JsonBinary")]
    pub translations: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::profile::Entity",
        from = "Column::AuthorId",
        to = "crate::profile::Column::Id"
    )]
    Author,
}

impl Related<crate::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateBlogPost {
    pub title: String,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub author_id: Option<Uuid>,
    pub published: bool,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateBlogPost {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub excerpt: Option<String>,
    pub content: Option<String>,
    pub cover_image: Option<String>,
    pub author_id: Option<Uuid>,
    pub published: Option<bool>,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BlogPostView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub content: String,
    pub cover_image: Option<String>,
    pub author_id: Option<Uuid>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,
}

impl Resource for Model {
    type Create = CreateBlogPost;
    type Patch = UpdateBlogPost;

    const TABLE: &'static str = "blog_posts";
    const UNIQUE: &'static [&'static str] = &["slug"];
    const SORT: SortKey = SortKey::desc("created_at");
    const FILTERS: &'static [FilterField] = &[
        FilterField::new("published", FilterKind::Bool),
        FilterField::new("slug", FilterKind::Text),
        FilterField::new("author_id", FilterKind::Uuid),
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(id: Uuid, now: Timestamp, input: CreateBlogPost) -> Result<Self, ModelError> {
        let title = validation::required("title", &input.title, 255)?;
        let slug = match validation::optional(input.slug) {
            Some(s) => validation::slug(&s)?,
            None => validation::slug(&validation::slugify(&title))
                .map_err(|_| ModelError::validation("slug is required when the title has no latin characters"))?,
        };
        Ok(Self {
            id,
            title,
            slug,
            excerpt: validation::optional(input.excerpt),
            content: validation::required("content", &input.content, 100_000)?,
            cover_image: validation::optional(input.cover_image),
            author_id: input.author_id,
            published: input.published,
            translations: translations::normalize(input.translations)?,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UpdateBlogPost, now: Timestamp) -> Result<(), ModelError> {
        if let Some(title) = patch.title {
            self.title = validation::required("title", &title, 255)?;
        }
        if let Some(slug) = patch.slug {
            self.slug = validation::slug(&slug)?;
        }
        if patch.excerpt.is_some() {
            self.excerpt = validation::optional(patch.excerpt);
        }
        if let Some(content) = patch.content {
            self.content = validation::required("content", &content, 100_000)?;
        }
        if patch.cover_image.is_some() {
            self.cover_image = validation::optional(patch.cover_image);
        }
        if patch.author_id.is_some() {
            self.author_id = patch.author_id;
        }
        if let Some(published) = patch.published {
            self.published = published;
        }
        if let Some(t) = patch.translations {
            self.translations = translations::normalize(Some(t))?;
        }
        self.updated_at = now;
        Ok(())
    }

    fn sort_value(&self) -> SortValue {
        SortValue::Time(self.created_at)
    }
}

impl Localize for Model {
    type View = BlogPostView;

    fn localize(&self, locale: Locale) -> BlogPostView {
        BlogPostView {
            id: self.id,
            title: translations::pick(&self.translations, locale, "title", &self.title),
            slug: self.slug.clone(),
            excerpt: translations::pick_opt(&self.translations, locale, "excerpt", self.excerpt.as_deref()),
            content: translations::pick(&self.translations, locale, "content", &self.content),
            cover_image: self.cover_image.clone(),
            author_id: self.author_id,
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn post(title: &str, slug: Option<&str>) -> Result<Model, ModelError> {
        let input = CreateBlogPost {
            title: title.into(),
            slug: slug.map(Into::into),
            content: "Body".into(),
            ..Default::default()
        };
        Model::build(Uuid::new_v4(), Utc::now().into(), input)
    }

    #[test]
    fn slug_is_derived_from_title() {
        assert_eq!(post("Launching Our New Site!", None).unwrap().slug, "launching-our-new-site");
        assert_eq!(post("x", Some("custom-slug")).unwrap().slug, "custom-slug");
    }

    #[test]
    fn arabic_title_needs_explicit_slug() {
        assert!(post("مقال جديد", None).is_err());
        assert!(post("مقال جديد", Some("new-post")).is_ok());
    }

    #[test]
    fn new_posts_are_drafts() {
        assert!(!post("Draft", None).unwrap().published);
    }
}
