use common::Locale;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ModelError;
use crate::resource::{FilterField, FilterKind, Resource, SortKey, SortValue, Timestamp};
use crate::translations::{self, Localize};
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub link: Option<String>,
    #[sea_orm(column_type = "JsonBinary")]
    pub translations: Json,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub link: Option<String>,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProjectView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: Option<String>,
    pub image_url: Option<String>,
    pub link: Option<String>,
}

impl Resource for Model {
    type Create = CreateProject;
    type Patch = UpdateProject;

    const TABLE: &'static str = "projects";
    const SORT: SortKey = SortKey::desc("created_at");
    const FILTERS: &'static [FilterField] = &[FilterField::new("category", FilterKind::Text)];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(id: Uuid, now: Timestamp, input: CreateProject) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            title: validation::required("title", &input.title, 255)?,
            description: validation::required("description", &input.description, 10_000)?,
            category: validation::optional(input.category),
            image_url: validation::optional(input.image_url),
            link: validation::optional(input.link),
            translations: translations::normalize(input.translations)?,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UpdateProject, now: Timestamp) -> Result<(), ModelError> {
        if let Some(title) = patch.title {
            self.title = validation::required("title", &title, 255)?;
        }
        if let Some(description) = patch.description {
            self.description = validation::required("description", &description, 10_000)?;
        }
        if patch.category.is_some() {
            self.category = validation::optional(patch.category);
        }
        if patch.image_url.is_some() {
            self.image_url = validation::optional(patch.image_url);
        }
        if patch.link.is_some() {
            self.link = validation::optional(patch.link);
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
    type View = ProjectView;

    fn localize(&self, locale: Locale) -> ProjectView {
        ProjectView {
            id: self.id,
            title: translations::pick(&self.translations, locale, "title", &self.title),
            description: translations::pick(&self.translations, locale, "description", &self.description),
            category: translations::pick_opt(&self.translations, locale, "category", self.category.as_deref()),
            image_url: self.image_url.clone(),
            link: self.link.clone(),
        }
    }
}
