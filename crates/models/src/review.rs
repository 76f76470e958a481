//! Client testimonials. Only approved rows are shown publicly.

use common::Locale;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ModelError;
use crate::resource::{FilterField, FilterKind, Resource, SortKey, SortValue, Timestamp};
use crate::translations::{self, Localize};
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_name: String,
    pub company: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub rating: i32,
    pub approved: bool,
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
pub struct CreateReview {
    pub client_name: String,
    pub company: Option<String>,
    pub content: String,
    pub rating: i32,
    pub approved: bool,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateReview {
    pub client_name: Option<String>,
    pub company: Option<String>,
    pub content: Option<String>,
    pub rating: Option<i32>,
    pub approved: Option<bool>,
    pub translations: Option<Json>,
}

/// Body of the public "leave a review" form.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SubmitReview {
    pub client_name: String,
    #[serde(default)]
    pub company: Option<String>,
    pub content: String,
    pub rating: i32,
}

impl From<SubmitReview> for CreateReview {
    fn from(s: SubmitReview) -> Self {
        CreateReview {
            client_name: s.client_name,
            company: s.company,
            content: s.content,
            rating: s.rating,
            approved: false,
            translations: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReviewView {
    pub id: Uuid,
    pub client_name: String,
    pub company: Option<String>,
    pub content: String,
    pub rating: i32,
}

fn rating(value: i32) -> Result<i32, ModelError> {
    if (1..=5).contains(&value) {
        Ok(value)
    } else {
        Err(ModelError::validation("rating must be between 1 and 5"))
    }
}

impl Resource for Model {
    type Create = CreateReview;
    type Patch = UpdateReview;

    const TABLE: &'static str = "reviews";
    const SORT: SortKey = SortKey::desc("created_at");
    const FILTERS: &'static [FilterField] = &[FilterField::new("approved", FilterKind::Bool)];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(id: Uuid, now: Timestamp, input: CreateReview) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            client_name: validation::required("client_name", &input.client_name, 128)?,
            company: validation::optional(input.company),
            content: validation::required("content", &input.content, 2_000)?,
            rating: rating(input.rating)?,
            approved: input.approved,
            translations: translations::normalize(input.translations)?,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UpdateReview, now: Timestamp) -> Result<(), ModelError> {
        if let Some(name) = patch.client_name {
            self.client_name = validation::required("client_name", &name, 128)?;
        }
        if patch.company.is_some() {
            self.company = validation::optional(patch.company);
        }
        if let Some(content) = patch.content {
            self.content = validation::required("content", &content, 2_000)?;
        }
        if let Some(r) = patch.rating {
            self.rating = rating(r)?;
        }
        if let Some(approved) = patch.approved {
            self.approved = approved;
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
    type View = ReviewView;

    fn localize(&self, locale: Locale) -> ReviewView {
        ReviewView {
            id: self.id,
            client_name: translations::pick(&self.translations, locale, "client_name", &self.client_name),
            company: translations::pick_opt(&self.translations, locale, "company", self.company.as_deref()),
            content: translations::pick(&self.translations, locale, "content", &self.content),
            rating: self.rating,
        }
    }
}
