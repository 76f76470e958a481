//! Services the company offers (`services` table), shown in display order.

use common::Locale;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ModelError;
use crate::resource::{Ordinal, Resource, SortKey, SortValue, Timestamp};
use crate::translations::{self, Localize};
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "services")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub icon: Option<String>,
    pub order: i32,
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
pub struct CreateService {
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub order: Option<i32>,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateService {
    pub title: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    pub order: Option<i32>,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ServiceView {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub icon: Option<String>,
    pub order: i32,
}

impl Resource for Model {
    type Create = CreateService;
    type Patch = UpdateService;

    const TABLE: &'static str = "services";
    const SORT: SortKey = SortKey::asc("order");

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(id: Uuid, now: Timestamp, input: CreateService) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            title: validation::required("title", &input.title, 255)?,
            description: validation::required("description", &input.description, 10_000)?,
            icon: validation::optional(input.icon),
            order: input.order.unwrap_or(0),
            translations: translations::normalize(input.translations)?,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UpdateService, now: Timestamp) -> Result<(), ModelError> {
        if let Some(title) = patch.title {
            self.title = validation::required("title", &title, 255)?;
        }
        if let Some(description) = patch.description {
            self.description = validation::required("description", &description, 10_000)?;
        }
        if patch.icon.is_some() {
            self.icon = validation::optional(patch.icon);
        }
        if let Some(order) = patch.order {
            self.order = order;
        }
        if let Some(t) = patch.translations {
            self.translations = translations::normalize(Some(t))?;
        }
        self.updated_at = now;
        Ok(())
    }

    fn sort_value(&self) -> SortValue {
        SortValue::Int(self.order as i64)
    }
}

impl Ordinal for Model {
    fn ordinal(&self) -> i32 {
        self.order
    }

    fn set_ordinal(&mut self, ordinal: i32, now: Timestamp) {
        self.order = ordinal;
        self.updated_at = now;
    }
}

impl Localize for Model {
    type View = ServiceView;

    fn localize(&self, locale: Locale) -> ServiceView {
        ServiceView {
            id: self.id,
            title: translations::pick(&self.translations, locale, "title", &self.title),
            description: translations::pick(&self.translations, locale, "description", &self.description),
            icon: self.icon.clone(),
            order: self.order,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    fn sample() -> Model {
        let input = CreateService {
            title: " Web Design ".into(),
            description: "Sites that convert".into(),
            order: Some(2),
            translations: Some(json!({"ar": {"title": "تصميم المواقع"}})),
            ..Default::default()
        };
        Model::build(Uuid::new_v4(), Utc::now().into(), input).unwrap()
    }

    #[test]
    fn build_trims_and_defaults() {
        let m = sample();
        assert_eq!(m.title, "Web Design");
        assert_eq!(m.order, 2);
        assert_eq!(m.created_at, m.updated_at);
    }

    #[test]
    fn build_rejects_blank_title() {
        let input = CreateService { description: "x".into(), ..Default::default() };
        assert!(Model::build(Uuid::new_v4(), Utc::now().into(), input).is_err());
    }

    #[test]
    fn localize_falls_back_per_field() {
        let m = sample();
        let ar = m.localize(Locale::Ar);
        assert_eq!(ar.title, "تصميم المواقع");
        assert_eq!(ar.description, "Sites that convert");
        assert_eq!(m.localize(Locale::En).title, "Web Design");
    }

    #[test]
    fn apply_stamps_updated_at() {
        let mut m = sample();
        let later: Timestamp = (Utc::now() + chrono::Duration::seconds(5)).into();
        m.apply(UpdateService { order: Some(7), ..Default::default() }, later).unwrap();
        assert_eq!(m.order, 7);
        assert_eq!(m.updated_at, later);
        assert_eq!(m.title, "Web Design");
    }
}
