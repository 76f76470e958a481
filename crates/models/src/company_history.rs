use common::Locale;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ModelError;
use crate::resource::{Resource, SortKey, SortValue, Timestamp};
use crate::translations::{self, Localize};
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "company_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub year: i32,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
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
pub struct CreateMilestone {
    pub year: i32,
    pub title: String,
    pub description: String,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateMilestone {
    pub year: Option<i32>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MilestoneView {
    pub id: Uuid,
    pub year: i32,
    pub title: String,
    pub description: String,
}

fn year(value: i32) -> Result<i32, ModelError> {
    if (1900..=2200).contains(&value) {
        Ok(value)
    } else {
        Err(ModelError::validation("year must be between 1900 and 2200"))
    }
}

impl Resource for Model {
    type Create = CreateMilestone;
    type Patch = UpdateMilestone;

    const TABLE: &'static str = "company_history";
    const SORT: SortKey = SortKey::desc("year");

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(id: Uuid, now: Timestamp, input: CreateMilestone) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            year: year(input.year)?,
            title: validation::required("title", &input.title, 255)?,
            description: validation::required("description", &input.description, 10_000)?,
            translations: translations::normalize(input.translations)?,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UpdateMilestone, now: Timestamp) -> Result<(), ModelError> {
        if let Some(y) = patch.year {
            self.year = year(y)?;
        }
        if let Some(title) = patch.title {
            self.title = validation::required("title", &title, 255)?;
        }
        if let Some(description) = patch.description {
            self.description = validation::required("description", &description, 10_000)?;
        }
        if let Some(t) = patch.translations {
            self.translations = translations::normalize(Some(t))?;
        }
        self.updated_at = now;
        Ok(())
    }

    fn sort_value(&self) -> SortValue {
        SortValue::Int(self.year as i64)
    }
}

impl Localize for Model {
    type View = MilestoneView;

    fn localize(&self, locale: Locale) -> MilestoneView {
        MilestoneView {
            id: self.id,
            year: self.year,
            title: translations::pick(&self.translations, locale, "title", &self.title),
            description: translations::pick(&self.translations, locale, "description", &self.description),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;

    #[test]
    fn milestone_localizes_and_validates_year() {
        let input = CreateMilestone {
            year: 2019,
            title: "Founded".into(),
            description: "Two people and a laptop".into(),
            translations: Some(json!({"ar": {"title": "التأسيس"}})),
        };
        let m = Model::build(Uuid::new_v4(), Utc::now().into(), input).unwrap();
        assert_eq!(m.localize(Locale::Ar).title, "التأسيس");
        assert_eq!(m.localize(Locale::Ar).description, "Two people and a laptop");
        assert_eq!(m.sort_value(), SortValue::Int(2019));

        let bad = CreateMilestone { year: 12, title: "x".into(), description: "y".into(), translations: None };
        assert!(Model::build(Uuid::new_v4(), Utc::now().into(), bad).is_err());
    }
}
