//! Headline figures on the landing page ("120+ projects delivered").

use common::Locale;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ModelError;
use crate::resource::{Ordinal, Resource, SortKey, SortValue, Timestamp};
use crate::translations::{self, Localize};
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "site_statistics")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub label: String,
    pub value: String,
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
pub struct CreateStatistic {
    pub label: String,
    pub value: String,
    pub icon: Option<String>,
    pub order: Option<i32>,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateStatistic {
    pub label: Option<String>,
    pub value: Option<String>,
    pub icon: Option<String>,
    pub order: Option<i32>,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StatisticView {
    pub id: Uuid,
    pub label: String,
    pub value: String,
    pub icon: Option<String>,
    pub order: i32,
}

impl Resource for Model {
    type Create = CreateStatistic;
    type Patch = UpdateStatistic;

    const TABLE: &'static str = "site_statistics";
    const SORT: SortKey = SortKey::asc("order");

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(id: Uuid, now: Timestamp, input: CreateStatistic) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            label: validation::required("label", &input.label, 128)?,
            value: validation::required("value", &input.value, 64)?,
            icon: validation::optional(input.icon),
            order: input.order.unwrap_or(0),
            translations: translations::normalize(input.translations)?,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UpdateStatistic, now: Timestamp) -> Result<(), ModelError> {
        if let Some(label) = patch.label {
            self.label = validation::required("label", &label, 128)?;
        }
        if let Some(value) = patch.value {
            self.value = validation::required("value", &value, 64)?;
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
    type View = StatisticView;

    fn localize(&self, locale: Locale) -> StatisticView {
        StatisticView {
            id: self.id,
            label: translations::pick(&self.translations, locale, "label", &self.label),
            value: translations::pick(&self.translations, locale, "value", &self.value),
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

    #[test]
    fn value_can_be_localized_digits() {
        let input = CreateStatistic {
            label: "Projects".into(),
            value: "120+".into(),
            translations: Some(json!({"ar": {"label": "مشروع", "value": "١٢٠+"}})),
            ..Default::default()
        };
        let m = Model::build(Uuid::new_v4(), Utc::now().into(), input).unwrap();
        let ar = m.localize(Locale::Ar);
        assert_eq!(ar.label, "مشروع");
        assert_eq!(ar.value, "١٢٠+");
        assert_eq!(m.localize(Locale::En).value, "120+");
    }
}
