use common::Locale;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ModelError;
use crate::resource::{Ordinal, Resource, SortKey, SortValue, Timestamp};
use crate::translations::{self, Localize};
use crate::validation;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub position: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub image_url: Option<String>,
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
pub struct CreateTeamMember {
    pub name: String,
    pub position: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub order: Option<i32>,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateTeamMember {
    pub name: Option<String>,
    pub position: Option<String>,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub order: Option<i32>,
    pub translations: Option<Json>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamMemberView {
    pub id: Uuid,
    pub name: String,
    pub position: String,
    pub bio: Option<String>,
    pub image_url: Option<String>,
    pub order: i32,
}

impl Resource for Model {
    type Create = CreateTeamMember;
    type Patch = UpdateTeamMember;

    const TABLE: &'static str = "team_members";
    const SORT: SortKey = SortKey::asc("order");

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(id: Uuid, now: Timestamp, input: CreateTeamMember) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            name: validation::required("name", &input.name, 128)?,
            position: validation::required("position", &input.position, 128)?,
            bio: validation::optional(input.bio),
            image_url: validation::optional(input.image_url),
            order: input.order.unwrap_or(0),
            translations: translations::normalize(input.translations)?,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UpdateTeamMember, now: Timestamp) -> Result<(), ModelError> {
        if let Some(name) = patch.name {
            self.name = validation::required("name", &name, 128)?;
        }
        if let Some(position) = patch.position {
            self.position = validation::required("position", &position, 128)?;
        }
        if patch.bio.is_some() {
            self.bio = validation::optional(patch.bio);
        }
        if patch.image_url.is_some() {
            self.image_url = validation::optional(patch.image_url);
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
    type View = TeamMemberView;

    fn localize(&self, locale: Locale) -> TeamMemberView {
        TeamMemberView {
            id: self.id,
            name: translations::pick(&self.translations, locale, "name", &self.name),
            position: translations::pick(&self.translations, locale, "position", &self.position),
            bio: translations::pick_opt(&self.translations, locale, "bio", self.bio.as_deref()),
            image_url: self.image_url.clone(),
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
    fn arabic_overrides_position_and_bio() {
        let input = CreateTeamMember {
            name: "Omar".into(),
            position: "Engineer".into(),
            translations: Some(json!({"ar": {"name": "عمر", "position": "مهندس", "bio": "خبرة عشر سنوات"}})),
            ..Default::default()
        };
        let m = Model::build(Uuid::new_v4(), Utc::now().into(), input).unwrap();
        let ar = m.localize(Locale::Ar);
        assert_eq!(ar.name, "عمر");
        assert_eq!(ar.position, "مهندس");
        assert_eq!(ar.bio.as_deref(), Some("خبرة عشر سنوات"));
        let en = m.localize(Locale::En);
        assert_eq!(en.position, "Engineer");
        assert_eq!(en.bio, None);
    }
}
