//! Password hashes, one row per profile. Never leaves the service layer.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::resource::{FilterField, FilterKind, Resource, SortKey, SortValue, Timestamp};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_credentials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::profile::Entity",
        from = "Column::UserId",
        to = "crate::profile::Column::Id",
        on_delete = "Cascade"
    )]
    Profile,
}

impl Related<crate::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCredential {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCredential {
    pub password_hash: Option<String>,
    pub password_algorithm: Option<String>,
}

impl Resource for Model {
    type Create = CreateCredential;
    type Patch = UpdateCredential;

    const TABLE: &'static str = "user_credentials";
    const UNIQUE: &'static [&'static str] = &["user_id"];
    const SORT: SortKey = SortKey::asc("created_at");
    const FILTERS: &'static [FilterField] = &[FilterField::new("user_id", FilterKind::Uuid)];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(id: Uuid, now: Timestamp, input: CreateCredential) -> Result<Self, ModelError> {
        if input.password_hash.trim().is_empty() {
            return Err(ModelError::validation("password hash required"));
        }
        Ok(Self {
            id,
            user_id: input.user_id,
            password_hash: input.password_hash,
            password_algorithm: input.password_algorithm,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UpdateCredential, now: Timestamp) -> Result<(), ModelError> {
        if let Some(hash) = patch.password_hash {
            if hash.trim().is_empty() {
                return Err(ModelError::validation("password hash required"));
            }
            self.password_hash = hash;
        }
        if let Some(alg) = patch.password_algorithm {
            self.password_algorithm = alg;
        }
        self.updated_at = now;
        Ok(())
    }

    fn sort_value(&self) -> SortValue {
        SortValue::Time(self.created_at)
    }
}
