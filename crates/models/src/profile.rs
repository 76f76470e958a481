//! Account profiles. The id is shared with the credential row and the JWT subject.

use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ModelError;
use crate::resource::{FilterField, FilterKind, Resource, SortKey, SortValue, Timestamp};
use crate::validation;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Employee,
    #[default]
    Client,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Employee => "employee",
            Role::Client => "client",
        }
    }

    /// Admins and employees may use the dashboard.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Employee)
    }
}

impl FromStr for Role {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "employee" => Ok(Role::Employee),
            "client" => Ok(Role::Client),
            other => Err(ModelError::validation(format!("unknown role `{other}`"))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub email: String,
    pub full_name: String,
    pub role: String,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "crate::blog_post::Entity")]
    BlogPosts,
}

impl Related<crate::blog_post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BlogPosts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Stored role; unknown values are treated as the least privileged.
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreateProfile {
    pub email: String,
    pub full_name: String,
    pub role: Role,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct UpdateProfile {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Option<Role>,
    pub avatar_url: Option<String>,
    pub phone: Option<String>,
}

impl Resource for Model {
    type Create = CreateProfile;
    type Patch = UpdateProfile;

    const TABLE: &'static str = "profiles";
    const UNIQUE: &'static [&'static str] = &["email"];
    const SORT: SortKey = SortKey::desc("created_at");
    const FILTERS: &'static [FilterField] = &[
        FilterField::new("role", FilterKind::Text),
        FilterField::new("email", FilterKind::Text),
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(id: Uuid, now: Timestamp, input: CreateProfile) -> Result<Self, ModelError> {
        Ok(Self {
            id,
            email: validation::email(&input.email)?,
            full_name: validation::required("full_name", &input.full_name, 128)?,
            role: input.role.as_str().to_string(),
            avatar_url: validation::optional(input.avatar_url),
            phone: validation::optional(input.phone),
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UpdateProfile, now: Timestamp) -> Result<(), ModelError> {
        if let Some(email) = patch.email {
            self.email = validation::email(&email)?;
        }
        if let Some(name) = patch.full_name {
            self.full_name = validation::required("full_name", &name, 128)?;
        }
        if let Some(role) = patch.role {
            self.role = role.as_str().to_string();
        }
        if patch.avatar_url.is_some() {
            self.avatar_url = validation::optional(patch.avatar_url);
        }
        if patch.phone.is_some() {
            self.phone = validation::optional(patch.phone);
        }
        self.updated_at = now;
        Ok(())
    }

    fn sort_value(&self) -> SortValue {
        SortValue::Time(self.created_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn roles_parse_and_classify() {
        assert_eq!("Admin".parse::<Role>().unwrap(), Role::Admin);
        assert!("root".parse::<Role>().is_err());
        assert!(Role::Employee.is_staff());
        assert!(!Role::Client.is_staff());
    }

    #[test]
    fn build_defaults_to_client() {
        let input = CreateProfile { email: "a@b.co".into(), full_name: "Amal".into(), ..Default::default() };
        let p = Model::build(Uuid::new_v4(), Utc::now().into(), input).unwrap();
        assert_eq!(p.role(), Role::Client);
        assert_eq!(serde_json::to_value(Role::Employee).unwrap(), "employee");
    }

    #[test]
    fn unknown_stored_role_is_client() {
        let input = CreateProfile { email: "a@b.co".into(), full_name: "Amal".into(), ..Default::default() };
        let mut p = Model::build(Uuid::new_v4(), Utc::now().into(), input).unwrap();
        p.role = "superuser".into();
        assert_eq!(p.role(), Role::Client);
    }
}
