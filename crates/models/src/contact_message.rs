//! Messages left through the public contact form.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::ModelError;
use crate::resource::{FilterField, FilterKind, Resource, SortKey, SortValue, Timestamp};
use crate::validation;

pub const MESSAGE_MIN_LEN: usize = 10;
pub const MESSAGE_MAX_LEN: usize = 5_000;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "contact_messages")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub read: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct CreateContactMessage {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

impl CreateContactMessage {
    /// Run the form checks and return the normalized submission.
    pub fn validated(self) -> Result<Self, ModelError> {
        let message = self.message.trim().to_string();
        let len = message.chars().count();
        if len < MESSAGE_MIN_LEN {
            return Err(ModelError::validation(format!(
                "message must be at least {MESSAGE_MIN_LEN} characters"
            )));
        }
        if len > MESSAGE_MAX_LEN {
            return Err(ModelError::validation(format!(
                "message must be at most {MESSAGE_MAX_LEN} characters"
            )));
        }
        Ok(Self {
            name: validation::required("name", &self.name, 128)?,
            email: validation::email(&self.email)?,
            phone: validation::optional(self.phone),
            subject: validation::optional(self.subject),
            message,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpdateContactMessage {
    pub read: Option<bool>,
}

impl Resource for Model {
    type Create = CreateContactMessage;
    type Patch = UpdateContactMessage;

    const TABLE: &'static str = "contact_messages";
    const SORT: SortKey = SortKey::desc("created_at");
    const FILTERS: &'static [FilterField] = &[FilterField::new("read", FilterKind::Bool)];

    fn id(&self) -> Uuid {
        self.id
    }

    fn build(id: Uuid, now: Timestamp, input: CreateContactMessage) -> Result<Self, ModelError> {
        let input = input.validated()?;
        Ok(Self {
            id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            subject: input.subject,
            message: input.message,
            read: false,
            created_at: now,
            updated_at: now,
        })
    }

    fn apply(&mut self, patch: UpdateContactMessage, now: Timestamp) -> Result<(), ModelError> {
        if let Some(read) = patch.read {
            self.read = read;
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

    fn form(name: &str, email: &str, message: &str) -> CreateContactMessage {
        CreateContactMessage { name: name.into(), email: email.into(), message: message.into(), ..Default::default() }
    }

    #[test]
    fn valid_form_is_normalized() {
        let f = form(" Huda ", "HUDA@mail.com", "  I need a new website please ").validated().unwrap();
        assert_eq!(f.name, "Huda");
        assert_eq!(f.email, "huda@mail.com");
        assert_eq!(f.message, "I need a new website please");
    }

    #[test]
    fn invalid_forms_are_rejected() {
        assert!(form("", "a@b.co", "long enough message").validated().is_err());
        assert!(form("Huda", "not-an-email", "long enough message").validated().is_err());
        assert!(form("Huda", "a@b.co", "short").validated().is_err());
        assert!(form("Huda", "a@b.co", &"x".repeat(MESSAGE_MAX_LEN + 1)).validated().is_err());
    }
}
