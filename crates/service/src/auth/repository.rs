use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use models::profile::{self, CreateProfile, Role};
use models::{credential, validation, Filter, FilterValue};

use super::domain::{AuthUser, Credentials};
use super::errors::AuthError;
use crate::catalog::Catalog;
use crate::crud::CrudService;

/// Repository abstraction for auth-related persistence.
#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError>;
    async fn create_user(&self, email: &str, full_name: &str, role: Role) -> Result<AuthUser, AuthError>;

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError>;
    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError>;
}

/// Profiles and credentials stored through the catalog's CRUD services, so
/// dashboard edits to a profile are seen by the next sign-in.
#[derive(Clone)]
pub struct CatalogAuthRepository {
    profiles: Arc<CrudService<profile::Model>>,
    credentials: Arc<CrudService<credential::Model>>,
}

impl CatalogAuthRepository {
    pub fn new(catalog: &Catalog) -> Self {
        Self { profiles: catalog.profiles.clone(), credentials: catalog.credentials.clone() }
    }

    async fn credential_row(&self, user_id: Uuid) -> Result<Option<credential::Model>, AuthError> {
        let rows = self.credentials.list(Some(Filter::eq("user_id", FilterValue::Uuid(user_id)))).await?;
        Ok(rows.first().cloned())
    }
}

fn to_credentials(c: credential::Model) -> Credentials {
    Credentials { user_id: c.user_id, password_hash: c.password_hash, password_algorithm: c.password_algorithm }
}

#[async_trait]
impl AuthRepository for CatalogAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        // Lookups use the same normalisation profiles are stored with.
        let Ok(email) = validation::email(email) else { return Ok(None) };
        let rows = self.profiles.list(Some(Filter::eq("email", FilterValue::Text(email)))).await?;
        Ok(rows.first().cloned().map(AuthUser::from))
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<AuthUser>, AuthError> {
        Ok(self.profiles.get(Some(id)).await?.map(AuthUser::from))
    }

    async fn create_user(&self, email: &str, full_name: &str, role: Role) -> Result<AuthUser, AuthError> {
        let input = CreateProfile { email: email.to_string(), full_name: full_name.to_string(), role, ..Default::default() };
        Ok(self.profiles.create(input).await?.into())
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        Ok(self.credential_row(user_id).await?.map(to_credentials))
    }

    async fn upsert_password(&self, user_id: Uuid, password_hash: String, password_algorithm: String) -> Result<Credentials, AuthError> {
        let row = match self.credential_row(user_id).await? {
            Some(existing) => {
                let patch = credential::UpdateCredential {
                    password_hash: Some(password_hash),
                    password_algorithm: Some(password_algorithm),
                };
                self.credentials.update(existing.id, patch).await?
            }
            None => {
                let input = credential::CreateCredential { user_id, password_hash, password_algorithm };
                self.credentials.create(input).await?
            }
        };
        Ok(to_credentials(row))
    }
}
