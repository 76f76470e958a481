use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use models::profile::{self, Role};

/// Sign-up input; new accounts are always clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterInput {
    pub email: String,
    pub full_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangePasswordInput {
    pub current_password: String,
    pub new_password: String,
}

/// Admin-created account with an explicit role.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateStaffInput {
    pub email: String,
    pub full_name: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

/// Domain user (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    pub role: Role,
}

impl From<profile::Model> for AuthUser {
    fn from(p: profile::Model) -> Self {
        Self { role: p.role(), id: p.id, email: p.email, full_name: p.full_name }
    }
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// Login result (session)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthSession {
    pub user: AuthUser,
    pub token: String,
}

/// JWT payload. `sub` is the email, `uid` the profile id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: Uuid,
    pub role: String,
    pub exp: usize,
}

impl Claims {
    pub fn role(&self) -> Role {
        self.role.parse().unwrap_or_default()
    }
}
