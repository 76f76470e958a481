use std::sync::Arc;

use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header as JwtHeader, Validation};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use models::profile::Role;

use super::domain::{AuthSession, AuthUser, ChangePasswordInput, Claims, CreateStaffInput, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Auth service settings
#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub password_algorithm: String,
    pub token_ttl_hours: i64,
}

impl From<&configs::AuthConfig> for AuthSettings {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            password_algorithm: "argon2".into(),
            token_ttl_hours: cfg.token_ttl_hours,
        }
    }
}

fn check_password(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::Validation(format!("password too short (>={MIN_PASSWORD_LEN})")));
    }
    Ok(())
}

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::HashError(e.to_string()))?
        .to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|e| AuthError::HashError(e.to_string()))?;
    Ok(Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthSettings,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthSettings) -> Self { Self { repo, cfg } }

    /// Register a new client account with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthSettings, CatalogAuthRepository};
    /// use service::auth::domain::RegisterInput;
    /// use service::{cache::CacheSettings, catalog::Catalog};
    /// use std::sync::Arc;
    /// let catalog = Catalog::memory(CacheSettings::default());
    /// let repo = Arc::new(CatalogAuthRepository::new(&catalog));
    /// let svc = AuthService::new(repo, AuthSettings { jwt_secret: "secret".into(), password_algorithm: "argon2".into(), token_ttl_hours: 12 });
    /// let input = RegisterInput { email: "user@example.com".into(), full_name: "Test".into(), password: "Secret123".into() };
    /// let user = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert_eq!(user.email, "user@example.com");
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        self.create_account(&input.email, &input.full_name, &input.password, Role::Client).await
    }

    /// Admin-created account with any role.
    #[instrument(skip(self, input), fields(email = %input.email, role = %input.role))]
    pub async fn create_user(&self, input: CreateStaffInput) -> Result<AuthUser, AuthError> {
        self.create_account(&input.email, &input.full_name, &input.password, input.role).await
    }

    async fn create_account(&self, email: &str, full_name: &str, password: &str, role: Role) -> Result<AuthUser, AuthError> {
        check_password(password)?;
        if let Some(existing) = self.repo.find_user_by_email(email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        let user = self.repo.create_user(email, full_name, role).await?;
        let hash = hash_password(password)?;
        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user.id, email = %user.email, role = %user.role, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and issue a token.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, AuthSettings, CatalogAuthRepository};
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use service::{cache::CacheSettings, catalog::Catalog};
    /// use std::sync::Arc;
    /// let catalog = Catalog::memory(CacheSettings::default());
    /// let repo = Arc::new(CatalogAuthRepository::new(&catalog));
    /// let svc = AuthService::new(repo, AuthSettings { jwt_secret: "secret".into(), password_algorithm: "argon2".into(), token_ttl_hours: 12 });
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { email: "u@e.com".into(), full_name: "N".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(session.user.email, "u@e.com");
    /// assert!(svc.verify_token(&session.token).is_ok());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        if !verify_password(&input.password, &cred.password_hash)? {
            return Err(AuthError::Unauthorized);
        }

        let token = self.issue_token(&user)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user, token })
    }

    pub fn issue_token(&self, user: &AuthUser) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
        let claims = Claims { sub: user.email.clone(), uid: user.id, role: user.role.as_str().to_string(), exp };
        encode(&JwtHeader::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.cfg.jwt_secret.as_bytes()))
            .map_err(|e| AuthError::TokenError(e.to_string()))
    }

    /// Decode and check signature and expiry; any failure is `Unauthorized`.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &DecodingKey::from_secret(self.cfg.jwt_secret.as_bytes()), &Validation::new(Algorithm::HS256))
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                AuthError::Unauthorized
            })
    }

    /// The current profile behind a token. A deleted profile invalidates its tokens.
    pub async fn me(&self, token: &str) -> Result<AuthUser, AuthError> {
        let claims = self.verify_token(token)?;
        self.repo.find_user(claims.uid).await?.ok_or(AuthError::Unauthorized)
    }

    #[instrument(skip(self, input))]
    pub async fn change_password(&self, user_id: Uuid, input: ChangePasswordInput) -> Result<(), AuthError> {
        let cred = self.repo.get_credentials(user_id).await?.ok_or(AuthError::NotFound)?;
        if !verify_password(&input.current_password, &cred.password_hash)? {
            return Err(AuthError::Unauthorized);
        }
        check_password(&input.new_password)?;
        let hash = hash_password(&input.new_password)?;
        self.repo.upsert_password(user_id, hash, self.cfg.password_algorithm.clone()).await?;
        info!(user_id = %user_id, "password_changed");
        Ok(())
    }

    /// Create the configured admin unless an account with that email exists.
    /// Returns whether an account was created.
    pub async fn ensure_bootstrap_admin(&self, email: &str, password: &str) -> Result<bool, AuthError> {
        if let Some(existing) = self.repo.find_user_by_email(email).await? {
            debug!(user_id = %existing.id, "bootstrap admin already present");
            return Ok(false);
        }
        self.create_account(email, "Administrator", password, Role::Admin).await?;
        Ok(true)
    }
}
