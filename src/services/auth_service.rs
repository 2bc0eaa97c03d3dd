//! Authentication service - handles account registration, login, and
//! session token verification.
//!
//! Login is a deliberate soft-fail path: credential failures come back as
//! a structured outcome with a message, never as an error. Registration
//! fails fast with typed errors.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{is_valid_role, Config, ROLE_USER};
use crate::domain::{AccountResponse, Password};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Structured login result.
///
/// On failure the token and account stay empty and `message` says which
/// precondition failed; callers never need exception-style control flow
/// to tell bad-username from bad-password.
#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    pub token: Option<String>,
    pub account: Option<AccountResponse>,
    pub message: String,
}

impl LoginOutcome {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            token: None,
            account: None,
            message: message.into(),
        }
    }

    /// Whether the login succeeded and a token was issued
    pub fn is_success(&self) -> bool {
        self.token.is_some()
    }
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new account.
    ///
    /// The secret is stored only as an argon2 hash; the returned
    /// projection never carries it. The role label defaults to "User".
    async fn register(
        &self,
        username: String,
        name: String,
        password: String,
        role: Option<String>,
    ) -> AppResult<AccountResponse>;

    /// Verify credentials and issue a session token
    async fn login(&self, username: String, password: String) -> AppResult<LoginOutcome>;

    /// Verify a session token's signature and expiry, returning its claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;
}

/// Generate a session token for an account
fn generate_token(
    id: Uuid,
    username: &str,
    role: &str,
    config: &Config,
) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(config.token_expiration_hours);

    let claims = Claims {
        sub: id,
        username: username.to_string(),
        role: role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?;

    Ok(token)
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        username: String,
        name: String,
        password: String,
        role: Option<String>,
    ) -> AppResult<AccountResponse> {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(AppError::validation("Username is required"));
        }

        let role_label = match role {
            Some(label) => {
                if !is_valid_role(&label) {
                    return Err(AppError::validation(format!("Unknown role: {}", label)));
                }
                label
            }
            None => ROLE_USER.to_string(),
        };

        let password_hash = Password::new(&password)?.into_string();

        // Uniqueness check, role registration, and account insert commit
        // or roll back together.
        let account = self
            .uow
            .transaction(|ctx| {
                Box::pin(async move {
                    if ctx.accounts().find_by_username(&username).await?.is_some() {
                        return Err(AppError::duplicate("Username"));
                    }

                    ctx.roles().ensure(&role_label).await?;
                    ctx.accounts()
                        .create(username, name, password_hash, role_label)
                        .await
                })
            })
            .await?;

        Ok(AccountResponse::from(account))
    }

    async fn login(&self, username: String, password: String) -> AppResult<LoginOutcome> {
        if username.trim().is_empty() {
            return Ok(LoginOutcome::failure("Invalid username is required"));
        }
        if password.is_empty() {
            return Ok(LoginOutcome::failure("Invalid password is required"));
        }

        let account = match self.uow.accounts().find_by_username(&username).await? {
            Some(account) => account,
            None => return Ok(LoginOutcome::failure("Invalid username")),
        };

        let stored = Password::from_hash(account.password_hash.clone());
        if !stored.verify(&password) {
            return Ok(LoginOutcome::failure("Invalid password"));
        }

        // Exactly one role claim is embedded, the account's stored role.
        let token = generate_token(
            account.id,
            &account.username,
            account.role.as_str(),
            &self.config,
        )?;

        Ok(LoginOutcome {
            token: Some(token),
            account: Some(AccountResponse::from(account)),
            message: "Login successful".to_string(),
        })
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }
}
