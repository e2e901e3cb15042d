//! Authentication service for login, token management and user administration

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::{NewUserDraft, PasswordChangeDraft, Role, User};
use uuid::Uuid;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::store::{NewUser, Store};

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt_secret: String,
    access_token_expiry: i64,
    bcrypt_cost: u32,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    pub username: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

/// Authentication token
#[derive(Debug, Serialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Result of a successful login
#[derive(Debug, Serialize)]
pub struct LoginOutcome {
    #[serde(flatten)]
    pub tokens: AuthTokens,
    pub user: User,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(store: Arc<dyn Store>, config: &Config) -> Self {
        Self {
            store,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
            bcrypt_cost: config.auth.bcrypt_cost,
        }
    }

    /// Authenticate user with username and password
    ///
    /// Unknown usernames and wrong passwords fail identically.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<LoginOutcome> {
        let username = username.trim();

        let Some(credentials) = self.store.find_credentials(username).await? else {
            tracing::warn!(username, "Login failed: unknown user");
            return Err(AppError::InvalidCredentials);
        };

        if !self.verify_password(password, &credentials.password_hash)? {
            tracing::warn!(username, "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let tokens = self.generate_tokens(&credentials.user)?;
        tracing::info!(user_id = %credentials.user.id, username, "User logged in");

        Ok(LoginOutcome {
            tokens,
            user: credentials.user,
        })
    }

    /// Validate access token and return claims
    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AppError::Unauthorized {
            message: format!("Invalid token: {}", e),
            message_ja: "トークンが無効です。".to_string(),
        })?;

        Ok(token_data.claims)
    }

    /// Hash a password with the configured work factor
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        hash(password, self.bcrypt_cost)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))
    }

    /// Create an account; requires the admin capability
    pub async fn create_user(&self, actor: &AuthUser, draft: NewUserDraft) -> AppResult<User> {
        actor.require_admin()?;

        let password_hash = self.hash_password(&draft.password)?;
        let user = self
            .store
            .create_user(NewUser {
                username: draft.username,
                password_hash,
                role: draft.role,
            })
            .await?;

        tracing::info!(
            user_id = %user.id,
            username = %user.username,
            role = %user.role,
            created_by = %actor.username,
            "User created"
        );
        Ok(user)
    }

    /// Change the acting user's own password
    pub async fn change_password(&self, actor: &AuthUser, draft: PasswordChangeDraft) -> AppResult<()> {
        let credentials = self
            .store
            .find_credentials_by_id(actor.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        if !self.verify_password(&draft.current_password, &credentials.password_hash)? {
            return Err(AppError::Validation {
                field: "current_password".to_string(),
                message: "Current password is incorrect".to_string(),
                message_ja: "現在のパスワードが正しくありません。".to_string(),
            });
        }

        let password_hash = self.hash_password(&draft.new_password)?;
        self.store
            .set_password_hash(actor.user_id, &password_hash)
            .await?;

        tracing::info!(user_id = %actor.user_id, "Password changed");
        Ok(())
    }

    fn verify_password(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        verify(password, password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))
    }

    /// Generate an access token for a user
    fn generate_tokens(&self, user: &User) -> AppResult<AuthTokens> {
        let now = Utc::now();
        let access_exp = now + Duration::seconds(self.access_token_expiry);

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            role: user.role,
            exp: access_exp.timestamp(),
            iat: now.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token generation failed: {}", e)))?;

        Ok(AuthTokens {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.access_token_expiry,
        })
    }
}

impl Claims {
    /// The authenticated actor these claims describe
    pub fn into_auth_user(self) -> AppResult<AuthUser> {
        let user_id = Uuid::parse_str(&self.sub).map_err(|_| AppError::Unauthorized {
            message: "Invalid user ID in token".to_string(),
            message_ja: "トークンが無効です。".to_string(),
        })?;

        Ok(AuthUser {
            user_id,
            username: self.username,
            role: self.role,
        })
    }
}
