//! Dashboard session tokens.
//!
//! A successful `/auth/login` or first-run `/auth/createuser` hands the
//! browser one HS256 token; every other route checks it through
//! [`crate::middleware::auth::AuthUser`]. There is no refresh flow: when the
//! token lapses the dashboard logs in again.

use jellystat_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minutes a session token stays valid when `JWT_ACCESS_EXPIRY_MINS` is unset.
const DEFAULT_SESSION_MINS: i64 = 1440;

/// Payload of a session token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// `app_users.id` of the signed-in account.
    pub sub: DbId,
    pub username: String,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

/// Signing secret and session lifetime.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
}

impl JwtConfig {
    /// Read `JWT_SECRET` (required, non-empty) and `JWT_ACCESS_EXPIRY_MINS`.
    ///
    /// # Panics
    ///
    /// At startup, when the secret is missing or the expiry is not a number.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let access_token_expiry_mins = std::env::var("JWT_ACCESS_EXPIRY_MINS")
            .ok()
            .map(|v| {
                v.parse()
                    .expect("JWT_ACCESS_EXPIRY_MINS must be a whole number of minutes")
            })
            .unwrap_or(DEFAULT_SESSION_MINS);

        Self {
            secret,
            access_token_expiry_mins,
        }
    }

    /// Session lifetime in seconds, as reported in `expires_in`.
    pub fn expires_in_secs(&self) -> i64 {
        self.access_token_expiry_mins * 60
    }
}

/// Sign a session token for a dashboard account.
pub fn issue_token(
    account_id: DbId,
    username: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let iat = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: account_id,
        username: username.to_string(),
        exp: iat + config.expires_in_secs(),
        iat,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Check the signature and expiry of a session token.
pub fn verify_token(token: &str, config: &JwtConfig) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}
