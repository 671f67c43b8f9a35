/// Authentication service - JWT and password handling.
///
/// Token issuance and verification is boundary glue around the core:
/// nothing below the HTTP layer knows about JWTs.
use crate::error::{Result, ServerError};
use chorus_core::UserId;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone)]
pub struct AuthService {
    secret: String,
    access_expiration: Duration,
    refresh_expiration: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // Subject (user ID)
    pub exp: i64,    // Expiration time
    pub iat: i64,    // Issued at
    pub kind: TokenKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl AuthService {
    pub fn new(secret: String, access_expiration_hours: u64, refresh_expiration_days: u64) -> Self {
        Self {
            secret,
            access_expiration: Duration::hours(access_expiration_hours as i64),
            refresh_expiration: Duration::days(refresh_expiration_days as i64),
        }
    }

    /// Hash a password using bcrypt
    pub fn hash_password(&self, password: &str) -> Result<String> {
        bcrypt::hash(password, bcrypt::DEFAULT_COST).map_err(ServerError::from)
    }

    /// Verify a password against a hash
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool> {
        bcrypt::verify(password, hash).map_err(ServerError::from)
    }

    /// Issue an access token
    pub fn issue_access_token(&self, user_id: &UserId) -> Result<String> {
        self.issue(user_id, TokenKind::Access, self.access_expiration)
    }

    /// Issue a refresh token
    pub fn issue_refresh_token(&self, user_id: &UserId) -> Result<String> {
        self.issue(user_id, TokenKind::Refresh, self.refresh_expiration)
    }

    /// Verify that a token is an access token and return its subject
    pub fn verify_access_token(&self, token: &str) -> Result<UserId> {
        self.verify(token, TokenKind::Access)
    }

    /// Verify that a token is a refresh token and return its subject
    pub fn verify_refresh_token(&self, token: &str) -> Result<UserId> {
        self.verify(token, TokenKind::Refresh)
    }

    fn issue(&self, user_id: &UserId, kind: TokenKind, expiration: Duration) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.as_str().to_string(),
            exp: (now + expiration).timestamp(),
            iat: now.timestamp(),
            kind,
        };

        let encoding_key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::default(), &claims, &encoding_key).map_err(ServerError::from)
    }

    fn verify(&self, token: &str, expected: TokenKind) -> Result<UserId> {
        let decoding_key = DecodingKey::from_secret(self.secret.as_bytes());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())?;

        if token_data.claims.kind != expected {
            return Err(ServerError::Auth("Invalid token type".to_string()));
        }
        Ok(UserId::new(token_data.claims.sub))
    }
}
