//! Signed session tokens issued after phone verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Profile, UserType};

/// Session validity window.
pub const SESSION_TTL_DAYS: i64 = 7;

#[derive(Debug, Error)]
#[error("session token error: {0}")]
pub struct SessionError(#[from] jsonwebtoken::errors::Error);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Profile / auth identity id.
    pub sub: Uuid,
    pub phone: String,
    pub user_type: UserType,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signer for session tokens.
#[derive(Clone)]
pub struct SessionSigner {
    encoding_key: EncodingKey,
    #[cfg(test)]
    decoding_key: jsonwebtoken::DecodingKey,
    ttl: Duration,
}

impl SessionSigner {
    pub fn new(secret: &str) -> Self {
        Self::with_ttl(secret, Duration::days(SESSION_TTL_DAYS))
    }

    pub fn with_ttl(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            #[cfg(test)]
            decoding_key: jsonwebtoken::DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn issue(&self, user_id: Uuid, phone: &str, user_type: UserType) -> Result<String, SessionError> {
        let now = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user_id,
            phone: phone.to_string(),
            user_type,
            iat: now,
            exp: now + self.ttl.num_seconds(),
        };
        Ok(jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &self.encoding_key,
        )?)
    }

    /// Issues a token for `profile`, falling back to `phone` when the row has none.
    pub fn issue_for(&self, profile: &Profile, phone: &str) -> Result<String, SessionError> {
        let phone = profile.phone_number.as_deref().unwrap_or(phone);
        self.issue(profile.id, phone, profile.user_type)
    }
}

// Tokens are checked by the client-facing backend; here only tests decode them.
#[cfg(test)]
impl SessionSigner {
    pub fn verify(&self, token: &str) -> Result<SessionClaims, SessionError> {
        let validation = jsonwebtoken::Validation::default();
        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
