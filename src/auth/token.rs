//! Signed, time-limited auth tokens.
//!
//! Tokens are HS256 JWTs carrying only the user id. Expiry is checked
//! here against an explicit clock rather than inside `jsonwebtoken`, so the
//! boundary is exact (no leeway) and tests can move time.

use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Claims embedded in every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User id
    pub id: i64,
    /// Issued at (Unix seconds)
    pub iat: i64,
    /// Expires at (Unix seconds); the token is invalid from this instant on
    pub exp: i64,
}

pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    pub fn issue(&self, user_id: i64) -> Result<String, AuthError> {
        self.issue_at(user_id, chrono::Utc::now().timestamp())
    }

    pub fn issue_at(&self, user_id: i64, now: i64) -> Result<String, AuthError> {
        let claims = TokenClaims {
            id: user_id,
            iat: now,
            exp: now + self.ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<TokenClaims, AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            }
        })?;

        if now >= data.claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(data.claims)
    }
}
