//! HS256 token issuing and verification.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use ferrobank_ledger::{AccountId, Role};

use crate::{AuthConfig, Claims};

#[derive(Debug, Error)]
pub enum AuthError {
    /// Signature, shape, or expiry check failed. Collapsed on purpose so the
    /// response never reveals which part of the token was wrong.
    #[error("invalid or expired token")]
    InvalidToken,

    #[error("token encoding failed: {0}")]
    Encode(String),

    #[error("password hashing failed: {0}")]
    Hash(String),
}

/// HS256 signer/verifier bound to one secret.
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    token_ttl: Duration,
}

impl TokenSigner {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            token_ttl: config.token_ttl,
        }
    }

    /// Issue a token for an authenticated account.
    pub fn issue(&self, account_id: AccountId, role: Role) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: account_id.0,
            role,
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::Encode(e.to_string()))
    }

    /// Verify a bearer token's signature and expiry, returning its claims.
    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }
}
