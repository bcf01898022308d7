//! Signing configuration.

use chrono::Duration;

/// Token signing configuration, built once at startup and passed into the
/// signer explicitly, never read from the environment at call sites.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub token_ttl: Duration,
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            secret: secret.into(),
            token_ttl,
        }
    }
}
