//! Process configuration, read from the environment exactly once at startup.

use chrono::Duration;

use ferrobank_auth::AuthConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,

    /// When unset, the server runs on the in-memory store.
    pub database_url: Option<String>,

    pub auth: AuthConfig,

    /// Bootstrap allow-list: signups with these emails get the admin role.
    /// There is no other path to admin.
    pub admin_emails: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            "dev-secret".to_string()
        });

        let ttl_minutes = std::env::var("TOKEN_TTL_MINUTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(60);

        let admin_emails = std::env::var("ADMIN_EMAILS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_ascii_lowercase())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
            database_url: std::env::var("DATABASE_URL").ok(),
            auth: AuthConfig::new(secret, Duration::minutes(ttl_minutes)),
            admin_emails,
        }
    }

    pub fn is_admin_email(&self, email: &str) -> bool {
        let email = email.to_ascii_lowercase();
        self.admin_emails.iter().any(|e| *e == email)
    }
}
