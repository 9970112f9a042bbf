//! Configuration schema definitions

use serde::{Deserialize, Serialize};

const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;
/// One hundred years
const MAX_TOKEN_LIFETIME_SECS: u64 = 100 * 365 * 86_400;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub seed: SeedConfig,
}

/// Server configuration for the HTTP API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Token signing and extraction settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Symmetric signing secret. Must be non-empty to start the server.
    #[serde(default)]
    pub secret: String,

    #[serde(default = "default_token_lifetime_secs")]
    pub token_lifetime_secs: u64,

    /// Request header carrying the token
    #[serde(default = "default_header")]
    pub header: String,

    /// Prefix stripped from the header value
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Cookie consulted when the header is absent
    #[serde(default)]
    pub cookie: Option<String>,

    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
}

fn default_token_lifetime_secs() -> u64 {
    86_400
}

fn default_header() -> String {
    "Authorization".to_string()
}

fn default_prefix() -> String {
    "Bearer ".to_string()
}

fn default_bcrypt_cost() -> u32 {
    bcrypt::DEFAULT_COST
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_lifetime_secs: default_token_lifetime_secs(),
            header: default_header(),
            prefix: default_prefix(),
            cookie: None,
            bcrypt_cost: default_bcrypt_cost(),
        }
    }
}

impl AuthConfig {
    pub fn token_lifetime(&self) -> crate::error::Result<chrono::Duration> {
        i64::try_from(self.token_lifetime_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .ok_or_else(|| {
                crate::error::Error::Config(format!(
                    "auth.token_lifetime_secs {} is out of range",
                    self.token_lifetime_secs
                ))
            })
    }
}

/// Startup data seeding
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConfig {
    #[serde(default = "default_seed_enabled")]
    pub enabled: bool,

    #[serde(default = "default_admin_username")]
    pub admin_username: String,

    #[serde(default = "default_admin_password")]
    pub admin_password: String,

    #[serde(default = "default_admin_email")]
    pub admin_email: String,
}

fn default_seed_enabled() -> bool {
    true
}

fn default_admin_username() -> String {
    "admin".to_string()
}

fn default_admin_password() -> String {
    "admin123".to_string()
}

fn default_admin_email() -> String {
    "admin@example.com".to_string()
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            enabled: default_seed_enabled(),
            admin_username: default_admin_username(),
            admin_password: default_admin_password(),
            admin_email: default_admin_email(),
        }
    }
}

impl Config {
    /// Check the settings the server cannot start without
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.auth.secret.trim().is_empty() {
            return Err(crate::error::Error::Config(
                "auth.secret must be set".to_string(),
            ));
        }
        if !(1..=MAX_TOKEN_LIFETIME_SECS).contains(&self.auth.token_lifetime_secs) {
            return Err(crate::error::Error::Config(format!(
                "auth.token_lifetime_secs must be between 1 and {}",
                MAX_TOKEN_LIFETIME_SECS
            )));
        }
        if self.auth.header.trim().is_empty() {
            return Err(crate::error::Error::Config(
                "auth.header must be set".to_string(),
            ));
        }
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&self.auth.bcrypt_cost) {
            return Err(crate::error::Error::Config(format!(
                "auth.bcrypt_cost must be between {} and {}",
                MIN_BCRYPT_COST, MAX_BCRYPT_COST
            )));
        }
        Ok(())
    }
}
