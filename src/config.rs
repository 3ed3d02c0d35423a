//! Configuration Module
//!
//! Handles loading and managing gateway configuration from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::bail;

/// Token secret used when `AUTH_TOKEN_SECRET` is unset. Refused in production.
pub const DEV_TOKEN_SECRET: &str = "dev-secret";

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Selects the production catalog collections
    pub production: bool,
    /// CORS origins; empty allows any origin
    pub allowed_origins: Vec<String>,
    /// HS256 secret used to sign and verify bearer tokens
    pub auth_token_secret: String,
    /// Lifetime in seconds of issued tokens
    pub auth_token_ttl: u64,
    /// Uids granted the admin claim at startup
    pub admin_uids: Vec<String>,
    /// JSON file of documents loaded into the memory store
    pub seed_file: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Environment Variables
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `PRODUCTION` - `true` for the production collections (default: false)
    /// - `ALLOWED_ORIGINS` - Comma-separated CORS origins (default: any)
    /// - `AUTH_TOKEN_SECRET` - Token signing secret (default: dev-secret)
    /// - `AUTH_TOKEN_TTL` - Token lifetime in seconds (default: 3600)
    /// - `ADMIN_UIDS` - Comma-separated admin uids (default: none)
    /// - `SEED_FILE` - Seed document file (default: none)
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let defaults = Self::default();

        Self {
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            production: env::var("PRODUCTION")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.production),
            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.allowed_origins),
            auth_token_secret: env::var("AUTH_TOKEN_SECRET")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.auth_token_secret),
            auth_token_ttl: env::var("AUTH_TOKEN_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.auth_token_ttl),
            admin_uids: env::var("ADMIN_UIDS")
                .map(|v| split_list(&v))
                .unwrap_or(defaults.admin_uids),
            seed_file: env::var("SEED_FILE")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }

    /// Rejects settings that are unsafe to serve with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.production && self.auth_token_secret == DEV_TOKEN_SECRET {
            bail!("AUTH_TOKEN_SECRET must be set when PRODUCTION is enabled");
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            production: false,
            allowed_origins: Vec::new(),
            auth_token_secret: DEV_TOKEN_SECRET.to_string(),
            auth_token_ttl: 3600,
            admin_uids: Vec::new(),
            seed_file: None,
        }
    }
}

/// Collection names the gateway reads and writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collections {
    pub fruits: String,
    pub variants: String,
    pub orders: String,
    pub users: String,
}

impl Collections {
    /// Catalog collections switch with the deployment mode; orders and
    /// users are shared.
    pub fn for_mode(production: bool) -> Self {
        let (fruits, variants) = if production {
            ("fruits", "variants")
        } else {
            ("dev_fruits", "dev_variants")
        };
        Self {
            fruits: fruits.to_string(),
            variants: variants.to_string(),
            orders: "orders".to_string(),
            users: "users".to_string(),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
