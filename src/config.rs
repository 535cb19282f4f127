use std::{env, net::SocketAddr};

use crate::roles::AliasPolicy;

/// AppConfig
///
/// Holds the application's configuration. Immutable once loaded and pulled into
/// handlers and extractors from the application state via FromRef.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Selects the log format and forbids legacy role aliases in production.
    pub env: Env,
    // Address the HTTP server binds to.
    pub bind_addr: SocketAddr,
    // Base path of the downstream business API handed to admitted views.
    pub api_base: String,
    // Whether historical role spellings in credentials are mapped to canonical roles.
    pub role_aliases: AliasPolicy,
}

/// Env
///
/// Runtime context: local development or production.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("BIND_ADDR `{0}` is not a valid socket address")]
    InvalidBindAddr(String),
    #[error("ROLE_ALIASES: {0}")]
    InvalidAliasPolicy(String),
    #[error("legacy role aliases are not allowed in production")]
    LegacyAliasesInProduction,
}

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_API_BASE: &str = "/api/v1";

impl Default for AppConfig {
    /// default
    ///
    /// A safe configuration for tests, built without reading the environment.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            api_base: DEFAULT_API_BASE.to_string(),
            role_aliases: AliasPolicy::Strict,
        }
    }
}

impl AppConfig {
    /// load
    ///
    /// Reads the configuration from environment variables at startup. Fails fast on any
    /// malformed value instead of silently falling back.
    ///
    /// - `APP_ENV`: `production` or anything else for local (default `local`)
    /// - `BIND_ADDR`: socket address (default `0.0.0.0:3000`)
    /// - `API_BASE_URL`: downstream API base (default `/api/v1`)
    /// - `ROLE_ALIASES`: `strict` or `legacy` (default `strict`)
    pub fn load() -> Result<Self, ConfigError> {
        let env = match env::var("APP_ENV").as_deref() {
            Ok("production") => Env::Production,
            _ => Env::Local,
        };

        let bind_raw = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind_raw.clone()))?;

        let api_base = env::var("API_BASE_URL")
            .map(|base| base.trim_end_matches('/').to_string())
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());

        let role_aliases = match env::var("ROLE_ALIASES") {
            Ok(raw) => raw
                .parse::<AliasPolicy>()
                .map_err(ConfigError::InvalidAliasPolicy)?,
            Err(_) => AliasPolicy::Strict,
        };

        if env == Env::Production && role_aliases == AliasPolicy::Legacy {
            return Err(ConfigError::LegacyAliasesInProduction);
        }

        Ok(Self {
            env,
            bind_addr,
            api_base,
            role_aliases,
        })
    }
}
