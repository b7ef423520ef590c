use chrono::{FixedOffset, Offset};
use tsumi_catalog::CatalogConfig;
use tsumi_core::calendar::{parse_utc_offset, DEFAULT_UTC_OFFSET_SECS};

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Calendar on which stats month boundaries are drawn (default: `+09:00`).
    pub stats_utc_offset: FixedOffset,
    /// JWT verification settings.
    pub jwt: JwtConfig,
    /// Upstream catalog endpoints and credentials.
    pub catalog: CatalogConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `STATS_UTC_OFFSET`     | `+09:00`                   |
    ///
    /// See [`JwtConfig::from_env`] and [`CatalogConfig::from_env`] for the
    /// remaining variables.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let stats_utc_offset = match std::env::var("STATS_UTC_OFFSET") {
            Ok(raw) => parse_utc_offset(&raw).expect("STATS_UTC_OFFSET must be like +09:00"),
            Err(_) => default_stats_offset(),
        };

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            stats_utc_offset,
            jwt: JwtConfig::from_env(),
            catalog: CatalogConfig::from_env(),
        }
    }
}

/// The default stats calendar, UTC+09:00.
pub fn default_stats_offset() -> FixedOffset {
    FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or_else(|| chrono::Utc.fix())
}
