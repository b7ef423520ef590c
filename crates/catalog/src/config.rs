/// Default RAWG API base URL.
pub const DEFAULT_RAWG_BASE_URL: &str = "https://api.rawg.io/api";
/// Default Jikan (MyAnimeList) API base URL.
pub const DEFAULT_JIKAN_BASE_URL: &str = "https://api.jikan.moe/v4";
/// Default Open Library base URL.
pub const DEFAULT_OPENLIBRARY_BASE_URL: &str = "https://openlibrary.org";
/// Default per-request timeout for catalog calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Catalog adapter configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// RAWG requires a key; without one game search returns nothing.
    pub rawg_api_key: Option<String>,
    pub rawg_base_url: String,
    pub jikan_base_url: String,
    pub openlibrary_base_url: String,
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            rawg_api_key: None,
            rawg_base_url: DEFAULT_RAWG_BASE_URL.into(),
            jikan_base_url: DEFAULT_JIKAN_BASE_URL.into(),
            openlibrary_base_url: DEFAULT_OPENLIBRARY_BASE_URL.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl CatalogConfig {
    /// Load catalog configuration from environment variables.
    ///
    /// | Env Var                | Required | Default                      |
    /// |------------------------|----------|------------------------------|
    /// | `RAWG_API_KEY`         | no       | --                           |
    /// | `RAWG_BASE_URL`        | no       | `https://api.rawg.io/api`    |
    /// | `JIKAN_BASE_URL`       | no       | `https://api.jikan.moe/v4`   |
    /// | `OPENLIBRARY_BASE_URL` | no       | `https://openlibrary.org`    |
    /// | `CATALOG_TIMEOUT_SECS` | no       | `10`                         |
    ///
    /// # Panics
    ///
    /// Panics if `CATALOG_TIMEOUT_SECS` is set but not a valid `u64`.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let rawg_api_key = std::env::var("RAWG_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());

        let timeout_secs: u64 = std::env::var("CATALOG_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_SECS.to_string())
            .parse()
            .expect("CATALOG_TIMEOUT_SECS must be a valid u64");

        Self {
            rawg_api_key,
            rawg_base_url: env_or("RAWG_BASE_URL", defaults.rawg_base_url),
            jikan_base_url: env_or("JIKAN_BASE_URL", defaults.jikan_base_url),
            openlibrary_base_url: env_or("OPENLIBRARY_BASE_URL", defaults.openlibrary_base_url),
            timeout_secs,
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim_end_matches('/').to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}
