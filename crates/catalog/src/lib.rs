//! External catalog adapters (games, anime, books).
//!
//! Each adapter wraps one third-party search endpoint and normalizes its
//! response into [`NormalizedResult`]. Callers go through [`search`] (or
//! [`Catalogs::search`]), which is fail-soft: a blank query never touches
//! the network, and any upstream failure yields an empty result.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tsumi_core::catalog::{NormalizedResult, MAX_SEARCH_RESULTS};
use tsumi_core::item::ItemType;

pub mod config;
pub mod error;
pub mod jikan;
pub mod openlibrary;
pub mod rawg;

pub use config::CatalogConfig;
pub use error::CatalogError;
pub use jikan::JikanCatalog;
pub use openlibrary::OpenLibraryCatalog;
pub use rawg::RawgCatalog;

/// One searchable upstream catalog.
#[async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// The item type this catalog serves. Results carrying any other type
    /// are dropped by [`search`].
    fn item_type(&self) -> ItemType;

    /// Query the upstream catalog. `query` is already trimmed and non-empty.
    async fn fetch(&self, query: &str) -> Result<Vec<NormalizedResult>, CatalogError>;
}

/// Search one catalog, degrading every failure to an empty result.
pub async fn search(adapter: &dyn CatalogAdapter, query: &str) -> Vec<NormalizedResult> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    match adapter.fetch(query).await {
        Ok(mut results) => {
            let item_type = adapter.item_type();
            let fetched = results.len();
            results.retain(|r| r.item_type == item_type);
            if results.len() < fetched {
                tracing::warn!(
                    catalog = adapter.name(),
                    %item_type,
                    dropped = fetched - results.len(),
                    "Catalog returned results of another item type"
                );
            }
            results.truncate(MAX_SEARCH_RESULTS);
            tracing::debug!(catalog = adapter.name(), count = results.len(), "Catalog search");
            results
        }
        Err(e) => {
            tracing::warn!(
                catalog = adapter.name(),
                error = %e,
                "Catalog search failed, returning no results"
            );
            Vec::new()
        }
    }
}

/// The three catalogs, one per item type.
///
/// Cheaply cloneable; adapters are shared behind `Arc` and keep their own
/// long-lived HTTP client.
#[derive(Clone)]
pub struct Catalogs {
    games: Arc<dyn CatalogAdapter>,
    anime: Arc<dyn CatalogAdapter>,
    books: Arc<dyn CatalogAdapter>,
}

impl Catalogs {
    pub fn new(
        games: Arc<dyn CatalogAdapter>,
        anime: Arc<dyn CatalogAdapter>,
        books: Arc<dyn CatalogAdapter>,
    ) -> Self {
        debug_assert_eq!(games.item_type(), ItemType::Game);
        debug_assert_eq!(anime.item_type(), ItemType::Anime);
        debug_assert_eq!(books.item_type(), ItemType::Book);
        Self {
            games,
            anime,
            books,
        }
    }

    /// Build the production adapters (RAWG, Jikan, Open Library).
    pub fn from_config(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("tsumi/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::new(
            Arc::new(RawgCatalog::new(
                client.clone(),
                config.rawg_base_url.clone(),
                config.rawg_api_key.clone(),
            )),
            Arc::new(JikanCatalog::new(client.clone(), config.jikan_base_url.clone())),
            Arc::new(OpenLibraryCatalog::new(
                client,
                config.openlibrary_base_url.clone(),
            )),
        ))
    }

    /// The adapter serving `item_type`.
    pub fn for_type(&self, item_type: ItemType) -> &dyn CatalogAdapter {
        match item_type {
            ItemType::Game => self.games.as_ref(),
            ItemType::Anime => self.anime.as_ref(),
            ItemType::Book => self.books.as_ref(),
        }
    }

    /// Fail-soft search of the catalog serving `item_type`.
    pub async fn search(&self, item_type: ItemType, query: &str) -> Vec<NormalizedResult> {
        search(self.for_type(item_type), query).await
    }
}

/// Send a GET request and decode a JSON body, mapping non-2xx to
/// [`CatalogError::HttpStatus`].
pub(crate) async fn get_json<T: serde::de::DeserializeOwned>(
    catalog: &'static str,
    request: reqwest::RequestBuilder,
) -> Result<T, CatalogError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CatalogError::HttpStatus {
            catalog,
            status: status.as_u16(),
        });
    }
    Ok(response.json::<T>().await?)
}
