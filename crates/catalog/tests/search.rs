//! Fail-soft behavior of catalog search.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tsumi_catalog::{search, CatalogAdapter, CatalogConfig, CatalogError, Catalogs};
use tsumi_core::catalog::NormalizedResult;
use tsumi_core::item::ItemType;

/// Adapter that counts calls and returns `n` canned results.
struct CountingCatalog {
    calls: AtomicUsize,
    results: usize,
    item_type: ItemType,
}

impl CountingCatalog {
    fn new(item_type: ItemType, results: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            results,
            item_type,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogAdapter for CountingCatalog {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn item_type(&self) -> ItemType {
        self.item_type
    }

    async fn fetch(&self, query: &str) -> Result<Vec<NormalizedResult>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok((0..self.results)
            .map(|i| NormalizedResult {
                external_id: format!("{query}-{i}"),
                item_type: self.item_type,
                title: format!("{query} #{i}"),
                image_url: None,
                description: None,
                metadata: serde_json::json!({}),
            })
            .collect())
    }
}

struct FailingCatalog;

#[async_trait]
impl CatalogAdapter for FailingCatalog {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn item_type(&self) -> ItemType {
        ItemType::Book
    }

    async fn fetch(&self, _query: &str) -> Result<Vec<NormalizedResult>, CatalogError> {
        Err(CatalogError::HttpStatus {
            catalog: "failing",
            status: 503,
        })
    }
}

#[tokio::test]
async fn blank_query_does_not_call_upstream() {
    let catalog = CountingCatalog::new(ItemType::Anime, 3);

    assert!(search(&catalog, "").await.is_empty());
    assert!(search(&catalog, "   \t").await.is_empty());
    assert_eq!(catalog.calls(), 0);
}

#[tokio::test]
async fn query_is_trimmed_before_fetch() {
    let catalog = CountingCatalog::new(ItemType::Anime, 1);

    let results = search(&catalog, "  frieren ").await;
    assert_eq!(catalog.calls(), 1);
    assert_eq!(results[0].external_id, "frieren-0");
}

#[tokio::test]
async fn results_are_capped_at_twelve() {
    let catalog = CountingCatalog::new(ItemType::Game, 30);
    assert_eq!(search(&catalog, "mario").await.len(), 12);
}

#[tokio::test]
async fn upstream_error_yields_empty_results() {
    assert!(search(&FailingCatalog, "dune").await.is_empty());
}

/// Adapter that serves anime but also leaks a game result.
struct MixedCatalog;

#[async_trait]
impl CatalogAdapter for MixedCatalog {
    fn name(&self) -> &'static str {
        "mixed"
    }

    fn item_type(&self) -> ItemType {
        ItemType::Anime
    }

    async fn fetch(&self, _query: &str) -> Result<Vec<NormalizedResult>, CatalogError> {
        Ok([ItemType::Anime, ItemType::Game, ItemType::Anime]
            .into_iter()
            .enumerate()
            .map(|(i, item_type)| NormalizedResult {
                external_id: i.to_string(),
                item_type,
                title: format!("hit {i}"),
                image_url: None,
                description: None,
                metadata: serde_json::json!({}),
            })
            .collect())
    }
}

#[tokio::test]
async fn results_of_another_type_are_dropped() {
    let results = search(&MixedCatalog, "bebop").await;
    let ids: Vec<&str> = results.iter().map(|r| r.external_id.as_str()).collect();
    assert_eq!(ids, ["0", "2"]);
}

#[tokio::test]
async fn catalogs_dispatch_by_item_type() {
    let games = Arc::new(CountingCatalog::new(ItemType::Game, 1));
    let anime = Arc::new(CountingCatalog::new(ItemType::Anime, 2));
    let catalogs = Catalogs::new(games.clone(), anime.clone(), Arc::new(FailingCatalog));

    let results = catalogs.search(ItemType::Anime, "bebop").await;
    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.item_type == ItemType::Anime));
    assert_eq!(anime.calls(), 1);
    assert_eq!(games.calls(), 0);

    assert!(catalogs.search(ItemType::Book, "dune").await.is_empty());
}

#[tokio::test]
async fn missing_rawg_key_returns_empty() {
    let catalogs = Catalogs::from_config(&CatalogConfig::default()).unwrap();
    assert!(catalogs.search(ItemType::Game, "zelda").await.is_empty());
}

#[tokio::test]
async fn unreachable_upstream_returns_empty() {
    let config = CatalogConfig {
        rawg_api_key: Some("test-key".into()),
        rawg_base_url: "http://127.0.0.1:9".into(),
        jikan_base_url: "http://127.0.0.1:9".into(),
        openlibrary_base_url: "http://127.0.0.1:9".into(),
        timeout_secs: 2,
    };
    let catalogs = Catalogs::from_config(&config).unwrap();

    for &item_type in ItemType::ALL {
        assert!(catalogs.search(item_type, "anything").await.is_empty());
    }
}
