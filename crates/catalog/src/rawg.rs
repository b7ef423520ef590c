//! RAWG video game catalog.
//!
//! `GET {base}/games?search=..&key=..&page_size=12&search_precise=true`

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tsumi_core::catalog::{join_description, NormalizedResult, MAX_SEARCH_RESULTS};
use tsumi_core::item::ItemType;

use crate::{get_json, CatalogAdapter, CatalogError};

const CATALOG: &str = "rawg";

/// HTTP client for the RAWG games search.
pub struct RawgCatalog {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawgResponse {
    #[serde(default)]
    results: Vec<RawgGame>,
}

/// One entry of RAWG's `results` array.
#[derive(Debug, Clone, Deserialize)]
pub struct RawgGame {
    pub id: i64,
    pub name: String,
    pub background_image: Option<String>,
    pub rating: Option<f64>,
    pub released: Option<String>,
    #[serde(default)]
    pub genres: Vec<RawgGenre>,
    pub playtime: Option<i64>,
    pub metacritic: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawgGenre {
    pub id: i64,
    pub name: String,
}

impl RawgCatalog {
    pub fn new(client: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl CatalogAdapter for RawgCatalog {
    fn name(&self) -> &'static str {
        CATALOG
    }

    fn item_type(&self) -> ItemType {
        ItemType::Game
    }

    async fn fetch(&self, query: &str) -> Result<Vec<NormalizedResult>, CatalogError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(CatalogError::MissingCredential("RAWG"))?;

        let page_size = MAX_SEARCH_RESULTS.to_string();
        let request = self
            .client
            .get(format!("{}/games", self.base_url))
            .query(&[
                ("search", query),
                ("key", api_key),
                ("page_size", page_size.as_str()),
                ("search_precise", "true"),
            ]);

        let body: RawgResponse = get_json(CATALOG, request).await?;
        Ok(body.results.into_iter().map(normalize).collect())
    }
}

/// Project a RAWG game into the common result shape.
///
/// The description is the genre list; it is null when RAWG reports none.
pub fn normalize(game: RawgGame) -> NormalizedResult {
    let description = join_description(game.genres.iter().map(|g| g.name.as_str()));

    NormalizedResult {
        external_id: game.id.to_string(),
        item_type: ItemType::Game,
        title: game.name,
        image_url: game.background_image,
        description,
        metadata: json!({
            "rating": game.rating,
            "released": game.released,
            "playtime": game.playtime,
            "metacritic": game.metacritic,
            "genres": game.genres,
        }),
    }
}
