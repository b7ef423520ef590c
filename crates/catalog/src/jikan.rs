//! Jikan (unofficial MyAnimeList) anime catalog.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tsumi_core::catalog::{
    truncate_chars, NormalizedResult, MAX_DESCRIPTION_CHARS, MAX_SEARCH_RESULTS,
};
use tsumi_core::item::ItemType;

use crate::{get_json, CatalogAdapter, CatalogError};

const CATALOG: &str = "jikan";

pub struct JikanCatalog {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct JikanResponse {
    #[serde(default)]
    data: Vec<JikanAnime>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JikanAnime {
    pub mal_id: i64,
    pub title: String,
    pub title_japanese: Option<String>,
    #[serde(default)]
    pub images: JikanImages,
    pub synopsis: Option<String>,
    pub episodes: Option<i32>,
    pub score: Option<f64>,
    pub year: Option<i32>,
    #[serde(default)]
    pub genres: Vec<JikanGenre>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JikanImages {
    #[serde(default)]
    pub jpg: JikanImageSet,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JikanImageSet {
    pub image_url: Option<String>,
    pub large_image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JikanGenre {
    pub mal_id: i64,
    pub name: String,
}

impl JikanCatalog {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl CatalogAdapter for JikanCatalog {
    fn name(&self) -> &'static str {
        CATALOG
    }

    fn item_type(&self) -> ItemType {
        ItemType::Anime
    }

    async fn fetch(&self, query: &str) -> Result<Vec<NormalizedResult>, CatalogError> {
        let limit = MAX_SEARCH_RESULTS.to_string();
        let request = self
            .client
            .get(format!("{}/anime", self.base_url))
            .query(&[("q", query), ("limit", limit.as_str()), ("sfw", "true")]);

        let body: JikanResponse = get_json(CATALOG, request).await?;
        Ok(body.data.into_iter().map(normalize).collect())
    }
}

/// Project a Jikan anime entry into the common result shape.
pub fn normalize(anime: JikanAnime) -> NormalizedResult {
    let JikanImageSet {
        image_url,
        large_image_url,
    } = anime.images.jpg;

    let description = anime
        .synopsis
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| truncate_chars(s, MAX_DESCRIPTION_CHARS));

    NormalizedResult {
        external_id: anime.mal_id.to_string(),
        item_type: ItemType::Anime,
        title: anime.title,
        image_url: large_image_url.or(image_url),
        description,
        metadata: json!({
            "titleJa": anime.title_japanese,
            "score": anime.score,
            "episodes": anime.episodes,
            "year": anime.year,
            "status": anime.status,
            "genres": anime.genres,
        }),
    }
}
