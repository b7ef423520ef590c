//! Open Library book catalog.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tsumi_core::catalog::{join_description, NormalizedResult, MAX_SEARCH_RESULTS};
use tsumi_core::item::ItemType;

use crate::{get_json, CatalogAdapter, CatalogError};

const CATALOG: &str = "openlibrary";

/// Fields requested from `search.json`.
const SEARCH_FIELDS: &str =
    "key,title,author_name,cover_i,first_publish_year,subject,number_of_pages_median,isbn";

/// Authors shown in the description.
const DESCRIPTION_AUTHORS: usize = 3;
/// Subjects kept in metadata.
const METADATA_SUBJECTS: usize = 5;

pub struct OpenLibraryCatalog {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    docs: Vec<OpenLibraryDoc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenLibraryDoc {
    /// Work key, e.g. `/works/OL45804W`.
    pub key: String,
    pub title: String,
    #[serde(default)]
    pub author_name: Vec<String>,
    pub cover_i: Option<i64>,
    pub first_publish_year: Option<i32>,
    #[serde(default)]
    pub subject: Vec<String>,
    pub number_of_pages_median: Option<i32>,
    #[serde(default)]
    pub isbn: Vec<String>,
}

impl OpenLibraryCatalog {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl CatalogAdapter for OpenLibraryCatalog {
    fn name(&self) -> &'static str {
        CATALOG
    }

    fn item_type(&self) -> ItemType {
        ItemType::Book
    }

    async fn fetch(&self, query: &str) -> Result<Vec<NormalizedResult>, CatalogError> {
        let limit = MAX_SEARCH_RESULTS.to_string();
        let request = self
            .client
            .get(format!("{}/search.json", self.base_url))
            .query(&[
                ("q", query),
                ("limit", limit.as_str()),
                ("fields", SEARCH_FIELDS),
            ]);

        let body: SearchResponse = get_json(CATALOG, request).await?;
        Ok(body.docs.into_iter().map(normalize).collect())
    }
}

/// Medium-size cover image URL for an Open Library cover id.
pub fn cover_url(cover_id: i64) -> String {
    format!("https://covers.openlibrary.org/b/id/{cover_id}-M.jpg")
}

/// Project an Open Library search doc into the common result shape.
///
/// The description lists the first three authors.
pub fn normalize(doc: OpenLibraryDoc) -> NormalizedResult {
    let description = join_description(
        doc.author_name
            .iter()
            .take(DESCRIPTION_AUTHORS)
            .map(String::as_str),
    );
    let subjects: Vec<&String> = doc.subject.iter().take(METADATA_SUBJECTS).collect();

    NormalizedResult {
        external_id: doc.key.clone(),
        item_type: ItemType::Book,
        title: doc.title.clone(),
        image_url: doc.cover_i.map(cover_url),
        description,
        metadata: json!({
            "authors": doc.author_name,
            "firstPublishYear": doc.first_publish_year,
            "totalPages": doc.number_of_pages_median,
            "subjects": subjects,
            "isbn": doc.isbn.first(),
        }),
    }
}
