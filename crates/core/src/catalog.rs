//! Common shape for results returned by the external catalogs.
//!
//! Each catalog adapter projects its upstream response into a
//! [`NormalizedResult`]. The helpers here hold the projection rules shared
//! by all three adapters.

use serde::{Deserialize, Serialize};

use crate::item::ItemType;

/// Maximum number of results requested from (and returned for) one catalog.
pub const MAX_SEARCH_RESULTS: usize = 12;

/// Maximum length of a derived description, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 200;

/// A catalog search hit in the catalog-independent shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResult {
    pub external_id: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub title: String,
    pub image_url: Option<String>,
    pub description: Option<String>,
    /// Catalog-specific attributes, passed through untouched.
    pub metadata: serde_json::Value,
}

/// Truncate `text` to at most `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

/// Join display names with `", "`, capped at [`MAX_DESCRIPTION_CHARS`].
///
/// Returns `None` when there is nothing to join so callers store a null
/// description instead of an empty string.
pub fn join_description<'a, I>(names: I) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let joined = names
        .into_iter()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        None
    } else {
        Some(truncate_chars(&joined, MAX_DESCRIPTION_CHARS))
    }
}
