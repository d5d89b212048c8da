use serde::Serialize;

use crate::catalog::CatalogEntry;

#[derive(Debug, Clone)]
pub struct SearchParams {
    pub model: String,
}

impl SearchParams {
    /// Picks the first `model` value out of the decoded query pairs; a missing
    /// parameter is an empty query.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let model = pairs
            .into_iter()
            .find(|(key, _)| key == "model")
            .map(|(_, value)| value)
            .unwrap_or_default();
        Self { model }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub model: String,
    pub link: String,
}

impl From<&CatalogEntry> for SearchResponse {
    fn from(entry: &CatalogEntry) -> Self {
        Self {
            model: entry.name.clone(),
            link: entry.url.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
