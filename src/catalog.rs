use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::error::{CatalogError, SearchError};

/// Models served when no catalog is configured.
const BUILTIN_MODELS: &[(&str, &str)] = &[
    ("gpt-4o", "https://platform.openai.com/docs/models/gpt-4o"),
    ("gpt-3.5-turbo", "https://platform.openai.com/docs/models/gpt-3-5-turbo"),
    ("llama-3-70b", "https://llama.meta.com/llama3/"),
    ("llama-3-8b", "https://llama.meta.com/llama3/"),
    ("claude-3-opus", "https://www.anthropic.com/claude"),
    ("claude-3-sonnet", "https://www.anthropic.com/claude"),
    ("gemini-1.5-pro", "https://ai.google.dev/models/gemini"),
    ("gemini-flash", "https://ai.google.dev/models/gemini"),
    ("mistral-7b", "https://mistral.ai/news/announcing-mistral-7b/"),
];

/// Lowercases one code point at a time.
///
/// `str::to_lowercase` expands `İ` to `i` plus a combining dot and folds a
/// word-final `Σ` to `ς`; per-character simple folding keeps both to a single
/// lowercase letter so `GEMİNİ` still finds `gemini-*`.
pub fn fold_case(s: &str) -> String {
    s.chars()
        .map(|c| c.to_lowercase().next().unwrap_or(c))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(rename = "link")]
    pub url: String,
}

/// Read-only name -> documentation link mapping.
///
/// Entries are kept ordered by name, so scans are deterministic and the
/// lexicographically smallest name wins when several entries match.
#[derive(Debug, Clone)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn builtin() -> Self {
        let entries = BUILTIN_MODELS
            .iter()
            .map(|(name, url)| {
                let entry = CatalogEntry {
                    name: name.to_string(),
                    url: url.to_string(),
                };
                (entry.name.clone(), entry)
            })
            .collect();
        Self { entries }
    }

    /// Builds a catalog from configured entries.
    ///
    /// Names are trimmed and lowercased; queries are lowercased before
    /// matching, so an uppercase name could never be found otherwise.
    pub fn from_entries<I>(entries: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut map = BTreeMap::new();
        for entry in entries {
            let name = fold_case(entry.name.trim());
            if name.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if name != entry.name {
                warn!("Normalized catalog name '{}' to '{}'", entry.name, name);
            }
            let url = entry.url.trim().to_string();
            if url.is_empty() {
                return Err(CatalogError::EmptyLink(name));
            }
            if map.contains_key(&name) {
                return Err(CatalogError::DuplicateName(name));
            }
            map.insert(name.clone(), CatalogEntry { name, url });
        }
        Ok(Self { entries: map })
    }

    pub fn all(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a partial model name to a single entry.
    ///
    /// The query is lowercased but not trimmed. `Ok(None)` means the query was
    /// empty; a non-empty query contained in no name is `SearchError::NoMatch`.
    pub fn search(&self, query: &str) -> Result<Option<&CatalogEntry>, SearchError> {
        let query = fold_case(query);
        if query.is_empty() {
            return Ok(None);
        }

        match self.all().find(|entry| entry.name.contains(&query)) {
            Some(entry) => {
                debug!("Query '{}' matched '{}'", query, entry.name);
                Ok(Some(entry))
            }
            None => Err(SearchError::NoMatch),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NO_MATCH_MESSAGE;

    fn entry(name: &str, url: &str) -> CatalogEntry {
        CatalogEntry {
            name: name.to_string(),
            url: url.to_string(),
        }
    }

    fn url_of<'a>(catalog: &'a Catalog, name: &str) -> Option<&'a str> {
        catalog.all().find(|e| e.name == name).map(|e| e.url.as_str())
    }

    fn matching_names<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a str> {
        let query = fold_case(query);
        catalog
            .all()
            .filter(|e| e.name.contains(&query))
            .map(|e| e.name.as_str())
            .collect()
    }

    #[test]
    fn test_builtin_catalog_contents() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 9);
        assert_eq!(
            url_of(&catalog, "mistral-7b"),
            Some("https://mistral.ai/news/announcing-mistral-7b/")
        );
        let names: Vec<&str> = catalog.all().map(|e| e.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_search_partial_gpt() {
        let catalog = Catalog::builtin();
        let found = catalog.search("gpt").unwrap().unwrap();
        assert!(["gpt-4o", "gpt-3.5-turbo"].contains(&found.name.as_str()));
        assert_eq!(url_of(&catalog, &found.name), Some(found.url.as_str()));
        // ordered scan picks the smallest name
        assert_eq!(found.name, "gpt-3.5-turbo");
        assert_eq!(found.url, "https://platform.openai.com/docs/models/gpt-3-5-turbo");
    }

    #[test]
    fn test_search_exact_name() {
        let catalog = Catalog::builtin();
        let found = catalog.search("llama-3-70b").unwrap().unwrap();
        assert_eq!(found.name, "llama-3-70b");
        assert_eq!(found.url, "https://llama.meta.com/llama3/");
    }

    #[test]
    fn test_search_empty_query() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.search(""), Ok(None));
    }

    #[test]
    fn test_search_no_match() {
        let catalog = Catalog::builtin();
        let err = catalog.search("xyz123").unwrap_err();
        assert_eq!(err, SearchError::NoMatch);
        assert_eq!(err.to_string(), NO_MATCH_MESSAGE);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = Catalog::builtin();
        let upper = catalog.search("CLAUDE").unwrap().unwrap();
        assert!(["claude-3-opus", "claude-3-sonnet"].contains(&upper.name.as_str()));
        let lower = catalog.search("claude").unwrap().unwrap();
        assert_eq!(upper, lower);
        assert_eq!(
            catalog.search("GPT").unwrap().map(|e| e.name.clone()),
            catalog.search("gpt").unwrap().map(|e| e.name.clone())
        );
    }

    #[test]
    fn test_fold_case_is_per_character() {
        assert_eq!(fold_case("GPT-4o"), "gpt-4o");
        assert_eq!(fold_case("\u{130}"), "i");
        assert_eq!(fold_case("ΟΔΟΣ"), "οδοσ");
        assert_eq!(fold_case(""), "");
    }

    #[test]
    fn test_search_dotted_capital_i() {
        let catalog = Catalog::builtin();
        let found = catalog.search("\u{130}").unwrap().unwrap();
        assert!(found.name.contains('i'));
        assert_eq!(catalog.search("GEM\u{130}N\u{130}-F").unwrap().unwrap().name, "gemini-flash");
    }

    #[test]
    fn test_search_infix_and_suffix() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.search("flash").unwrap().unwrap().name, "gemini-flash");
        assert_eq!(catalog.search("-7").unwrap().unwrap().name, "llama-3-70b");
        assert_eq!(catalog.search("sonnet").unwrap().unwrap().name, "claude-3-sonnet");
    }

    #[test]
    fn test_search_does_not_trim() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.search(" gpt"), Err(SearchError::NoMatch));
        assert_eq!(catalog.search("gpt "), Err(SearchError::NoMatch));
    }

    #[test]
    fn test_search_results_come_from_match_set() {
        let catalog = Catalog::builtin();
        for query in ["g", "3", "-", "o", "llama", "GEMINI", "pro", ".", "turbo"] {
            let matches = matching_names(&catalog, query);
            let first = catalog.search(query).unwrap().unwrap();
            assert!(matches.contains(&first.name.as_str()), "query {query}");
            let again = catalog.search(query).unwrap().unwrap();
            assert_eq!(first, again);
        }
        for query in ["xyz123", "gpt5", "llama-4", "mistral-8x7b"] {
            assert!(matching_names(&catalog, query).is_empty());
            assert_eq!(catalog.search(query), Err(SearchError::NoMatch));
        }
    }

    #[test]
    fn test_from_entries_normalizes_names() {
        let catalog = Catalog::from_entries(vec![
            entry(" Phi-3 ", "https://example.com/phi"),
            entry("qwen2", " https://example.com/qwen "),
        ])
        .unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(url_of(&catalog, "phi-3"), Some("https://example.com/phi"));
        assert_eq!(url_of(&catalog, "qwen2"), Some("https://example.com/qwen"));
        assert_eq!(catalog.search("PHI").unwrap().unwrap().name, "phi-3");
    }

    #[test]
    fn test_from_entries_rejects_duplicates() {
        let err = Catalog::from_entries(vec![
            entry("gpt-4o", "https://a"),
            entry("GPT-4o", "https://b"),
        ])
        .unwrap_err();
        assert_eq!(err, CatalogError::DuplicateName("gpt-4o".to_string()));
    }

    #[test]
    fn test_from_entries_rejects_empty_fields() {
        assert_eq!(
            Catalog::from_entries(vec![entry("  ", "https://a")]).unwrap_err(),
            CatalogError::EmptyName
        );
        assert_eq!(
            Catalog::from_entries(vec![entry("gpt-4o", "")]).unwrap_err(),
            CatalogError::EmptyLink("gpt-4o".to_string())
        );
    }

    #[test]
    fn test_empty_catalog_never_matches() {
        let catalog = Catalog::from_entries(Vec::new()).unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.search("gpt"), Err(SearchError::NoMatch));
        assert_eq!(catalog.search(""), Ok(None));
    }
}
