//! Search suggestions for the header search box.
//!
//! Ranking is a plain, deterministic pass over the catalog: names that start
//! with the query come first, then names that merely contain it, each group
//! in catalog order. Every keystroke re-ranks from scratch and the newest
//! result simply replaces the previous one, so there is nothing to cancel.

mod cursor;

use tracing::instrument;

use crate::catalog::CatalogEntry;
use crate::config::SearchConfig;

pub use cursor::SuggestionCursor;

/// Outcome of ranking a query.
///
/// `NoResults` is an explicit answer ("No products found"), distinct from
/// not having ranked anything yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestions<'a> {
    /// Empty query: the first few catalog entries, in catalog order.
    Browse(Vec<&'a CatalogEntry>),
    /// Prefix matches followed by substring matches.
    Matches(Vec<&'a CatalogEntry>),
    /// Nothing to show.
    NoResults,
}

impl<'a> Suggestions<'a> {
    /// The entries to render, empty for [`Suggestions::NoResults`].
    #[must_use]
    pub fn entries(&self) -> &[&'a CatalogEntry] {
        match self {
            Self::Browse(entries) | Self::Matches(entries) => entries,
            Self::NoResults => &[],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::NoResults)
    }

    /// Names in display order.
    #[must_use]
    pub fn names(&self) -> Vec<&'a str> {
        self.entries().iter().map(|e| e.name.as_str()).collect()
    }

    /// Keyboard cursor over the rendered rows.
    #[must_use]
    pub fn cursor(&self) -> SuggestionCursor {
        SuggestionCursor::new(self.len())
    }

    fn from_entries(entries: Vec<&'a CatalogEntry>, wrap: fn(Vec<&'a CatalogEntry>) -> Self) -> Self {
        if entries.is_empty() {
            Self::NoResults
        } else {
            wrap(entries)
        }
    }
}

/// Stateless suggestion ranker.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    config: SearchConfig,
}

impl Ranker {
    #[must_use]
    pub const fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    /// Rank `catalog` against `query`.
    #[instrument(skip(self, catalog), fields(catalog = catalog.len()))]
    pub fn rank<'a>(&self, query: &str, catalog: &'a [CatalogEntry]) -> Suggestions<'a> {
        let query = query.trim().to_lowercase();
        let limit = self.config.max_results;

        if query.is_empty() {
            let browse = catalog
                .iter()
                .take(self.config.browse_limit.min(limit))
                .collect();
            return Suggestions::from_entries(browse, Suggestions::Browse);
        }

        let mut prefix = Vec::new();
        let mut substring = Vec::new();
        for entry in catalog {
            let name = entry.name.to_lowercase();
            if name.starts_with(&query) {
                prefix.push(entry);
            } else if name.contains(&query) {
                substring.push(entry);
            }
        }

        let matches: Vec<_> = prefix.into_iter().chain(substring).take(limit).collect();
        tracing::debug!(matches = matches.len(), "Ranked suggestions");
        Suggestions::from_entries(matches, Suggestions::Matches)
    }
}

/// Rank with the default limits (12 results, 8 when browsing).
#[must_use]
pub fn rank<'a>(query: &str, catalog: &'a [CatalogEntry]) -> Suggestions<'a> {
    Ranker::default().rank(query, catalog)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{RawAttributes, scan};

    fn catalog(names: &[&str]) -> Vec<CatalogEntry> {
        let raw: Vec<_> = names
            .iter()
            .map(|name| RawAttributes {
                name: Some((*name).to_string()),
                ..Default::default()
            })
            .collect();
        scan(&raw)
    }

    #[test]
    fn test_prefix_before_substring() {
        let catalog = catalog(&["iPhone 15", "Phone Case", "Laptop"]);
        let result = rank("phone", &catalog);
        assert!(matches!(result, Suggestions::Matches(_)));
        assert_eq!(result.names(), ["Phone Case", "iPhone 15"]);
    }

    #[test]
    fn test_case_insensitive_and_trimmed() {
        let catalog = catalog(&["USB Cable", "usb hub"]);
        assert_eq!(rank("  UsB ", &catalog).names(), ["USB Cable", "usb hub"]);
    }

    #[test]
    fn test_groups_keep_catalog_order() {
        let catalog = catalog(&["Smart Watch", "Watch Strap", "Pocket Watch", "Watch Charger"]);
        assert_eq!(
            rank("watch", &catalog).names(),
            ["Watch Strap", "Watch Charger", "Smart Watch", "Pocket Watch"]
        );
    }

    #[test]
    fn test_empty_query_browses_first_eight() {
        let names: Vec<String> = (0..10).map(|i| format!("Item {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let catalog = catalog(&refs);

        let result = rank("   ", &catalog);
        assert!(matches!(result, Suggestions::Browse(_)));
        assert_eq!(result.names(), refs[..8]);
    }

    #[test]
    fn test_no_match_is_explicit() {
        let catalog = catalog(&["Laptop"]);
        let result = rank("zzz", &catalog);
        assert_eq!(result, Suggestions::NoResults);
        assert!(result.is_empty());
        assert!(result.entries().is_empty());
    }

    #[test]
    fn test_browse_empty_catalog_is_no_results() {
        assert_eq!(rank("", &[]), Suggestions::NoResults);
    }

    #[test]
    fn test_capped_at_twelve() {
        let names: Vec<String> = (0..20).map(|i| format!("Cable {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let catalog = catalog(&refs);
        assert_eq!(rank("cable", &catalog).len(), 12);
    }

    #[test]
    fn test_custom_limits() {
        let catalog = catalog(&["a1", "a2", "a3", "b1"]);
        let ranker = Ranker::new(SearchConfig {
            max_results: 2,
            browse_limit: 1,
        });
        assert_eq!(ranker.rank("a", &catalog).names(), ["a1", "a2"]);
        assert_eq!(ranker.rank("", &catalog).names(), ["a1"]);
    }

    #[test]
    fn test_deterministic() {
        let catalog = catalog(&["Phone Case", "iPhone 15", "Headphones"]);
        let first = rank("phone", &catalog);
        let second = rank("phone", &catalog);
        assert_eq!(first, second);
    }

    #[test]
    fn test_cursor_covers_rendered_rows() {
        let catalog = catalog(&["Phone Case", "iPhone 15"]);
        let mut cursor = rank("phone", &catalog).cursor();
        assert_eq!(cursor.len(), 2);
        cursor.down();
        cursor.down();
        cursor.down();
        assert_eq!(cursor.selected(), Some(1));
    }
}
