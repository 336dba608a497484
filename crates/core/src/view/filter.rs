//! Inclusion predicates applied by the view pipeline.

use crate::catalog::{narrators_of, CatalogRecord};

/// A prepared free-text query: trimmed and lower-cased once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    needle: String,
}

impl SearchQuery {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.trim().to_lowercase(),
        }
    }

    /// True when the query filters nothing.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// Whether the record's title, any author name or any narrator name
    /// contains the query.
    pub fn matches(&self, record: &CatalogRecord) -> bool {
        if self.is_empty() {
            return true;
        }

        let needle = self.needle.as_str();
        if contains(&record.title, needle) {
            return true;
        }
        if record.author_names().any(|name| contains(name, needle)) {
            return true;
        }
        narrators_of(record)
            .names
            .iter()
            .any(|name| contains(name, needle))
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Whether `record` matches the raw user query.
pub fn matches(record: &CatalogRecord, query: &str) -> bool {
    SearchQuery::new(query).matches(record)
}

/// Whether the record credits more than one narrator.
pub fn is_multi_cast(record: &CatalogRecord) -> bool {
    narrators_of(record).count > 1
}
