//! Testing utilities and mock implementations.
//!
//! Provides a mock audiobook source so sessions and hosts can be exercised
//! without a catalog file, plus record builders for the common shapes.
//!
//! # Example
//!
//! ```rust,ignore
//! use audioshelf_core::testing::{fixtures, MockAudiobookSource};
//!
//! let source = MockAudiobookSource::with_items(vec![
//!     fixtures::with_narrators("1", "Dracula", &["Alan Cumming", "Tim Curry"]),
//! ]);
//! ```

mod mock_audiobook_source;

pub use mock_audiobook_source::{MockAudiobookSource, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::json;

    use crate::catalog::{Author, CatalogRecord, NarratorCredit, NarratorEntry, NarratorField};

    /// A record with only an id and title.
    pub fn audiobook(id: &str, title: &str) -> CatalogRecord {
        CatalogRecord::new(id, title)
    }

    /// A record narrated by `narrators`, in the object form the upstream
    /// API uses.
    pub fn with_narrators(id: &str, title: &str, narrators: &[&str]) -> CatalogRecord {
        let mut record = CatalogRecord::new(id, title);
        record.narrators = Some(NarratorField::List(
            narrators
                .iter()
                .map(|name| NarratorEntry::Credit(NarratorCredit::named(*name)))
                .collect(),
        ));
        record
    }

    /// A record credited to `authors`.
    pub fn with_authors(id: &str, title: &str, authors: &[&str]) -> CatalogRecord {
        let mut record = CatalogRecord::new(id, title);
        record.authors = authors.iter().map(|name| Author::new(*name)).collect();
        record
    }

    /// A record with a raw release date string.
    pub fn with_release_date(id: &str, title: &str, release_date: &str) -> CatalogRecord {
        let mut record = CatalogRecord::new(id, title);
        record.release_date = Some(release_date.to_string());
        record
    }

    /// A small catalog covering single and multi-cast records, accented
    /// titles and partial or missing dates.
    pub fn sample_catalog() -> Vec<CatalogRecord> {
        let mut dune = with_narrators("1", "Dune", &["Scott Brick", "Orlagh Cassidy"]);
        dune.authors = vec![Author::new("Frank Herbert")];
        dune.release_date = Some("2007-12-31".to_string());

        let mut emma = with_narrators("2", "Émile", &["Juliet Stevenson"]);
        emma.authors = vec![Author::new("Jean-Jacques Rousseau")];
        emma.release_date = Some("2011".to_string());

        let mut dracula = with_narrators("3", "Dracula", &["Alan Cumming", "Tim Curry"]);
        dracula.authors = vec![Author::new("Bram Stoker")];
        dracula.release_date = Some("2012-10".to_string());

        let mut atlas = with_authors("4", "atlas shrugged", &["Ayn Rand"]);
        atlas.release_date = Some("not a date".to_string());

        vec![dune, emma, dracula, atlas]
    }

    /// [`sample_catalog`] wrapped the way a catalog file holds it.
    pub fn sample_catalog_json() -> serde_json::Value {
        json!({
            "audiobooks": {
                "items": sample_catalog(),
                "total": 4
            }
        })
    }
}
