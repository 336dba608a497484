//! Audiobook source backed by a JSON catalog file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use super::types::parse_catalog;
use super::{AudiobookPage, AudiobookSource, FetchError, FetchRequest};
use crate::catalog::CatalogRecord;
use crate::view::SearchQuery;

/// Serves audiobooks from a JSON file on disk.
///
/// The file is re-read on every fetch so edits show up on the next reload.
/// A request query narrows the list with the same matching rules the view
/// uses, then `offset`/`limit` page through the result.
#[derive(Debug, Clone)]
pub struct FileAudiobookSource {
    path: PathBuf,
}

impl FileAudiobookSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_records(&self) -> Result<Vec<CatalogRecord>, FetchError> {
        let bytes = tokio::fs::read(&self.path).await?;
        parse_catalog(&bytes)
            .map_err(|e| FetchError::Parse(format!("{}: {}", self.path.display(), e)))
    }
}

#[async_trait]
impl AudiobookSource for FileAudiobookSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<AudiobookPage, FetchError> {
        let records = self.read_records().await?;

        let query = SearchQuery::new(request.query.as_deref().unwrap_or_default());
        let matching: Vec<CatalogRecord> = records
            .into_iter()
            .filter(|record| query.matches(record))
            .collect();

        let total = matching.len() as u32;
        let items: Vec<CatalogRecord> = matching
            .into_iter()
            .skip(request.offset as usize)
            .take(request.limit as usize)
            .collect();

        debug!(
            "Catalog file fetch: path={}, query='{}', offset={}, limit={}, returned={}, total={}",
            self.path.display(),
            query.as_str(),
            request.offset,
            request.limit,
            items.len(),
            total
        );

        Ok(AudiobookPage {
            items,
            total,
            limit: request.limit,
            offset: request.offset,
        })
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
