//! Mock audiobook source for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::catalog::CatalogRecord;
use crate::source::{AudiobookPage, AudiobookSource, FetchError, FetchRequest};

/// A recorded fetch for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedFetch {
    /// The request that was sent.
    pub request: FetchRequest,
    /// When the fetch was made.
    pub timestamp: Instant,
}

/// Mock implementation of the AudiobookSource trait.
///
/// Provides controllable behavior for testing:
/// - Return a configurable list of audiobooks (paged like the real API)
/// - Track fetch requests for assertions
/// - Simulate failures and slow responses
///
/// # Example
///
/// ```rust,ignore
/// use audioshelf_core::testing::{MockAudiobookSource, fixtures};
///
/// let source = MockAudiobookSource::new();
/// source.set_items(vec![fixtures::audiobook("1", "Dune")]).await;
///
/// let page = source.fetch(&FetchRequest::default()).await?;
/// assert_eq!(page.items.len(), 1);
/// assert_eq!(source.fetch_count().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockAudiobookSource {
    /// Audiobooks returned by every fetch.
    items: Arc<RwLock<Vec<CatalogRecord>>>,
    /// Recorded fetch requests.
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<FetchError>>>,
    /// Artificial latency before responding.
    delay: Arc<RwLock<Option<Duration>>>,
}

impl MockAudiobookSource {
    /// Create a new mock source with no audiobooks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source with predefined audiobooks.
    pub fn with_items(items: Vec<CatalogRecord>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
            ..Self::default()
        }
    }

    /// Set the audiobooks returned by subsequent fetches.
    pub async fn set_items(&self, items: Vec<CatalogRecord>) {
        *self.items.write().await = items;
    }

    /// Get recorded fetch requests.
    pub async fn recorded_fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn fetch_count(&self) -> usize {
        self.fetches.read().await.len()
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: FetchError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay every fetch by `delay`.
    pub async fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.write().await = delay;
    }
}

#[async_trait]
impl AudiobookSource for MockAudiobookSource {
    async fn fetch(&self, request: &FetchRequest) -> Result<AudiobookPage, FetchError> {
        self.fetches.write().await.push(RecordedFetch {
            request: request.clone(),
            timestamp: Instant::now(),
        });

        let delay = *self.delay.read().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        let items = self.items.read().await;
        let page: Vec<CatalogRecord> = items
            .iter()
            .skip(request.offset as usize)
            .take(request.limit as usize)
            .cloned()
            .collect();

        Ok(AudiobookPage {
            items: page,
            total: items.len() as u32,
            limit: request.limit,
            offset: request.offset,
        })
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
