//! Audiobook sources: where catalog records come from.
//!
//! The view pipeline only ever sees the records a source hands back. A
//! failed fetch is reported to the session, which then renders an empty
//! list alongside the error.

mod file;
mod types;

pub use file::FileAudiobookSource;
pub use types::{AudiobookPage, FetchRequest};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while fetching audiobooks.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Reading the backing store failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The response could not be parsed.
    #[error("Failed to parse catalog: {0}")]
    Parse(String),

    /// The source cannot serve requests right now.
    #[error("Source unavailable: {0}")]
    Unavailable(String),
}

/// Trait for audiobook catalog sources.
#[async_trait]
pub trait AudiobookSource: Send + Sync {
    /// Fetch one page of audiobooks.
    async fn fetch(&self, request: &FetchRequest) -> Result<AudiobookPage, FetchError>;

    /// Name of this source, for logs and status output.
    fn name(&self) -> &'static str;
}
