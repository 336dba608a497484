//! Durable storage for the parts of a view that may survive a reload.
//!
//! What is stored is decided by [`PersistencePolicy`]; stores only keep
//! whatever snapshot they are handed.

mod memory;
mod sqlite;
mod types;

pub use memory::MemoryViewStateStore;
pub use sqlite::SqliteViewStateStore;
pub use types::*;

use thiserror::Error;

/// Errors for view state storage.
#[derive(Debug, Error)]
pub enum ViewStateError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Storage for persisted view state, keyed by a caller-chosen session key.
pub trait ViewStateStore: Send + Sync {
    /// Load the stored state, if any.
    fn load(&self, session_key: &str) -> Result<Option<PersistedViewState>, ViewStateError>;

    /// Store or replace the state for a key.
    fn save(&self, session_key: &str, state: &PersistedViewState) -> Result<(), ViewStateError>;

    /// Forget the state for a key. Missing keys are not an error.
    fn clear(&self, session_key: &str) -> Result<(), ViewStateError>;
}
