//! In-memory view state store.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{PersistedViewState, ViewStateError, ViewStateStore};

/// Keeps persisted view state for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryViewStateStore {
    states: Mutex<HashMap<String, PersistedViewState>>,
}

impl MemoryViewStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<String, PersistedViewState>>, ViewStateError>
    {
        self.states
            .lock()
            .map_err(|e| ViewStateError::Internal(format!("Lock poisoned: {}", e)))
    }
}

impl ViewStateStore for MemoryViewStateStore {
    fn load(&self, session_key: &str) -> Result<Option<PersistedViewState>, ViewStateError> {
        Ok(self.lock()?.get(session_key).cloned())
    }

    fn save(&self, session_key: &str, state: &PersistedViewState) -> Result<(), ViewStateError> {
        self.lock()?.insert(session_key.to_string(), state.clone());
        Ok(())
    }

    fn clear(&self, session_key: &str) -> Result<(), ViewStateError> {
        self.lock()?.remove(session_key);
        Ok(())
    }
}
