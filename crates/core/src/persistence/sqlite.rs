//! SQLite-backed view state store.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::{PersistedViewState, ViewStateError, ViewStateStore};
use crate::view::HideSet;

/// SQLite-backed view state store.
pub struct SqliteViewStateStore {
    conn: Mutex<Connection>,
}

impl SqliteViewStateStore {
    /// Open (or create) the database file and its tables.
    pub fn new(path: &Path) -> Result<Self, ViewStateError> {
        let conn = Connection::open(path).map_err(|e| ViewStateError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, ViewStateError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ViewStateError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), ViewStateError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS view_state (
                session_key TEXT PRIMARY KEY,
                hidden_ids TEXT,
                multi_cast_only INTEGER,
                updated_at TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| ViewStateError::Database(e.to_string()))?;

        Ok(())
    }

    fn connection(&self) -> Result<std::sync::MutexGuard<'_, Connection>, ViewStateError> {
        self.conn
            .lock()
            .map_err(|e| ViewStateError::Internal(format!("Lock poisoned: {}", e)))
    }
}

impl ViewStateStore for SqliteViewStateStore {
    fn load(&self, session_key: &str) -> Result<Option<PersistedViewState>, ViewStateError> {
        let conn = self.connection()?;

        let row = conn
            .query_row(
                "SELECT hidden_ids, multi_cast_only, updated_at
                 FROM view_state WHERE session_key = ?",
                params![session_key],
                |row| {
                    let hidden_ids: Option<String> = row.get(0)?;
                    let multi_cast_only: Option<bool> = row.get(1)?;
                    let updated_at: String = row.get(2)?;
                    Ok((hidden_ids, multi_cast_only, updated_at))
                },
            )
            .optional()
            .map_err(|e| ViewStateError::Database(e.to_string()))?;

        let Some((hidden_ids, multi_cast_only, updated_at)) = row else {
            return Ok(None);
        };

        let hidden = hidden_ids
            .map(|json| serde_json::from_str::<HideSet>(&json))
            .transpose()
            .map_err(|e| ViewStateError::Serialization(e.to_string()))?;

        let updated_at = DateTime::parse_from_rfc3339(&updated_at)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| ViewStateError::Serialization(format!("updated_at: {}", e)))?;

        Ok(Some(PersistedViewState {
            hidden,
            multi_cast_only,
            updated_at,
        }))
    }

    fn save(&self, session_key: &str, state: &PersistedViewState) -> Result<(), ViewStateError> {
        let hidden_ids = state
            .hidden
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| ViewStateError::Serialization(e.to_string()))?;

        let conn = self.connection()?;
        conn.execute(
            "INSERT INTO view_state (session_key, hidden_ids, multi_cast_only, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(session_key) DO UPDATE SET
                hidden_ids = excluded.hidden_ids,
                multi_cast_only = excluded.multi_cast_only,
                updated_at = excluded.updated_at",
            params![
                session_key,
                hidden_ids,
                state.multi_cast_only,
                state.updated_at.to_rfc3339()
            ],
        )
        .map_err(|e| ViewStateError::Database(e.to_string()))?;

        Ok(())
    }

    fn clear(&self, session_key: &str) -> Result<(), ViewStateError> {
        let conn = self.connection()?;
        conn.execute(
            "DELETE FROM view_state WHERE session_key = ?",
            params![session_key],
        )
        .map_err(|e| ViewStateError::Database(e.to_string()))?;
        Ok(())
    }
}
