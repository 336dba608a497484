//! Types for persisted view state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::view::{HideSet, ViewControlState};

/// Which controls survive a full reload.
///
/// Both default to `false`: hidden records and the multi-cast toggle are
/// session-only unless the deployment opts in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistencePolicy {
    #[serde(default)]
    pub persist_hide_set: bool,
    #[serde(default)]
    pub persist_multi_cast_toggle: bool,
}

impl PersistencePolicy {
    pub fn session_only() -> Self {
        Self::default()
    }

    pub fn durable() -> Self {
        Self {
            persist_hide_set: true,
            persist_multi_cast_toggle: true,
        }
    }

    /// Whether this policy stores anything at all.
    pub fn persists_anything(&self) -> bool {
        self.persist_hide_set || self.persist_multi_cast_toggle
    }

    /// Snapshot the controls this policy persists.
    pub fn capture(&self, controls: &ViewControlState) -> PersistedViewState {
        PersistedViewState {
            hidden: self.persist_hide_set.then(|| controls.hidden.clone()),
            multi_cast_only: self
                .persist_multi_cast_toggle
                .then_some(controls.multi_cast_only),
            updated_at: Utc::now(),
        }
    }

    /// Restore persisted controls into `controls`, ignoring anything the
    /// policy does not cover.
    pub fn apply(&self, persisted: &PersistedViewState, controls: &mut ViewControlState) {
        if self.persist_hide_set {
            if let Some(hidden) = &persisted.hidden {
                controls.hidden = hidden.clone();
            }
        }
        if self.persist_multi_cast_toggle {
            if let Some(multi_cast_only) = persisted.multi_cast_only {
                controls.multi_cast_only = multi_cast_only;
            }
        }
    }
}

/// Durable part of a session's controls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedViewState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hidden: Option<HideSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multi_cast_only: Option<bool>,
    pub updated_at: DateTime<Utc>,
}
