//! Session hide list.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Record ids the user removed from view.
///
/// Hiding is one-directional: there is no unhide. A fresh set is the only
/// way back, which is what a non-persisted reload does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HideSet {
    ids: BTreeSet<String>,
}

impl HideSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hide a record. Returns `false` if it was already hidden.
    pub fn hide(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn is_hidden(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for HideSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}
