//! The catalog view pipeline: hide, multi-cast, search, sort.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::filter::{is_multi_cast, SearchQuery};
use super::sort::sort;
use super::ViewControlState;
use crate::catalog::CatalogRecord;

/// Which "no results" message applies to an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// Multi-cast toggle on and a search query entered.
    MultiCastSearch,
    /// Multi-cast toggle on, no query.
    MultiCast,
    /// Search query only.
    Search,
}

impl EmptyState {
    /// Pick the message for an empty result. First match wins; with no
    /// filter active there is nothing for the view to explain.
    pub fn select(multi_cast_only: bool, searching: bool) -> Option<Self> {
        match (multi_cast_only, searching) {
            (true, true) => Some(EmptyState::MultiCastSearch),
            (true, false) => Some(EmptyState::MultiCast),
            (false, true) => Some(EmptyState::Search),
            (false, false) => None,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            EmptyState::MultiCastSearch => "No multi-cast audiobooks match your search.",
            EmptyState::MultiCast => "No multi-cast audiobooks found.",
            EmptyState::Search => "No audiobooks match your search.",
        }
    }
}

/// Output of [`render`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedView<'a> {
    pub items: Vec<&'a CatalogRecord>,
    pub empty_state: Option<EmptyState>,
}

impl RenderedView<'_> {
    pub fn empty_message(&self) -> Option<&'static str> {
        self.empty_state.map(EmptyState::message)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|r| r.id.as_str()).collect()
    }
}

/// Derive the visible, ordered list from the fetched records and the
/// current controls.
///
/// Hidden records are dropped first so no other control can bring them
/// back. The multi-cast check runs before the text scan since it is
/// cheaper; both are inclusion filters so the order does not change the
/// result.
pub fn render<'a>(records: &'a [CatalogRecord], controls: &ViewControlState) -> RenderedView<'a> {
    let query = SearchQuery::new(&controls.query);

    let visible = records
        .iter()
        .filter(|record| !controls.hidden.is_hidden(&record.id))
        .filter(|record| !controls.multi_cast_only || is_multi_cast(record))
        .filter(|record| query.matches(record));

    let items = sort(visible, controls.sort.key(), controls.sort.direction());

    let empty_state = if items.is_empty() {
        EmptyState::select(controls.multi_cast_only, !query.is_empty())
    } else {
        None
    };

    debug!(
        total = records.len(),
        visible = items.len(),
        hidden = controls.hidden.len(),
        multi_cast_only = controls.multi_cast_only,
        query = query.as_str(),
        sort = %controls.sort,
        "Rendered catalog view"
    );

    RenderedView { items, empty_state }
}
