//! Catalog presentation: filtering, hiding, ordering and empty states.
//!
//! [`render`] is a pure function of the fetched records and a
//! [`ViewControlState`]. Hosts call it again whenever either changes; nothing
//! is cached between calls.

mod filter;
mod hide;
mod render;
mod session;
mod sort;

pub use filter::{is_multi_cast, matches, SearchQuery};
pub use hide::HideSet;
pub use render::{render, EmptyState, RenderedView};
pub use session::{CatalogSession, FetchStatus, FetchTicket, SessionStatus, SessionView};
pub use sort::{
    collation_key, parse_release_date, sort, CollationKey, ParseSortOptionError, SortDirection,
    SortKey, SortOption,
};

use serde::{Deserialize, Serialize};

/// User-driven controls for one catalog view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewControlState {
    /// Raw search input. Trimmed and lower-cased at match time.
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub multi_cast_only: bool,
    #[serde(default)]
    pub hidden: HideSet,
    #[serde(default)]
    pub sort: SortOption,
}

impl ViewControlState {
    pub fn with_sort(sort: SortOption) -> Self {
        Self {
            sort,
            ..Default::default()
        }
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort.key()
    }

    pub fn sort_direction(&self) -> SortDirection {
        self.sort.direction()
    }

    /// Whether any inclusion filter is narrowing the list.
    pub fn has_active_filters(&self) -> bool {
        self.multi_cast_only || !SearchQuery::new(&self.query).is_empty()
    }
}
