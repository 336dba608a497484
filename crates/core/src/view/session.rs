//! Per-session catalog state owned by a host.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::render::{render, EmptyState};
use super::{SearchQuery, SortOption, ViewControlState};
use crate::catalog::CatalogRecord;
use crate::persistence::{PersistedViewState, PersistencePolicy};
use crate::source::{AudiobookPage, AudiobookSource, FetchError, FetchRequest};

/// State of the most recent fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FetchStatus {
    Idle,
    Loading,
    Failed { error: String },
}

/// Overall status reported next to a rendered view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionStatus {
    Ready,
    Loading,
    Failed { error: String },
    /// No filters active and the source returned nothing.
    NothingLoaded,
}

/// Identifies one fetch so late responses can be told apart from the
/// latest one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// A rendered view plus the session status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView<'a> {
    pub items: Vec<&'a CatalogRecord>,
    pub empty_state: Option<EmptyState>,
    pub status: SessionStatus,
}

impl SessionView<'_> {
    pub fn empty_message(&self) -> Option<&'static str> {
        self.empty_state.map(EmptyState::message)
    }
}

/// One user's catalog: the fetched records and their view controls.
///
/// A session must not be shared between users. Each fetch result replaces
/// the records wholesale.
#[derive(Debug, Clone)]
pub struct CatalogSession {
    records: Vec<CatalogRecord>,
    controls: ViewControlState,
    status: FetchStatus,
    policy: PersistencePolicy,
    default_sort: SortOption,
    base_request: FetchRequest,
    generation: u64,
}

impl CatalogSession {
    pub fn new(policy: PersistencePolicy, default_sort: SortOption) -> Self {
        Self {
            records: Vec::new(),
            controls: ViewControlState::with_sort(default_sort),
            status: FetchStatus::Idle,
            policy,
            default_sort,
            base_request: FetchRequest::default(),
            generation: 0,
        }
    }

    /// Create a session seeded from previously persisted state.
    pub fn restore(
        policy: PersistencePolicy,
        default_sort: SortOption,
        persisted: Option<&PersistedViewState>,
    ) -> Self {
        let mut session = Self::new(policy, default_sort);
        if let Some(persisted) = persisted {
            policy.apply(persisted, &mut session.controls);
        }
        session
    }

    /// Use `request` for paging and market on every fetch.
    pub fn with_base_request(mut self, request: FetchRequest) -> Self {
        self.base_request = request;
        self
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn controls(&self) -> &ViewControlState {
        &self.controls
    }

    pub fn status(&self) -> &FetchStatus {
        &self.status
    }

    pub fn policy(&self) -> PersistencePolicy {
        self.policy
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.controls.query = query.into();
    }

    pub fn set_multi_cast_only(&mut self, enabled: bool) {
        self.controls.multi_cast_only = enabled;
    }

    /// Flip the multi-cast toggle and return the new value.
    pub fn toggle_multi_cast(&mut self) -> bool {
        self.controls.multi_cast_only = !self.controls.multi_cast_only;
        self.controls.multi_cast_only
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        self.controls.sort = sort;
    }

    /// Hide a record for the rest of the session.
    pub fn hide(&mut self, id: impl Into<String>) -> bool {
        self.controls.hidden.hide(id)
    }

    /// The request the next fetch should send. Non-empty queries are
    /// forwarded for server-side search.
    pub fn fetch_request(&self) -> FetchRequest {
        let query = SearchQuery::new(&self.controls.query);
        let mut request = self.base_request.clone();
        request.query = (!query.is_empty()).then(|| self.controls.query.trim().to_string());
        request
    }

    /// Mark a fetch as started. Existing records stay visible until it
    /// finishes.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        self.status = FetchStatus::Loading;
        FetchTicket(self.generation)
    }

    /// Apply a fetch result. Results for anything but the latest ticket are
    /// dropped. Returns whether the result was applied.
    pub fn finish_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<AudiobookPage, FetchError>,
    ) -> bool {
        if ticket.0 != self.generation {
            debug!(
                "Dropping stale fetch result (ticket {}, latest {})",
                ticket.0, self.generation
            );
            return false;
        }

        match result {
            Ok(page) => {
                info!(
                    "Fetched {} audiobooks (total {}, offset {})",
                    page.items.len(),
                    page.total,
                    page.offset
                );
                self.records = page.items;
                self.status = FetchStatus::Idle;
            }
            Err(e) => {
                warn!("Failed to fetch audiobooks: {}", e);
                self.records.clear();
                self.status = FetchStatus::Failed {
                    error: e.to_string(),
                };
            }
        }
        true
    }

    /// Fetch from `source` and apply the result.
    pub async fn refresh(&mut self, source: &dyn AudiobookSource) -> bool {
        let request = self.fetch_request();
        let ticket = self.begin_fetch();
        let result = source.fetch(&request).await;
        self.finish_fetch(ticket, result)
    }

    /// Reset the controls as a full page reload would. Query and sort go
    /// back to their defaults; hidden ids and the multi-cast toggle survive
    /// only if the policy persists them.
    pub fn reload(&mut self) {
        let mut next = ViewControlState::with_sort(self.default_sort);
        if self.policy.persist_hide_set {
            next.hidden = std::mem::take(&mut self.controls.hidden);
        }
        if self.policy.persist_multi_cast_toggle {
            next.multi_cast_only = self.controls.multi_cast_only;
        }
        self.controls = next;
        info!(
            "Session reloaded (kept {} hidden, multi_cast_only={})",
            self.controls.hidden.len(),
            self.controls.multi_cast_only
        );
    }

    /// Snapshot of what should be written to durable storage, or `None`
    /// when the policy keeps everything session-only.
    pub fn persisted_state(&self) -> Option<PersistedViewState> {
        self.policy
            .persists_anything()
            .then(|| self.policy.capture(&self.controls))
    }

    pub fn render(&self) -> SessionView<'_> {
        let view = render(&self.records, &self.controls);

        let status = match &self.status {
            FetchStatus::Loading => SessionStatus::Loading,
            FetchStatus::Failed { error } => SessionStatus::Failed {
                error: error.clone(),
            },
            FetchStatus::Idle
                if self.records.is_empty() && !self.controls.has_active_filters() =>
            {
                SessionStatus::NothingLoaded
            }
            FetchStatus::Idle => SessionStatus::Ready,
        };

        SessionView {
            items: view.items,
            empty_state: view.empty_state,
            status,
        }
    }
}

impl Default for CatalogSession {
    fn default() -> Self {
        Self::new(PersistencePolicy::default(), SortOption::default())
    }
}
