//! Catalog session API handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

use audioshelf_core::{
    narrators_of, view::is_multi_cast, AudiobookSource, CatalogRecord, SessionStatus, SortOption,
    ViewStateError,
};

use crate::state::{AppState, SessionEntry, SharedSession};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating a session
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionBody {
    /// Key under which hidden ids and the multi-cast toggle are kept
    /// between sessions. Ignored when nothing is persisted.
    #[serde(default)]
    pub persist_key: Option<String>,
}

/// Request body for changing view controls. Absent fields are left as is.
#[derive(Debug, Deserialize)]
pub struct UpdateControlsBody {
    pub query: Option<String>,
    pub multi_cast_only: Option<bool>,
    pub sort: Option<SortOption>,
}

/// Request body for hiding an audiobook
#[derive(Debug, Deserialize)]
pub struct HideBody {
    pub id: String,
}

/// One audiobook card: the record plus its narrator presentation.
#[derive(Debug, Serialize)]
pub struct AudiobookItem {
    #[serde(flatten)]
    pub record: CatalogRecord,
    pub narrators_display: String,
    pub narrator_label: &'static str,
    pub multi_cast: bool,
}

impl From<&CatalogRecord> for AudiobookItem {
    fn from(record: &CatalogRecord) -> Self {
        let narrators = narrators_of(record);
        Self {
            narrators_display: narrators.display(),
            narrator_label: narrators.label(),
            multi_cast: is_multi_cast(record),
            record: record.clone(),
        }
    }
}

/// Rendered view of a session
#[derive(Debug, Serialize)]
pub struct SessionViewResponse {
    pub session_id: String,
    pub items: Vec<AudiobookItem>,
    pub empty_message: Option<String>,
    pub status: SessionStatus,
    pub query: String,
    pub multi_cast_only: bool,
    pub sort: SortOption,
    pub hidden_count: usize,
    /// A search refetch is waiting out its debounce.
    pub search_pending: bool,
}

impl SessionViewResponse {
    fn render(session_id: &str, entry: &SessionEntry) -> Self {
        let view = entry.session.render();
        let controls = entry.session.controls();
        let empty_message = view.empty_message().map(str::to_string);

        Self {
            session_id: session_id.to_string(),
            items: view.items.into_iter().map(AudiobookItem::from).collect(),
            empty_message,
            status: view.status,
            query: controls.query.clone(),
            multi_cast_only: controls.multi_cast_only,
            sort: controls.sort,
            hidden_count: controls.hidden.len(),
            search_pending: entry.debouncer.is_pending(),
        }
    }

    /// 502 when the last fetch failed, otherwise `ok`.
    fn status_code(&self, ok: StatusCode) -> StatusCode {
        match self.status {
            SessionStatus::Failed { .. } => StatusCode::BAD_GATEWAY,
            _ => ok,
        }
    }
}

/// Error response
#[derive(Debug, Serialize)]
pub struct SessionErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<SessionErrorResponse>);

fn not_found(id: &str) -> ApiError {
    (
        StatusCode::NOT_FOUND,
        Json(SessionErrorResponse {
            error: format!("Session not found: {}", id),
        }),
    )
}

fn store_error(e: ViewStateError) -> ApiError {
    error!("View state store failed: {}", e);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(SessionErrorResponse {
            error: e.to_string(),
        }),
    )
}

async fn lookup(state: &AppState, id: &str) -> Result<SharedSession, ApiError> {
    state.session(id).await.ok_or_else(|| not_found(id))
}

/// Fetch into a session without holding its lock while the request runs.
async fn fetch_into(shared: &SharedSession, source: &dyn AudiobookSource) -> bool {
    let (request, ticket) = {
        let mut entry = shared.lock().await;
        let request = entry.session.fetch_request();
        (request, entry.session.begin_fetch())
    };
    let result = source.fetch(&request).await;
    shared.lock().await.session.finish_fetch(ticket, result)
}

fn schedule_search(
    entry: &mut SessionEntry,
    shared: &SharedSession,
    source: Arc<dyn AudiobookSource>,
) {
    let shared = Arc::clone(shared);
    let query = entry.session.controls().query.clone();
    entry.debouncer.schedule(query, move |query| async move {
        debug!("Refetching for search '{}'", query);
        fetch_into(&shared, source.as_ref()).await;
    });
}

// ============================================================================
// Handlers
// ============================================================================

/// Create a session and run its initial fetch
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSessionBody>,
) -> Result<(StatusCode, Json<SessionViewResponse>), ApiError> {
    let (id, shared) = state
        .create_session(body.persist_key)
        .await
        .map_err(store_error)?;

    fetch_into(&shared, state.source().as_ref()).await;

    let entry = shared.lock().await;
    let view = SessionViewResponse::render(&id, &entry);
    Ok((view.status_code(StatusCode::CREATED), Json(view)))
}

/// Get the rendered view of a session
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<SessionViewResponse>), ApiError> {
    let shared = lookup(&state, &id).await?;
    let entry = shared.lock().await;
    let view = SessionViewResponse::render(&id, &entry);
    Ok((view.status_code(StatusCode::OK), Json(view)))
}

/// Change search, multi-cast toggle or sort order
///
/// The view is re-rendered from the current records right away. A changed
/// query also schedules a debounced refetch.
pub async fn update_controls(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<UpdateControlsBody>,
) -> Result<(StatusCode, Json<SessionViewResponse>), ApiError> {
    let shared = lookup(&state, &id).await?;
    let mut entry = shared.lock().await;

    let mut changed_persisted = false;
    if let Some(multi_cast_only) = body.multi_cast_only {
        if entry.session.controls().multi_cast_only != multi_cast_only {
            entry.session.set_multi_cast_only(multi_cast_only);
            changed_persisted = true;
        }
    }

    if let Some(sort) = body.sort {
        entry.session.set_sort(sort);
    }

    if let Some(query) = body.query {
        if entry.session.controls().query != query {
            entry.session.set_query(query);
            schedule_search(&mut entry, &shared, state.source());
        }
    }

    if changed_persisted {
        state.persist(&entry).map_err(store_error)?;
    }

    let view = SessionViewResponse::render(&id, &entry);
    Ok((view.status_code(StatusCode::OK), Json(view)))
}

/// Hide an audiobook for the rest of the session
pub async fn hide_audiobook(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<HideBody>,
) -> Result<(StatusCode, Json<SessionViewResponse>), ApiError> {
    let shared = lookup(&state, &id).await?;
    let mut entry = shared.lock().await;

    if entry.session.hide(body.id) {
        state.persist(&entry).map_err(store_error)?;
    }

    let view = SessionViewResponse::render(&id, &entry);
    Ok((view.status_code(StatusCode::OK), Json(view)))
}

/// Reset controls as a page reload would and fetch again
pub async fn reload_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<SessionViewResponse>), ApiError> {
    let shared = lookup(&state, &id).await?;
    {
        let mut entry = shared.lock().await;
        entry.debouncer.cancel();
        entry.session.reload();
    }

    fetch_into(&shared, state.source().as_ref()).await;

    let entry = shared.lock().await;
    let view = SessionViewResponse::render(&id, &entry);
    Ok((view.status_code(StatusCode::OK), Json(view)))
}

/// Discard a session
pub async fn delete_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.remove_session(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(not_found(&id))
    }
}
