//! Catalog session integration tests.
//!
//! These tests drive a session end to end against mock and file sources:
//! - Fetch, filter, hide and sort through one session
//! - Reload behavior under session-only and durable policies
//! - Persisted view state surviving a store reopen
//! - Fetch failures, stale results and debounced refetches

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tempfile::{NamedTempFile, TempDir};
use tokio::sync::Mutex;

use audioshelf_core::{
    testing::{fixtures, MockAudiobookSource},
    AudiobookPage, AudiobookSource, CatalogSession, EmptyState, FetchError, FetchRequest,
    FileAudiobookSource, PersistencePolicy, SearchDebouncer, SessionStatus, SortOption,
    SqliteViewStateStore, ViewStateStore,
};

fn ids(session: &CatalogSession) -> Vec<String> {
    session
        .render()
        .items
        .iter()
        .map(|record| record.id.clone())
        .collect()
}

async fn loaded_session(policy: PersistencePolicy) -> (CatalogSession, MockAudiobookSource) {
    let source = MockAudiobookSource::with_items(fixtures::sample_catalog());
    let mut session = CatalogSession::new(policy, SortOption::NameAsc);
    assert!(session.refresh(&source).await);
    (session, source)
}

#[tokio::test]
async fn test_default_view_sorted_by_name() {
    let (session, _source) = loaded_session(PersistencePolicy::session_only()).await;

    assert_eq!(ids(&session), vec!["4", "3", "1", "2"]);
    let view = session.render();
    assert_eq!(view.status, SessionStatus::Ready);
    assert_eq!(view.empty_message(), None);
}

#[tokio::test]
async fn test_release_date_ordering_keeps_invalid_last() {
    let (mut session, _source) = loaded_session(PersistencePolicy::session_only()).await;

    session.set_sort(SortOption::ReleaseDateAsc);
    assert_eq!(ids(&session), vec!["1", "2", "3", "4"]);

    session.set_sort(SortOption::ReleaseDateDesc);
    assert_eq!(ids(&session), vec!["3", "2", "1", "4"]);
}

#[tokio::test]
async fn test_release_date_precisions_interleave() {
    let source = MockAudiobookSource::with_items(vec![
        fixtures::with_release_date("stamp", "Stamped", "2024-03-09T12:00:00"),
        fixtures::with_release_date("year", "Year Only", "2024"),
        fixtures::with_release_date("blank", "Blank", ""),
        fixtures::with_release_date("day", "Day", "2024-03-09"),
        fixtures::with_release_date("month", "Month", "2024-03"),
    ]);
    let mut session = CatalogSession::new(PersistencePolicy::session_only(), SortOption::NameAsc);
    session.refresh(&source).await;

    session.set_sort(SortOption::ReleaseDateAsc);
    assert_eq!(ids(&session), vec!["year", "month", "day", "stamp", "blank"]);

    session.set_sort(SortOption::ReleaseDateDesc);
    assert_eq!(ids(&session), vec!["stamp", "day", "month", "year", "blank"]);
}

#[tokio::test]
async fn test_filters_compose() {
    let (mut session, _source) = loaded_session(PersistencePolicy::session_only()).await;

    session.set_multi_cast_only(true);
    assert_eq!(ids(&session), vec!["3", "1"]);

    session.set_query("  STOKER ");
    assert_eq!(ids(&session), vec!["3"]);

    session.hide("3");
    let view = session.render();
    assert!(view.items.is_empty());
    assert_eq!(view.empty_state, Some(EmptyState::MultiCastSearch));
    assert_eq!(view.status, SessionStatus::Ready);

    session.set_query("");
    assert_eq!(ids(&session), vec!["1"]);
}

#[tokio::test]
async fn test_query_is_forwarded_to_source() {
    let (mut session, source) = loaded_session(PersistencePolicy::session_only()).await;

    session.set_query(" dune ");
    session.refresh(&source).await;

    let fetches = source.recorded_fetches().await;
    assert_eq!(fetches.len(), 2);
    assert_eq!(fetches[0].request.query, None);
    assert_eq!(fetches[1].request.query.as_deref(), Some("dune"));
}

#[tokio::test]
async fn test_session_only_reload_forgets_everything() {
    let (mut session, source) = loaded_session(PersistencePolicy::session_only()).await;

    session.hide("1");
    session.toggle_multi_cast();
    session.set_query("dracula");
    session.set_sort(SortOption::NameDesc);
    assert!(session.persisted_state().is_none());

    session.reload();
    session.refresh(&source).await;

    assert_eq!(session.controls().sort, SortOption::NameAsc);
    assert_eq!(ids(&session), vec!["4", "3", "1", "2"]);
}

#[tokio::test]
async fn test_durable_state_survives_store_reopen() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("view.db");
    let policy = PersistencePolicy::durable();

    {
        let store = SqliteViewStateStore::new(&db_path).expect("Failed to open store");
        let (mut session, _source) = loaded_session(policy).await;
        session.hide("1");
        session.set_multi_cast_only(true);
        session.set_query("dra");

        let state = session.persisted_state().expect("policy persists state");
        store.save("reader-1", &state).unwrap();
    }

    let store = SqliteViewStateStore::new(&db_path).expect("Failed to reopen store");
    let persisted = store.load("reader-1").unwrap();
    assert!(persisted.is_some());

    let source = MockAudiobookSource::with_items(fixtures::sample_catalog());
    let mut session = CatalogSession::restore(policy, SortOption::NameAsc, persisted.as_ref());
    session.refresh(&source).await;

    assert!(session.controls().query.is_empty());
    assert!(session.controls().multi_cast_only);
    assert_eq!(ids(&session), vec!["3"]);

    store.clear("reader-1").unwrap();
    assert!(store.load("reader-1").unwrap().is_none());
}

#[tokio::test]
async fn test_failed_fetch_then_recovery() {
    let (mut session, source) = loaded_session(PersistencePolicy::session_only()).await;

    source
        .set_next_error(FetchError::Unavailable("rate limited".to_string()))
        .await;
    session.refresh(&source).await;

    let view = session.render();
    assert!(view.items.is_empty());
    assert!(matches!(
        view.status,
        SessionStatus::Failed { ref error } if error.contains("rate limited")
    ));

    session.refresh(&source).await;
    assert_eq!(session.render().status, SessionStatus::Ready);
    assert_eq!(session.records().len(), 4);
}

#[tokio::test]
async fn test_empty_catalog_reports_nothing_loaded() {
    let source = MockAudiobookSource::new();
    let mut session = CatalogSession::default();
    session.refresh(&source).await;

    let view = session.render();
    assert_eq!(view.status, SessionStatus::NothingLoaded);
    assert_eq!(view.empty_message(), None);

    session.set_multi_cast_only(true);
    let view = session.render();
    assert_eq!(view.status, SessionStatus::Ready);
    assert_eq!(view.empty_message(), Some("No multi-cast audiobooks found."));
}

#[tokio::test]
async fn test_stale_fetch_is_dropped() {
    let source = MockAudiobookSource::with_items(fixtures::sample_catalog());
    let mut session = CatalogSession::default();

    let request = session.fetch_request();
    let first = session.begin_fetch();
    let second = session.begin_fetch();

    let late = source.fetch(&request).await;
    let fresh = Ok(AudiobookPage::empty(&request));

    assert!(session.finish_fetch(second, fresh));
    assert!(!session.finish_fetch(first, late));
    assert!(session.records().is_empty());
}

#[tokio::test]
async fn test_file_source_session() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", fixtures::sample_catalog_json()).unwrap();
    file.flush().unwrap();

    let source = FileAudiobookSource::new(file.path());
    let mut session = CatalogSession::new(PersistencePolicy::session_only(), SortOption::NameDesc)
        .with_base_request(FetchRequest {
            limit: 3,
            ..Default::default()
        });
    session.refresh(&source).await;

    assert_eq!(session.records().len(), 3);
    assert_eq!(ids(&session), vec!["2", "1", "3"]);
}

#[tokio::test]
async fn test_debounced_refresh_fetches_once() {
    let source = Arc::new(MockAudiobookSource::with_items(fixtures::sample_catalog()));
    let session = Arc::new(Mutex::new(CatalogSession::default()));
    let mut debouncer = SearchDebouncer::new(Duration::from_millis(20));

    for typed in ["d", "du", "dun"] {
        session.lock().await.set_query(typed);
        let session = Arc::clone(&session);
        let source = Arc::clone(&source);
        debouncer.schedule(typed, move |_query| async move {
            session.lock().await.refresh(source.as_ref()).await;
        });
    }

    tokio::time::sleep(Duration::from_millis(150)).await;

    let fetches = source.recorded_fetches().await;
    assert_eq!(fetches.len(), 1);
    assert_eq!(fetches[0].request.query.as_deref(), Some("dun"));
    assert_eq!(session.lock().await.render().status, SessionStatus::Ready);
}
