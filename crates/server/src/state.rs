use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use uuid::Uuid;

use audioshelf_core::{
    AudiobookSource, CatalogSession, Config, SanitizedConfig, SearchDebouncer, ViewStateError,
    ViewStateStore,
};

/// One browsing session and what travels with it.
#[derive(Debug)]
pub struct SessionEntry {
    pub session: CatalogSession,
    /// Key for durable view state, if the client asked for one.
    pub persist_key: Option<String>,
    /// Pending search refetch.
    pub debouncer: SearchDebouncer,
}

pub type SharedSession = Arc<Mutex<SessionEntry>>;

struct SessionSlot {
    shared: SharedSession,
    last_access: Instant,
}

/// Shared application state
pub struct AppState {
    config: Config,
    source: Arc<dyn AudiobookSource>,
    view_store: Arc<dyn ViewStateStore>,
    sessions: RwLock<HashMap<String, SessionSlot>>,
}

impl AppState {
    pub fn new(
        config: Config,
        source: Arc<dyn AudiobookSource>,
        view_store: Arc<dyn ViewStateStore>,
    ) -> Self {
        Self {
            config,
            source,
            view_store,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn source(&self) -> Arc<dyn AudiobookSource> {
        Arc::clone(&self.source)
    }

    /// Register a new session, seeded from durable state under
    /// `persist_key` when the policy keeps anything.
    pub async fn create_session(
        &self,
        persist_key: Option<String>,
    ) -> Result<(String, SharedSession), ViewStateError> {
        let policy = self.config.view.persistence_policy();

        let persisted = match &persist_key {
            Some(key) if policy.persists_anything() => self.view_store.load(key)?,
            _ => None,
        };
        if persisted.is_some() {
            debug!("Restoring persisted view state for key {:?}", persist_key);
        }

        let session =
            CatalogSession::restore(policy, self.config.view.default_sort, persisted.as_ref())
                .with_base_request(self.config.catalog.fetch_request());

        let entry = SessionEntry {
            session,
            persist_key,
            debouncer: SearchDebouncer::new(self.config.view.search_debounce()),
        };

        self.evict_idle(self.config.server.session_idle_timeout()).await;

        let id = Uuid::new_v4().to_string();
        let shared = Arc::new(Mutex::new(entry));
        self.sessions.write().await.insert(
            id.clone(),
            SessionSlot {
                shared: Arc::clone(&shared),
                last_access: Instant::now(),
            },
        );
        info!("Created session {}", id);

        Ok((id, shared))
    }

    /// Look up a session and mark it as used.
    pub async fn session(&self, id: &str) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let slot = sessions.get_mut(id)?;
        slot.last_access = Instant::now();
        Some(Arc::clone(&slot.shared))
    }

    /// Drop a session and any refetch it still has pending.
    pub async fn remove_session(&self, id: &str) -> bool {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(slot) => {
                slot.shared.lock().await.debouncer.cancel();
                info!("Removed session {}", id);
                true
            }
            None => false,
        }
    }

    /// Drop every session not looked up within `max_idle`. Returns how
    /// many were dropped.
    pub async fn evict_idle(&self, max_idle: Duration) -> usize {
        let expired: Vec<(String, SessionSlot)> = {
            let mut sessions = self.sessions.write().await;
            let ids: Vec<String> = sessions
                .iter()
                .filter(|(_, slot)| slot.last_access.elapsed() >= max_idle)
                .map(|(id, _)| id.clone())
                .collect();
            ids.into_iter()
                .filter_map(|id| sessions.remove(&id).map(|slot| (id, slot)))
                .collect()
        };

        for (id, slot) in &expired {
            slot.shared.lock().await.debouncer.cancel();
            debug!("Evicted idle session {}", id);
        }
        if !expired.is_empty() {
            info!("Evicted {} idle session(s)", expired.len());
        }
        expired.len()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Write the session's durable view state, if it has a key and the
    /// policy keeps anything.
    pub fn persist(&self, entry: &SessionEntry) -> Result<(), ViewStateError> {
        if let (Some(key), Some(snapshot)) = (&entry.persist_key, entry.session.persisted_state())
        {
            self.view_store.save(key, &snapshot)?;
            debug!("Saved view state for key {}", key);
        }
        Ok(())
    }
}

/// Periodically evict sessions idle for longer than the configured timeout.
pub fn spawn_idle_sweeper(state: Arc<AppState>) -> JoinHandle<()> {
    let max_idle = state.config().server.session_idle_timeout();
    let period = (max_idle / 4).max(Duration::from_secs(1));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            state.evict_idle(max_idle).await;
        }
    })
}
