use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::persistence::PersistencePolicy;
use crate::source::FetchRequest;
use crate::view::SortOption;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Sessions untouched for this long are dropped
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

impl ServerConfig {
    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

fn default_session_idle_secs() -> u64 {
    30 * 60
}

/// Where audiobooks come from and how they are paged
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// JSON catalog file served by the file source
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    /// Market code sent with every fetch
    #[serde(default = "default_market")]
    pub market: String,
    /// Records per fetch (upstream maximum is 50)
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            market: default_market(),
            page_size: default_page_size(),
        }
    }
}

impl CatalogConfig {
    /// Base request for session fetches.
    pub fn fetch_request(&self) -> FetchRequest {
        FetchRequest {
            limit: self.page_size,
            offset: 0,
            market: self.market.clone(),
            query: None,
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("audiobooks.json")
}

fn default_market() -> String {
    "AU".to_string()
}

fn default_page_size() -> u32 {
    40
}

/// View behavior
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub default_sort: SortOption,
    /// Quiet period before a typed query triggers a refetch
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,
    /// Keep hidden audiobooks across reloads
    #[serde(default)]
    pub persist_hide_set: bool,
    /// Keep the multi-cast toggle across reloads
    #[serde(default)]
    pub persist_multi_cast_toggle: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_sort: SortOption::default(),
            search_debounce_ms: default_search_debounce_ms(),
            persist_hide_set: false,
            persist_multi_cast_toggle: false,
        }
    }
}

impl ViewConfig {
    pub fn persistence_policy(&self) -> PersistencePolicy {
        PersistencePolicy {
            persist_hide_set: self.persist_hide_set,
            persist_multi_cast_toggle: self.persist_multi_cast_toggle,
        }
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}

fn default_search_debounce_ms() -> u64 {
    300
}

/// Database configuration (persisted view state)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

fn default_db_path() -> PathBuf {
    PathBuf::from("audioshelf.db")
}

/// Sanitized config for API responses (filesystem paths hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub catalog: SanitizedCatalogConfig,
    pub view: ViewConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub source: String,
    pub market: String,
    pub page_size: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            server: config.server.clone(),
            catalog: SanitizedCatalogConfig {
                source: "file".to_string(),
                market: config.catalog.market.clone(),
                page_size: config.catalog.page_size,
            },
            view: config.view.clone(),
        }
    }
}
