pub mod catalog;
pub mod config;
pub mod debounce;
pub mod persistence;
pub mod source;
pub mod testing;
pub mod view;

pub use catalog::{
    narrators_of, Author, CatalogRecord, NarratorField, NormalizedNarrators, NARRATOR_PLACEHOLDER,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogConfig, Config, ConfigError,
    DatabaseConfig, SanitizedConfig, ServerConfig, ViewConfig,
};
pub use debounce::SearchDebouncer;
pub use persistence::{
    MemoryViewStateStore, PersistedViewState, PersistencePolicy, SqliteViewStateStore,
    ViewStateError, ViewStateStore,
};
pub use source::{AudiobookPage, AudiobookSource, FetchError, FetchRequest, FileAudiobookSource};
pub use view::{
    render, CatalogSession, EmptyState, FetchStatus, HideSet, RenderedView, SessionStatus,
    SessionView, SortOption, ViewControlState,
};
