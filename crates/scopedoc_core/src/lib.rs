//! Core engine for the editable scope definition document.
//! Owns edit-mode state, snapshot serialization and persistence decisions;
//! rendering is delegated to a host `Presenter`.

pub mod autosave;
pub mod clock;
pub mod config;
pub mod db;
pub mod editor;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod session;
pub mod snapshot;
pub mod store;

pub use autosave::{AutosaveScheduler, NavigationDecision, SchedulerState};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{load_config, ConfigError, EditorConfig};
pub use editor::{
    Command, CommandOutcome, Key, KeyChord, SaveOutcome, SaveTrigger, ScopeEditor,
};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{
    ConstraintRow, Criterion, CriterionStatus, DocumentModel, DocumentValidationError, ItemRef,
    SpecificObjective, TextField,
};
pub use model::theme::ThemePreference;
pub use presenter::Presenter;
pub use session::{EditSession, Removal, SessionError, SessionResult};
pub use snapshot::{decode_snapshot, encode_snapshot, DocumentSnapshot, Serializer};
pub use store::{
    MemoryStore, PersistenceStore, SqliteKvStore, StoreError, StoreResult, PROJECT_DATA_KEY,
    THEME_KEY,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
