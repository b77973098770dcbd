//! Scope document editor: command dispatch and the save pipeline.
//!
//! # Responsibility
//! - Map each user action to exactly one session/scheduler operation.
//! - Run the synchronous snapshot -> encode -> store save pipeline.
//! - Bootstrap the document and theme from storage on startup.
//!
//! # Invariants
//! - The autosave scheduler is Active iff the session is editing.
//! - Storage failures never abort a command; they become notifications.
//! - Malformed stored data is treated as absent; built-in content is used.

use crate::autosave::{AutosaveScheduler, NavigationDecision};
use crate::clock::Clock;
use crate::config::EditorConfig;
use crate::model::document::{CriterionStatus, DocumentModel, ItemRef, TextField};
use crate::model::theme::ThemePreference;
use crate::presenter::Presenter;
use crate::session::{EditSession, Removal, SessionResult};
use crate::snapshot::{decode_snapshot, encode_snapshot, Serializer};
use crate::store::{PersistenceStore, PROJECT_DATA_KEY, THEME_KEY};
use log::{error, info, warn};

pub const EDIT_MODE_ON_MESSAGE: &str = "Modo edición activado";
pub const EDIT_MODE_OFF_MESSAGE: &str = "Modo edición desactivado";
pub const SAVE_OK_MESSAGE: &str = "Cambios guardados correctamente";
pub const SAVE_FAILED_MESSAGE: &str = "No se pudieron guardar los cambios";
pub const THEME_SAVE_FAILED_MESSAGE: &str = "No se pudo guardar el tema";

/// Keyboard key relevant to the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Escape,
}

/// One key press with modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyChord {
    pub key: Key,
    pub ctrl: bool,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self { key, ctrl: false }
    }

    pub fn ctrl(key: Key) -> Self {
        Self { key, ctrl: true }
    }
}

/// Named user actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleEditMode,
    Save,
    AddObjective,
    AddConstraint,
    DeleteItem(ItemRef),
    ToggleCriterion(String),
    EditText { field: TextField, text: String },
    ToggleTheme,
    KeyPress(KeyChord),
    NavigateAway,
    /// Timer tick; checks whether a periodic autosave is due.
    Tick,
}

/// Why the save pipeline ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTrigger {
    Manual,
    Shortcut,
    Autosave,
    CriterionToggle,
}

impl SaveTrigger {
    fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Shortcut => "shortcut",
            Self::Autosave => "autosave",
            Self::CriterionToggle => "criterion_toggle",
        }
    }
}

/// Result of one save pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { saved_at: i64 },
    /// Nothing was persisted; the in-memory document is unchanged.
    Failed { reason: String },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }
}

/// Observable effect of a dispatched command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    EditModeChanged { editing: bool },
    ObjectiveAdded { id: String },
    ConstraintAdded { index: usize },
    ItemRemoved(ItemRef),
    RemovalDeclined,
    CriterionToggled {
        id: String,
        status: CriterionStatus,
        save: SaveOutcome,
    },
    TextUpdated,
    ThemeChanged(ThemePreference),
    Saved(SaveOutcome),
    Navigation(NavigationDecision),
    /// `Some` when the tick ran an autosave.
    Ticked(Option<SaveOutcome>),
    /// Key press with no binding in the current mode.
    Ignored,
}

/// Single-writer editor over one document.
pub struct ScopeEditor<S, P, C> {
    model: DocumentModel,
    session: EditSession,
    scheduler: AutosaveScheduler,
    serializer: Serializer,
    theme: ThemePreference,
    notification_duration_ms: u64,
    store: S,
    presenter: P,
    clock: C,
}

impl<S, P, C> ScopeEditor<S, P, C>
where
    S: PersistenceStore,
    P: Presenter,
    C: Clock,
{
    /// Starts an editor over the built-in document.
    pub fn start(config: &EditorConfig, store: S, presenter: P, clock: C) -> Self {
        Self::start_with_document(DocumentModel::builtin(), config, store, presenter, clock)
    }

    /// Starts an editor whose page defaults are `defaults`.
    ///
    /// Loads the theme and the stored snapshot, restores it, then renders.
    pub fn start_with_document(
        defaults: DocumentModel,
        config: &EditorConfig,
        store: S,
        mut presenter: P,
        clock: C,
    ) -> Self {
        let theme = load_theme(&store);
        presenter.apply_theme(theme);

        let mut model = defaults;
        let mut serializer = Serializer::new();
        let snapshot = load_value(&store, PROJECT_DATA_KEY)
            .and_then(|raw| decode_snapshot(raw.as_str()));
        serializer.restore(snapshot.as_ref(), &mut model);

        presenter.render(&model);
        presenter.set_editable_attributes(false);
        presenter.show_add_remove_controls(false);

        info!(
            "event=editor_start module=editor status=ok theme={} restored={} objectives={} criteria={} constraints={}",
            theme,
            snapshot.is_some(),
            model.specific_objectives.len(),
            model.criteria.len(),
            model.constraints.len()
        );

        Self {
            model,
            session: EditSession::new(),
            scheduler: AutosaveScheduler::new(config.autosave_interval_ms),
            serializer,
            theme,
            notification_duration_ms: config.notification_duration_ms,
            store,
            presenter,
            clock,
        }
    }

    pub fn model(&self) -> &DocumentModel {
        &self.model
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_editing()
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    pub fn scheduler(&self) -> &AutosaveScheduler {
        &self.scheduler
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// Runs one command to completion.
    ///
    /// # Errors
    /// - Mode violations and unknown references from the edit session. The
    ///   document is unchanged when an error is returned.
    pub fn dispatch(&mut self, command: Command) -> SessionResult<CommandOutcome> {
        match command {
            Command::ToggleEditMode => Ok(self.toggle_edit_mode()),
            Command::Save => Ok(CommandOutcome::Saved(self.save(SaveTrigger::Manual))),
            Command::AddObjective => {
                let id = self.session.add_specific_objective(&mut self.model)?;
                self.presenter.render(&self.model);
                Ok(CommandOutcome::ObjectiveAdded { id })
            }
            Command::AddConstraint => {
                let index = self.session.add_constraint_row(&mut self.model)?;
                self.presenter.render(&self.model);
                Ok(CommandOutcome::ConstraintAdded { index })
            }
            Command::DeleteItem(item) => self.delete_item(item),
            Command::ToggleCriterion(id) => {
                let status = self
                    .session
                    .toggle_criterion_status(&mut self.model, id.as_str())?;
                self.presenter.render(&self.model);
                let save = self.save(SaveTrigger::CriterionToggle);
                Ok(CommandOutcome::CriterionToggled { id, status, save })
            }
            Command::EditText { field, text } => {
                self.session.update_text(&mut self.model, &field, text)?;
                Ok(CommandOutcome::TextUpdated)
            }
            Command::ToggleTheme => Ok(CommandOutcome::ThemeChanged(self.toggle_theme())),
            Command::KeyPress(chord) => Ok(self.key_press(chord)),
            Command::NavigateAway => Ok(CommandOutcome::Navigation(self.navigation_guard())),
            Command::Tick => Ok(CommandOutcome::Ticked(self.tick())),
        }
    }

    /// Runs the save pipeline regardless of edit mode.
    pub fn save(&mut self, trigger: SaveTrigger) -> SaveOutcome {
        let snapshot = self.serializer.snapshot(&self.model, self.clock.now_ms());
        let encoded = match encode_snapshot(&snapshot) {
            Ok(encoded) => encoded,
            Err(err) => {
                error!(
                    "event=save module=editor status=error trigger={} error_code=encode_failed error={}",
                    trigger.as_str(),
                    err
                );
                return self.save_failed(err.to_string());
            }
        };

        match self.store.save(PROJECT_DATA_KEY, encoded.as_str()) {
            Ok(()) => {
                info!(
                    "event=save module=editor status=ok trigger={} saved_at={} bytes={}",
                    trigger.as_str(),
                    snapshot.saved_at,
                    encoded.len()
                );
                self.presenter
                    .show_notification(SAVE_OK_MESSAGE, self.notification_duration_ms);
                SaveOutcome::Saved {
                    saved_at: snapshot.saved_at,
                }
            }
            Err(err) => {
                warn!(
                    "event=save module=editor status=error trigger={} error_code={} error={}",
                    trigger.as_str(),
                    err.code(),
                    err
                );
                self.save_failed(err.to_string())
            }
        }
    }

    fn save_failed(&mut self, reason: String) -> SaveOutcome {
        self.presenter.show_notification(
            &format!("{SAVE_FAILED_MESSAGE}: {reason}"),
            self.notification_duration_ms,
        );
        SaveOutcome::Failed { reason }
    }

    fn toggle_edit_mode(&mut self) -> CommandOutcome {
        let editing = self.session.toggle(&mut self.presenter);
        if editing {
            self.scheduler.activate(self.clock.now_ms());
        } else {
            self.scheduler.deactivate();
        }

        let message = if editing {
            EDIT_MODE_ON_MESSAGE
        } else {
            EDIT_MODE_OFF_MESSAGE
        };
        self.presenter
            .show_notification(message, self.notification_duration_ms);
        CommandOutcome::EditModeChanged { editing }
    }

    fn delete_item(&mut self, item: ItemRef) -> SessionResult<CommandOutcome> {
        let presenter = &mut self.presenter;
        let removal = self
            .session
            .remove_item(&mut self.model, &item, |message| presenter.confirm(message))?;

        match removal {
            Removal::Removed => {
                self.presenter.remove_item(&item);
                Ok(CommandOutcome::ItemRemoved(item))
            }
            Removal::Declined => Ok(CommandOutcome::RemovalDeclined),
        }
    }

    fn toggle_theme(&mut self) -> ThemePreference {
        self.theme = self.theme.toggled();
        self.presenter.apply_theme(self.theme);
        if let Err(err) = self.store.save(THEME_KEY, self.theme.as_str()) {
            warn!(
                "event=theme_save module=editor status=error error_code={} error={}",
                err.code(),
                err
            );
            self.presenter.show_notification(
                &format!("{THEME_SAVE_FAILED_MESSAGE}: {err}"),
                self.notification_duration_ms,
            );
        }
        self.theme
    }

    fn key_press(&mut self, chord: KeyChord) -> CommandOutcome {
        match chord.key {
            Key::Char('s') if chord.ctrl => {
                CommandOutcome::Saved(self.save(SaveTrigger::Shortcut))
            }
            Key::Escape if self.session.is_editing() => self.toggle_edit_mode(),
            _ => CommandOutcome::Ignored,
        }
    }

    fn navigation_guard(&self) -> NavigationDecision {
        let decision = self.scheduler.navigation_guard();
        if decision == NavigationDecision::Confirm {
            info!("event=navigation_guard module=editor status=confirm_required");
        }
        decision
    }

    fn tick(&mut self) -> Option<SaveOutcome> {
        if self.scheduler.poll(self.clock.now_ms()) {
            Some(self.save(SaveTrigger::Autosave))
        } else {
            None
        }
    }
}

fn load_value<S: PersistenceStore>(store: &S, key: &str) -> Option<String> {
    match store.load(key) {
        Ok(value) => value,
        Err(err) => {
            warn!(
                "event=store_load module=editor status=error key={} error_code={} error={}",
                key,
                err.code(),
                err
            );
            None
        }
    }
}

fn load_theme<S: PersistenceStore>(store: &S) -> ThemePreference {
    load_value(store, THEME_KEY)
        .and_then(|raw| ThemePreference::parse(raw.as_str()))
        .unwrap_or_default()
}
