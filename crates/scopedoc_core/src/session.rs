//! Edit session: edit-mode flag and gated document mutations.
//!
//! # Responsibility
//! - Own the single `is_editing` flag and its transitions.
//! - Apply structural mutations only while editing, status toggles only
//!   while not editing.
//! - Allocate specific-objective identifiers.
//!
//! # Invariants
//! - `is_editing` starts `false` and changes only through `enter_edit`,
//!   `exit_edit` or `toggle`.
//! - Allocated objective ids are never reused within one session, even after
//!   deletions (`oe<N>` with `N` above every id seen so far).
//! - Mode violations are returned as errors, never ignored silently.

use crate::model::document::{
    format_objective_id, ConstraintRow, CriterionStatus, DocumentModel, ItemRef,
    SpecificObjective, TextField, NEW_OBJECTIVE_PLACEHOLDER,
};
use crate::presenter::Presenter;
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Prompt shown before deleting an objective or constraint row.
pub const DELETE_CONFIRM_MESSAGE: &str = "¿Estás seguro de eliminar este elemento?";

pub type SessionResult<T> = Result<T, SessionError>;

/// Rejected edit-session operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Operation requires edit mode.
    NotEditing(&'static str),
    /// Operation is only allowed outside edit mode.
    EditingActive(&'static str),
    /// Referenced criterion does not exist.
    CriterionNotFound(String),
    /// Referenced objective or constraint row does not exist.
    ItemNotFound(ItemRef),
    /// Referenced text field does not exist.
    FieldNotFound(TextField),
    /// Every `oe<N>` suffix up to `u32::MAX` has been handed out.
    ObjectiveIdsExhausted,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotEditing(operation) => {
                write!(f, "`{operation}` requires edit mode to be active")
            }
            Self::EditingActive(operation) => {
                write!(f, "`{operation}` is not allowed while edit mode is active")
            }
            Self::CriterionNotFound(id) => write!(f, "criterion not found: {id}"),
            Self::ItemNotFound(item) => write!(f, "item not found: {item}"),
            Self::FieldNotFound(field) => write!(f, "field not found: {field}"),
            Self::ObjectiveIdsExhausted => {
                write!(f, "no specific objective identifiers left to allocate")
            }
        }
    }
}

impl Error for SessionError {}

/// Result of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    Removed,
    /// User declined the confirmation prompt; nothing changed.
    Declined,
}

/// Edit-mode state holder.
#[derive(Debug, Default)]
pub struct EditSession {
    is_editing: bool,
    objective_high_water: u32,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_editing(&self) -> bool {
        self.is_editing
    }

    /// Enters edit mode. Returns `false` when already editing.
    pub fn enter_edit(&mut self, presenter: &mut dyn Presenter) -> bool {
        if self.is_editing {
            return false;
        }
        self.set_editing(true, presenter);
        true
    }

    /// Leaves edit mode. Returns `false` when not editing.
    pub fn exit_edit(&mut self, presenter: &mut dyn Presenter) -> bool {
        if !self.is_editing {
            return false;
        }
        self.set_editing(false, presenter);
        true
    }

    /// Flips edit mode and returns the new value.
    pub fn toggle(&mut self, presenter: &mut dyn Presenter) -> bool {
        let next = !self.is_editing;
        self.set_editing(next, presenter);
        next
    }

    fn set_editing(&mut self, editing: bool, presenter: &mut dyn Presenter) {
        self.is_editing = editing;
        presenter.set_editable_attributes(editing);
        presenter.show_add_remove_controls(editing);
        info!(
            "event=edit_mode module=session status=ok editing={}",
            editing
        );
    }

    /// Appends a placeholder specific objective and returns its id.
    ///
    /// # Errors
    /// - `NotEditing` outside edit mode.
    /// - `ObjectiveIdsExhausted` when the highest suffix is already `u32::MAX`;
    ///   the model is left untouched.
    pub fn add_specific_objective(&mut self, model: &mut DocumentModel) -> SessionResult<String> {
        self.require_editing("add_specific_objective")?;

        let sequence = self
            .objective_high_water
            .max(model.max_objective_sequence())
            .checked_add(1)
            .ok_or(SessionError::ObjectiveIdsExhausted)?;
        self.objective_high_water = sequence;

        let id = format_objective_id(sequence);
        model.specific_objectives.push(SpecificObjective::new(
            id.clone(),
            NEW_OBJECTIVE_PLACEHOLDER,
            0,
        ));
        debug!(
            "event=objective_add module=session status=ok id={} count={}",
            id,
            model.specific_objectives.len()
        );
        Ok(id)
    }

    /// Appends an empty constraint row and returns its position.
    ///
    /// # Errors
    /// - `NotEditing` outside edit mode.
    pub fn add_constraint_row(&mut self, model: &mut DocumentModel) -> SessionResult<usize> {
        self.require_editing("add_constraint_row")?;
        model.constraints.push(ConstraintRow::default());
        Ok(model.constraints.len() - 1)
    }

    /// Removes an objective or constraint row after user confirmation.
    ///
    /// `confirm` is only invoked once the item is known to exist.
    ///
    /// # Errors
    /// - `NotEditing` outside edit mode (delete controls are hidden then).
    /// - `ItemNotFound` when `item` does not resolve.
    pub fn remove_item(
        &mut self,
        model: &mut DocumentModel,
        item: &ItemRef,
        confirm: impl FnOnce(&str) -> bool,
    ) -> SessionResult<Removal> {
        self.require_editing("remove_item")?;
        if !model.contains_item(item) {
            return Err(SessionError::ItemNotFound(item.clone()));
        }

        if !confirm(DELETE_CONFIRM_MESSAGE) {
            debug!("event=item_remove module=session status=declined item={item}");
            return Ok(Removal::Declined);
        }

        if let ItemRef::Objective(id) = item {
            if let Some(sequence) = model.objective(id).and_then(SpecificObjective::sequence) {
                self.objective_high_water = self.objective_high_water.max(sequence);
            }
        }

        model.remove_item(item);
        debug!("event=item_remove module=session status=ok item={item}");
        Ok(Removal::Removed)
    }

    /// Flips a criterion between pending and completed.
    ///
    /// # Errors
    /// - `EditingActive` while editing.
    /// - `CriterionNotFound` for unknown ids.
    pub fn toggle_criterion_status(
        &mut self,
        model: &mut DocumentModel,
        criterion_id: &str,
    ) -> SessionResult<CriterionStatus> {
        if self.is_editing {
            return Err(SessionError::EditingActive("toggle_criterion_status"));
        }

        let criterion = model
            .criterion_mut(criterion_id)
            .ok_or_else(|| SessionError::CriterionNotFound(criterion_id.to_string()))?;
        criterion.status = criterion.status.toggled();
        Ok(criterion.status)
    }

    /// Writes edited text back into the model.
    ///
    /// # Errors
    /// - `NotEditing` outside edit mode.
    /// - `FieldNotFound` when `field` does not resolve.
    pub fn update_text(
        &mut self,
        model: &mut DocumentModel,
        field: &TextField,
        text: impl Into<String>,
    ) -> SessionResult<()> {
        self.require_editing("update_text")?;
        if model.set_text(field, text) {
            Ok(())
        } else {
            Err(SessionError::FieldNotFound(field.clone()))
        }
    }

    fn require_editing(&self, operation: &'static str) -> SessionResult<()> {
        if self.is_editing {
            Ok(())
        } else {
            Err(SessionError::NotEditing(operation))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EditSession, Removal, SessionError, DELETE_CONFIRM_MESSAGE};
    use crate::model::document::{
        format_objective_id, CriterionStatus, DocumentModel, ItemRef, SpecificObjective,
        TextField, NEW_OBJECTIVE_PLACEHOLDER,
    };
    use crate::presenter::HeadlessPresenter;

    fn editing_session() -> EditSession {
        let mut session = EditSession::new();
        session.enter_edit(&mut HeadlessPresenter {
            confirm_answer: true,
        });
        session
    }

    #[test]
    fn session_starts_read_only() {
        assert!(!EditSession::new().is_editing());
    }

    #[test]
    fn toggle_twice_restores_flag() {
        let mut presenter = HeadlessPresenter {
            confirm_answer: true,
        };
        let mut session = EditSession::new();
        assert!(session.toggle(&mut presenter));
        assert!(!session.toggle(&mut presenter));
        assert!(!session.is_editing());
    }

    #[test]
    fn enter_and_exit_are_idempotent() {
        let mut presenter = HeadlessPresenter {
            confirm_answer: true,
        };
        let mut session = EditSession::new();
        assert!(!session.exit_edit(&mut presenter));
        assert!(session.enter_edit(&mut presenter));
        assert!(!session.enter_edit(&mut presenter));
        assert!(session.exit_edit(&mut presenter));
    }

    #[test]
    fn adding_objectives_from_empty_yields_sequential_ids() {
        let mut model = DocumentModel::empty();
        let mut session = editing_session();

        assert_eq!(session.add_specific_objective(&mut model).unwrap(), "oe1");
        assert_eq!(session.add_specific_objective(&mut model).unwrap(), "oe2");
        assert_eq!(model.specific_objectives.len(), 2);
        assert!(model
            .specific_objectives
            .iter()
            .all(|item| item.content == NEW_OBJECTIVE_PLACEHOLDER && item.progress == 0));
    }

    #[test]
    fn ids_are_not_reused_after_deletion() {
        let mut model = DocumentModel::empty();
        let mut session = editing_session();
        session.add_specific_objective(&mut model).unwrap();
        session.add_specific_objective(&mut model).unwrap();

        session
            .remove_item(&mut model, &ItemRef::Objective("oe2".to_string()), |_| true)
            .unwrap();
        assert_eq!(session.add_specific_objective(&mut model).unwrap(), "oe3");
        model.validate().unwrap();
    }

    #[test]
    fn ids_continue_after_builtin_objectives() {
        let mut model = DocumentModel::builtin();
        let mut session = editing_session();
        assert_eq!(session.add_specific_objective(&mut model).unwrap(), "oe5");
    }

    #[test]
    fn allocation_stops_at_largest_suffix() {
        let mut model = DocumentModel::empty();
        model.specific_objectives.push(SpecificObjective::new(
            format_objective_id(u32::MAX - 1),
            "penúltimo",
            0,
        ));
        let mut session = editing_session();

        assert_eq!(
            session.add_specific_objective(&mut model).unwrap(),
            "oe4294967295"
        );
        let before = model.clone();
        assert_eq!(
            session.add_specific_objective(&mut model),
            Err(SessionError::ObjectiveIdsExhausted)
        );
        assert_eq!(model, before);
    }

    #[test]
    fn structural_mutations_require_edit_mode() {
        let mut model = DocumentModel::builtin();
        let mut session = EditSession::new();

        assert_eq!(
            session.add_specific_objective(&mut model),
            Err(SessionError::NotEditing("add_specific_objective"))
        );
        assert!(session.add_constraint_row(&mut model).is_err());
        assert!(session
            .update_text(&mut model, &TextField::Title, "x")
            .is_err());
        assert_eq!(model, DocumentModel::builtin());
    }

    #[test]
    fn add_constraint_row_appends_empty_row() {
        let mut model = DocumentModel::empty();
        let mut session = editing_session();

        assert_eq!(session.add_constraint_row(&mut model).unwrap(), 0);
        assert_eq!(model.constraints[0].parameter, "");
        assert_eq!(model.constraints[0].value, "");
    }

    #[test]
    fn declined_removal_keeps_model() {
        let mut model = DocumentModel::builtin();
        let mut session = editing_session();
        let mut asked = None;

        let removal = session
            .remove_item(&mut model, &ItemRef::ConstraintRow(0), |message| {
                asked = Some(message.to_string());
                false
            })
            .unwrap();

        assert_eq!(removal, Removal::Declined);
        assert_eq!(asked.as_deref(), Some(DELETE_CONFIRM_MESSAGE));
        assert_eq!(model.constraints.len(), 4);
    }

    #[test]
    fn removal_of_unknown_item_fails_without_prompt() {
        let mut model = DocumentModel::builtin();
        let mut session = editing_session();

        let err = session
            .remove_item(&mut model, &ItemRef::Objective("oe99".to_string()), |_| {
                panic!("prompt must not be shown")
            })
            .unwrap_err();
        assert!(matches!(err, SessionError::ItemNotFound(_)));
    }

    #[test]
    fn criterion_toggle_only_outside_edit_mode() {
        let mut model = DocumentModel::builtin();
        let mut session = EditSession::new();

        assert_eq!(
            session.toggle_criterion_status(&mut model, "c1").unwrap(),
            CriterionStatus::Completed
        );
        assert_eq!(
            session.toggle_criterion_status(&mut model, "c1").unwrap(),
            CriterionStatus::Pending
        );
        assert_eq!(
            session.toggle_criterion_status(&mut model, "zz"),
            Err(SessionError::CriterionNotFound("zz".to_string()))
        );

        let mut session = editing_session();
        assert_eq!(
            session.toggle_criterion_status(&mut model, "c1"),
            Err(SessionError::EditingActive("toggle_criterion_status"))
        );
    }

    #[test]
    fn update_text_reports_unknown_field() {
        let mut model = DocumentModel::builtin();
        let mut session = editing_session();

        session
            .update_text(&mut model, &TextField::Objective, "Nuevo objetivo general")
            .unwrap();
        assert_eq!(model.objective, "Nuevo objetivo general");
        assert_eq!(
            session.update_text(&mut model, &TextField::OutScope(10), "x"),
            Err(SessionError::FieldNotFound(TextField::OutScope(10)))
        );
    }
}
