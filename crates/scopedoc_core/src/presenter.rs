//! Presentation-layer contract consumed by the editor.
//!
//! The core never renders anything itself. Hosts (a web view, a terminal,
//! a test double) implement `Presenter` and receive state changes through it.

use crate::model::document::{DocumentModel, ItemRef};
use crate::model::theme::ThemePreference;

/// Display callbacks driven by the editor.
pub trait Presenter {
    /// Renders the full document.
    fn render(&mut self, model: &DocumentModel);
    /// Makes editable fields writable (`true`) or read-only (`false`).
    fn set_editable_attributes(&mut self, editing: bool);
    /// Shows or hides add buttons and per-item delete controls.
    fn show_add_remove_controls(&mut self, visible: bool);
    /// Shows a transient message.
    fn show_notification(&mut self, message: &str, duration_ms: u64);
    /// Removes one item from the rendered output.
    fn remove_item(&mut self, item: &ItemRef);
    /// Applies the color theme.
    fn apply_theme(&mut self, theme: ThemePreference);
    /// Blocking yes/no prompt. Returns `true` when the user confirms.
    fn confirm(&mut self, message: &str) -> bool;
}

/// Presenter that discards all output and answers prompts with a fixed value.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub(crate) struct HeadlessPresenter {
    pub confirm_answer: bool,
}

#[cfg(test)]
impl Presenter for HeadlessPresenter {
    fn render(&mut self, _model: &DocumentModel) {}

    fn set_editable_attributes(&mut self, _editing: bool) {}

    fn show_add_remove_controls(&mut self, _visible: bool) {}

    fn show_notification(&mut self, _message: &str, _duration_ms: u64) {}

    fn remove_item(&mut self, _item: &ItemRef) {}

    fn apply_theme(&mut self, _theme: ThemePreference) {}

    fn confirm(&mut self, _message: &str) -> bool {
        self.confirm_answer
    }
}
