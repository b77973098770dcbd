//! Terminal presenter: notifications and prompts go to stderr.

use scopedoc_core::{DocumentModel, ItemRef, Presenter, ThemePreference};

pub struct ConsolePresenter {
    /// Answer given to every delete confirmation.
    pub assume_yes: bool,
}

impl Presenter for ConsolePresenter {
    fn render(&mut self, model: &DocumentModel) {
        eprintln!(
            "[render] {} | {} objectives, {} criteria, {} constraints",
            model.title,
            model.specific_objectives.len(),
            model.criteria.len(),
            model.constraints.len()
        );
        for criterion in &model.criteria {
            eprintln!("  [{}] {}", criterion.status.label(), criterion.id);
        }
    }

    fn set_editable_attributes(&mut self, editing: bool) {
        eprintln!("[editable] {editing}");
    }

    fn show_add_remove_controls(&mut self, _visible: bool) {}

    fn show_notification(&mut self, message: &str, _duration_ms: u64) {
        eprintln!("[notice] {message}");
    }

    fn remove_item(&mut self, item: &ItemRef) {
        eprintln!("[removed] {item}");
    }

    fn apply_theme(&mut self, theme: ThemePreference) {
        eprintln!("[theme] {theme}");
    }

    fn confirm(&mut self, message: &str) -> bool {
        eprintln!(
            "[confirm] {message} -> {}",
            if self.assume_yes { "yes" } else { "no" }
        );
        self.assume_yes
    }
}
