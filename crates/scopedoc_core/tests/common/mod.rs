use scopedoc_core::{DocumentModel, ItemRef, Presenter, ThemePreference};

/// Presenter double that records every callback.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    pub confirm_answer: bool,
    pub prompts: Vec<String>,
    pub notifications: Vec<String>,
    pub editable: Vec<bool>,
    pub controls_visible: Vec<bool>,
    pub removed: Vec<ItemRef>,
    pub themes: Vec<ThemePreference>,
    pub renders: usize,
}

impl RecordingPresenter {
    pub fn confirming(answer: bool) -> Self {
        Self {
            confirm_answer: answer,
            ..Self::default()
        }
    }

    pub fn last_notification(&self) -> Option<&str> {
        self.notifications.last().map(String::as_str)
    }
}

impl Presenter for RecordingPresenter {
    fn render(&mut self, _model: &DocumentModel) {
        self.renders += 1;
    }

    fn set_editable_attributes(&mut self, editing: bool) {
        self.editable.push(editing);
    }

    fn show_add_remove_controls(&mut self, visible: bool) {
        self.controls_visible.push(visible);
    }

    fn show_notification(&mut self, message: &str, _duration_ms: u64) {
        self.notifications.push(message.to_string());
    }

    fn remove_item(&mut self, item: &ItemRef) {
        self.removed.push(item.clone());
    }

    fn apply_theme(&mut self, theme: ThemePreference) {
        self.themes.push(theme);
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.prompts.push(message.to_string());
        self.confirm_answer
    }
}
