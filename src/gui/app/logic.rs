use super::types::KokoroApp;
use crate::config::save_config;
use crate::controller::SubmitError;
use eframe::egui;
use std::time::Duration;

const BUSY_REPAINT: Duration = Duration::from_millis(50);

/// True only when whatlang is confident the text is not English.
pub fn looks_non_english(text: &str) -> bool {
    match whatlang::detect(text) {
        Some(info) => info.is_reliable() && info.lang() != whatlang::Lang::Eng,
        None => false,
    }
}

impl KokoroApp {
    /// Dispatch worker replies; keep repainting while a request is in flight.
    pub(crate) fn pump_worker(&mut self, ctx: &egui::Context) {
        if self.controller.poll() > 0 {
            ctx.request_repaint();
        }
        if self.controller.is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }

    pub(crate) fn generate(&mut self) {
        match self.controller.submit_current() {
            Ok(()) => {}
            Err(SubmitError::EmptyText) => log::debug!("Ignoring empty text"),
            Err(e) => log::warn!("Generate ignored: {}", e),
        }
    }

    /// Whatlang result for the current text, recomputed only when the text changes.
    pub(crate) fn text_looks_non_english(&mut self) -> bool {
        let text = &self.controller.state().text;
        if *text != self.hint_text {
            self.hint_non_english = looks_non_english(text);
            self.hint_text = text.clone();
        }
        self.hint_non_english
    }

    pub(crate) fn retry_loading(&mut self) {
        if let Err(e) = self
            .controller
            .reload(&self.config.model_id, self.precision_choice)
        {
            log::warn!("Reload ignored: {}", e);
            return;
        }
        self.config.precision = self.precision_choice;
        save_config(&self.config);
    }

    pub(crate) fn persist_voice(&mut self) {
        let voice = &self.controller.state().voice;
        if *voice == self.saved_voice {
            return;
        }
        self.config.voice = voice.clone();
        self.saved_voice = voice.clone();
        save_config(&self.config);
    }
}
