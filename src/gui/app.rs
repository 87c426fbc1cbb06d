mod logic;
mod rendering;
mod types;

pub use logic::looks_non_english;
pub use types::KokoroApp;

use eframe::egui;

impl eframe::App for KokoroApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Worker replies first so the layout reflects them this frame
        self.pump_worker(ctx);

        // --- UI LAYOUT ---
        self.render_main_layout(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.controller.stop();
        self.persist_voice();
    }
}
