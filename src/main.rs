#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use kokoro_desk::audio::AudioPlayback;
use kokoro_desk::config::{get_config_path, load_config};
use kokoro_desk::controller::AppController;
use kokoro_desk::engine::KokoroProvider;
use kokoro_desk::gui::KokoroApp;

const WINDOW_WIDTH: f32 = 560.0;
const WINDOW_HEIGHT: f32 = 380.0;

fn main() -> eframe::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --- CONFIG ---
    let config = load_config();
    log::info!("Using config at {}", get_config_path().display());

    // --- WORKER ---
    // Model loading starts right away; the window shows progress.
    let mut controller = AppController::new(
        Box::new(AudioPlayback),
        config.initial_text.clone(),
        config.voice.clone(),
    );
    let provider = KokoroProvider::from_config(&config);
    if let Err(e) = controller.start(Box::new(provider), &config.model_id, config.precision) {
        log::error!("Failed to start TTS worker: {:#}", e);
    }

    // --- WINDOW SETUP ---
    let viewport = eframe::egui::ViewportBuilder::default()
        .with_inner_size([WINDOW_WIDTH, WINDOW_HEIGHT])
        .with_min_inner_size([360.0, 260.0])
        .with_resizable(true);

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Kokoro Desk",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(eframe::egui::Visuals::dark());
            Ok(Box::new(KokoroApp::new(controller, config)))
        }),
    )
}
