use std::sync::mpsc::channel;

use eframe::egui;

use crate::config::{self, ReplayConfig};
use crate::renderer::gui::ViewerApp;

pub mod stream_loop;

pub fn run() -> eframe::Result<()> {
    // Missing or unreadable replay.toml just means defaults.
    if let Ok(cfg) = ReplayConfig::load_default() {
        *config::REPLAY_CONFIG.lock() = cfg;
    }

    let (cmd_tx, cmd_rx) = channel();
    let (evt_tx, evt_rx) = channel();

    std::thread::spawn(move || {
        stream_loop::run_stream_loop(cmd_rx, evt_tx);
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([
            config::WINDOW_WIDTH as f32,
            config::WINDOW_HEIGHT as f32,
        ]),
        ..Default::default()
    };
    eframe::run_native(
        "Particle Replay",
        native_options,
        Box::new(move |_cc| Ok(Box::new(ViewerApp::new(cmd_tx, evt_rx)))),
    )
}
