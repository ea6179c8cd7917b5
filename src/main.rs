//! BinSleuth: how much of a directory tree is binary?
//!
//! Thin binary entry point. All logic lives in the `binsleuth-core`
//! and `binsleuth-gui` crates.
//!
//! Usage: `BinSleuth [DIRECTORY]`. The directory, if given, is scanned
//! on start-up.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;

fn main() -> anyhow::Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("BinSleuth starting");

    let root = std::env::args_os().nth(1).map(PathBuf::from);
    let icon = binsleuth_gui::icon::generate_icon(64);

    // Build state before the window opens so a start-up scan is already
    // running by the first frame.
    let state = binsleuth_gui::BinSleuthState::build(root);

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("BinSleuth -- Binary/Text Analyser")
            .with_inner_size([1200.0, 760.0])
            .with_min_inner_size([720.0, 440.0])
            .with_icon(icon),
        ..Default::default()
    };

    eframe::run_native(
        "BinSleuth",
        options,
        Box::new(|cc| Ok(Box::new(binsleuth_gui::BinSleuthApp::with_state(cc, state)))),
    )
    .map_err(|e| anyhow::anyhow!("eframe error: {e}"))?;

    Ok(())
}
