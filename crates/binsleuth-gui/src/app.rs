/// Main `eframe::App` implementation for BinSleuth.
///
/// This is the top-level UI layout that composes all panels and widgets.
use crate::panels;
use crate::state::AppState;
use crate::theme;
use crate::widgets;
use std::path::PathBuf;

/// Body of the About window.
const ABOUT_TEXT: &str = "Shows how much of a directory tree is binary.\n\
                          Each file's first kilobyte decides: a byte\n\
                          outside the text set means binary.";

/// Pre-built application state.
///
/// Construct this **before** calling `eframe::run_native` so that the
/// scan of a root given on the command line is already running when the
/// first frame is drawn.
pub struct BinSleuthState {
    pub(crate) inner: AppState,
}

impl BinSleuthState {
    /// Prepare the state, starting a scan of `root` if one is given.
    ///
    /// An invalid root is left in the path field, marked invalid, and not
    /// scanned.
    pub fn build(root: Option<PathBuf>) -> Self {
        let mut state = AppState::new();

        if let Some(root) = root {
            state.path_input = root.to_string_lossy().into_owned();
            if state.submit_path_input() {
                tracing::info!("Scanning {} on start-up", root.display());
            } else {
                tracing::warn!("Start-up path {} is not a directory", root.display());
            }
        }

        Self { inner: state }
    }

    /// Access the prepared state.
    pub fn state(&self) -> &AppState {
        &self.inner
    }
}

/// The BinSleuth application.
pub struct BinSleuthApp {
    state: AppState,
}

impl BinSleuthApp {
    /// Create a new application instance from pre-built state.
    pub fn with_state(cc: &eframe::CreationContext<'_>, state: BinSleuthState) -> Self {
        cc.egui_ctx.set_visuals(theme::visuals(state.inner.dark_mode));
        Self { state: state.inner }
    }
}

impl eframe::App for BinSleuthApp {
    /// Override the GPU clear colour to match the active theme background,
    /// preventing a colour mismatch flash between frames.
    fn clear_color(&self, visuals: &egui::Visuals) -> [f32; 4] {
        let [r, g, b, a] = visuals.panel_fill.to_array();
        [
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        ]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ── Apply theme ───────────────────────────────────────────────────
        ctx.set_visuals(theme::visuals(self.state.dark_mode));

        // ── Process background messages ───────────────────────────────────
        self.state.process_scan_messages();

        if self.state.phase.is_scanning() {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }

        // ── Top toolbar ───────────────────────────────────────────────────
        egui::TopBottomPanel::top("toolbar")
            .min_height(36.0)
            .show(ctx, |ui| {
                ui.add_space(4.0);
                widgets::toolbar::toolbar(ui, &mut self.state);
                ui.add_space(4.0);
            });

        // ── About dialog ──────────────────────────────────────────────────
        let mut show_about = self.state.show_about;
        egui::Window::new("About BinSleuth")
            .open(&mut show_about)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .fixed_size([340.0, 0.0])
            .show(ctx, |ui| {
                let accent = ui.visuals().hyperlink_color;
                let muted = ui.visuals().weak_text_color();
                let normal = ui.visuals().text_color();

                ui.vertical_centered(|ui| {
                    ui.add_space(8.0);
                    ui.label(
                        egui::RichText::new("🔍 BinSleuth")
                            .size(24.0)
                            .strong()
                            .color(accent),
                    );
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new(format!("v{}", env!("CARGO_PKG_VERSION")))
                            .size(13.0)
                            .color(muted),
                    );
                    ui.add_space(12.0);
                    ui.label(egui::RichText::new(ABOUT_TEXT).size(12.0).color(normal));
                    ui.add_space(12.0);
                    ui.separator();
                    ui.add_space(8.0);
                    ui.hyperlink_to(
                        "github.com/Swatto86/BinSleuth",
                        "https://github.com/Swatto86/BinSleuth",
                    );
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new("Built with Rust & egui")
                            .size(11.0)
                            .color(muted),
                    );
                    ui.add_space(8.0);
                });
            });
        self.state.show_about = show_about;

        // ── Bottom status bar ─────────────────────────────────────────────
        egui::TopBottomPanel::bottom("status_bar")
            .min_height(24.0)
            .show(ctx, |ui| {
                ui.add_space(2.0);
                widgets::status_bar::status_bar(ui, &self.state);
                ui.add_space(2.0);
            });

        // ── Progress log (optional bottom panel) ──────────────────────────
        if self.state.show_log {
            egui::TopBottomPanel::bottom("log_panel")
                .resizable(true)
                .default_height(140.0)
                .min_height(80.0)
                .max_height(400.0)
                .show(ctx, |ui| {
                    ui.add_space(4.0);
                    panels::log_panel::log_panel(ui, &self.state);
                });
        }

        // ── Right details panel ───────────────────────────────────────────
        egui::SidePanel::right("details_panel")
            .default_width(280.0)
            .min_width(200.0)
            .max_width(420.0)
            .resizable(true)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    panels::details_panel::details_panel(ui, &self.state);
                });
            });

        // ── Central panel (tree) ──────────────────────────────────────────
        egui::CentralPanel::default().show(ctx, |ui| {
            panels::tree_panel::tree_panel(ui, &mut self.state);
        });
    }
}
