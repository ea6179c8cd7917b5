/// Progress log: milestones of the current pass and unreadable directories.
use crate::state::{AppState, MAX_LISTING_ERRORS};
use crate::theme;
use egui::Ui;

/// Draw the log panel (bottom of the window).
pub fn log_panel(ui: &mut Ui, state: &AppState) {
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Progress").strong());
        if let Some(root) = &state.root_path {
            ui.label(
                egui::RichText::new(root.to_string_lossy())
                    .size(11.0)
                    .color(color_weak),
            );
        }
    });
    ui.separator();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            if state.milestones.is_empty() && state.listing_errors.is_empty() {
                ui.label(egui::RichText::new("Nothing yet").color(color_weak).italics());
                return;
            }

            for milestone in &state.milestones {
                ui.label(
                    egui::RichText::new(milestone.to_string())
                        .size(12.0)
                        .color(color_normal),
                );
            }

            for (path, message) in &state.listing_errors {
                ui.label(
                    egui::RichText::new(format!("⚠ {}: {message}", path.display()))
                        .size(12.0)
                        .color(theme::WARNING),
                );
            }

            let hidden = state
                .listing_error_count
                .saturating_sub(state.listing_errors.len() as u64);
            if hidden > 0 {
                ui.label(
                    egui::RichText::new(format!(
                        "... and {hidden} more (only the first {MAX_LISTING_ERRORS} are kept)"
                    ))
                    .size(11.0)
                    .color(color_weak),
                );
            }
        });
}
