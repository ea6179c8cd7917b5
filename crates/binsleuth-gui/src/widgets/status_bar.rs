/// Bottom status bar: phase, last milestone and scan statistics.
use crate::state::{AppPhase, AppState};
use crate::theme;
use binsleuth_core::model::size::format_count;
use egui::Ui;

/// Draw the status bar at the bottom of the window.
pub fn status_bar(ui: &mut Ui, state: &AppState) {
    let color_accent = ui.visuals().hyperlink_color;
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();

    ui.horizontal(|ui| {
        match state.phase {
            AppPhase::Idle => match &state.scan_failure {
                Some(reason) => {
                    ui.label(
                        egui::RichText::new(format!("⚠ {reason}"))
                            .size(12.0)
                            .color(theme::WARNING),
                    );
                }
                None => {
                    ui.label(egui::RichText::new("Ready").size(12.0).color(color_weak));
                }
            },
            AppPhase::Building => {
                ui.spinner();
                let root = state
                    .root_path
                    .as_ref()
                    .map(|p| truncate_path(&p.to_string_lossy(), 60))
                    .unwrap_or_default();
                ui.label(
                    egui::RichText::new(format!("Listing {root}..."))
                        .size(12.0)
                        .color(color_normal),
                );
            }
            AppPhase::Classifying => {
                ui.spinner();
                let text = match state.last_milestone {
                    Some(m) => m.to_string(),
                    None => format!("Classifying {} files", format_count(state.total_files)),
                };
                ui.label(egui::RichText::new(text).size(12.0).color(color_normal));
            }
            AppPhase::Results => {
                let (status_text, status_color) = if state.scan_was_cancelled {
                    ("\u{23f9} Analysis stopped (partial ratios)", theme::WARNING)
                } else {
                    ("\u{2713} Analysis complete", theme::SUCCESS)
                };
                ui.label(egui::RichText::new(status_text).size(12.0).color(status_color));

                ui.separator();
                ui.label(
                    egui::RichText::new(format!("{} files", format_count(state.total_files)))
                        .size(12.0)
                        .color(color_normal),
                );

                if let Some(duration) = state.scan_duration {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("{:.1}s", duration.as_secs_f64()))
                            .size(12.0)
                            .color(color_weak),
                    );
                }

                if let Some(finished) = state.scan_finished_at {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("finished {}", finished.format("%H:%M:%S")))
                            .size(12.0)
                            .color(color_accent),
                    );
                }
            }
        }

        if state.listing_error_count > 0 && state.phase != AppPhase::Idle {
            ui.separator();
            ui.label(
                egui::RichText::new(format!(
                    "{} unreadable",
                    format_count(state.listing_error_count)
                ))
                .size(12.0)
                .color(theme::WARNING),
            );
        }
    });
}

/// Truncate a path string to fit within `max_len` characters,
/// replacing the middle with "..." if needed.
fn truncate_path(path: &str, max_len: usize) -> String {
    let chars: Vec<char> = path.chars().collect();
    if chars.len() <= max_len {
        return path.to_string();
    }
    let half = (max_len.saturating_sub(3)) / 2;
    let head: String = chars[..half].iter().collect();
    let tail: String = chars[chars.len() - half..].iter().collect();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::truncate_path;

    #[test]
    fn test_short_path_unchanged() {
        assert_eq!(truncate_path("/tmp/x", 60), "/tmp/x");
    }

    #[test]
    fn test_long_path_keeps_both_ends() {
        let long = format!("/start/{}/end", "é".repeat(100));
        let short = truncate_path(&long, 21);
        assert!(short.starts_with("/start/"));
        assert!(short.ends_with("/end"));
        assert!(short.contains("..."));
        assert_eq!(short.chars().count(), 21);
    }
}
