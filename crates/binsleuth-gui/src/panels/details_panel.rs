/// Details panel: the selected entry's path, ratio bar and aggregate numbers.
use crate::state::AppState;
use crate::theme;
use crate::widgets::ratio_bar::ratio_bar;
use binsleuth_core::model::size::{format_count, format_size};
use binsleuth_core::model::{Classification, NodeIndex};
use egui::Ui;

/// What the panel needs from the tree, copied out under the read lock.
struct Selected {
    name: String,
    path: String,
    is_dir: bool,
    listing_failed: bool,
    classification: Classification,
    size: Option<u64>,
}

/// Draw the details panel for the currently selected node.
pub fn details_panel(ui: &mut Ui, state: &AppState) {
    let color_muted = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();
    let color_accent = ui.visuals().hyperlink_color;

    let Some(index) = state.selected_node else {
        ui.label(
            egui::RichText::new("Select an entry to see details")
                .color(color_muted)
                .italics(),
        );
        return;
    };

    // Stale indices from a previous tree resolve to `None`.
    let selected = state
        .with_tree(|tree| {
            (index.idx() < tree.len()).then(|| {
                let node = tree.node(index);
                Selected {
                    name: node.name.to_string(),
                    path: tree.full_path(index).to_string_lossy().into_owned(),
                    is_dir: node.is_dir(),
                    listing_failed: node.listing_failed(),
                    classification: node.classification(),
                    size: node.size(),
                }
            })
        })
        .flatten();
    let Some(selected) = selected else {
        return;
    };

    ui.heading(egui::RichText::new(if selected.is_dir { "📁" } else { "📄" }).size(16.0));
    ui.add_space(2.0);

    if selected.listing_failed {
        ui.label(
            egui::RichText::new("Contents could not be listed")
                .size(11.0)
                .color(theme::WARNING)
                .italics(),
        );
        ui.add_space(2.0);
    }

    ui.label(
        egui::RichText::new(&selected.name)
            .size(14.0)
            .strong()
            .color(color_normal),
    );
    ui.add_space(4.0);
    ui.label(egui::RichText::new(&selected.path).size(11.0).color(color_muted));

    ui.add_space(8.0);
    ui.separator();
    ui.add_space(4.0);

    if selected.is_dir {
        directory_details(ui, state, index, color_muted, color_normal, color_accent);
    } else {
        egui::Grid::new("details_grid")
            .num_columns(2)
            .spacing([8.0, 4.0])
            .show(ui, |ui| {
                ui.label(egui::RichText::new("Type:").color(color_muted));
                let type_color = if selected.classification.is_binary() {
                    theme::BINARY_MARKER
                } else {
                    color_normal
                };
                ui.label(
                    egui::RichText::new(selected.classification.label())
                        .color(type_color)
                        .strong(),
                );
                ui.end_row();

                ui.label(egui::RichText::new("Size:").color(color_muted));
                let size = selected.size.map(format_size).unwrap_or_else(|| "?".into());
                ui.label(egui::RichText::new(size).color(color_accent));
                ui.end_row();
            });
    }

    ui.add_space(8.0);
    if ui.button("📋 Copy Path").clicked() {
        ui.ctx().copy_text(selected.path);
    }
}

fn directory_details(
    ui: &mut Ui,
    state: &AppState,
    index: NodeIndex,
    color_muted: egui::Color32,
    color_normal: egui::Color32,
    color_accent: egui::Color32,
) {
    let bar_layout = state.layout_for(index);
    let width = ui.available_width().min(260.0);
    ratio_bar(ui, &bar_layout, width, 14.0);
    ui.add_space(6.0);

    let Some(stats) = state.stats_for(index) else {
        ui.label(egui::RichText::new("Not analysed").color(color_muted).italics());
        return;
    };

    egui::Grid::new("details_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label(egui::RichText::new("Files:").color(color_muted));
            ui.label(egui::RichText::new(format_count(stats.total_files)).color(color_normal));
            ui.end_row();

            ui.label(egui::RichText::new("Analysed:").color(color_muted));
            ui.label(
                egui::RichText::new(format!(
                    "{} ({:.0}%)",
                    format_count(stats.assessed()),
                    bar_layout.assessed_fraction * 100.0
                ))
                .color(color_normal),
            );
            ui.end_row();

            ui.label(egui::RichText::new("Binary:").color(color_muted));
            ui.label(
                egui::RichText::new(format!(
                    "{} ({:.0}%)",
                    format_count(stats.binary_count),
                    bar_layout.binary_fraction * 100.0
                ))
                .color(theme::BINARY_MARKER)
                .strong(),
            );
            ui.end_row();

            ui.label(egui::RichText::new("Binary size:").color(color_muted));
            ui.label(egui::RichText::new(format_size(stats.binary_bytes)).color(color_accent));
            ui.end_row();

            ui.label(egui::RichText::new("Text:").color(color_muted));
            ui.label(egui::RichText::new(format_count(stats.text_count)).color(color_normal));
            ui.end_row();

            ui.label(egui::RichText::new("Text size:").color(color_muted));
            ui.label(egui::RichText::new(format_size(stats.text_bytes)).color(color_accent));
            ui.end_row();
        });
}
