/// Virtualised TreeView widget, the main results view.
///
/// Only renders rows visible in the viewport, so the cost per frame does
/// not grow with the tree. Uses the flat `visible_rows` list maintained by
/// `AppState`. Directories carry a ratio bar; binary files a "b" marker.
///
/// Reads the shared `LiveTree` under a read lock, so ratios fill in while
/// the classification pass runs.
use crate::state::{AppPhase, AppState};
use crate::theme;
use crate::widgets::ratio_bar::paint_ratio_bar;
use binsleuth_core::model::size::{format_count, format_size};
use binsleuth_core::model::{FileTree, NodeIndex};
use egui::{Rect, Response, Sense, Ui, Vec2};

/// Height of each row in pixels.
pub const ROW_HEIGHT: f32 = 24.0;

/// Indentation per depth level in pixels.
const INDENT_PX: f32 = 20.0;

/// Width reserved on the right for the ratio columns.
pub const RATIO_AREA_WIDTH: f32 = 330.0;

/// Offsets inside the ratio area, shared with the panel header.
pub const LEFT_LABEL_END: f32 = 110.0;
pub const BAR_OFFSET: f32 = 118.0;
pub const BAR_WIDTH: f32 = 140.0;
pub const RIGHT_LABEL_OFFSET: f32 = BAR_OFFSET + BAR_WIDTH + 10.0;

/// Draw the virtualised tree view.
pub fn tree_view(ui: &mut Ui, state: &mut AppState) -> Response {
    let have_tree = state.with_tree(|_| ()).is_some();

    if !have_tree {
        let message = match state.phase {
            AppPhase::Building => "Listing directories...",
            _ => "No results. Enter a directory above and click Scan.",
        };
        ui.centered_and_justified(|ui| {
            ui.label(egui::RichText::new(message).color(ui.visuals().weak_text_color()));
        });
        return ui.interact(ui.max_rect(), ui.id().with("empty_tree"), Sense::click());
    }

    if state.phase == AppPhase::Classifying {
        let progress = state
            .last_milestone
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("0 of {}", format_count(state.total_files)));
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(
                egui::RichText::new(format!(" Classifying... {progress}"))
                    .color(ui.visuals().weak_text_color())
                    .size(12.0),
            );
        });
        ui.add_space(2.0);
    }

    // Scoped so the read guard is released before state is mutated.
    let (toggle_row, new_selection) = {
        let Some(live) = state.live_tree.clone() else {
            return ui.interact(ui.max_rect(), ui.id().with("tree_bg"), Sense::hover());
        };
        let guard = live.read();
        match guard.as_ref() {
            Some(tree) => render_tree_rows(ui, state, tree),
            None => (None, None),
        }
    };

    if let Some(row_idx) = new_selection {
        if let Some(row) = state.visible_rows.get(row_idx) {
            state.selected_node = Some(row.node_index);
        }
    }
    if let Some(row_idx) = toggle_row {
        state.toggle_expand(row_idx);
    }

    ui.interact(ui.max_rect(), ui.id().with("tree_bg"), Sense::hover())
}

/// Render the visible rows. Returns (toggle_row, new_selection) for
/// deferred state mutation.
fn render_tree_rows(
    ui: &mut Ui,
    state: &AppState,
    tree: &FileTree,
) -> (Option<usize>, Option<usize>) {
    let dark_mode = ui.visuals().dark_mode;
    let color_weak = ui.visuals().weak_text_color();
    let color_normal = ui.visuals().text_color();
    let color_selection = ui.visuals().selection.bg_fill;
    let color_hover = theme::hover_fill(ui.visuals());

    let total_rows = state.visible_rows.len();
    let total_height = total_rows as f32 * ROW_HEIGHT;

    let mut toggle_row: Option<usize> = None;
    let mut new_selection: Option<usize> = None;

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // Reserve the full virtual height so the scrollbar is correct.
            let (response, painter) = ui.allocate_painter(
                Vec2::new(ui.available_width(), total_height),
                Sense::click(),
            );

            let viewport = ui.clip_rect();
            let top_y = response.rect.top();

            let first_visible = ((viewport.top() - top_y) / ROW_HEIGHT).floor().max(0.0) as usize;
            let last_visible = ((viewport.bottom() - top_y) / ROW_HEIGHT)
                .ceil()
                .min(total_rows as f32) as usize;

            for row_idx in first_visible..last_visible {
                let Some(row) = state.visible_rows.get(row_idx) else {
                    break;
                };
                let node = tree.node(row.node_index);

                let row_rect = Rect::from_min_size(
                    egui::pos2(response.rect.left(), top_y + row_idx as f32 * ROW_HEIGHT),
                    Vec2::new(response.rect.width(), ROW_HEIGHT),
                );
                if !viewport.intersects(row_rect) {
                    continue;
                }

                let is_selected = state.selected_node == Some(row.node_index);
                if is_selected {
                    painter.rect_filled(row_rect, 0.0, color_selection);
                }

                let row_response = ui.interact(
                    row_rect,
                    ui.id().with(("tree_row", row_idx)),
                    Sense::click(),
                );
                if row_response.hovered() && !is_selected {
                    painter.rect_filled(row_rect, 0.0, color_hover);
                }
                if row_response.clicked() {
                    new_selection = Some(row_idx);
                }
                if row_response.double_clicked() && node.is_dir() {
                    toggle_row = Some(row_idx);
                }

                row_response.context_menu(|ui| {
                    context_menu(ui, state, tree, row.node_index);
                });

                if row_response.hovered() {
                    let tip_text = row_tooltip(state, tree, row.node_index);
                    egui::show_tooltip_at_pointer(
                        ui.ctx(),
                        ui.layer_id(),
                        ui.id().with(("tree_tip", row_idx)),
                        |ui| {
                            ui.label(tip_text);
                        },
                    );
                }

                let indent = INDENT_PX * row.depth as f32;
                let text_x = row_rect.left() + indent + 4.0;
                let text_y = row_rect.center().y;

                if node.is_dir() {
                    let arrow_text = if row.is_expanded { "▼" } else { "▶" };
                    let arrow_rect = Rect::from_min_size(
                        egui::pos2(row_rect.left() + indent - 14.0, row_rect.top()),
                        Vec2::new(16.0, ROW_HEIGHT),
                    );
                    let arrow_response =
                        ui.interact(arrow_rect, ui.id().with(("arrow", row_idx)), Sense::click());
                    if arrow_response.clicked() {
                        toggle_row = Some(row_idx);
                    }
                    painter.text(
                        egui::pos2(row_rect.left() + indent - 12.0, text_y),
                        egui::Align2::LEFT_CENTER,
                        arrow_text,
                        egui::FontId::proportional(11.0),
                        color_weak,
                    );
                }

                let (icon, icon_color) = if node.listing_failed() {
                    ("⚠", theme::WARNING)
                } else if node.is_dir() {
                    ("📁", theme::FOLDER_ICON)
                } else {
                    ("📄", theme::FILE_ICON)
                };
                painter.text(
                    egui::pos2(text_x, text_y),
                    egui::Align2::LEFT_CENTER,
                    icon,
                    egui::FontId::proportional(13.0),
                    icon_color,
                );

                // Name, clipped with an ellipsis before the ratio columns.
                let name_x = text_x + 20.0;
                let area_start = row_rect.right() - RATIO_AREA_WIDTH;
                let max_name_w = (area_start - name_x - 4.0).max(20.0);
                let name_color = if node.listing_failed() {
                    color_weak
                } else {
                    color_normal
                };
                let name_galley = painter.layout_no_wrap(
                    node.name.to_string(),
                    egui::FontId::proportional(13.0),
                    name_color,
                );
                let name_pos = egui::pos2(name_x, text_y - name_galley.size().y / 2.0);
                if name_galley.size().x <= max_name_w {
                    painter.galley(name_pos, name_galley, name_color);
                } else {
                    let clip = Rect::from_min_size(
                        egui::pos2(name_x, row_rect.top()),
                        Vec2::new(max_name_w - 12.0, ROW_HEIGHT),
                    );
                    painter
                        .with_clip_rect(painter.clip_rect().intersect(clip))
                        .galley(name_pos, name_galley, name_color);
                    painter.text(
                        egui::pos2(name_x + max_name_w - 12.0, text_y),
                        egui::Align2::LEFT_CENTER,
                        "…",
                        egui::FontId::proportional(13.0),
                        color_weak,
                    );
                }

                if node.is_dir() {
                    let bar_layout = state.layout_for(row.node_index);
                    painter.text(
                        egui::pos2(area_start + LEFT_LABEL_END, text_y),
                        egui::Align2::RIGHT_CENTER,
                        &bar_layout.left_label,
                        egui::FontId::proportional(12.0),
                        color_weak,
                    );
                    let bar_height = 10.0;
                    let bar_rect = Rect::from_min_size(
                        egui::pos2(area_start + BAR_OFFSET, text_y - bar_height / 2.0),
                        Vec2::new(BAR_WIDTH, bar_height),
                    );
                    paint_ratio_bar(&painter, bar_rect, &bar_layout, dark_mode);
                    painter.text(
                        egui::pos2(area_start + RIGHT_LABEL_OFFSET, text_y),
                        egui::Align2::LEFT_CENTER,
                        &bar_layout.right_label,
                        egui::FontId::proportional(12.0),
                        color_weak,
                    );
                } else {
                    if node.classification().is_binary() {
                        painter.text(
                            egui::pos2(area_start + BAR_OFFSET, text_y),
                            egui::Align2::LEFT_CENTER,
                            "b",
                            egui::FontId::monospace(12.0),
                            theme::BINARY_MARKER,
                        );
                    }
                    if let Some(size) = node.size() {
                        painter.text(
                            egui::pos2(area_start + LEFT_LABEL_END, text_y),
                            egui::Align2::RIGHT_CENTER,
                            format_size(size),
                            egui::FontId::proportional(12.0),
                            color_weak,
                        );
                    }
                }
            }

            response
        });

    (toggle_row, new_selection)
}

fn row_tooltip(state: &AppState, tree: &FileTree, index: NodeIndex) -> String {
    let node = tree.node(index);
    if node.listing_failed() {
        return format!("{}\n⚠ Contents could not be listed", node.name);
    }
    if node.is_dir() {
        format!("{}\n{}", node.name, state.layout_for(index).tooltip())
    } else {
        format!("{}\n{}", node.name, node.classification().label())
    }
}

/// Right-click context menu for a tree node.
fn context_menu(ui: &mut Ui, state: &AppState, tree: &FileTree, index: NodeIndex) {
    let full_path = tree.full_path(index).to_string_lossy().into_owned();

    if ui.button("📋 Copy Path").clicked() {
        ui.ctx().copy_text(full_path);
        ui.close_menu();
    }

    ui.separator();

    let node = tree.node(index);
    if node.is_dir() {
        if let Some(stats) = state.stats_for(index) {
            ui.label(format!("Files: {}", format_count(stats.total_files)));
            ui.label(format!(
                "Binary: {} ({})",
                format_count(stats.binary_count),
                format_size(stats.binary_bytes)
            ));
        }
    } else {
        ui.label(format!("Type: {}", node.classification().label()));
    }
}
