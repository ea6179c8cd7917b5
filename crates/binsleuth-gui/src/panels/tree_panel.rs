/// Main TreeView results panel.
use crate::state::AppState;
use crate::widgets;
use crate::widgets::tree_view::{BAR_OFFSET, RATIO_AREA_WIDTH, RIGHT_LABEL_OFFSET};
use egui::Ui;

/// Draw the tree panel: column headers over the tree view.
pub fn tree_panel(ui: &mut Ui, state: &mut AppState) {
    let header_height = 20.0;
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), header_height),
        egui::Sense::hover(),
    );
    let painter = ui.painter_at(rect);
    painter.rect_filled(rect, 0.0, ui.visuals().faint_bg_color);

    let muted = ui.visuals().weak_text_color();
    let font = egui::FontId::proportional(12.0);
    let area_start = rect.right() - RATIO_AREA_WIDTH;
    let y = rect.center().y;

    painter.text(
        egui::pos2(rect.left() + 8.0, y),
        egui::Align2::LEFT_CENTER,
        "Name",
        font.clone(),
        muted,
    );
    painter.text(
        egui::pos2(area_start + BAR_OFFSET, y),
        egui::Align2::LEFT_CENTER,
        "% of binary files",
        font.clone(),
        muted,
    );
    painter.text(
        egui::pos2(area_start + RIGHT_LABEL_OFFSET, y),
        egui::Align2::LEFT_CENTER,
        "Files",
        font,
        muted,
    );

    ui.separator();

    widgets::tree_view::tree_view(ui, state);
}
