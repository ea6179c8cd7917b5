/// Ratio bar widget: paints a core `RatioBarLayout` as three nested
/// rectangles sharing a left edge.
use crate::theme;
use binsleuth_core::ratio_bar::RatioBarLayout;
use egui::{Painter, Rect, Response, Sense, Ui, Vec2};

/// Spacing between hatch lines, in pixels.
const HATCH_SPACING: f32 = 4.0;

/// Paint `layout` into `rect`.
pub fn paint_ratio_bar(painter: &Painter, rect: Rect, layout: &RatioBarLayout, dark_mode: bool) {
    for segment in &layout.segments {
        let width = rect.width() * segment.width_fraction.clamp(0.0, 1.0);
        if width < 0.5 {
            continue;
        }
        let seg_rect = Rect::from_min_size(rect.min, Vec2::new(width, rect.height()));
        painter.rect_filled(seg_rect, 1.0, theme::role_color(segment.role));
        if segment.role.is_hatched() {
            paint_hatching(painter, seg_rect, theme::hatch_stroke(segment.role));
        }
    }
    painter.rect_stroke(
        rect,
        1.0,
        theme::bar_outline(dark_mode),
        egui::StrokeKind::Inside,
    );
}

/// Diagonal lines clipped to `rect`.
fn paint_hatching(painter: &Painter, rect: Rect, stroke: egui::Stroke) {
    let clipped = painter.with_clip_rect(rect.intersect(painter.clip_rect()));
    let h = rect.height();
    let mut x = rect.left() - h;
    while x < rect.right() {
        clipped.line_segment(
            [egui::pos2(x, rect.bottom()), egui::pos2(x + h, rect.top())],
            stroke,
        );
        x += HATCH_SPACING;
    }
}

/// Allocate space for a bar, paint it, and attach the ratio tooltip.
pub fn ratio_bar(ui: &mut Ui, layout: &RatioBarLayout, width: f32, height: f32) -> Response {
    let (rect, response) = ui.allocate_exact_size(Vec2::new(width, height), Sense::hover());
    let dark_mode = ui.visuals().dark_mode;
    paint_ratio_bar(&ui.painter_at(rect), rect, layout, dark_mode);
    response.on_hover_text(layout.tooltip())
}
