/// Colour scheme for BinSleuth.
///
/// Ratio bar colours come from the core's segment roles so the bar looks
/// the same in both themes; everything else follows egui's visuals.
use binsleuth_core::ratio_bar::SegmentRole;
use egui::{Color32, Stroke, Visuals};

/// Semantic colours shared by the widgets.
pub const WARNING: Color32 = Color32::from_rgb(0xfa, 0xb3, 0x87);
pub const SUCCESS: Color32 = Color32::from_rgb(0xa6, 0xe3, 0xa1);
pub const INVALID_PATH: Color32 = Color32::from_rgb(0xf3, 0x5b, 0x68);
pub const FOLDER_ICON: Color32 = Color32::from_rgb(0xf9, 0xe2, 0xaf);
pub const FILE_ICON: Color32 = Color32::from_rgb(0x89, 0xb4, 0xfa);
pub const BINARY_MARKER: Color32 = Color32::from_rgb(0x66, 0x66, 0xff);

/// Base visuals for the chosen mode.
pub fn visuals(dark_mode: bool) -> Visuals {
    let mut visuals = if dark_mode {
        Visuals::dark()
    } else {
        Visuals::light()
    };
    if dark_mode {
        visuals.panel_fill = Color32::from_rgb(0x1e, 0x1e, 0x2e);
        visuals.window_fill = Color32::from_rgb(0x2a, 0x2a, 0x3c);
        visuals.selection.bg_fill = Color32::from_rgb(0x28, 0x3a, 0x5c);
    }
    visuals
}

/// Fill colour for a ratio bar segment.
pub fn role_color(role: SegmentRole) -> Color32 {
    let [r, g, b] = role.rgb();
    Color32::from_rgb(r, g, b)
}

/// Stroke for the diagonal hatching on `Unknown` segments.
pub fn hatch_stroke(role: SegmentRole) -> Stroke {
    let base = role_color(role);
    Stroke::new(1.0, base.gamma_multiply(0.55).to_opaque())
}

/// Outline drawn around every bar.
pub fn bar_outline(dark_mode: bool) -> Stroke {
    if dark_mode {
        Stroke::new(1.0, Color32::from_rgb(0x3a, 0x3a, 0x50))
    } else {
        Stroke::new(1.0, Color32::from_gray(170))
    }
}

/// Row hover tint.
pub fn hover_fill(visuals: &Visuals) -> Color32 {
    if visuals.dark_mode {
        Color32::from_rgb(0x35, 0x35, 0x4a)
    } else {
        let sel = visuals.selection.bg_fill;
        Color32::from_rgba_unmultiplied(sel.r(), sel.g(), sel.b(), 40)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_colors_follow_core_rgb() {
        assert_eq!(role_color(SegmentRole::Binary), Color32::from_rgb(0x66, 0x66, 0xff));
        assert_eq!(role_color(SegmentRole::Assessed), Color32::WHITE);
    }

    #[test]
    fn test_visuals_mode() {
        assert!(visuals(true).dark_mode);
        assert!(!visuals(false).dark_mode);
    }
}
