//! BinSleuth application icon generator.
//!
//! Produces a procedural icon: a ratio bar (unassessed, assessed and binary
//! segments in the same colours as the tree view) on a dark rounded tile,
//! with a magnifying-glass ring over its right end. Rendered at any size
//! as RGBA pixel data for the window icon.

use binsleuth_core::ratio_bar::SegmentRole;

/// Generate a BinSleuth icon as egui `IconData`.
pub fn generate_icon(size: u32) -> egui::IconData {
    egui::IconData {
        rgba: render_icon(size),
        width: size,
        height: size,
    }
}

/// Render the icon into an RGBA pixel buffer (top-to-bottom row order).
pub fn render_icon(size: u32) -> Vec<u8> {
    let s = size as f32;
    let mut pixels = vec![0u8; (size * size * 4) as usize];

    // ── Layout ──────────────────────────────────────────────────
    let tile_margin = s * 0.04;
    let tile_radius = s * 0.18;

    let bar_left = s * 0.14;
    let bar_right = s * 0.86;
    let bar_top = s * 0.40;
    let bar_bottom = s * 0.60;
    let bar_w = bar_right - bar_left;
    let assessed_end = bar_left + bar_w * 0.78;
    let binary_end = bar_left + bar_w * 0.42;

    let lens_cx = s * 0.66;
    let lens_cy = s * 0.46;
    let lens_r = s * 0.20;
    let ring_w = s * 0.045;
    let h_start = (lens_cx + (lens_r + ring_w) * 0.7071, lens_cy + (lens_r + ring_w) * 0.7071);
    let h_end = (s * 0.92, s * 0.88);
    let h_half_w = s * 0.05;

    let tile = [0x1e, 0x1e, 0x2e];
    let ring = [0x70, 0x78, 0x85];

    for y in 0..size {
        for x in 0..size {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;

            // 1. Rounded tile. ───────────────────────────────────
            let tile_d = rounded_rect_dist(
                px,
                py,
                (tile_margin, tile_margin, s - tile_margin, s - tile_margin),
                tile_radius,
            );
            let mut alpha = smooth_edge(tile_d, 0.0);
            let mut color = tile;

            // 2. Ratio bar segments. ─────────────────────────────
            let bar_d = rounded_rect_dist(px, py, (bar_left, bar_top, bar_right, bar_bottom), s * 0.03);
            let bar_aa = smooth_edge(bar_d, 0.0);
            if bar_aa > 0.0 {
                let role = if px < binary_end {
                    SegmentRole::Binary
                } else if px < assessed_end {
                    SegmentRole::Assessed
                } else {
                    SegmentRole::Unassessed
                };
                color = blend(color, role.rgb(), bar_aa);
            }

            // 3. Lens tint and ring. ─────────────────────────────
            let dx = px - lens_cx;
            let dy = py - lens_cy;
            let dist = (dx * dx + dy * dy).sqrt();
            let inside = smooth_edge(dist, lens_r);
            if inside > 0.0 {
                // Glass: brighten slightly.
                color = blend(color, [0xff, 0xff, 0xff], inside * 0.12);
            }
            let ring_aa = smooth_edge((dist - lens_r - ring_w * 0.5).abs(), ring_w * 0.5);
            if ring_aa > 0.0 {
                color = blend(color, ring, ring_aa);
                alpha = alpha.max(ring_aa);
            }

            // 4. Handle. ─────────────────────────────────────────
            let hd = point_to_seg_dist(px, py, h_start, h_end);
            let handle_aa = smooth_edge(hd, h_half_w);
            if handle_aa > 0.0 {
                color = blend(color, ring, handle_aa);
                alpha = alpha.max(handle_aa);
            }

            let idx = ((y * size + x) * 4) as usize;
            pixels[idx] = color[0];
            pixels[idx + 1] = color[1];
            pixels[idx + 2] = color[2];
            pixels[idx + 3] = (alpha * 255.0).clamp(0.0, 255.0) as u8;
        }
    }

    pixels
}

// ── Helpers ─────────────────────────────────────────────────────

/// Smooth anti-aliased edge (1 → 0 as `dist` crosses `edge`).
fn smooth_edge(dist: f32, edge: f32) -> f32 {
    (0.5 - (dist - edge) * 0.5).clamp(0.0, 1.0)
}

/// Signed distance to a rounded rectangle `(left, top, right, bottom)`;
/// negative inside.
fn rounded_rect_dist(px: f32, py: f32, r: (f32, f32, f32, f32), radius: f32) -> f32 {
    let cx = (r.0 + r.2) * 0.5;
    let cy = (r.1 + r.3) * 0.5;
    let hx = (r.2 - r.0) * 0.5 - radius;
    let hy = (r.3 - r.1) * 0.5 - radius;
    let qx = (px - cx).abs() - hx;
    let qy = (py - cy).abs() - hy;
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    outside + qx.max(qy).min(0.0) - radius
}

/// Distance from a point to the segment `a`-`b`.
fn point_to_seg_dist(px: f32, py: f32, a: (f32, f32), b: (f32, f32)) -> f32 {
    let abx = b.0 - a.0;
    let aby = b.1 - a.1;
    let len_sq = abx * abx + aby * aby;
    if len_sq < 0.0001 {
        return ((px - a.0).powi(2) + (py - a.1).powi(2)).sqrt();
    }
    let t = (((px - a.0) * abx + (py - a.1) * aby) / len_sq).clamp(0.0, 1.0);
    ((px - (a.0 + t * abx)).powi(2) + (py - (a.1 + t * aby)).powi(2)).sqrt()
}

fn blend(under: [u8; 3], over: [u8; 3], t: f32) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mix = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t).round() as u8;
    [mix(under[0], over[0]), mix(under[1], over[1]), mix(under[2], over[2])]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_size_matches_dimensions() {
        let icon = generate_icon(32);
        assert_eq!(icon.rgba.len(), 32 * 32 * 4);
        assert_eq!((icon.width, icon.height), (32, 32));
    }

    #[test]
    fn test_corners_transparent_centre_opaque() {
        let size = 64;
        let rgba = render_icon(size);
        let alpha = |x: u32, y: u32| rgba[((y * size + x) * 4 + 3) as usize];
        assert_eq!(alpha(0, 0), 0);
        assert_eq!(alpha(size / 2, size / 2), 255);
    }
}
