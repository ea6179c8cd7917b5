/// Ratio bar layout: the pure, drawing-free half of the "% of binary
/// files" bar.
///
/// The bar is three nested rectangles sharing a left edge: a full-width
/// background for what has not been assessed yet, an "assessed" rectangle
/// as wide as the classified share of the files, and a "binary" rectangle
/// inside it as wide as the binary share of the classified files. Widths
/// are fractions of the whole bar, so a renderer multiplies them by its
/// pixel width and paints the segments in order.
///
/// Without an aggregate (e.g. a path outside the current tree) the bar
/// shows a fixed placeholder in the `Unknown` role with `?` labels.
use crate::aggregate::AggregateStats;
use crate::model::size::format_size;

/// Placeholder width used when no aggregate is available.
pub const UNKNOWN_PLACEHOLDER_FRACTION: f32 = 0.25;

/// Injected byte-size humaniser for the left label.
pub type SizeFormatter = fn(u64) -> String;

/// Position of a segment in the bar, left-to-right paint order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentSlot {
    Background,
    Assessed,
    Binary,
}

/// Visual identity of a segment. The renderer maps roles to pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SegmentRole {
    /// Files not classified yet.
    Unassessed,
    /// Classified, not binary.
    Assessed,
    /// Classified binary.
    Binary,
    /// No aggregate available; painted with a hatched fill.
    Unknown,
}

impl SegmentRole {
    /// Fixed colour identity as RGB.
    pub fn rgb(self) -> [u8; 3] {
        match self {
            Self::Unassessed => [0xa0, 0xa0, 0xa4],
            Self::Assessed => [0xff, 0xff, 0xff],
            Self::Binary => [0x66, 0x66, 0xff],
            Self::Unknown => [0xfa, 0xb3, 0x87],
        }
    }

    /// `true` if the role is drawn with a pattern rather than a solid fill.
    pub fn is_hatched(self) -> bool {
        self == Self::Unknown
    }
}

/// One rectangle of the bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub slot: SegmentSlot,
    pub role: SegmentRole,
    /// Width as a fraction of the whole bar, in `[0, 1]`.
    pub width_fraction: f32,
}

/// Renderable description of a ratio bar.
#[derive(Clone, Debug, PartialEq)]
pub struct RatioBarLayout {
    /// Background, assessed, binary, in paint order.
    pub segments: [Segment; 3],
    /// Binary file count, optionally with the binary byte total.
    pub left_label: String,
    /// Total file count.
    pub right_label: String,
    /// Share of files classified, `[0, 1]`. Zero when unknown.
    pub assessed_fraction: f32,
    /// Share of classified files that are binary, `[0, 1]`. Zero when unknown.
    pub binary_fraction: f32,
    pub is_unknown: bool,
}

impl RatioBarLayout {
    /// The segment occupying `slot`.
    pub fn segment(&self, slot: SegmentSlot) -> &Segment {
        match slot {
            SegmentSlot::Background => &self.segments[0],
            SegmentSlot::Assessed => &self.segments[1],
            SegmentSlot::Binary => &self.segments[2],
        }
    }

    /// Hover text describing the two ratios.
    pub fn tooltip(&self) -> String {
        if self.is_unknown {
            return "Not analysed".to_string();
        }
        format!(
            "Analysed: {:.0}%\nBinary: {:.0}%",
            self.assessed_fraction * 100.0,
            self.binary_fraction * 100.0
        )
    }
}

/// Layout settings.
#[derive(Clone, Copy, Debug)]
pub struct RatioBarModel {
    /// Width of the `Unknown` placeholder, as a fraction of the bar.
    pub placeholder_fraction: f32,
    /// Append the binary byte total to the left label.
    pub show_binary_bytes: bool,
    /// Byte humaniser; `None` prints the raw byte count.
    pub humanize: Option<SizeFormatter>,
}

impl Default for RatioBarModel {
    fn default() -> Self {
        Self {
            placeholder_fraction: UNKNOWN_PLACEHOLDER_FRACTION,
            show_binary_bytes: true,
            humanize: Some(format_size),
        }
    }
}

impl RatioBarModel {
    /// Counts only, no byte totals in the labels.
    pub fn counts_only() -> Self {
        Self {
            show_binary_bytes: false,
            ..Self::default()
        }
    }

    /// Compute the layout for an aggregate, or the placeholder for `None`.
    pub fn layout(&self, stats: Option<&AggregateStats>) -> RatioBarLayout {
        match stats {
            Some(stats) => self.known_layout(stats),
            None => self.unknown_layout(),
        }
    }

    fn known_layout(&self, stats: &AggregateStats) -> RatioBarLayout {
        let assessed = stats.assessed();
        let assessed_fraction = ratio(assessed, stats.total_files);
        let binary_fraction = ratio(stats.binary_count, assessed);

        let mut left_label = stats.binary_count.to_string();
        if self.show_binary_bytes {
            let bytes = match self.humanize {
                Some(humanize) => humanize(stats.binary_bytes),
                None => stats.binary_bytes.to_string(),
            };
            left_label = format!("{left_label} ({bytes})");
        }

        RatioBarLayout {
            segments: [
                background(),
                Segment {
                    slot: SegmentSlot::Assessed,
                    role: SegmentRole::Assessed,
                    width_fraction: assessed_fraction,
                },
                Segment {
                    slot: SegmentSlot::Binary,
                    role: SegmentRole::Binary,
                    width_fraction: assessed_fraction * binary_fraction,
                },
            ],
            left_label,
            right_label: stats.total_files.to_string(),
            assessed_fraction,
            binary_fraction,
            is_unknown: false,
        }
    }

    fn unknown_layout(&self) -> RatioBarLayout {
        let width = self.placeholder_fraction.clamp(0.0, 1.0);
        RatioBarLayout {
            segments: [
                background(),
                Segment {
                    slot: SegmentSlot::Assessed,
                    role: SegmentRole::Unknown,
                    width_fraction: width,
                },
                Segment {
                    slot: SegmentSlot::Binary,
                    role: SegmentRole::Unknown,
                    width_fraction: width,
                },
            ],
            left_label: "?".to_string(),
            right_label: "?".to_string(),
            assessed_fraction: 0.0,
            binary_fraction: 0.0,
            is_unknown: true,
        }
    }
}

/// Layout with the default settings.
pub fn layout(stats: Option<&AggregateStats>) -> RatioBarLayout {
    RatioBarModel::default().layout(stats)
}

fn background() -> Segment {
    Segment {
        slot: SegmentSlot::Background,
        role: SegmentRole::Unassessed,
        width_fraction: 1.0,
    }
}

/// `part / whole` clamped to `[0, 1]`; zero when `whole` is zero.
fn ratio(part: u64, whole: u64) -> f32 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64).clamp(0.0, 1.0) as f32
}
