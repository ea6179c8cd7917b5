/// Human-readable byte sizes and counts.
///
/// [`format_size`] is the default humaniser plugged into the ratio-bar
/// labels. All sizes are `u64` bytes; floating point only appears at this
/// display boundary.

/// Unit labels, each 1024 times the previous one.
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with the largest unit that keeps the value >= 1.
///
/// Binary multiples (1 KB = 1024 B) with the short labels people expect.
/// Bytes are printed as integers, KB/MB with one decimal, GB/TB with two.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    match unit {
        0 => format!("{bytes} B"),
        1 | 2 => format!("{value:.1} {}", UNITS[unit]),
        _ => format!("{value:.2} {}", UNITS[unit]),
    }
}

/// Format a file count with thousand separators.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(5), "5 B");
        assert_eq!(format_size(1023), "1023 B");
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(1024), "1.0 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(1_073_741_824), "1.00 GB");
        assert_eq!(format_size(1_099_511_627_776), "1.00 TB");
    }

    #[test]
    fn test_format_size_caps_at_tb() {
        assert_eq!(format_size(1_099_511_627_776 * 2048), "2048.00 TB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(23_456), "23,456");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
