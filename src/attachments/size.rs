//! Human-readable byte sizes.

/// Unit labels, one per power of 1024.
const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

const STEP: u64 = 1024;

/// Format a byte count with 1024-based units and one decimal place.
///
/// A trailing `.0` is dropped, so `1024` reads `"1 KB"` while `1536` reads
/// `"1.5 KB"`. Zero is always `"0 Bytes"`. Anything past the last unit stays
/// in GB.
///
/// ```rust
/// use chat_widget::attachments::format_size;
///
/// assert_eq!(format_size(0), "0 Bytes");
/// assert_eq!(format_size(2_621_440), "2.5 MB");
/// ```
#[allow(clippy::cast_precision_loss)]
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let scale = unit_scale(bytes);
    let divisor = STEP.pow(scale as u32) as f64;
    // Halves round up; `{:.1}` alone would round them to even.
    let rounded = (bytes as f64 / divisor * 10.0).round() / 10.0;
    let value = format!("{rounded:.1}");
    let value = value.strip_suffix(".0").unwrap_or(&value);

    format!("{value} {}", UNITS[scale])
}

/// Largest unit index whose scaled value is still at least one.
fn unit_scale(bytes: u64) -> usize {
    let mut scale = 0;
    let mut threshold = STEP;
    while scale + 1 < UNITS.len() && bytes >= threshold {
        scale += 1;
        threshold = threshold.saturating_mul(STEP);
    }
    scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_special_cased() {
        assert_eq!(format_size(0), "0 Bytes");
    }

    #[test]
    fn test_small_counts_stay_in_bytes() {
        assert_eq!(format_size(1), "1 Bytes");
        assert_eq!(format_size(1023), "1023 Bytes");
    }

    #[test]
    fn test_unit_boundaries() {
        assert_eq!(format_size(1024), "1 KB");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1024 * 1024), "1 MB");
        assert_eq!(format_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_rounds_to_one_decimal() {
        // 1100 / 1024 = 1.074...
        assert_eq!(format_size(1100), "1.1 KB");
        // Just under 1 MB rounds up within the KB unit.
        assert_eq!(format_size(1024 * 1024 - 1), "1024 KB");
    }

    #[test]
    fn test_halves_round_up() {
        // 1.25 KB and 3.25 KB sit exactly on the tie.
        assert_eq!(format_size(1280), "1.3 KB");
        assert_eq!(format_size(3328), "3.3 KB");
    }

    #[test]
    fn test_terabytes_stay_in_gb() {
        assert_eq!(format_size(1024_u64.pow(4)), "1024 GB");
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_value_reconstructs_byte_count() {
        for bytes in [1_u64, 7, 999, 1024, 4097, 65_535, 1_000_000, 123_456_789, 9_876_543_210] {
            let formatted = format_size(bytes);
            let (number, unit) = formatted.split_once(' ').unwrap();
            let scale = UNITS.iter().position(|u| *u == unit).unwrap();
            let number: f64 = number.parse().unwrap();
            let unit_size = STEP.pow(scale as u32) as f64;

            assert!(number >= 1.0, "{formatted} should be at least one unit");
            if scale + 1 < UNITS.len() {
                assert!((bytes as f64) < unit_size * STEP as f64);
            }
            let error = (number * unit_size - bytes as f64).abs();
            assert!(error <= 0.05 * unit_size, "{bytes} -> {formatted}");
        }
    }
}
