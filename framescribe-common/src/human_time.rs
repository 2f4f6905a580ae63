//! Human-readable time formatting

/// Format a video position as `MM:SS`.
///
/// Fractional seconds are truncated. Minutes are not wrapped into hours, so
/// a 75-minute position reads `75:00`. Negative or non-finite input is
/// treated as zero.
///
/// # Examples
///
/// ```
/// use framescribe_common::human_time::format_timestamp;
///
/// assert_eq!(format_timestamp(0.0), "00:00");
/// assert_eq!(format_timestamp(65.9), "01:05");
/// assert_eq!(format_timestamp(4500.0), "75:00");
/// ```
pub fn format_timestamp(seconds: f64) -> String {
    let whole = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{:02}:{:02}", whole / 60, whole % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_minute() {
        assert_eq!(format_timestamp(3.5), "00:03");
        assert_eq!(format_timestamp(59.99), "00:59");
    }

    #[test]
    fn test_minutes() {
        assert_eq!(format_timestamp(60.0), "01:00");
        assert_eq!(format_timestamp(754.2), "12:34");
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(format_timestamp(-4.0), "00:00");
        assert_eq!(format_timestamp(f64::NAN), "00:00");
    }
}
