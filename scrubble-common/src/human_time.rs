//! Human-readable time formatting for report output
//!
//! The report summary shows the session gap threshold in clock style:
//! `M:SS` below one hour, `H:MM:SS` at or above it.

/// Format seconds as clock-style time.
///
/// # Examples
///
/// ```
/// use scrubble_common::human_time::format_clock;
///
/// assert_eq!(format_clock(45), "0:45");
/// assert_eq!(format_clock(330), "5:30");
/// assert_eq!(format_clock(3661), "1:01:01");
/// ```
pub fn format_clock(seconds: i64) -> String {
    let is_negative = seconds < 0;
    let abs = seconds.abs();

    let formatted = if abs < 3600 {
        format!("{}:{:02}", abs / 60, abs % 60)
    } else {
        format!("{}:{:02}:{:02}", abs / 3600, (abs % 3600) / 60, abs % 60)
    };

    if is_negative {
        format!("-{}", formatted)
    } else {
        formatted
    }
}
