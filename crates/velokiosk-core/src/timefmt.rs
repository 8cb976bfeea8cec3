// ── Timestamp and duration formatting for sync rows and reports ──

use chrono::{Local, TimeZone};

/// Wall-clock `HH:MM:SS` for an epoch-ms timestamp, local time.
pub fn format_clock(ms: i64) -> String {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .map_or_else(|| "--:--:--".into(), |dt| dt.format("%H:%M:%S").to_string())
}

/// Countdown `MM:SS` (or `H:MM:SS` past the hour) for a remaining-time
/// value. Negative inputs clamp to zero.
pub fn format_countdown(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    let (hours, mins, secs) = (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60);
    if hours > 0 {
        format!("{hours}:{mins:02}:{secs:02}")
    } else {
        format!("{mins:02}:{secs:02}")
    }
}

/// Elapsed-span label for report rows, e.g. `3m 07s` or `1h 02m`.
pub fn format_span(ms: i64) -> String {
    let total_secs = ms.max(0) / 1000;
    let (hours, mins, secs) = (total_secs / 3600, (total_secs % 3600) / 60, total_secs % 60);
    if hours > 0 {
        format!("{hours}h {mins:02}m")
    } else {
        format!("{mins}m {secs:02}s")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn countdown_clamps_negative_to_zero() {
        assert_eq!(format_countdown(-5_000), "00:00");
    }

    #[test]
    fn countdown_formats_minutes_and_hours() {
        assert_eq!(format_countdown(62_000), "01:02");
        assert_eq!(format_countdown(3_723_000), "1:02:03");
    }

    #[test]
    fn span_formats_short_and_long() {
        assert_eq!(format_span(187_000), "3m 07s");
        assert_eq!(format_span(3_720_000), "1h 02m");
    }
}
