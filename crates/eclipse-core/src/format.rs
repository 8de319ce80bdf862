//! Human-readable durations.

/// `45` -> `"45s"`, `120` -> `"2 min"`, `90` -> `"1m 30s"`.
pub fn format_duration_seconds(seconds: u32) -> String {
    if seconds < 60 {
        return format!("{seconds}s");
    }
    let mins = seconds / 60;
    let secs = seconds % 60;
    if secs == 0 {
        format!("{mins} min")
    } else {
        format!("{mins}m {secs}s")
    }
}

/// Countdown display, `m:ss`.
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_durations_in_seconds() {
        assert_eq!(format_duration_seconds(15), "15s");
        assert_eq!(format_duration_seconds(45), "45s");
    }

    #[test]
    fn whole_minutes() {
        assert_eq!(format_duration_seconds(60), "1 min");
        assert_eq!(format_duration_seconds(180), "3 min");
    }

    #[test]
    fn minutes_and_seconds() {
        assert_eq!(format_duration_seconds(90), "1m 30s");
        assert_eq!(format_duration_seconds(75), "1m 15s");
    }

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(5), "0:05");
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(125), "2:05");
    }
}
