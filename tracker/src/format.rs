/// Format elapsed seconds as zero-padded `HH:MM:SS`.
///
/// Pure; called once per second from the display tick, so it must stay
/// side-effect free.
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

/// Format a fractional hour count as `Xh Ym`, rounding down to whole minutes.
pub fn format_hours(hours: f64) -> String {
    let total_minutes = (hours.max(0.0) * 60.0).floor() as u64;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

/// The summary variant embedded in issue comments: `1h 01m 01s`.
pub fn format_summary(total_seconds: u64) -> String {
    format!(
        "{}h {:02}m {:02}s",
        total_seconds / 3600,
        (total_seconds % 3600) / 60,
        total_seconds % 60
    )
}

/// Markdown body posted back onto the issue: the time summary, then the
/// user's free-text note (omitted when blank).
pub fn comment_body(elapsed_seconds: u64, note: &str) -> String {
    let summary = format!("**Time tracked:** {}", format_summary(elapsed_seconds));
    if note.trim().is_empty() {
        summary
    } else {
        format!("{}\n\n{}", summary, note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hms_boundaries() {
        assert_eq!(format_hms(0), "00:00:00");
        assert_eq!(format_hms(3661), "01:01:01");
        assert_eq!(format_hms(86399), "23:59:59");
    }

    #[test]
    fn test_hms_rolls_past_a_day() {
        assert_eq!(format_hms(90000), "25:00:00");
    }

    #[test]
    fn test_hours_rounds_down() {
        assert_eq!(format_hours(0.0), "0h 0m");
        assert_eq!(format_hours(1.5), "1h 30m");
        assert_eq!(format_hours(2.999), "2h 59m");
    }

    #[test]
    fn test_summary_breakdown() {
        assert_eq!(format_summary(3661), "1h 01m 01s");
        assert_eq!(format_summary(0), "0h 00m 00s");
        assert_eq!(format_summary(59), "0h 00m 59s");
    }

    #[test]
    fn test_comment_body_with_and_without_note() {
        assert_eq!(
            comment_body(3661, "wrapped up the parser"),
            "**Time tracked:** 1h 01m 01s\n\nwrapped up the parser"
        );
        assert_eq!(comment_body(60, "  "), "**Time tracked:** 0h 01m 00s");
    }
}
