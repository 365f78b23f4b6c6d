//! Time formatting utilities

use std::time::Duration;

/// Format seconds as `HH:MM:SS`. Negative and non-finite values show as zero.
pub fn format_hms(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}:{:02}", total / 3600, (total / 60) % 60, total % 60)
}

/// Format seconds as `HH:MM:SS.mmm`
pub fn format_hms_millis(seconds: f64) -> String {
    let millis = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0) as u64
    } else {
        0
    };
    format!("{}.{:03}", format_hms(millis as f64 / 1000.0), millis % 1000)
}

/// Human friendly elapsed time, e.g. `1m 5s`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    let (hours, mins, secs) = (secs / 3600, (secs / 60) % 60, secs % 60);

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if mins > 0 {
        parts.push(format!("{}m", mins));
    }
    if secs > 0 || parts.is_empty() {
        parts.push(format!("{}s", secs));
    }
    parts.join(" ")
}
