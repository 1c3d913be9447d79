//! Display timestamps for timeline events.
//!
//! Timestamps are shown as `MM:SS`, or `H:MM:SS` once an hour is reached.

/// Format seconds as a display timestamp (`MM:SS` or `H:MM:SS`).
///
/// Fractional seconds are truncated; negative or non-finite input formats
/// as `00:00`.
pub fn format_timestamp(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

/// Parse a display timestamp into seconds.
///
/// Accepts `SS`, `MM:SS` and `H:MM:SS`, each component optionally
/// fractional in the last position (`01:02.5`). Returns `None` for anything
/// else, including free text the model may emit.
pub fn parse_timestamp(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.trim().split(':').collect();
    if parts.is_empty() || parts.len() > 3 {
        return None;
    }

    let (last, leading) = parts.split_last()?;
    let seconds: f64 = last.trim().parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    let mut total = 0.0;
    for part in leading {
        let value: u32 = part.trim().parse().ok()?;
        total = total * 60.0 + value as f64;
    }
    Some(total * 60.0 + seconds)
}
