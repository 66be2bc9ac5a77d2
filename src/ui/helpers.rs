//! Shared rendering helpers.

use chrono::{DateTime, Utc};

/// Relative time like the dashboard shows: "now", "5m", "3h", "2d".
pub fn format_relative_time(at: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(at);
    if duration.num_seconds() < 60 {
        "now".to_string()
    } else if duration.num_minutes() < 60 {
        format!("{}m", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h", duration.num_hours())
    } else if duration.num_days() < 30 {
        format!("{}d", duration.num_days())
    } else {
        format!("{}mo", duration.num_days() / 30)
    }
}

/// Truncate on a char boundary, adding "..." when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let cut: String = s.chars().take(keep).collect();
    format!("{}...", cut)
}

/// Confidence as the dashboard renders it: rounded whole percent.
pub fn format_confidence(confidence: f64) -> String {
    format!("{}%", (confidence * 100.0).round() as i64)
}
