//! Timestamp utilities
//!
//! All stored timestamps are naive UTC, matching SQLite's `CURRENT_TIMESTAMP`.

use chrono::{NaiveDateTime, Utc};

/// Get current UTC timestamp as stored in the database
pub fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Format a stored timestamp for terminal display
pub fn display(timestamp: Option<NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => ts.format("%Y-%m-%d %H:%M").to_string(),
        None => "never".to_string(),
    }
}
