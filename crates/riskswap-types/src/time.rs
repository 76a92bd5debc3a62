//! Timestamp formatting for log fields.
//!
//! The core never reads a clock. `now` is an argument on every call.

use chrono::{DateTime, Utc};

/// Render a unix-second timestamp as RFC 3339 for logs.
#[must_use]
pub fn format_ts(ts: u64) -> String {
    i64::try_from(ts)
        .ok()
        .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
        .map_or_else(|| format!("@{ts}"), |dt| dt.to_rfc3339())
}
