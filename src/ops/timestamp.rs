use chrono::{DateTime, Utc};

/// Instant substituted for a missing or unparseable timestamp.
///
/// Earlier than anything the API can return, so it never lands inside a
/// report window and always sorts first.
pub const SENTINEL: DateTime<Utc> = DateTime::<Utc>::MIN_UTC;

/// Parse an ISO-8601 timestamp from the API (`2024-01-01T10:00:00Z` or
/// with a numeric offset) into UTC.
pub fn parse_timestamp(raw: Option<&str>) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return SENTINEL;
    };
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => dt.with_timezone(&Utc),
        Err(e) => {
            tracing::debug!(timestamp = raw, error = %e, "unparseable timestamp");
            SENTINEL
        }
    }
}

pub fn is_sentinel(t: DateTime<Utc>) -> bool {
    t == SENTINEL
}
