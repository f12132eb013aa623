use chrono::{DateTime, SecondsFormat, Utc};

/// Get the current UTC time
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Format a UTC time as ISO 8601 with millisecond precision (e.g. `2024-01-01T00:00:00.000Z`)
pub fn to_iso8601(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an ISO 8601 / RFC 3339 string into UTC
pub fn parse_iso8601(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}
