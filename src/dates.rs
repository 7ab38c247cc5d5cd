use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Datetime layout used by the Legistar web API, always without an offset
pub const LEGISTAR_DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a timestamp from RFC 3339, an offset-less `YYYY-MM-DDTHH:MM:SS`
/// (taken as UTC), or a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, LEGISTAR_DATETIME_FORMAT) {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Serde helper for optional scraped timestamps.
///
/// Accepts every layout `parse_datetime` does. A value that cannot be read as
/// a timestamp becomes `None` so the role is dropped later instead of failing
/// the whole document.
pub fn deserialize_optional_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => {
            let parsed = parse_datetime(&text);
            if parsed.is_none() {
                warn!(value = %text, "Unreadable timestamp treated as missing");
            }
            parsed
        }
        Some(other) => {
            warn!(value = %other, "Non-string timestamp treated as missing");
            None
        }
    })
}
