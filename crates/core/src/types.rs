/// Backend identifiers are opaque strings (MongoDB object ids on the wire).
pub type UserId = String;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Parse an ISO-8601 timestamp as emitted by the backend.
///
/// Accepts RFC 3339 values with an offset as well as naive
/// `YYYY-MM-DDTHH:MM:SS[.ffffff]` values, which the backend produces from
/// `utcnow()` and which are therefore read as UTC.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&chrono::Utc));
    }
    raw.parse::<chrono::NaiveDateTime>()
        .ok()
        .map(|naive| naive.and_utc())
}

/// Serde adapter for [`Timestamp`] fields that tolerates naive values.
pub mod lenient_timestamp {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::{parse_timestamp, Timestamp};

    pub fn serialize<S: Serializer>(ts: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&ts.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw).ok_or_else(|| de::Error::custom(format!("invalid timestamp: {raw}")))
    }
}

/// Like [`lenient_timestamp`] for optional fields. Empty strings and
/// unparseable values map to `None` rather than failing the whole payload.
pub mod lenient_timestamp_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{parse_timestamp, Timestamp};

    pub fn serialize<S: Serializer>(
        ts: &Option<Timestamp>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => serializer.serialize_some(&ts.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Timestamp>, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().and_then(parse_timestamp))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_rfc3339_with_zulu() {
        let ts = parse_timestamp("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(ts.year(), 2024);
        assert_eq!(ts.hour(), 0);
    }

    #[test]
    fn parses_rfc3339_with_offset() {
        let ts = parse_timestamp("2024-01-01T02:30:00+02:00").unwrap();
        assert_eq!(ts.hour(), 0);
        assert_eq!(ts.minute(), 30);
    }

    #[test]
    fn parses_naive_as_utc() {
        let ts = parse_timestamp("2024-03-05T10:11:12.345678").unwrap();
        assert_eq!(ts.day(), 5);
        assert_eq!(ts.hour(), 10);
        assert_eq!(ts.nanosecond(), 345_678_000);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("").is_none());
    }
}
