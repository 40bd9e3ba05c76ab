//! UTC instants for record timestamps and scheduled dates.
//!
//! Values are stored as epoch milliseconds and exchanged as ISO-8601 strings
//! with millisecond precision, e.g. `2025-06-01T10:00:00.000Z`. Incoming JSON
//! may carry any RFC 3339 offset or a bare epoch-millisecond number; both are
//! normalized to UTC and truncated to whole milliseconds.

use chrono::{DateTime, SecondsFormat, SubsecRound, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Millisecond-precision UTC instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Returns `None` when `millis` is outside chrono's representable range.
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    pub fn as_millis(self) -> i64 {
        self.0.timestamp_millis()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.trunc_subsecs(3))
    }
}

impl Display for Timestamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Millis, true))
    }
}

impl FromStr for Timestamp {
    type Err = chrono::ParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(value.trim()).map(|parsed| parsed.with_timezone(&Utc).into())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(TimestampVisitor)
    }
}

struct TimestampVisitor;

impl Visitor<'_> for TimestampVisitor {
    type Value = Timestamp;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("an ISO-8601 date string or epoch milliseconds")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Timestamp, E> {
        value
            .parse::<Timestamp>()
            .map_err(|err| E::custom(format!("invalid date `{value}`: {err}")))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Timestamp, E> {
        Timestamp::from_millis(value)
            .ok_or_else(|| E::custom(format!("date {value} is out of range")))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Timestamp, E> {
        i64::try_from(value)
            .map_err(|_| E::custom(format!("date {value} is out of range")))
            .and_then(|millis| self.visit_i64(millis))
    }
}

#[cfg(test)]
mod tests {
    use super::Timestamp;

    #[test]
    fn serializes_as_iso_string_with_milliseconds() {
        let value = Timestamp::from_millis(1_748_772_000_000).unwrap();
        assert_eq!(
            serde_json::to_value(value).unwrap(),
            serde_json::json!("2025-06-01T10:00:00.000Z")
        );
    }

    #[test]
    fn parses_iso_strings_with_any_offset() {
        let utc: Timestamp = serde_json::from_str(r#""2025-06-01T10:00:00.000Z""#).unwrap();
        let shifted: Timestamp = serde_json::from_str(r#""2025-06-01T12:00:00+02:00""#).unwrap();
        assert_eq!(utc.as_millis(), 1_748_772_000_000);
        assert_eq!(shifted, utc);
    }

    #[test]
    fn accepts_epoch_milliseconds() {
        let value: Timestamp = serde_json::from_str("1748772000000").unwrap();
        assert_eq!(value.to_string(), "2025-06-01T10:00:00.000Z");
    }

    #[test]
    fn sub_millisecond_precision_is_truncated() {
        let value: Timestamp = serde_json::from_str(r#""2025-06-01T10:00:00.123456Z""#).unwrap();
        assert_eq!(value.to_string(), "2025-06-01T10:00:00.123Z");
    }

    #[test]
    fn rejects_non_dates() {
        assert!(serde_json::from_str::<Timestamp>(r#""next tuesday""#).is_err());
        assert!(serde_json::from_str::<Timestamp>("true").is_err());
    }
}
