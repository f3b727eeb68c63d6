//! UTC timestamps with millisecond precision.

use std::fmt;

use chrono::{DateTime, Duration, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A UTC instant rendered as RFC 3339 with milliseconds and a `Z` suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Truncate to whole milliseconds so the value survives a text round-trip.
    pub fn from_datetime(at: DateTime<Utc>) -> Self {
        let millis = at.timestamp_millis();
        Self(Utc.timestamp_millis_opt(millis).single().unwrap_or(at))
    }

    /// Build from milliseconds since the Unix epoch.
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    pub fn now() -> Self {
        Self::from_datetime(Utc::now())
    }

    pub fn as_datetime(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn to_rfc3339(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    /// `self` when it is later than `previous`, otherwise one millisecond
    /// past `previous`.
    pub fn strictly_after(self, previous: Timestamp) -> Self {
        if self > previous {
            return self;
        }
        previous
            .0
            .checked_add_signed(Duration::milliseconds(1))
            .map(Self)
            .unwrap_or(previous)
    }

    pub fn parse(text: &str) -> Result<Self, chrono::ParseError> {
        let parsed = DateTime::parse_from_rfc3339(text)?;
        Ok(Self::from_datetime(parsed.with_timezone(&Utc)))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Timestamp::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Source of "now" for the operation handlers.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renders_millis_with_z_suffix() {
        let ts = Timestamp::from_millis(1_714_564_800_123).unwrap();
        assert_eq!(ts.to_rfc3339(), "2024-05-01T12:00:00.123Z");
    }

    #[test]
    fn test_truncates_sub_millisecond_precision() {
        let at = Utc.timestamp_opt(1_714_564_800, 123_456_789).unwrap();
        let ts = Timestamp::from_datetime(at);
        assert_eq!(ts.to_rfc3339(), "2024-05-01T12:00:00.123Z");
        assert_eq!(Timestamp::parse(&ts.to_rfc3339()).unwrap(), ts);
    }

    #[test]
    fn test_parse_normalizes_offsets_to_utc() {
        let ts = Timestamp::parse("2024-05-01T14:00:00.500+02:00").unwrap();
        assert_eq!(ts.to_string(), "2024-05-01T12:00:00.500Z");
    }

    #[test]
    fn test_strictly_after() {
        let earlier = Timestamp::from_millis(5_000).unwrap();
        let later = Timestamp::from_millis(10_000).unwrap();

        assert_eq!(later.strictly_after(earlier), later);
        assert_eq!(
            later.strictly_after(later),
            Timestamp::from_millis(10_001).unwrap()
        );
        assert_eq!(
            earlier.strictly_after(later),
            Timestamp::from_millis(10_001).unwrap()
        );
    }

    #[test]
    fn test_serde_uses_string_form() {
        let ts = Timestamp::from_millis(0).unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"1970-01-01T00:00:00.000Z\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
        assert!(serde_json::from_str::<Timestamp>("\"yesterday\"").is_err());
    }
}
