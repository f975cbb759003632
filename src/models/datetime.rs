use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parses an ISO-8601 timestamp. Timestamps without an offset are taken as UTC,
/// which is what the bot sends (`datetime.utcnow().isoformat()`).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime format: {raw}")))
}

pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid datetime format: {raw}"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn accepts_offset_and_naive_timestamps() {
        let expected = Utc.with_ymd_and_hms(2021, 6, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2021-06-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2021-06-01T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2021-06-01T12:30:00"), Some(expected));
        assert!(parse_timestamp("2021-06-01T12:30:00.123456").is_some());
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
