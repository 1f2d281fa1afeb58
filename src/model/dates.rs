//! Serde helpers for calendar dates sent by the API.
//!
//! The server emits either plain `YYYY-MM-DD` dates or full RFC 3339
//! timestamps (`2026-03-01T00:00:00.000Z`) depending on the column type.
//! Both decode to a [`NaiveDate`]; dates always encode as `YYYY-MM-DD`.

use chrono::{DateTime, NaiveDate};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a date or timestamp string into its calendar date.
pub fn parse_api_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Some(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    // Timestamps without an offset, e.g. "2026-03-01T00:00:00"
    s.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, DATE_FORMAT).ok())
}

/// `#[serde(with = "dates::optional")]` for `Option<NaiveDate>` fields.
pub mod optional {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(super::DATE_FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        match raw {
            None => Ok(None),
            Some(s) if s.trim().is_empty() => Ok(None),
            Some(s) => super::parse_api_date(&s)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid date '{}'", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, with = "optional")]
        due: Option<NaiveDate>,
    }

    #[test]
    fn parses_plain_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2026, 3, 1);
        assert_eq!(parse_api_date("2026-03-01"), expected);
        assert_eq!(parse_api_date("2026-03-01T00:00:00.000Z"), expected);
        assert_eq!(parse_api_date("2026-03-01T09:30:00"), expected);
        assert_eq!(parse_api_date("not a date"), None);
    }

    #[test]
    fn null_missing_and_empty_are_none() {
        let h: Holder = serde_json::from_str(r#"{"due": null}"#).unwrap();
        assert!(h.due.is_none());
        let h: Holder = serde_json::from_str("{}").unwrap();
        assert!(h.due.is_none());
        let h: Holder = serde_json::from_str(r#"{"due": ""}"#).unwrap();
        assert!(h.due.is_none());
    }

    #[test]
    fn rejects_garbage() {
        assert!(serde_json::from_str::<Holder>(r#"{"due": "soon"}"#).is_err());
    }
}
