//! Small shared utilities

/// Current instant as Unix milliseconds (audit columns)
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Parse a `YYYY-MM-DD` date string
pub fn parse_date(s: &str) -> Option<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Parse an `HH:MM` time-of-day string
pub fn parse_hhmm(s: &str) -> Option<chrono::NaiveTime> {
    chrono::NaiveTime::parse_from_str(s, "%H:%M").ok()
}

/// Serde adapter: `NaiveTime` as `"HH:MM"` on the wire
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(time: &NaiveTime, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(de)?;
        super::parse_hhmm(&s)
            .ok_or_else(|| de::Error::custom(format!("invalid HH:MM time: {s}")))
    }
}

/// Serde adapter: `Option<NaiveTime>` as `"HH:MM"` on the wire
pub mod hhmm_option {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, ser: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => ser.serialize_some(&t.format("%H:%M").to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<NaiveTime>, D::Error> {
        let opt = Option::<String>::deserialize(de)?;
        match opt {
            None => Ok(None),
            Some(s) => super::parse_hhmm(&s)
                .map(Some)
                .ok_or_else(|| de::Error::custom(format!("invalid HH:MM time: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;
    use serde::{Deserialize, Serialize};

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-06-01"),
            chrono::NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(parse_date("2024-13-01"), None);
        assert_eq!(parse_date("01/06/2024"), None);
    }

    #[test]
    fn test_parse_hhmm() {
        assert_eq!(parse_hhmm("09:30"), NaiveTime::from_hms_opt(9, 30, 0));
        assert_eq!(parse_hhmm("24:00"), None);
        assert_eq!(parse_hhmm("0930"), None);
    }

    #[derive(Serialize, Deserialize)]
    struct Window {
        #[serde(with = "crate::util::hhmm")]
        start: NaiveTime,
        #[serde(with = "crate::util::hhmm_option")]
        end: Option<NaiveTime>,
    }

    #[test]
    fn test_hhmm_roundtrip() {
        let w: Window = serde_json::from_str(r#"{"start":"08:00","end":"16:30"}"#).unwrap();
        assert_eq!(w.start, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(w.end, NaiveTime::from_hms_opt(16, 30, 0));
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, r#"{"start":"08:00","end":"16:30"}"#);
    }

    #[test]
    fn test_hhmm_rejects_seconds() {
        let res: Result<Window, _> =
            serde_json::from_str(r#"{"start":"08:00:00","end":null}"#);
        assert!(res.is_err());
    }
}
