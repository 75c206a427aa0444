use chrono::{DateTime, NaiveDateTime, Utc};

/// `yyyy-MM-dd'T'HH:mm:ss'Z'`, always UTC, second precision.
pub const ISO_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn to_iso_string(instant: &DateTime<Utc>) -> String {
    instant.format(ISO_DATE_TIME_FORMAT).to_string()
}

pub fn from_iso_string(src: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(src, ISO_DATE_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn renders_second_precision_utc() {
        let instant = Utc.with_ymd_and_hms(2017, 3, 9, 7, 5, 1).unwrap()
            + chrono::TimeDelta::milliseconds(987);
        assert_eq!(to_iso_string(&instant), "2017-03-09T07:05:01Z");
    }

    #[test]
    fn parses_what_it_renders() {
        let instant = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(from_iso_string(&to_iso_string(&instant)), Some(instant));
        assert_eq!(from_iso_string("1999-12-31 23:59:59"), None);
    }
}
