use chrono::{DateTime, Local, NaiveDateTime};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a server timestamp into local wall-clock time.
///
/// Timestamps without an offset are already local wall time; timestamps with
/// an offset are converted to the local zone.
pub fn parse_local_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn naive_timestamps_keep_wall_clock() {
        let parsed = parse_local_timestamp("2024-01-01T08:15:00").unwrap();
        assert_eq!(parsed.hour(), 8);
        assert_eq!(parsed.minute(), 15);

        let parsed = parse_local_timestamp("2024-01-01 23:00:00.250").unwrap();
        assert_eq!(parsed.hour(), 23);

        let parsed = parse_local_timestamp("2024-01-01T06:30").unwrap();
        assert_eq!(parsed.hour(), 6);
    }

    #[test]
    fn offset_timestamps_are_converted() {
        let parsed = parse_local_timestamp("2024-01-01T08:15:00Z").unwrap();
        let expected = DateTime::parse_from_rfc3339("2024-01-01T08:15:00Z")
            .unwrap()
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_local_timestamp("").is_none());
        assert!(parse_local_timestamp("not a date").is_none());
        assert!(parse_local_timestamp("2024-13-45T99:00:00").is_none());
    }
}
