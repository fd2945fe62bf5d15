//! Conversions between backend ISO timestamps and `datetime-local` inputs.
//!
//! The console edits dates through `<input type="datetime-local">`, which
//! carries no offset. Such values are read in the configured console
//! offset; values that already carry an offset keep it.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Offset, SecondsFormat, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses a timestamp, reading offset-less values in `offset`.
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS[.fff]]` (with `T` or a space),
/// and bare dates, which are taken as midnight in `offset`.
#[must_use]
pub fn parse_in_offset(value: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return offset
                .from_local_datetime(&naive)
                .single()
                .map(|dt| dt.with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .and_then(|naive| offset.from_local_datetime(&naive).single())
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parses a backend timestamp; offset-less values are UTC.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    parse_in_offset(value, Utc.fix())
}

/// Formats an instant the way the backend expects: `YYYY-MM-DDTHH:MM:SS.sssZ`.
#[must_use]
pub fn to_iso_string(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Converts a `datetime-local` value to a UTC ISO string.
///
/// Unparsable input is returned unchanged so the backend can reject it
/// with its own message.
#[must_use]
pub fn to_iso_string_from_local_input(value: &str, offset: FixedOffset) -> String {
    parse_in_offset(value, offset).map_or_else(|| value.to_string(), to_iso_string)
}

/// Converts an ISO timestamp to a `datetime-local` value (`YYYY-MM-DDTHH:MM`)
/// in `offset`. Missing or unparsable input gives an empty string.
#[must_use]
pub fn to_local_input_from_iso_string(value: Option<&str>, offset: FixedOffset) -> String {
    value
        .and_then(|v| parse_in_offset(v, offset))
        .map(|dt| dt.with_timezone(&offset).format("%Y-%m-%dT%H:%M").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn offset(secs: i32) -> FixedOffset {
        let Some(o) = FixedOffset::east_opt(secs) else {
            panic!("bad offset");
        };
        o
    }

    #[test]
    fn local_input_is_read_in_console_offset() {
        let tehran = offset(3 * 3600 + 1800);
        assert_eq!(
            to_iso_string_from_local_input("2024-05-01T10:30", tehran),
            "2024-05-01T07:00:00.000Z"
        );
    }

    #[test]
    fn offset_aware_input_keeps_its_offset() {
        assert_eq!(
            to_iso_string_from_local_input("2024-05-01T10:30:00+02:00", offset(0)),
            "2024-05-01T08:30:00.000Z"
        );
    }

    #[test]
    fn invalid_input_passes_through() {
        assert_eq!(to_iso_string_from_local_input("soon", offset(0)), "soon");
    }

    #[test]
    fn round_trip_recovers_local_input() {
        for secs in [0, 3600 * 5 + 1800, -3600 * 8] {
            let tz = offset(secs);
            let local = "2025-12-31T23:45";
            let iso = to_iso_string_from_local_input(local, tz);
            assert_eq!(to_local_input_from_iso_string(Some(&iso), tz), local);
        }
    }

    #[test]
    fn missing_or_invalid_iso_is_empty() {
        assert_eq!(to_local_input_from_iso_string(None, offset(0)), "");
        assert_eq!(to_local_input_from_iso_string(Some("nope"), offset(0)), "");
    }

    #[test]
    fn bare_date_is_utc_midnight() {
        let Some(dt) = parse_timestamp("2024-02-29") else {
            panic!("date should parse");
        };
        assert_eq!(to_iso_string(dt), "2024-02-29T00:00:00.000Z");
    }

    #[test]
    fn bare_date_is_midnight_in_console_offset() {
        assert_eq!(
            to_iso_string_from_local_input("2024-05-01", offset(3 * 3600 + 1800)),
            "2024-04-30T20:30:00.000Z"
        );
        assert_eq!(
            to_local_input_from_iso_string(Some("2024-05-01"), offset(-5 * 3600)),
            "2024-05-01T00:00"
        );
    }
}
