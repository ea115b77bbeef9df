//! Date and time helpers for bound variables and text-encoded columns.
//!
//! The tick constructors interpret UNIX seconds in the local time zone. The
//! parsers are lenient: anything malformed yields `None` rather than an error,
//! leaving the caller to decide whether a missing value is fatal.

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike};

/// Convert UNIX ticks into a local date.
pub fn date_from_ticks(ticks: i64) -> Option<NaiveDate> {
    timestamp_from_ticks(ticks).map(|dt| dt.date())
}

/// Convert UNIX ticks into a local time of day, truncated to whole seconds.
pub fn time_from_ticks(ticks: i64) -> Option<NaiveTime> {
    timestamp_from_ticks(ticks).and_then(|dt| dt.time().with_nanosecond(0))
}

/// Convert UNIX ticks into a local timestamp.
pub fn timestamp_from_ticks(ticks: i64) -> Option<NaiveDateTime> {
    Local
        .timestamp_opt(ticks, 0)
        .single()
        .map(|dt| dt.naive_local())
}

/// Parse `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let mut parts = s.trim().splitn(3, '-');
    let year = parts.next()?.parse().ok()?;
    let month = parts.next()?.parse().ok()?;
    let day = parts.next()?.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Parse `YYYY-MM-DD HH:MM:SS[.ffffff]`, also accepting `T` as the separator.
///
/// A bare date parses as midnight of that day; a malformed time part gives
/// `None`.
pub fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    let split = s.split_once(' ').or_else(|| s.split_once('T'));
    match split {
        Some((date, time)) => Some(parse_date(date)?.and_time(parse_time(time)?)),
        None => parse_date(s).and_then(|d| d.and_hms_opt(0, 0, 0)),
    }
}

/// Parse `HH:MM:SS[.ffffff]`.
pub fn parse_time(s: &str) -> Option<NaiveTime> {
    let (hours, minutes, seconds) = split_clock(s.trim())?;
    let (secs, micros) = parse_seconds(seconds)?;
    NaiveTime::from_hms_micro_opt(hours.parse().ok()?, minutes.parse().ok()?, secs, micros)
}

/// Parse a MySQL `TIME` column as a signed duration, e.g. `-838:59:59`.
pub fn parse_time_delta(s: &str) -> Option<TimeDelta> {
    let s = s.trim();
    let (negative, s) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let (hours, minutes, seconds) = split_clock(s)?;
    let (secs, micros) = parse_seconds(seconds)?;

    let delta = TimeDelta::try_hours(hours.parse().ok()?)?
        + TimeDelta::try_minutes(minutes.parse().ok()?)?
        + TimeDelta::try_seconds(i64::from(secs))?
        + TimeDelta::microseconds(i64::from(micros));

    Some(if negative { -delta } else { delta })
}

/// Format a date as `YYYY-MM-DD`.
pub fn format_date(d: &NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

/// Format a timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_datetime(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%d %H:%M:%S").to_string()
}

fn split_clock(s: &str) -> Option<(&str, &str, &str)> {
    let mut parts = s.split(':');
    let clock = (parts.next()?, parts.next()?, parts.next()?);
    match parts.next() {
        Some(_) => None,
        None => Some(clock),
    }
}

/// Split `SS[.ffffff]` into whole seconds and microseconds.
fn parse_seconds(s: &str) -> Option<(u32, u32)> {
    let (whole, fraction) = s.split_once('.').unwrap_or((s, ""));
    let secs = whole.parse().ok()?;
    if fraction.is_empty() {
        return Some((secs, 0));
    }
    if !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = &fraction[..fraction.len().min(6)];
    let scale = 10u32.pow(6 - digits.len() as u32);
    Some((secs, digits.parse::<u32>().ok()? * scale))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2012-03-04"), NaiveDate::from_ymd_opt(2012, 3, 4));
        assert_eq!(parse_date("2012-13-04"), None);
        assert_eq!(parse_date("2012-03"), None);
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_parse_datetime_separators() {
        let expected = NaiveDate::from_ymd_opt(2012, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        assert_eq!(parse_datetime("2012-03-04 05:06:07"), Some(expected));
        assert_eq!(parse_datetime("2012-03-04T05:06:07"), Some(expected));
    }

    #[test]
    fn test_parse_datetime_bare_date_is_midnight() {
        let expected = NaiveDate::from_ymd_opt(2012, 3, 4)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_datetime("2012-03-04"), Some(expected));
    }

    #[test]
    fn test_parse_datetime_bad_time_part() {
        assert_eq!(parse_datetime("2012-03-04 xx:06:07"), None);
        assert_eq!(parse_datetime("2012-03-04T05:06"), None);
    }

    #[test]
    fn test_parse_time_fraction() {
        assert_eq!(
            parse_time("10:20:30.5"),
            NaiveTime::from_hms_micro_opt(10, 20, 30, 500_000)
        );
        assert_eq!(
            parse_time("10:20:30.1234567"),
            NaiveTime::from_hms_micro_opt(10, 20, 30, 123_456)
        );
        assert_eq!(parse_time("10:20"), None);
        assert_eq!(parse_time("10:20:30:40"), None);
    }

    #[test]
    fn test_parse_time_delta_negative_and_long() {
        let delta = parse_time_delta("-838:59:59").unwrap();
        assert_eq!(delta.num_seconds(), -(838 * 3600 + 59 * 60 + 59));

        let delta = parse_time_delta("25:00:00.25").unwrap();
        assert_eq!(delta.num_milliseconds(), 25 * 3_600_000 + 250);
    }

    #[test]
    fn test_ticks_round_trip_through_local_time() {
        let ts = timestamp_from_ticks(1_000_000_000).unwrap();
        assert_eq!(date_from_ticks(1_000_000_000), Some(ts.date()));
        assert_eq!(time_from_ticks(1_000_000_000), Some(ts.time()));
    }

    #[test]
    fn test_format() {
        let dt = NaiveDate::from_ymd_opt(2012, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        assert_eq!(format_date(&dt.date()), "2012-03-04");
        assert_eq!(format_datetime(&dt), "2012-03-04 05:06:07");
    }
}
