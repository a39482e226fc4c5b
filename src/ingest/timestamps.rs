/// Begin-time parsing for storm event rows.
///
/// The BEGIN_DATE_TIME column has no single format across the 1980–2024
/// files: NOAA exports use `03-MAY-01 14:00:00`, re-saved copies use ISO
/// or US month/day ordering, and some rows carry only a date. The parser
/// tries each known layout in turn and gives up with `None`, which callers
/// treat as a silently dropped row.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

/// Date-and-time layouts, most common first.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M:%S %p",
    "%m/%d/%Y %I:%M %p",
    "%d-%b-%y %H:%M:%S",
    "%d-%b-%y %H:%M",
    "%d-%b-%Y %H:%M:%S",
    "%d-%b-%Y %H:%M",
];

/// Date-only layouts; midnight is assumed.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%b-%y", "%d-%b-%Y"];

/// Parses a begin-time value, returning `None` when no layout matches.
///
/// Offsets in RFC 3339 input are dropped; the local wall-clock time is kept
/// so the calendar year matches what the source recorded.
pub fn parse_begin_time(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .map(|d| d.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn ymd_hm(raw: &str) -> (i32, u32, u32, u32, u32) {
        let dt = parse_begin_time(raw).unwrap_or_else(|| panic!("{raw:?} should parse"));
        (dt.year(), dt.month(), dt.day(), dt.hour(), dt.minute())
    }

    #[test]
    fn test_iso_layouts() {
        assert_eq!(ymd_hm("2001-05-03 14:00"), (2001, 5, 3, 14, 0));
        assert_eq!(ymd_hm("2001-05-03 14:00:59"), (2001, 5, 3, 14, 0));
        assert_eq!(ymd_hm("2001-05-03T14:30:00"), (2001, 5, 3, 14, 30));
        assert_eq!(ymd_hm("2001/05/03 14:30"), (2001, 5, 3, 14, 30));
    }

    #[test]
    fn test_rfc3339_keeps_local_wall_clock() {
        assert_eq!(ymd_hm("2001-12-31T23:30:00-06:00"), (2001, 12, 31, 23, 30));
    }

    #[test]
    fn test_us_month_first_layouts() {
        assert_eq!(ymd_hm("5/3/2001 14:00"), (2001, 5, 3, 14, 0));
        assert_eq!(ymd_hm("05/03/2001 14:00:00"), (2001, 5, 3, 14, 0));
        assert_eq!(ymd_hm("05/03/2001 02:15 PM"), (2001, 5, 3, 14, 15));
    }

    #[test]
    fn test_noaa_layout_with_two_digit_year() {
        assert_eq!(ymd_hm("03-MAY-01 14:00:00"), (2001, 5, 3, 14, 0));
        assert_eq!(ymd_hm("28-APR-84 16:45:00"), (1984, 4, 28, 16, 45));
    }

    #[test]
    fn test_date_only_is_midnight() {
        assert_eq!(ymd_hm("2024-06-01"), (2024, 6, 1, 0, 0));
        assert_eq!(ymd_hm("6/1/2024"), (2024, 6, 1, 0, 0));
    }

    #[test]
    fn test_garbage_is_none() {
        for raw in ["", "   ", "not a date", "2001-13-45 10:00", "14:00", "2001"] {
            assert!(parse_begin_time(raw).is_none(), "{raw:?} should not parse");
        }
    }
}
