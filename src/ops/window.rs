use std::sync::LazyLock;

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use regex::Regex;

use crate::error::ConfigError;
use crate::model::window::ReportWindow;

static CLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})$").expect("static regex"));

/// Parse a wall-clock `HH:MM` (a single-digit hour is accepted).
pub fn parse_clock_time(raw: &str) -> Result<NaiveTime, ConfigError> {
    let trimmed = raw.trim();
    let caps = CLOCK_RE
        .captures(trimmed)
        .ok_or_else(|| ConfigError::InvalidTime(raw.to_string()))?;
    let hour: u32 = caps[1]
        .parse()
        .map_err(|_| ConfigError::InvalidTime(raw.to_string()))?;
    let minute: u32 = caps[2]
        .parse()
        .map_err(|_| ConfigError::InvalidTime(raw.to_string()))?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| ConfigError::TimeOutOfRange(raw.to_string()))
}

/// Parse a calendar date `YYYY-MM-DD`.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ConfigError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ConfigError::InvalidDate(raw.to_string()))
}

/// Pin a local wall-clock time on `date` to an instant in `tz`.
///
/// Ambiguous times (DST fall-back) take the earlier instant.
fn localize<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>, ConfigError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => Err(ConfigError::NonexistentTime(
            naive.format("%Y-%m-%d %H:%M").to_string(),
        )),
    }
}

/// Build the report window for `date` in `tz`.
///
/// `start` is required. Without `end`, the window runs up to `now` when
/// `date` is today, and to 23:59:59 otherwise.
pub fn resolve_window<Tz: TimeZone>(
    tz: &Tz,
    date: NaiveDate,
    start: Option<&str>,
    end: Option<&str>,
    now: DateTime<Tz>,
) -> Result<ReportWindow, ConfigError> {
    let start = start.ok_or(ConfigError::MissingStart)?;
    let start_time = parse_clock_time(start)?;
    let end_time = end.map(parse_clock_time).transpose()?;

    let local_start = localize(tz, date.and_time(start_time))?;
    let local_end = match end_time {
        Some(t) => localize(tz, date.and_time(t))?,
        None if now.date_naive() == date => now,
        None => {
            let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
            localize(tz, date.and_time(end_of_day))?
        }
    };

    tracing::info!(
        "Interpreting input time '{}' as UTC{}",
        start,
        local_start.fixed_offset().offset()
    );

    let window = ReportWindow {
        local_start: local_start.fixed_offset(),
        local_end: local_end.fixed_offset(),
    };
    if window.local_start > window.local_end {
        tracing::warn!(
            start = %window.local_start,
            end = %window.local_end,
            "window start is after its end; no changes can match"
        );
    }
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn clock_times() {
        assert_eq!(
            parse_clock_time("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_clock_time("9:05").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 0).unwrap()
        );
        assert_eq!(
            parse_clock_time("23:59").unwrap(),
            NaiveTime::from_hms_opt(23, 59, 0).unwrap()
        );
    }

    #[test]
    fn malformed_clock_times() {
        for bad in ["", "9", "09:3", "09-30", "nine", "09:30:00", "-1:00"] {
            match parse_clock_time(bad) {
                Err(ConfigError::InvalidTime(v)) => assert_eq!(v, bad),
                other => panic!("expected InvalidTime for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn out_of_range_clock_times() {
        for bad in ["24:00", "25:00", "12:60", "99:99"] {
            let err = parse_clock_time(bad).unwrap_err();
            assert!(matches!(err, ConfigError::TimeOutOfRange(_)), "{}", bad);
            assert!(err.to_string().contains(bad));
        }
    }

    #[test]
    fn dates() {
        assert_eq!(parse_date("2024-01-31").unwrap(), date(2024, 1, 31));
        assert!(matches!(
            parse_date("2024-02-30"),
            Err(ConfigError::InvalidDate(_))
        ));
        assert!(matches!(
            parse_date("01/31/2024"),
            Err(ConfigError::InvalidDate(_))
        ));
    }

    #[test]
    fn missing_start_is_an_error() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let err = resolve_window(&Utc, date(2024, 1, 1), None, Some("10:00"), now).unwrap_err();
        assert!(matches!(err, ConfigError::MissingStart));
    }

    #[test]
    fn bad_end_names_the_value() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let err =
            resolve_window(&Utc, date(2024, 1, 1), Some("09:00"), Some("17h"), now).unwrap_err();
        assert!(err.to_string().contains("17h"));
    }

    #[test]
    fn explicit_window() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let w = resolve_window(&Utc, date(2024, 1, 1), Some("09:00"), Some("17:00"), now).unwrap();
        let utc = w.utc();
        assert_eq!(utc.start, Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap());
        assert_eq!(utc.end, Utc.with_ymd_and_hms(2024, 1, 1, 17, 0, 0).unwrap());
    }

    #[test]
    fn end_defaults_to_now_for_today() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 34, 56).unwrap();
        let w = resolve_window(&Utc, date(2024, 1, 1), Some("09:00"), None, now).unwrap();
        assert_eq!(w.utc().end, now);
    }

    #[test]
    fn end_defaults_to_end_of_day_for_past_dates() {
        let now = Utc.with_ymd_and_hms(2024, 1, 5, 12, 0, 0).unwrap();
        let w = resolve_window(&Utc, date(2024, 1, 1), Some("09:00"), None, now).unwrap();
        assert_eq!(
            w.utc().end,
            Utc.with_ymd_and_hms(2024, 1, 1, 23, 59, 59).unwrap()
        );
    }

    #[test]
    fn local_offset_is_normalized_to_utc() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        let w = resolve_window(&tz, date(2024, 1, 1), Some("09:00"), Some("17:00"), now).unwrap();
        assert_eq!(
            w.utc().start,
            Utc.with_ymd_and_hms(2024, 1, 1, 14, 0, 0).unwrap()
        );
        assert_eq!(w.local_start.format("%H:%M").to_string(), "09:00");
        assert_eq!(w.date(), date(2024, 1, 1));
    }

    #[test]
    fn today_is_judged_in_local_time() {
        // 02:00 on Jan 2 in UTC is still Jan 1 at UTC-5
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = Utc
            .with_ymd_and_hms(2024, 1, 2, 2, 0, 0)
            .unwrap()
            .with_timezone(&tz);
        let w = resolve_window(&tz, date(2024, 1, 1), Some("09:00"), None, now).unwrap();
        assert_eq!(w.local_end, now);
    }
}
