use chrono::{DateTime, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Today's calendar date in the given time zone.
///
/// # Examples
///
/// ```
/// use sports_digest::data_fetcher::processors::today_in_zone;
///
/// let today = today_in_zone(chrono_tz::America::New_York);
/// println!("Digest date: {today}");
/// ```
pub fn today_in_zone(tz: Tz) -> NaiveDate {
    today_in_zone_at(tz, Utc::now())
}

/// Deterministic helper for [`today_in_zone`] that takes the current instant.
pub fn today_in_zone_at(tz: Tz, now_utc: DateTime<Utc>) -> NaiveDate {
    now_utc.with_timezone(&tz).date_naive()
}

/// Parses the provider's time-of-day field.
///
/// Accepts `HH:MM`, `HH:MM:SS` and `HH:MM:SS+00:00`. Returns `None` for the
/// provider's "unknown time" sentinels (empty, `00:00`, `00:00:00`) so they are
/// never shown as midnight.
pub fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    let trimmed = raw.trim();
    let clock = trimmed
        .split(['+', 'Z'])
        .next()
        .unwrap_or_default()
        .trim();

    if clock.is_empty() || clock == "00:00" || clock == "00:00:00" {
        return None;
    }

    NaiveTime::parse_from_str(clock, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(clock, "%H:%M"))
        .ok()
}

/// Formats a UTC game time as a local clock time, e.g. `7:30 PM`.
///
/// The date is needed because the UTC time may fall on the previous or next
/// local day, and DST depends on it. Returns `None` when there is no genuine time.
pub fn format_local_time(date: NaiveDate, time_utc: Option<NaiveTime>, tz: Tz) -> Option<String> {
    let time_utc = time_utc?;
    let utc = match Utc.from_local_datetime(&date.and_time(time_utc)) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earliest, _) => earliest,
        LocalResult::None => return None,
    };
    Some(utc.with_timezone(&tz).format("%-I:%M %p").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::{Los_Angeles, New_York};
    use chrono_tz::Europe::Helsinki;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_in_zone_crosses_midnight() {
        // 03:30 UTC is still the previous evening in New York
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 3, 30, 0).unwrap();
        assert_eq!(today_in_zone_at(New_York, now), date(2026, 10, 18));
        assert_eq!(today_in_zone_at(Helsinki, now), date(2026, 10, 19));
    }

    #[test]
    fn test_parse_time_of_day_formats() {
        assert_eq!(parse_time_of_day("23:30:00"), NaiveTime::from_hms_opt(23, 30, 0));
        assert_eq!(parse_time_of_day("19:05"), NaiveTime::from_hms_opt(19, 5, 0));
        assert_eq!(
            parse_time_of_day("17:00:00+00:00"),
            NaiveTime::from_hms_opt(17, 0, 0)
        );
        assert_eq!(parse_time_of_day("not a time"), None);
    }

    #[test]
    fn test_unknown_time_sentinels_are_absent() {
        assert_eq!(parse_time_of_day(""), None);
        assert_eq!(parse_time_of_day("   "), None);
        assert_eq!(parse_time_of_day("00:00"), None);
        assert_eq!(parse_time_of_day("00:00:00"), None);
        assert_eq!(parse_time_of_day("00:00:00+00:00"), None);
    }

    #[test]
    fn test_format_local_time_converts_from_utc() {
        let time = NaiveTime::from_hms_opt(23, 30, 0);
        assert_eq!(
            format_local_time(date(2026, 10, 19), time, New_York).as_deref(),
            Some("7:30 PM")
        );
        assert_eq!(
            format_local_time(date(2026, 10, 19), time, Los_Angeles).as_deref(),
            Some("4:30 PM")
        );
    }

    #[test]
    fn test_format_local_time_respects_dst() {
        let time = NaiveTime::from_hms_opt(17, 0, 0);
        // EDT (UTC-4) in July, EST (UTC-5) in December
        assert_eq!(
            format_local_time(date(2026, 7, 1), time, New_York).as_deref(),
            Some("1:00 PM")
        );
        assert_eq!(
            format_local_time(date(2026, 12, 1), time, New_York).as_deref(),
            Some("12:00 PM")
        );
    }

    #[test]
    fn test_format_local_time_without_time() {
        assert_eq!(format_local_time(date(2026, 10, 19), None, New_York), None);
    }
}
