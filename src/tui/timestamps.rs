use chrono::{DateTime, Datelike, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;

/// Age column text for an entry run at `timestamp`, as seen at `now`.
///
/// Within a week the age is relative (`45m ago`, `3h ago`, `5d ago`); older entries
/// show the date, with the year only when it differs from `now`'s. Timestamps ahead of
/// `now` read as `just now`.
pub fn format_age(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*timestamp).num_seconds();

    match elapsed {
        s if s < MINUTE => "just now".to_string(),
        s if s < HOUR => format!("{}m ago", s / MINUTE),
        s if s < DAY => format!("{}h ago", s / HOUR),
        s if s < WEEK => format!("{}d ago", s / DAY),
        _ if timestamp.year() == now.year() => timestamp.format("%b %-d").to_string(),
        _ => timestamp.format("%b %-d, %Y").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 12, 31, 12, 0, 0).unwrap()
    }

    fn age_of(delta: Duration) -> String {
        format_age(&(now() - delta), &now())
    }

    #[test]
    fn test_relative_ages() {
        assert_eq!(age_of(Duration::seconds(30)), "just now");
        assert_eq!(age_of(Duration::minutes(45)), "45m ago");
        assert_eq!(age_of(Duration::hours(3)), "3h ago");
        assert_eq!(age_of(Duration::days(5)), "5d ago");
    }

    #[test]
    fn test_boundaries_round_down() {
        assert_eq!(age_of(Duration::seconds(59)), "just now");
        assert_eq!(age_of(Duration::minutes(60)), "1h ago");
        assert_eq!(age_of(Duration::hours(23) + Duration::minutes(59)), "23h ago");
        assert_eq!(age_of(Duration::days(6) + Duration::hours(23)), "6d ago");
    }

    #[test]
    fn test_clock_skew_reads_as_just_now() {
        assert_eq!(age_of(-Duration::hours(2)), "just now");
    }

    #[test]
    fn test_week_and_older_show_date() {
        assert_eq!(age_of(Duration::days(7)), "Dec 24");
        let last_year = Utc.with_ymd_and_hms(2023, 12, 3, 9, 30, 0).unwrap();
        assert_eq!(format_age(&last_year, &now()), "Dec 3, 2023");
    }

    #[test]
    fn test_dates_fit_the_age_column() {
        let longest = Utc.with_ymd_and_hms(2023, 12, 31, 0, 0, 0).unwrap();
        assert!(format_age(&longest, &now()).chars().count() <= 12);
    }
}
