use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Qualifying is only worth requesting for races from a week ago up to a
/// month ahead.
pub fn should_fetch_qualifying(race_date: &str, now: DateTime<Utc>) -> bool {
    let race = match NaiveDate::parse_from_str(race_date, "%Y-%m-%d")
        .ok()
        .and_then(|v| v.and_hms_opt(0, 0, 0))
    {
        Some(v) => v,
        None => {
            log::warn!("Invalid race date {}", race_date);
            return false;
        }
    };

    let diff = Utc.from_utc_datetime(&race) - now;
    let days = diff.num_milliseconds().div_euclid(1000 * 60 * 60 * 24);

    (-7..=30).contains(&days)
}

pub fn parse_utc_date_time(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(v) = DateTime::parse_from_rfc3339(text) {
        return Some(v.with_timezone(&Utc));
    }

    // no offset, assume UTC
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S")
        .ok()
        .map(|v| Utc.from_utc_datetime(&v))
}

pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
