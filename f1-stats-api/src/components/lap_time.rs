use lazy_static::lazy_static;
use log::warn;
use regex::Regex;

// Group 1: minutes (optional), group 2: seconds, group 3: fraction
const REGEX_LAP_TIME: &'static str = r#"^(?:(\d{1,3}):)?(\d{1,2})[.,](\d{1,3})$"#;

lazy_static! {
    static ref RE_LAP_TIME: Regex = Regex::new(REGEX_LAP_TIME).unwrap();
}

/// Parses a lap time like `1:23.456` into milliseconds.
pub fn parse(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let captures = match RE_LAP_TIME.captures(text) {
        Some(v) => v,
        None => {
            warn!("Not a lap time: {}", text);
            return None;
        }
    };

    let minutes: u32 = match captures.get(1) {
        Some(v) => v.as_str().parse().ok()?,
        None => 0,
    };
    let seconds: u32 = captures[2].parse().ok()?;
    // scale .4 and .45 up to milliseconds
    let fraction = &captures[3];
    let millis: u32 = fraction.parse::<u32>().ok()? * 10u32.pow(3 - fraction.len() as u32);

    Some(minutes * 60_000 + seconds * 1000 + millis)
}

#[test]
fn test_lap_time() {
    assert_eq!(parse("1:23.456"), Some(83456));
    assert_eq!(parse("1:07.281"), Some(67281));
    assert_eq!(parse("59.9"), Some(59900));
    assert_eq!(parse(" 1:41,25 "), Some(101250));
    assert_eq!(parse(""), None);
    assert_eq!(parse("DNF"), None);
    assert_eq!(parse("999:59.999"), Some(59_999_999));
    assert_eq!(parse("99999:00.000"), None);
}
