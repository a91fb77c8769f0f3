use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

pub mod logging;

/// Row date, e.g. "Mar 18".
pub const EVENT_DATE_FORMAT: &str = "%b %d";
/// Row time, e.g. "10:30".
pub const EVENT_TIME_FORMAT: &str = "%H:%M";
/// Form date field, e.g. "19/03/18 10:30".
pub const FORM_DATE_FORMAT: &str = "%y/%m/%d %H:%M";

lazy_static! {
    static ref PRICE_RE: Regex = Regex::new(r"^\d{1,9}$").expect("price pattern is valid");
}

pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "45M", "02H 05M" or "01D 02H 30M" depending on length.
pub fn format_duration(duration: Duration) -> String {
    let total = duration.num_minutes().max(0);
    let days = total / (24 * 60);
    let hours = (total / 60) % 24;
    let minutes = total % 60;

    if days > 0 {
        format!("{:02}D {:02}H {:02}M", days, hours, minutes)
    } else if hours > 0 {
        format!("{:02}H {:02}M", hours, minutes)
    } else {
        format!("{:02}M", minutes)
    }
}

pub fn format_form_date(date: DateTime<Utc>) -> String {
    date.format(FORM_DATE_FORMAT).to_string()
}

pub fn parse_form_date(text: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(text.trim(), FORM_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

pub fn parse_price(text: &str) -> Option<u32> {
    let text = text.trim();
    if !PRICE_RE.is_match(text) {
        return None;
    }
    text.parse().ok()
}
