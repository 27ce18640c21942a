//! Long-form date parser.
//!
//! Accepts the shape produced by the `llll` and `LLLL` renderings, plus the compact
//! form with a bare month name:
//!
//! - `3:45pm, Avandæ, 2nd of Gathering, 12QS`
//! - `3:45pm, Avandæ, 2nd of Gat, 12QS`
//! - `3:45pm, Avandæ, 2nd of the Month of Gathering, 12 Quarried Stone`
//!
//! In a dual-age year (`332FH/1QS`) only the first age is read; both name the same year.

use regex_lite::Regex;
use std::sync::LazyLock;

use crate::calendar::CalendarDefinition;
use crate::error::CalendarError;

// hour, minute, meridiem, weekday, date (ordinal suffix dropped), month, year, age
static LONG_FORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^\s*(\d{1,2}):(\d{2})(am|pm),",
        r"\s*([^,]+?),",
        r"\s*(\d+)[A-Za-z]{2}\s+of\s+([^,]+?),",
        r"\s*(-?\d+)\s*([^/]+?)\s*(?:/.*)?$",
    ))
    .expect("valid regex")
});

const MONTH_PHRASE_PREFIX: &str = "the month of ";

/// Parse a long-form date into a timestamp.
pub(crate) fn parse_timestamp(
    text: &str,
    calendar: &CalendarDefinition,
) -> Result<i64, CalendarError> {
    let caps = LONG_FORM_RE.captures(text).ok_or_else(|| {
        CalendarError::parse(format!("Unrecognized date format: '{}'", text))
    })?;

    let invalid = |what: &str, value: &str| {
        CalendarError::parse(format!("{} '{}' in '{}'", what, value, text))
    };

    let hour: i64 = caps[1].parse().map_err(|_| invalid("Invalid hour", &caps[1]))?;
    if !(1..=12).contains(&hour) {
        return Err(invalid("Hour out of range", &caps[1]));
    }
    let minute: i64 = caps[2].parse().map_err(|_| invalid("Invalid minute", &caps[2]))?;
    if minute >= i64::from(calendar.units().minutes_per_hour) {
        return Err(invalid("Minute out of range", &caps[2]));
    }
    let hour = match &caps[3] {
        "pm" => hour % 12 + 12,
        _ => hour % 12,
    };

    let weekday = calendar
        .weekday_index(&caps[4])
        .ok_or_else(|| invalid("Unknown weekday", &caps[4]))?;

    let date: i64 = caps[5].parse().map_err(|_| invalid("Invalid date", &caps[5]))?;
    if !(1..=i64::from(calendar.units().days_per_month)).contains(&date) {
        return Err(invalid("Date out of range", &caps[5]));
    }

    let month_text = strip_prefix_ignore_case(&caps[6], MONTH_PHRASE_PREFIX);
    let month = calendar
        .month_index(month_text)
        .ok_or_else(|| invalid("Unknown month", &caps[6]))?;

    let year: i64 = caps[7].parse().map_err(|_| invalid("Invalid year", &caps[7]))?;
    let age = calendar
        .age(&caps[8])
        .ok_or_else(|| invalid("Unknown age", &caps[8]))?;

    let timestamp = i128::from(age.start())
        + i128::from(calendar.seconds_in_year()) * (i128::from(year) - 1)
        + i128::from(calendar.seconds_in_month()) * month as i128
        + i128::from(calendar.seconds_in_day()) * i128::from(date - 1)
        + i128::from(calendar.seconds_in_hour()) * i128::from(hour)
        + i128::from(calendar.seconds_in_minute()) * i128::from(minute);
    let timestamp =
        i64::try_from(timestamp).map_err(|_| invalid("Year out of range", &caps[7]))?;

    let expected_weekday = (date as usize - 1) % calendar.weekdays().len();
    if weekday != expected_weekday {
        tracing::warn!(
            input = %text,
            weekday = %&caps[4],
            expected = %calendar.weekdays()[expected_weekday],
            "Weekday does not match date, ignoring weekday"
        );
    }

    tracing::debug!(input = %text, timestamp, age = %age.name(), "Parsed date");
    Ok(timestamp)
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> &'a str {
    match text.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &text[prefix.len()..],
        _ => text,
    }
}
