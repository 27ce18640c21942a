//! The Odreian date value
//!
//! `OdreianDate` wraps a single timestamp (seconds since the start of the First
//! Histories) and derives every calendar field from it on demand. Residues use
//! floor-mod, so timestamps before zero count backwards through the same cycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use crate::calendar::{Age, CalendarDefinition};
use crate::error::CalendarError;
use crate::format::{ordinal, FormatToken, Template};

static ODREIAN: LazyLock<Arc<CalendarDefinition>> =
    LazyLock::new(|| Arc::new(CalendarDefinition::odreian()));

/// Shared handle to the built-in Odreian calendar.
pub fn odreian_calendar() -> Arc<CalendarDefinition> {
    Arc::clone(&ODREIAN)
}

/// A year number within one age
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeYear<'a> {
    /// 1-indexed year counted from the age's start
    pub year: i64,
    pub age: &'a Age,
}

/// An instant in the Odreian calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub struct OdreianDate {
    timestamp: i64,
    calendar: Arc<CalendarDefinition>,
}

impl OdreianDate {
    /// Create a date in the built-in Odreian calendar. Any timestamp is valid.
    pub fn new(timestamp: i64) -> Self {
        Self::with_calendar(timestamp, odreian_calendar())
    }

    /// Create a date read against an alternate calendar.
    pub fn with_calendar(timestamp: i64, calendar: Arc<CalendarDefinition>) -> Self {
        Self {
            timestamp,
            calendar,
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn calendar(&self) -> &CalendarDefinition {
        &self.calendar
    }

    // Ages and years

    /// Ages this instant belongs to: one, or two during the year an age shares
    /// with its predecessor.
    pub fn ages(&self) -> Vec<&Age> {
        let ages = self.calendar.ages();
        let current = ages
            .iter()
            .rposition(|a| a.start() <= self.timestamp)
            .unwrap_or(0);

        let shared_year = current > 0
            && ages[current].start() + self.calendar.seconds_in_year() > self.timestamp;
        if shared_year {
            vec![&ages[current - 1], &ages[current]]
        } else {
            vec![&ages[current]]
        }
    }

    /// Names of the ages this instant belongs to.
    pub fn age(&self) -> Vec<&str> {
        self.ages().into_iter().map(Age::name).collect()
    }

    /// Year within each age returned by [`ages`](Self::ages).
    pub fn year(&self) -> Vec<AgeYear<'_>> {
        let seconds_in_year = i128::from(self.calendar.seconds_in_year());
        self.ages()
            .into_iter()
            .map(|age| {
                let elapsed = i128::from(self.timestamp) - i128::from(age.start());
                let year = (1 + elapsed.div_euclid(seconds_in_year))
                    .clamp(i128::from(i64::MIN), i128::from(i64::MAX));
                AgeYear {
                    year: year as i64,
                    age,
                }
            })
            .collect()
    }

    // Residues and indices

    pub fn year_seconds(&self) -> i64 {
        self.timestamp.rem_euclid(self.calendar.seconds_in_year())
    }

    pub fn start_of_year(&self) -> i64 {
        self.timestamp - self.year_seconds()
    }

    /// Month of the year, 0-indexed.
    pub fn month_index(&self) -> usize {
        (self.year_seconds() / self.calendar.seconds_in_month()) as usize
    }

    pub fn month_seconds(&self) -> i64 {
        self.timestamp.rem_euclid(self.calendar.seconds_in_month())
    }

    pub fn start_of_month(&self) -> i64 {
        self.timestamp - self.month_seconds()
    }

    /// Date of the month, 0-indexed.
    pub fn date_index(&self) -> usize {
        (self.month_seconds() / self.calendar.seconds_in_day()) as usize
    }

    /// Day of the week, 0-indexed. Follows the date of the month, so every month
    /// starts on the first weekday.
    pub fn day_index(&self) -> usize {
        self.date_index() % self.calendar.weekdays().len()
    }

    pub fn day_seconds(&self) -> i64 {
        self.timestamp.rem_euclid(self.calendar.seconds_in_day())
    }

    pub fn start_of_day(&self) -> i64 {
        self.timestamp - self.day_seconds()
    }

    pub fn hour(&self) -> u32 {
        (self.day_seconds() / self.calendar.seconds_in_hour()) as u32
    }

    pub fn hour_seconds(&self) -> i64 {
        self.timestamp.rem_euclid(self.calendar.seconds_in_hour())
    }

    pub fn minute(&self) -> u32 {
        (self.hour_seconds() / self.calendar.seconds_in_minute()) as u32
    }

    pub fn second(&self) -> u32 {
        self.timestamp.rem_euclid(self.calendar.seconds_in_minute()) as u32
    }

    // Formatting

    /// Render a single token.
    pub fn token(&self, token: FormatToken) -> String {
        if let Some(pattern) = token.template() {
            return self.format(pattern);
        }

        match token {
            FormatToken::ShortYear => self
                .year()
                .iter()
                .map(|y| format!("{}{}", y.year, y.age.abbreviation()))
                .collect::<Vec<_>>()
                .join("/"),
            FormatToken::FullYear => self
                .year()
                .iter()
                .map(|y| format!("{} {}", y.year, y.age.name()))
                .collect::<Vec<_>>()
                .join("/"),
            FormatToken::MonthNumber => (self.month_index() + 1).to_string(),
            FormatToken::MonthOrdinal => ordinal(self.month_index() as i64 + 1),
            FormatToken::MonthName => self.month_name().to_string(),
            FormatToken::MonthAbbreviation => self
                .calendar
                .month_abbreviation(self.month_index())
                .unwrap_or_default()
                .to_string(),
            FormatToken::MonthPhrase => format!("the Month of {}", self.month_name()),
            FormatToken::Date => (self.date_index() + 1).to_string(),
            FormatToken::DateOrdinal => ordinal(self.date_index() as i64 + 1),
            FormatToken::WeekdayNumber => self.day_index().to_string(),
            FormatToken::WeekdayName => self.weekday_name().to_string(),
            FormatToken::Hour24 => self.hour().to_string(),
            FormatToken::Hour12 => {
                let hour = match self.hour() % 12 {
                    0 => 12,
                    h => h,
                };
                hour.to_string()
            }
            FormatToken::Meridiem => {
                let meridiem = if self.hour() >= 12 { "pm" } else { "am" };
                meridiem.to_string()
            }
            FormatToken::Minute => format!("{:02}", self.minute()),
            FormatToken::Second => format!("{:02}", self.second()),
            // Composite tokens returned above.
            _ => String::new(),
        }
    }

    /// Render a token by name; `None` if the name isn't a token.
    pub fn field(&self, name: &str) -> Option<String> {
        name.parse().ok().map(|token| self.token(token))
    }

    /// Render a `{TOKEN}` template, e.g. `"{dddd} the {Do}"`. Unknown tokens render empty.
    pub fn format(&self, pattern: &str) -> String {
        Template::new(pattern).render(|name| self.field(name))
    }

    pub fn month_name(&self) -> &str {
        self.calendar
            .months()
            .get(self.month_index())
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn weekday_name(&self) -> &str {
        self.calendar
            .weekdays()
            .get(self.day_index())
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// `YY`
    pub fn short_year(&self) -> String {
        self.token(FormatToken::ShortYear)
    }

    /// `YYYY`
    pub fn full_year(&self) -> String {
        self.token(FormatToken::FullYear)
    }

    /// `Mo`
    pub fn month_ordinal(&self) -> String {
        self.token(FormatToken::MonthOrdinal)
    }

    /// `MMMM`
    pub fn month_phrase(&self) -> String {
        self.token(FormatToken::MonthPhrase)
    }

    /// `Do`
    pub fn date_ordinal(&self) -> String {
        self.token(FormatToken::DateOrdinal)
    }

    /// `h`
    pub fn hour12(&self) -> String {
        self.token(FormatToken::Hour12)
    }

    /// `a`
    pub fn meridiem(&self) -> String {
        self.token(FormatToken::Meridiem)
    }

    /// `LT`
    pub fn time_short(&self) -> String {
        self.token(FormatToken::TimeShort)
    }

    /// `LTS`
    pub fn time_long(&self) -> String {
        self.token(FormatToken::TimeLong)
    }

    /// `l`
    pub fn date_short(&self) -> String {
        self.token(FormatToken::DateShort)
    }

    /// `ll`
    pub fn date_medium(&self) -> String {
        self.token(FormatToken::DateMedium)
    }

    /// `LL`
    pub fn date_long(&self) -> String {
        self.token(FormatToken::DateLong)
    }

    /// `lll`
    pub fn weekday_date_medium(&self) -> String {
        self.token(FormatToken::WeekdayDateMedium)
    }

    /// `LLL`
    pub fn weekday_date_long(&self) -> String {
        self.token(FormatToken::WeekdayDateLong)
    }

    /// `llll`
    pub fn datetime_medium(&self) -> String {
        self.token(FormatToken::DateTimeMedium)
    }

    /// `LLLL`
    pub fn datetime_long(&self) -> String {
        self.token(FormatToken::DateTimeLong)
    }

    // Parsing

    /// Parse a long-form date such as `"3:45pm, Avandæ, 2nd of Gathering, 12QS"`.
    ///
    /// Seconds are not part of the format, so parsing a rendered date yields the
    /// start of its minute.
    ///
    /// # Errors
    ///
    /// Returns `CalendarError::Parse` if the text doesn't have the long-form shape,
    /// names an unknown month, weekday or age, or holds an out-of-range field.
    pub fn parse(text: &str) -> Result<Self, CalendarError> {
        Self::parse_with_calendar(text, odreian_calendar())
    }

    /// Parse a long-form date against an alternate calendar.
    pub fn parse_with_calendar(
        text: &str,
        calendar: Arc<CalendarDefinition>,
    ) -> Result<Self, CalendarError> {
        let timestamp = crate::parse::parse_timestamp(text, &calendar)?;
        Ok(Self::with_calendar(timestamp, calendar))
    }
}

impl fmt::Display for OdreianDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.datetime_long())
    }
}

impl FromStr for OdreianDate {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<i64> for OdreianDate {
    fn from(timestamp: i64) -> Self {
        Self::new(timestamp)
    }
}

impl From<OdreianDate> for i64 {
    fn from(date: OdreianDate) -> i64 {
        date.timestamp
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{
        AGE_EPOCHS, SECONDS_IN_DAY, SECONDS_IN_HOUR, SECONDS_IN_MINUTE, SECONDS_IN_MONTH,
        SECONDS_IN_YEAR,
    };

    fn years(date: &OdreianDate) -> Vec<(i64, String)> {
        date.year()
            .iter()
            .map(|y| (y.year, y.age.name().to_string()))
            .collect()
    }

    mod fields {
        use super::*;

        #[test]
        fn timestamp_zero() {
            let date = OdreianDate::new(0);
            assert_eq!(date.age(), vec!["First Histories"]);
            assert_eq!(years(&date), vec![(1, "First Histories".to_string())]);
            assert_eq!(date.month_index(), 0);
            assert_eq!(date.month_name(), "Gathering");
            assert_eq!(date.date_index(), 0);
            assert_eq!(date.day_index(), 0);
            assert_eq!(date.weekday_name(), "Avandæ");
            assert_eq!(date.hour(), 0);
            assert_eq!(date.minute(), 0);
            assert_eq!(date.second(), 0);
            assert_eq!(date.short_year(), "1FH");
        }

        #[test]
        fn last_second_of_first_day() {
            let date = OdreianDate::new(SECONDS_IN_DAY - 1);
            assert_eq!(date.month_index(), 0);
            assert_eq!(date.date_index(), 0);
            assert_eq!(date.hour(), 23);
            assert_eq!(date.minute(), 59);
            assert_eq!(date.second(), 59);
        }

        #[test]
        fn weekday_follows_date_of_month() {
            let date = OdreianDate::new(7 * SECONDS_IN_DAY);
            assert_eq!(date.date_index(), 7);
            assert_eq!(date.day_index(), 1);
            assert_eq!(date.weekday_name(), "Coreldæ");

            let next_month = OdreianDate::new(SECONDS_IN_MONTH);
            assert_eq!(next_month.month_index(), 1);
            assert_eq!(next_month.date_index(), 0);
            assert_eq!(next_month.day_index(), 0);
        }

        #[test]
        fn last_day_of_year() {
            let date = OdreianDate::new(SECONDS_IN_YEAR - 1);
            assert_eq!(date.month_name(), "Frost");
            assert_eq!(date.date_index(), 29);
            assert_eq!(date.day_index(), 5);
            assert_eq!(years(&date), vec![(1, "First Histories".to_string())]);
        }

        #[test]
        fn starts_of_units() {
            let t = 3 * SECONDS_IN_YEAR + 4 * SECONDS_IN_MONTH + 5 * SECONDS_IN_DAY + 77;
            let date = OdreianDate::new(t);
            assert_eq!(date.start_of_year(), 3 * SECONDS_IN_YEAR);
            assert_eq!(date.start_of_month(), 3 * SECONDS_IN_YEAR + 4 * SECONDS_IN_MONTH);
            assert_eq!(date.start_of_day(), t - 77);
        }

        #[test]
        fn negative_timestamps_use_floor_mod() {
            let date = OdreianDate::new(-1);
            assert_eq!(date.age(), vec!["First Histories"]);
            assert_eq!(years(&date), vec![(0, "First Histories".to_string())]);
            assert_eq!(date.month_index(), 11);
            assert_eq!(date.date_index(), 29);
            assert_eq!(date.hour(), 23);
            assert_eq!(date.minute(), 59);
            assert_eq!(date.second(), 59);
            assert_eq!(date.start_of_year(), -SECONDS_IN_YEAR);
        }

        #[test]
        fn extreme_timestamps_are_total() {
            for t in [i64::MIN, i64::MAX] {
                let date = OdreianDate::new(t);
                assert!(date.second() < 60);
                assert!(date.hour() < 24);
                assert!(date.month_index() < 12);
                assert_eq!(date.year().len(), date.age().len());
                assert!(!date.datetime_long().is_empty());
            }
        }
    }

    mod ages {
        use super::*;

        #[test]
        fn dual_age_at_boundary() {
            let date = OdreianDate::new(AGE_EPOCHS[1]);
            assert_eq!(date.age(), vec!["First Histories", "Quarried Stone"]);
            assert_eq!(
                years(&date),
                vec![
                    (332, "First Histories".to_string()),
                    (1, "Quarried Stone".to_string())
                ]
            );
            assert_eq!(date.short_year(), "332FH/1QS");
        }

        #[test]
        fn dual_age_ends_after_one_year() {
            let last_shared = OdreianDate::new(AGE_EPOCHS[1] + SECONDS_IN_YEAR - 1);
            assert_eq!(last_shared.age().len(), 2);

            let after = OdreianDate::new(AGE_EPOCHS[1] + SECONDS_IN_YEAR);
            assert_eq!(after.age(), vec!["Quarried Stone"]);
            assert_eq!(after.short_year(), "2QS");
        }

        #[test]
        fn just_before_boundary_is_single_age() {
            let date = OdreianDate::new(AGE_EPOCHS[2] - 1);
            assert_eq!(date.age(), vec!["Quarried Stone"]);
            assert_eq!(years(&date), vec![(280, "Quarried Stone".to_string())]);
        }

        #[test]
        fn last_age_is_open_ended() {
            let date = OdreianDate::new(AGE_EPOCHS[5] + 10_000 * SECONDS_IN_YEAR);
            assert_eq!(date.age(), vec!["Nine Kings"]);
            assert_eq!(date.short_year(), "10001NK");
        }

        #[test]
        fn every_boundary_reports_both_ages() {
            let calendar = odreian_calendar();
            for pair in calendar.ages().windows(2) {
                let date = OdreianDate::new(pair[1].start());
                assert_eq!(date.age(), vec![pair[0].name(), pair[1].name()]);
                let year = date.year();
                assert_eq!(year[0].year, pair[0].years().unwrap() as i64);
                assert_eq!(year[1].year, 1);
            }
        }
    }

    mod tokens {
        use super::*;

        fn sample() -> OdreianDate {
            // 12th year of the Quarried Stone, 2nd of Dry, 3:45:07pm
            OdreianDate::new(
                AGE_EPOCHS[1]
                    + 11 * SECONDS_IN_YEAR
                    + SECONDS_IN_MONTH
                    + SECONDS_IN_DAY
                    + 15 * SECONDS_IN_HOUR
                    + 45 * SECONDS_IN_MINUTE
                    + 7,
            )
        }

        #[test]
        fn simple_tokens() {
            let date = sample();
            let expected = [
                ("YY", "12QS"),
                ("YYYY", "12 Quarried Stone"),
                ("M", "2"),
                ("Mo", "2nd"),
                ("MM", "Dry"),
                ("MMM", "Dry"),
                ("MMMM", "the Month of Dry"),
                ("D", "2"),
                ("Do", "2nd"),
                ("d", "1"),
                ("dddd", "Coreldæ"),
                ("H", "15"),
                ("h", "3"),
                ("a", "pm"),
                ("mm", "45"),
                ("ss", "07"),
            ];
            for (name, value) in expected {
                assert_eq!(date.field(name).unwrap(), value, "token {}", name);
            }
        }

        #[test]
        fn composite_tokens() {
            let date = sample();
            assert_eq!(date.time_short(), "3:45pm");
            assert_eq!(date.time_long(), "3:45:07pm");
            assert_eq!(date.date_short(), "2/2/12QS");
            assert_eq!(date.date_medium(), "2nd of Dry, 12QS");
            assert_eq!(date.date_long(), "2nd of the Month of Dry, 12 Quarried Stone");
            assert_eq!(date.weekday_date_medium(), "Coreldæ, 2nd of Dry, 12QS");
            assert_eq!(
                date.weekday_date_long(),
                "Coreldæ, 2nd of the Month of Dry, 12 Quarried Stone"
            );
            assert_eq!(date.datetime_medium(), "3:45pm, Coreldæ, 2nd of Dry, 12QS");
            assert_eq!(
                date.datetime_long(),
                "3:45pm, Coreldæ, 2nd of the Month of Dry, 12 Quarried Stone"
            );
            assert_eq!(date.to_string(), date.datetime_long());
        }

        #[test]
        fn twelve_hour_clock() {
            let midnight = OdreianDate::new(0);
            assert_eq!(midnight.hour12(), "12");
            assert_eq!(midnight.meridiem(), "am");

            let noon = OdreianDate::new(12 * SECONDS_IN_HOUR);
            assert_eq!(noon.hour12(), "12");
            assert_eq!(noon.meridiem(), "pm");

            let eleven = OdreianDate::new(23 * SECONDS_IN_HOUR);
            assert_eq!(eleven.hour12(), "11");
            assert_eq!(eleven.meridiem(), "pm");
        }

        #[test]
        fn month_abbreviation_in_medium_date() {
            let date = OdreianDate::new(9 * SECONDS_IN_MONTH + 20 * SECONDS_IN_DAY);
            assert_eq!(date.date_medium(), "21st of Sla, 1FH");
            assert_eq!(date.month_ordinal(), "10th");
            assert_eq!(date.month_phrase(), "the Month of Slaughter");
            assert_eq!(date.date_ordinal(), "21st");
        }

        #[test]
        fn custom_templates() {
            let date = sample();
            assert_eq!(date.format("{dddd} the {Do}"), "Coreldæ the 2nd");
            assert_eq!(date.format("{H}h{mm} [{unknown}]"), "15h45 []");
            assert_eq!(date.format("no tokens"), "no tokens");
            assert_eq!(date.field("nope"), None);
        }

        #[test]
        fn full_year_in_dual_age() {
            let date = OdreianDate::new(AGE_EPOCHS[3]);
            assert_eq!(date.full_year(), "101 Roads/1 Kingdom in Unity");
        }
    }

    mod value {
        use super::*;

        #[test]
        fn serde_uses_timestamp() {
            let date = OdreianDate::new(123_456);
            assert_eq!(serde_json::to_string(&date).unwrap(), "123456");
            let restored: OdreianDate = serde_json::from_str("123456").unwrap();
            assert_eq!(restored, date);
        }

        #[test]
        fn conversions() {
            let date: OdreianDate = 42.into();
            assert_eq!(date.timestamp(), 42);
            let t: i64 = date.into();
            assert_eq!(t, 42);
        }

        #[test]
        fn alternate_calendar() {
            let calendar = CalendarDefinition::from_json(
                r#"{
                    "name": "Tiny",
                    "months": ["Early", "Late"],
                    "weekdays": ["Work", "Rest"],
                    "ages": [
                        {"name": "Dawn", "abbreviation": "D", "years": 3},
                        {"name": "Dusk", "abbreviation": "K"}
                    ],
                    "units": {
                        "secondsPerMinute": 60,
                        "minutesPerHour": 60,
                        "hoursPerDay": 24,
                        "daysPerMonth": 4
                    }
                }"#,
            )
            .unwrap();
            let year = calendar.seconds_in_year();
            let date =
                OdreianDate::with_calendar(2 * year + 5 * SECONDS_IN_DAY, Arc::new(calendar));
            assert_eq!(date.short_year(), "3D/1K");
            assert_eq!(date.month_name(), "Late");
            assert_eq!(date.date_index(), 1);
            assert_eq!(date.weekday_name(), "Rest");
        }

        #[test]
        fn years_stay_in_range_for_short_years() {
            // 1-second minutes and hours, one 1-day month: a 24-second year
            let calendar = CalendarDefinition::from_json(
                r#"{
                    "name": "Blink",
                    "months": ["Only"],
                    "weekdays": ["Day"],
                    "ages": [{"name": "Dawn", "abbreviation": "D"}],
                    "units": {
                        "secondsPerMinute": 1,
                        "minutesPerHour": 1,
                        "hoursPerDay": 24,
                        "daysPerMonth": 1
                    }
                }"#,
            )
            .unwrap();
            let calendar = Arc::new(calendar);

            let latest = OdreianDate::with_calendar(i64::MAX, Arc::clone(&calendar));
            assert_eq!(latest.year()[0].year, i64::MAX / 24 + 1);
            assert_eq!(latest.short_year(), format!("{}D", i64::MAX / 24 + 1));

            let earliest = OdreianDate::with_calendar(i64::MIN, calendar);
            assert_eq!(earliest.year()[0].year, 1 + i64::MIN.div_euclid(24));
            assert!(earliest.short_year().starts_with('-'));
        }
    }
}
