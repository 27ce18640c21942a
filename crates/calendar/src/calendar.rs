//! Calendar definition and the Odreian constants table
//!
//! This module holds the read-only data every date is reckoned against:
//! month, weekday and age names, age abbreviations, the fixed unit counts and the
//! age start offsets derived from them.
//!
//! Key types:
//! - `CalendarDefinition` - Validated, immutable calendar configuration
//! - `AgeDefinition` - Configured age (name, abbreviation, years spanned)
//! - `Age` - Resolved age with its start offset in seconds
//! - `CalendarUnits` - Fixed unit counts (seconds per minute ... days per month)
//!
//! Age start offsets follow the "N - 1 years" rule: an age that spans N years hands
//! over to its successor at the start of its N-th year, so that final year is also
//! year 1 of the next age.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::CalendarError;

// ============================================================================
// Constants
// ============================================================================

/// Month names in calendar order.
pub const MONTH_NAMES: [&str; 12] = [
    "Gathering",
    "Dry",
    "Grass",
    "Flower",
    "Fallow",
    "Hay",
    "Harvest",
    "Barley",
    "Wine",
    "Slaughter",
    "Wolves",
    "Frost",
];

/// Weekday names in week order.
pub const WEEKDAY_NAMES: [&str; 6] = [
    "Avandæ", "Coreldæ", "Moradæ", "Bahamdæ", "Sehandæ", "Pelordæ",
];

/// Age names in chronological order.
pub const AGE_NAMES: [&str; 6] = [
    "First Histories",
    "Quarried Stone",
    "Roads",
    "Kingdom in Unity",
    "Great Empire",
    "Nine Kings",
];

/// Age abbreviations, index-aligned with [`AGE_NAMES`].
pub const AGE_ABBREVIATIONS: [&str; 6] = ["FH", "QS", "R", "KU", "GE", "NK"];

/// Years spanned by each age, counting the final year it shares with the next age.
/// The current age is open-ended.
pub const AGE_YEARS: [Option<u32>; 6] = [
    Some(332),
    Some(281),
    Some(101),
    Some(298),
    Some(563),
    None,
];

pub const SECONDS_IN_MINUTE: i64 = 60;
pub const MINUTES_IN_HOUR: i64 = 60;
pub const HOURS_IN_DAY: i64 = 24;
pub const DAYS_IN_MONTH: i64 = 30;
pub const DAYS_IN_WEEK: i64 = WEEKDAY_NAMES.len() as i64;
pub const MONTHS_IN_YEAR: i64 = MONTH_NAMES.len() as i64;

pub const SECONDS_IN_HOUR: i64 = SECONDS_IN_MINUTE * MINUTES_IN_HOUR;
pub const SECONDS_IN_DAY: i64 = SECONDS_IN_HOUR * HOURS_IN_DAY;
pub const SECONDS_IN_WEEK: i64 = SECONDS_IN_DAY * DAYS_IN_WEEK;
pub const SECONDS_IN_MONTH: i64 = SECONDS_IN_DAY * DAYS_IN_MONTH;
pub const SECONDS_IN_YEAR: i64 = SECONDS_IN_MONTH * MONTHS_IN_YEAR;

/// Start offset of each age in seconds since the start of the First Histories.
pub const AGE_EPOCHS: [i64; 6] = cumulative_epochs(&AGE_YEARS);

const fn cumulative_epochs(years: &[Option<u32>; 6]) -> [i64; 6] {
    let mut epochs = [0i64; 6];
    let mut i = 1;
    while i < epochs.len() {
        let spanned = match years[i - 1] {
            Some(y) => y as i64,
            None => 1,
        };
        epochs[i] = epochs[i - 1] + (spanned - 1) * SECONDS_IN_YEAR;
        i += 1;
    }
    epochs
}

/// Returns `(age name, start offset)` pairs for the built-in ages, in order.
pub fn age_epochs() -> impl Iterator<Item = (&'static str, i64)> {
    AGE_NAMES.into_iter().zip(AGE_EPOCHS)
}

/// Maximum length for calendar names
const MAX_CALENDAR_NAME_LENGTH: usize = 100;

/// Minutes render as two digits
const MAX_MINUTES_PER_HOUR: u32 = 100;

// ============================================================================
// CalendarUnits
// ============================================================================

/// Fixed unit counts. Months-per-year and days-per-week come from the name lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarUnits {
    pub seconds_per_minute: u32,
    pub minutes_per_hour: u32,
    pub hours_per_day: u32,
    pub days_per_month: u32,
}

impl Default for CalendarUnits {
    fn default() -> Self {
        Self {
            seconds_per_minute: SECONDS_IN_MINUTE as u32,
            minutes_per_hour: MINUTES_IN_HOUR as u32,
            hours_per_day: HOURS_IN_DAY as u32,
            days_per_month: DAYS_IN_MONTH as u32,
        }
    }
}

// ============================================================================
// AgeDefinition / Age
// ============================================================================

/// Configuration for a single age
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeDefinition {
    /// Age name (e.g., "Quarried Stone")
    pub name: String,
    /// Short suffix used in compact years (e.g., "QS")
    pub abbreviation: String,
    /// Years spanned, including the year shared with the next age. `None` for the current age.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub years: Option<u32>,
}

impl AgeDefinition {
    /// Create a closed age spanning `years` years.
    pub fn new(name: impl Into<String>, abbreviation: impl Into<String>, years: u32) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            years: Some(years),
        }
    }

    /// Create an open-ended age (the last one in a calendar).
    pub fn open(name: impl Into<String>, abbreviation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            abbreviation: abbreviation.into(),
            years: None,
        }
    }
}

/// An age resolved against its calendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Age {
    definition: AgeDefinition,
    start: i64,
}

impl Age {
    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn abbreviation(&self) -> &str {
        &self.definition.abbreviation
    }

    /// Years spanned, if the age has ended.
    pub fn years(&self) -> Option<u32> {
        self.definition.years
    }

    /// Start offset in seconds since timestamp zero.
    pub fn start(&self) -> i64 {
        self.start
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.definition.name)
    }
}

// ============================================================================
// CalendarDefinition
// ============================================================================

/// Serialized form of a calendar
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarConfig {
    pub name: String,
    pub months: Vec<String>,
    pub weekdays: Vec<String>,
    pub ages: Vec<AgeDefinition>,
    #[serde(default)]
    pub units: CalendarUnits,
}

/// Full calendar configuration with resolved age offsets
///
/// Constructed once and shared; nothing mutates it after validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CalendarConfig", into = "CalendarConfig")]
pub struct CalendarDefinition {
    name: String,
    months: Vec<String>,
    weekdays: Vec<String>,
    ages: Vec<Age>,
    units: CalendarUnits,
}

impl CalendarDefinition {
    /// Create a validated calendar definition.
    ///
    /// # Errors
    ///
    /// Returns `CalendarError::Validation` if:
    /// - The name is empty or longer than 100 characters
    /// - Months, weekdays or ages are missing, blank or duplicated
    /// - Two months share a three-letter abbreviation, or one month's abbreviation
    ///   is another month's name
    /// - A unit count is zero, or the unit sizes overflow
    /// - The day isn't 24 hours, or an hour has more than 100 minutes (the 12-hour
    ///   clock and two-digit minutes of the long form can't express them)
    /// - An age other than the last has no year count or spans fewer than 2 years
    pub fn new(
        name: impl Into<String>,
        months: Vec<String>,
        weekdays: Vec<String>,
        ages: Vec<AgeDefinition>,
        units: CalendarUnits,
    ) -> Result<Self, CalendarError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CalendarError::validation("Calendar name cannot be empty"));
        }
        if name.chars().count() > MAX_CALENDAR_NAME_LENGTH {
            return Err(CalendarError::validation(format!(
                "Calendar name cannot exceed {} characters",
                MAX_CALENDAR_NAME_LENGTH
            )));
        }

        validate_names("month", months.iter().map(String::as_str))?;
        validate_names("weekday", weekdays.iter().map(String::as_str))?;
        validate_names("age", ages.iter().map(|a| a.name.as_str()))?;
        validate_names("age abbreviation", ages.iter().map(|a| a.abbreviation.as_str()))?;
        validate_month_abbreviations(&months)?;

        if units.seconds_per_minute == 0
            || units.minutes_per_hour == 0
            || units.hours_per_day == 0
            || units.days_per_month == 0
        {
            return Err(CalendarError::validation("Unit counts must be positive"));
        }
        if units.hours_per_day != HOURS_IN_DAY as u32 {
            return Err(CalendarError::validation(format!(
                "Days must have {} hours for the 12-hour clock, got {}",
                HOURS_IN_DAY, units.hours_per_day
            )));
        }
        if units.minutes_per_hour > MAX_MINUTES_PER_HOUR {
            return Err(CalendarError::validation(format!(
                "Hours cannot exceed {} minutes, got {}",
                MAX_MINUTES_PER_HOUR, units.minutes_per_hour
            )));
        }

        let seconds_in_year = [
            units.minutes_per_hour as i64,
            units.hours_per_day as i64,
            units.days_per_month as i64,
            months.len() as i64,
        ]
        .into_iter()
        .try_fold(units.seconds_per_minute as i64, i64::checked_mul)
        .ok_or_else(|| CalendarError::validation("Year length overflows"))?;

        let last = ages.len() - 1;
        let mut resolved = Vec::with_capacity(ages.len());
        let mut start: i64 = 0;
        for (i, definition) in ages.into_iter().enumerate() {
            let years = definition.years;
            resolved.push(Age { definition, start });
            if i == last {
                break;
            }
            let years = match years {
                Some(y) if y >= 2 => y as i64,
                Some(_) => {
                    return Err(CalendarError::validation(format!(
                        "Age '{}' must span at least 2 years",
                        resolved[i].name()
                    )))
                }
                None => {
                    return Err(CalendarError::validation(format!(
                        "Only the last age may be open-ended, but '{}' is not last",
                        resolved[i].name()
                    )))
                }
            };
            start = (years - 1)
                .checked_mul(seconds_in_year)
                .and_then(|span| start.checked_add(span))
                .ok_or_else(|| CalendarError::validation("Age offsets overflow"))?;
        }

        Ok(Self {
            name,
            months,
            weekdays,
            ages: resolved,
            units,
        })
    }

    /// Load a calendar from its JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `CalendarError::Parse` for malformed JSON and
    /// `CalendarError::Validation` for an inconsistent calendar.
    pub fn from_json(json: &str) -> Result<Self, CalendarError> {
        let config: CalendarConfig = serde_json::from_str(json)?;
        let calendar = Self::try_from(config)?;
        tracing::debug!(
            calendar = %calendar.name,
            months = calendar.months.len(),
            ages = calendar.ages.len(),
            "Loaded calendar definition"
        );
        Ok(calendar)
    }

    /// Creates the Odreian calendar.
    ///
    /// - 12 months of 30 days: Gathering through Frost
    /// - 6-day week: Avandæ through Pelordæ
    /// - 6 ages, First Histories through Nine Kings
    pub fn odreian() -> Self {
        let ages = AGE_NAMES
            .iter()
            .zip(AGE_ABBREVIATIONS)
            .zip(AGE_YEARS)
            .zip(AGE_EPOCHS)
            .map(|(((name, abbreviation), years), start)| Age {
                definition: AgeDefinition {
                    name: name.to_string(),
                    abbreviation: abbreviation.to_string(),
                    years,
                },
                start,
            })
            .collect();

        Self {
            name: "Odreian Reckoning".to_string(),
            months: MONTH_NAMES.iter().map(|m| m.to_string()).collect(),
            weekdays: WEEKDAY_NAMES.iter().map(|d| d.to_string()).collect(),
            ages,
            units: CalendarUnits::default(),
        }
    }

    // Accessors

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn months(&self) -> &[String] {
        &self.months
    }

    pub fn weekdays(&self) -> &[String] {
        &self.weekdays
    }

    /// Ages ordered by start offset.
    pub fn ages(&self) -> &[Age] {
        &self.ages
    }

    pub fn units(&self) -> CalendarUnits {
        self.units
    }

    // Unit sizes in seconds

    pub fn seconds_in_minute(&self) -> i64 {
        self.units.seconds_per_minute as i64
    }

    pub fn seconds_in_hour(&self) -> i64 {
        self.seconds_in_minute() * self.units.minutes_per_hour as i64
    }

    pub fn seconds_in_day(&self) -> i64 {
        self.seconds_in_hour() * self.units.hours_per_day as i64
    }

    pub fn seconds_in_week(&self) -> i64 {
        self.seconds_in_day() * self.weekdays.len() as i64
    }

    pub fn seconds_in_month(&self) -> i64 {
        self.seconds_in_day() * self.units.days_per_month as i64
    }

    pub fn seconds_in_year(&self) -> i64 {
        self.seconds_in_month() * self.months.len() as i64
    }

    // Lookups

    /// Month index (0-based) by full name or three-letter abbreviation, ignoring case.
    pub fn month_index(&self, name: &str) -> Option<usize> {
        let name = name.trim();
        position_ignore_case(&self.months, name).or_else(|| {
            self.months
                .iter()
                .position(|m| abbreviate(m).to_lowercase() == name.to_lowercase())
        })
    }

    /// Three-letter month abbreviation, or `None` if the index is out of range.
    pub fn month_abbreviation(&self, index: usize) -> Option<&str> {
        self.months.get(index).map(|m| abbreviate(m))
    }

    /// Weekday index (0-based) by name, ignoring case.
    pub fn weekday_index(&self, name: &str) -> Option<usize> {
        position_ignore_case(&self.weekdays, name.trim())
    }

    /// Age by abbreviation or full name, ignoring case.
    pub fn age(&self, token: &str) -> Option<&Age> {
        let token = token.trim().to_lowercase();
        self.ages
            .iter()
            .find(|a| a.abbreviation().to_lowercase() == token)
            .or_else(|| self.ages.iter().find(|a| a.name().to_lowercase() == token))
    }
}

impl Default for CalendarDefinition {
    fn default() -> Self {
        Self::odreian()
    }
}

impl TryFrom<CalendarConfig> for CalendarDefinition {
    type Error = CalendarError;

    fn try_from(config: CalendarConfig) -> Result<Self, Self::Error> {
        Self::new(
            config.name,
            config.months,
            config.weekdays,
            config.ages,
            config.units,
        )
    }
}

impl From<CalendarDefinition> for CalendarConfig {
    fn from(calendar: CalendarDefinition) -> Self {
        Self {
            name: calendar.name,
            months: calendar.months,
            weekdays: calendar.weekdays,
            ages: calendar.ages.into_iter().map(|a| a.definition).collect(),
            units: calendar.units,
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// First three characters of a name.
fn abbreviate(name: &str) -> &str {
    match name.char_indices().nth(3) {
        Some((end, _)) => &name[..end],
        None => name,
    }
}

fn position_ignore_case(names: &[String], name: &str) -> Option<usize> {
    let name = name.to_lowercase();
    names.iter().position(|n| n.to_lowercase() == name)
}

/// Every abbreviation must resolve back to its own month.
fn validate_month_abbreviations(months: &[String]) -> Result<(), CalendarError> {
    for (i, month) in months.iter().enumerate() {
        let abbreviation = abbreviate(month).to_lowercase();
        let clash = months.iter().enumerate().find(|(j, other)| {
            *j != i
                && (other.to_lowercase() == abbreviation
                    || abbreviate(other).to_lowercase() == abbreviation)
        });
        if let Some((_, other)) = clash {
            return Err(CalendarError::validation(format!(
                "Month abbreviation '{}' of '{}' is ambiguous with '{}'",
                abbreviate(month),
                month,
                other
            )));
        }
    }
    Ok(())
}

fn validate_names<'a>(
    kind: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), CalendarError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(CalendarError::validation(format!(
                "Calendar {} names cannot be empty",
                kind
            )));
        }
        if !seen.insert(name.to_lowercase()) {
            return Err(CalendarError::validation(format!(
                "Duplicate {} name: '{}'",
                kind, name
            )));
        }
    }
    if seen.is_empty() {
        return Err(CalendarError::validation(format!(
            "Calendar needs at least one {}",
            kind
        )));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
