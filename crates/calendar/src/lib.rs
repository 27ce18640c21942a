//! # odreian-calendar
//!
//! Reckoning of time in the Odreian calendar: six irregular ages laid over a
//! fixed 12-month, 30-day, 6-day-week year.
//!
//! A timestamp is a signed count of seconds since the start of the First Histories.
//! [`OdreianDate`] derives every calendar field from it, renders named format tokens,
//! and parses the long form back.
//!
//! ```ignore
//! use odreian_calendar::OdreianDate;
//!
//! let date = OdreianDate::parse("3:45pm, Avandæ, 2nd of Gathering, 12QS")?;
//! assert_eq!(date.short_year(), "12QS");
//! assert_eq!(date.time_short(), "3:45pm");
//! println!("{}", date); // 3:45pm, Avandæ, 2nd of the Month of Gathering, 12 Quarried Stone
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `calendar` | Constants table and validated calendar definitions |
//! | `date` | The `OdreianDate` value and its field accessors |
//! | `format` | Format tokens, ordinals and template substitution |
//! | `parse` | Long-form date parsing |
//! | `error` | Error types |

pub mod calendar;
pub mod date;
pub mod error;
pub mod format;
mod parse;

pub use calendar::{
    age_epochs, Age, AgeDefinition, CalendarConfig, CalendarDefinition, CalendarUnits,
    AGE_ABBREVIATIONS, AGE_EPOCHS, AGE_NAMES, AGE_YEARS, DAYS_IN_MONTH, DAYS_IN_WEEK,
    HOURS_IN_DAY, MINUTES_IN_HOUR, MONTHS_IN_YEAR, MONTH_NAMES, SECONDS_IN_DAY, SECONDS_IN_HOUR,
    SECONDS_IN_MINUTE, SECONDS_IN_MONTH, SECONDS_IN_WEEK, SECONDS_IN_YEAR, WEEKDAY_NAMES,
};
pub use date::{odreian_calendar, AgeYear, OdreianDate};
pub use error::CalendarError;
pub use format::{ordinal, ordinal_suffix, FormatToken, Segment, Template};
