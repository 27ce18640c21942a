//! Format tokens and template rendering
//!
//! Simple tokens (`YY`, `Do`, `mm`, ...) render a single derived field. Composite
//! tokens (`LT`, `LL`, `LLLL`, ...) are templates written in terms of other tokens,
//! so every rendering goes through the same substitution primitive.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalendarError;

// ============================================================================
// FormatToken
// ============================================================================

/// Named rendering of an `OdreianDate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FormatToken {
    /// Year and age abbreviation, e.g. "12QS" or "332FH/1QS"
    ShortYear,
    /// Year and full age name, e.g. "12 Quarried Stone"
    FullYear,
    /// 1-indexed month number
    MonthNumber,
    /// Ordinal month number, e.g. "3rd"
    MonthOrdinal,
    /// Month name
    MonthName,
    /// Three-letter month abbreviation
    MonthAbbreviation,
    /// "the Month of X"
    MonthPhrase,
    /// 1-indexed date of month
    Date,
    /// Ordinal date of month, e.g. "2nd"
    DateOrdinal,
    /// 0-indexed weekday number
    WeekdayNumber,
    /// Weekday name
    WeekdayName,
    /// Hour on the 24-hour clock
    Hour24,
    /// Hour on the 12-hour clock (12 for zero)
    Hour12,
    /// "am" or "pm"
    Meridiem,
    /// Zero-padded minute
    Minute,
    /// Zero-padded second
    Second,
    /// `h:mma`
    TimeShort,
    /// `h:mm:ssa`
    TimeLong,
    /// `D/M/YY`
    DateShort,
    /// `Do of MMM, YY`
    DateMedium,
    /// `Do of MMMM, YYYY`
    DateLong,
    /// `dddd, Do of MMM, YY`
    WeekdayDateMedium,
    /// `dddd, Do of MMMM, YYYY`
    WeekdayDateLong,
    /// `h:mma, dddd, Do of MMM, YY`
    DateTimeMedium,
    /// `h:mma, dddd, Do of MMMM, YYYY`
    DateTimeLong,
}

impl FormatToken {
    /// All tokens, simple ones first.
    pub const ALL: [FormatToken; 25] = [
        FormatToken::ShortYear,
        FormatToken::FullYear,
        FormatToken::MonthNumber,
        FormatToken::MonthOrdinal,
        FormatToken::MonthName,
        FormatToken::MonthAbbreviation,
        FormatToken::MonthPhrase,
        FormatToken::Date,
        FormatToken::DateOrdinal,
        FormatToken::WeekdayNumber,
        FormatToken::WeekdayName,
        FormatToken::Hour24,
        FormatToken::Hour12,
        FormatToken::Meridiem,
        FormatToken::Minute,
        FormatToken::Second,
        FormatToken::TimeShort,
        FormatToken::TimeLong,
        FormatToken::DateShort,
        FormatToken::DateMedium,
        FormatToken::DateLong,
        FormatToken::WeekdayDateMedium,
        FormatToken::WeekdayDateLong,
        FormatToken::DateTimeMedium,
        FormatToken::DateTimeLong,
    ];

    /// The token's placeholder name, as used in templates.
    pub fn as_str(&self) -> &'static str {
        match self {
            FormatToken::ShortYear => "YY",
            FormatToken::FullYear => "YYYY",
            FormatToken::MonthNumber => "M",
            FormatToken::MonthOrdinal => "Mo",
            FormatToken::MonthName => "MM",
            FormatToken::MonthAbbreviation => "MMM",
            FormatToken::MonthPhrase => "MMMM",
            FormatToken::Date => "D",
            FormatToken::DateOrdinal => "Do",
            FormatToken::WeekdayNumber => "d",
            FormatToken::WeekdayName => "dddd",
            FormatToken::Hour24 => "H",
            FormatToken::Hour12 => "h",
            FormatToken::Meridiem => "a",
            FormatToken::Minute => "mm",
            FormatToken::Second => "ss",
            FormatToken::TimeShort => "LT",
            FormatToken::TimeLong => "LTS",
            FormatToken::DateShort => "l",
            FormatToken::DateMedium => "ll",
            FormatToken::DateLong => "LL",
            FormatToken::WeekdayDateMedium => "lll",
            FormatToken::WeekdayDateLong => "LLL",
            FormatToken::DateTimeMedium => "llll",
            FormatToken::DateTimeLong => "LLLL",
        }
    }

    /// Template for composite tokens; `None` for tokens that render a field directly.
    pub fn template(&self) -> Option<&'static str> {
        match self {
            FormatToken::TimeShort => Some("{h}:{mm}{a}"),
            FormatToken::TimeLong => Some("{h}:{mm}:{ss}{a}"),
            FormatToken::DateShort => Some("{D}/{M}/{YY}"),
            FormatToken::DateMedium => Some("{Do} of {MMM}, {YY}"),
            FormatToken::DateLong => Some("{Do} of {MMMM}, {YYYY}"),
            FormatToken::WeekdayDateMedium => Some("{dddd}, {ll}"),
            FormatToken::WeekdayDateLong => Some("{dddd}, {LL}"),
            FormatToken::DateTimeMedium => Some("{LT}, {lll}"),
            FormatToken::DateTimeLong => Some("{LT}, {LLL}"),
            _ => None,
        }
    }
}

impl fmt::Display for FormatToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FormatToken {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormatToken::ALL
            .into_iter()
            .find(|token| token.as_str() == s)
            .ok_or_else(|| CalendarError::parse(format!("Unknown format token: '{}'", s)))
    }
}

impl TryFrom<String> for FormatToken {
    type Error = CalendarError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<FormatToken> for String {
    fn from(token: FormatToken) -> String {
        token.as_str().to_string()
    }
}

// ============================================================================
// Template
// ============================================================================

/// One piece of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text copied as-is
    Literal(&'a str),
    /// Placeholder replaced by a named field
    Field(&'a str),
}

/// Literal text interleaved with `{NAME}` placeholders
///
/// A `{` without a matching `}` is kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> Template<'a> {
    /// Split `pattern` into literal and placeholder segments.
    pub fn new(pattern: &'a str) -> Self {
        let mut segments = Vec::new();
        let mut rest = pattern;

        while let Some(open) = rest.find('{') {
            let Some(close) = rest[open..].find('}').map(|c| open + c) else {
                break;
            };
            if open > 0 {
                segments.push(Segment::Literal(&rest[..open]));
            }
            segments.push(Segment::Field(&rest[open + 1..close]));
            rest = &rest[close + 1..];
        }
        if !rest.is_empty() {
            segments.push(Segment::Literal(rest));
        }

        Self { segments }
    }

    pub fn segments(&self) -> &[Segment<'a>] {
        &self.segments
    }

    /// Substitute every placeholder with `lookup(name)`, or nothing if the name is unknown.
    pub fn render<F>(&self, mut lookup: F) -> String
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    if let Some(value) = lookup(name) {
                        out.push_str(&value);
                    }
                }
            }
        }
        out
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Returns the English ordinal suffix for a number (st, nd, rd, th).
pub fn ordinal_suffix(n: i64) -> &'static str {
    let n = n.unsigned_abs();
    if (11..=13).contains(&(n % 100)) {
        return "th";
    }
    match n % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    }
}

/// Renders a number with its ordinal suffix (e.g., "22nd").
pub fn ordinal(n: i64) -> String {
    format!("{}{}", n, ordinal_suffix(n))
}

// ============================================================================
// Tests
// ============================================================================
