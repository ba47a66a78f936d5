use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors produced when parsing a month path segment
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthError {
    #[error("date '{0}' must be YYYYMM or YYYYM")]
    InvalidLength(String),

    #[error("date '{0}' must contain only digits")]
    NonNumeric(String),

    #[error("month in '{0}' must be between 1 and 12")]
    MonthOutOfRange(String),
}

/// A calendar month as requested from the crime API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YearMonth {
    year: u16,
    month: u8,
}

impl YearMonth {
    pub fn new(year: u16, month: u8) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Parse a compact date such as `201811` or `20181`
    ///
    /// The first four characters are the year and the rest is the month.
    /// A single hyphen between the two (`2018-11`) is accepted as well.
    pub fn parse_compact(raw: &str) -> Result<Self, MonthError> {
        let trimmed = raw.trim();
        if !trimmed.is_ascii() || trimmed.len() < 5 {
            return Err(MonthError::InvalidLength(raw.to_string()));
        }

        let (year_part, rest) = trimmed.split_at(4);
        let month_part = rest.strip_prefix('-').unwrap_or(rest);

        if month_part.is_empty() || month_part.len() > 2 {
            return Err(MonthError::InvalidLength(raw.to_string()));
        }

        let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(year_part) || !all_digits(month_part) {
            return Err(MonthError::NonNumeric(raw.to_string()));
        }

        let year: u16 = year_part
            .parse()
            .map_err(|_| MonthError::NonNumeric(raw.to_string()))?;
        let month: u8 = month_part
            .parse()
            .map_err(|_| MonthError::NonNumeric(raw.to_string()))?;

        Self::new(year, month).ok_or_else(|| MonthError::MonthOutOfRange(raw.to_string()))
    }

    pub fn year(&self) -> u16 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = MonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_compact(s)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
