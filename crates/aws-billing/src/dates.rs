//! Date token resolution.
//!
//! Command-line dates are either literal calendar dates or one of a few
//! relative keywords evaluated against the local clock:
//!
//! | Token         | Resolves to                         |
//! |---------------|-------------------------------------|
//! | `today`       | the current date                    |
//! | `yesterday`   | the current date minus one day      |
//! | `month_start` | the first day of the current month  |
//! | `month_end`   | the last day of the current month   |
//! | `year_start`  | January 1 of the current year       |

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Days, Local, Months, NaiveDate, NaiveDateTime};

use crate::error::{BillingError, Result};

/// Literal formats accepted for free-form dates, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%b %d %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Date-time formats whose date part is accepted.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Relative date keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDate {
    Today,
    Yesterday,
    MonthStart,
    MonthEnd,
    YearStart,
}

impl RelativeDate {
    /// Resolve the keyword against `today`.
    #[must_use]
    pub fn resolve(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Today => today,
            Self::Yesterday => today - Days::new(1),
            Self::MonthStart => month_start(today),
            Self::MonthEnd => month_start(today) + Months::new(1) - Days::new(1),
            Self::YearStart => today - Days::new(u64::from(today.ordinal0())),
        }
    }
}

impl FromStr for RelativeDate {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "yesterday" => Ok(Self::Yesterday),
            "month_start" => Ok(Self::MonthStart),
            "month_end" => Ok(Self::MonthEnd),
            "year_start" => Ok(Self::YearStart),
            _ => Err(()),
        }
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Current local date.
#[must_use]
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Resolve a date token against the system clock.
///
/// # Errors
///
/// Returns [`BillingError::InvalidDateFormat`] if the token is neither a
/// keyword nor a parseable date.
pub fn resolve_date(token: &str) -> Result<NaiveDate> {
    resolve_date_on(token, today())
}

/// Resolve a date token against a fixed `today`.
///
/// # Errors
///
/// Returns [`BillingError::InvalidDateFormat`] if the token is neither a
/// keyword nor a parseable date.
pub fn resolve_date_on(token: &str, today: NaiveDate) -> Result<NaiveDate> {
    if let Ok(keyword) = token.parse::<RelativeDate>() {
        return Ok(keyword.resolve(today));
    }
    parse_literal(token.trim()).ok_or_else(|| BillingError::InvalidDateFormat(token.to_string()))
}

fn parse_literal(token: &str) -> Option<NaiveDate> {
    if token.is_empty() {
        return None;
    }

    // Compact YYYYMMDD
    if token.len() == 8 && token.bytes().all(|b| b.is_ascii_digit()) {
        let year = token[..4].parse().ok()?;
        let month = token[4..6].parse().ok()?;
        let day = token[6..].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(token, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(token, fmt).ok())
                .map(|dt| dt.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(token)
                .ok()
                .map(|dt| dt.date_naive())
        })
}

/// A resolved query window.
///
/// `start` is inclusive and `end` exclusive, as Cost Explorer interprets
/// `TimePeriod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `start > end`.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::InvalidQueryConfiguration`] for an inverted range.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(BillingError::InvalidQueryConfiguration(format!(
                "start date {start} is after end date {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Resolve a pair of date tokens against `today`.
    ///
    /// # Errors
    ///
    /// Returns [`BillingError::InvalidDateFormat`] naming the first bad token,
    /// or [`BillingError::InvalidQueryConfiguration`] if the range is inverted.
    pub fn resolve(start: &str, end: &str, today: NaiveDate) -> Result<Self> {
        let start = resolve_date_on(start, today)?;
        let end = resolve_date_on(end, today)?;
        Self::new(start, end)
    }

    /// The `months` calendar months ending at `today`.
    ///
    /// Days past the end of the earlier month are clamped (31 Aug minus six
    /// months is the last day of February).
    #[must_use]
    pub fn trailing_months(months: u32, today: NaiveDate) -> Self {
        let start = today
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        Self { start, end: today }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_today_and_yesterday() {
        let today = date(2024, 3, 1);
        assert_eq!(resolve_date_on("today", today).unwrap(), today);
        assert_eq!(resolve_date_on("yesterday", today).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_month_start() {
        assert_eq!(
            resolve_date_on("month_start", date(2024, 7, 19)).unwrap(),
            date(2024, 7, 1)
        );
    }

    #[test]
    fn test_month_end_by_month_length() {
        assert_eq!(
            resolve_date_on("month_end", date(2024, 1, 15)).unwrap(),
            date(2024, 1, 31)
        );
        assert_eq!(
            resolve_date_on("month_end", date(2024, 4, 30)).unwrap(),
            date(2024, 4, 30)
        );
        assert_eq!(
            resolve_date_on("month_end", date(2024, 2, 1)).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            resolve_date_on("month_end", date(2023, 2, 10)).unwrap(),
            date(2023, 2, 28)
        );
        assert_eq!(
            resolve_date_on("month_end", date(2024, 12, 5)).unwrap(),
            date(2024, 12, 31)
        );
    }

    #[test]
    fn test_year_start() {
        assert_eq!(
            resolve_date_on("year_start", date(2024, 12, 31)).unwrap(),
            date(2024, 1, 1)
        );
    }

    #[test]
    fn test_keywords_ignore_case() {
        let today = date(2024, 5, 10);
        assert_eq!(resolve_date_on("TODAY", today).unwrap(), today);
        assert_eq!(
            resolve_date_on(" Month_Start ", today).unwrap(),
            date(2024, 5, 1)
        );
    }

    #[test]
    fn test_literal_formats() {
        let today = date(2000, 1, 1);
        let expected = date(2024, 1, 15);
        for token in [
            "2024-01-15",
            "2024/01/15",
            "20240115",
            "01/15/2024",
            "15 January 2024",
            "15 Jan 2024",
            "January 15 2024",
            "Jan 15, 2024",
            "2024-01-15T08:30:00",
            "2024-01-15 08:30:00",
            "2024-01-15T08:30:00Z",
            "2024-01-15T23:30:00-05:00",
        ] {
            assert_eq!(resolve_date_on(token, today).unwrap(), expected, "{token}");
        }
    }

    #[test]
    fn test_invalid_tokens() {
        let today = date(2024, 1, 1);
        for token in ["", "tomorrow", "2024-02-30", "20241301", "next week"] {
            match resolve_date_on(token, today) {
                Err(BillingError::InvalidDateFormat(bad)) => assert_eq!(bad, token),
                other => panic!("expected InvalidDateFormat for {token:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_range_rejects_inverted() {
        let err = DateRange::resolve("2024-02-01", "2024-01-01", date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, BillingError::InvalidQueryConfiguration(_)));
    }

    #[test]
    fn test_range_reports_bad_token() {
        let err = DateRange::resolve("2024-01-01", "soon", date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, BillingError::InvalidDateFormat(ref t) if t == "soon"));
    }

    #[test]
    fn test_trailing_months() {
        let range = DateRange::trailing_months(6, date(2024, 8, 15));
        assert_eq!(range.start, date(2024, 2, 15));
        assert_eq!(range.end, date(2024, 8, 15));

        let clamped = DateRange::trailing_months(6, date(2024, 8, 31));
        assert_eq!(clamped.start, date(2024, 2, 29));

        let across_year = DateRange::trailing_months(3, date(2024, 1, 10));
        assert_eq!(across_year.start, date(2023, 10, 10));
    }

    #[test]
    fn test_display() {
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        assert_eq!(range.to_string(), "2024-01-01 to 2024-01-31");
    }
}
