//! Reporting period resolution
//!
//! Maps a (quarter, year) request, or "most recent reportable quarter" when
//! the quarter is omitted, to an inclusive date interval, and resolves the
//! influenza season window, which is a fixed six-month span independent of
//! the calendar quarter.

use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::error::{ReportingError, Result};

/// Inclusive date interval for a reporting window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// First day of the window (inclusive)
    pub start: NaiveDate,
    /// Last day of the window (inclusive)
    pub end: NaiveDate,
}

impl DateRange {
    /// Check whether a date falls inside the window, boundaries included
    #[must_use]
    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.start <= *date && *date <= self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} through {}", self.start, self.end)
    }
}

/// A resolved reporting quarter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingPeriod {
    /// Calendar quarter, 1 through 4
    pub quarter: u8,
    /// Calendar year of the quarter
    pub year: i32,
    /// The quarter's date window, inclusive on both ends
    pub range: DateRange,
}

impl ReportingPeriod {
    /// Resolve a reporting period from optional CLI arguments.
    ///
    /// When the quarter is omitted the most recently completed calendar
    /// quarter relative to `today` is used, rolling over to Q4 of the prior
    /// year during the first quarter's reporting gap. A year without a
    /// quarter is rejected before any data is queried.
    pub fn resolve(quarter: Option<u8>, year: Option<i32>, today: NaiveDate) -> Result<Self> {
        let (quarter, year) = match quarter {
            Some(q) => (q, year.unwrap_or_else(|| today.year())),
            None => last_quarter(today),
        };

        Ok(Self {
            quarter,
            year,
            range: quarter_dates(quarter, year)?,
        })
    }

    /// Key used in report directory and file names, e.g. `2025Q3`
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}Q{}", self.year, self.quarter)
    }

    /// Whether this quarter overlaps the influenza season (Q4 or Q1)
    #[must_use]
    pub fn in_flu_season(&self) -> bool {
        self.quarter == 1 || self.quarter == 4
    }
}

impl fmt::Display for ReportingPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Q{} {} ({})", self.quarter, self.year, self.range)
    }
}

/// Inclusive date window for a calendar quarter.
///
/// The end date uses the true number of days in the closing month.
pub fn quarter_dates(quarter: u8, year: i32) -> Result<DateRange> {
    let (start_month, end_month) = match quarter {
        1 => (1, 3),
        2 => (4, 6),
        3 => (7, 9),
        4 => (10, 12),
        other => {
            return Err(ReportingError::InvalidPeriod(format!(
                "quarter must be between 1 and 4, got {other}"
            )));
        }
    };

    let start = NaiveDate::from_ymd_opt(year, start_month, 1).ok_or_else(|| {
        ReportingError::InvalidPeriod(format!("no calendar date for {year}-{start_month}-01"))
    })?;
    let end = NaiveDate::from_ymd_opt(year, end_month, days_in_month(year, end_month))
        .ok_or_else(|| {
            ReportingError::InvalidPeriod(format!("no calendar date at end of {year}-{end_month}"))
        })?;

    Ok(DateRange { start, end })
}

/// The most recently completed calendar quarter relative to `today`
#[must_use]
pub fn last_quarter(today: NaiveDate) -> (u8, i32) {
    let current = (today.month0() / 3 + 1) as u8;
    if current == 1 {
        (4, today.year() - 1)
    } else {
        (current - 1, today.year())
    }
}

/// Influenza season window ending in `year`: October 1 of the prior year
/// through March 31 of `year`.
#[must_use]
pub fn flu_season(year: i32) -> DateRange {
    DateRange {
        start: NaiveDate::from_ymd_opt(year - 1, 10, 1).unwrap(),
        end: NaiveDate::from_ymd_opt(year, 3, 31).unwrap(),
    }
}

/// The influenza season window a reporting quarter belongs to.
///
/// Q1 reports the season closing that March; Q4 reports the season opening
/// that October. Other quarters have no season to report.
pub fn flu_season_for(period: &ReportingPeriod) -> Result<DateRange> {
    match period.quarter {
        1 => Ok(flu_season(period.year)),
        4 => Ok(flu_season(period.year + 1)),
        other => Err(ReportingError::InvalidPeriod(format!(
            "influenza is reported for Q4 and Q1 only, got Q{other}"
        ))),
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    // The first of the following month always exists for a valid month
    first_of_next.and_then(|d| d.pred_opt()).map_or(31, |d| d.day())
}
