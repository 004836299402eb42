// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Calendar helpers for month-scoped missions.
//!
//! Dates are stored and exchanged as `YYYY-MM-DD` text and timestamps as
//! fixed-width UTC text (`YYYY-MM-DDTHH:MM:SS.ffffffZ`), so lexicographic
//! ordering of the stored values matches chronological ordering.

use std::fmt;

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime};

use crate::error::DomainError;

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'_>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:6]Z");

/// A calendar month targeted by a monthly mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetMonth {
    year: i32,
    month: Month,
}

impl TargetMonth {
    /// Creates a target month from a year and a 1-based month number.
    ///
    /// # Errors
    ///
    /// Returns an error if the month number is outside `1..=12` or the
    /// year cannot be represented as a calendar date.
    pub fn new(year: i32, month: u8) -> Result<Self, DomainError> {
        let month: Month =
            Month::try_from(month).map_err(|_| DomainError::InvalidMonth { year, month })?;
        Date::from_calendar_date(year, month, 1).map_err(|_| DomainError::InvalidMonth {
            year,
            month: month as u8,
        })?;
        Ok(Self { year, month })
    }

    /// Returns the month containing the given date.
    #[must_use]
    pub const fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    #[must_use]
    pub const fn month(&self) -> Month {
        self.month
    }

    /// Returns the 1-based month number.
    #[must_use]
    pub const fn month_number(&self) -> u8 {
        self.month as u8
    }

    /// Returns the first calendar day of the month.
    ///
    /// # Errors
    ///
    /// Returns an error if the date falls outside the supported range.
    pub fn first_day(&self) -> Result<Date, DomainError> {
        Date::from_calendar_date(self.year, self.month, 1).map_err(|_| {
            DomainError::DateArithmeticOverflow {
                operation: format!("computing the first day of {self}"),
            }
        })
    }

    /// Returns the last calendar day of the month.
    ///
    /// # Errors
    ///
    /// Returns an error if the date falls outside the supported range.
    pub fn last_day(&self) -> Result<Date, DomainError> {
        let (next_year, next_month): (i32, Month) = if self.month == Month::December {
            (self.year + 1, Month::January)
        } else {
            (self.year, self.month.next())
        };

        Date::from_calendar_date(next_year, next_month, 1)
            .ok()
            .and_then(Date::previous_day)
            .ok_or_else(|| DomainError::DateArithmeticOverflow {
                operation: format!("computing the last day of {self}"),
            })
    }

    /// Returns whether the date falls inside this month.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Two-digit year and month prefix used by the legacy code scheme (`M2406`).
    #[must_use]
    pub fn legacy_prefix(&self) -> String {
        format!(
            "M{:02}{:02}",
            self.year.rem_euclid(100),
            self.month_number()
        )
    }
}

impl fmt::Display for TargetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month_number())
    }
}

/// Parses a `YYYY-MM-DD` date supplied for `field`.
///
/// # Errors
///
/// Returns an error if the value is not a valid calendar date.
pub fn parse_date(field: &str, value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), DATE_FORMAT).map_err(|e| DomainError::DateParseError {
        field: field.to_string(),
        value: value.to_string(),
        error: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
///
/// # Errors
///
/// Returns an error if formatting fails (years outside `0..=9999`).
pub fn format_date(date: Date) -> Result<String, DomainError> {
    date.format(DATE_FORMAT)
        .map_err(|e| DomainError::DateArithmeticOverflow {
            operation: format!("formatting date: {e}"),
        })
}

/// Formats a UTC timestamp in the fixed-width storage format.
///
/// # Errors
///
/// Returns an error if formatting fails.
pub fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, DomainError> {
    let utc: OffsetDateTime = timestamp.to_offset(time::UtcOffset::UTC);
    utc.format(TIMESTAMP_FORMAT)
        .map_err(|e| DomainError::DateArithmeticOverflow {
            operation: format!("formatting timestamp: {e}"),
        })
}

/// Parses a timestamp produced by [`format_timestamp`].
///
/// # Errors
///
/// Returns an error if the value is not in the storage format.
pub fn parse_timestamp(field: &str, value: &str) -> Result<OffsetDateTime, DomainError> {
    PrimitiveDateTime::parse(value, TIMESTAMP_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| DomainError::DateParseError {
            field: field.to_string(),
            value: value.to_string(),
            error: e.to_string(),
        })
}
