// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::calendar::TargetMonth;
use crate::sequence::CodeScheme;
use crate::types::MissionStatus;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The employee list of a group request is empty or invalid.
    InvalidEmployeeList(String),
    /// The same employee appears more than once in a group request.
    DuplicateEmployee {
        /// The repeated employee identifier.
        employee_id: i64,
    },
    /// The destination list is empty or contains an invalid entry.
    InvalidDestinations(String),
    /// The transport reference is missing or blank.
    InvalidTransport(String),
    /// A free-text field exceeds its allowed length.
    TextTooLong {
        /// The offending field.
        field: &'static str,
        /// The maximum number of characters.
        max: usize,
    },
    /// The start date is after the end date.
    InvalidDateRange {
        /// The requested start date.
        start_date: time::Date,
        /// The requested end date.
        end_date: time::Date,
    },
    /// A monthly mission must start and end inside one calendar month.
    MonthlyMissionSpansMonths {
        /// The requested start date.
        start_date: time::Date,
        /// The requested end date.
        end_date: time::Date,
    },
    /// Failed to parse a date or timestamp.
    DateParseError {
        /// The field being parsed.
        field: String,
        /// The invalid value.
        value: String,
        /// The parser message.
        error: String,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Month number or year out of range.
    InvalidMonth {
        /// The requested year.
        year: i32,
        /// The requested month number.
        month: u8,
    },
    /// Unknown mission type.
    InvalidMissionType(String),
    /// Unknown mission status.
    InvalidMissionStatus(String),
    /// Unknown code scheme.
    InvalidCodeScheme(String),
    /// Status change not permitted by the mission lifecycle.
    InvalidStatusTransition {
        /// The current status.
        from: MissionStatus,
        /// The requested status.
        to: MissionStatus,
    },
    /// An existing mission code cannot be parsed while allocating the next one.
    CorruptMissionCode {
        /// The unparseable code.
        code: String,
        /// Why the code was rejected.
        reason: String,
    },
    /// The sequence for a code scheme has no values left.
    SequenceExhausted {
        /// The scheme whose sequence overflowed.
        scheme: CodeScheme,
        /// The period label (month or year).
        period: String,
    },
    /// The employee already holds an active monthly mission in the month.
    ActiveMonthlyMissionExists {
        /// The employee identifier.
        employee_id: i64,
        /// The targeted month.
        month: TargetMonth,
        /// Code of the mission already holding the month.
        existing_code: String,
    },
    /// Employee does not exist.
    EmployeeNotFound(i64),
    /// Location does not exist.
    LocationNotFound(i64),
    /// Mission does not exist.
    MissionNotFound(i64),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEmployeeList(msg) => write!(f, "Invalid employee list: {msg}"),
            Self::DuplicateEmployee { employee_id } => {
                write!(f, "Employee {employee_id} appears more than once in the request")
            }
            Self::InvalidDestinations(msg) => write!(f, "Invalid destinations: {msg}"),
            Self::InvalidTransport(msg) => write!(f, "Invalid transport: {msg}"),
            Self::TextTooLong { field, max } => {
                write!(f, "Field '{field}' must be at most {max} characters")
            }
            Self::InvalidDateRange {
                start_date,
                end_date,
            } => {
                write!(
                    f,
                    "Start date {start_date} must not be after end date {end_date}"
                )
            }
            Self::MonthlyMissionSpansMonths {
                start_date,
                end_date,
            } => {
                write!(
                    f,
                    "Monthly mission must stay within one month, but {start_date} and {end_date} differ"
                )
            }
            Self::DateParseError {
                field,
                value,
                error,
            } => {
                write!(f, "Failed to parse {field} '{value}': {error}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::InvalidMonth { year, month } => {
                write!(f, "Invalid month {month} in year {year}")
            }
            Self::InvalidMissionType(value) => {
                write!(
                    f,
                    "Invalid mission type '{value}'. Must be 'monthly' or 'special'"
                )
            }
            Self::InvalidMissionStatus(value) => {
                write!(
                    f,
                    "Invalid mission status '{value}'. Must be 'active', 'completed' or 'cancelled'"
                )
            }
            Self::InvalidCodeScheme(value) => {
                write!(
                    f,
                    "Invalid code scheme '{value}'. Must be 'sequential' or 'legacy'"
                )
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(f, "Cannot change mission status from {from} to {to}")
            }
            Self::CorruptMissionCode { code, reason } => {
                write!(f, "Existing mission code '{code}' is corrupt: {reason}")
            }
            Self::SequenceExhausted { scheme, period } => {
                write!(f, "No {scheme} mission codes left for period {period}")
            }
            Self::ActiveMonthlyMissionExists {
                employee_id,
                month,
                existing_code,
            } => {
                write!(
                    f,
                    "Employee {employee_id} already has active monthly mission {existing_code} for {month}"
                )
            }
            Self::EmployeeNotFound(id) => write!(f, "Employee {id} not found"),
            Self::LocationNotFound(id) => write!(f, "Location {id} not found"),
            Self::MissionNotFound(id) => write!(f, "Mission {id} not found"),
        }
    }
}

impl std::error::Error for DomainError {}
