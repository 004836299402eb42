// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use time::Date;

use crate::calendar::TargetMonth;
use crate::error::DomainError;
use crate::types::{DestinationInput, MissionType};

/// Maximum length of free-text mission fields.
pub const MAX_TEXT_LENGTH: usize = 2000;

/// Maximum length of location and transport names.
pub const MAX_NAME_LENGTH: usize = 120;

/// Validates the employee list of a group request.
///
/// # Errors
///
/// Returns an error if the list is empty, contains a non-positive id, or
/// repeats an employee.
pub fn validate_employee_ids(employee_ids: &[i64]) -> Result<(), DomainError> {
    if employee_ids.is_empty() {
        return Err(DomainError::InvalidEmployeeList(String::from(
            "at least one employee is required",
        )));
    }

    let mut seen: HashSet<i64> = HashSet::with_capacity(employee_ids.len());
    for &employee_id in employee_ids {
        if employee_id <= 0 {
            return Err(DomainError::InvalidEmployeeList(format!(
                "invalid employee id {employee_id}"
            )));
        }
        if !seen.insert(employee_id) {
            return Err(DomainError::DuplicateEmployee { employee_id });
        }
    }
    Ok(())
}

/// Validates a destination list.
///
/// # Errors
///
/// Returns an error if the list is empty, a name is blank or too long, or a
/// reference is not a positive id.
pub fn validate_destinations(destinations: &[DestinationInput]) -> Result<(), DomainError> {
    if destinations.is_empty() {
        return Err(DomainError::InvalidDestinations(String::from(
            "at least one destination is required",
        )));
    }

    for destination in destinations {
        match destination {
            DestinationInput::ByReference(id) if *id <= 0 => {
                return Err(DomainError::InvalidDestinations(format!(
                    "invalid location id {id}"
                )));
            }
            DestinationInput::ByName(name) if name.trim().is_empty() => {
                return Err(DomainError::InvalidDestinations(String::from(
                    "destination names must not be blank",
                )));
            }
            DestinationInput::ByName(name) if name.trim().chars().count() > MAX_NAME_LENGTH => {
                return Err(DomainError::TextTooLong {
                    field: "destinations",
                    max: MAX_NAME_LENGTH,
                });
            }
            _ => {}
        }
    }
    Ok(())
}

/// Validates and trims a transport name.
///
/// # Errors
///
/// Returns an error if the name is blank or too long.
pub fn validate_transport(name: &str) -> Result<String, DomainError> {
    let trimmed: &str = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::InvalidTransport(String::from(
            "transport must not be blank",
        )));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(DomainError::TextTooLong {
            field: "transport",
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(trimmed.to_string())
}

/// Validates an optional free-text field, returning the trimmed value.
///
/// Blank values collapse to `None`.
///
/// # Errors
///
/// Returns an error if the value is longer than [`MAX_TEXT_LENGTH`].
pub fn validate_optional_text(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, DomainError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > MAX_TEXT_LENGTH {
        return Err(DomainError::TextTooLong {
            field,
            max: MAX_TEXT_LENGTH,
        });
    }
    Ok(Some(value.to_string()))
}

/// Resolves the stored date window of a mission.
///
/// Monthly missions always span the whole month of `start_date`; the
/// requested `end_date` must fall in that same month. Special missions keep
/// the requested range.
///
/// # Errors
///
/// Returns an error if `start_date` is after `end_date`, or a monthly range
/// crosses a month boundary.
pub fn resolve_mission_window(
    mission_type: MissionType,
    start_date: Date,
    end_date: Date,
) -> Result<(Date, Date), DomainError> {
    if start_date > end_date {
        return Err(DomainError::InvalidDateRange {
            start_date,
            end_date,
        });
    }

    match mission_type {
        MissionType::Special => Ok((start_date, end_date)),
        MissionType::Monthly => {
            let month: TargetMonth = TargetMonth::from_date(start_date);
            if !month.contains(end_date) {
                return Err(DomainError::MonthlyMissionSpansMonths {
                    start_date,
                    end_date,
                });
            }
            Ok((month.first_day()?, month.last_day()?))
        }
    }
}

/// Case-folded lookup key for location and transport names.
#[must_use]
pub fn normalize_name_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase()
}
