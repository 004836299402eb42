// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use mission_desk::CoreError;
use mission_desk_domain::DomainError;
use mission_desk_persistence::{EmployeeFailure, PersistenceError};
use serde::{Deserialize, Serialize};

use crate::backup::BackupError;

/// Why one employee of a rolled-back batch failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureDetail {
    /// The employee whose mission could not be created.
    pub employee_id: i64,
    /// A human-readable reason.
    pub reason: String,
}

impl From<EmployeeFailure> for FailureDetail {
    fn from(failure: EmployeeFailure) -> Self {
        Self {
            employee_id: failure.employee_id,
            reason: failure.error.to_string(),
        }
    }
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Input was rejected before any code was allocated.
    Validation {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A uniqueness rule was violated.
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// A requested resource was not found.
    NotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A batch was rolled back; nothing was written.
    TransactionAborted {
        /// Summary of the abort.
        message: String,
        /// Every employee that blocked the batch.
        failures: Vec<FailureDetail>,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::Conflict { rule, message } => {
                write!(f, "Conflict ({rule}): {message}")
            }
            Self::NotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::TransactionAborted { message, failures } => {
                write!(f, "Transaction aborted: {message} ({} failures)", failures.len())
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<BackupError> for ApiError {
    fn from(err: BackupError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

fn validation(field: &str, message: String) -> ApiError {
    ApiError::Validation {
        field: field.to_string(),
        message,
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidEmployeeList(msg) => validation("employee_ids", msg),
        DomainError::DuplicateEmployee { .. } => validation("employee_ids", err.to_string()),
        DomainError::InvalidDestinations(msg) => validation("destinations", msg),
        DomainError::InvalidTransport(msg) => validation("transport", msg),
        DomainError::TextTooLong { field, .. } => validation(field, err.to_string()),
        DomainError::InvalidDateRange { .. } | DomainError::MonthlyMissionSpansMonths { .. } => {
            validation("end_date", err.to_string())
        }
        DomainError::DateParseError { ref field, .. } => {
            let field: String = field.clone();
            ApiError::Validation {
                field,
                message: err.to_string(),
            }
        }
        DomainError::InvalidMonth { .. } => validation("start_date", err.to_string()),
        DomainError::InvalidMissionType(_) => validation("mission_type", err.to_string()),
        DomainError::InvalidMissionStatus(_) | DomainError::InvalidStatusTransition { .. } => {
            validation("status", err.to_string())
        }
        DomainError::InvalidCodeScheme(_) => validation("code_scheme", err.to_string()),
        DomainError::ActiveMonthlyMissionExists {
            employee_id,
            month,
            existing_code,
        } => ApiError::Conflict {
            rule: String::from("one_active_monthly_mission"),
            message: format!(
                "Employee {employee_id} already has active monthly mission {existing_code} for {month}"
            ),
        },
        DomainError::SequenceExhausted { .. } => ApiError::Conflict {
            rule: String::from("sequence_exhausted"),
            message: err.to_string(),
        },
        DomainError::EmployeeNotFound(id) => ApiError::NotFound {
            resource_type: String::from("Employee"),
            message: format!("Employee {id} does not exist"),
        },
        DomainError::LocationNotFound(id) => ApiError::NotFound {
            resource_type: String::from("Location"),
            message: format!("Location {id} does not exist"),
        },
        DomainError::MissionNotFound(id) => ApiError::NotFound {
            resource_type: String::from("Mission"),
            message: format!("Mission {id} does not exist"),
        },
        DomainError::CorruptMissionCode { .. } | DomainError::DateArithmeticOverflow { .. } => {
            ApiError::Internal {
                message: err.to_string(),
            }
        }
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// A rejected batch becomes [`ApiError::TransactionAborted`]; callers that
/// create a single mission unwrap the lone failure first.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        PersistenceError::BatchRejected(failures) => ApiError::TransactionAborted {
            message: format!(
                "{} employee(s) cannot receive the mission; nothing was created",
                failures.len()
            ),
            failures: failures.into_iter().map(FailureDetail::from).collect(),
        },
        PersistenceError::CodeCollision(msg) => ApiError::Conflict {
            rule: String::from("unique_code"),
            message: format!("Mission code still collided after retries: {msg}"),
        },
        PersistenceError::MissionNotFound(id) => ApiError::NotFound {
            resource_type: String::from("Mission"),
            message: format!("Mission {id} does not exist"),
        },
        PersistenceError::NotFound(msg) => ApiError::NotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}
