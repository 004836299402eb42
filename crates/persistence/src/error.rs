// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use mission_desk::CoreError;
use mission_desk_domain::DomainError;

use crate::data_models::EmployeeFailure;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The database was locked or busy past the busy timeout.
    Transient(String),
    /// An insert hit the unique index on mission codes.
    CodeCollision(String),
    /// Any other constraint rejected the write.
    ConstraintViolation(String),
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// A domain rule rejected the operation.
    DomainViolation(DomainError),
    /// One or more employees of a batch failed; nothing was written.
    BatchRejected(Vec<EmployeeFailure>),
    /// The requested mission was not found.
    MissionNotFound(i64),
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::Transient(msg) => write!(f, "Database busy: {msg}"),
            Self::CodeCollision(msg) => write!(f, "Mission code collision: {msg}"),
            Self::ConstraintViolation(msg) => write!(f, "Constraint violation: {msg}"),
            Self::ReconstructionError(msg) => write!(f, "Stored record is invalid: {msg}"),
            Self::DomainViolation(err) => write!(f, "{err}"),
            Self::BatchRejected(failures) => {
                write!(f, "Batch rejected: {} employee(s) failed", failures.len())?;
                for failure in failures {
                    write!(f, "; employee {}: {}", failure.employee_id, failure.error)?;
                }
                Ok(())
            }
            Self::MissionNotFound(id) => write!(f, "Mission {id} not found"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl PersistenceError {
    /// Whether the operation may succeed if run again unchanged.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

fn is_busy_message(message: &str) -> bool {
    let lowered: String = message.to_lowercase();
    lowered.contains("database is locked") || lowered.contains("database is busy")
}

impl From<DieselError> for PersistenceError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => Self::NotFound("Record not found".to_string()),
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info)
                if info.message().contains("missions.code") =>
            {
                Self::CodeCollision(info.message().to_string())
            }
            DieselError::DatabaseError(
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation,
                info,
            ) => Self::ConstraintViolation(info.message().to_string()),
            DieselError::DatabaseError(_, info) if is_busy_message(info.message()) => {
                Self::Transient(info.message().to_string())
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<DomainError> for PersistenceError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

impl From<CoreError> for PersistenceError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DomainViolation(err) => Self::DomainViolation(err),
        }
    }
}
