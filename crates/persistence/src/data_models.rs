// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

use diesel::prelude::*;
use mission_desk_domain::{DomainError, MissionCode, MissionStatus, MissionType};
use time::{Date, OffsetDateTime};

use crate::diesel_schema::{code_counters, mission_destinations, missions};

/// Default time a writer waits for the database lock.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Storage configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistenceOptions {
    /// How long a connection waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for PersistenceOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// Why one employee of a batch could not receive a mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeFailure {
    pub employee_id: i64,
    pub error: DomainError,
}

/// A mission as read back from a backup, ready to be inserted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionImport {
    pub code: MissionCode,
    pub mission_type: MissionType,
    pub status: MissionStatus,
    pub employee_id: i64,
    pub start_date: Date,
    pub end_date: Date,
    /// Location names, in order. Missing locations are created.
    pub destinations: Vec<String>,
    pub transport: Option<String>,
    pub description: Option<String>,
    pub cancellation_details: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// What happened to one imported mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Inserted under this id.
    Restored { mission_id: i64 },
    /// A mission with the same code already exists.
    CodeExists,
    /// The employee already holds an active monthly mission for the month.
    MonthTaken { existing_code: MissionCode },
}

/// Insertable mission row.
#[derive(Insertable)]
#[diesel(table_name = missions)]
pub struct NewMission<'a> {
    pub code: &'a str,
    pub mission_type: &'a str,
    pub status: &'a str,
    pub employee_id: i64,
    pub transport_id: Option<i64>,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub description: Option<&'a str>,
    pub cancellation_details: Option<&'a str>,
    pub created_at: &'a str,
    pub updated_at: &'a str,
}

/// Insertable destination row.
#[derive(Insertable)]
#[diesel(table_name = mission_destinations)]
pub struct NewMissionDestination {
    pub mission_id: i64,
    pub position: i32,
    pub location_id: i64,
}

/// Code counter row, read and written as is.
#[derive(Queryable, Selectable, Insertable)]
#[diesel(table_name = code_counters)]
pub struct CodeCounterRow {
    pub scheme: String,
    pub period: String,
    pub last_sequence: i64,
}
