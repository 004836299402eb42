// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use mission_desk_domain::{CodeScheme, DestinationInput, MissionStatus, MissionType};
use time::Date;

/// A command represents caller intent as data only.
///
/// Commands are validated by [`crate::plan_creation`] before any code is
/// allocated or anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Create one mission for one employee.
    CreateMission {
        /// The employee the mission is for.
        employee_id: i64,
        /// Monthly or special.
        mission_type: MissionType,
        /// Requested first day.
        start_date: Date,
        /// Requested last day.
        end_date: Date,
        /// Ordered destinations.
        destinations: Vec<DestinationInput>,
        /// Optional transport name.
        transport: Option<String>,
        /// Optional free text.
        description: Option<String>,
        /// Code format to mint.
        code_scheme: CodeScheme,
    },
    /// Create one mission per employee with shared month, destinations and
    /// transport.
    CreateGroupMissions {
        /// The employees, in allocation order.
        employee_ids: Vec<i64>,
        /// Monthly or special.
        mission_type: MissionType,
        /// Requested first day.
        start_date: Date,
        /// Requested last day.
        end_date: Date,
        /// Ordered destinations shared by every mission.
        destinations: Vec<DestinationInput>,
        /// Transport name shared by every mission.
        transport: String,
        /// Optional free text.
        description: Option<String>,
    },
}

/// Field edits requested for an existing mission.
///
/// `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionChanges {
    pub mission_type: Option<MissionType>,
    pub status: Option<MissionStatus>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub destinations: Option<Vec<DestinationInput>>,
    pub transport: Option<String>,
    pub description: Option<String>,
    pub cancellation_details: Option<String>,
}
