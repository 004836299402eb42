// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use mission_desk_domain::{
    DestinationInput, MissionCode, MissionStatus, MissionType, parse_date, parse_timestamp,
};
use mission_desk_persistence::{MissionImport, Persistence, RestoreOutcome};

use crate::{CreateGroupMissionsRequest, CreateMissionRequest};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn seed_employee(persistence: &mut Persistence, name: &str) -> i64 {
    persistence
        .create_employee(name, Some("North"), Some("Inspector"))
        .expect("employee insert")
}

pub fn oran() -> Vec<DestinationInput> {
    vec![DestinationInput::ByName(String::from("Oran"))]
}

/// A monthly mission request covering June 2024.
pub fn june_request(employee_id: i64) -> CreateMissionRequest {
    CreateMissionRequest {
        employee_id,
        mission_type: String::from("monthly"),
        start_date: String::from("2024-06-01"),
        end_date: String::from("2024-06-30"),
        destinations: oran(),
        transport: None,
        description: None,
        code_scheme: None,
    }
}

/// A group request for July 2024 to Oran by car.
pub fn july_group_request(employee_ids: Vec<i64>) -> CreateGroupMissionsRequest {
    CreateGroupMissionsRequest {
        employee_ids,
        mission_type: String::from("monthly"),
        start_date: String::from("2024-07-01"),
        end_date: String::from("2024-07-31"),
        destinations: oran(),
        transport: String::from("Car"),
        description: None,
    }
}

/// Inserts an active September 2024 monthly mission, bypassing the guard
/// the way a historical import does.
pub fn seed_september_duplicate(
    persistence: &mut Persistence,
    employee_id: i64,
    code: &str,
    created_at: &str,
) -> i64 {
    let created_at = parse_timestamp("created_at", created_at).expect("valid timestamp");
    let import: MissionImport = MissionImport {
        code: MissionCode::from_stored(code.to_string()),
        mission_type: MissionType::Monthly,
        status: MissionStatus::Active,
        employee_id,
        start_date: parse_date("start_date", "2024-09-01").expect("valid date"),
        end_date: parse_date("end_date", "2024-09-30").expect("valid date"),
        destinations: vec![String::from("Oran")],
        transport: Some(String::from("Car")),
        description: None,
        cancellation_details: None,
        created_at,
        updated_at: created_at,
    };

    match persistence
        .restore_mission(&import, true)
        .expect("forced restore")
    {
        RestoreOutcome::Restored { mission_id } => mission_id,
        other => panic!("unexpected restore outcome: {other:?}"),
    }
}
