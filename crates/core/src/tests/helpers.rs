// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use mission_desk_domain::{
    DestinationInput, EmployeeSummary, Location, Mission, MissionCode, MissionStatus, MissionType,
    parse_date, parse_timestamp,
};
use time::{Date, OffsetDateTime};

pub fn date(value: &str) -> Date {
    parse_date("test", value).unwrap()
}

pub fn timestamp(value: &str) -> OffsetDateTime {
    parse_timestamp("test", value).unwrap()
}

pub fn destinations() -> Vec<DestinationInput> {
    vec![
        DestinationInput::ByName(String::from("Casablanca")),
        DestinationInput::ByReference(3),
    ]
}

pub fn create_test_employee(employee_id: i64) -> EmployeeSummary {
    EmployeeSummary {
        employee_id,
        display_name: format!("Employee {employee_id}"),
        centre: Some(String::from("North")),
        function: None,
    }
}

/// A stored monthly mission for June 2024.
pub fn create_test_mission(
    mission_id: i64,
    employee_id: i64,
    status: MissionStatus,
    created_at: &str,
) -> Mission {
    Mission {
        mission_id,
        code: MissionCode::from_stored(format!("{mission_id:05}/2024")),
        mission_type: MissionType::Monthly,
        status,
        employee: create_test_employee(employee_id),
        destinations: vec![Location {
            location_id: 1,
            name: String::from("Casablanca"),
        }],
        transport: None,
        start_date: date("2024-06-01"),
        end_date: date("2024-06-30"),
        description: Some(String::from("Field audit")),
        cancellation_details: None,
        created_at: timestamp(created_at),
        updated_at: timestamp(created_at),
    }
}
