// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod concurrency_tests;
mod error_classification_tests;
mod initialization_tests;

use mission_desk::{Command, CreationPlan, plan_creation};
use mission_desk_domain::{CodeScheme, DestinationInput, MissionType, parse_date};
use time::Date;

use crate::Persistence;

pub fn date(value: &str) -> Date {
    parse_date("test", value).expect("valid test date")
}

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("in-memory database")
}

pub fn seed_employee(persistence: &mut Persistence, name: &str) -> i64 {
    persistence
        .create_employee(name, Some("North"), Some("Inspector"))
        .expect("employee insert")
}

/// A validated single monthly mission for the month of `start`.
pub fn monthly_plan(employee_id: i64, start: &str, scheme: CodeScheme) -> CreationPlan {
    plan_creation(Command::CreateMission {
        employee_id,
        mission_type: MissionType::Monthly,
        start_date: date(start),
        end_date: date(start),
        destinations: vec![DestinationInput::ByName(String::from("Oran"))],
        transport: None,
        description: None,
        code_scheme: scheme,
    })
    .expect("valid plan")
}

/// A validated group of monthly missions for July 2024.
pub fn group_plan(employee_ids: Vec<i64>) -> CreationPlan {
    plan_creation(Command::CreateGroupMissions {
        employee_ids,
        mission_type: MissionType::Monthly,
        start_date: date("2024-07-01"),
        end_date: date("2024-07-31"),
        destinations: vec![DestinationInput::ByName(String::from("Oran"))],
        transport: String::from("Car"),
        description: Some(String::from("Regional inspection")),
    })
    .expect("valid plan")
}
