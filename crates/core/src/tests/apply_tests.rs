// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_mission, date, destinations};
use crate::{
    Command, CoreError, CreationPlan, MissionChanges, MissionRevision, apply_changes,
    plan_creation,
};
use mission_desk_domain::{CodeScheme, DomainError, Mission, MissionStatus, MissionType};

fn single_command(mission_type: MissionType, start: &str, end: &str) -> Command {
    Command::CreateMission {
        employee_id: 7,
        mission_type,
        start_date: date(start),
        end_date: date(end),
        destinations: destinations(),
        transport: None,
        description: Some(String::from("  Quarterly audit  ")),
        code_scheme: CodeScheme::Sequential,
    }
}

fn active_june_mission() -> Mission {
    create_test_mission(1, 7, MissionStatus::Active, "2024-05-20T08:00:00.000000Z")
}

fn group_command(employee_ids: Vec<i64>) -> Command {
    Command::CreateGroupMissions {
        employee_ids,
        mission_type: MissionType::Monthly,
        start_date: date("2024-07-01"),
        end_date: date("2024-07-31"),
        destinations: destinations(),
        transport: String::from(" Minibus "),
        description: None,
    }
}

#[test]
fn test_single_monthly_mission_is_normalized_to_whole_month() {
    let plan: CreationPlan =
        plan_creation(single_command(MissionType::Monthly, "2024-06-10", "2024-06-12")).unwrap();

    assert_eq!(plan.scheme, CodeScheme::Sequential);
    assert_eq!(plan.drafts.len(), 1);
    assert_eq!(plan.drafts[0].start_date, date("2024-06-01"));
    assert_eq!(plan.drafts[0].end_date, date("2024-06-30"));
    assert_eq!(plan.drafts[0].description.as_deref(), Some("Quarterly audit"));
    assert!(plan.drafts[0].holds_month());
}

#[test]
fn test_special_mission_keeps_requested_range() {
    let plan: CreationPlan =
        plan_creation(single_command(MissionType::Special, "2024-06-28", "2024-07-03")).unwrap();

    assert_eq!(plan.drafts[0].start_date, date("2024-06-28"));
    assert_eq!(plan.drafts[0].end_date, date("2024-07-03"));
    assert!(!plan.drafts[0].holds_month());
}

#[test]
fn test_monthly_mission_crossing_months_is_rejected() {
    let result: Result<CreationPlan, CoreError> =
        plan_creation(single_command(MissionType::Monthly, "2024-06-28", "2024-07-03"));

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::MonthlyMissionSpansMonths { .. }
        ))
    ));
}

#[test]
fn test_reversed_date_range_is_rejected() {
    let result: Result<CreationPlan, CoreError> =
        plan_creation(single_command(MissionType::Special, "2024-06-10", "2024-06-01"));

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidDateRange { .. }
        ))
    ));
}

#[test]
fn test_single_create_honours_legacy_scheme() {
    let command: Command = Command::CreateMission {
        employee_id: 7,
        mission_type: MissionType::Monthly,
        start_date: date("2024-06-01"),
        end_date: date("2024-06-30"),
        destinations: destinations(),
        transport: Some(String::from("Train")),
        description: None,
        code_scheme: CodeScheme::Legacy,
    };

    let plan: CreationPlan = plan_creation(command).unwrap();

    assert_eq!(plan.scheme, CodeScheme::Legacy);
    assert_eq!(plan.transport.as_deref(), Some("Train"));
}

#[test]
fn test_group_plan_keeps_request_order_and_shares_fields() {
    let plan: CreationPlan = plan_creation(group_command(vec![12, 4, 9])).unwrap();

    let employees: Vec<i64> = plan.drafts.iter().map(|d| d.employee_id).collect();
    assert_eq!(employees, vec![12, 4, 9]);
    assert_eq!(plan.scheme, CodeScheme::Sequential);
    assert_eq!(plan.transport.as_deref(), Some("Minibus"));
    assert!(plan.drafts.iter().all(|d| d.destinations == destinations()));
    assert_eq!(plan.months().len(), 3);
}

#[test]
fn test_group_plan_rejects_empty_employee_list() {
    let result: Result<CreationPlan, CoreError> = plan_creation(group_command(Vec::new()));

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidEmployeeList(_)
        ))
    ));
}

#[test]
fn test_group_plan_rejects_repeated_employee() {
    let result: Result<CreationPlan, CoreError> = plan_creation(group_command(vec![3, 5, 3]));

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::DuplicateEmployee {
            employee_id: 3
        }))
    );
}

#[test]
fn test_group_plan_rejects_blank_transport() {
    let command: Command = Command::CreateGroupMissions {
        employee_ids: vec![1],
        mission_type: MissionType::Monthly,
        start_date: date("2024-07-01"),
        end_date: date("2024-07-31"),
        destinations: destinations(),
        transport: String::from("   "),
        description: None,
    };

    assert!(matches!(
        plan_creation(command),
        Err(CoreError::DomainViolation(DomainError::InvalidTransport(_)))
    ));
}

#[test]
fn test_completing_active_mission_releases_month() {
    let current: Mission = active_june_mission();
    let changes: MissionChanges = MissionChanges {
        status: Some(MissionStatus::Completed),
        ..MissionChanges::default()
    };

    let revision: MissionRevision = apply_changes(&current, changes).unwrap();

    assert_eq!(revision.status, MissionStatus::Completed);
    assert!(!revision.holds_month());
    assert_eq!(revision.description.as_deref(), Some("Field audit"));
}

#[test]
fn test_reactivating_cancelled_mission_is_rejected() {
    let current: Mission =
        create_test_mission(1, 7, MissionStatus::Cancelled, "2024-05-20T08:00:00.000000Z");
    let changes: MissionChanges = MissionChanges {
        status: Some(MissionStatus::Active),
        ..MissionChanges::default()
    };

    let result: Result<MissionRevision, CoreError> = apply_changes(&current, changes);

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::InvalidStatusTransition {
                from: MissionStatus::Cancelled,
                to: MissionStatus::Active,
            }
        ))
    );
}

#[test]
fn test_moving_monthly_mission_takes_whole_new_month() {
    let current: Mission = active_june_mission();
    let changes: MissionChanges = MissionChanges {
        start_date: Some(date("2024-09-15")),
        ..MissionChanges::default()
    };

    let revision: MissionRevision = apply_changes(&current, changes).unwrap();

    assert_eq!(revision.start_date, date("2024-09-01"));
    assert_eq!(revision.end_date, date("2024-09-30"));
    assert_eq!(revision.month().to_string(), "2024-09");
}

#[test]
fn test_blank_description_edit_clears_description() {
    let current: Mission = active_june_mission();
    let changes: MissionChanges = MissionChanges {
        description: Some(String::from("  ")),
        ..MissionChanges::default()
    };

    let revision: MissionRevision = apply_changes(&current, changes).unwrap();

    assert_eq!(revision.description, None);
}

#[test]
fn test_empty_replacement_destinations_are_rejected() {
    let current: Mission = active_june_mission();
    let changes: MissionChanges = MissionChanges {
        destinations: Some(Vec::new()),
        ..MissionChanges::default()
    };

    assert!(matches!(
        apply_changes(&current, changes),
        Err(CoreError::DomainViolation(
            DomainError::InvalidDestinations(_)
        ))
    ));
}
