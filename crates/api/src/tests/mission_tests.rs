// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use mission_desk_domain::{DestinationInput, TargetMonth};

use crate::{
    ApiError, CreateMissionRequest, GroupMissionsResponse, MissionResponse, UpdateMissionRequest,
    create_group_missions, create_single_mission, delete_mission, update_mission,
};

use super::helpers::{
    create_test_persistence, july_group_request, june_request, oran, seed_employee,
};

// ============================================================================
// Single creation
// ============================================================================

#[test]
fn test_first_monthly_mission_gets_first_code_and_second_conflicts() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");

    let mission: MissionResponse =
        create_single_mission(&mut persistence, june_request(e1)).unwrap();
    assert_eq!(mission.code, "00001/2024");
    assert_eq!(mission.status, "active");
    assert_eq!(mission.mission_type, "monthly");
    assert_eq!(mission.start_date, "2024-06-01");
    assert_eq!(mission.end_date, "2024-06-30");
    assert_eq!(mission.destinations, vec![String::from("Oran")]);
    assert_eq!(mission.employee_name, "Amina Belkacem");

    let err: ApiError = create_single_mission(&mut persistence, june_request(e1)).unwrap_err();
    match err {
        ApiError::Conflict { rule, message } => {
            assert_eq!(rule, "one_active_monthly_mission");
            assert!(message.contains("2024-06"));
            assert!(message.contains("00001/2024"));
        }
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn test_monthly_mission_is_widened_to_the_whole_month() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");

    let request: CreateMissionRequest = CreateMissionRequest {
        start_date: String::from("2024-02-10"),
        end_date: String::from("2024-02-12"),
        ..june_request(e1)
    };
    let mission: MissionResponse = create_single_mission(&mut persistence, request).unwrap();

    assert_eq!(mission.start_date, "2024-02-01");
    assert_eq!(mission.end_date, "2024-02-29");
}

#[test]
fn test_special_mission_does_not_hold_the_month() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");
    create_single_mission(&mut persistence, june_request(e1)).unwrap();

    let request: CreateMissionRequest = CreateMissionRequest {
        mission_type: String::from("special"),
        start_date: String::from("2024-06-10"),
        end_date: String::from("2024-06-12"),
        ..june_request(e1)
    };
    let special: MissionResponse = create_single_mission(&mut persistence, request).unwrap();

    assert_eq!(special.code, "00002/2024");
    assert_eq!(special.start_date, "2024-06-10");
}

#[test]
fn test_legacy_scheme_mints_monthly_code() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");

    let request: CreateMissionRequest = CreateMissionRequest {
        code_scheme: Some(String::from("legacy")),
        ..june_request(e1)
    };
    let mission: MissionResponse = create_single_mission(&mut persistence, request).unwrap();

    assert_eq!(mission.code, "M2406001");
}

#[test]
fn test_unknown_code_scheme_is_rejected() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");

    let request: CreateMissionRequest = CreateMissionRequest {
        code_scheme: Some(String::from("roman")),
        ..june_request(e1)
    };
    let err: ApiError = create_single_mission(&mut persistence, request).unwrap_err();

    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "code_scheme"));
}

#[test]
fn test_malformed_date_names_the_field() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");

    let request: CreateMissionRequest = CreateMissionRequest {
        start_date: String::from("2024-13-01"),
        ..june_request(e1)
    };
    let err: ApiError = create_single_mission(&mut persistence, request).unwrap_err();

    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "start_date"));
}

#[test]
fn test_unknown_mission_type_is_rejected() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");

    let request: CreateMissionRequest = CreateMissionRequest {
        mission_type: String::from("weekly"),
        ..june_request(e1)
    };
    let err: ApiError = create_single_mission(&mut persistence, request).unwrap_err();

    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "mission_type"));
}

#[test]
fn test_empty_destinations_are_rejected_before_allocation() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");

    let request: CreateMissionRequest = CreateMissionRequest {
        destinations: Vec::new(),
        ..june_request(e1)
    };
    let err: ApiError = create_single_mission(&mut persistence, request).unwrap_err();
    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "destinations"));

    let mission: MissionResponse =
        create_single_mission(&mut persistence, june_request(e1)).unwrap();
    assert_eq!(mission.code, "00001/2024");
}

#[test]
fn test_unknown_employee_is_not_found() {
    let mut persistence = create_test_persistence();

    let err: ApiError = create_single_mission(&mut persistence, june_request(404)).unwrap_err();

    assert!(matches!(err, ApiError::NotFound { ref resource_type, .. } if resource_type == "Employee"));
}

#[test]
fn test_unknown_location_reference_is_not_found() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");

    let request: CreateMissionRequest = CreateMissionRequest {
        destinations: vec![DestinationInput::ByReference(9999)],
        ..june_request(e1)
    };
    let err: ApiError = create_single_mission(&mut persistence, request).unwrap_err();

    assert!(matches!(err, ApiError::NotFound { ref resource_type, .. } if resource_type == "Location"));
}

// ============================================================================
// Group creation
// ============================================================================

#[test]
fn test_group_creation_after_single_continues_the_sequence() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");
    let e2: i64 = seed_employee(&mut persistence, "Karim Haddad");
    create_single_mission(&mut persistence, june_request(e1)).unwrap();

    let response: GroupMissionsResponse =
        create_group_missions(&mut persistence, july_group_request(vec![e1, e2])).unwrap();

    let codes: Vec<&str> = response.missions.iter().map(|m| m.code.as_str()).collect();
    assert_eq!(codes, vec!["00002/2024", "00003/2024"]);
    for mission in &response.missions {
        assert_eq!(mission.status, "active");
        assert_eq!(mission.transport.as_deref(), Some("Car"));
        assert_eq!(mission.destinations, vec![String::from("Oran")]);
    }
}

#[test]
fn test_group_creation_is_all_or_nothing() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");
    let e2: i64 = seed_employee(&mut persistence, "Karim Haddad");
    create_group_missions(&mut persistence, july_group_request(vec![e1])).unwrap();

    let err: ApiError =
        create_group_missions(&mut persistence, july_group_request(vec![e2, e1, 777])).unwrap_err();

    match err {
        ApiError::TransactionAborted { failures, .. } => {
            let failed: Vec<i64> = failures.iter().map(|f| f.employee_id).collect();
            assert_eq!(failed, vec![e1, 777]);
            assert!(failures[0].reason.contains("2024-07"));
        }
        other => panic!("expected abort, got {other:?}"),
    }

    let july: TargetMonth = TargetMonth::new(2024, 7).unwrap();
    assert!(
        persistence
            .find_active_monthly_conflict(e2, july, None)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_group_with_repeated_employee_is_rejected() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");

    let err: ApiError =
        create_group_missions(&mut persistence, july_group_request(vec![e1, e1])).unwrap_err();

    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "employee_ids"));
}

#[test]
fn test_group_with_blank_transport_is_rejected() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");

    let mut request = july_group_request(vec![e1]);
    request.transport = String::from("   ");
    let err: ApiError = create_group_missions(&mut persistence, request).unwrap_err();

    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "transport"));
}

// ============================================================================
// Update and delete
// ============================================================================

#[test]
fn test_cancelling_frees_the_month() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");
    let first: MissionResponse =
        create_single_mission(&mut persistence, june_request(e1)).unwrap();

    let cancelled: MissionResponse = update_mission(
        &mut persistence,
        first.mission_id,
        UpdateMissionRequest {
            status: Some(String::from("cancelled")),
            cancellation_details: Some(String::from("Vehicle unavailable")),
            ..UpdateMissionRequest::default()
        },
    )
    .unwrap();
    assert_eq!(cancelled.status, "cancelled");
    assert_eq!(
        cancelled.cancellation_details.as_deref(),
        Some("Vehicle unavailable")
    );

    let replacement: MissionResponse =
        create_single_mission(&mut persistence, june_request(e1)).unwrap();
    assert_eq!(replacement.code, "00002/2024");
}

#[test]
fn test_reactivating_a_cancelled_mission_is_rejected() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");
    let mission: MissionResponse =
        create_single_mission(&mut persistence, june_request(e1)).unwrap();
    update_mission(
        &mut persistence,
        mission.mission_id,
        UpdateMissionRequest {
            status: Some(String::from("cancelled")),
            ..UpdateMissionRequest::default()
        },
    )
    .unwrap();

    let err: ApiError = update_mission(
        &mut persistence,
        mission.mission_id,
        UpdateMissionRequest {
            status: Some(String::from("active")),
            ..UpdateMissionRequest::default()
        },
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::Validation { ref field, .. } if field == "status"));
}

#[test]
fn test_moving_into_a_held_month_conflicts() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");
    create_single_mission(&mut persistence, june_request(e1)).unwrap();
    let may: MissionResponse = create_single_mission(
        &mut persistence,
        CreateMissionRequest {
            start_date: String::from("2024-05-01"),
            end_date: String::from("2024-05-31"),
            ..june_request(e1)
        },
    )
    .unwrap();

    let err: ApiError = update_mission(
        &mut persistence,
        may.mission_id,
        UpdateMissionRequest {
            start_date: Some(String::from("2024-06-03")),
            ..UpdateMissionRequest::default()
        },
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::Conflict { ref rule, .. } if rule == "one_active_monthly_mission"));
}

#[test]
fn test_editing_description_keeps_the_month() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");
    let mission: MissionResponse =
        create_single_mission(&mut persistence, june_request(e1)).unwrap();

    let updated: MissionResponse = update_mission(
        &mut persistence,
        mission.mission_id,
        UpdateMissionRequest {
            description: Some(String::from("Quarterly audit")),
            destinations: Some(vec![
                DestinationInput::ByName(String::from("Tlemcen")),
                oran().remove(0),
            ]),
            ..UpdateMissionRequest::default()
        },
    )
    .unwrap();

    assert_eq!(updated.code, mission.code);
    assert_eq!(updated.description.as_deref(), Some("Quarterly audit"));
    assert_eq!(
        updated.destinations,
        vec![String::from("Tlemcen"), String::from("Oran")]
    );
}

#[test]
fn test_updating_missing_mission_is_not_found() {
    let mut persistence = create_test_persistence();

    let err: ApiError =
        update_mission(&mut persistence, 42, UpdateMissionRequest::default()).unwrap_err();

    assert!(matches!(err, ApiError::NotFound { ref resource_type, .. } if resource_type == "Mission"));
}

#[test]
fn test_delete_then_delete_again() {
    let mut persistence = create_test_persistence();
    let e1: i64 = seed_employee(&mut persistence, "Amina Belkacem");
    let mission: MissionResponse =
        create_single_mission(&mut persistence, june_request(e1)).unwrap();

    let ack = delete_mission(&mut persistence, mission.mission_id).unwrap();
    assert_eq!(ack.mission_id, mission.mission_id);

    let err: ApiError = delete_mission(&mut persistence, mission.mission_id).unwrap_err();
    assert!(matches!(err, ApiError::NotFound { .. }));
}
