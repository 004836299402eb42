// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mission handlers.
//!
//! Each handler translates a request DTO into a core command, lets the core
//! validate and plan it, then hands the plan to persistence. All checks that
//! depend on stored data (employee existence, the monthly guard, code
//! allocation) run inside the persistence write transaction.

use mission_desk::{Command, CreationPlan, MissionChanges, plan_creation};
use mission_desk_domain::{
    CodeScheme, Mission, MissionStatus, MissionType, format_date, format_timestamp, parse_date,
};
use mission_desk_persistence::{Persistence, PersistenceError};
use time::Date;
use tracing::{info, warn};

use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    CreateGroupMissionsRequest, CreateMissionRequest, DeleteMissionResponse,
    GroupMissionsResponse, MissionResponse, UpdateMissionRequest,
};

/// Converts a stored mission into its response DTO.
///
/// # Errors
///
/// Returns an error if a date cannot be formatted.
pub fn mission_response(mission: &Mission) -> Result<MissionResponse, ApiError> {
    Ok(MissionResponse {
        mission_id: mission.mission_id,
        code: mission.code.to_string(),
        mission_type: mission.mission_type.to_string(),
        status: mission.status.to_string(),
        employee_id: mission.employee.employee_id,
        employee_name: mission.employee.display_name.clone(),
        destinations: mission
            .destinations
            .iter()
            .map(|location| location.name.clone())
            .collect(),
        transport: mission.transport.as_ref().map(|t| t.name.clone()),
        start_date: format_date(mission.start_date).map_err(translate_domain_error)?,
        end_date: format_date(mission.end_date).map_err(translate_domain_error)?,
        description: mission.description.clone(),
        cancellation_details: mission.cancellation_details.clone(),
        created_at: format_timestamp(mission.created_at).map_err(translate_domain_error)?,
        updated_at: format_timestamp(mission.updated_at).map_err(translate_domain_error)?,
    })
}

fn parse_request_date(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_date(field, value).map_err(translate_domain_error)
}

fn parse_mission_type(value: &str) -> Result<MissionType, ApiError> {
    value.parse::<MissionType>().map_err(translate_domain_error)
}

/// Creates one mission for one employee.
///
/// # Errors
///
/// Returns an error if:
/// - Any field fails validation
/// - The employee or a referenced location does not exist
/// - The employee already holds an active monthly mission for the month
/// - The database operation fails
pub fn create_single_mission(
    persistence: &mut Persistence,
    request: CreateMissionRequest,
) -> Result<MissionResponse, ApiError> {
    let code_scheme: CodeScheme = match request.code_scheme.as_deref() {
        Some(value) => value.parse().map_err(translate_domain_error)?,
        None => CodeScheme::default(),
    };

    let command: Command = Command::CreateMission {
        employee_id: request.employee_id,
        mission_type: parse_mission_type(&request.mission_type)?,
        start_date: parse_request_date("start_date", &request.start_date)?,
        end_date: parse_request_date("end_date", &request.end_date)?,
        destinations: request.destinations,
        transport: request.transport,
        description: request.description,
        code_scheme,
    };
    let plan: CreationPlan = plan_creation(command).map_err(translate_core_error)?;

    let mut created: Vec<Mission> = persistence.create_missions(&plan).map_err(|err| match err {
        PersistenceError::BatchRejected(mut failures) if failures.len() == 1 => {
            match failures.pop() {
                Some(failure) => translate_domain_error(failure.error),
                None => translate_persistence_error(PersistenceError::BatchRejected(failures)),
            }
        }
        other => translate_persistence_error(other),
    })?;

    let mission: Mission = created.pop().ok_or_else(|| ApiError::Internal {
        message: String::from("Mission insert returned no record"),
    })?;
    info!(
        mission_id = mission.mission_id,
        code = mission.code.as_str(),
        "Mission created"
    );
    mission_response(&mission)
}

/// Creates the same mission for every listed employee, atomically.
///
/// # Errors
///
/// Returns [`ApiError::TransactionAborted`] listing every employee that
/// blocked the batch, or another error if validation or storage fails.
/// Nothing is created in any error case.
pub fn create_group_missions(
    persistence: &mut Persistence,
    request: CreateGroupMissionsRequest,
) -> Result<GroupMissionsResponse, ApiError> {
    let command: Command = Command::CreateGroupMissions {
        employee_ids: request.employee_ids,
        mission_type: parse_mission_type(&request.mission_type)?,
        start_date: parse_request_date("start_date", &request.start_date)?,
        end_date: parse_request_date("end_date", &request.end_date)?,
        destinations: request.destinations,
        transport: request.transport,
        description: request.description,
    };
    let plan: CreationPlan = plan_creation(command).map_err(translate_core_error)?;

    let created: Vec<Mission> = persistence.create_missions(&plan).map_err(|err| {
        warn!(error = %err, "Group mission batch failed");
        translate_persistence_error(err)
    })?;

    let missions: Vec<MissionResponse> = created
        .iter()
        .map(mission_response)
        .collect::<Result<_, _>>()?;
    info!(count = missions.len(), "Group missions created");

    Ok(GroupMissionsResponse {
        message: format!("Created {} missions", missions.len()),
        missions,
    })
}

/// Edits a mission's fields or status.
///
/// # Errors
///
/// Returns an error if the mission does not exist, a field is invalid, the
/// status transition is not allowed, or the edit would give the employee a
/// second active monthly mission for a month.
pub fn update_mission(
    persistence: &mut Persistence,
    mission_id: i64,
    request: UpdateMissionRequest,
) -> Result<MissionResponse, ApiError> {
    let changes: MissionChanges = MissionChanges {
        mission_type: request
            .mission_type
            .as_deref()
            .map(parse_mission_type)
            .transpose()?,
        status: request
            .status
            .as_deref()
            .map(|value| value.parse::<MissionStatus>())
            .transpose()
            .map_err(translate_domain_error)?,
        start_date: request
            .start_date
            .as_deref()
            .map(|value| parse_request_date("start_date", value))
            .transpose()?,
        end_date: request
            .end_date
            .as_deref()
            .map(|value| parse_request_date("end_date", value))
            .transpose()?,
        destinations: request.destinations,
        transport: request.transport,
        description: request.description,
        cancellation_details: request.cancellation_details,
    };

    let mission: Mission = persistence
        .update_mission(mission_id, &changes)
        .map_err(translate_persistence_error)?;
    mission_response(&mission)
}

/// Deletes a mission.
///
/// # Errors
///
/// Returns [`ApiError::NotFound`] if the mission does not exist.
pub fn delete_mission(
    persistence: &mut Persistence,
    mission_id: i64,
) -> Result<DeleteMissionResponse, ApiError> {
    persistence
        .delete_mission(mission_id)
        .map_err(translate_persistence_error)?;

    Ok(DeleteMissionResponse {
        mission_id,
        message: format!("Deleted mission {mission_id}"),
    })
}
