// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mission writes.
//!
//! Every function here expects to run inside the `BEGIN IMMEDIATE`
//! transaction opened by `backend::sqlite::write_transaction`: the guard
//! reads and the inserts that depend on them must see the same snapshot.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mission_desk::{CreationPlan, MissionChanges, MissionDraft, MissionRevision, apply_changes};
use mission_desk_domain::{
    DestinationInput, DomainError, IssuedSequences, Location, Mission, MissionCode,
    MissionStatus, MissionType, TargetMonth, allocate_codes, format_date, format_timestamp,
    parse_code,
};
use num_traits::ToPrimitive;
use time::OffsetDateTime;
use tracing::{debug, info, warn};

use crate::data_models::{
    EmployeeFailure, MissionImport, NewMission, NewMissionDestination, RestoreOutcome,
};
use crate::diesel_schema::{mission_destinations, missions};
use crate::error::PersistenceError;
use crate::mutations::counters::record_issued_code;
use crate::mutations::reference::{resolve_destinations, upsert_transport};
use crate::queries::counters::load_issued_sequences;
use crate::queries::guard::{ensure_month_free, find_month_holder};
use crate::queries::missions::{code_exists, get_mission, list_codes};
use crate::queries::reference::get_employee;

/// Stores the ordered destinations of a mission.
fn insert_destinations(
    conn: &mut SqliteConnection,
    mission_id: i64,
    destinations: &[Location],
) -> Result<(), PersistenceError> {
    let mut rows: Vec<NewMissionDestination> = Vec::with_capacity(destinations.len());
    for (index, location) in destinations.iter().enumerate() {
        let position: i32 = index.to_i32().ok_or_else(|| {
            PersistenceError::QueryFailed(format!("destination position {index} out of range"))
        })?;
        rows.push(NewMissionDestination {
            mission_id,
            position,
            location_id: location.location_id,
        });
    }
    if rows.is_empty() {
        return Ok(());
    }

    diesel::insert_into(mission_destinations::table)
        .values(rows)
        .execute(conn)?;
    Ok(())
}

/// Reports why `draft` cannot be created, or `None` if it can.
fn draft_failure(
    conn: &mut SqliteConnection,
    draft: &MissionDraft,
) -> Result<Option<DomainError>, PersistenceError> {
    if get_employee(conn, draft.employee_id)?.is_none() {
        return Ok(Some(DomainError::EmployeeNotFound(draft.employee_id)));
    }

    if draft.holds_month() {
        let month: TargetMonth = draft.month();
        if let Some(holder) = find_month_holder(conn, draft.employee_id, month, None)? {
            return Ok(Some(DomainError::ActiveMonthlyMissionExists {
                employee_id: draft.employee_id,
                month,
                existing_code: holder.code.to_string(),
            }));
        }
    }

    Ok(None)
}

/// Creates every mission of `plan`, or none of them.
///
/// Steps, all inside the caller's write transaction:
/// 1. Check every employee exists and does not already hold the month.
///    All failures are collected before giving up.
/// 2. Allocate one code per draft above both the codes currently stored
///    and the highest code ever issued in the period, then raise the
///    counters so deleted codes are not handed out again.
/// 3. Resolve the transport and destinations, then insert each mission.
///
/// # Errors
///
/// Returns [`PersistenceError::BatchRejected`] listing every failing
/// employee, a domain error for unresolvable destinations or corrupt
/// stored codes, or a database error. Any error rolls the batch back.
pub fn insert_missions(
    conn: &mut SqliteConnection,
    plan: &CreationPlan,
    now: OffsetDateTime,
) -> Result<Vec<Mission>, PersistenceError> {
    let mut failures: Vec<EmployeeFailure> = Vec::new();
    for draft in &plan.drafts {
        if let Some(error) = draft_failure(conn, draft)? {
            failures.push(EmployeeFailure {
                employee_id: draft.employee_id,
                error,
            });
        }
    }
    if !failures.is_empty() {
        warn!(
            failed = failures.len(),
            requested = plan.drafts.len(),
            "Rejecting mission batch"
        );
        return Err(PersistenceError::BatchRejected(failures));
    }

    let existing: Vec<String> = list_codes(conn)?;
    let issued: IssuedSequences = load_issued_sequences(conn)?;
    let codes: Vec<MissionCode> =
        allocate_codes(plan.scheme, &existing, &issued, &plan.months())?;
    for code in &codes {
        record_issued_code(conn, code)?;
    }
    debug!(
        scheme = %plan.scheme,
        first = codes.first().map(MissionCode::as_str),
        count = codes.len(),
        "Allocated mission codes"
    );

    let transport_id: Option<i64> = match plan.transport.as_deref() {
        Some(name) => Some(upsert_transport(conn, name)?.transport_id),
        None => None,
    };
    let timestamp: String = format_timestamp(now)?;

    let mut created: Vec<Mission> = Vec::with_capacity(plan.drafts.len());
    for (draft, code) in plan.drafts.iter().zip(codes.iter()) {
        let destinations: Vec<Location> = resolve_destinations(conn, &draft.destinations)?;
        let start_date: String = format_date(draft.start_date)?;
        let end_date: String = format_date(draft.end_date)?;

        let mission_id: i64 = diesel::insert_into(missions::table)
            .values(NewMission {
                code: code.as_str(),
                mission_type: draft.mission_type.as_str(),
                status: MissionStatus::Active.as_str(),
                employee_id: draft.employee_id,
                transport_id,
                start_date: &start_date,
                end_date: &end_date,
                description: draft.description.as_deref(),
                cancellation_details: None,
                created_at: &timestamp,
                updated_at: &timestamp,
            })
            .returning(missions::mission_id)
            .get_result(conn)?;
        insert_destinations(conn, mission_id, &destinations)?;

        info!(
            mission_id,
            code = code.as_str(),
            employee_id = draft.employee_id,
            mission_type = %draft.mission_type,
            "Created mission"
        );

        let mission: Mission = get_mission(conn, mission_id)?
            .ok_or(PersistenceError::MissionNotFound(mission_id))?;
        created.push(mission);
    }

    Ok(created)
}

/// Applies `changes` to a stored mission.
///
/// The monthly guard runs only when the edit makes the mission claim a
/// month it did not already hold (a type change or a move to another
/// month). Plain field edits on historical duplicates still go through.
///
/// # Errors
///
/// Returns an error if the mission does not exist, the edit is invalid,
/// the target month is taken, or the database operation fails.
pub fn update_mission(
    conn: &mut SqliteConnection,
    mission_id: i64,
    changes: &MissionChanges,
    now: OffsetDateTime,
) -> Result<Mission, PersistenceError> {
    let current: Mission =
        get_mission(conn, mission_id)?.ok_or(PersistenceError::MissionNotFound(mission_id))?;
    let revision: MissionRevision = apply_changes(&current, changes.clone())?;

    let claims_new_month: bool =
        revision.holds_month() && (!current.holds_month() || revision.month() != current.month());
    if claims_new_month {
        ensure_month_free(
            conn,
            current.employee.employee_id,
            revision.month(),
            Some(mission_id),
        )?;
    }

    let transport_id: Option<i64> = match revision.transport.as_deref() {
        Some(name) => Some(upsert_transport(conn, name)?.transport_id),
        None => current.transport.as_ref().map(|t| t.transport_id),
    };

    if let Some(destinations) = &revision.destinations {
        let resolved: Vec<Location> = resolve_destinations(conn, destinations)?;
        diesel::delete(
            mission_destinations::table.filter(mission_destinations::mission_id.eq(mission_id)),
        )
        .execute(conn)?;
        insert_destinations(conn, mission_id, &resolved)?;
    }

    let start_date: String = format_date(revision.start_date)?;
    let end_date: String = format_date(revision.end_date)?;
    let timestamp: String = format_timestamp(now)?;

    diesel::update(missions::table.find(mission_id))
        .set((
            missions::mission_type.eq(revision.mission_type.as_str()),
            missions::status.eq(revision.status.as_str()),
            missions::start_date.eq(&start_date),
            missions::end_date.eq(&end_date),
            missions::description.eq(revision.description.as_deref()),
            missions::cancellation_details.eq(revision.cancellation_details.as_deref()),
            missions::transport_id.eq(transport_id),
            missions::updated_at.eq(&timestamp),
        ))
        .execute(conn)?;

    info!(
        mission_id,
        code = current.code.as_str(),
        status = %revision.status,
        "Updated mission"
    );

    get_mission(conn, mission_id)?.ok_or(PersistenceError::MissionNotFound(mission_id))
}

/// Deletes a mission and its destination rows.
///
/// # Errors
///
/// Returns an error if the mission does not exist or the delete fails.
pub fn delete_mission(
    conn: &mut SqliteConnection,
    mission_id: i64,
) -> Result<(), PersistenceError> {
    let deleted: usize = diesel::delete(missions::table.find(mission_id)).execute(conn)?;
    if deleted == 0 {
        return Err(PersistenceError::MissionNotFound(mission_id));
    }

    info!(mission_id, "Deleted mission");
    Ok(())
}

/// Re-inserts a mission from a backup, keeping its code and timestamps.
///
/// Without `force`, an active monthly mission is skipped when its month is
/// already held. With `force` the guard is bypassed, which is how historical
/// duplicates are imported. Destinations are taken as stored, including an
/// empty list. The code counter of the restored code's period is raised.
///
/// # Errors
///
/// Returns an error if the code is malformed, the employee does not exist,
/// the record is invalid, or the database operation fails.
pub fn restore_mission(
    conn: &mut SqliteConnection,
    import: &MissionImport,
    force: bool,
) -> Result<RestoreOutcome, PersistenceError> {
    parse_code(import.code.as_str())?;

    if code_exists(conn, import.code.as_str())? {
        debug!(code = import.code.as_str(), "Code already present, skipping");
        return Ok(RestoreOutcome::CodeExists);
    }
    if get_employee(conn, import.employee_id)?.is_none() {
        return Err(PersistenceError::DomainViolation(
            DomainError::EmployeeNotFound(import.employee_id),
        ));
    }
    if import.start_date > import.end_date {
        return Err(PersistenceError::DomainViolation(
            DomainError::InvalidDateRange {
                start_date: import.start_date,
                end_date: import.end_date,
            },
        ));
    }

    let holds_month: bool =
        import.mission_type == MissionType::Monthly && import.status == MissionStatus::Active;
    if holds_month && !force {
        let month: TargetMonth = TargetMonth::from_date(import.start_date);
        if let Some(holder) = find_month_holder(conn, import.employee_id, month, None)? {
            return Ok(RestoreOutcome::MonthTaken {
                existing_code: holder.code,
            });
        }
    }

    let destinations: Vec<DestinationInput> = import
        .destinations
        .iter()
        .cloned()
        .map(DestinationInput::ByName)
        .collect();
    let resolved: Vec<Location> = resolve_destinations(conn, &destinations)?;

    let transport_id: Option<i64> = match import.transport.as_deref() {
        Some(name) => Some(upsert_transport(conn, name)?.transport_id),
        None => None,
    };

    let start_date: String = format_date(import.start_date)?;
    let end_date: String = format_date(import.end_date)?;
    let created_at: String = format_timestamp(import.created_at)?;
    let updated_at: String = format_timestamp(import.updated_at)?;

    let mission_id: i64 = diesel::insert_into(missions::table)
        .values(NewMission {
            code: import.code.as_str(),
            mission_type: import.mission_type.as_str(),
            status: import.status.as_str(),
            employee_id: import.employee_id,
            transport_id,
            start_date: &start_date,
            end_date: &end_date,
            description: import.description.as_deref(),
            cancellation_details: import.cancellation_details.as_deref(),
            created_at: &created_at,
            updated_at: &updated_at,
        })
        .returning(missions::mission_id)
        .get_result(conn)?;
    insert_destinations(conn, mission_id, &resolved)?;
    record_issued_code(conn, &import.code)?;

    info!(
        mission_id,
        code = import.code.as_str(),
        employee_id = import.employee_id,
        force,
        "Restored mission"
    );

    Ok(RestoreOutcome::Restored { mission_id })
}
