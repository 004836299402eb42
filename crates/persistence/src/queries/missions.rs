// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mission queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mission_desk_domain::{
    EmployeeSummary, Location, Mission, MissionCode, MissionStatus, MissionType, Transport,
    parse_date, parse_timestamp,
};
use tracing::debug;

use crate::diesel_schema::{locations, mission_destinations, missions};
use crate::error::PersistenceError;
use crate::queries::reference::{get_employee, get_transport};

/// Diesel Queryable struct for mission rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = missions)]
pub struct MissionRow {
    pub mission_id: i64,
    pub code: String,
    pub mission_type: String,
    pub status: String,
    pub employee_id: i64,
    pub transport_id: Option<i64>,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
    pub cancellation_details: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

fn reconstruction(mission_id: i64, err: impl std::fmt::Display) -> PersistenceError {
    PersistenceError::ReconstructionError(format!("mission {mission_id}: {err}"))
}

/// Loads the ordered destinations of a mission.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_destinations(
    conn: &mut SqliteConnection,
    mission_id: i64,
) -> Result<Vec<Location>, PersistenceError> {
    let rows: Vec<(i64, String)> = mission_destinations::table
        .inner_join(locations::table)
        .filter(mission_destinations::mission_id.eq(mission_id))
        .order(mission_destinations::position.asc())
        .select((locations::location_id, locations::name))
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|(location_id, name)| Location { location_id, name })
        .collect())
}

/// Turns a mission row into a fully populated [`Mission`].
///
/// # Errors
///
/// Returns an error if a referenced row is missing or a stored value
/// cannot be parsed.
pub fn hydrate(conn: &mut SqliteConnection, row: MissionRow) -> Result<Mission, PersistenceError> {
    let mission_id: i64 = row.mission_id;

    let employee: EmployeeSummary = get_employee(conn, row.employee_id)?.ok_or_else(|| {
        reconstruction(mission_id, format!("employee {} is missing", row.employee_id))
    })?;
    let transport: Option<Transport> = match row.transport_id {
        Some(transport_id) => Some(get_transport(conn, transport_id)?.ok_or_else(|| {
            reconstruction(mission_id, format!("transport {transport_id} is missing"))
        })?),
        None => None,
    };
    let destinations: Vec<Location> = list_destinations(conn, mission_id)?;

    Ok(Mission {
        mission_id,
        code: MissionCode::from_stored(row.code),
        mission_type: row
            .mission_type
            .parse::<MissionType>()
            .map_err(|e| reconstruction(mission_id, e))?,
        status: row
            .status
            .parse::<MissionStatus>()
            .map_err(|e| reconstruction(mission_id, e))?,
        employee,
        destinations,
        transport,
        start_date: parse_date("start_date", &row.start_date)
            .map_err(|e| reconstruction(mission_id, e))?,
        end_date: parse_date("end_date", &row.end_date)
            .map_err(|e| reconstruction(mission_id, e))?,
        description: row.description,
        cancellation_details: row.cancellation_details,
        created_at: parse_timestamp("created_at", &row.created_at)
            .map_err(|e| reconstruction(mission_id, e))?,
        updated_at: parse_timestamp("updated_at", &row.updated_at)
            .map_err(|e| reconstruction(mission_id, e))?,
    })
}

/// Retrieves a mission by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the mission is not found.
pub fn get_mission(
    conn: &mut SqliteConnection,
    mission_id: i64,
) -> Result<Option<Mission>, PersistenceError> {
    debug!(mission_id, "Looking up mission");

    let row: Option<MissionRow> = missions::table
        .filter(missions::mission_id.eq(mission_id))
        .select(MissionRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|row| hydrate(conn, row)).transpose()
}

/// Lists every monthly mission, whatever its status, in id order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_monthly_missions(
    conn: &mut SqliteConnection,
) -> Result<Vec<Mission>, PersistenceError> {
    let rows: Vec<MissionRow> = missions::table
        .filter(missions::mission_type.eq(MissionType::Monthly.as_str()))
        .order(missions::mission_id.asc())
        .select(MissionRow::as_select())
        .load(conn)?;

    debug!(count = rows.len(), "Loaded monthly missions");

    rows.into_iter().map(|row| hydrate(conn, row)).collect()
}

/// Lists every stored mission code.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_codes(conn: &mut SqliteConnection) -> Result<Vec<String>, PersistenceError> {
    Ok(missions::table.select(missions::code).load(conn)?)
}

/// Checks whether a code is already stored.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn code_exists(conn: &mut SqliteConnection, code: &str) -> Result<bool, PersistenceError> {
    use diesel::dsl::{exists, select};

    Ok(select(exists(missions::table.filter(missions::code.eq(code)))).get_result(conn)?)
}
