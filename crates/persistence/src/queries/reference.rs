// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data lookups (employees, locations, transports).

use diesel::prelude::*;
use diesel::SqliteConnection;
use mission_desk_domain::{EmployeeSummary, Location, Transport};
use tracing::debug;

use crate::diesel_schema::{employees, locations, transports};
use crate::error::PersistenceError;

/// Diesel Queryable struct for employee rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = employees)]
struct EmployeeRow {
    employee_id: i64,
    display_name: String,
    centre: Option<String>,
    function: Option<String>,
}

impl From<EmployeeRow> for EmployeeSummary {
    fn from(row: EmployeeRow) -> Self {
        Self {
            employee_id: row.employee_id,
            display_name: row.display_name,
            centre: row.centre,
            function: row.function,
        }
    }
}

/// Retrieves an employee by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the employee is not found.
pub fn get_employee(
    conn: &mut SqliteConnection,
    employee_id: i64,
) -> Result<Option<EmployeeSummary>, PersistenceError> {
    debug!(employee_id, "Looking up employee");

    let row: Option<EmployeeRow> = employees::table
        .filter(employees::employee_id.eq(employee_id))
        .select(EmployeeRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(EmployeeSummary::from))
}

/// Retrieves a location by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_location(
    conn: &mut SqliteConnection,
    location_id: i64,
) -> Result<Option<Location>, PersistenceError> {
    let row: Option<(i64, String)> = locations::table
        .filter(locations::location_id.eq(location_id))
        .select((locations::location_id, locations::name))
        .first(conn)
        .optional()?;

    Ok(row.map(|(location_id, name)| Location { location_id, name }))
}

/// Retrieves a location by its case-folded name key.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_location_by_key(
    conn: &mut SqliteConnection,
    name_key: &str,
) -> Result<Option<Location>, PersistenceError> {
    let row: Option<(i64, String)> = locations::table
        .filter(locations::name_key.eq(name_key))
        .select((locations::location_id, locations::name))
        .first(conn)
        .optional()?;

    Ok(row.map(|(location_id, name)| Location { location_id, name }))
}

/// Retrieves a transport by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_transport(
    conn: &mut SqliteConnection,
    transport_id: i64,
) -> Result<Option<Transport>, PersistenceError> {
    let row: Option<(i64, String)> = transports::table
        .filter(transports::transport_id.eq(transport_id))
        .select((transports::transport_id, transports::name))
        .first(conn)
        .optional()?;

    Ok(row.map(|(transport_id, name)| Transport { transport_id, name }))
}

/// Retrieves a transport by its case-folded name key.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_transport_by_key(
    conn: &mut SqliteConnection,
    name_key: &str,
) -> Result<Option<Transport>, PersistenceError> {
    let row: Option<(i64, String)> = transports::table
        .filter(transports::name_key.eq(name_key))
        .select((transports::transport_id, transports::name))
        .first(conn)
        .optional()?;

    Ok(row.map(|(transport_id, name)| Transport { transport_id, name }))
}
