// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data writes.
//!
//! Locations and transports are matched by a case-folded name key. The
//! upsert is an `INSERT ... ON CONFLICT DO NOTHING` followed by a select, so
//! two requests naming the same new location resolve to one row.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mission_desk_domain::{
    DestinationInput, DomainError, Location, Transport, normalize_name_key, validate_transport,
};
use tracing::{debug, info};

use crate::diesel_schema::{employees, locations, transports};
use crate::error::PersistenceError;
use crate::queries::reference::{find_location_by_key, find_transport_by_key, get_location};

/// Inserts an employee and returns the assigned ID.
///
/// # Errors
///
/// Returns an error if the display name is blank or the insert fails.
pub fn insert_employee(
    conn: &mut SqliteConnection,
    display_name: &str,
    centre: Option<&str>,
    function: Option<&str>,
) -> Result<i64, PersistenceError> {
    let display_name: &str = display_name.trim();
    if display_name.is_empty() {
        return Err(PersistenceError::DomainViolation(
            DomainError::InvalidEmployeeList(String::from("employee name must not be blank")),
        ));
    }

    let employee_id: i64 = diesel::insert_into(employees::table)
        .values((
            employees::display_name.eq(display_name),
            employees::centre.eq(centre),
            employees::function.eq(function),
        ))
        .returning(employees::employee_id)
        .get_result(conn)?;

    info!(employee_id, display_name, "Inserted employee");
    Ok(employee_id)
}

/// Returns the location named `name`, creating it if absent.
///
/// # Errors
///
/// Returns an error if the database operation fails.
pub fn upsert_location(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Location, PersistenceError> {
    let name: &str = name.trim();
    let name_key: String = normalize_name_key(name);

    let inserted: usize = diesel::insert_into(locations::table)
        .values((locations::name.eq(name), locations::name_key.eq(&name_key)))
        .on_conflict(locations::name_key)
        .do_nothing()
        .execute(conn)?;

    let location: Location = find_location_by_key(conn, &name_key)?
        .ok_or_else(|| PersistenceError::NotFound(format!("location '{name}'")))?;

    if inserted > 0 {
        info!(location_id = location.location_id, name, "Created location");
    }
    Ok(location)
}

/// Returns the transport named `name`, creating it if absent.
///
/// # Errors
///
/// Returns an error if the name is blank or the database operation fails.
pub fn upsert_transport(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Transport, PersistenceError> {
    let name: String = validate_transport(name)?;
    let name_key: String = normalize_name_key(&name);

    let inserted: usize = diesel::insert_into(transports::table)
        .values((
            transports::name.eq(&name),
            transports::name_key.eq(&name_key),
        ))
        .on_conflict(transports::name_key)
        .do_nothing()
        .execute(conn)?;

    let transport: Transport = find_transport_by_key(conn, &name_key)?
        .ok_or_else(|| PersistenceError::NotFound(format!("transport '{name}'")))?;

    if inserted > 0 {
        info!(
            transport_id = transport.transport_id,
            name = %name,
            "Created transport"
        );
    }
    Ok(transport)
}

/// Resolves caller-supplied destinations to locations, in order.
///
/// # Errors
///
/// Returns [`DomainError::LocationNotFound`] for an unknown reference, or
/// an error if the database operation fails.
pub fn resolve_destinations(
    conn: &mut SqliteConnection,
    destinations: &[DestinationInput],
) -> Result<Vec<Location>, PersistenceError> {
    let mut resolved: Vec<Location> = Vec::with_capacity(destinations.len());
    for destination in destinations {
        let location: Location = match destination {
            DestinationInput::ByReference(location_id) => get_location(conn, *location_id)?
                .ok_or(PersistenceError::DomainViolation(
                    DomainError::LocationNotFound(*location_id),
                ))?,
            DestinationInput::ByName(name) => upsert_location(conn, name)?,
        };
        resolved.push(location);
    }

    debug!(count = resolved.len(), "Resolved destinations");
    Ok(resolved)
}
