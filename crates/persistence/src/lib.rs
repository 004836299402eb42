// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for Mission Desk.
//!
//! This crate stores missions and the reference data they point at
//! (employees, locations, transports) in `SQLite` through Diesel.
//!
//! ## Write Model
//!
//! Every write that can affect the one-active-monthly-mission rule runs in
//! a `BEGIN IMMEDIATE` transaction, which takes the database write lock up
//! front. Code allocation, the guard query and the inserts all happen under
//! that lock, so two writers (threads, connections or processes) can never
//! both pass the guard for the same employee and month, nor compute the
//! same next code.
//!
//! Busy/locked errors are retried once after `busy_timeout` elapses. A
//! unique-index collision on a freshly allocated code re-runs the whole
//! transaction, up to three attempts.
//!
//! ## Testing Philosophy
//!
//! - Each `new_in_memory()` call gets its own uniquely named database
//! - Cross-connection behaviour is tested against a temporary file

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use mission_desk::{CreationPlan, MissionChanges};
use mission_desk_domain::{EmployeeSummary, Location, Mission, TargetMonth, Transport};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::OffsetDateTime;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use backend::sqlite::MAX_CODE_ATTEMPTS;
pub use data_models::{
    DEFAULT_BUSY_TIMEOUT, EmployeeFailure, MissionImport, PersistenceOptions, RestoreOutcome,
};
pub use error::PersistenceError;

use backend::sqlite::write_transaction;

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_mission_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(
            &shared_memory_url,
            &PersistenceOptions::default(),
        )?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Opens (or creates) a file-based database with default options.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        Self::open(path, PersistenceOptions::default())
    }

    /// Opens (or creates) a file-based database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open<P: AsRef<Path>>(
        path: P,
        options: PersistenceOptions,
    ) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str, &options)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Reference data
    // ========================================================================

    /// Inserts an employee and returns the assigned ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub fn create_employee(
        &mut self,
        display_name: &str,
        centre: Option<&str>,
        function: Option<&str>,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::insert_employee(&mut self.conn, display_name, centre, function)
    }

    /// Retrieves an employee by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_employee(
        &mut self,
        employee_id: i64,
    ) -> Result<Option<EmployeeSummary>, PersistenceError> {
        queries::reference::get_employee(&mut self.conn, employee_id)
    }

    /// Returns the location named `name`, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn create_location(&mut self, name: &str) -> Result<Location, PersistenceError> {
        write_transaction(&mut self.conn, "create_location", |conn| {
            mutations::reference::upsert_location(conn, name)
        })
    }

    /// Retrieves a location by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_location(&mut self, location_id: i64) -> Result<Option<Location>, PersistenceError> {
        queries::reference::get_location(&mut self.conn, location_id)
    }

    /// Returns the transport named `name` (case-insensitive), creating it if
    /// absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the database operation fails.
    pub fn resolve_transport(&mut self, name: &str) -> Result<Transport, PersistenceError> {
        write_transaction(&mut self.conn, "resolve_transport", |conn| {
            mutations::reference::upsert_transport(conn, name)
        })
    }

    // ========================================================================
    // Missions
    // ========================================================================

    /// Returns the active monthly mission already holding `month` for the
    /// employee, ignoring `exclude_mission_id`.
    ///
    /// Outside a write transaction this is advisory only; creation and
    /// updates repeat the check under the write lock.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_active_monthly_conflict(
        &mut self,
        employee_id: i64,
        month: TargetMonth,
        exclude_mission_id: Option<i64>,
    ) -> Result<Option<Mission>, PersistenceError> {
        let holder = queries::guard::find_month_holder(
            &mut self.conn,
            employee_id,
            month,
            exclude_mission_id,
        )?;
        match holder {
            Some(holder) => queries::missions::get_mission(&mut self.conn, holder.mission_id),
            None => Ok(None),
        }
    }

    /// Creates every mission of a validated plan atomically.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::BatchRejected`] with every failing
    /// employee, [`PersistenceError::CodeCollision`] when codes kept
    /// colliding, or another error; nothing is written in any error case.
    pub fn create_missions(
        &mut self,
        plan: &CreationPlan,
    ) -> Result<Vec<Mission>, PersistenceError> {
        write_transaction(&mut self.conn, "create_missions", |conn| {
            mutations::missions::insert_missions(conn, plan, OffsetDateTime::now_utc())
        })
    }

    /// Retrieves a mission by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn get_mission(&mut self, mission_id: i64) -> Result<Option<Mission>, PersistenceError> {
        queries::missions::get_mission(&mut self.conn, mission_id)
    }

    /// Applies field edits and status transitions to a mission.
    ///
    /// # Errors
    ///
    /// Returns an error if the mission does not exist, the edit is invalid,
    /// the target month is already held, or the database operation fails.
    pub fn update_mission(
        &mut self,
        mission_id: i64,
        changes: &MissionChanges,
    ) -> Result<Mission, PersistenceError> {
        write_transaction(&mut self.conn, "update_mission", |conn| {
            let now: OffsetDateTime = OffsetDateTime::now_utc();
            mutations::missions::update_mission(conn, mission_id, changes, now)
        })
    }

    /// Deletes a mission by ID.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::MissionNotFound`] if nothing was deleted.
    pub fn delete_mission(&mut self, mission_id: i64) -> Result<(), PersistenceError> {
        write_transaction(&mut self.conn, "delete_mission", |conn| {
            mutations::missions::delete_mission(conn, mission_id)
        })
    }

    /// Lists every monthly mission, whatever its status, in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_monthly_missions(&mut self) -> Result<Vec<Mission>, PersistenceError> {
        queries::missions::list_monthly_missions(&mut self.conn)
    }

    /// Re-inserts a mission from a backup.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is invalid or the database operation
    /// fails.
    pub fn restore_mission(
        &mut self,
        import: &MissionImport,
        force: bool,
    ) -> Result<RestoreOutcome, PersistenceError> {
        write_transaction(&mut self.conn, "restore_mission", |conn| {
            mutations::missions::restore_mission(conn, import, force)
        })
    }
}
