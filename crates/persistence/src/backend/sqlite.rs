// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-specific backend utilities.
//!
//! This module is limited to:
//! - Connection initialization
//! - Migration execution
//! - SQLite-specific configuration (PRAGMA statements)
//! - The `BEGIN IMMEDIATE` write wrapper and its retry policy
//!
//! ## Write Transactions
//!
//! Every write that checks the one-active-monthly-mission rule runs inside
//! `BEGIN IMMEDIATE`. The write lock is taken before the first read, so a
//! second writer (another connection or another process) blocks until the
//! first commits and then sees its rows. The wait is bounded by
//! `busy_timeout`.

use std::time::Duration;

use diesel::prelude::*;
use diesel::sql_types::Integer;
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, warn};

use crate::data_models::PersistenceOptions;
use crate::error::PersistenceError;

/// SQLite migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Attempts allowed when a freshly allocated code is already taken.
pub const MAX_CODE_ATTEMPTS: u32 = 3;

/// Helper row struct for PRAGMA queries.
///
/// This is a justified use of raw SQL as Diesel has no PRAGMA DSL.
#[derive(QueryableByName)]
struct PragmaRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

/// Verifies that foreign key enforcement is enabled.
///
/// Destination rows rely on `ON DELETE CASCADE`, which `SQLite` only honours
/// with foreign keys on.
///
/// # Errors
///
/// Returns an error if foreign key enforcement is not enabled.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    let foreign_keys_enabled: i32 = diesel::sql_query("PRAGMA foreign_keys")
        .get_result::<PragmaRow>(conn)?
        .foreign_keys;

    if foreign_keys_enabled == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    info!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Run pending migrations on the provided connection.
///
/// # Errors
///
/// Returns an error if migration execution fails.
pub fn run_migrations(
    conn: &mut SqliteConnection,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    info!("Running SQLite database migrations");
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}

/// Sets how long the connection waits for a lock held by another writer.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn set_busy_timeout(
    conn: &mut SqliteConnection,
    busy_timeout: Duration,
) -> Result<(), PersistenceError> {
    let millis: u128 = busy_timeout.as_millis();
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    diesel::sql_query(format!("PRAGMA busy_timeout = {millis}"))
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    debug!(busy_timeout_ms = %millis, "Configured SQLite busy timeout");
    Ok(())
}

/// Initialize a `SQLite` database at the given URL and run migrations.
///
/// The busy timeout is set before migrating so that two processes opening
/// the same file at once wait for each other instead of failing.
///
/// # Errors
///
/// Returns an error if connection or migration fails.
pub fn initialize_database(
    database_url: &str,
    options: &PersistenceOptions,
) -> Result<SqliteConnection, PersistenceError> {
    info!("Initializing SQLite database at: {}", database_url);

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)
        .map_err(|e| PersistenceError::DatabaseConnectionFailed(e.to_string()))?;

    set_busy_timeout(&mut conn, options.busy_timeout)?;

    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    diesel::sql_query("PRAGMA foreign_keys = ON")
        .execute(&mut conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;

    run_migrations(&mut conn).map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;

    Ok(conn)
}

/// Enable WAL mode for file-based `SQLite` databases.
///
/// # Errors
///
/// Returns an error if the PRAGMA statement fails.
pub fn enable_wal_mode(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    // NOTE: PRAGMA is raw SQL (justified - Diesel has no PRAGMA DSL)
    diesel::sql_query("PRAGMA journal_mode = WAL")
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
    Ok(())
}

/// Runs `op` inside `BEGIN IMMEDIATE`, rolling back on any error.
///
/// Retry policy:
/// - a busy or locked database is retried once;
/// - a mission code collision is retried until [`MAX_CODE_ATTEMPTS`]
///   attempts have been made, re-running `op` so codes are re-allocated.
///
/// Every other error is returned as is.
///
/// # Errors
///
/// Returns the error of the last attempt.
pub fn write_transaction<T, F>(
    conn: &mut SqliteConnection,
    operation: &str,
    mut op: F,
) -> Result<T, PersistenceError>
where
    F: FnMut(&mut SqliteConnection) -> Result<T, PersistenceError>,
{
    let mut code_attempts: u32 = 1;
    let mut busy_retried: bool = false;

    loop {
        match conn.immediate_transaction(|tx| op(tx)) {
            Err(PersistenceError::CodeCollision(message)) if code_attempts < MAX_CODE_ATTEMPTS => {
                code_attempts += 1;
                warn!(
                    operation,
                    attempt = code_attempts,
                    %message,
                    "Mission code already taken, re-allocating"
                );
            }
            Err(PersistenceError::Transient(message)) if !busy_retried => {
                busy_retried = true;
                warn!(operation, %message, "Database busy, retrying once");
            }
            result => return result,
        }
    }
}
