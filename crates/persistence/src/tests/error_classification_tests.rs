// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database errors are mapped to the variants the retry policy acts on.

use std::time::Duration;

use diesel::RunQueryDsl;

use crate::backend::sqlite::write_transaction;
use crate::tests::{create_test_persistence, seed_employee};
use crate::{MAX_CODE_ATTEMPTS, Persistence, PersistenceError, PersistenceOptions};

fn insert_raw_mission(
    persistence: &mut Persistence,
    employee_id: i64,
    code: &str,
) -> Result<usize, PersistenceError> {
    diesel::sql_query(format!(
        "INSERT INTO missions (code, mission_type, status, employee_id, start_date, end_date, \
         created_at, updated_at) VALUES ('{code}', 'special', 'active', {employee_id}, \
         '2024-01-02', '2024-01-03', '2024-01-01T00:00:00.000000Z', \
         '2024-01-01T00:00:00.000000Z')"
    ))
    .execute(&mut persistence.conn)
    .map_err(PersistenceError::from)
}

#[test]
fn test_duplicate_code_is_reported_as_code_collision() {
    let mut persistence = create_test_persistence();
    let employee_id: i64 = seed_employee(&mut persistence, "E1");
    insert_raw_mission(&mut persistence, employee_id, "00001/2024").unwrap();

    let result = insert_raw_mission(&mut persistence, employee_id, "00001/2024");

    assert!(matches!(result, Err(PersistenceError::CodeCollision(_))));
}

#[test]
fn test_missing_employee_is_reported_as_constraint_violation() {
    let mut persistence = create_test_persistence();

    let result = insert_raw_mission(&mut persistence, 77, "00001/2024");

    assert!(matches!(
        result,
        Err(PersistenceError::ConstraintViolation(_))
    ));
}

#[test]
fn test_locked_database_is_transient_after_one_retry() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("locked.db");
    let options = PersistenceOptions {
        busy_timeout: Duration::from_millis(50),
    };
    let mut holder = Persistence::open(&path, options).unwrap();
    let mut writer = Persistence::open(&path, options).unwrap();

    diesel::sql_query("BEGIN IMMEDIATE")
        .execute(&mut holder.conn)
        .unwrap();

    let result = writer.resolve_transport("Car");

    assert!(matches!(result, Err(ref e) if e.is_transient()));

    diesel::sql_query("ROLLBACK")
        .execute(&mut holder.conn)
        .unwrap();
    assert!(writer.resolve_transport("Car").is_ok());
}

/// Inserts a transport row, then fails with `error` while `failures` remain.
///
/// The insert has a unique key, so a second attempt only succeeds if the
/// first one was rolled back.
fn failing_insert(
    conn: &mut diesel::SqliteConnection,
    attempts: &mut u32,
    failures: u32,
    error: &PersistenceError,
) -> Result<u32, PersistenceError> {
    *attempts += 1;
    diesel::sql_query("INSERT INTO transports (name, name_key) VALUES ('Car', 'car')")
        .execute(conn)?;
    if *attempts <= failures {
        return Err(error.clone());
    }
    Ok(*attempts)
}

fn transport_count(persistence: &mut Persistence) -> i64 {
    use diesel::dsl::count_star;
    use diesel::{QueryDsl, RunQueryDsl};

    crate::diesel_schema::transports::table
        .select(count_star())
        .first(&mut persistence.conn)
        .unwrap()
}

#[test]
fn test_code_collision_is_retried_with_a_fresh_transaction() {
    let mut persistence = create_test_persistence();
    let collision = PersistenceError::CodeCollision(String::from("00004/2024"));
    let mut attempts: u32 = 0;

    let result = write_transaction(&mut persistence.conn, "collide_once", |conn| {
        failing_insert(conn, &mut attempts, 1, &collision)
    });

    assert_eq!(result, Ok(2));
    assert_eq!(attempts, 2);
    assert_eq!(transport_count(&mut persistence), 1);
}

#[test]
fn test_code_collision_gives_up_after_max_attempts() {
    let mut persistence = create_test_persistence();
    let collision = PersistenceError::CodeCollision(String::from("00004/2024"));
    let mut attempts: u32 = 0;

    let result = write_transaction(&mut persistence.conn, "always_collide", |conn| {
        failing_insert(conn, &mut attempts, u32::MAX, &collision)
    });

    assert_eq!(result, Err(collision));
    assert_eq!(attempts, MAX_CODE_ATTEMPTS);
    assert_eq!(transport_count(&mut persistence), 0);
}

#[test]
fn test_last_allowed_attempt_may_still_succeed() {
    let mut persistence = create_test_persistence();
    let collision = PersistenceError::CodeCollision(String::from("00004/2024"));
    let mut attempts: u32 = 0;

    let result = write_transaction(&mut persistence.conn, "collide_until_last", |conn| {
        failing_insert(conn, &mut attempts, MAX_CODE_ATTEMPTS - 1, &collision)
    });

    assert_eq!(result, Ok(MAX_CODE_ATTEMPTS));
}

#[test]
fn test_busy_database_is_retried_exactly_once() {
    let mut persistence = create_test_persistence();
    let busy = PersistenceError::Transient(String::from("database is locked"));
    let mut attempts: u32 = 0;

    let result = write_transaction(&mut persistence.conn, "always_busy", |conn| {
        failing_insert(conn, &mut attempts, u32::MAX, &busy)
    });

    assert_eq!(result, Err(busy));
    assert_eq!(attempts, 2);
    assert_eq!(transport_count(&mut persistence), 0);
}

#[test]
fn test_other_errors_are_not_retried() {
    let mut persistence = create_test_persistence();
    let violation = PersistenceError::ConstraintViolation(String::from("check failed"));
    let mut attempts: u32 = 0;

    let result = write_transaction(&mut persistence.conn, "violate", |conn| {
        failing_insert(conn, &mut attempts, u32::MAX, &violation)
    });

    assert_eq!(result, Err(violation));
    assert_eq!(attempts, 1);
}
