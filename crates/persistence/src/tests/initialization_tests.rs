// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.

use crate::tests::{create_test_persistence, seed_employee};
use crate::{Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1 = create_test_persistence();
    let mut db2 = create_test_persistence();

    let employee_id: i64 = seed_employee(&mut db1, "Amina Belkacem");

    assert!(db1.get_employee(employee_id).unwrap().is_some());
    assert!(db2.get_employee(employee_id).unwrap().is_none());
}

#[test]
fn test_file_database_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missions.db");

    let employee_id: i64 = {
        let mut persistence = Persistence::new_with_file(&path).unwrap();
        seed_employee(&mut persistence, "Karim Haddad")
    };

    let mut reopened = Persistence::new_with_file(&path).unwrap();
    let employee = reopened.get_employee(employee_id).unwrap().unwrap();
    assert_eq!(employee.display_name, "Karim Haddad");
}

#[test]
fn test_blank_employee_name_is_rejected() {
    let mut persistence = create_test_persistence();

    let result = persistence.create_employee("   ", None, None);

    assert!(matches!(result, Err(PersistenceError::DomainViolation(_))));
}

#[test]
fn test_locations_are_matched_case_insensitively() {
    let mut persistence = create_test_persistence();

    let first = persistence.create_location("Tizi  Ouzou").unwrap();
    let second = persistence.create_location("tizi ouzou").unwrap();

    assert_eq!(first.location_id, second.location_id);
    assert_eq!(second.name, "Tizi  Ouzou");

    let fetched = persistence.get_location(first.location_id).unwrap();
    assert_eq!(fetched, Some(first));
    assert_eq!(persistence.get_location(9_999).unwrap(), None);
}

#[test]
fn test_transport_resolution_reuses_existing_row() {
    let mut persistence = create_test_persistence();

    let car = persistence.resolve_transport("Car").unwrap();
    let again = persistence.resolve_transport("  CAR ").unwrap();

    assert_eq!(car, again);
}
