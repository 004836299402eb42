// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Two connections racing for the same employee and month.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread;

use mission_desk_domain::{CodeScheme, DomainError, Mission};

use crate::tests::{monthly_plan, seed_employee};
use crate::{Persistence, PersistenceError};

fn race(
    path: &Path,
    employee_id: i64,
    start: &str,
) -> Vec<Result<Vec<Mission>, PersistenceError>> {
    let barrier: Arc<Barrier> = Arc::new(Barrier::new(2));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            let path: PathBuf = path.to_path_buf();
            let plan = monthly_plan(employee_id, start, CodeScheme::Sequential);
            thread::spawn(move || {
                let mut persistence = Persistence::new_with_file(&path).unwrap();
                barrier.wait();
                persistence.create_missions(&plan)
            })
        })
        .collect();

    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn test_concurrent_creates_for_same_month_admit_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("race.db");
    let employee_id: i64 = {
        let mut setup = Persistence::new_with_file(&path).unwrap();
        seed_employee(&mut setup, "E1")
    };

    let results = race(&path, employee_id, "2024-08-01");

    let successes: usize = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    let rejection = results.iter().find_map(|r| r.as_ref().err()).unwrap();
    assert!(matches!(
        rejection,
        PersistenceError::BatchRejected(failures)
            if matches!(failures[0].error, DomainError::ActiveMonthlyMissionExists { .. })
    ));

    let mut check = Persistence::new_with_file(&path).unwrap();
    assert_eq!(check.list_monthly_missions().unwrap().len(), 1);
}

#[test]
fn test_concurrent_creates_for_different_employees_get_distinct_codes() {
    let dir = tempfile::tempdir().unwrap();
    let path: PathBuf = dir.path().join("codes.db");
    let (e1, e2): (i64, i64) = {
        let mut setup = Persistence::new_with_file(&path).unwrap();
        (seed_employee(&mut setup, "E1"), seed_employee(&mut setup, "E2"))
    };

    let barrier: Arc<Barrier> = Arc::new(Barrier::new(2));
    let handles: Vec<_> = [e1, e2]
        .into_iter()
        .map(|employee_id| {
            let barrier = Arc::clone(&barrier);
            let path = path.clone();
            thread::spawn(move || {
                let mut persistence = Persistence::new_with_file(&path).unwrap();
                barrier.wait();
                persistence.create_missions(&monthly_plan(
                    employee_id,
                    "2024-08-01",
                    CodeScheme::Sequential,
                ))
            })
        })
        .collect();

    let mut codes: Vec<String> = handles
        .into_iter()
        .map(|h| h.join().unwrap().unwrap().remove(0).code.to_string())
        .collect();
    codes.sort();
    assert_eq!(codes, vec!["00001/2024", "00002/2024"]);
}
