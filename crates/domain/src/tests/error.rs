// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CodeScheme, DomainError, MissionStatus, TargetMonth};

#[test]
fn test_domain_error_display() {
    let err: DomainError = DomainError::ActiveMonthlyMissionExists {
        employee_id: 7,
        month: TargetMonth::new(2024, 6).unwrap(),
        existing_code: String::from("00001/2024"),
    };
    assert_eq!(
        format!("{err}"),
        "Employee 7 already has active monthly mission 00001/2024 for 2024-06"
    );

    let err: DomainError = DomainError::DuplicateEmployee { employee_id: 3 };
    assert_eq!(
        format!("{err}"),
        "Employee 3 appears more than once in the request"
    );

    let err: DomainError = DomainError::InvalidStatusTransition {
        from: MissionStatus::Cancelled,
        to: MissionStatus::Active,
    };
    assert_eq!(
        format!("{err}"),
        "Cannot change mission status from cancelled to active"
    );

    let err: DomainError = DomainError::SequenceExhausted {
        scheme: CodeScheme::Legacy,
        period: String::from("2024-06"),
    };
    assert_eq!(
        format!("{err}"),
        "No legacy mission codes left for period 2024-06"
    );

    let err: DomainError = DomainError::CorruptMissionCode {
        code: String::from("M24x"),
        reason: String::from("bad"),
    };
    assert_eq!(format!("{err}"), "Existing mission code 'M24x' is corrupt: bad");

    let err: DomainError = DomainError::EmployeeNotFound(42);
    assert_eq!(format!("{err}"), "Employee 42 not found");

    let err: DomainError = DomainError::MissionNotFound(9);
    assert_eq!(format!("{err}"), "Mission 9 not found");
}
