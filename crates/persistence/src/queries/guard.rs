// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The one-active-monthly-mission-per-month check.
//!
//! The check is only meaningful inside the same `BEGIN IMMEDIATE`
//! transaction as the write it protects; see `backend::sqlite`.

use diesel::prelude::*;
use diesel::SqliteConnection;
use mission_desk_domain::{
    DomainError, MissionCode, MissionStatus, MissionType, TargetMonth, format_date,
};
use tracing::debug;

use crate::diesel_schema::missions;
use crate::error::PersistenceError;

/// An active monthly mission already holding the month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthHolder {
    pub mission_id: i64,
    pub code: MissionCode,
}

/// Returns the lowest-id active monthly mission of `employee_id` starting
/// in `month`, ignoring `exclude_mission_id`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_month_holder(
    conn: &mut SqliteConnection,
    employee_id: i64,
    month: TargetMonth,
    exclude_mission_id: Option<i64>,
) -> Result<Option<MonthHolder>, PersistenceError> {
    let first_day: String = format_date(month.first_day()?)?;
    let last_day: String = format_date(month.last_day()?)?;

    let mut query = missions::table
        .filter(missions::employee_id.eq(employee_id))
        .filter(missions::mission_type.eq(MissionType::Monthly.as_str()))
        .filter(missions::status.eq(MissionStatus::Active.as_str()))
        .filter(missions::start_date.between(first_day, last_day))
        .select((missions::mission_id, missions::code))
        .order(missions::mission_id.asc())
        .into_boxed();

    if let Some(excluded) = exclude_mission_id {
        query = query.filter(missions::mission_id.ne(excluded));
    }

    let holder: Option<(i64, String)> = query.first(conn).optional()?;

    debug!(
        employee_id,
        %month,
        held = holder.is_some(),
        "Checked monthly mission guard"
    );

    Ok(holder.map(|(mission_id, code)| MonthHolder {
        mission_id,
        code: MissionCode::from_stored(code),
    }))
}

/// Fails with [`DomainError::ActiveMonthlyMissionExists`] when the month is
/// already held.
///
/// # Errors
///
/// Returns an error if the month is held or the query fails.
pub fn ensure_month_free(
    conn: &mut SqliteConnection,
    employee_id: i64,
    month: TargetMonth,
    exclude_mission_id: Option<i64>,
) -> Result<(), PersistenceError> {
    match find_month_holder(conn, employee_id, month, exclude_mission_id)? {
        Some(holder) => Err(PersistenceError::DomainViolation(
            DomainError::ActiveMonthlyMissionExists {
                employee_id,
                month,
                existing_code: holder.code.to_string(),
            },
        )),
        None => Ok(()),
    }
}
