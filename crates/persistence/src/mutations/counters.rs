// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Code counter writes. Callers hold the write transaction.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mission_desk_domain::{MissionCode, ParsedCode, parse_code};

use crate::data_models::CodeCounterRow;
use crate::diesel_schema::code_counters;
use crate::error::PersistenceError;

/// Raises the counter of the period `code` was drawn from to at least the
/// code's sequence.
///
/// # Errors
///
/// Returns an error if the code is corrupt or the write fails.
pub fn record_issued_code(
    conn: &mut SqliteConnection,
    code: &MissionCode,
) -> Result<(), PersistenceError> {
    let parsed: ParsedCode = parse_code(code.as_str())?;
    let scheme: &str = parsed.scheme().as_str();
    let period: String = parsed.period();
    let sequence: i64 = i64::from(parsed.sequence());

    let current: Option<i64> = code_counters::table
        .find((scheme, period.as_str()))
        .select(code_counters::last_sequence)
        .first(conn)
        .optional()?;

    match current {
        Some(last) if last >= sequence => {}
        Some(_) => {
            diesel::update(code_counters::table.find((scheme, period.as_str())))
                .set(code_counters::last_sequence.eq(sequence))
                .execute(conn)?;
        }
        None => {
            diesel::insert_into(code_counters::table)
                .values(CodeCounterRow {
                    scheme: scheme.to_string(),
                    period,
                    last_sequence: sequence,
                })
                .execute(conn)?;
        }
    }
    Ok(())
}
