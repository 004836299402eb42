// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Code counter queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use mission_desk_domain::{CodeScheme, IssuedSequences};
use num_traits::ToPrimitive;

use crate::data_models::CodeCounterRow;
use crate::diesel_schema::code_counters;
use crate::error::PersistenceError;

/// Loads the highest sequence issued per scheme and period.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn load_issued_sequences(
    conn: &mut SqliteConnection,
) -> Result<IssuedSequences, PersistenceError> {
    let rows: Vec<CodeCounterRow> = code_counters::table
        .select(CodeCounterRow::as_select())
        .load(conn)?;

    let mut issued: IssuedSequences = IssuedSequences::new();
    for row in rows {
        let scheme: CodeScheme = row.scheme.parse().map_err(|_| {
            PersistenceError::ReconstructionError(format!(
                "code counter has unknown scheme '{}'",
                row.scheme
            ))
        })?;
        let sequence: u32 = row.last_sequence.to_u32().ok_or_else(|| {
            PersistenceError::ReconstructionError(format!(
                "code counter {scheme}/{} is out of range: {}",
                row.period, row.last_sequence
            ))
        })?;
        issued.record(scheme, &row.period, sequence);
    }
    Ok(issued)
}
