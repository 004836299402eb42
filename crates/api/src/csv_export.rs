// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of a reconciliation report.
//!
//! One row per conflicting mission. The first member of each group is the
//! one a cleanup would keep.

use std::io::Write;

use serde::Serialize;

use crate::error::ApiError;
use crate::request_response::ReportResponse;

#[derive(Debug, Serialize)]
struct ConflictRow<'a> {
    employee_id: i64,
    employee_name: &'a str,
    month: &'a str,
    mission_id: i64,
    code: &'a str,
    status: &'a str,
    start_date: &'a str,
    end_date: &'a str,
    created_at: &'a str,
    keep: bool,
}

/// Writes the conflicts of `report` as CSV with a header row.
///
/// # Errors
///
/// Returns an error if writing to `writer` fails.
pub fn write_report_csv<W: Write>(report: &ReportResponse, writer: W) -> Result<(), ApiError> {
    let csv_error = |e: csv::Error| ApiError::Internal {
        message: format!("Failed to write CSV: {e}"),
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    for group in &report.conflicts {
        for (index, member) in group.members.iter().enumerate() {
            csv_writer
                .serialize(ConflictRow {
                    employee_id: group.employee_id,
                    employee_name: &group.employee_name,
                    month: &group.month,
                    mission_id: member.mission_id,
                    code: &member.code,
                    status: &member.status,
                    start_date: &member.start_date,
                    end_date: &member.end_date,
                    created_at: &member.created_at,
                    keep: index == 0,
                })
                .map_err(csv_error)?;
        }
    }

    csv_writer.flush().map_err(|e| ApiError::Internal {
        message: format!("Failed to flush CSV: {e}"),
    })
}
