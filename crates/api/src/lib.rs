// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for Mission Desk.
//!
//! Request DTOs come in with string dates and loosely typed fields; this
//! crate parses them, drives the core planner and the persistence layer,
//! and returns response DTOs or an [`ApiError`]. Transport concerns (HTTP
//! status codes, terminal output) live in the server and CLI binaries.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod backup;
mod csv_export;
mod error;
mod handlers;
mod reconciliation;
mod request_response;

#[cfg(test)]
mod tests;

pub use backup::{BackupError, BackupMission, BackupSnapshot, read_backup, write_backup};
pub use csv_export::write_report_csv;
pub use error::{
    ApiError, FailureDetail, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    create_group_missions, create_single_mission, delete_mission, mission_response,
    update_mission,
};
pub use mission_desk::ConflictScope;
pub use reconciliation::{
    CleanupRequest, restore_from_backup, run_reconciliation_cleanup, run_reconciliation_report,
};
pub use request_response::{
    CleanupGroupInfo, CleanupResponse, ConflictGroupInfo, ConflictMemberInfo,
    CreateGroupMissionsRequest, CreateMissionRequest, DeleteMissionResponse,
    GroupMissionsResponse, MissionResponse, ReportResponse, RestoreResponse, SkippedRecord,
    UpdateMissionRequest,
};
