// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD` strings and timestamps as RFC 3339 UTC
//! strings; parsing happens in the handlers so malformed values surface as
//! validation errors naming the field.

use std::collections::BTreeMap;

use mission_desk_domain::DestinationInput;

/// API request to create one mission for one employee.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateMissionRequest {
    /// The employee the mission is for.
    pub employee_id: i64,
    /// `monthly` or `special`.
    pub mission_type: String,
    /// First day (ISO 8601).
    pub start_date: String,
    /// Last day (ISO 8601).
    pub end_date: String,
    /// Ordered destinations, by location id or by name.
    pub destinations: Vec<DestinationInput>,
    /// Transport name.
    #[serde(default)]
    pub transport: Option<String>,
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
    /// `sequential` (default) or `legacy`.
    #[serde(default)]
    pub code_scheme: Option<String>,
}

/// API request to create the same mission for several employees.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateGroupMissionsRequest {
    /// The employees, in allocation order.
    pub employee_ids: Vec<i64>,
    /// `monthly` or `special`.
    pub mission_type: String,
    /// First day (ISO 8601).
    pub start_date: String,
    /// Last day (ISO 8601).
    pub end_date: String,
    /// Ordered destinations shared by every mission.
    pub destinations: Vec<DestinationInput>,
    /// Transport name shared by every mission.
    pub transport: String,
    /// Free text.
    #[serde(default)]
    pub description: Option<String>,
}

/// API request to edit a mission. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct UpdateMissionRequest {
    pub mission_type: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub destinations: Option<Vec<DestinationInput>>,
    pub transport: Option<String>,
    pub description: Option<String>,
    pub cancellation_details: Option<String>,
}

/// A mission as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MissionResponse {
    pub mission_id: i64,
    pub code: String,
    pub mission_type: String,
    pub status: String,
    pub employee_id: i64,
    pub employee_name: String,
    /// Location names, in order.
    pub destinations: Vec<String>,
    pub transport: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub description: Option<String>,
    pub cancellation_details: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// API response for a successful group creation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GroupMissionsResponse {
    /// The created missions, in request order.
    pub missions: Vec<MissionResponse>,
    /// A success message.
    pub message: String,
}

/// API response for a successful deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteMissionResponse {
    /// The deleted mission.
    pub mission_id: i64,
    /// A success message.
    pub message: String,
}

/// One mission inside a reported conflict group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConflictMemberInfo {
    pub mission_id: i64,
    pub code: String,
    pub status: String,
    pub start_date: String,
    pub end_date: String,
    pub created_at: String,
}

/// Missions of one employee that share a month.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ConflictGroupInfo {
    pub employee_id: i64,
    pub employee_name: String,
    /// `YYYY-MM`.
    pub month: String,
    /// Newest first.
    pub members: Vec<ConflictMemberInfo>,
}

/// API response for a reconciliation report.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReportResponse {
    /// Number of monthly missions inspected.
    pub total_missions: usize,
    /// Monthly missions per status.
    pub status_counts: BTreeMap<String, usize>,
    /// Missions a cleanup would delete.
    pub surplus: usize,
    /// Conflict groups ordered by employee then month.
    pub conflicts: Vec<ConflictGroupInfo>,
}

/// The survivor and the removals of one conflict group.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CleanupGroupInfo {
    pub employee_id: i64,
    /// `YYYY-MM`.
    pub month: String,
    pub survivor_code: String,
    pub removal_codes: Vec<String>,
}

/// API response for a reconciliation cleanup.
///
/// When `confirmed` is false nothing was backed up or deleted and
/// `groups` describes what a confirmed run would do.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CleanupResponse {
    /// Whether deletions were carried out.
    pub confirmed: bool,
    /// Missions deleted.
    pub deleted: usize,
    /// Survivors kept, one per group.
    pub kept: usize,
    /// Deletions that failed and were skipped.
    pub failed: usize,
    /// Snapshot written before deleting.
    pub backup_path: Option<String>,
    /// The cleanup plan.
    pub groups: Vec<CleanupGroupInfo>,
}

/// A backup record that was not restored.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SkippedRecord {
    pub code: String,
    pub reason: String,
}

/// API response for a restore from backup.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RestoreResponse {
    /// Codes inserted back into the store.
    pub restored: Vec<String>,
    /// Records left alone (code present, month taken, not in the backup).
    pub skipped: Vec<SkippedRecord>,
    /// Records rejected as invalid.
    pub failed: Vec<SkippedRecord>,
}
