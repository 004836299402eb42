// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Duplicate reconciliation: report, cleanup and restore.
//!
//! Historical data may hold several active monthly missions for the same
//! employee and month. The report lists them, the cleanup keeps the newest
//! of each group after writing a full backup, and a restore puts backed-up
//! records back.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use mission_desk::{
    CleanupPlan, ConflictGroup, ConflictScope, MissionSummary, ReconciliationReport, analyze,
    plan_cleanup,
};
use mission_desk_domain::{Mission, format_date, format_timestamp};
use mission_desk_persistence::{MissionImport, Persistence, RestoreOutcome};
use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::backup::{BackupMission, BackupSnapshot, read_backup, write_backup};
use crate::error::{ApiError, translate_domain_error, translate_persistence_error};
use crate::request_response::{
    CleanupGroupInfo, CleanupResponse, ConflictGroupInfo, ConflictMemberInfo, ReportResponse,
    RestoreResponse, SkippedRecord,
};

/// Options for a cleanup run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupRequest {
    /// Skip the confirmation callback.
    pub auto_confirm: bool,
    /// Directory receiving the backup snapshot.
    pub backup_dir: PathBuf,
    /// Which monthly missions are grouped.
    pub scope: ConflictScope,
}

fn member_info(member: &MissionSummary) -> Result<ConflictMemberInfo, ApiError> {
    Ok(ConflictMemberInfo {
        mission_id: member.mission_id,
        code: member.code.to_string(),
        status: member.status.to_string(),
        start_date: format_date(member.start_date).map_err(translate_domain_error)?,
        end_date: format_date(member.end_date).map_err(translate_domain_error)?,
        created_at: format_timestamp(member.created_at).map_err(translate_domain_error)?,
    })
}

fn group_info(group: &ConflictGroup) -> Result<ConflictGroupInfo, ApiError> {
    Ok(ConflictGroupInfo {
        employee_id: group.employee_id,
        employee_name: group.employee_name.clone(),
        month: group.month.to_string(),
        members: group
            .members
            .iter()
            .map(member_info)
            .collect::<Result<_, _>>()?,
    })
}

fn report_response(report: &ReconciliationReport) -> Result<ReportResponse, ApiError> {
    Ok(ReportResponse {
        total_missions: report.total_missions,
        status_counts: report
            .status_counts
            .iter()
            .map(|(status, count)| (status.to_string(), *count))
            .collect(),
        surplus: report.surplus_count(),
        conflicts: report
            .conflicts
            .iter()
            .map(group_info)
            .collect::<Result<_, _>>()?,
    })
}

fn cleanup_groups(plan: &CleanupPlan) -> Vec<CleanupGroupInfo> {
    plan.groups
        .iter()
        .map(|group| CleanupGroupInfo {
            employee_id: group.employee_id,
            month: group.month.to_string(),
            survivor_code: group.survivor.code.to_string(),
            removal_codes: group
                .removals
                .iter()
                .map(|member| member.code.to_string())
                .collect(),
        })
        .collect()
}

fn load_report(
    persistence: &mut Persistence,
    scope: ConflictScope,
) -> Result<(Vec<Mission>, ReconciliationReport), ApiError> {
    let missions: Vec<Mission> = persistence
        .list_monthly_missions()
        .map_err(translate_persistence_error)?;
    let report: ReconciliationReport = analyze(&missions, scope);
    Ok((missions, report))
}

/// Scans monthly missions for employees holding more than one mission in
/// the same month. Read-only.
///
/// # Errors
///
/// Returns an error if the missions cannot be loaded.
pub fn run_reconciliation_report(
    persistence: &mut Persistence,
    scope: ConflictScope,
) -> Result<ReportResponse, ApiError> {
    let (_, report) = load_report(persistence, scope)?;
    info!(
        total = report.total_missions,
        conflicts = report.conflicts.len(),
        surplus = report.surplus_count(),
        "Reconciliation report complete"
    );
    report_response(&report)
}

/// Deletes every conflicting mission except the newest of each group.
///
/// Unless `request.auto_confirm` is set, `confirm` sees the plan first and
/// may decline, in which case nothing is backed up or deleted. A snapshot
/// of every monthly mission is written before the first deletion; if that
/// fails nothing is deleted. A failed deletion is logged, counted and
/// skipped.
///
/// # Errors
///
/// Returns an error if the missions cannot be loaded or the backup cannot
/// be written.
pub fn run_reconciliation_cleanup<F>(
    persistence: &mut Persistence,
    request: &CleanupRequest,
    confirm: F,
) -> Result<CleanupResponse, ApiError>
where
    F: FnOnce(&CleanupPlan) -> bool,
{
    let (missions, report) = load_report(persistence, request.scope)?;
    let plan: CleanupPlan = plan_cleanup(&report.conflicts);
    let groups: Vec<CleanupGroupInfo> = cleanup_groups(&plan);

    if plan.is_empty() {
        info!("No duplicate monthly missions found");
        return Ok(CleanupResponse {
            confirmed: true,
            deleted: 0,
            kept: 0,
            failed: 0,
            backup_path: None,
            groups,
        });
    }

    if !request.auto_confirm && !confirm(&plan) {
        info!(
            removals = plan.removal_count(),
            "Cleanup not confirmed, nothing deleted"
        );
        return Ok(CleanupResponse {
            confirmed: false,
            deleted: 0,
            kept: plan.survivor_count(),
            failed: 0,
            backup_path: None,
            groups,
        });
    }

    let backup_path: PathBuf =
        write_backup(&request.backup_dir, &missions, OffsetDateTime::now_utc()).map_err(|err| {
            error!(error = %err, "Backup failed, aborting cleanup");
            ApiError::from(err)
        })?;

    let mut deleted: usize = 0;
    let mut failed: usize = 0;
    for group in &plan.groups {
        for member in &group.removals {
            match persistence.delete_mission(member.mission_id) {
                Ok(()) => deleted += 1,
                Err(err) => {
                    error!(
                        mission_id = member.mission_id,
                        code = member.code.as_str(),
                        error = %err,
                        "Failed to delete duplicate mission"
                    );
                    failed += 1;
                }
            }
        }
    }

    info!(
        deleted,
        kept = plan.survivor_count(),
        failed,
        backup = %backup_path.display(),
        "Reconciliation cleanup complete"
    );

    Ok(CleanupResponse {
        confirmed: true,
        deleted,
        kept: plan.survivor_count(),
        failed,
        backup_path: Some(backup_path.display().to_string()),
        groups,
    })
}

fn skipped(code: &str, reason: impl Into<String>) -> SkippedRecord {
    SkippedRecord {
        code: code.to_string(),
        reason: reason.into(),
    }
}

/// Re-inserts missions from a backup snapshot.
///
/// `codes` selects which records to restore; an empty slice restores all
/// of them. Records whose code is already stored are skipped. Without
/// `force`, an active monthly record is skipped when the employee already
/// holds the month. Invalid records are reported and do not stop the rest.
///
/// # Errors
///
/// Returns an error if the backup cannot be read.
pub fn restore_from_backup(
    persistence: &mut Persistence,
    path: &Path,
    codes: &[String],
    force: bool,
) -> Result<RestoreResponse, ApiError> {
    let snapshot: BackupSnapshot = read_backup(path)?;
    let wanted: BTreeSet<&str> = codes.iter().map(String::as_str).collect();

    let mut response: RestoreResponse = RestoreResponse {
        restored: Vec::new(),
        skipped: Vec::new(),
        failed: Vec::new(),
    };

    for code in &wanted {
        if !snapshot.missions.iter().any(|m| m.code == *code) {
            response.skipped.push(skipped(code, "not present in backup"));
        }
    }

    let selected = snapshot
        .missions
        .iter()
        .filter(|m| wanted.is_empty() || wanted.contains(m.code.as_str()));
    for record in selected {
        restore_record(persistence, record, force, &mut response);
    }

    info!(
        restored = response.restored.len(),
        skipped = response.skipped.len(),
        failed = response.failed.len(),
        force,
        "Restore complete"
    );
    Ok(response)
}

fn restore_record(
    persistence: &mut Persistence,
    record: &BackupMission,
    force: bool,
    response: &mut RestoreResponse,
) {
    let import: MissionImport = match record.to_import() {
        Ok(import) => import,
        Err(err) => {
            warn!(code = record.code.as_str(), error = %err, "Invalid backup record");
            response.failed.push(skipped(&record.code, err.to_string()));
            return;
        }
    };

    match persistence.restore_mission(&import, force) {
        Ok(RestoreOutcome::Restored { .. }) => response.restored.push(record.code.clone()),
        Ok(RestoreOutcome::CodeExists) => {
            response.skipped.push(skipped(&record.code, "code already exists"));
        }
        Ok(RestoreOutcome::MonthTaken { existing_code }) => {
            warn!(
                code = record.code.as_str(),
                existing_code = existing_code.as_str(),
                "Month already held, record skipped"
            );
            response.skipped.push(skipped(
                &record.code,
                format!("employee already holds the month with {existing_code}"),
            ));
        }
        Err(err) => {
            error!(code = record.code.as_str(), error = %err, "Failed to restore mission");
            response
                .failed
                .push(skipped(&record.code, translate_persistence_error(err).to_string()));
        }
    }
}
