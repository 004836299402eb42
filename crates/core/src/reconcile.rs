// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Offline detection and repair planning for duplicate monthly missions.
//!
//! Both functions are pure: the analyzer only reads the missions it is
//! given and the cleanup plan only decides which records survive. Backups
//! and deletions are performed by the caller.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use mission_desk_domain::{Mission, MissionCode, MissionStatus, MissionType, TargetMonth};
use time::{Date, OffsetDateTime};

/// Which monthly missions take part in conflict grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictScope {
    /// Only active missions, the records that can violate the
    /// one-active-mission-per-month rule.
    #[default]
    ActiveOnly,
    /// Every monthly mission whatever its status.
    AllStatuses,
}

impl ConflictScope {
    const fn includes(self, status: MissionStatus) -> bool {
        match self {
            Self::ActiveOnly => matches!(status, MissionStatus::Active),
            Self::AllStatuses => true,
        }
    }
}

/// The identifying fields of a mission inside a conflict group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionSummary {
    pub mission_id: i64,
    pub code: MissionCode,
    pub status: MissionStatus,
    pub start_date: Date,
    pub end_date: Date,
    pub created_at: OffsetDateTime,
}

impl From<&Mission> for MissionSummary {
    fn from(mission: &Mission) -> Self {
        Self {
            mission_id: mission.mission_id,
            code: mission.code.clone(),
            status: mission.status,
            start_date: mission.start_date,
            end_date: mission.end_date,
            created_at: mission.created_at,
        }
    }
}

/// Newest first; the higher id wins a `created_at` tie.
fn newest_first(a: &MissionSummary, b: &MissionSummary) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.mission_id.cmp(&a.mission_id))
}

/// Missions of one employee sharing one month.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictGroup {
    pub employee_id: i64,
    pub employee_name: String,
    pub month: TargetMonth,
    /// Newest first.
    pub members: Vec<MissionSummary>,
}

/// The result of a reconciliation scan.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconciliationReport {
    /// Number of monthly missions scanned, all statuses included.
    pub total_missions: usize,
    /// Monthly missions per status.
    pub status_counts: BTreeMap<MissionStatus, usize>,
    /// Groups with more than one member, ordered by employee then month.
    pub conflicts: Vec<ConflictGroup>,
}

impl ReconciliationReport {
    /// Number of records a cleanup would delete.
    #[must_use]
    pub fn surplus_count(&self) -> usize {
        self.conflicts
            .iter()
            .map(|group| group.members.len().saturating_sub(1))
            .sum()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Groups monthly missions by employee and start month and reports every
/// group holding more than one mission.
///
/// Special missions are ignored. The output depends only on the input set,
/// not on its order.
#[must_use]
pub fn analyze(missions: &[Mission], scope: ConflictScope) -> ReconciliationReport {
    let mut status_counts: BTreeMap<MissionStatus, usize> = BTreeMap::new();
    let mut groups: BTreeMap<(i64, TargetMonth), (String, Vec<MissionSummary>)> = BTreeMap::new();
    let mut total_missions: usize = 0;

    for mission in missions
        .iter()
        .filter(|m| m.mission_type == MissionType::Monthly)
    {
        total_missions += 1;
        *status_counts.entry(mission.status).or_insert(0) += 1;

        if !scope.includes(mission.status) {
            continue;
        }

        groups
            .entry((mission.employee.employee_id, mission.month()))
            .or_insert_with(|| (mission.employee.display_name.clone(), Vec::new()))
            .1
            .push(MissionSummary::from(mission));
    }

    let conflicts: Vec<ConflictGroup> = groups
        .into_iter()
        .filter(|(_, (_, members))| members.len() > 1)
        .map(|((employee_id, month), (employee_name, mut members))| {
            members.sort_by(newest_first);
            ConflictGroup {
                employee_id,
                employee_name,
                month,
                members,
            }
        })
        .collect();

    ReconciliationReport {
        total_missions,
        status_counts,
        conflicts,
    }
}

/// The survivor and the records to delete for one conflict group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanupGroup {
    pub employee_id: i64,
    pub month: TargetMonth,
    pub survivor: MissionSummary,
    pub removals: Vec<MissionSummary>,
}

/// The deletions a cleanup will perform.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CleanupPlan {
    pub groups: Vec<CleanupGroup>,
}

impl CleanupPlan {
    #[must_use]
    pub fn removal_count(&self) -> usize {
        self.groups.iter().map(|group| group.removals.len()).sum()
    }

    #[must_use]
    pub fn survivor_count(&self) -> usize {
        self.groups.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Picks the most recently created mission of each group as the survivor
/// and schedules the others for deletion.
///
/// Members are re-sorted here, so the plan does not depend on the order
/// the groups were handed in. Groups with fewer than two members are
/// skipped.
#[must_use]
pub fn plan_cleanup(conflicts: &[ConflictGroup]) -> CleanupPlan {
    let groups: Vec<CleanupGroup> = conflicts
        .iter()
        .filter(|group| group.members.len() > 1)
        .filter_map(|group| {
            let mut members: Vec<MissionSummary> = group.members.clone();
            members.sort_by(newest_first);
            let mut members = members.into_iter();
            let survivor: MissionSummary = members.next()?;
            Some(CleanupGroup {
                employee_id: group.employee_id,
                month: group.month,
                survivor,
                removals: members.collect(),
            })
        })
        .collect();

    CleanupPlan { groups }
}
