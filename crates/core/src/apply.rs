// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use mission_desk_domain::{
    CodeScheme, DestinationInput, DomainError, Mission, MissionStatus, MissionType, TargetMonth,
    resolve_mission_window, validate_destinations, validate_employee_ids, validate_optional_text,
    validate_transport,
};
use time::Date;

use crate::command::{Command, MissionChanges};
use crate::error::CoreError;

/// A validated mission waiting for a code and an insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionDraft {
    pub employee_id: i64,
    pub mission_type: MissionType,
    pub start_date: Date,
    pub end_date: Date,
    pub destinations: Vec<DestinationInput>,
    pub description: Option<String>,
}

impl MissionDraft {
    /// The month the mission starts in.
    #[must_use]
    pub const fn month(&self) -> TargetMonth {
        TargetMonth::from_date(self.start_date)
    }

    /// New missions are always active, so every monthly draft claims its
    /// month.
    #[must_use]
    pub fn holds_month(&self) -> bool {
        self.mission_type == MissionType::Monthly
    }
}

/// Everything the storage layer needs to create a batch of missions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationPlan {
    /// Code format for every mission of the batch.
    pub scheme: CodeScheme,
    /// Transport name to resolve before inserting, if any.
    pub transport: Option<String>,
    /// One draft per employee, in request order.
    pub drafts: Vec<MissionDraft>,
}

impl CreationPlan {
    /// Target months of the drafts, in order, for code allocation.
    #[must_use]
    pub fn months(&self) -> Vec<TargetMonth> {
        self.drafts.iter().map(MissionDraft::month).collect()
    }
}

/// Validates a creation command and expands it into per-employee drafts.
///
/// Nothing is allocated or written here; every validation failure is
/// reported before any mission code exists.
///
/// # Errors
///
/// Returns an error if:
/// - The employee list is empty or repeats an employee
/// - The destinations are empty or blank
/// - The transport of a group request is blank
/// - The date range is reversed, or a monthly range crosses months
/// - The description is too long
pub fn plan_creation(command: Command) -> Result<CreationPlan, CoreError> {
    match command {
        Command::CreateMission {
            employee_id,
            mission_type,
            start_date,
            end_date,
            destinations,
            transport,
            description,
            code_scheme,
        } => {
            validate_employee_ids(&[employee_id])?;
            validate_destinations(&destinations)?;
            let transport: Option<String> =
                transport.as_deref().map(validate_transport).transpose()?;
            let description: Option<String> =
                validate_optional_text("description", description.as_deref())?;
            let (start_date, end_date) = resolve_mission_window(mission_type, start_date, end_date)?;

            Ok(CreationPlan {
                scheme: code_scheme,
                transport,
                drafts: vec![MissionDraft {
                    employee_id,
                    mission_type,
                    start_date,
                    end_date,
                    destinations,
                    description,
                }],
            })
        }
        Command::CreateGroupMissions {
            employee_ids,
            mission_type,
            start_date,
            end_date,
            destinations,
            transport,
            description,
        } => {
            validate_employee_ids(&employee_ids)?;
            validate_destinations(&destinations)?;
            let transport: String = validate_transport(&transport)?;
            let description: Option<String> =
                validate_optional_text("description", description.as_deref())?;
            let (start_date, end_date) = resolve_mission_window(mission_type, start_date, end_date)?;

            let drafts: Vec<MissionDraft> = employee_ids
                .into_iter()
                .map(|employee_id| MissionDraft {
                    employee_id,
                    mission_type,
                    start_date,
                    end_date,
                    destinations: destinations.clone(),
                    description: description.clone(),
                })
                .collect();

            Ok(CreationPlan {
                scheme: CodeScheme::Sequential,
                transport: Some(transport),
                drafts,
            })
        }
    }
}

/// The validated field values of a mission after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionRevision {
    pub mission_type: MissionType,
    pub status: MissionStatus,
    pub start_date: Date,
    pub end_date: Date,
    pub description: Option<String>,
    pub cancellation_details: Option<String>,
    /// Replacement destinations, if the edit changes them.
    pub destinations: Option<Vec<DestinationInput>>,
    /// Replacement transport name, if the edit changes it.
    pub transport: Option<String>,
}

impl MissionRevision {
    /// Whether the revised mission claims its employee's month.
    #[must_use]
    pub fn holds_month(&self) -> bool {
        self.mission_type == MissionType::Monthly && self.status == MissionStatus::Active
    }

    /// The month the revised mission starts in.
    #[must_use]
    pub const fn month(&self) -> TargetMonth {
        TargetMonth::from_date(self.start_date)
    }
}

/// Applies requested edits to the current mission values.
///
/// When a monthly mission moves to a new start date without an explicit
/// end date, it moves to the whole month of the new start date.
///
/// # Errors
///
/// Returns an error if:
/// - The status change is not `active → completed | cancelled`
/// - The resulting date range is invalid for the mission type
/// - Replacement destinations or transport are invalid
/// - A free-text field is too long
pub fn apply_changes(
    current: &Mission,
    changes: MissionChanges,
) -> Result<MissionRevision, CoreError> {
    let status: MissionStatus = match changes.status {
        Some(target) if !current.status.can_transition_to(target) => {
            return Err(CoreError::DomainViolation(
                DomainError::InvalidStatusTransition {
                    from: current.status,
                    to: target,
                },
            ));
        }
        Some(target) => target,
        None => current.status,
    };

    let mission_type: MissionType = changes.mission_type.unwrap_or(current.mission_type);
    let start_date: Date = changes.start_date.unwrap_or(current.start_date);
    let end_date: Date = match (changes.end_date, changes.start_date) {
        (Some(end_date), _) => end_date,
        (None, Some(new_start)) if mission_type == MissionType::Monthly => new_start,
        (None, _) => current.end_date,
    };
    let (start_date, end_date) = resolve_mission_window(mission_type, start_date, end_date)?;

    if let Some(destinations) = &changes.destinations {
        validate_destinations(destinations)?;
    }
    let transport: Option<String> = changes
        .transport
        .as_deref()
        .map(validate_transport)
        .transpose()?;

    let description: Option<String> = match changes.description.as_deref() {
        Some(text) => validate_optional_text("description", Some(text))?,
        None => current.description.clone(),
    };
    let cancellation_details: Option<String> = match changes.cancellation_details.as_deref() {
        Some(text) => validate_optional_text("cancellation_details", Some(text))?,
        None => current.cancellation_details.clone(),
    };

    Ok(MissionRevision {
        mission_type,
        status,
        start_date,
        end_date,
        description,
        cancellation_details,
        destinations: changes.destinations,
        transport,
    })
}
