// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::calendar::TargetMonth;
use crate::error::DomainError;
use crate::sequence::MissionCode;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

/// The kind of mission.
///
/// Only monthly missions are subject to the one-per-employee-per-month rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionType {
    /// Covers exactly one calendar month.
    Monthly,
    /// Arbitrary date range, no uniqueness constraint.
    Special,
}

impl MissionType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Special => "special",
        }
    }
}

impl FromStr for MissionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Self::Monthly),
            "special" => Ok(Self::Special),
            _ => Err(DomainError::InvalidMissionType(s.to_string())),
        }
    }
}

impl std::fmt::Display for MissionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissionStatus {
    /// The mission is in progress. Only active missions hold a month.
    Active,
    /// The mission finished normally.
    Completed,
    /// The mission was called off.
    Cancelled,
}

impl MissionStatus {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `Active` → `Completed`
    /// - `Active` → `Cancelled`
    ///
    /// Staying in the same status is always accepted.
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        *self == target
            || matches!(
                (self, target),
                (Self::Active, Self::Completed) | (Self::Active, Self::Cancelled)
            )
    }
}

impl FromStr for MissionStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidMissionStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for MissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Employee reference data as displayed alongside a mission.
///
/// Employees are owned by the HR store; missions only reference them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeSummary {
    pub employee_id: i64,
    pub display_name: String,
    pub centre: Option<String>,
    pub function: Option<String>,
}

/// A mission destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub location_id: i64,
    pub name: String,
}

/// A means of transport shared by the missions of a group request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transport {
    pub transport_id: i64,
    pub name: String,
}

/// A destination as supplied by a caller.
///
/// Destinations arrive either as a reference to an existing location or as a
/// free-text name that is looked up (and created if absent) before persisting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DestinationInput {
    /// An existing location identifier.
    ByReference(i64),
    /// A location name, matched case-insensitively.
    ByName(String),
}

/// A fully resolved mission record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mission {
    pub mission_id: i64,
    pub code: MissionCode,
    pub mission_type: MissionType,
    pub status: MissionStatus,
    pub employee: EmployeeSummary,
    pub destinations: Vec<Location>,
    pub transport: Option<Transport>,
    pub start_date: Date,
    pub end_date: Date,
    pub description: Option<String>,
    pub cancellation_details: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Mission {
    /// The month the mission starts in.
    #[must_use]
    pub const fn month(&self) -> TargetMonth {
        TargetMonth::from_date(self.start_date)
    }

    /// Whether this mission occupies its employee's month.
    #[must_use]
    pub fn holds_month(&self) -> bool {
        self.mission_type == MissionType::Monthly && self.status == MissionStatus::Active
    }
}
