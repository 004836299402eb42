// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backup snapshots of monthly missions.
//!
//! A cleanup writes every monthly mission to a timestamped JSON file before
//! deleting anything. The same file can later be fed to a restore.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use mission_desk_domain::{
    DomainError, Mission, MissionCode, format_date, format_timestamp, parse_date,
    parse_timestamp,
};
use mission_desk_persistence::MissionImport;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::{debug, info};

const FILE_STAMP: &[BorrowedFormatItem<'_>] =
    format_description!("[year][month][day]T[hour][minute][second][subsecond digits:6]Z");

/// Backup artifact errors.
#[derive(Debug, Error)]
pub enum BackupError {
    /// The backup directory could not be created.
    #[error("Failed to create backup directory {path}: {source}")]
    CreateDirectory {
        path: String,
        source: std::io::Error,
    },

    /// The snapshot could not be written.
    #[error("Failed to write backup {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },

    /// The snapshot could not be read.
    #[error("Failed to read backup {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// The snapshot is not valid JSON for this format.
    #[error("Malformed backup {path}: {source}")]
    Decode {
        path: String,
        source: serde_json::Error,
    },

    /// The snapshot could not be serialized.
    #[error("Failed to encode backup: {0}")]
    Encode(#[from] serde_json::Error),

    /// The file name timestamp could not be formatted.
    #[error("Failed to format backup timestamp: {0}")]
    Timestamp(#[from] time::error::Format),

    /// A mission could not be converted to or from its backup form.
    #[error("Invalid backup record {code}: {reason}")]
    InvalidRecord { code: String, reason: String },
}

/// One mission as stored in a backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupMission {
    pub mission_id: i64,
    pub code: String,
    pub mission_type: String,
    pub status: String,
    pub employee_id: i64,
    pub employee_name: String,
    pub start_date: String,
    pub end_date: String,
    pub destinations: Vec<String>,
    pub transport: Option<String>,
    pub description: Option<String>,
    pub cancellation_details: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl BackupMission {
    /// Captures a stored mission.
    ///
    /// # Errors
    ///
    /// Returns an error if a date cannot be formatted.
    pub fn from_mission(mission: &Mission) -> Result<Self, BackupError> {
        let invalid = |err: DomainError| BackupError::InvalidRecord {
            code: mission.code.to_string(),
            reason: err.to_string(),
        };

        Ok(Self {
            mission_id: mission.mission_id,
            code: mission.code.to_string(),
            mission_type: mission.mission_type.to_string(),
            status: mission.status.to_string(),
            employee_id: mission.employee.employee_id,
            employee_name: mission.employee.display_name.clone(),
            start_date: format_date(mission.start_date).map_err(invalid)?,
            end_date: format_date(mission.end_date).map_err(invalid)?,
            destinations: mission
                .destinations
                .iter()
                .map(|location| location.name.clone())
                .collect(),
            transport: mission.transport.as_ref().map(|t| t.name.clone()),
            description: mission.description.clone(),
            cancellation_details: mission.cancellation_details.clone(),
            created_at: format_timestamp(mission.created_at).map_err(invalid)?,
            updated_at: format_timestamp(mission.updated_at).map_err(invalid)?,
        })
    }

    /// Converts the record back into an insertable import.
    ///
    /// # Errors
    ///
    /// Returns an error if the type, status, or a date cannot be parsed.
    pub fn to_import(&self) -> Result<MissionImport, DomainError> {
        Ok(MissionImport {
            code: MissionCode::from_stored(self.code.clone()),
            mission_type: self.mission_type.parse()?,
            status: self.status.parse()?,
            employee_id: self.employee_id,
            start_date: parse_date("start_date", &self.start_date)?,
            end_date: parse_date("end_date", &self.end_date)?,
            destinations: self.destinations.clone(),
            transport: self.transport.clone(),
            description: self.description.clone(),
            cancellation_details: self.cancellation_details.clone(),
            created_at: parse_timestamp("created_at", &self.created_at)?,
            updated_at: parse_timestamp("updated_at", &self.updated_at)?,
        })
    }
}

/// A full backup file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSnapshot {
    /// When the snapshot was taken.
    pub created_at: String,
    pub mission_count: usize,
    pub missions: Vec<BackupMission>,
}

/// Writes every mission in `missions` to a new timestamped file in `dir`.
///
/// The file is created exclusively and flushed to disk before returning,
/// so a returned path always names a complete snapshot.
///
/// # Errors
///
/// Returns an error if the directory or file cannot be created or written.
pub fn write_backup(
    dir: &Path,
    missions: &[Mission],
    now: OffsetDateTime,
) -> Result<PathBuf, BackupError> {
    fs::create_dir_all(dir).map_err(|source| BackupError::CreateDirectory {
        path: dir.display().to_string(),
        source,
    })?;

    let records: Vec<BackupMission> = missions
        .iter()
        .map(BackupMission::from_mission)
        .collect::<Result<_, _>>()?;
    let snapshot: BackupSnapshot = BackupSnapshot {
        created_at: format_timestamp(now).map_err(|err| BackupError::InvalidRecord {
            code: String::from("snapshot"),
            reason: err.to_string(),
        })?,
        mission_count: records.len(),
        missions: records,
    };
    let json: String = serde_json::to_string_pretty(&snapshot)?;

    let stamp: String = now.to_offset(time::UtcOffset::UTC).format(FILE_STAMP)?;
    let path: PathBuf = dir.join(format!("mission-backup-{stamp}.json"));
    let write_error = |source: std::io::Error| BackupError::Write {
        path: path.display().to_string(),
        source,
    };

    let mut file: fs::File = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(write_error)?;
    file.write_all(json.as_bytes()).map_err(write_error)?;
    file.sync_all().map_err(write_error)?;

    info!(
        path = %path.display(),
        missions = snapshot.mission_count,
        "Wrote mission backup"
    );
    Ok(path)
}

/// Reads a snapshot written by [`write_backup`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid snapshot.
pub fn read_backup(path: &Path) -> Result<BackupSnapshot, BackupError> {
    let contents: String = fs::read_to_string(path).map_err(|source| BackupError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let snapshot: BackupSnapshot =
        serde_json::from_str(&contents).map_err(|source| BackupError::Decode {
            path: path.display().to_string(),
            source,
        })?;

    debug!(
        path = %path.display(),
        missions = snapshot.missions.len(),
        "Read mission backup"
    );
    Ok(snapshot)
}
