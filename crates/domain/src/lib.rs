// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod calendar;
mod error;
mod sequence;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use calendar::{TargetMonth, format_date, format_timestamp, parse_date, parse_timestamp};
pub use error::DomainError;
pub use sequence::{
    CodeScheme, IssuedSequences, MissionCode, ParsedCode, SEQUENTIAL_PERIOD, allocate_codes,
    next_legacy_code, next_sequential_number, parse_code, sequence_period,
};
pub use types::{
    DestinationInput, EmployeeSummary, Location, Mission, MissionStatus, MissionType, Transport,
};
pub use validation::{
    MAX_NAME_LENGTH, MAX_TEXT_LENGTH, normalize_name_key, resolve_mission_window,
    validate_destinations, validate_employee_ids, validate_optional_text, validate_transport,
};
