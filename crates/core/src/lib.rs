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

mod apply;
mod command;
mod error;
mod reconcile;

#[cfg(test)]
mod tests;

pub use apply::{CreationPlan, MissionDraft, MissionRevision, apply_changes, plan_creation};
pub use command::{Command, MissionChanges};
pub use error::CoreError;
pub use reconcile::{
    CleanupGroup, CleanupPlan, ConflictGroup, ConflictScope, MissionSummary,
    ReconciliationReport, analyze, plan_cleanup,
};
