// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! # mission-desk - duplicate reconciliation tools
//!
//! Operator commands for repairing historical data in which an employee
//! holds more than one monthly mission for the same month.
//!
//! - `mission-desk --database <path> report` lists the conflict groups
//! - `mission-desk --database <path> cleanup` keeps the newest mission of
//!   each group after writing a backup, asking first unless `--yes`
//! - `mission-desk --database <path> restore <backup>` puts backed-up
//!   missions back

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use color_eyre::{Result, eyre::Context};
use mission_desk::CleanupPlan;
use mission_desk_api::{
    CleanupRequest, CleanupResponse, ConflictScope, ReportResponse, RestoreResponse,
    restore_from_backup, run_reconciliation_cleanup, run_reconciliation_report,
    write_report_csv,
};
use mission_desk_persistence::{Persistence, PersistenceOptions};
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_log::AsTrace;

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level())
        .with_writer(io::stderr)
        .without_time()
        .init();

    match args.run() {
        Ok(()) => (),
        Err(err) => {
            tracing::error!("{err:?}");
            std::process::exit(1);
        }
    }
    Ok(())
}

#[derive(Debug, Parser)]
#[command(name = "mission-desk", author, version, about)]
struct Args {
    /// Path to the `SQLite` database file
    #[arg(short, long)]
    database: PathBuf,

    /// How long a write waits for the database lock, in milliseconds
    #[arg(long, default_value_t = 5000)]
    busy_timeout_ms: u64,

    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

impl Args {
    fn run(self) -> Result<()> {
        let options: PersistenceOptions = PersistenceOptions {
            busy_timeout: Duration::from_millis(self.busy_timeout_ms),
        };
        let mut persistence: Persistence = Persistence::open(&self.database, options)
            .wrap_err_with(|| format!("failed to open database {}", self.database.display()))?;

        let stdin = io::stdin();
        let stdout = io::stdout();
        self.command
            .run(&mut persistence, &mut stdin.lock(), &mut stdout.lock())
    }

    fn log_level(&self) -> LevelFilter {
        self.verbosity.log_level_filter().as_trace()
    }
}

#[derive(Clone, Debug, Subcommand)]
enum Command {
    /// List employees holding more than one monthly mission in a month
    #[command(visible_alias = "r")]
    Report {
        /// Group every monthly mission, not only active ones
        #[arg(long)]
        all_statuses: bool,

        /// Print the report as JSON
        #[arg(long, conflicts_with = "csv")]
        json: bool,

        /// Write one CSV row per conflicting mission to this file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Delete duplicates, keeping the newest mission of each group
    #[command(visible_alias = "c")]
    Cleanup {
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,

        /// Directory receiving the backup snapshot
        #[arg(long, default_value = "./backups")]
        backup_dir: PathBuf,

        /// Group every monthly mission, not only active ones
        #[arg(long)]
        all_statuses: bool,
    },

    /// Re-insert missions from a backup snapshot
    Restore {
        /// The backup file
        backup: PathBuf,

        /// Restore only this code (repeatable)
        #[arg(long = "code")]
        codes: Vec<String>,

        /// Bypass the one-active-mission-per-month check
        #[arg(long)]
        force: bool,
    },
}

const fn scope_for(all_statuses: bool) -> ConflictScope {
    if all_statuses {
        ConflictScope::AllStatuses
    } else {
        ConflictScope::ActiveOnly
    }
}

impl Command {
    fn run<R: BufRead, W: Write>(
        self,
        persistence: &mut Persistence,
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        match self {
            Self::Report {
                all_statuses,
                json,
                csv,
            } => report(persistence, scope_for(all_statuses), json, csv, output),
            Self::Cleanup {
                yes,
                backup_dir,
                all_statuses,
            } => cleanup(
                persistence,
                &CleanupRequest {
                    auto_confirm: yes,
                    backup_dir,
                    scope: scope_for(all_statuses),
                },
                input,
                output,
            ),
            Self::Restore {
                backup,
                codes,
                force,
            } => restore(persistence, &backup, &codes, force, output),
        }
    }
}

fn report<W: Write>(
    persistence: &mut Persistence,
    scope: ConflictScope,
    json: bool,
    csv: Option<PathBuf>,
    output: &mut W,
) -> Result<()> {
    let report: ReportResponse = run_reconciliation_report(persistence, scope)?;

    if let Some(path) = csv {
        let file: File = File::create(&path)
            .wrap_err_with(|| format!("failed to create {}", path.display()))?;
        write_report_csv(&report, file)?;
        info!(path = %path.display(), "Wrote CSV report");
        return Ok(());
    }

    if json {
        serde_json::to_writer_pretty(&mut *output, &report).wrap_err("failed to write JSON")?;
        writeln!(output)?;
    } else {
        output.write_all(render_report(&report).as_bytes())?;
    }
    Ok(())
}

fn cleanup<R: BufRead, W: Write>(
    persistence: &mut Persistence,
    request: &CleanupRequest,
    input: &mut R,
    output: &mut W,
) -> Result<()> {
    let result: CleanupResponse = run_reconciliation_cleanup(persistence, request, |plan| {
        confirm_plan(plan, input, output)
    })?;

    if result.groups.is_empty() {
        writeln!(output, "No duplicate monthly missions found.")?;
    } else if result.confirmed {
        writeln!(
            output,
            "Deleted {}, kept {}, failed {}.",
            result.deleted, result.kept, result.failed
        )?;
        if let Some(path) = &result.backup_path {
            writeln!(output, "Backup written to {path}")?;
        }
    } else {
        writeln!(output, "Cleanup cancelled, nothing deleted.")?;
    }
    Ok(())
}

fn restore<W: Write>(
    persistence: &mut Persistence,
    backup: &std::path::Path,
    codes: &[String],
    force: bool,
    output: &mut W,
) -> Result<()> {
    let result: RestoreResponse = restore_from_backup(persistence, backup, codes, force)?;

    writeln!(output, "Restored {} mission(s).", result.restored.len())?;
    for record in &result.skipped {
        writeln!(output, "  skipped {}: {}", record.code, record.reason)?;
    }
    for record in &result.failed {
        writeln!(output, "  failed  {}: {}", record.code, record.reason)?;
    }
    Ok(())
}

/// Renders a report as plain text.
fn render_report(report: &ReportResponse) -> String {
    let mut text: String = String::new();
    let _ = writeln!(text, "Monthly missions: {}", report.total_missions);
    for (status, count) in &report.status_counts {
        let _ = writeln!(text, "  {status}: {count}");
    }

    if report.conflicts.is_empty() {
        let _ = writeln!(text, "No conflicts.");
        return text;
    }

    let _ = writeln!(
        text,
        "Conflicts: {} group(s), {} surplus mission(s)",
        report.conflicts.len(),
        report.surplus
    );
    for group in &report.conflicts {
        let _ = writeln!(
            text,
            "\n{} (employee {}) - {}",
            group.employee_name, group.employee_id, group.month
        );
        for (index, member) in group.members.iter().enumerate() {
            let marker: &str = if index == 0 { "keep  " } else { "delete" };
            let _ = writeln!(
                text,
                "  [{marker}] {} {} {}..{} created {}",
                member.code, member.status, member.start_date, member.end_date, member.created_at
            );
        }
    }
    text
}

/// Shows the plan and asks the operator to confirm it.
fn confirm_plan<R: BufRead, W: Write>(plan: &CleanupPlan, input: &mut R, output: &mut W) -> bool {
    let mut prompt: String = String::new();
    for group in &plan.groups {
        let _ = writeln!(
            prompt,
            "employee {} {}: keep {}, delete {}",
            group.employee_id,
            group.month,
            group.survivor.code,
            group
                .removals
                .iter()
                .map(|m| m.code.as_str())
                .collect::<Vec<&str>>()
                .join(", ")
        );
    }
    let _ = write!(
        prompt,
        "Delete {} duplicate mission(s)? [y/N] ",
        plan.removal_count()
    );

    if let Err(err) = output
        .write_all(prompt.as_bytes())
        .and_then(|()| output.flush())
    {
        warn!(error = %err, "Could not show confirmation prompt");
        return false;
    }

    let mut answer: String = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => is_yes(&answer),
        Err(err) => {
            warn!(error = %err, "Could not read confirmation");
            false
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
