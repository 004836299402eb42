// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Mission code allocation.
//!
//! Two code formats coexist in the store:
//!
//! - **Legacy monthly** `M<YY><MM><seq3>`, numbered per calendar month
//!   (`M2406001`, `M2406002`, ...).
//! - **Sequential** `<seq5>/<year>`, numbered across the whole collection.
//!   The year suffix is informational only: the sequence is not reset
//!   when the year changes, and reports downstream key off that format.
//!
//! Allocation is a pure function of the codes that already exist and of
//! the highest sequence ever issued per period ([`IssuedSequences`]), so a
//! deleted mission's code is never handed out again. Any existing code that
//! cannot be parsed aborts allocation instead of letting numbering restart
//! at 1 and collide with live records.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::calendar::TargetMonth;
use crate::error::DomainError;

const LEGACY_SEQUENCE_DIGITS: usize = 3;
const LEGACY_SEQUENCE_MAX: u32 = 999;
const SEQUENTIAL_DIGITS: usize = 5;
const SEQUENTIAL_MAX: u32 = 99_999;

/// Period key of the sequential scheme, which never resets.
pub const SEQUENTIAL_PERIOD: &str = "all";

/// Which code format to mint.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum CodeScheme {
    /// `<seq5>/<year>`, global sequence.
    #[default]
    Sequential,
    /// `M<YY><MM><seq3>`, per-month sequence.
    Legacy,
}

impl CodeScheme {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sequential => "sequential",
            Self::Legacy => "legacy",
        }
    }
}

impl FromStr for CodeScheme {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "legacy" => Ok(Self::Legacy),
            _ => Err(DomainError::InvalidCodeScheme(s.to_string())),
        }
    }
}

impl fmt::Display for CodeScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A human-readable mission code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionCode(String);

impl MissionCode {
    /// Wraps a code read back from storage.
    ///
    /// Stored codes are not re-validated here; allocation validates every
    /// existing code when it needs to.
    #[must_use]
    pub fn from_stored(value: String) -> Self {
        Self(value)
    }

    /// Builds a sequential code.
    ///
    /// # Errors
    ///
    /// Returns an error if `sequence` exceeds five digits.
    pub fn sequential(sequence: u32, year: i32) -> Result<Self, DomainError> {
        if sequence == 0 || sequence > SEQUENTIAL_MAX {
            return Err(DomainError::SequenceExhausted {
                scheme: CodeScheme::Sequential,
                period: year.to_string(),
            });
        }
        Ok(Self(format!(
            "{sequence:0width$}/{year}",
            width = SEQUENTIAL_DIGITS
        )))
    }

    /// Builds a legacy monthly code.
    ///
    /// # Errors
    ///
    /// Returns an error if `sequence` exceeds three digits.
    pub fn legacy(month: TargetMonth, sequence: u32) -> Result<Self, DomainError> {
        if sequence == 0 || sequence > LEGACY_SEQUENCE_MAX {
            return Err(DomainError::SequenceExhausted {
                scheme: CodeScheme::Legacy,
                period: month.to_string(),
            });
        }
        Ok(Self(format!(
            "{}{sequence:0width$}",
            month.legacy_prefix(),
            width = LEGACY_SEQUENCE_DIGITS
        )))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MissionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The decoded parts of an existing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedCode {
    /// `M<YY><MM><seq3>`.
    Legacy {
        /// `M<YY><MM>` prefix as two-digit year and month.
        year_suffix: u8,
        month: u8,
        sequence: u32,
    },
    /// `<seq>/<year>`.
    Sequential { sequence: u32, year: i32 },
}

impl ParsedCode {
    #[must_use]
    pub const fn scheme(&self) -> CodeScheme {
        match self {
            Self::Legacy { .. } => CodeScheme::Legacy,
            Self::Sequential { .. } => CodeScheme::Sequential,
        }
    }

    /// The numbering period the code was drawn from: `M<YY><MM>` for legacy
    /// codes, [`SEQUENTIAL_PERIOD`] for sequential ones.
    #[must_use]
    pub fn period(&self) -> String {
        match self {
            Self::Legacy {
                year_suffix, month, ..
            } => format!("M{year_suffix:02}{month:02}"),
            Self::Sequential { .. } => SEQUENTIAL_PERIOD.to_string(),
        }
    }

    #[must_use]
    pub const fn sequence(&self) -> u32 {
        match self {
            Self::Legacy { sequence, .. } | Self::Sequential { sequence, .. } => *sequence,
        }
    }
}

/// The numbering period a new code of `scheme` for `month` is drawn from.
#[must_use]
pub fn sequence_period(scheme: CodeScheme, month: TargetMonth) -> String {
    match scheme {
        CodeScheme::Sequential => SEQUENTIAL_PERIOD.to_string(),
        CodeScheme::Legacy => month.legacy_prefix(),
    }
}

/// The highest sequence number ever issued per scheme and period.
///
/// Codes of deleted missions stay counted here, which is what keeps them
/// from being reissued.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuedSequences {
    marks: BTreeMap<(CodeScheme, String), u32>,
}

impl IssuedSequences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the mark for `period` to `sequence`. Lower values are ignored.
    pub fn record(&mut self, scheme: CodeScheme, period: &str, sequence: u32) {
        let mark: &mut u32 = self.marks.entry((scheme, period.to_string())).or_insert(0);
        *mark = (*mark).max(sequence);
    }

    /// Parses `code` and raises the mark of its period.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is corrupt.
    pub fn record_code(&mut self, code: &str) -> Result<ParsedCode, DomainError> {
        let parsed: ParsedCode = parse_code(code)?;
        self.record(parsed.scheme(), &parsed.period(), parsed.sequence());
        Ok(parsed)
    }

    /// The highest sequence issued in `period`, or 0.
    #[must_use]
    pub fn highest(&self, scheme: CodeScheme, period: &str) -> u32 {
        self.marks
            .get(&(scheme, period.to_string()))
            .copied()
            .unwrap_or(0)
    }

    /// Every recorded mark, ordered by scheme and period.
    pub fn marks(&self) -> impl Iterator<Item = (CodeScheme, &str, u32)> {
        self.marks
            .iter()
            .map(|((scheme, period), sequence)| (*scheme, period.as_str(), *sequence))
    }
}

fn corrupt(code: &str, reason: &str) -> DomainError {
    DomainError::CorruptMissionCode {
        code: code.to_string(),
        reason: reason.to_string(),
    }
}

fn all_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Parses an existing code into its scheme and sequence.
///
/// # Errors
///
/// Returns [`DomainError::CorruptMissionCode`] if the code matches neither
/// scheme or claims one scheme's shape without satisfying it.
pub fn parse_code(code: &str) -> Result<ParsedCode, DomainError> {
    if let Some(rest) = code.strip_prefix('M') {
        if rest.len() != 4 + LEGACY_SEQUENCE_DIGITS || !all_digits(rest) {
            return Err(corrupt(code, "legacy codes are 'M' followed by seven digits"));
        }
        let year_suffix: u8 = rest[0..2]
            .parse()
            .map_err(|_| corrupt(code, "unreadable year"))?;
        let month: u8 = rest[2..4]
            .parse()
            .map_err(|_| corrupt(code, "unreadable month"))?;
        if !(1..=12).contains(&month) {
            return Err(corrupt(code, "month out of range"));
        }
        let sequence: u32 = rest[4..]
            .parse()
            .map_err(|_| corrupt(code, "unreadable sequence"))?;
        return Ok(ParsedCode::Legacy {
            year_suffix,
            month,
            sequence,
        });
    }

    if let Some((sequence, year)) = code.split_once('/') {
        if !all_digits(sequence) || sequence.len() < SEQUENTIAL_DIGITS {
            return Err(corrupt(code, "sequence must be at least five digits"));
        }
        if !all_digits(year) || year.len() != 4 {
            return Err(corrupt(code, "year suffix must be four digits"));
        }
        let sequence: u32 = sequence
            .parse()
            .map_err(|_| corrupt(code, "sequence out of range"))?;
        let year: i32 = year.parse().map_err(|_| corrupt(code, "unreadable year"))?;
        return Ok(ParsedCode::Sequential { sequence, year });
    }

    Err(corrupt(code, "matches no known code format"))
}

fn highest_legacy_sequence<'a, I>(existing: I, month: TargetMonth) -> Result<u32, DomainError>
where
    I: IntoIterator<Item = &'a str>,
{
    let target_suffix: u8 = u8::try_from(month.year().rem_euclid(100)).map_err(|_| {
        DomainError::InvalidMonth {
            year: month.year(),
            month: month.month_number(),
        }
    })?;

    let mut highest: u32 = 0;
    for code in existing {
        match parse_code(code)? {
            ParsedCode::Legacy {
                year_suffix,
                month: code_month,
                sequence,
            } if year_suffix == target_suffix && code_month == month.month_number() => {
                highest = highest.max(sequence);
            }
            _ => {}
        }
    }
    Ok(highest)
}

/// Returns the next free legacy code for `month`.
///
/// # Errors
///
/// Returns an error if any existing code is corrupt or the month's
/// sequence is exhausted.
pub fn next_legacy_code<'a, I>(existing: I, month: TargetMonth) -> Result<MissionCode, DomainError>
where
    I: IntoIterator<Item = &'a str>,
{
    let highest: u32 = highest_legacy_sequence(existing, month)?;
    MissionCode::legacy(month, highest.saturating_add(1))
}

/// Returns the next free number of the sequential scheme.
///
/// The maximum is taken over every sequential code regardless of its year
/// suffix.
///
/// # Errors
///
/// Returns an error if any existing code is corrupt.
pub fn next_sequential_number<'a, I>(existing: I) -> Result<u32, DomainError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut highest: u32 = 0;
    for code in existing {
        if let ParsedCode::Sequential { sequence, .. } = parse_code(code)? {
            highest = highest.max(sequence);
        }
    }
    Ok(highest.saturating_add(1))
}

/// Allocates one code per entry of `months`, in order, before anything is
/// persisted.
///
/// Numbering continues above both the stored codes and the marks in
/// `issued`. Sequential codes are `base, base + 1, ...`; legacy codes
/// advance per month, taking the codes allocated earlier in the same call
/// into account.
///
/// # Errors
///
/// Returns an error if an existing code is corrupt or a sequence overflows.
pub fn allocate_codes(
    scheme: CodeScheme,
    existing: &[String],
    issued: &IssuedSequences,
    months: &[TargetMonth],
) -> Result<Vec<MissionCode>, DomainError> {
    match scheme {
        CodeScheme::Sequential => {
            let base: u32 = next_sequential_number(existing.iter().map(String::as_str))?.max(
                issued
                    .highest(CodeScheme::Sequential, SEQUENTIAL_PERIOD)
                    .saturating_add(1),
            );
            months
                .iter()
                .zip(0_u32..)
                .map(|(month, offset)| {
                    let sequence: u32 =
                        base.checked_add(offset)
                            .ok_or_else(|| DomainError::SequenceExhausted {
                                scheme: CodeScheme::Sequential,
                                period: month.year().to_string(),
                            })?;
                    MissionCode::sequential(sequence, month.year())
                })
                .collect()
        }
        CodeScheme::Legacy => {
            let mut staged: Vec<String> = Vec::with_capacity(months.len());
            let mut codes: Vec<MissionCode> = Vec::with_capacity(months.len());
            for month in months {
                let stored: u32 = highest_legacy_sequence(
                    existing.iter().chain(staged.iter()).map(String::as_str),
                    *month,
                )?;
                let previous: u32 =
                    stored.max(issued.highest(
                        CodeScheme::Legacy,
                        &sequence_period(CodeScheme::Legacy, *month),
                    ));
                let code: MissionCode = MissionCode::legacy(*month, previous.saturating_add(1))?;
                staged.push(code.as_str().to_string());
                codes.push(code);
            }
            Ok(codes)
        }
    }
}
