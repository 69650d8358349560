//! Shared data models for lint requests, issues, and run outcomes.

pub mod report;
pub mod request;

pub use request::{LintMode, LintRequest, ReportFormat, SourceBuffer};

use serde::Serialize;
use std::fmt;

/// Checker tag used for compiler/type-check diagnostics.
pub const COMPILER_CHECKER: &str = "typecheck";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
/// Issue severity as reported to the caller.
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    /// Severity implied by the originating checker: compiler findings are
    /// errors, everything else is a warning.
    pub fn for_checker(checker: &str) -> Self {
        if checker == COMPILER_CHECKER {
            Severity::Error
        } else {
            Severity::Warning
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }

    /// Parse a loose severity token (`error`, `warn`, `warning`, `E`, `W`).
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "error" | "err" | "e" | "fatal" => Some(Severity::Error),
            "warning" | "warn" | "w" | "info" | "note" => Some(Severity::Warning),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// A single diagnostic reported by the analysis tool.
pub struct Issue {
    pub filename: String,
    pub line: u32,
    pub column: Option<u32>,
    pub severity: Severity,
    pub message: String,
    pub checker: String,
    /// `filename` with any directory prefix stripped.
    pub short_filename: String,
}

impl Issue {
    /// Build an issue, deriving the short filename from `filename`.
    pub fn new(
        filename: impl Into<String>,
        line: u32,
        column: Option<u32>,
        severity: Severity,
        message: impl Into<String>,
        checker: impl Into<String>,
    ) -> Self {
        let filename = filename.into();
        let short_filename = short_name(&filename).to_string();
        Issue {
            filename,
            line,
            column,
            severity,
            message: message.into(),
            checker: checker.into(),
            short_filename,
        }
    }

    /// Issue whose severity follows from its checker tag.
    pub fn from_checker(
        filename: impl Into<String>,
        line: u32,
        column: Option<u32>,
        message: impl Into<String>,
        checker: impl Into<String>,
    ) -> Self {
        let checker = checker.into();
        let severity = Severity::for_checker(&checker);
        Issue::new(filename, line, column, severity, message, checker)
    }
}

/// Strip everything up to and including the last path separator.
pub fn short_name(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(idx) => &path[idx + 1..],
        None => path,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
/// Why a lint run produced no diagnostics without running the tool to completion.
pub enum SkipReason {
    /// The buffer has no real directory on disk.
    UnsavedFile,
    /// Isolated mode was refused because the directory holds too many files.
    TooManyFiles { count: usize, limit: usize },
    /// Filesystem or process failure; the message is for the operator.
    Environment(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsavedFile => f.write_str("skipped linting of unsaved file"),
            SkipReason::TooManyFiles { count, limit } => {
                write!(f, "too many files ({count} > {limit}), live linting skipped")
            }
            SkipReason::Environment(msg) => write!(f, "lint environment unusable: {msg}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
/// Result of one lint request that did not fail fatally.
pub enum LintOutcome {
    Skipped { reason: SkipReason },
    Diagnostics { issues: Vec<Issue> },
}

impl LintOutcome {
    pub fn issues(&self) -> &[Issue] {
        match self {
            LintOutcome::Skipped { .. } => &[],
            LintOutcome::Diagnostics { issues } => issues,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, LintOutcome::Skipped { .. })
    }

    /// Newline-joined diagnostic lines; empty for skipped runs.
    pub fn render(&self) -> String {
        crate::output::render_lines(self.issues())
    }
}
