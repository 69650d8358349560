//! lintsnap core library.
//!
//! Lints the unsaved state of a single source file by mirroring its
//! directory into an ephemeral snapshot, running an external analysis tool
//! there, and reducing the tool's report to file-scoped diagnostic lines.
//!
//! High-level modules:
//! - `cli`: CLI argument parsing (binary uses this).
//! - `config`: Discovery and effective configuration resolution.
//! - `snapshot`: Ephemeral directory with hard-linked siblings and the live buffer.
//! - `runner`: Execution of the analysis command.
//! - `report`: Text and JSON report parsers.
//! - `filter`: Target-file scoping and suppression of snapshot artifacts.
//! - `lint`: The pipeline tying the stages together.
//! - `models`: Requests, issues, and outcomes.
//! - `output`: Diagnostic lines and human/JSON printers.
//! - `error`: Error types.
//! - `utils`: Supporting helpers.
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod lint;
pub mod models;
pub mod output;
pub mod report;
pub mod runner;
pub mod snapshot;
pub mod utils;

pub use lint::run_lint;
pub use models::{
    Issue, LintMode, LintOutcome, LintRequest, ReportFormat, Severity, SkipReason, SourceBuffer,
};
