//! Error types for the lint pipeline.
//!
//! Snapshot and process errors are recoverable at the pipeline boundary
//! (the run is skipped). Report errors are fatal and reach the caller.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot list {path}: {source}")]
    List {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("cannot create snapshot under {path}: {source}")]
    Create {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("cannot link {from} into snapshot: {source}")]
    Link {
        source: std::io::Error,
        from: PathBuf,
    },

    #[error("cannot write buffer to {path}: {source}")]
    Write {
        source: std::io::Error,
        path: PathBuf,
    },
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("empty analysis command")]
    EmptyCommand,

    #[error("working directory {path} is not accessible: {source}")]
    WorkingDir {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("failed to execute {program}: {source}")]
    Spawn {
        source: std::io::Error,
        program: String,
    },
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed analysis report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid line pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("line pattern is missing the `{0}` capture group")]
    MissingGroup(&'static str),
}

#[derive(Debug, Error)]
pub enum LintError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Run(#[from] RunError),

    #[error(transparent)]
    Report(#[from] ReportError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for `{key}`: {value:?}")]
    InvalidValue { key: &'static str, value: String },

    #[error("environment override must be KEY=VALUE, got {0:?}")]
    EnvPair(String),

    #[error("analysis command is empty")]
    EmptyCommand,
}
