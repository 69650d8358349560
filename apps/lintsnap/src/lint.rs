//! Lint pipeline: snapshot, run, parse, filter.
//!
//! `run_lint` is the single entry point. Filesystem and process failures
//! are logged and reported as `LintOutcome::Skipped`; a report the parser
//! cannot understand is returned as an error.

use crate::error::{LintError, RunError, SnapshotError};
use crate::filter::filter_issues;
use crate::models::{LintMode, LintOutcome, LintRequest, ReportFormat, SkipReason};
use crate::report::parser_for;
use crate::runner::{run_command, RunOutput, StreamMode};
use crate::snapshot::{list_siblings, Snapshot};
use std::path::Path;
use tracing::{debug, info, warn};

/// Lint one buffer according to `req`.
pub fn run_lint(req: &LintRequest) -> Result<LintOutcome, LintError> {
    // Compile the parser first so a bad pattern never costs a tool run.
    let parser = parser_for(req.report, req.pattern.as_deref(), req.default_severity)?;
    let (Some(dir), Some(basename)) = (req.buffer.directory(), req.buffer.basename()) else {
        info!("lintsnap: skipped linting of unsaved file");
        return Ok(skipped(SkipReason::UnsavedFile));
    };

    let ran = match req.mode {
        LintMode::InPlace => {
            info!(
                file = %basename,
                command = %req.command.join(" "),
                "lintsnap: in-place linting"
            );
            run_command(&req.command, &[], dir, &req.env, streams_for(req.report))
        }
        LintMode::Isolated => match isolated_run(req, dir, &basename) {
            Ok(Isolated::Ran(result)) => result,
            Ok(Isolated::TooManyFiles(count)) => {
                return Ok(skipped(SkipReason::TooManyFiles {
                    count,
                    limit: req.max_siblings,
                }));
            }
            Err(e) => return Ok(environment_failure(e.to_string())),
        },
    };
    let out = match ran {
        Ok(out) => out,
        Err(e) => return Ok(environment_failure(e.to_string())),
    };
    if !out.stderr.trim().is_empty() {
        debug!(stderr = %out.stderr.trim_end(), "analysis tool stderr");
    }

    let issues = parser.parse(&out.stdout)?;
    Ok(LintOutcome::Diagnostics {
        issues: filter_issues(issues, &basename),
    })
}

enum Isolated {
    TooManyFiles(usize),
    Ran(Result<RunOutput, RunError>),
}

/// Build a snapshot of `dir`, run the tool against it, and remove it.
fn isolated_run(req: &LintRequest, dir: &Path, basename: &str) -> Result<Isolated, SnapshotError> {
    let siblings = list_siblings(dir, &req.extension)?;
    if siblings.len() > req.max_siblings {
        info!(
            count = siblings.len(),
            limit = req.max_siblings,
            "lintsnap: too many files, live linting skipped"
        );
        return Ok(Isolated::TooManyFiles(siblings.len()));
    }
    info!(
        file = %basename,
        dir = %dir.display(),
        command = %req.command.join(" "),
        "lintsnap: live linting"
    );
    let snap = Snapshot::build(
        dir,
        &siblings,
        &req.buffer.path,
        &req.buffer.content,
        &req.snapshot_prefix,
    )?;

    let target_arg = [snap.path().as_os_str().to_os_string()];
    let result = run_command(
        &req.command,
        &target_arg,
        snap.path(),
        &req.env,
        streams_for(req.report),
    );

    let snap_path = snap.path().to_path_buf();
    if let Err(e) = snap.close() {
        warn!(snapshot = %snap_path.display(), error = %e, "failed to remove snapshot");
    }
    Ok(Isolated::Ran(result))
}

fn streams_for(report: ReportFormat) -> StreamMode {
    match report {
        ReportFormat::Text => StreamMode::Both,
        ReportFormat::Json => StreamMode::Separate,
    }
}

fn skipped(reason: SkipReason) -> LintOutcome {
    LintOutcome::Skipped { reason }
}

fn environment_failure(msg: String) -> LintOutcome {
    warn!(error = %msg, "lintsnap: lint run abandoned");
    skipped(SkipReason::Environment(msg))
}
