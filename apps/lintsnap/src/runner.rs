//! Process runner for the analysis tool.
//!
//! Executes the command vector exactly as given, in the chosen working
//! directory, with the inherited environment plus overrides.

use crate::error::RunError;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;
use std::process::Command;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How stdout and stderr are returned.
pub enum StreamMode {
    /// stdout followed by stderr in `RunOutput::stdout`.
    Both,
    /// Streams kept apart.
    Separate,
}

#[derive(Debug, Clone, Default)]
/// Captured output of one analysis run.
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was terminated by a signal.
    pub exit_code: Option<i32>,
}

/// Run `command` followed by `extra_args` in `cwd`. Non-zero exits are not errors.
///
/// `extra_args` carries paths that need not be valid UTF-8.
pub fn run_command(
    command: &[String],
    extra_args: &[OsString],
    cwd: &Path,
    env: &BTreeMap<String, String>,
    streams: StreamMode,
) -> Result<RunOutput, RunError> {
    let Some((program, args)) = command.split_first() else {
        return Err(RunError::EmptyCommand);
    };
    // Distinguish a vanished working directory from a missing program.
    let meta = fs::metadata(cwd).map_err(|source| RunError::WorkingDir {
        source,
        path: cwd.to_path_buf(),
    })?;
    if !meta.is_dir() {
        return Err(RunError::WorkingDir {
            source: io::Error::other("not a directory"),
            path: cwd.to_path_buf(),
        });
    }
    debug!(program = %program, ?args, ?extra_args, cwd = %cwd.display(), "running analysis tool");

    let output = Command::new(program)
        .args(args)
        .args(extra_args)
        .current_dir(cwd)
        .envs(env)
        .output()
        .map_err(|source| RunError::Spawn {
            source,
            program: program.clone(),
        })?;

    let mut stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let mut stderr = String::from_utf8_lossy(&output.stderr).to_string();
    if streams == StreamMode::Both && !stderr.is_empty() {
        if !stdout.is_empty() && !stdout.ends_with('\n') {
            stdout.push('\n');
        }
        stdout.push_str(&std::mem::take(&mut stderr));
    }
    debug!(exit_code = ?output.status.code(), "analysis tool finished");
    Ok(RunOutput {
        stdout,
        stderr,
        exit_code: output.status.code(),
    })
}
