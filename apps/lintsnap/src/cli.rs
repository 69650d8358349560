//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "lintsnap",
    version,
    about = "Lint an unsaved buffer against a snapshot of its directory",
    long_about = "lintsnap — run a static-analysis tool against the live content of one file.\n\nThe file's directory is mirrored into a private snapshot (siblings hard-linked, the target replaced by the buffer), the tool runs there, and its report is reduced to `file:line:col:severity:message` lines for that file only.\n\nConfiguration precedence: CLI > lintsnap.toml > defaults.",
    after_help = "Examples:\n  lintsnap lint main.go\n  cat main.go | lintsnap lint --stdin /src/app/main.go --report json\n  lintsnap lint --mode in-place main.go -- golangci-lint run --fast",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[arg(long, global = true, help = "Log filter when RUST_LOG is unset (default: warn)")]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current lintsnap version.")]
    Version,
    /// Lint one file
    #[command(
        about = "Lint one file",
        long_about = "Lint FILE using its in-memory content (from --stdin) or its saved content. Prints one diagnostic per line; prints nothing when there are no diagnostics or the run was skipped.",
        after_help = "Examples:\n  lintsnap lint main.go --output human\n  lintsnap lint main.go --env GOFLAGS=-mod=vendor -- golangci-lint run --fast"
    )]
    Lint {
        #[arg(help = "Path of the file being linted")]
        file: String,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Read the buffer content from stdin instead of FILE")]
        stdin: bool,
        #[arg(long, help = "Execution mode: isolated|in-place (default: isolated)")]
        mode: Option<String>,
        #[arg(long, help = "Tool output contract: text|json (default: text)")]
        report: Option<String>,
        #[arg(long, help = "Regex for text reports (named groups: filename, line, col, message, linter)")]
        pattern: Option<String>,
        #[arg(long, help = "Extension of sibling files to mirror (default: go)")]
        extension: Option<String>,
        #[arg(long, help = "Skip isolated runs above this many sibling files (default: 40)")]
        max_siblings: Option<usize>,
        #[arg(long = "env", value_name = "KEY=VALUE", help = "Extra environment for the tool (repeatable)")]
        env: Vec<String>,
        #[arg(long, help = "Output mode: plain|human|json (default: plain)")]
        output: Option<String>,
        #[arg(last = true, value_name = "COMMAND", help = "Analysis command, after `--`")]
        command: Vec<String>,
    },
}
