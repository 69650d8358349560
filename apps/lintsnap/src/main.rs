//! lintsnap CLI binary entry point.
//! Resolves configuration, reads the buffer, and prints the lint outcome.

use clap::Parser;
use lintsnap::cli::{Cli, Commands};
use lintsnap::config::{self, CliOverrides};
use lintsnap::models::{Severity, SourceBuffer};
use lintsnap::{lint, output, utils};
use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

fn init_tracing(level: Option<&str>) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.unwrap_or("warn"))),
        )
        .init();
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("{} {}", utils::error_prefix(), msg);
    std::process::exit(2);
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_level.as_deref());
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Lint {
            file,
            stdin,
            mode,
            report,
            pattern,
            extension,
            max_siblings,
            env,
            output: output_mode,
            command,
        } => {
            let path = PathBuf::from(&file);
            let path = if path.is_absolute() {
                path
            } else {
                match std::env::current_dir() {
                    Ok(cwd) => cwd.join(path),
                    Err(e) => fail(format!("cannot resolve {}: {}", file, e)),
                }
            };

            let mut env_map = BTreeMap::new();
            for pair in &env {
                match config::parse_env_pair(pair) {
                    Ok((k, v)) => {
                        env_map.insert(k, v);
                    }
                    Err(e) => fail(e),
                }
            }
            let overrides = CliOverrides {
                command,
                mode,
                report,
                pattern,
                extension,
                max_siblings,
                output: output_mode,
                env: env_map,
            };
            let start = path.parent().unwrap_or_else(|| Path::new("."));
            let eff = match config::resolve_effective(start, &overrides) {
                Ok(eff) => eff,
                Err(e) => fail(e),
            };
            // Friendly note if no lintsnap config was found
            if eff.output == "human" && eff.config_root.is_none() {
                eprintln!(
                    "{} {}",
                    utils::note_prefix(),
                    "No lintsnap.toml found; using defaults."
                );
            }

            let content = if stdin {
                let mut buf = Vec::new();
                if let Err(e) = std::io::stdin().read_to_end(&mut buf) {
                    fail(format!("cannot read buffer from stdin: {}", e));
                }
                buf
            } else {
                match fs::read(&path) {
                    Ok(buf) => buf,
                    Err(e) => fail(format!("cannot read {}: {}", path.display(), e)),
                }
            };

            let req = eff.to_request(SourceBuffer::from_bytes(path, content));
            match lint::run_lint(&req) {
                Ok(outcome) => {
                    output::print_outcome(&outcome, &eff.output);
                    let has_errors = outcome
                        .issues()
                        .iter()
                        .any(|i| i.severity == Severity::Error);
                    if eff.output == "human" && has_errors {
                        std::process::exit(1);
                    }
                }
                Err(e) => fail(e),
            }
        }
    }
}
