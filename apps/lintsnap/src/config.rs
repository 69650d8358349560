//! Configuration discovery and effective settings resolution.
//!
//! lintsnap reads `lintsnap.toml|yaml|yml` from the directory of the file
//! being linted (or the closest ancestor) and merges it with CLI flags to
//! produce an `Effective` config.
//! Defaults:
//! - `command`: `golangci-lint run --fast --enable typecheck`
//! - `mode`: `isolated`
//! - `report`: `text`
//! - `extension`: `go`
//! - `max_siblings`: 40
//! - `snapshot_prefix`: `.lintsnap-`
//! - `default_severity`: `error`
//! - `output`: `plain`
//!
//! Overrides precedence: CLI > config file > defaults. Environment tables
//! are merged key by key with the same precedence.

use crate::error::ConfigError;
use crate::models::request::{DEFAULT_EXTENSION, DEFAULT_MAX_SIBLINGS, DEFAULT_SNAPSHOT_PREFIX};
use crate::models::{LintMode, LintRequest, ReportFormat, Severity, SourceBuffer};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_COMMAND: &[&str] = &["golangci-lint", "run", "--fast", "--enable", "typecheck"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `lintsnap.toml|yaml`.
pub struct LintsnapConfig {
    pub command: Option<Vec<String>>,
    pub mode: Option<String>,
    pub report: Option<String>,
    pub pattern: Option<String>,
    pub extension: Option<String>,
    pub max_siblings: Option<usize>,
    pub snapshot_prefix: Option<String>,
    pub default_severity: Option<String>,
    pub output: Option<String>,
    #[serde(default)]
    pub env: Option<BTreeMap<String, String>>, // [env]
}

#[derive(Debug, Default, Clone)]
/// Settings given on the command line; `None` defers to the config file.
pub struct CliOverrides {
    pub command: Vec<String>,
    pub mode: Option<String>,
    pub report: Option<String>,
    pub pattern: Option<String>,
    pub extension: Option<String>,
    pub max_siblings: Option<usize>,
    pub output: Option<String>,
    pub env: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the lint command after applying precedence.
pub struct Effective {
    pub config_root: Option<PathBuf>,
    pub command: Vec<String>,
    pub mode: LintMode,
    pub report: ReportFormat,
    pub pattern: Option<String>,
    pub extension: String,
    pub max_siblings: usize,
    pub snapshot_prefix: String,
    pub default_severity: Severity,
    pub output: String,
    pub env: BTreeMap<String, String>,
}

impl Effective {
    /// Build the core request for `buffer`.
    pub fn to_request(&self, buffer: SourceBuffer) -> LintRequest {
        LintRequest {
            buffer,
            command: self.command.clone(),
            mode: self.mode,
            report: self.report,
            pattern: self.pattern.clone(),
            default_severity: self.default_severity,
            extension: self.extension.clone(),
            max_siblings: self.max_siblings,
            snapshot_prefix: self.snapshot_prefix.clone(),
            env: self.env.clone(),
        }
    }
}

const CONFIG_NAMES: [&str; 3] = ["lintsnap.toml", "lintsnap.yaml", "lintsnap.yml"];

/// Walk upward from `start` to find the directory holding a lintsnap config.
///
/// Stops at the first `lintsnap.toml|yaml|yml`; gives up at a `.git`
/// directory or the filesystem root.
pub fn detect_config_root(start: &Path) -> Option<PathBuf> {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return Some(cur.to_path_buf());
        }
        if cur.join(".git").exists() {
            return None;
        }
        cur = cur.parent()?;
    }
}

/// Load `LintsnapConfig` from `lintsnap.toml` or `lintsnap.yaml|yml` if present.
pub fn load_config(root: &Path) -> Option<LintsnapConfig> {
    let toml_path = root.join("lintsnap.toml");
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path).ok()?;
        let cfg: LintsnapConfig = toml::from_str(&s).ok()?;
        return Some(cfg);
    }
    for yml in ["lintsnap.yaml", "lintsnap.yml"] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p).ok()?;
            let cfg: LintsnapConfig = serde_yaml::from_str(&s).ok()?;
            return Some(cfg);
        }
    }
    None
}

/// Resolve `Effective` by merging CLI flags, the discovered config, and defaults.
///
/// `start` is where config discovery begins, normally the linted file's directory.
pub fn resolve_effective(start: &Path, cli: &CliOverrides) -> Result<Effective, ConfigError> {
    let config_root = detect_config_root(start);
    let cfg = config_root
        .as_deref()
        .and_then(load_config)
        .unwrap_or_default();

    let mode_src = cli.mode.clone().or(cfg.mode);
    let mode = match mode_src {
        Some(s) => LintMode::parse(&s).ok_or(ConfigError::InvalidValue {
            key: "mode",
            value: s,
        })?,
        None => LintMode::default(),
    };

    let report_src = cli.report.clone().or(cfg.report);
    let report = match report_src {
        Some(s) => ReportFormat::parse(&s).ok_or(ConfigError::InvalidValue {
            key: "report",
            value: s,
        })?,
        None => ReportFormat::default(),
    };

    let default_severity = match cfg.default_severity {
        Some(s) => Severity::parse(&s).ok_or(ConfigError::InvalidValue {
            key: "default_severity",
            value: s,
        })?,
        None => Severity::Error,
    };

    let output = cli
        .output
        .clone()
        .or(cfg.output)
        .unwrap_or_else(|| "plain".to_string());
    if !matches!(output.as_str(), "plain" | "human" | "json") {
        return Err(ConfigError::InvalidValue {
            key: "output",
            value: output,
        });
    }

    let mut command = if !cli.command.is_empty() {
        cli.command.clone()
    } else {
        cfg.command
            .unwrap_or_else(|| DEFAULT_COMMAND.iter().map(|s| s.to_string()).collect())
    };
    if command.is_empty() {
        return Err(ConfigError::EmptyCommand);
    }
    if report == ReportFormat::Json && !selects_output_format(&command) {
        command.push("--out-format".to_string());
        command.push("json".to_string());
    }

    let extension = cli
        .extension
        .clone()
        .or(cfg.extension)
        .map(|e| e.trim_start_matches('.').to_string())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string());

    // [env] from the file first, CLI pairs win per key
    let mut env = cfg.env.unwrap_or_default();
    env.extend(cli.env.iter().map(|(k, v)| (k.clone(), v.clone())));

    Ok(Effective {
        config_root,
        command,
        mode,
        report,
        pattern: cli.pattern.clone().or(cfg.pattern),
        extension,
        max_siblings: cli
            .max_siblings
            .or(cfg.max_siblings)
            .unwrap_or(DEFAULT_MAX_SIBLINGS),
        snapshot_prefix: cfg
            .snapshot_prefix
            .unwrap_or_else(|| DEFAULT_SNAPSHOT_PREFIX.to_string()),
        default_severity,
        output,
        env,
    })
}

fn selects_output_format(command: &[String]) -> bool {
    command
        .iter()
        .any(|a| a.starts_with("--out-format") || a.starts_with("--output"))
}

/// Parse a `KEY=VALUE` environment override.
pub fn parse_env_pair(s: &str) -> Result<(String, String), ConfigError> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_string(), v.to_string())),
        _ => Err(ConfigError::EnvPair(s.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn defaults_without_config() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let eff = resolve_effective(dir.path(), &CliOverrides::default()).unwrap();
        assert!(eff.config_root.is_none());
        assert_eq!(eff.command, DEFAULT_COMMAND);
        assert_eq!(eff.mode, LintMode::Isolated);
        assert_eq!(eff.report, ReportFormat::Text);
        assert_eq!(eff.extension, "go");
        assert_eq!(eff.max_siblings, 40);
        assert_eq!(eff.snapshot_prefix, ".lintsnap-");
        assert_eq!(eff.output, "plain");
    }

    #[test]
    fn toml_config_is_found_from_nested_dir() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("lintsnap.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
command = ["golangci-lint", "run"]
mode = "in-place"
report = "json"
max_siblings = 10
[env]
GOFLAGS = "-mod=mod"
CGO_ENABLED = "0"
    "#
        )
        .unwrap();
        let nested = root.join("cmd/app");
        fs::create_dir_all(&nested).unwrap();

        let eff = resolve_effective(&nested, &CliOverrides::default()).unwrap();
        assert_eq!(eff.config_root.as_deref(), Some(root));
        assert_eq!(eff.mode, LintMode::InPlace);
        assert_eq!(eff.report, ReportFormat::Json);
        assert_eq!(eff.max_siblings, 10);
        assert_eq!(
            eff.command,
            vec!["golangci-lint", "run", "--out-format", "json"]
        );
        assert_eq!(eff.env.get("GOFLAGS").map(String::as_str), Some("-mod=mod"));
    }

    #[test]
    fn yaml_config_and_cli_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("lintsnap.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
mode: in-place
output: human
extension: .gox
env:
  A: from-file
  B: from-file
            "#
        )
        .unwrap();

        let mut cli = CliOverrides {
            mode: Some("isolated".into()),
            command: vec!["mylinter".into(), "--out-format=json".into()],
            report: Some("json".into()),
            ..Default::default()
        };
        cli.env.insert("B".into(), "from-cli".into());
        let eff = resolve_effective(root, &cli).unwrap();
        assert_eq!(eff.mode, LintMode::Isolated);
        assert_eq!(eff.output, "human");
        assert_eq!(eff.extension, "gox");
        // An explicit output-format flag is left alone
        assert_eq!(eff.command, vec!["mylinter", "--out-format=json"]);
        assert_eq!(eff.env.get("A").map(String::as_str), Some("from-file"));
        assert_eq!(eff.env.get("B").map(String::as_str), Some("from-cli"));
    }

    #[test]
    fn invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let cli = CliOverrides {
            mode: Some("sideways".into()),
            ..Default::default()
        };
        let err = resolve_effective(dir.path(), &cli).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "mode", .. }));
        let cli = CliOverrides {
            output: Some("xml".into()),
            ..Default::default()
        };
        assert!(resolve_effective(dir.path(), &cli).is_err());
    }

    #[test]
    fn effective_builds_request() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();
        let eff = resolve_effective(dir.path(), &CliOverrides::default()).unwrap();
        let req = eff.to_request(SourceBuffer::from_text(dir.path().join("main.go"), "x"));
        assert_eq!(req.command, eff.command);
        assert_eq!(req.max_siblings, 40);
        assert_eq!(req.buffer.content, b"x");
    }

    #[test]
    fn env_pairs() {
        assert_eq!(
            parse_env_pair("GOOS=linux").unwrap(),
            ("GOOS".to_string(), "linux".to_string())
        );
        assert_eq!(parse_env_pair("X=a=b").unwrap().1, "a=b");
        assert!(parse_env_pair("novalue").is_err());
        assert!(parse_env_pair("=x").is_err());
    }
}
