//! Inputs of one lint request.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::Severity;

#[derive(Debug, Clone)]
/// Live, possibly unsaved content of the file being linted.
pub struct SourceBuffer {
    pub path: PathBuf,
    pub content: Vec<u8>,
}

impl SourceBuffer {
    pub fn from_bytes(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        SourceBuffer {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Text buffers are stored as their UTF-8 encoding.
    pub fn from_text(path: impl Into<PathBuf>, content: &str) -> Self {
        Self::from_bytes(path, content.as_bytes().to_vec())
    }

    /// Directory holding the file, or `None` for unsaved/virtual buffers.
    pub fn directory(&self) -> Option<&Path> {
        self.path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
    }

    pub fn basename(&self) -> Option<String> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Where the analysis tool runs.
pub enum LintMode {
    /// Against the saved files in the real project directory.
    InPlace,
    /// Against a fresh snapshot carrying the live buffer.
    #[default]
    Isolated,
}

impl LintMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-place" | "inplace" | "in_place" | "save" => Some(LintMode::InPlace),
            "isolated" | "live" | "background" => Some(LintMode::Isolated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Output contract of the analysis tool.
pub enum ReportFormat {
    /// One diagnostic per line, matched against a pattern.
    #[default]
    Text,
    /// A single JSON document on stdout.
    Json,
}

impl ReportFormat {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "line" | "lines" => Some(ReportFormat::Text),
            "json" | "structured" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
/// Everything the core needs for one run; no ambient configuration is read.
pub struct LintRequest {
    pub buffer: SourceBuffer,
    /// Program followed by its arguments.
    pub command: Vec<String>,
    pub mode: LintMode,
    pub report: ReportFormat,
    /// Line pattern for `ReportFormat::Text`; `None` uses the default.
    pub pattern: Option<String>,
    /// Severity for text lines that carry no checker or severity token.
    pub default_severity: Severity,
    /// Extension (without dot) selecting sibling files.
    pub extension: String,
    pub max_siblings: usize,
    pub snapshot_prefix: String,
    pub env: BTreeMap<String, String>,
}

pub const DEFAULT_MAX_SIBLINGS: usize = 40;
pub const DEFAULT_SNAPSHOT_PREFIX: &str = ".lintsnap-";
pub const DEFAULT_EXTENSION: &str = "go";

impl LintRequest {
    pub fn new(buffer: SourceBuffer, command: Vec<String>) -> Self {
        LintRequest {
            buffer,
            command,
            mode: LintMode::default(),
            report: ReportFormat::default(),
            pattern: None,
            default_severity: Severity::Error,
            extension: DEFAULT_EXTENSION.to_string(),
            max_siblings: DEFAULT_MAX_SIBLINGS,
            snapshot_prefix: DEFAULT_SNAPSHOT_PREFIX.to_string(),
            env: BTreeMap::new(),
        }
    }
}
