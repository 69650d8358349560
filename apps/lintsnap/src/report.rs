//! Report parsers turning raw tool output into `Issue` records.
//!
//! Two output contracts are supported behind `ReportParser`:
//! - `LineReportParser`: one diagnostic per line, matched by a regex.
//! - `JsonReportParser`: golangci-lint style JSON with an optional
//!   free-text `Report.Error` channel merged in as compiler issues.

use crate::error::ReportError;
use crate::models::report::JsonReport;
use crate::models::{Issue, ReportFormat, Severity, COMPILER_CHECKER};
use regex::{Captures, Regex};
use tracing::debug;

/// Default line pattern: `path:line[:col]: message [(linter)]`.
pub const DEFAULT_LINE_PATTERN: &str = r"^(?P<filename>[^:\n]+):(?P<line>\d+):(?:(?P<col>\d*):)?\s*(?P<message>.*?)(?:\s+\((?P<linter>[\w-]+)\))?\s*$";

pub trait ReportParser {
    fn parse(&self, raw: &str) -> Result<Vec<Issue>, ReportError>;
}

/// Build the parser selected by `format`.
pub fn parser_for(
    format: ReportFormat,
    pattern: Option<&str>,
    default_severity: Severity,
) -> Result<Box<dyn ReportParser>, ReportError> {
    Ok(match format {
        ReportFormat::Text => Box::new(LineReportParser::new(
            pattern.unwrap_or(DEFAULT_LINE_PATTERN),
            default_severity,
        )?),
        ReportFormat::Json => Box::new(JsonReportParser),
    })
}

pub struct LineReportParser {
    re: Regex,
    default_severity: Severity,
}

impl LineReportParser {
    /// Compile `pattern`; it must name `filename`, `line` and `message`.
    ///
    /// Optional groups: `col`, `linter`, `severity`, `error`, `warning`.
    pub fn new(pattern: &str, default_severity: Severity) -> Result<Self, ReportError> {
        let re = Regex::new(pattern)?;
        let names: Vec<&str> = re.capture_names().flatten().collect();
        for required in ["filename", "line", "message"] {
            if !names.contains(&required) {
                return Err(ReportError::MissingGroup(required));
            }
        }
        Ok(LineReportParser {
            re,
            default_severity,
        })
    }

    fn issue_from(&self, caps: &Captures<'_>) -> Option<Issue> {
        let filename = caps.name("filename")?.as_str().trim();
        let line: u32 = caps.name("line")?.as_str().parse().ok()?;
        let column = caps
            .name("col")
            .and_then(|m| m.as_str().parse::<u32>().ok());
        let message = caps.name("message")?.as_str().trim();
        let checker = caps
            .name("linter")
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();
        let severity = self
            .explicit_severity(caps)
            .unwrap_or_else(|| {
                if checker.is_empty() {
                    self.default_severity
                } else {
                    Severity::for_checker(&checker)
                }
            });
        Some(Issue::new(filename, line, column, severity, message, checker))
    }

    fn explicit_severity(&self, caps: &Captures<'_>) -> Option<Severity> {
        if let Some(tok) = caps.name("severity") {
            return Severity::parse(tok.as_str());
        }
        if caps.name("error").is_some() {
            return Some(Severity::Error);
        }
        if caps.name("warning").is_some() {
            return Some(Severity::Warning);
        }
        None
    }
}

impl ReportParser for LineReportParser {
    fn parse(&self, raw: &str) -> Result<Vec<Issue>, ReportError> {
        Ok(raw
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter_map(|l| self.re.captures(l))
            .filter_map(|caps| self.issue_from(&caps))
            .collect())
    }
}

pub struct JsonReportParser;

impl ReportParser for JsonReportParser {
    fn parse(&self, raw: &str) -> Result<Vec<Issue>, ReportError> {
        if raw.trim().is_empty() {
            debug!("analysis tool produced no report");
            return Ok(Vec::new());
        }
        let report: JsonReport = serde_json::from_str(raw)?;
        let mut issues: Vec<Issue> = report
            .issues
            .into_iter()
            .map(|it| {
                Issue::from_checker(
                    it.pos.filename,
                    it.pos.line,
                    it.pos.column,
                    it.text,
                    it.from_linter,
                )
            })
            .collect();
        if let Some(err_text) = report.report.error.as_deref().filter(|s| !s.is_empty()) {
            issues.extend(err_text.lines().filter_map(compiler_issue));
        }
        Ok(issues)
    }
}

/// Convert one `file:line:col: text` line from `Report.Error` into an issue
/// attributed to the compiler checker.
fn compiler_issue(line: &str) -> Option<Issue> {
    let mut fields = line.splitn(4, ':');
    let filename = fields.next()?.trim();
    let line_no = fields.next()?.trim().parse::<u32>().ok()?;
    let column = fields.next()?.trim().parse::<u32>().ok();
    let text = fields.next().unwrap_or("").trim();
    if filename.is_empty() {
        return None;
    }
    Some(Issue::from_checker(
        filename,
        line_no,
        column,
        text,
        COMPILER_CHECKER,
    ))
}
