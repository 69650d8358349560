//! Output rendering for lint outcomes.
//!
//! `render_lines` is the diagnostic line contract consumed by editors:
//! `<short filename>:<line>:<column>:<severity>:<message>`. The CLI also
//! offers `human` (colored, with a summary) and `json` printers.

use crate::models::{Issue, LintOutcome, Severity};
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output == "human" && std::env::var_os("NO_COLOR").is_none()
}

/// One diagnostic line for `issue`; a missing column leaves its field empty.
pub fn render_line(issue: &Issue) -> String {
    let col = issue.column.map(|c| c.to_string()).unwrap_or_default();
    format!(
        "{}:{}:{}:{}:{}",
        issue.short_filename, issue.line, col, issue.severity, issue.message
    )
}

/// Newline-joined diagnostic lines; empty input yields `""`.
pub fn render_lines(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(render_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print an outcome in the requested mode: `plain` (default), `human`, `json`.
pub fn print_outcome(outcome: &LintOutcome, output: &str) {
    match output {
        "json" => println!("{}", compose_outcome_json(outcome)),
        "human" => print_human(outcome, use_colors(output)),
        _ => {
            let text = outcome.render();
            if !text.is_empty() {
                println!("{}", text);
            }
        }
    }
}

fn print_human(outcome: &LintOutcome, color: bool) {
    if let LintOutcome::Skipped { reason } = outcome {
        let line = format!("skipped: {}", reason);
        if color {
            println!("{}", line.bright_black());
        } else {
            println!("{}", line);
        }
        return;
    }
    let issues = outcome.issues();
    for is in issues {
        let sev = match (is.severity, color) {
            (Severity::Error, true) => "error".red().bold().to_string(),
            (Severity::Warning, true) => "warn".yellow().bold().to_string(),
            (Severity::Error, false) => "error".to_string(),
            (Severity::Warning, false) => "warn".to_string(),
        };
        let loc = match is.column {
            Some(c) => format!("{}:{}:{}", is.short_filename, is.line, c),
            None => format!("{}:{}", is.short_filename, is.line),
        };
        let loc = if color { loc.bold().to_string() } else { loc };
        if is.checker.is_empty() {
            println!("{} {} {}", sev, loc, is.message);
        } else {
            println!("{} {} {} ({})", sev, loc, is.message, is.checker);
        }
    }
    let (errors, warnings) = count_by_severity(issues);
    let summary = format!("— Summary — errors={} warnings={}", errors, warnings);
    if color {
        println!("{}", summary.bold());
    } else {
        println!("{}", summary);
    }
}

pub fn count_by_severity(issues: &[Issue]) -> (usize, usize) {
    let errors = issues
        .iter()
        .filter(|i| i.severity == Severity::Error)
        .count();
    (errors, issues.len() - errors)
}

/// Compose the JSON form of an outcome (pure) for testing.
pub fn compose_outcome_json(outcome: &LintOutcome) -> JsonVal {
    let (errors, warnings) = count_by_severity(outcome.issues());
    let mut out = serde_json::to_value(outcome).unwrap_or_else(|_| json!({}));
    if let Some(obj) = out.as_object_mut() {
        obj.insert("lines".into(), json!(outcome.render()));
        obj.insert(
            "summary".into(),
            json!({ "errors": errors, "warnings": warnings }),
        );
    }
    out
}
