//! Scope issues to the target file and drop snapshot-induced noise.
//!
//! Linting a package from an ephemeral directory breaks canonical import
//! path comments (`package foo // import "example.com/foo"`): the tool
//! reports that the code "expects import" a path the snapshot cannot
//! satisfy, then every dependent "could not import ... (missing package:)"
//! follows from it. Once the first kind is seen, the second is dropped for
//! the rest of the pass.

use crate::models::Issue;

/// Whether a canonical-import-path violation has been observed in this pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SuppressionState {
    pub import_mismatch_seen: bool,
}

fn is_canonical_import_violation(text: &str) -> bool {
    text.contains("code in directory") && text.contains("expects import")
}

fn is_missing_package(text: &str) -> bool {
    text.contains("could not import") && text.contains("missing package:")
}

/// Keep issues for `target_basename`, in order, minus suppressed ones.
pub fn filter_issues(issues: Vec<Issue>, target_basename: &str) -> Vec<Issue> {
    let (_, kept) = issues.into_iter().fold(
        (SuppressionState::default(), Vec::new()),
        |(state, mut kept), issue| {
            if is_canonical_import_violation(&issue.message) {
                return (
                    SuppressionState {
                        import_mismatch_seen: true,
                    },
                    kept,
                );
            }
            if state.import_mismatch_seen && is_missing_package(&issue.message) {
                return (state, kept);
            }
            if issue.short_filename == target_basename {
                kept.push(issue);
            }
            (state, kept)
        },
    );
    kept
}
