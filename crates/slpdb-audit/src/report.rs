//! Audit results and their rendering.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;

use slpdb_query::Collection;

use crate::checks::Check;

/// Outcome of a single check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum Outcome {
    /// No violating document.
    Passed,
    /// The service reported violating documents.
    Violated {
        /// Number of violating documents reported.
        count: u64,
    },
    /// The check could not complete.
    Errored {
        /// Error message.
        error: String,
    },
}

impl Outcome {
    /// Returns `true` for [`Outcome::Passed`].
    #[must_use]
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Result of one check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// Check id.
    pub id: String,
    /// Audited collection.
    pub collection: Collection,
    /// Checked field.
    pub field: String,
    /// Human-readable invariant.
    pub description: String,
    /// What happened.
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Wall time spent on the check, in milliseconds.
    pub elapsed_ms: u64,
}

impl CheckResult {
    /// Builds a result for `check`.
    #[must_use]
    pub fn new(check: &Check, outcome: Outcome, elapsed_ms: u64) -> Self {
        Self {
            id: check.id(),
            collection: check.collection,
            field: check.field.to_string(),
            description: check.description(),
            outcome,
            elapsed_ms,
        }
    }
}

/// Results of an audit run, in check-table order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditReport {
    /// Per-check results.
    pub results: Vec<CheckResult>,
    /// Total wall time, in milliseconds.
    pub elapsed_ms: u64,
}

impl AuditReport {
    /// Number of passed checks.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_pass()).count()
    }

    /// Number of failed checks (violations and errors).
    #[must_use]
    pub fn failed(&self) -> usize {
        self.results.len() - self.passed()
    }

    /// Returns `true` if every check passed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Failed results only.
    pub fn failures(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| !r.outcome.is_pass())
    }

    /// Pretty JSON rendering.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Coloured, line-per-check rendering grouped by collection.
    #[must_use]
    pub fn render_text(&self, verbose: bool) -> String {
        let mut out = String::new();
        let mut current: Option<Collection> = None;

        for result in &self.results {
            if current != Some(result.collection) {
                current = Some(result.collection);
                let _ = writeln!(out, "{}", result.collection.to_string().bold());
            }
            match &result.outcome {
                Outcome::Passed if verbose => {
                    let _ = writeln!(out, "  {} {}", "ok".green(), result.description);
                }
                Outcome::Passed => {}
                Outcome::Violated { count } => {
                    let _ = writeln!(
                        out,
                        "  {} {} ({} violating document(s)) [{}]",
                        "FAIL".red().bold(),
                        result.description,
                        count,
                        result.id
                    );
                }
                Outcome::Errored { error } => {
                    let _ = writeln!(
                        out,
                        "  {} {} [{}]: {}",
                        "ERROR".yellow().bold(),
                        result.description,
                        result.id,
                        error
                    );
                }
            }
        }

        let summary = format!(
            "{} checks, {} passed, {} failed in {} ms",
            self.results.len(),
            self.passed(),
            self.failed(),
            self.elapsed_ms
        );
        let _ = writeln!(
            out,
            "\n{}",
            if self.is_success() {
                summary.green().bold()
            } else {
                summary.red().bold()
            }
        );
        out
    }
}
