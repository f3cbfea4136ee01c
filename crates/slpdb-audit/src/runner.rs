//! Executes checks against a transport and collects the outcomes.

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Instant;
use tracing::{debug, info, warn};

use slpdb_query::QueryDescriptor;

use crate::checks::Check;
use crate::client::QueryTransport;
use crate::config::{AuditConfig, DEFAULT_CONCURRENCY};
use crate::error::{Error, Result};
use crate::report::{AuditReport, CheckResult, Outcome};

/// Sends `query` and fails unless the service reports zero violations.
///
/// # Errors
///
/// [`Error::Violation`] carrying the reported count when violations exist;
/// transport and decoding errors are passed through unchanged.
pub async fn assert_empty<T>(transport: &T, query: &QueryDescriptor, field: &str) -> Result<()>
where
    T: QueryTransport + ?Sized,
{
    let response = transport.query(query).await?;
    let count = response.violation_count(query)?;
    if count == 0 {
        Ok(())
    } else {
        Err(Error::Violation {
            collection: query.collection(),
            field: field.to_string(),
            count,
        })
    }
}

/// Runs audit checks with bounded concurrency.
pub struct Runner<T> {
    transport: T,
    concurrency: usize,
    limit: u32,
    progress: bool,
}

impl<T: QueryTransport> Runner<T> {
    /// Creates a runner with default concurrency and limit.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            concurrency: DEFAULT_CONCURRENCY,
            limit: slpdb_query::DEFAULT_LIMIT,
            progress: false,
        }
    }

    /// Creates a runner taking concurrency and limit from `config`.
    #[must_use]
    pub fn from_config(transport: T, config: &AuditConfig) -> Self {
        Self::new(transport)
            .with_concurrency(config.concurrency)
            .with_limit(config.limit)
    }

    /// Sets the number of checks in flight (at least 1).
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Sets the diagnostic result limit per query.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Shows a progress bar on stderr while running.
    #[must_use]
    pub fn with_progress(mut self, progress: bool) -> Self {
        self.progress = progress;
        self
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Runs a single check. Never fails: every problem becomes an outcome.
    pub async fn run_check(&self, check: &Check) -> CheckResult {
        let start = Instant::now();
        let outcome = match self.execute(check).await {
            Ok(()) => Outcome::Passed,
            Err(Error::Violation { count, .. }) => {
                warn!("{}: {} violating document(s)", check.id(), count);
                Outcome::Violated { count }
            }
            Err(e) => {
                warn!("{}: {}", check.id(), e);
                Outcome::Errored {
                    error: e.to_string(),
                }
            }
        };
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        CheckResult::new(check, outcome, elapsed_ms)
    }

    async fn execute(&self, check: &Check) -> Result<()> {
        let query = check.query(self.limit)?;
        debug!("{} -> {}", check.id(), query.to_json()?);
        assert_empty(&self.transport, &query, check.field).await
    }

    /// Runs `checks` in any order, up to `concurrency` at a time.
    ///
    /// The report lists results in the order of `checks`.
    pub async fn run(&self, checks: &[Check]) -> AuditReport {
        info!(
            "Running {} checks (concurrency {})",
            checks.len(),
            self.concurrency
        );
        let start = Instant::now();

        let bar = if self.progress {
            let bar = ProgressBar::new(checks.len() as u64);
            if let Ok(style) =
                ProgressStyle::with_template("{spinner} [{bar:40}] {pos}/{len} {msg}")
            {
                bar.set_style(style.progress_chars("=> "));
            }
            bar
        } else {
            ProgressBar::hidden()
        };

        let mut indexed: Vec<(usize, CheckResult)> = stream::iter(checks.iter().enumerate())
            .map(|(idx, check)| {
                let bar = &bar;
                async move {
                    let result = self.run_check(check).await;
                    bar.inc(1);
                    (idx, result)
                }
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;
        bar.finish_and_clear();

        indexed.sort_by_key(|(idx, _)| *idx);
        let report = AuditReport {
            results: indexed.into_iter().map(|(_, r)| r).collect(),
            elapsed_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        };

        info!(
            "Audit finished: {} passed, {} failed",
            report.passed(),
            report.failed()
        );
        report
    }
}
