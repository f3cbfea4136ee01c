//! Audit configuration.
//!
//! Loaded once at startup from an optional YAML file, then overridden by CLI
//! flags and environment (`SLPSERVE_URL`, `SLPDB_AUDIT_CONCURRENCY`).
//!
//! ```yaml
//! endpoint: https://slpserve.example/q
//! concurrency: 8
//! limit: 1
//! timeout_secs: 30
//! collections: [t, confirmed]
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use slpdb_query::{Collection, DEFAULT_LIMIT};

use crate::error::{Error, Result};

/// Default number of checks in flight.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Values given on the command line or in the environment.
///
/// Every field that is set replaces the file value in [`AuditConfig::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Endpoint override.
    pub endpoint: Option<String>,
    /// Collections override. Empty keeps the file value.
    pub collections: Vec<String>,
    /// Concurrency override.
    pub concurrency: Option<usize>,
    /// Limit override.
    pub limit: Option<u32>,
    /// Timeout override, in seconds.
    pub timeout_secs: Option<u64>,
}

/// Audit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// Base URL of the slpserve query endpoint.
    pub endpoint: String,
    /// Maximum number of checks in flight.
    pub concurrency: usize,
    /// Diagnostic result limit per query.
    pub limit: u32,
    /// Client-wide request timeout. `None` keeps the transport default.
    pub timeout_secs: Option<u64>,
    /// Collections to audit, as tags or names. Empty means all.
    pub collections: Vec<String>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            concurrency: DEFAULT_CONCURRENCY,
            limit: DEFAULT_LIMIT,
            timeout_secs: None,
            collections: Vec::new(),
        }
    }
}

impl AuditConfig {
    /// Creates a configuration for `endpoint` with defaults elsewhere.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    /// Parses a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Applies `overrides` on top of this configuration.
    #[must_use]
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = endpoint;
        }
        if !overrides.collections.is_empty() {
            self.collections = overrides.collections;
        }
        if let Some(concurrency) = overrides.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(limit) = overrides.limit {
            self.limit = limit;
        }
        if overrides.timeout_secs.is_some() {
            self.timeout_secs = overrides.timeout_secs;
        }
        self
    }

    /// Checks the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the endpoint is missing or not an HTTP(S)
    /// URL, concurrency or limit is zero, or a collection is unknown.
    pub fn validate(&self) -> Result<()> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(Error::Config(
                "endpoint is required (set SLPSERVE_URL or --endpoint)".to_string(),
            ));
        }
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(Error::Config(format!(
                "endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".to_string()));
        }
        if self.limit == 0 {
            return Err(Error::Config("limit must be at least 1".to_string()));
        }
        if self.timeout_secs == Some(0) {
            return Err(Error::Config("timeout_secs must be at least 1".to_string()));
        }
        self.selected_collections().map(|_| ())
    }

    /// Collections to audit, in audit order.
    pub fn selected_collections(&self) -> Result<Vec<Collection>> {
        if self.collections.is_empty() {
            return Ok(Collection::ALL.to_vec());
        }
        let mut selected = Vec::with_capacity(self.collections.len());
        for raw in &self.collections {
            let collection: Collection = raw
                .parse()
                .map_err(|e: slpdb_query::QueryError| Error::Config(e.to_string()))?;
            if !selected.contains(&collection) {
                selected.push(collection);
            }
        }
        selected.sort_unstable();
        Ok(selected)
    }

    /// Request timeout, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
