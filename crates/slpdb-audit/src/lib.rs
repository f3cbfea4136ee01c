//! # `slpdb-audit`
//!
//! Audits an SLPDB instance through its slpserve endpoint. Every check is a
//! query selecting documents that break a schema invariant; the audit passes
//! when every query comes back empty.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use slpdb_audit::{checks, AuditConfig, Runner, SlpdbClient};
//!
//! # async fn run() -> slpdb_audit::Result<()> {
//! let config = AuditConfig::new("https://slpserve.example/q");
//! let client = SlpdbClient::new(&config)?;
//! let report = Runner::from_config(client, &config).run(&checks::all()).await;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::doc_markdown, clippy::uninlined_format_args))]

pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod response;
pub mod runner;

pub use checks::{Check, CheckKind, Literal, Scope};
pub use client::{QueryTransport, SlpdbClient};
pub use config::{AuditConfig, ConfigOverrides};
pub use error::{Error, Result};
pub use report::{AuditReport, CheckResult, Outcome};
pub use response::QueryResponse;
pub use runner::{assert_empty, Runner};
