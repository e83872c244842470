//! auto-approve: decides whether a pull request is eligible for automatic approval.
//!
//! A [`CheckRegistry`](crate::eval::CheckRegistry) runs a set of
//! [`Check`](crate::checks::Check)s against an immutable
//! [`PullRequest`](crate::pr::PullRequest) snapshot. Each check reports every
//! predicate it evaluated to a [`ReportSink`](crate::report::ReportSink) and
//! returns a boolean verdict; the registry folds the verdicts into one
//! fail-closed [`Decision`](crate::eval::Decision).
//!
//! # Architecture
//!
//! - **[`pr`]** — Pull request snapshot and webhook payload types.
//! - **[`predicates`]** — Author, pattern and path comparisons.
//! - **[`fetch`]** — Repository file retrieval over the GitHub contents API.
//! - **[`report`]** — Audit records and sinks.
//! - **[`checks`]** — The `Check` trait and concrete policies.
//! - **[`eval`]** — Registry, per-check decisions, aggregation.
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]** — Logger setup and the JSON-lines audit file.

/// Check trait and policy implementations.
pub mod checks;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Error types for fetching, checking and configuration.
pub mod error;
/// Evaluation engine: registry, decision aggregation.
pub mod eval;
/// Repository content fetcher.
pub mod fetch;
/// Logger initialisation and file-based audit sink.
pub mod logging;
/// Pull request model.
pub mod pr;
/// Pure predicate functions.
pub mod predicates;
/// Audit trail emission.
pub mod report;

use std::sync::Arc;

use config::Config;
use error::ConfigError;
use eval::CheckRegistry;
use fetch::GitHubContentFetcher;
use report::{FanoutSink, LogSink, ReportSink};

/// Build a registry from `config` with the GitHub fetcher and the standard sinks
/// (log facade, plus the audit file when one is configured).
pub fn registry_from_config(config: &Config) -> Result<CheckRegistry, ConfigError> {
    let token = config.token();
    let fetcher = GitHubContentFetcher::new(&config.settings.api_base_url, token.as_deref())?;

    let mut sinks: Vec<Arc<dyn ReportSink>> = Vec::new();
    sinks.push(Arc::new(LogSink));
    if !config.settings.audit_log.is_empty() {
        sinks.push(Arc::new(logging::FileSink::new(&config.settings.audit_log)));
    }

    CheckRegistry::from_config(config, Arc::new(fetcher), Arc::new(FanoutSink::new(sinks)))
}
