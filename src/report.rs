//! Audit trail of individual predicate outcomes.
//!
//! Every check reports each predicate it evaluated, in order, before it
//! returns a verdict. Sinks are fire-and-forget: [`ReportSink::record`] has no
//! error channel, and a sink that can fail internally must swallow the fault.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use crate::pr::PullRequest;

/// One predicate outcome for one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditRecord {
    pub check: String,
    pub name: String,
    pub result: bool,
    pub repo_owner: String,
    pub repo_name: String,
    pub pr_number: u64,
}

pub trait ReportSink: Send + Sync {
    fn record(&self, records: &[AuditRecord]);
}

/// Report positionally paired predicate names and results for `pr`.
///
/// Mismatched lengths are logged and the common prefix is reported.
pub fn report_individual_checks(
    sink: &dyn ReportSink,
    check: &str,
    names: &[&str],
    results: &[bool],
    pr: &PullRequest,
) {
    if names.len() != results.len() {
        log::warn!(
            "{check}: {} predicate names but {} results for {}",
            names.len(),
            results.len(),
            pr.slug()
        );
    }
    let records: Vec<AuditRecord> = names
        .iter()
        .zip(results)
        .map(|(name, result)| AuditRecord {
            check: check.to_string(),
            name: (*name).to_string(),
            result: *result,
            repo_owner: pr.repo_owner.clone(),
            repo_name: pr.repo_name.clone(),
            pr_number: pr.pr_number,
        })
        .collect();
    sink.record(&records);
}

/// Writes each record through the `log` facade under target `audit`.
#[derive(Debug, Default)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn record(&self, records: &[AuditRecord]) {
        for r in records {
            log::info!(
                target: "audit",
                "{}/{}#{} {} {}={}",
                r.repo_owner,
                r.repo_name,
                r.pr_number,
                r.check,
                r.name,
                r.result
            );
        }
    }
}

/// Forwards every batch to each inner sink in turn.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn ReportSink>>,
}

impl FanoutSink {
    pub fn new(sinks: Vec<Arc<dyn ReportSink>>) -> Self {
        Self { sinks }
    }
}

impl ReportSink for FanoutSink {
    fn record(&self, records: &[AuditRecord]) {
        for sink in &self.sinks {
            sink.record(records);
        }
    }
}

/// Keeps records in memory, one entry per `record` call.
#[derive(Debug, Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<AuditRecord>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batches(&self) -> Vec<Vec<AuditRecord>> {
        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The most recent batch as `(name, result)` pairs.
    pub fn last(&self) -> Vec<(String, bool)> {
        self.batches()
            .last()
            .map(|b| b.iter().map(|r| (r.name.clone(), r.result)).collect())
            .unwrap_or_default()
    }
}

impl ReportSink for RecordingSink {
    fn record(&self, records: &[AuditRecord]) {
        self.batches
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(records.to_vec());
    }
}
