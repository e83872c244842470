pub mod decision;

pub use decision::{CheckResult, Decision, Evaluation};

use std::sync::Arc;

use crate::checks::{AuthorTitleCheck, Check, OwlBotTemplateChangesCheck};
use crate::config::Config;
use crate::error::ConfigError;
use crate::fetch::ContentFetcher;
use crate::pr::PullRequest;
use crate::report::ReportSink;

/// The set of checks run against every incoming PR.
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRegistry {
    pub fn new(checks: Vec<Box<dyn Check>>) -> Self {
        Self { checks }
    }

    /// Build the registry from configuration. Patterns are compiled here, so
    /// a bad pattern fails construction rather than evaluation.
    pub fn from_config(
        config: &Config,
        fetcher: Arc<dyn ContentFetcher>,
        sink: Arc<dyn ReportSink>,
    ) -> Result<Self, ConfigError> {
        let mut checks: Vec<Box<dyn Check>> = Vec::new();

        for rule in &config.checks.author_title {
            checks.push(Box::new(AuthorTitleCheck::from_rule(rule, sink.clone())?));
        }

        if config.checks.owlbot_template_changes {
            checks.push(Box::new(OwlBotTemplateChangesCheck::new(fetcher, sink)));
        }

        Ok(Self { checks })
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Names of registered checks, in evaluation order.
    pub fn names(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.name()).collect()
    }

    /// Run every check that applies to `pr`. A failing check does not stop the others.
    pub async fn evaluate(&self, pr: &PullRequest) -> Evaluation {
        let mut results = Vec::with_capacity(self.checks.len());

        for check in &self.checks {
            if !check.applies_to(pr) {
                log::debug!("{} {}: not applicable", pr.slug(), check.name());
                continue;
            }
            let verdict = check.evaluate(pr).await;
            let decision = Decision::from_verdict(check.kind(), &verdict);
            let error = match verdict {
                Ok(v) => {
                    log::debug!("{} {}: {v}", pr.slug(), check.name());
                    None
                }
                Err(e) => {
                    log::warn!("{} {}: not evaluated: {e}", pr.slug(), check.name());
                    Some(e.to_string())
                }
            };
            results.push(CheckResult {
                check: check.name().to_string(),
                decision,
                error,
            });
        }

        let evaluation = Evaluation::from_results(results);
        log::info!("{} -> {}", pr.slug(), evaluation.decision.as_str());
        evaluation
    }
}
