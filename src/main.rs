//! auto-approve: evaluate a pull request webhook payload.
//!
//! Reads a GitHub `pull_request` event as JSON from stdin, runs every
//! configured check, and writes the decision as JSON to stdout. Any failure
//! (bad input, bad config, fetch error, timeout) yields a not-approved
//! decision rather than an approval.

use std::time::Duration;

use auto_approve::config::Config;
use auto_approve::eval::{Decision, Evaluation};
use auto_approve::pr::{PullRequest, PullRequestEvent};
use tokio::io::AsyncReadExt;

async fn run(config: &Config) -> Evaluation {
    let mut input = String::new();
    if let Err(e) = tokio::io::stdin().read_to_string(&mut input).await {
        return Evaluation::failed(format!("failed to read stdin: {e}"));
    }

    let event: PullRequestEvent = match serde_json::from_str(&input) {
        Ok(v) => v,
        Err(e) => return Evaluation::failed(format!("JSON parse error: {e}")),
    };
    let pr = PullRequest::from(event);

    let registry = match auto_approve::registry_from_config(config) {
        Ok(r) => r,
        Err(e) => return Evaluation::failed(e.to_string()),
    };

    let limit = Duration::from_secs(config.settings.timeout_secs);
    match tokio::time::timeout(limit, registry.evaluate(&pr)).await {
        Ok(evaluation) => evaluation,
        Err(_) => Evaluation::failed(format!("{} timed out after {limit:?}", pr.slug())),
    }
}

#[tokio::main]
async fn main() {
    let evaluation = match Config::load() {
        Ok(config) => {
            auto_approve::logging::init_logger(&config.settings.log_level);
            run(&config).await
        }
        Err(e) => {
            auto_approve::logging::init_logger("info");
            Evaluation::failed(e.to_string())
        }
    };
    if evaluation.decision == Decision::Error {
        log::error!("not approved:\n{}", evaluation.reason());
    }

    let output = serde_json::json!({
        "decision": evaluation.decision.as_str(),
        "approved": evaluation.approved(),
        "reason": evaluation.reason(),
        "checks": evaluation.results,
    });
    println!("{output}");
}
