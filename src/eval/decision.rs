use serde::Serialize;

use crate::checks::CheckKind;
use crate::error::CheckError;

/// Outcome of one check, ordered so that the aggregate is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The check's policy did not fire.
    NoMatch,
    Approve,
    Flag,
    /// The check could not be evaluated. Never approved.
    Error,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::NoMatch => "no_match",
            Decision::Approve => "approve",
            Decision::Flag => "flag",
            Decision::Error => "error",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Decision::NoMatch => "NO MATCH",
            Decision::Approve => "APPROVE",
            Decision::Flag => "FLAG",
            Decision::Error => "ERROR",
        }
    }

    /// Map a check's verdict onto a decision. Errors fail closed.
    pub fn from_verdict(kind: CheckKind, verdict: &Result<bool, CheckError>) -> Self {
        match (verdict, kind) {
            (Err(_), _) => Decision::Error,
            (Ok(false), _) => Decision::NoMatch,
            (Ok(true), CheckKind::Approve) => Decision::Approve,
            (Ok(true), CheckKind::Flag) => Decision::Flag,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    pub check: String,
    pub decision: Decision,
    /// Error text when `decision` is `Error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Aggregate over every check run against one PR.
#[derive(Debug, Clone, Serialize)]
pub struct Evaluation {
    pub decision: Decision,
    pub results: Vec<CheckResult>,
}

impl Evaluation {
    pub fn from_results(results: Vec<CheckResult>) -> Self {
        let decision = results
            .iter()
            .map(|r| r.decision)
            .max()
            .unwrap_or(Decision::NoMatch);
        Self { decision, results }
    }

    /// Fail-closed evaluation used when the run itself could not complete.
    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            decision: Decision::Error,
            results: vec![CheckResult {
                check: "evaluation".into(),
                decision: Decision::Error,
                error: Some(reason.into()),
            }],
        }
    }

    pub fn approved(&self) -> bool {
        self.decision == Decision::Approve
    }

    /// One line per check, for logs and the hook output.
    pub fn reason(&self) -> String {
        self.results
            .iter()
            .map(|r| match r.error {
                Some(ref e) => format!("{} -> {}: {e}", r.check, r.decision.label()),
                None => format!("{} -> {}", r.check, r.decision.label()),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}
