//! Checks: named policies evaluated against a pull request.
//!
//! Each check owns its configuration, evaluates every predicate of its policy
//! (no short-circuit, so the audit trail is complete), reports the outcomes,
//! and combines them with its own boolean formula.

/// Conjunctive author + title (+ optional body / file paths) policy.
pub mod author_title;
/// Antipattern policy flagging owl-bot PRs that lack the expected markers.
pub mod owlbot_template;

use async_trait::async_trait;

use crate::error::CheckError;
use crate::pr::PullRequest;

pub use author_title::AuthorTitleCheck;
pub use owlbot_template::OwlBotTemplateChangesCheck;

/// Stable predicate names used in audit records.
pub mod predicate_names {
    pub const AUTHORSHIP_MATCHES: &str = "authorshipMatches";
    pub const TITLE_MATCHES: &str = "titleMatches";
    pub const BODY_MATCHES: &str = "bodyMatches";
    pub const FILES_MATCH: &str = "filesMatch";
    pub const IS_GAPIC: &str = "isGAPIC";
}

/// What a `true` verdict means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    /// The PR is eligible for approval.
    Approve,
    /// The PR is suspicious and must not be approved.
    Flag,
}

#[async_trait]
pub trait Check: Send + Sync {
    fn name(&self) -> &str;

    fn kind(&self) -> CheckKind;

    /// Whether the registry should run this check for `pr`. Checks that need
    /// fetched content narrow this so unrelated PRs never hit the network.
    fn applies_to(&self, _pr: &PullRequest) -> bool {
        true
    }

    /// `Ok(false)` is a policy mismatch; `Err` means the policy could not be evaluated.
    async fn evaluate(&self, pr: &PullRequest) -> Result<bool, CheckError>;
}
