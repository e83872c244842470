//! Pull request snapshot and the webhook payload it is built from.

use serde::Deserialize;

/// Immutable facts about a pull request, shared by every check.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PullRequest {
    pub author: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    pub repo_owner: String,
    pub repo_name: String,
    pub pr_number: u64,
    /// Paths touched by the PR. Empty when the caller did not list them.
    #[serde(default)]
    pub changed_files: Vec<String>,
}

impl PullRequest {
    pub fn new(
        author: impl Into<String>,
        title: impl Into<String>,
        body: Option<String>,
        repo_owner: impl Into<String>,
        repo_name: impl Into<String>,
        pr_number: u64,
    ) -> Self {
        Self {
            author: author.into(),
            title: title.into(),
            body,
            repo_owner: repo_owner.into(),
            repo_name: repo_name.into(),
            pr_number,
            changed_files: Vec::new(),
        }
    }

    pub fn with_changed_files(mut self, files: Vec<String>) -> Self {
        self.changed_files = files;
        self
    }

    /// `owner/repo#number`, for log lines.
    pub fn slug(&self) -> String {
        format!("{}/{}#{}", self.repo_owner, self.repo_name, self.pr_number)
    }
}

// ── GitHub `pull_request` webhook payload (only the fields we read) ──

#[derive(Debug, Deserialize)]
pub struct PullRequestEvent {
    pub pull_request: PullRequestPayload,
    pub repository: RepositoryPayload,
    /// Not part of the GitHub payload; callers may attach the file list.
    #[serde(default)]
    pub changed_files: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct PullRequestPayload {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub user: Account,
}

#[derive(Debug, Deserialize)]
pub struct RepositoryPayload {
    pub name: String,
    pub owner: Account,
}

#[derive(Debug, Deserialize)]
pub struct Account {
    pub login: String,
}

impl From<PullRequestEvent> for PullRequest {
    fn from(event: PullRequestEvent) -> Self {
        let pr = event.pull_request;
        Self {
            author: pr.user.login,
            title: pr.title,
            body: pr.body,
            repo_owner: event.repository.owner.login,
            repo_name: event.repository.name,
            pr_number: pr.number,
            changed_files: event.changed_files,
        }
    }
}
