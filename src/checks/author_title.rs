use std::sync::Arc;

use async_trait::async_trait;

use crate::checks::predicate_names::{AUTHORSHIP_MATCHES, BODY_MATCHES, FILES_MATCH, TITLE_MATCHES};
use crate::checks::{Check, CheckKind};
use crate::config::AuthorTitleRule;
use crate::error::{CheckError, ConfigError};
use crate::pr::PullRequest;
use crate::predicates::{Pattern, matches_all_paths, matches_author, matches_pattern};
use crate::report::{ReportSink, report_individual_checks};

/// Approves PRs from a given author whose title matches a pattern.
///
/// Optional body and file-path patterns add further conjuncts; they are only
/// evaluated and reported when configured.
pub struct AuthorTitleCheck {
    name: String,
    author: String,
    title: Pattern,
    body: Option<Pattern>,
    files: Option<Pattern>,
    sink: Arc<dyn ReportSink>,
}

impl AuthorTitleCheck {
    pub fn new(
        name: impl Into<String>,
        author: impl Into<String>,
        title: Pattern,
        sink: Arc<dyn ReportSink>,
    ) -> Self {
        Self {
            name: name.into(),
            author: author.into(),
            title,
            body: None,
            files: None,
            sink,
        }
    }

    pub fn with_body(mut self, body: Pattern) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_files(mut self, files: Pattern) -> Self {
        self.files = Some(files);
        self
    }

    pub fn from_rule(rule: &AuthorTitleRule, sink: Arc<dyn ReportSink>) -> Result<Self, ConfigError> {
        let mut check = Self::new(&rule.name, &rule.author, Pattern::new(&rule.title)?, sink);
        if let Some(ref body) = rule.body {
            check = check.with_body(Pattern::new(body)?);
        }
        if let Some(ref files) = rule.files {
            check = check.with_files(Pattern::new(files)?);
        }
        Ok(check)
    }
}

#[async_trait]
impl Check for AuthorTitleCheck {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Approve
    }

    async fn evaluate(&self, pr: &PullRequest) -> Result<bool, CheckError> {
        let mut names = vec![AUTHORSHIP_MATCHES, TITLE_MATCHES];
        let mut results = vec![
            matches_author(&self.author, &pr.author),
            matches_pattern(Some(&pr.title), &self.title),
        ];

        if let Some(ref body) = self.body {
            names.push(BODY_MATCHES);
            results.push(matches_pattern(pr.body.as_deref(), body));
        }
        if let Some(ref files) = self.files {
            names.push(FILES_MATCH);
            results.push(matches_all_paths(&pr.changed_files, files));
        }

        report_individual_checks(self.sink.as_ref(), &self.name, &names, &results, pr);

        Ok(results.iter().all(|r| *r))
    }
}
