use std::sync::Arc;

use async_trait::async_trait;

use crate::checks::predicate_names::{AUTHORSHIP_MATCHES, BODY_MATCHES, IS_GAPIC, TITLE_MATCHES};
use crate::checks::{Check, CheckKind};
use crate::error::CheckError;
use crate::fetch::{ContentFetcher, get_file_content};
use crate::pr::PullRequest;
use crate::predicates::{Pattern, matches_author, matches_pattern};
use crate::report::{ReportSink, report_individual_checks};

const AUTHOR: &str = "gcf-owl-bot[bot]";
const TITLE_PATTERN: &str = "(fix|feat|!)";
const BODY_PATTERN: &str = "PiperOrigin-RevId";
const METADATA_PATH: &str = ".repo-metadata.json";
const LIBRARY_TYPE_FIELD: &str = "library_type";
const GAPIC_AUTO: &str = "GAPIC_AUTO";

/// Flags owl-bot PRs against generated (GAPIC_AUTO) libraries that are
/// missing a conventional-commit marker in the title or a
/// `PiperOrigin-RevId` in the body.
///
/// A `true` verdict means "suspicious". Reported outcomes are the literal
/// match results; the negation lives only in the verdict formula.
///
/// The formula is `author && (!title || !body) && gapic`, not a conjunction
/// of both negations: an owl-bot PR titled "update stuff" with no body must
/// be flagged, and an absent body counts as matching.
///
/// The metadata document must be a JSON object. Anything else is
/// [`CheckError::MalformedContent`]; an object without a string
/// `library_type` is simply not GAPIC.
pub struct OwlBotTemplateChangesCheck {
    author: String,
    title: Pattern,
    body: Pattern,
    fetcher: Arc<dyn ContentFetcher>,
    sink: Arc<dyn ReportSink>,
}

impl OwlBotTemplateChangesCheck {
    pub const NAME: &'static str = "OwlBotTemplateChanges";

    pub fn new(fetcher: Arc<dyn ContentFetcher>, sink: Arc<dyn ReportSink>) -> Self {
        Self {
            author: AUTHOR.to_string(),
            title: Pattern::new(TITLE_PATTERN).expect("built-in title pattern must compile"),
            body: Pattern::new(BODY_PATTERN).expect("built-in body pattern must compile"),
            fetcher,
            sink,
        }
    }

    async fn is_gapic(&self, pr: &PullRequest) -> Result<bool, CheckError> {
        let content = get_file_content(
            &pr.repo_owner,
            &pr.repo_name,
            METADATA_PATH,
            self.fetcher.as_ref(),
        )
        .await?;

        let metadata: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(&content).map_err(|source| CheckError::MalformedContent {
                path: METADATA_PATH.to_string(),
                source,
            })?;

        Ok(metadata.get(LIBRARY_TYPE_FIELD).and_then(|v| v.as_str()) == Some(GAPIC_AUTO))
    }
}

#[async_trait]
impl Check for OwlBotTemplateChangesCheck {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn kind(&self) -> CheckKind {
        CheckKind::Flag
    }

    /// Only owl-bot PRs; the metadata fetch is skipped for everyone else.
    fn applies_to(&self, pr: &PullRequest) -> bool {
        matches_author(&self.author, &pr.author)
    }

    async fn evaluate(&self, pr: &PullRequest) -> Result<bool, CheckError> {
        let authorship_matches = matches_author(&self.author, &pr.author);
        let title_matches = matches_pattern(Some(&pr.title), &self.title);

        // A PR without a body counts as carrying the body marker.
        let body_matches = match pr.body.as_deref() {
            Some(body) => matches_pattern(Some(body), &self.body),
            None => true,
        };

        let is_gapic = self.is_gapic(pr).await?;

        report_individual_checks(
            self.sink.as_ref(),
            Self::NAME,
            &[AUTHORSHIP_MATCHES, TITLE_MATCHES, BODY_MATCHES, IS_GAPIC],
            &[authorship_matches, title_matches, body_matches, is_gapic],
            pr,
        );

        Ok(authorship_matches && (!title_matches || !body_matches) && is_gapic)
    }
}
