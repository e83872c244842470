use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auto_approve::checks::{AuthorTitleCheck, Check, OwlBotTemplateChangesCheck};
use auto_approve::config::Config;
use auto_approve::error::{CheckError, FetchError};
use auto_approve::eval::{CheckRegistry, Decision};
use auto_approve::fetch::ContentFetcher;
use auto_approve::pr::PullRequest;
use auto_approve::predicates::{Pattern, matches_pattern};
use auto_approve::report::RecordingSink;

const OWL_BOT: &str = "gcf-owl-bot[bot]";
const GAPIC_METADATA: &str = r#"{"library_type": "GAPIC_AUTO"}"#;

/// In-memory repository files keyed by `owner/repo/path`.
#[derive(Default)]
struct Files(HashMap<String, String>);

impl Files {
    fn with(mut self, owner: &str, repo: &str, path: &str, content: &str) -> Arc<Self> {
        self.0.insert(format!("{owner}/{repo}/{path}"), content.to_string());
        Arc::new(self)
    }
}

#[async_trait]
impl ContentFetcher for Files {
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, FetchError> {
        self.0
            .get(&format!("{owner}/{repo}/{path}"))
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                owner: owner.into(),
                repo: repo.into(),
                path: path.into(),
            })
    }
}

fn gapic_repo() -> Arc<Files> {
    Files::default().with("googleapis", "java-speech", ".repo-metadata.json", GAPIC_METADATA)
}

fn pr(author: &str, title: &str, body: Option<&str>) -> PullRequest {
    PullRequest::new(author, title, body.map(String::from), "googleapis", "java-speech", 777)
}

fn pairs(sink: &RecordingSink) -> Vec<(String, bool)> {
    sink.last()
}

fn expect(list: &[(&str, bool)]) -> Vec<(String, bool)> {
    list.iter().map(|(n, r)| (n.to_string(), *r)).collect()
}

// ── Antipattern policy ──

#[tokio::test]
async fn scenario_a_well_formed_owlbot_pr_not_flagged() {
    let sink = Arc::new(RecordingSink::new());
    let check = OwlBotTemplateChangesCheck::new(gapic_repo(), sink.clone());

    let verdict = check
        .evaluate(&pr(OWL_BOT, "fix: update generated client", Some("PiperOrigin-RevId: 12345")))
        .await
        .unwrap();

    assert!(!verdict);
    assert_eq!(
        pairs(&sink),
        expect(&[
            ("authorshipMatches", true),
            ("titleMatches", true),
            ("bodyMatches", true),
            ("isGAPIC", true),
        ])
    );
}

#[tokio::test]
async fn scenario_b_unmarked_owlbot_pr_flagged() {
    let sink = Arc::new(RecordingSink::new());
    let check = OwlBotTemplateChangesCheck::new(gapic_repo(), sink.clone());

    let verdict = check.evaluate(&pr(OWL_BOT, "update stuff", None)).await.unwrap();

    assert!(verdict);
    assert_eq!(
        pairs(&sink),
        expect(&[
            ("authorshipMatches", true),
            ("titleMatches", false),
            ("bodyMatches", true),
            ("isGAPIC", true),
        ])
    );
}

#[tokio::test]
async fn scenario_d_missing_metadata_raises() {
    let sink = Arc::new(RecordingSink::new());
    let check = OwlBotTemplateChangesCheck::new(Arc::new(Files::default()), sink.clone());

    let err = check
        .evaluate(&pr(OWL_BOT, "update stuff", None))
        .await
        .unwrap_err();

    assert!(matches!(err, CheckError::Fetch(FetchError::NotFound { .. })));
    assert!(sink.batches().is_empty());
}

#[tokio::test]
async fn scenario_d_registry_fails_closed() {
    let sink = Arc::new(RecordingSink::new());
    let registry =
        CheckRegistry::from_config(&Config::default_config(), Arc::new(Files::default()), sink)
            .unwrap();

    // Would be approved by the owlbot-post-processor rule alone.
    let eval = registry
        .evaluate(&pr(OWL_BOT, "fix: regenerate client", Some("PiperOrigin-RevId: 9")))
        .await;

    assert_eq!(eval.decision, Decision::Error);
    assert!(!eval.approved());
}

#[tokio::test]
async fn repo_without_metadata_still_approves_other_bots() {
    let registry = CheckRegistry::from_config(
        &Config::default_config(),
        Arc::new(Files::default()),
        Arc::new(RecordingSink::new()),
    )
    .unwrap();

    let incoming = PullRequest::new(
        "release-please[bot]",
        "chore(main): release 1.0.0",
        None,
        "someorg",
        "no-metadata",
        3,
    );
    let eval = registry.evaluate(&incoming).await;

    assert!(eval.approved(), "{}", eval.reason());
}

#[tokio::test]
async fn antipattern_is_idempotent() {
    let sink = Arc::new(RecordingSink::new());
    let check = OwlBotTemplateChangesCheck::new(gapic_repo(), sink.clone());
    let incoming = pr(OWL_BOT, "chore: regenerate", Some("no rev id here"));

    let mut verdicts = Vec::new();
    for _ in 0..3 {
        verdicts.push(check.evaluate(&incoming).await.unwrap());
    }

    assert!(verdicts.iter().all(|v| *v == verdicts[0]));
    let batches = sink.batches();
    assert_eq!(batches.len(), 3);
    assert!(batches.iter().all(|b| *b == batches[0]));
}

// ── Conjunctive policy ──

#[tokio::test]
async fn scenario_c_author_mismatch_fails() {
    let sink = Arc::new(RecordingSink::new());
    let check = AuthorTitleCheck::new("alice-docs", "alice", Pattern::new("^docs:").unwrap(), sink.clone());

    let verdict = check
        .evaluate(&pr("bob", "docs: fix typo", None))
        .await
        .unwrap();

    assert!(!verdict);
    assert_eq!(
        pairs(&sink),
        expect(&[("authorshipMatches", false), ("titleMatches", true)])
    );
}

#[tokio::test]
async fn author_mismatch_always_false_and_reported() {
    let sink = Arc::new(RecordingSink::new());
    let check = AuthorTitleCheck::new("alice-any", "alice", Pattern::new("").unwrap(), sink.clone())
        .with_body(Pattern::new("").unwrap());

    for author in ["bob", "Alice", "alice ", ""] {
        let verdict = check
            .evaluate(&pr(author, "anything", Some("anything")))
            .await
            .unwrap();
        assert!(!verdict, "author: {author:?}");
        assert_eq!(sink.last()[0], ("authorshipMatches".to_string(), false));
    }
}

#[tokio::test]
async fn every_predicate_reported_once_per_evaluation() {
    let sink = Arc::new(RecordingSink::new());
    let check = AuthorTitleCheck::new("r", "alice", Pattern::new("^feat").unwrap(), sink.clone())
        .with_body(Pattern::new("Signed-off-by").unwrap())
        .with_files(Pattern::new(r"^docs/").unwrap());

    // Author already decides the verdict; the rest are still evaluated.
    check.evaluate(&pr("bob", "chore", None)).await.unwrap();

    let batches = sink.batches();
    assert_eq!(batches.len(), 1);
    let names: Vec<&str> = batches[0].iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["authorshipMatches", "titleMatches", "bodyMatches", "filesMatch"]);
}

#[test]
fn absent_text_never_matches() {
    for spec in ["", ".*", "PiperOrigin-RevId", "(fix|feat|!)"] {
        assert!(!matches_pattern(None, &Pattern::new(spec).unwrap()));
    }
}

// ── Registry with default configuration ──

#[tokio::test]
async fn default_registry_approves_release_on_gapic_repo() {
    let sink = Arc::new(RecordingSink::new());
    let registry =
        CheckRegistry::from_config(&Config::default_config(), gapic_repo(), sink.clone()).unwrap();

    let eval = registry
        .evaluate(&pr("release-please[bot]", "chore(main): release 1.4.0", None))
        .await;

    assert!(eval.approved(), "{}", eval.reason());
    // Owl-bot check does not apply to release-please; every other rule reports.
    assert_eq!(sink.batches().len(), registry.len() - 1);
}

#[tokio::test]
async fn default_registry_approves_marked_owlbot_pr() {
    let registry = CheckRegistry::from_config(
        &Config::default_config(),
        gapic_repo(),
        Arc::new(RecordingSink::new()),
    )
    .unwrap();

    let eval = registry
        .evaluate(&pr(OWL_BOT, "fix: regenerate client", Some("Copy-Tag: abc\nPiperOrigin-RevId: 1")))
        .await;
    assert!(eval.approved(), "{}", eval.reason());

    let eval = registry
        .evaluate(&pr(OWL_BOT, "fix: regenerate client", Some("Copy-Tag: abc")))
        .await;
    assert_eq!(eval.decision, Decision::Flag);
}

#[tokio::test]
async fn flag_overrides_approval() {
    let config = Config::from_overlay_str(
        r#"
        [[checks.author_title]]
        name = "owlbot-chore"
        author = "gcf-owl-bot[bot]"
        title = "^chore"
        "#,
    )
    .unwrap();
    let registry =
        CheckRegistry::from_config(&config, gapic_repo(), Arc::new(RecordingSink::new())).unwrap();

    let eval = registry
        .evaluate(&pr(OWL_BOT, "chore: update templates", None))
        .await;

    let chore = eval.results.iter().find(|r| r.check == "owlbot-chore").unwrap();
    assert_eq!(chore.decision, Decision::Approve);
    assert_eq!(eval.decision, Decision::Flag);
    assert!(!eval.approved());
}
