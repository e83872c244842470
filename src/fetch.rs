//! Retrieval of repository files that a check needs beyond the PR snapshot.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use serde::Deserialize;

use crate::error::{ConfigError, FetchError};

/// Reads a file from a repository's default branch.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, FetchError>;
}

/// Free-function form of [`ContentFetcher::get_file_content`].
pub async fn get_file_content(
    owner: &str,
    repo: &str,
    path: &str,
    client: &dyn ContentFetcher,
) -> Result<String, FetchError> {
    client.get_file_content(owner, repo, path).await
}

/// Shape of `GET /repos/{owner}/{repo}/contents/{path}` for a file.
#[derive(Debug, Deserialize)]
struct ContentsResponse {
    content: String,
    #[serde(default)]
    encoding: String,
}

/// [`ContentFetcher`] over the GitHub REST contents endpoint.
pub struct GitHubContentFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl GitHubContentFetcher {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("auto-approve"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ConfigError::Client(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ConfigError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{owner}/{repo}/contents/{}",
            self.base_url,
            path.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl ContentFetcher for GitHubContentFetcher {
    async fn get_file_content(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
    ) -> Result<String, FetchError> {
        let transport = |message: String| FetchError::Transport {
            path: path.to_string(),
            message,
        };
        let decode = |message: String| FetchError::Decode {
            path: path.to_string(),
            message,
        };

        let url = self.contents_url(owner, repo, path);
        log::debug!("fetching {url}");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport(e.to_string()))?;

        match resp.status() {
            StatusCode::NOT_FOUND => {
                return Err(FetchError::NotFound {
                    owner: owner.to_string(),
                    repo: repo.to_string(),
                    path: path.to_string(),
                });
            }
            status if !status.is_success() => {
                return Err(transport(format!("HTTP {status}")));
            }
            _ => {}
        }

        let body: ContentsResponse = resp.json().await.map_err(|e| decode(e.to_string()))?;
        if !body.encoding.is_empty() && body.encoding != "base64" {
            return Err(decode(format!("unsupported encoding {:?}", body.encoding)));
        }

        // The API wraps base64 at 60 columns.
        let packed: String = body.content.split_whitespace().collect();
        let bytes = STANDARD
            .decode(packed)
            .map_err(|e| decode(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| decode(e.to_string()))
    }
}
