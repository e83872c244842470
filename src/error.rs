use thiserror::Error;

/// Failure to retrieve auxiliary repository content.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("{owner}/{repo}: {path} not found")]
    NotFound {
        owner: String,
        repo: String,
        path: String,
    },

    #[error("transport error fetching {path}: {message}")]
    Transport { path: String, message: String },

    #[error("undecodable content for {path}: {message}")]
    Decode { path: String, message: String },
}

/// Infrastructure failure inside a check. A policy mismatch is never one of these.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("malformed content in {path}: {source}")]
    MalformedContent {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unable to build API client: {0}")]
    Client(String),
}
