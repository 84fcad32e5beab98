use std::path::PathBuf;

use thiserror::Error;

/// Why the log document could not be retrieved
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid document URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed log document: {0}")]
    Malformed(#[from] serde_json::Error),
}
