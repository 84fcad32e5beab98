use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;

use crate::error::RetrievalError;
use crate::types::{LogCollection, LogDocument};

/// Where the log document lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations (any case) are fetched, anything
    /// else is a path
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let scheme = trimmed.to_ascii_lowercase();
        if scheme.starts_with("http://") || scheme.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }

    pub fn local_path(&self) -> Option<&Path> {
        match self {
            DataSource::File(path) => Some(path),
            DataSource::Url(_) => None,
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Load the full collection from `source`
pub async fn load_collection(source: &DataSource) -> Result<LogCollection, RetrievalError> {
    let body = match source {
        DataSource::File(path) => read_file(path).await?,
        DataSource::Url(url) => fetch_url(url).await?,
    };

    let collection = parse_document(&body)?;
    if collection.is_empty() {
        debug!(source = %source, "Log document has no entries");
    } else {
        debug!(source = %source, count = collection.len(), "Loaded log document");
    }
    Ok(collection)
}

/// Parse a log document. A missing `logs` field is an empty collection.
pub fn parse_document(body: &str) -> Result<LogCollection, RetrievalError> {
    let doc: LogDocument = serde_json::from_str(body)?;
    Ok(doc.into())
}

async fn read_file(path: &Path) -> Result<String, RetrievalError> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|source| RetrievalError::Io {
            path: path.to_path_buf(),
            source,
        })
}

async fn fetch_url(url: &str) -> Result<String, RetrievalError> {
    let busted = cache_busted_url(url, cache_token())?;
    debug!(url = %busted, "Fetching log document");

    let network = |source: reqwest::Error| RetrievalError::Network {
        url: url.to_string(),
        source,
    };

    let response = reqwest::Client::new()
        .get(busted)
        .header(reqwest::header::CACHE_CONTROL, "no-cache")
        .send()
        .await
        .map_err(network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(RetrievalError::Status {
            url: url.to_string(),
            status,
        });
    }

    response.text().await.map_err(network)
}

fn cache_token() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Append a changing `v` query parameter so caches between us and the
/// document never serve an old copy. Existing query pairs and any fragment
/// are kept.
pub fn cache_busted_url(url: &str, token: u128) -> Result<reqwest::Url, RetrievalError> {
    let mut parsed = reqwest::Url::parse(url).map_err(|e| RetrievalError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    parsed
        .query_pairs_mut()
        .append_pair("v", &token.to_string());
    Ok(parsed)
}
