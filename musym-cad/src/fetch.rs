//! Remote label fetching
//!
//! [`LabelSource`] abstracts the HTTP GET of one label document so that
//! corpus loaders can be exercised offline. [`fetch_labels`] runs the
//! per-piece requests through a bounded buffered stream and applies the
//! configured [`FetchPolicy`].

use crate::annotations::parse_label_document;
use crate::config::{FetchConfig, FetchPolicy};
use crate::error::{LoadError, LoadResult};
use crate::types::{AnnotationIndex, Cadence, FetchFailure, PieceKey};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use thiserror::Error;

const USER_AGENT: &str = concat!("musym-cad/", env!("CARGO_PKG_VERSION"));

/// Label source errors
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("HTTP error {0}: {1}")]
    HttpError(u16, String),
}

/// Retrieves label documents by URL
#[async_trait]
pub trait LabelSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, SourceError>;
}

/// Label source over HTTP
pub struct HttpLabelSource {
    http_client: reqwest::Client,
}

impl HttpLabelSource {
    pub fn new(config: &FetchConfig) -> LoadResult<Self> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout())
            .build()
            .map_err(|e| LoadError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http_client })
    }
}

#[async_trait]
impl LabelSource for HttpLabelSource {
    async fn fetch(&self, url: &str) -> Result<String, SourceError> {
        tracing::debug!(url = %url, "Fetching label document");

        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(url.to_string())
            } else {
                SourceError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            return Err(SourceError::HttpError(status.as_u16(), url.to_string()));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(url.to_string())
            } else {
                SourceError::NetworkError(e.to_string())
            }
        })
    }
}

/// Location of one piece's label document
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRequest {
    /// Remote file name, used to name the document in errors
    pub remote_name: String,
    pub url: String,
}

impl LabelRequest {
    pub fn new(base_url: &str, remote_name: impl Into<String>) -> Self {
        let remote_name = remote_name.into();
        let url = join_url(base_url, &remote_name);
        Self { remote_name, url }
    }
}

/// Append a file name to a base URL, inserting a '/' if needed
pub fn join_url(base_url: &str, file_name: &str) -> String {
    if base_url.ends_with('/') {
        format!("{}{}", base_url, file_name)
    } else {
        format!("{}/{}", base_url, file_name)
    }
}

/// Fetch and parse the label document of every piece
///
/// `locate` maps a piece key to its document; a key it cannot map counts as
/// a failure of that piece, as does a document that does not parse. Every
/// failure is reported as [`LoadError::Fetch`] carrying the piece key. Results keep key order. Failing pieces are
/// handled by `config.policy`: `Abort` returns the first error in key order,
/// `Skip` omits the piece and reports it in the returned failure list,
/// `Defer` fetches every piece and then fails with all failures at once.
pub async fn fetch_labels<F>(
    source: &dyn LabelSource,
    keys: Vec<PieceKey>,
    locate: F,
    config: &FetchConfig,
    include_type: bool,
) -> LoadResult<(AnnotationIndex, Vec<FetchFailure>)>
where
    F: Fn(&str) -> LoadResult<LabelRequest> + Sync,
{
    let total = keys.len();
    let locate = &locate;
    let mut outcomes = stream::iter(keys)
        .map(|key| async move {
            let result = match locate(key.as_str()) {
                Ok(request) => fetch_one(source, key.as_str(), &request, include_type).await,
                Err(e) => Err(LoadError::Fetch {
                    key: key.clone(),
                    reason: e.to_string(),
                }),
            };
            (key, result)
        })
        .buffered(config.concurrency.max(1));

    let mut annotations = AnnotationIndex::new();
    let mut failures = Vec::new();

    while let Some((key, result)) = outcomes.next().await {
        match result {
            Ok(cadences) => {
                annotations.insert(key, cadences);
            }
            Err(e) => match config.policy {
                FetchPolicy::Abort => return Err(e),
                FetchPolicy::Skip | FetchPolicy::Defer => {
                    tracing::warn!(key = %key, error = %e, "Piece annotations unavailable");
                    failures.push(FetchFailure {
                        key,
                        reason: e.to_string(),
                    });
                }
            },
        }
    }

    tracing::info!(
        requested = total,
        fetched = annotations.len(),
        failed = failures.len(),
        "Remote label fetch complete"
    );

    if config.policy == FetchPolicy::Defer && !failures.is_empty() {
        return Err(LoadError::FetchBatch(failures));
    }
    Ok((annotations, failures))
}

async fn fetch_one(
    source: &dyn LabelSource,
    key: &str,
    request: &LabelRequest,
    include_type: bool,
) -> LoadResult<Vec<Cadence>> {
    let text = source.fetch(&request.url).await.map_err(|e| LoadError::Fetch {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    parse_label_document(&text, &request.remote_name, include_type).map_err(|e| LoadError::Fetch {
        key: key.to_string(),
        reason: e.to_string(),
    })
}
