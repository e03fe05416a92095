use std::path::PathBuf;
use std::time::Duration;

#[derive(thiserror::Error, Debug)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("rendering {url} did not finish within {timeout:?}")]
    RenderTimeout { url: String, timeout: Duration },
    #[error("browser failed on {url}: {reason}")]
    RenderFailed { url: String, reason: String },
    #[error("unknown filter `{0}`")]
    UnknownFilter(String),
    #[error("no product id found in {0}")]
    PatternNotMatched(String),
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("unexpected response from {url}: {source}")]
    UnexpectedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("response from {0} has no product image")]
    MissingImage(String),
    #[error("failed to export to {}: {source}", path.display())]
    ExportFailed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl ScrapeError {
    pub(crate) fn fetch(url: &str, source: reqwest::Error) -> Self {
        Self::FetchFailed {
            url: url.to_string(),
            source,
        }
    }

    pub(crate) fn export(path: impl Into<PathBuf>, source: impl Into<csv::Error>) -> Self {
        Self::ExportFailed {
            path: path.into(),
            source: source.into(),
        }
    }
}
