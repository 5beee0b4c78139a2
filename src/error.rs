use reqwest::StatusCode;
use thiserror::Error;

/// Failures surfaced by the metadata client.
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{path} -> HTTP {status}")]
    Http { path: String, status: StatusCode },
    #[error("request to {path} failed")]
    Network {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unexpected response from {path}: {reason}")]
    Schema { path: String, reason: String },
}

impl MetadataError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, MetadataError::NotFound(_))
    }

    pub(crate) fn schema(path: &str, reason: impl Into<String>) -> Self {
        MetadataError::Schema {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}
