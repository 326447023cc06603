use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Failed to serialize spans: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Span delivery failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Unexpected response status {status} from {endpoint}")]
    UnexpectedStatus { status: u16, endpoint: String },
}

impl ExportError {
    /// Status code reported by the endpoint, if the request got that far
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the failure was a delivery timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}
