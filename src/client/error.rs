/// Failures of a single upstream call.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("invalid upstream URL: {0}")]
    InvalidUrl(String),

    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },

    #[error("failed to decode upstream response: {0}")]
    Decode(String),
}

impl ClientError {
    pub fn is_timeout(&self) -> bool {
        match self {
            ClientError::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
