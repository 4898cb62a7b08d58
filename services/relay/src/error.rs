use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};

/// Every way a connect request can fail.
///
/// Upstream response bodies are kept for logging but never echoed back to the
/// caller; the rendered message only carries the upstream status.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("No SDP provided in the request body.")]
    EmptyBody,

    #[error("Failed to obtain ephemeral token, status code: {status}")]
    UpstreamToken { status: u16, body: String },

    #[error("Ephemeral token is empty or not found in the response.")]
    UpstreamTokenMalformed,

    #[error("OpenAI API SDP exchange error, status code: {status}")]
    UpstreamExchange { status: u16, body: String },

    #[error("An error occurred: {0}")]
    Internal(String),
}

impl RelayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::EmptyBody => StatusCode::BAD_REQUEST,
            RelayError::UpstreamToken { .. }
            | RelayError::UpstreamTokenMalformed
            | RelayError::UpstreamExchange { .. }
            | RelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            [(CONTENT_TYPE, "text/plain; charset=utf-8")],
            self.to_string(),
        )
            .into_response()
    }
}
