use crate::client::error::ClientError;
use crate::types::Voice;
use reqwest::Url;

/// Query parameters sent alongside an SDP offer.
#[derive(Debug, Clone, PartialEq)]
pub struct RealtimeQuery {
    pub model: String,
    pub instructions: String,
    pub voice: Voice,
}

impl RealtimeQuery {
    pub fn new(model: &str, instructions: &str, voice: Voice) -> Self {
        Self {
            model: model.to_string(),
            instructions: instructions.to_string(),
            voice,
        }
    }
}

/// Builds `<base>?model=..&instructions=..&voice=..` with every value percent-encoded.
pub fn build_realtime_url(base: &str, query: &RealtimeQuery) -> Result<Url, ClientError> {
    Url::parse_with_params(
        base,
        &[
            ("model", query.model.as_str()),
            ("instructions", query.instructions.as_str()),
            ("voice", query.voice.as_str()),
        ],
    )
    .map_err(|e| ClientError::InvalidUrl(format!("{base}: {e}")))
}
