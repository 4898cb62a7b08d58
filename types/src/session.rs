use crate::voice::Voice;

/// Body of `POST /realtime/sessions`.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SessionCreateRequest {
    /// The realtime model the session is issued for.
    pub model: String,

    /// The voice the model uses to respond.
    pub voice: Voice,
}

impl SessionCreateRequest {
    pub fn new(model: &str, voice: Voice) -> Self {
        Self {
            model: model.to_string(),
            voice,
        }
    }
}

/// Response of `POST /realtime/sessions`.
///
/// Only the fields the relay reads are modelled. Everything is optional so that
/// a successful response with a missing secret can be told apart from a body
/// that is not JSON at all.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct SessionCreateResponse {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default)]
    pub model: Option<String>,

    #[serde(default)]
    pub expires_at: Option<i64>,

    #[serde(default)]
    pub client_secret: Option<ClientSecret>,
}

/// Ephemeral key minted for a single session.
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct ClientSecret {
    #[serde(default)]
    pub value: Option<String>,

    /// Unix timestamp after which the key is no longer accepted.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl SessionCreateResponse {
    /// Returns `client_secret.value` if it is present and non-empty.
    pub fn ephemeral_key(&self) -> Option<&str> {
        self.client_secret
            .as_ref()
            .and_then(|secret| secret.value.as_deref())
            .filter(|value| !value.is_empty())
    }
}
