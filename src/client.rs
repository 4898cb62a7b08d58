use crate::types::{SessionCreateRequest, SessionCreateResponse};
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};

mod config;
mod consts;
mod error;
mod utils;

pub use config::{Config, ConfigBuilder};
pub use consts::{DEFAULT_MODEL, SDP_CONTENT_TYPE};
pub use error::ClientError;
pub use utils::{build_realtime_url, RealtimeQuery};

// HTTP client for the two realtime negotiation endpoints. The inner
// `reqwest::Client` pools connections and is cheap to clone.
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    config: Config,
}

impl Client {
    pub fn new(config: Config) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(ClientError::Build)?;
        Ok(Self { http, config })
    }

    /// Mints a short-lived session key using the long-lived API key.
    pub async fn create_session(
        &self,
        request: &SessionCreateRequest,
    ) -> Result<SessionCreateResponse, ClientError> {
        let url = self.config.sessions_url();
        tracing::debug!("creating realtime session at {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(self.config.api_key().expose_secret())
            .json(request)
            .send()
            .await?;

        let body = ensure_success(response).await?;
        serde_json::from_slice::<SessionCreateResponse>(&body)
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Posts an SDP offer and returns the raw SDP answer.
    ///
    /// `bearer` is either an ephemeral key from [`Client::create_session`] or the
    /// long-lived API key when the relay runs in direct mode.
    pub async fn exchange_sdp(
        &self,
        bearer: &SecretString,
        query: &RealtimeQuery,
        offer: Bytes,
    ) -> Result<Bytes, ClientError> {
        let url = build_realtime_url(&self.config.realtime_url(), query)?;
        tracing::info!("sending SDP offer to {}", url);

        let response = self
            .http
            .post(url)
            .bearer_auth(bearer.expose_secret())
            .header(CONTENT_TYPE, SDP_CONTENT_TYPE)
            .body(offer)
            .send()
            .await?;

        ensure_success(response).await
    }
}

// Reads the whole body, turning non-2xx responses into `ClientError::Status`.
async fn ensure_success(response: reqwest::Response) -> Result<Bytes, ClientError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.bytes().await?)
}
