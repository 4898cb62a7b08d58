use crate::config::{Config, RelayMode};
use crate::error::RelayError;
use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;
use openai_realtime::types::{SessionCreateRequest, SessionCreateResponse, Voice};
use openai_realtime::{ClientError, RealtimeQuery};
use secrecy::SecretString;
use std::sync::Arc;
use tracing::{error, info, warn};

/// The two upstream calls a connect request is made of.
///
/// `RelayHandler` only sequences these calls; keeping them behind a trait lets
/// the sequencing be tested with `MockRealtimeUpstream` instead of a network.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RealtimeUpstream: Send + Sync {
    async fn create_session(
        &self,
        request: SessionCreateRequest,
    ) -> Result<SessionCreateResponse, ClientError>;

    async fn exchange_sdp(
        &self,
        bearer: SecretString,
        query: RealtimeQuery,
        offer: Bytes,
    ) -> Result<Bytes, ClientError>;
}

#[async_trait]
impl RealtimeUpstream for openai_realtime::Client {
    async fn create_session(
        &self,
        request: SessionCreateRequest,
    ) -> Result<SessionCreateResponse, ClientError> {
        openai_realtime::Client::create_session(self, &request).await
    }

    async fn exchange_sdp(
        &self,
        bearer: SecretString,
        query: RealtimeQuery,
        offer: Bytes,
    ) -> Result<Bytes, ClientError> {
        openai_realtime::Client::exchange_sdp(self, &bearer, &query, offer).await
    }
}

/// Session parameters applied to every exchange.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub model: String,
    pub voice: Voice,
    pub instructions: String,
}

/// Relays one SDP offer to the realtime API and returns its answer.
pub struct RelayHandler {
    upstream: Arc<dyn RealtimeUpstream>,
    session: SessionSettings,
    mode: RelayMode,
    // Only sent upstream as the exchange bearer in `RelayMode::Direct`.
    api_key: SecretString,
}

impl RelayHandler {
    pub fn new(
        upstream: Arc<dyn RealtimeUpstream>,
        session: SessionSettings,
        mode: RelayMode,
        api_key: SecretString,
    ) -> Self {
        Self {
            upstream,
            session,
            mode,
            api_key,
        }
    }

    pub fn from_config(config: &Config, upstream: Arc<dyn RealtimeUpstream>) -> Self {
        let session = SessionSettings {
            model: config.model.clone(),
            voice: config.voice.clone(),
            instructions: config.instructions.clone(),
        };
        Self::new(upstream, session, config.mode, config.openai_api_key.clone())
    }

    /// Runs the negotiation for one client offer.
    ///
    /// In ephemeral mode a session key is minted first and used as the bearer
    /// of the exchange; in direct mode the long-lived key is used instead. The
    /// returned bytes are the upstream answer, untouched.
    pub async fn connect(&self, offer: Bytes) -> Result<Bytes, RelayError> {
        if offer.is_empty() {
            error!("No SDP provided in the request body.");
            return Err(RelayError::EmptyBody);
        }
        info!("Received SDP from client ({} bytes).", offer.len());

        let bearer = match self.mode {
            RelayMode::Ephemeral => self.mint_ephemeral_key().await?,
            RelayMode::Direct => self.api_key.clone(),
        };

        let query = RealtimeQuery::new(
            &self.session.model,
            &self.session.instructions,
            self.session.voice.clone(),
        );

        let answer = self
            .upstream
            .exchange_sdp(bearer, query, offer)
            .await
            .map_err(|e| match e {
                ClientError::Status { status, body } => {
                    error!(
                        "OpenAI API SDP exchange error, status code: {}, response: {}",
                        status, body
                    );
                    RelayError::UpstreamExchange { status, body }
                }
                other => {
                    error!("SDP exchange failed: {}", other);
                    RelayError::Internal(other.to_string())
                }
            })?;

        info!("SDP exchange completed successfully.");
        Ok(answer)
    }

    async fn mint_ephemeral_key(&self) -> Result<SecretString, RelayError> {
        info!("Requesting ephemeral token.");
        let request = SessionCreateRequest::new(&self.session.model, self.session.voice.clone());

        let response = self.upstream.create_session(request).await.map_err(|e| match e {
            ClientError::Status { status, body } => {
                error!(
                    "Failed to obtain ephemeral token, status code: {}, response: {}",
                    status, body
                );
                RelayError::UpstreamToken { status, body }
            }
            ClientError::Decode(reason) => {
                warn!("Token response could not be decoded: {}", reason);
                RelayError::UpstreamTokenMalformed
            }
            other => {
                error!("Token request failed: {}", other);
                RelayError::Internal(other.to_string())
            }
        })?;

        match response.ephemeral_key() {
            Some(key) => {
                info!("Ephemeral token obtained successfully.");
                Ok(SecretString::from(key.to_string()))
            }
            None => {
                error!("Ephemeral token is empty or not found in the response.");
                Err(RelayError::UpstreamTokenMalformed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openai_realtime::types::ClientSecret;
    use secrecy::ExposeSecret;

    const OFFER: &[u8] = b"v=0\r\no=- 1 2 IN IP4 127.0.0.1\r\ns=-\r\n";
    const ANSWER: &[u8] = b"v=0\r\no=- 9 9 IN IP4 10.0.0.1\r\ns=answer\r\n";

    fn settings() -> SessionSettings {
        SessionSettings {
            model: "gpt-4o-realtime-preview-2024-12-17".to_string(),
            voice: Voice::Ash,
            instructions: "Be helpful.".to_string(),
        }
    }

    fn handler(upstream: MockRealtimeUpstream, mode: RelayMode) -> RelayHandler {
        RelayHandler::new(
            Arc::new(upstream),
            settings(),
            mode,
            SecretString::from("sk-long-lived".to_string()),
        )
    }

    fn session_with_key(value: Option<&str>) -> SessionCreateResponse {
        SessionCreateResponse {
            client_secret: Some(ClientSecret {
                value: value.map(str::to_string),
                expires_at: Some(1734626400),
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_connect_relays_answer_with_ephemeral_key() {
        // --- 1. Arrange ---
        let mut upstream = MockRealtimeUpstream::new();
        upstream
            .expect_create_session()
            .withf(|request| {
                request.model == "gpt-4o-realtime-preview-2024-12-17" && request.voice == Voice::Ash
            })
            .times(1)
            .returning(|_| Ok(session_with_key(Some("ek_123"))));
        upstream
            .expect_exchange_sdp()
            .withf(|bearer, query, offer| {
                bearer.expose_secret() == "ek_123"
                    && query.instructions == "Be helpful."
                    && query.voice == Voice::Ash
                    && offer.as_ref() == OFFER
            })
            .times(1)
            .returning(|_, _, _| Ok(Bytes::from_static(ANSWER)));

        // --- 2. Act ---
        let answer = handler(upstream, RelayMode::Ephemeral)
            .connect(Bytes::from_static(OFFER))
            .await
            .unwrap();

        // --- 3. Assert ---
        assert_eq!(answer.as_ref(), ANSWER);
    }

    #[tokio::test]
    async fn test_empty_offer_makes_no_upstream_call() {
        let mut upstream = MockRealtimeUpstream::new();
        upstream.expect_create_session().never();
        upstream.expect_exchange_sdp().never();

        let err = handler(upstream, RelayMode::Ephemeral)
            .connect(Bytes::new())
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::EmptyBody));
    }

    #[tokio::test]
    async fn test_token_failure_skips_exchange() {
        let mut upstream = MockRealtimeUpstream::new();
        upstream.expect_create_session().times(1).returning(|_| {
            Err(ClientError::Status {
                status: 401,
                body: "invalid api key".to_string(),
            })
        });
        upstream.expect_exchange_sdp().never();

        let err = handler(upstream, RelayMode::Ephemeral)
            .connect(Bytes::from_static(OFFER))
            .await
            .unwrap_err();

        match err {
            RelayError::UpstreamToken { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "invalid api key");
            }
            other => panic!("expected token error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_client_secret_skips_exchange() {
        for response in [
            SessionCreateResponse::default(),
            session_with_key(None),
            session_with_key(Some("")),
        ] {
            let mut upstream = MockRealtimeUpstream::new();
            upstream
                .expect_create_session()
                .times(1)
                .return_once(move |_| Ok(response));
            upstream.expect_exchange_sdp().never();

            let err = handler(upstream, RelayMode::Ephemeral)
                .connect(Bytes::from_static(OFFER))
                .await
                .unwrap_err();

            assert!(matches!(err, RelayError::UpstreamTokenMalformed), "got {err:?}");
        }
    }

    #[tokio::test]
    async fn test_undecodable_token_response_is_malformed() {
        let mut upstream = MockRealtimeUpstream::new();
        upstream
            .expect_create_session()
            .returning(|_| Err(ClientError::Decode("expected value at line 1".to_string())));
        upstream.expect_exchange_sdp().never();

        let err = handler(upstream, RelayMode::Ephemeral)
            .connect(Bytes::from_static(OFFER))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::UpstreamTokenMalformed));
    }

    #[tokio::test]
    async fn test_exchange_failure_reports_status() {
        let mut upstream = MockRealtimeUpstream::new();
        upstream
            .expect_create_session()
            .returning(|_| Ok(session_with_key(Some("ek_123"))));
        upstream.expect_exchange_sdp().times(1).returning(|_, _, _| {
            Err(ClientError::Status {
                status: 503,
                body: "overloaded".to_string(),
            })
        });

        let err = handler(upstream, RelayMode::Ephemeral)
            .connect(Bytes::from_static(OFFER))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::UpstreamExchange { status: 503, .. }));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_direct_mode_uses_long_lived_key() {
        let mut upstream = MockRealtimeUpstream::new();
        upstream.expect_create_session().never();
        upstream
            .expect_exchange_sdp()
            .withf(|bearer, _, _| bearer.expose_secret() == "sk-long-lived")
            .times(1)
            .returning(|_, _, _| Ok(Bytes::from_static(ANSWER)));

        let answer = handler(upstream, RelayMode::Direct)
            .connect(Bytes::from_static(OFFER))
            .await
            .unwrap();

        assert_eq!(answer.as_ref(), ANSWER);
    }

    #[tokio::test]
    async fn test_direct_mode_surfaces_upstream_failure() {
        let mut upstream = MockRealtimeUpstream::new();
        upstream.expect_exchange_sdp().returning(|_, _, _| {
            Err(ClientError::Status {
                status: 400,
                body: "bad sdp".to_string(),
            })
        });

        let err = handler(upstream, RelayMode::Direct)
            .connect(Bytes::from_static(OFFER))
            .await
            .unwrap_err();

        assert_eq!(err.status_code(), axum::http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_transport_failure_is_internal() {
        let mut upstream = MockRealtimeUpstream::new();
        upstream
            .expect_create_session()
            .returning(|_| Ok(session_with_key(Some("ek_123"))));
        upstream
            .expect_exchange_sdp()
            .returning(|_, _, _| Err(ClientError::InvalidUrl("relative URL without a base".into())));

        let err = handler(upstream, RelayMode::Ephemeral)
            .connect(Bytes::from_static(OFFER))
            .await
            .unwrap_err();

        match err {
            RelayError::Internal(message) => assert!(message.contains("relative URL")),
            other => panic!("expected internal error, got {other:?}"),
        }
    }
}
