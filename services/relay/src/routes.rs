use crate::config::Config;
use crate::error::RelayError;
use crate::relay::RelayHandler;
use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, header::CONTENT_TYPE},
    response::IntoResponse,
    routing::{get, post},
};
use bytes::Bytes;
use openai_realtime::SDP_CONTENT_TYPE;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

pub const HOME_MESSAGE: &str = "Realtime relay is running!";

/// Liveness probe. Never touches the upstream API.
async fn home() -> &'static str {
    HOME_MESSAGE
}

/// Accepts a raw SDP offer and answers with the upstream SDP answer.
async fn rtc_connect(
    State(handler): State<Arc<RelayHandler>>,
    body: Bytes,
) -> Result<impl IntoResponse, RelayError> {
    let answer = handler.connect(body).await?;
    Ok(([(CONTENT_TYPE, SDP_CONTENT_TYPE)], answer))
}

/// Builds the CORS policy.
///
/// Without an explicit origin list every origin is allowed, which is only
/// appropriate for local development.
pub fn cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    let origin = match allowed_origins {
        Some(origins) if !origins.iter().any(|o| o == "*") => {
            let values = origins
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", origin);
                        None
                    }
                })
                .collect::<Vec<_>>();
            info!("CORS restricted to {} origin(s)", values.len());
            AllowOrigin::list(values)
        }
        _ => {
            warn!("CORS allows any origin; set CORS_ALLOWED_ORIGINS outside development");
            AllowOrigin::from(Any)
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the application router.
pub fn build_router(handler: Arc<RelayHandler>, config: &Config) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/api/rtc-connect", post(rtc_connect))
        .layer(DefaultBodyLimit::max(config.max_offer_bytes))
        .with_state(handler)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(config.cors_allowed_origins.as_deref()))
}
