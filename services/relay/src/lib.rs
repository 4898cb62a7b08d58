pub mod config;
pub mod error;
pub mod relay;
pub mod routes;

use crate::config::Config;
use crate::relay::RelayHandler;
use axum::Router;
use openai_realtime::ClientError;
use std::sync::Arc;

/// Wires the upstream client, the relay handler and the router from `config`.
pub fn build_app(config: &Config) -> Result<Router, ClientError> {
    let client = openai_realtime::Client::new(config.upstream_config())?;
    let handler = Arc::new(RelayHandler::from_config(config, Arc::new(client)));
    Ok(routes::build_router(handler, config))
}
