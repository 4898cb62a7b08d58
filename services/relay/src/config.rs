use openai_realtime::Url;
use openai_realtime::types::Voice;
use secrecy::SecretString;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::Level;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8813";
pub const DEFAULT_VOICE: &str = "ash";
pub const DEFAULT_INSTRUCTIONS: &str = "You are helpful and have some tools installed.\n\nIn the tools you have the ability to control a robot hand.";
pub const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_OFFER_BYTES: usize = 64 * 1024;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// How the relay authenticates the SDP exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayMode {
    /// Mint a per-request ephemeral key and use it for the exchange.
    Ephemeral,
    /// Send the long-lived key straight to the exchange endpoint.
    Direct,
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub mode: RelayMode,
    pub openai_api_key: SecretString,
    pub base_url: String,
    pub model: String,
    pub voice: Voice,
    pub instructions: String,
    pub upstream_timeout: Duration,
    pub max_offer_bytes: usize,
    /// `None` allows any origin.
    pub cors_allowed_origins: Option<Vec<String>>,
    pub log_level: Level,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// This function will look for a `.env` file in the current directory
    /// and load the following variables:
    ///
    /// *   `OPENAI_API_KEY`: The long-lived secret key. Required.
    /// *   `BIND_ADDRESS`: The address and port to bind the server to. Defaults to "0.0.0.0:8813".
    /// *   `RELAY_MODE`: "ephemeral" or "direct". Defaults to "ephemeral".
    /// *   `OPENAI_BASE_URL`: (Optional) Upstream API base. Defaults to "https://api.openai.com/v1".
    /// *   `REALTIME_MODEL`: (Optional) Realtime model identifier.
    /// *   `REALTIME_VOICE`: (Optional) Voice identifier. Defaults to "ash".
    /// *   `REALTIME_INSTRUCTIONS`: (Optional) Instruction text sent with every exchange.
    /// *   `UPSTREAM_TIMEOUT_SECS`: (Optional) Timeout per upstream call. Defaults to 10.
    /// *   `MAX_OFFER_BYTES`: (Optional) Largest accepted SDP offer. Defaults to 65536.
    /// *   `CORS_ALLOWED_ORIGINS`: (Optional) Comma separated origins. Any origin when unset.
    /// *   `RUST_LOG`: (Optional) The logging level. Defaults to "INFO".
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let openai_api_key = var("OPENAI_API_KEY")
            .map(SecretString::from)
            .ok_or_else(|| ConfigError::MissingVar("OPENAI_API_KEY".to_string()))?;

        let bind_address_str =
            var("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let mode = match var("RELAY_MODE").map(|m| m.to_lowercase()).as_deref() {
            None | Some("ephemeral") => RelayMode::Ephemeral,
            Some("direct") => RelayMode::Direct,
            Some(other) => {
                return Err(ConfigError::InvalidValue(
                    "RELAY_MODE".to_string(),
                    format!("'{}' is not one of 'ephemeral', 'direct'", other),
                ));
            }
        };

        let base_url = var("OPENAI_BASE_URL")
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string())
            .trim_end_matches('/')
            .to_string();
        match Url::parse(&base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            Ok(url) => {
                return Err(ConfigError::InvalidValue(
                    "OPENAI_BASE_URL".to_string(),
                    format!(
                        "'{}' must be an http(s) URL with a host, got scheme '{}'",
                        base_url,
                        url.scheme()
                    ),
                ));
            }
            Err(e) => {
                return Err(ConfigError::InvalidValue(
                    "OPENAI_BASE_URL".to_string(),
                    format!("'{}': {}", base_url, e),
                ));
            }
        }

        let model = var("REALTIME_MODEL").unwrap_or_else(|| openai_realtime::DEFAULT_MODEL.to_string());

        let voice_str = var("REALTIME_VOICE").unwrap_or_else(|| DEFAULT_VOICE.to_string());
        let Ok(voice) = voice_str.parse::<Voice>();

        let instructions =
            var("REALTIME_INSTRUCTIONS").unwrap_or_else(|| DEFAULT_INSTRUCTIONS.to_string());

        let upstream_timeout = match var("UPSTREAM_TIMEOUT_SECS") {
            Some(s) => {
                let secs = s.parse::<u64>().ok().filter(|secs| *secs > 0).ok_or_else(|| {
                    ConfigError::InvalidValue(
                        "UPSTREAM_TIMEOUT_SECS".to_string(),
                        format!("'{}' is not a positive number of seconds", s),
                    )
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        let max_offer_bytes = match var("MAX_OFFER_BYTES") {
            Some(s) => s.parse::<usize>().map_err(|e| {
                ConfigError::InvalidValue("MAX_OFFER_BYTES".to_string(), e.to_string())
            })?,
            None => DEFAULT_MAX_OFFER_BYTES,
        };

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS").map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            mode,
            openai_api_key,
            base_url,
            model,
            voice,
            instructions,
            upstream_timeout,
            max_offer_bytes,
            cors_allowed_origins,
            log_level,
        })
    }

    /// Settings for the upstream HTTP client.
    pub fn upstream_config(&self) -> openai_realtime::Config {
        openai_realtime::Config::builder()
            .with_base_url(&self.base_url)
            .with_secret_api_key(self.openai_api_key.clone())
            .with_timeout(self.upstream_timeout)
            .build()
    }
}
