use crate::client::consts::{BASE_URL, DEFAULT_TIMEOUT_SECS, REALTIME_PATH, SESSIONS_PATH};
use secrecy::SecretString;
use std::time::Duration;

/// Connection settings for the upstream realtime API.
#[derive(Debug, Clone)]
pub struct Config {
    base_url: String,
    api_key: SecretString,
    timeout: Duration,
}

pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.config.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.config.api_key = SecretString::from(api_key.to_string());
        self
    }

    pub fn with_secret_api_key(mut self, api_key: SecretString) -> Self {
        self.config.api_key = api_key;
        self
    }

    /// Upper bound for each individual upstream call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    // Defaults point at the public API with an empty key.
    pub fn new() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            api_key: SecretString::from(String::new()),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    pub fn api_key(&self) -> &SecretString {
        &self.api_key
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn sessions_url(&self) -> String {
        format!("{}{}", self.base_url, SESSIONS_PATH)
    }

    pub fn realtime_url(&self) -> String {
        format!("{}{}", self.base_url, REALTIME_PATH)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
