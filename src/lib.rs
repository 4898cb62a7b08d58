mod client;

pub use openai_realtime_types as types;
pub use reqwest::Url;
pub use client::{
    build_realtime_url, Client, ClientError, Config, ConfigBuilder, RealtimeQuery, DEFAULT_MODEL,
    SDP_CONTENT_TYPE,
};
