pub const BASE_URL: &str = "https://api.openai.com/v1";
pub const SESSIONS_PATH: &str = "/realtime/sessions";
pub const REALTIME_PATH: &str = "/realtime";
pub const DEFAULT_MODEL: &str = "gpt-4o-realtime-preview-2024-12-17";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const SDP_CONTENT_TYPE: &str = "application/sdp";
