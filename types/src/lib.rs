pub mod session;
pub mod voice;

pub use session::{ClientSecret, SessionCreateRequest, SessionCreateResponse};
pub use voice::Voice;
