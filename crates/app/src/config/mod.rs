//! Host configuration
//!
//! Settings are read from CLI flags, falling back to the environment and a
//! `.env` file.

pub(crate) mod api;
pub(crate) mod observability;
pub(crate) mod session;

pub use api::ApiConfig;
pub use observability::{LogFormat, LoggingConfig};
pub use session::SessionConfig;

/// Load `.env` into the process environment if present.
pub fn load_dotenv() {
    // Missing file is fine
    _ = dotenvy::dotenv();
}
