//! Convenience re-exports for server crates.

pub use crate::config::load_config;
pub use crate::server::{ApiError, ApiState, ApiStateBuilder};
pub use lectio_domain::config::ApiConfig;
