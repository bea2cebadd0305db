//! Facade crate for Lectio features and shared modules.
//! Re-exports domain/kernel primitives and aggregates feature initialization.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Call [`init`] to wire the corpus and the shared API state; extend as new
//!   slices appear.

pub use lectio_corpus as corpus;
pub use lectio_domain as domain;
pub use lectio_kernel as kernel;

use lectio_domain::config::ApiConfig;
use lectio_kernel::server::ApiState;

pub mod server {
    pub mod router {
        pub use lectio_kernel::server::router::system_router;
    }
}

/// Feature registry for runtime introspection.
pub mod features {
    pub use lectio_options as options;
    pub use lectio_passage as passage;

    /// Build-time enabled features.
    pub const ENABLED: &[&str] = &["options", "passage"];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Initialize all enabled features for server mode: seeds the development
/// corpus and builds the shared API state.
///
/// # Errors
/// Returns an error if corpus seeding or state construction fails.
pub fn init(config: &ApiConfig) -> Result<ApiState, Box<dyn std::error::Error>> {
    let corpus = corpus::sample::try_sample_corpus()?;
    let state = ApiState::builder().config(config.clone()).corpus(corpus).build()?;
    Ok(state)
}
