//! Kernel utilities shared across slices.
//! Keep this crate lightweight; it provides config loading, the shared server
//! state and the HTTP error mapping that every handler relies on.
//!
//! ## Config loading
//! ```rust,ignore
//! use lectio_kernel::config::load_config;
//! let cfg: serde_json::Value = load_config::<serde_json::Value>(Some("server")).unwrap();
//! ```

pub mod config;
pub mod prelude;
pub mod server;

pub use lectio_domain as domain;
