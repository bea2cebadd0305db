//! Shared server plumbing: application state, system routes and the HTTP
//! error mapping.

mod error;
mod health;
pub mod router;
mod state;

pub use error::{ApiError, ErrorBody};
pub use state::{ApiState, ApiStateBuilder, ApiStateError};
