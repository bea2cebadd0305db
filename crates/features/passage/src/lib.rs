//! Passage feature slice.
//!
//! The read path of the whole system: a [`LookupService`] wired over the
//! corpus collaborators resolves references, trims requested features against
//! module capabilities and the display mode, renders HTML and attaches
//! chapter navigation. Everything here is synchronous and deterministic;
//! timeouts and response caching live at the transport edge.

mod error;
mod interleave;
pub mod lookup;
pub mod renderer;
pub mod resolver;

pub use crate::error::PassageError;
pub use crate::lookup::{KeyInfo, LookupService, OrdinalRequest, PassageRequest, Services};
pub use crate::renderer::Renderer;
