//! Options feature slice.
//!
//! Pure, table-driven handling of rendering features: the [`registry`]
//! enumerates what exists and what a UI may offer, the [`validator`] trims a
//! request down to what the chosen modules and display mode can actually
//! honour. Nothing in this crate performs I/O and nothing here is a hard
//! error — incompatible requests degrade into recorded removals.

pub mod registry;
pub mod validator;

pub use crate::registry::{EnrichedFeature, parse_csv, to_csv};
pub use crate::validator::{TrimOutcome, trim};
