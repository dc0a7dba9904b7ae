//! Umbrella crate for the PixFoundry workspace.
//!
//! Re-exports the core types and every operation crate, so callers can use
//! one dependency and one import path.

pub use pf_color::*;
pub use pf_core::*;
pub use pf_effects::*;
pub use pf_filter::*;
pub use pf_geom::*;
