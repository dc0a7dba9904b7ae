//! Foundational primitives for the PixFoundry image engine.
//!
//! ## Images
//! Samples are `u8`, stored row-major with interleaved channels: grayscale
//! `(H, W)` or RGB `(H, W, 3)`. Views carry an element stride (distance in
//! samples between row starts) so padded buffers and subviews can be
//! described, but engine operations only accept contiguous views and reject
//! everything else with [`Error::InvalidBuffer`] instead of copying.
//!
//! ## Border Modes
//! Windowed operations resolve out-of-range coordinates with reflect-101,
//! replicate, wrap or constant fill. [`map_index`] and [`index_table`] are the
//! only implementation of that mapping.
//!
//! ## Rounding
//! Real-valued results become samples through [`clamp_round_u8`]: round half
//! away from zero, then saturate.
//!
//! ## Backends
//! [`Backend`] is resolved per call into an [`Executor`]. The parallel
//! executor (feature `parallel`, rayon) splits output rows across threads and
//! is bit-identical to the sequential one.

mod backend;
mod border;
mod buffer;
mod error;
mod image;
mod numeric;
mod sample;

pub use backend::{Backend, Executor, parallel_available};
pub use border::{BorderKind, BorderMode, index_table, map_index};
pub use buffer::{BufferInfo, SampleType, require_contiguous, zerocopy_roundtrip};
pub use error::{Error, Result};
pub use image::{Channels, Image, ImageView};
pub use numeric::{clamp_round_u8, lut_u8};
pub use sample::sample_bilinear_f32;
