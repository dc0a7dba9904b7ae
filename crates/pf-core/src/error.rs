use thiserror::Error;

use crate::backend::Backend;
use crate::image::Channels;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Wrong sample type, rank, channel count, size or memory layout.
    #[error("invalid buffer: {reason}")]
    InvalidBuffer { reason: String },

    #[error("invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("unsupported channel layout: {op} expects {expected:?}, got {actual:?}")]
    UnsupportedChannelLayout {
        op: &'static str,
        expected: Channels,
        actual: Channels,
    },

    #[error("out of bounds")]
    OutOfBounds,

    #[error("backend `{0}` is not available in this build")]
    BackendUnavailable(Backend),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_buffer(reason: impl Into<String>) -> Self {
        Self::InvalidBuffer {
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}
