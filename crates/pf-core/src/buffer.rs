//! Validation of foreign pixel buffers.
//!
//! A [`BufferInfo`] describes memory owned by someone else (sample type,
//! shape, byte strides). Only 8-bit, C-contiguous `(H, W)` or `(H, W, C)`
//! buffers with `C` in `{1, 3}` are accepted, and accepted buffers are
//! wrapped without copying.

use crate::image::{Channels, Image, ImageView};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleType {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    F32,
    F64,
}

impl SampleType {
    pub fn size(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferInfo<'a> {
    pub data: &'a [u8],
    pub sample_type: SampleType,
    pub shape: Vec<usize>,
    /// Byte distance between neighbours along each axis.
    pub strides: Vec<isize>,
}

impl<'a> BufferInfo<'a> {
    /// Describes `data` as a C-contiguous `u8` buffer of the given shape.
    ///
    /// Fails with `InvalidBuffer` when a stride does not fit in `isize`.
    pub fn c_contiguous(data: &'a [u8], shape: &[usize]) -> Result<Self> {
        let mut strides = vec![0isize; shape.len()];
        let mut acc = 1isize;
        for (stride, &dim) in strides.iter_mut().zip(shape).rev() {
            *stride = acc;
            acc = isize::try_from(dim)
                .ok()
                .and_then(|dim| acc.checked_mul(dim))
                .ok_or_else(|| {
                    Error::invalid_buffer(format!("shape {shape:?} overflows byte strides"))
                })?;
        }
        Ok(Self {
            data,
            sample_type: SampleType::U8,
            shape: shape.to_vec(),
            strides,
        })
    }
}

impl<'a> ImageView<'a, u8> {
    pub fn from_buffer(info: &BufferInfo<'a>) -> Result<Self> {
        if info.sample_type != SampleType::U8 {
            return Err(Error::invalid_buffer(format!(
                "expected u8 samples, got {:?}",
                info.sample_type
            )));
        }

        let rank = info.shape.len();
        if rank != 2 && rank != 3 {
            return Err(Error::invalid_buffer(format!(
                "expected HxW or HxWxC buffer, got rank {rank}"
            )));
        }
        if info.strides.len() != rank {
            return Err(Error::invalid_buffer("strides do not match shape rank"));
        }

        let height = info.shape[0];
        let width = info.shape[1];
        let count = if rank == 3 { info.shape[2] } else { 1 };
        let channels = Channels::from_count(count)?;
        if height == 0 || width == 0 {
            return Err(Error::invalid_buffer(format!(
                "expected non-empty image, got {height}x{width}"
            )));
        }

        let row_len = width
            .checked_mul(count)
            .filter(|&len| len <= isize::MAX as usize)
            .ok_or_else(|| {
                Error::invalid_buffer(format!(
                    "row of {width} x {count} samples overflows"
                ))
            })?;
        let contiguous = match rank {
            2 => info.strides[0] == row_len as isize && info.strides[1] == 1,
            _ => {
                info.strides[0] == row_len as isize
                    && info.strides[1] == count as isize
                    && info.strides[2] == 1
            }
        };
        if !contiguous {
            return Err(Error::invalid_buffer(format!(
                "expected C-contiguous buffer, got strides {:?} for shape {:?}",
                info.strides, info.shape
            )));
        }

        ImageView::from_slice(width, height, channels, row_len, info.data)
    }
}

impl Image<u8> {
    /// Describes this image as a foreign buffer borrowing its storage.
    pub fn buffer_info(&self) -> Result<BufferInfo<'_>> {
        let shape = match self.channels() {
            Channels::Gray => vec![self.height(), self.width()],
            Channels::Rgb => vec![self.height(), self.width(), 3],
        };
        BufferInfo::c_contiguous(self.data(), &shape)
    }
}

/// Returns the contiguous samples backing `src`, rejecting empty and
/// strided views.
pub fn require_contiguous<'a>(src: &ImageView<'a, u8>) -> Result<&'a [u8]> {
    if src.is_empty() {
        return Err(Error::invalid_buffer(format!(
            "expected non-empty image, got {}x{}",
            src.height(),
            src.width()
        )));
    }
    src.as_contiguous_slice().ok_or_else(|| {
        Error::invalid_buffer(format!(
            "expected contiguous rows, got stride {} for row length {}",
            src.stride(),
            src.row_len()
        ))
    })
}

/// Identity round-trip through the adapter.
///
/// The returned view aliases `info.data`; nothing is copied.
pub fn zerocopy_roundtrip<'a>(info: &BufferInfo<'a>) -> Result<ImageView<'a, u8>> {
    let view = ImageView::from_buffer(info)?;
    require_contiguous(&view)?;
    Ok(view)
}
