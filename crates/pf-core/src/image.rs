use crate::{Error, Result};

/// Interleaved channel layout of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channels {
    Gray,
    Rgb,
}

impl Channels {
    pub fn count(self) -> usize {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
        }
    }

    pub fn from_count(count: usize) -> Result<Self> {
        match count {
            1 => Ok(Self::Gray),
            3 => Ok(Self::Rgb),
            n => Err(Error::invalid_buffer(format!(
                "expected 1 or 3 channels, got {n}"
            ))),
        }
    }
}

/// Owned, contiguous, row-major image with interleaved channels.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    width: usize,
    height: usize,
    channels: Channels,
    data: Vec<T>,
}

impl<T> Image<T> {
    pub fn from_vec(width: usize, height: usize, channels: Channels, data: Vec<T>) -> Result<Self> {
        let expected = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(channels.count()))
            .ok_or_else(|| Error::invalid_buffer("image size overflow"))?;

        if data.len() != expected {
            return Err(Error::invalid_buffer(format!(
                "size mismatch: expected {expected} samples, got {}",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Samples per row (`width * channels`).
    pub fn row_len(&self) -> usize {
        self.width * self.channels.count()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Hands out the sample buffer without copying it.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    pub fn row(&self, y: usize) -> &[T] {
        assert!(y < self.height, "row index out of bounds");
        let len = self.row_len();
        &self.data[y * len..(y + 1) * len]
    }

    pub fn get(&self, x: usize, y: usize, c: usize) -> Option<&T> {
        if x >= self.width || y >= self.height || c >= self.channels.count() {
            return None;
        }
        self.data.get((y * self.width + x) * self.channels.count() + c)
    }

    pub fn as_view(&self) -> ImageView<'_, T> {
        ImageView {
            width: self.width,
            height: self.height,
            channels: self.channels,
            stride: self.row_len(),
            data: &self.data,
        }
    }
}

impl<T: Clone> Image<T> {
    /// Filled image with a caller-chosen shape.
    ///
    /// Fails with `InvalidParameter` when the sample count overflows or the
    /// buffer would exceed `isize::MAX` bytes.
    pub fn try_new_fill(
        width: usize,
        height: usize,
        channels: Channels,
        value: T,
    ) -> Result<Self> {
        let len = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(channels.count()))
            .filter(|&len| {
                len.checked_mul(size_of::<T>())
                    .is_some_and(|bytes| bytes <= isize::MAX as usize)
            })
            .ok_or_else(|| {
                Error::invalid_parameter(format!(
                    "image size overflow: {width}x{height}x{}",
                    channels.count()
                ))
            })?;
        Ok(Self {
            width,
            height,
            channels,
            data: vec![value; len],
        })
    }

    /// Filled image shaped like an existing one.
    ///
    /// # Panics
    /// If the sample count overflows; use [`Image::try_new_fill`] for
    /// untrusted dimensions.
    pub fn new_fill(width: usize, height: usize, channels: Channels, value: T) -> Self {
        let len = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(channels.count()))
            .expect("image size overflow");
        Self {
            width,
            height,
            channels,
            data: vec![value; len],
        }
    }
}

/// Borrowed image with an element row stride.
///
/// `stride` is the distance in samples between adjacent row starts and may
/// exceed `width * channels` for padded buffers and subviews.
#[derive(Debug, Clone, Copy)]
pub struct ImageView<'a, T> {
    width: usize,
    height: usize,
    channels: Channels,
    stride: usize,
    data: &'a [T],
}

impl<'a, T> ImageView<'a, T> {
    pub fn from_slice(
        width: usize,
        height: usize,
        channels: Channels,
        stride: usize,
        data: &'a [T],
    ) -> Result<Self> {
        let row_len = width
            .checked_mul(channels.count())
            .ok_or_else(|| Error::invalid_buffer("row length overflow"))?;
        if stride < row_len {
            return Err(Error::invalid_buffer(format!(
                "stride {stride} shorter than row length {row_len}"
            )));
        }

        let min_len = min_required_len(row_len, height, stride)
            .ok_or_else(|| Error::invalid_buffer("image size overflow"))?;
        if data.len() < min_len {
            return Err(Error::invalid_buffer(format!(
                "size mismatch: expected at least {min_len} samples, got {}",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            channels,
            stride,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn channels(&self) -> Channels {
        self.channels
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn row_len(&self) -> usize {
        self.width * self.channels.count()
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Address of the first sample; used to prove a view aliases its source.
    pub fn as_ptr(&self) -> *const T {
        self.data.as_ptr()
    }

    pub fn row(&self, y: usize) -> &'a [T] {
        assert!(y < self.height, "row index out of bounds");
        let start = y * self.stride;
        &self.data[start..start + self.row_len()]
    }

    pub fn get(&self, x: usize, y: usize, c: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height || c >= self.channels.count() {
            return None;
        }
        let idx = y * self.stride + x * self.channels.count() + c;
        self.data.get(idx)
    }

    /// Returns a sample reference without bounds checks.
    ///
    /// # Safety
    /// Caller must guarantee `x < self.width()`, `y < self.height()` and
    /// `c < self.channels().count()`.
    pub unsafe fn get_unchecked(&self, x: usize, y: usize, c: usize) -> &'a T {
        // SAFETY: Caller guarantees the coordinates are in range. With view
        // invariants this implies `idx` is in bounds of `data`.
        unsafe {
            self.data
                .get_unchecked(y * self.stride + x * self.channels.count() + c)
        }
    }

    pub fn subview(&self, x: usize, y: usize, width: usize, height: usize) -> Result<ImageView<'a, T>> {
        if x > self.width
            || y > self.height
            || width > (self.width - x)
            || height > (self.height - y)
        {
            return Err(Error::OutOfBounds);
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x * self.channels.count()))
            .ok_or(Error::OutOfBounds)?;
        let row_len = width * self.channels.count();
        let min_len = min_required_len(row_len, height, self.stride).ok_or(Error::OutOfBounds)?;
        let tail = self.data.get(start..).ok_or(Error::OutOfBounds)?;

        if tail.len() < min_len {
            return Err(Error::OutOfBounds);
        }

        Ok(ImageView {
            width,
            height,
            channels: self.channels,
            stride: self.stride,
            data: tail,
        })
    }

    pub fn is_contiguous(&self) -> bool {
        self.stride == self.row_len()
    }

    pub fn as_contiguous_slice(&self) -> Option<&'a [T]> {
        if !self.is_contiguous() {
            return None;
        }
        let len = self.row_len() * self.height;
        self.data.get(0..len)
    }
}

fn min_required_len(row_len: usize, height: usize, stride: usize) -> Option<usize> {
    if row_len == 0 || height == 0 {
        return Some(0);
    }

    let rows_before_last = height.checked_sub(1)?;
    let base = rows_before_last.checked_mul(stride)?;
    base.checked_add(row_len)
}
