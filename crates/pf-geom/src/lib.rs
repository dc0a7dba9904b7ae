//! Geometry transforms: resize, flips, crop and rotation.
//!
//! ## Conventions
//! - Resize uses half-pixel centres: destination index `i` samples source
//!   coordinate `(i + 0.5) * src_len / dst_len - 0.5`, bilinear with
//!   replicated edges.
//! - Flips and crop are exact copies, no interpolation.
//! - Rotation keeps the source shape and fills uncovered pixels through the
//!   caller's border mode (`Constant(0)` by default).

mod mirror;
mod resize;
mod rotate;

use log::debug;
use pf_core::{Backend, BorderMode, Error, Image, ImageView, Result, require_contiguous};

pub fn resize(
    src: &ImageView<'_, u8>,
    height: usize,
    width: usize,
    backend: Backend,
) -> Result<Image<u8>> {
    require_contiguous(src)?;
    if height == 0 || width == 0 {
        return Err(Error::invalid_parameter(format!(
            "resize target must be non-empty, got {height}x{width}"
        )));
    }
    let exec = backend.resolve()?;
    debug!(
        "resize {}x{} -> {height}x{width} on {exec:?}",
        src.height(),
        src.width()
    );

    resize::resize_bilinear_u8(src, height, width, exec)
}

pub fn flip_horizontal(src: &ImageView<'_, u8>, backend: Backend) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    let exec = backend.resolve()?;
    debug!("flip_horizontal {}x{} on {exec:?}", src.height(), src.width());

    Ok(mirror::flip_horizontal_u8(src, samples, exec))
}

pub fn flip_vertical(src: &ImageView<'_, u8>, backend: Backend) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    let exec = backend.resolve()?;
    debug!("flip_vertical {}x{} on {exec:?}", src.height(), src.width());

    Ok(mirror::flip_vertical_u8(src, samples, exec))
}

/// Copies the rectangle `[y, y + height) x [x, x + width)`.
///
/// Zero-sized rectangles are `InvalidParameter`; rectangles reaching past
/// the source are `OutOfBounds`.
pub fn crop(
    src: &ImageView<'_, u8>,
    y: usize,
    x: usize,
    height: usize,
    width: usize,
    backend: Backend,
) -> Result<Image<u8>> {
    require_contiguous(src)?;
    if height == 0 || width == 0 {
        return Err(Error::invalid_parameter(format!(
            "crop size must be non-empty, got {height}x{width}"
        )));
    }
    let sub = src.subview(x, y, width, height)?;
    let exec = backend.resolve()?;
    debug!("crop y={y} x={x} {height}x{width} on {exec:?}");

    Ok(mirror::copy_view_u8(&sub, exec))
}

/// Rotates about the centre by `angle_deg`; positive angles turn the
/// content clockwise on screen (rows grow downward).
pub fn rotate(
    src: &ImageView<'_, u8>,
    angle_deg: f32,
    border: BorderMode<u8>,
    backend: Backend,
) -> Result<Image<u8>> {
    require_contiguous(src)?;
    if !angle_deg.is_finite() {
        return Err(Error::invalid_parameter(format!(
            "angle must be finite, got {angle_deg}"
        )));
    }
    let exec = backend.resolve()?;
    debug!(
        "rotate {angle_deg} deg border={} on {exec:?}",
        border.name()
    );

    Ok(rotate::rotate_bilinear_u8(src, angle_deg, border, exec))
}

/// Default fill for [`rotate`].
pub const ROTATE_BORDER: BorderMode<u8> = BorderMode::Constant(0);

#[cfg(test)]
mod tests {
    use pf_core::{Backend, Channels, Error, Image};

    use crate::{ROTATE_BORDER, crop, flip_horizontal, flip_vertical, resize, rotate};

    fn ramp_5x6() -> Image<u8> {
        let mut data = Vec::with_capacity(30);
        for y in 0..5u8 {
            for x in 0..6u8 {
                data.push(10 * y + x);
            }
        }
        Image::from_vec(6, 5, Channels::Gray, data).expect("valid image")
    }

    #[test]
    fn flip_horizontal_reverses_rows_of_3x3() {
        let img = Image::from_vec(3, 3, Channels::Gray, (1..=9).collect()).expect("valid image");
        let out = flip_horizontal(&img.as_view(), Backend::Single).expect("flip");
        assert_eq!(out.data(), &[3, 2, 1, 6, 5, 4, 9, 8, 7]);
    }

    #[test]
    fn flips_are_involutions() {
        let img = ramp_5x6();
        for backend in [Backend::Single, Backend::Auto] {
            let h = flip_horizontal(&img.as_view(), backend).expect("flip");
            assert_eq!(flip_horizontal(&h.as_view(), backend).expect("flip"), img);
            let v = flip_vertical(&img.as_view(), backend).expect("flip");
            assert_eq!(flip_vertical(&v.as_view(), backend).expect("flip"), img);
        }
    }

    #[test]
    fn crop_reproduces_sub_block() {
        let img = ramp_5x6();
        let out = crop(&img.as_view(), 1, 2, 3, 2, Backend::Single).expect("crop");
        assert_eq!((out.height(), out.width()), (3, 2));
        assert_eq!(out.data(), &[12, 13, 22, 23, 32, 33]);
        assert_eq!(out.get(0, 0, 0), Some(&12));
        assert_eq!(out.get(1, 0, 0), Some(&13));
        assert_eq!(out.get(0, 2, 0), Some(&32));
        assert_eq!(out.get(1, 2, 0), Some(&33));
    }

    #[test]
    fn crop_rejects_bad_rectangles() {
        let img = ramp_5x6();
        let view = img.as_view();
        assert_eq!(crop(&view, 3, 0, 3, 1, Backend::Single), Err(Error::OutOfBounds));
        assert_eq!(crop(&view, 0, 5, 1, 2, Backend::Single), Err(Error::OutOfBounds));
        assert_eq!(crop(&view, 9, 9, 1, 1, Backend::Single), Err(Error::OutOfBounds));
        assert!(matches!(
            crop(&view, 0, 0, 0, 2, Backend::Single),
            Err(Error::InvalidParameter { .. })
        ));
        assert_eq!(
            crop(&view, 0, 0, 5, 6, Backend::Single).expect("full crop"),
            img
        );
    }

    #[test]
    fn resize_shape_and_validation() {
        let img = ramp_5x6();
        let out = resize(&img.as_view(), 10, 3, Backend::Single).expect("resize");
        assert_eq!((out.height(), out.width(), out.channels()), (10, 3, Channels::Gray));
        assert!(matches!(
            resize(&img.as_view(), 0, 3, Backend::Single),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn resize_rejects_unallocatable_targets() {
        let img = Image::new_fill(4, 4, Channels::Rgb, 1u8);
        for (h, w) in [(usize::MAX / 2, 4), (4, usize::MAX), (usize::MAX, usize::MAX)] {
            assert!(matches!(
                resize(&img.as_view(), h, w, Backend::Single),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn rotate_keeps_shape() {
        let img = Image::new_fill(7, 4, Channels::Rgb, 9u8);
        let out = rotate(&img.as_view(), 30.0, ROTATE_BORDER, Backend::Single).expect("rotate");
        assert_eq!((out.width(), out.height(), out.channels()), (7, 4, Channels::Rgb));
        assert!(matches!(
            rotate(&img.as_view(), f32::NAN, ROTATE_BORDER, Backend::Single),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
