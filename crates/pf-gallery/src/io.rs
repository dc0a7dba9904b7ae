use std::path::Path;

use anyhow::{Context, Result};
use image::{ColorType, DynamicImage, GrayImage, ImageFormat, RgbImage};
use pixfoundry::{Channels, Image, ImageView};

/// Decodes an image file into a gray or RGB engine image.
///
/// Single-channel files (with or without alpha) become gray; everything
/// else becomes RGB. Alpha is dropped.
pub fn load_image(path: &Path) -> Result<Image<u8>> {
    let decoded =
        image::open(path).with_context(|| format!("opening input image {}", path.display()))?;
    from_dynamic(decoded).with_context(|| format!("converting {}", path.display()))
}

pub fn from_dynamic(decoded: DynamicImage) -> Result<Image<u8>> {
    let is_gray = matches!(
        decoded.color(),
        ColorType::L8 | ColorType::La8 | ColorType::L16 | ColorType::La16
    );

    let (width, height, channels, data) = if is_gray {
        let luma = decoded.to_luma8();
        let (w, h) = luma.dimensions();
        (w, h, Channels::Gray, luma.into_raw())
    } else {
        let rgb = decoded.to_rgb8();
        let (w, h) = rgb.dimensions();
        (w, h, Channels::Rgb, rgb.into_raw())
    };

    Image::from_vec(width as usize, height as usize, channels, data)
        .context("constructing engine image from decoded pixels")
}

/// Encodes `view`; the format follows the file extension, PNG when unknown.
pub fn save_image(path: &Path, view: &ImageView<'_, u8>) -> Result<()> {
    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    to_dynamic(view)?
        .save_with_format(path, format)
        .with_context(|| format!("saving image {}", path.display()))
}

pub fn to_dynamic(view: &ImageView<'_, u8>) -> Result<DynamicImage> {
    let mut data = Vec::with_capacity(view.row_len() * view.height());
    for y in 0..view.height() {
        data.extend_from_slice(view.row(y));
    }
    let (w, h) = (view.width() as u32, view.height() as u32);

    let dynamic = match view.channels() {
        Channels::Gray => GrayImage::from_raw(w, h, data)
            .map(DynamicImage::ImageLuma8)
            .context("constructing GrayImage from raw bytes")?,
        Channels::Rgb => RgbImage::from_raw(w, h, data)
            .map(DynamicImage::ImageRgb8)
            .context("constructing RgbImage from raw bytes")?,
    };
    Ok(dynamic)
}
