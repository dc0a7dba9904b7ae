//! Per-pixel color transforms on 8-bit grayscale and RGB images.
//!
//! Every output sample depends only on the input sample(s) of the same
//! pixel. Value-only transforms are applied through a 256-entry lookup table
//! built once per call.

use log::debug;
use pf_core::{
    Backend, Channels, Error, Executor, Image, ImageView, Result, clamp_round_u8, lut_u8,
    require_contiguous,
};

const LUMA_R: f32 = 0.299;
const LUMA_G: f32 = 0.587;
const LUMA_B: f32 = 0.114;

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Converts RGB to single-channel luma; grayscale input is copied unchanged.
pub fn to_grayscale(src: &ImageView<'_, u8>, backend: Backend) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    let exec = backend.resolve()?;
    debug!(
        "to_grayscale {}x{} {:?} on {exec:?}",
        src.width(),
        src.height(),
        src.channels()
    );

    if src.channels() == Channels::Gray {
        return Ok(apply_lut(src, samples, &lut_u8(|v| v), exec));
    }

    let width = src.width();
    let mut dst = Image::new_fill(width, src.height(), Channels::Gray, 0u8);
    exec.fill_rows(dst.data_mut(), width, |y, row| {
        let src_row = &samples[y * width * 3..(y + 1) * width * 3];
        for (out, px) in row.iter_mut().zip(src_row.chunks_exact(3)) {
            *out = luma(px[0], px[1], px[2]);
        }
    });
    Ok(dst)
}

/// `255 - v` on every sample.
pub fn invert(src: &ImageView<'_, u8>, backend: Backend) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    let exec = backend.resolve()?;
    debug!("invert {}x{} on {exec:?}", src.width(), src.height());

    Ok(apply_lut(src, samples, &lut_u8(|v| 255 - v), exec))
}

/// Fixed sepia color-mixing matrix; RGB input only.
pub fn sepia(src: &ImageView<'_, u8>, backend: Backend) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    if src.channels() != Channels::Rgb {
        return Err(Error::UnsupportedChannelLayout {
            op: "sepia",
            expected: Channels::Rgb,
            actual: src.channels(),
        });
    }
    let exec = backend.resolve()?;
    debug!("sepia {}x{} on {exec:?}", src.width(), src.height());

    let row_len = src.row_len();
    let mut dst = Image::new_fill(src.width(), src.height(), Channels::Rgb, 0u8);
    exec.fill_rows(dst.data_mut(), row_len, |y, row| {
        let src_row = &samples[y * row_len..(y + 1) * row_len];
        for (out, px) in row.chunks_exact_mut(3).zip(src_row.chunks_exact(3)) {
            let r = px[0] as f32;
            let g = px[1] as f32;
            let b = px[2] as f32;
            for (o, m) in out.iter_mut().zip(&SEPIA) {
                *o = clamp_round_u8(m[0] * r + m[1] * g + m[2] * b);
            }
        }
    });
    Ok(dst)
}

/// `alpha * v + beta`, rounded and saturated.
pub fn adjust_brightness_contrast(
    src: &ImageView<'_, u8>,
    alpha: f32,
    beta: f32,
    backend: Backend,
) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    let exec = backend.resolve()?;
    debug!("brightness/contrast alpha={alpha} beta={beta} on {exec:?}");

    let lut = lut_u8(|v| clamp_round_u8(alpha * v as f32 + beta));
    Ok(apply_lut(src, samples, &lut, exec))
}

/// `255 * (v / 255)^gamma`, rounded and saturated. `gamma` must be positive.
pub fn gamma_correct(src: &ImageView<'_, u8>, gamma: f32, backend: Backend) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    if !(gamma > 0.0) {
        return Err(Error::invalid_parameter(format!(
            "gamma must be > 0, got {gamma}"
        )));
    }
    let exec = backend.resolve()?;
    debug!("gamma_correct gamma={gamma} on {exec:?}");

    let lut = lut_u8(|v| clamp_round_u8((v as f32 / 255.0).powf(gamma) * 255.0));
    Ok(apply_lut(src, samples, &lut, exec))
}

#[inline]
pub(crate) fn luma(r: u8, g: u8, b: u8) -> u8 {
    clamp_round_u8(LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32)
}

fn apply_lut(
    src: &ImageView<'_, u8>,
    samples: &[u8],
    lut: &[u8; 256],
    exec: Executor,
) -> Image<u8> {
    let row_len = src.row_len();
    let mut dst = Image::new_fill(src.width(), src.height(), src.channels(), 0u8);
    exec.fill_rows(dst.data_mut(), row_len, |y, row| {
        let src_row = &samples[y * row_len..(y + 1) * row_len];
        for (out, &v) in row.iter_mut().zip(src_row) {
            *out = lut[v as usize];
        }
    });
    dst
}
