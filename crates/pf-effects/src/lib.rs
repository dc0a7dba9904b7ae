//! Composite stylisation effects built on the color and filter crates.
//!
//! Neighbourhood reads use replicated edges. Multi-stage effects resolve the
//! backend once and run every stage on that executor.

use log::debug;
use pf_color::to_grayscale;
use pf_core::{
    Backend, BorderMode, Error, Executor, Image, ImageView, Result, clamp_round_u8, index_table,
    lut_u8, require_contiguous,
};
use pf_filter::{FilterOptions, gaussian_filter};

const EMBOSS: [[f32; 3]; 3] = [[-2.0, -1.0, 0.0], [-1.0, 1.0, 1.0], [0.0, 1.0, 2.0]];
const EMBOSS_BIAS: f32 = 128.0;

const SOBEL_X: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

const CARTOON_LEVELS: u8 = 16;
const CARTOON_EDGE_COLOR: u8 = 20;

/// Unsharp mask with a 4-neighbour residual:
/// `(1 + 4a) * c - a * (up + down + left + right)`.
///
/// `amount <= 0` returns an unchanged copy.
pub fn sharpen(src: &ImageView<'_, u8>, amount: f32, backend: Backend) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    if amount.is_nan() {
        return Err(Error::invalid_parameter("sharpen amount must not be NaN"));
    }
    let exec = backend.resolve()?;
    debug!("sharpen amount={amount} on {exec:?}");

    let row_len = src.row_len();
    let mut dst = Image::new_fill(src.width(), src.height(), src.channels(), 0u8);
    if amount <= 0.0 {
        exec.fill_rows(dst.data_mut(), row_len, |y, row| {
            row.copy_from_slice(&samples[y * row_len..(y + 1) * row_len]);
        });
        return Ok(dst);
    }

    let ch = src.channels().count();
    let xtab = replicate_table(src.width())?;
    let ytab = replicate_table(src.height())?;
    let center_gain = 1.0 + 4.0 * amount;
    exec.fill_rows(dst.data_mut(), row_len, |y, row| {
        let up = ytab[y] * row_len;
        let mid = ytab[y + 1] * row_len;
        let down = ytab[y + 2] * row_len;
        for x in 0..src.width() {
            let left = xtab[x] * ch;
            let here = xtab[x + 1] * ch;
            let right = xtab[x + 2] * ch;
            for c in 0..ch {
                let center = samples[mid + here + c] as f32;
                let ring = samples[up + here + c] as f32
                    + samples[down + here + c] as f32
                    + samples[mid + left + c] as f32
                    + samples[mid + right + c] as f32;
                row[x * ch + c] = clamp_round_u8(center_gain * center - amount * ring);
            }
        }
    });
    Ok(dst)
}

/// Diagonal relief: 3x3 emboss kernel scaled by `strength`, biased by 128.
pub fn emboss(src: &ImageView<'_, u8>, strength: f32, backend: Backend) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    if !strength.is_finite() {
        return Err(Error::invalid_parameter(format!(
            "emboss strength must be finite, got {strength}"
        )));
    }
    let exec = backend.resolve()?;
    debug!("emboss strength={strength} on {exec:?}");

    let ch = src.channels().count();
    let row_len = src.row_len();
    let xtab = replicate_table(src.width())?;
    let ytab = replicate_table(src.height())?;
    let mut dst = Image::new_fill(src.width(), src.height(), src.channels(), 0u8);
    exec.fill_rows(dst.data_mut(), row_len, |y, row| {
        for x in 0..src.width() {
            for c in 0..ch {
                let v = correlate3x3(samples, row_len, ch, &xtab, &ytab, x, y, c, &EMBOSS);
                row[x * ch + c] = clamp_round_u8(v * strength + EMBOSS_BIAS);
            }
        }
    });
    Ok(dst)
}

/// Posterised, outlined rendering.
///
/// Stages: Gaussian smoothing (`sigma_space`, reflect border), quantisation
/// to 16 levels, Sobel L1 magnitude on the luma of `src`; pixels whose
/// magnitude exceeds `edge_threshold` are painted with the edge color.
pub fn cartoonize(
    src: &ImageView<'_, u8>,
    sigma_space: f32,
    edge_threshold: u8,
    backend: Backend,
) -> Result<Image<u8>> {
    require_contiguous(src)?;
    let exec = backend.resolve()?;
    debug!("cartoonize sigma_space={sigma_space} edge_threshold={edge_threshold} on {exec:?}");

    let stage = Backend::from(exec);
    let smooth = gaussian_filter(src, sigma_space, &FilterOptions::new(BorderMode::Reflect, stage))?;
    let gray = to_grayscale(src, stage)?;
    let edges = sobel_edges(&gray, edge_threshold as f32, exec)?;

    let step = 255 / (CARTOON_LEVELS - 1);
    let quantise = lut_u8(|v| (v as f32 / step as f32).round() as u8 * step);

    let ch = src.channels().count();
    let row_len = src.row_len();
    let width = src.width();
    let smooth = smooth.data();
    let mut dst = Image::new_fill(width, src.height(), src.channels(), 0u8);
    exec.fill_rows(dst.data_mut(), row_len, |y, row| {
        let smooth_row = &smooth[y * row_len..(y + 1) * row_len];
        let edge_row = &edges[y * width..(y + 1) * width];
        for ((px, s), &edge) in row
            .chunks_exact_mut(ch)
            .zip(smooth_row.chunks_exact(ch))
            .zip(edge_row)
        {
            for (out, &v) in px.iter_mut().zip(s) {
                *out = if edge { CARTOON_EDGE_COLOR } else { quantise[v as usize] };
            }
        }
    });
    Ok(dst)
}

/// `true` where `|gx| + |gy| > threshold` on a single-channel image.
fn sobel_edges(gray: &Image<u8>, threshold: f32, exec: Executor) -> Result<Vec<bool>> {
    let width = gray.width();
    let samples = gray.data();
    let xtab = replicate_table(width)?;
    let ytab = replicate_table(gray.height())?;

    let mut edges = vec![false; width * gray.height()];
    exec.fill_rows(&mut edges, width, |y, row| {
        for (x, edge) in row.iter_mut().enumerate() {
            let gx = correlate3x3(samples, width, 1, &xtab, &ytab, x, y, 0, &SOBEL_X);
            let gy = correlate3x3(samples, width, 1, &xtab, &ytab, x, y, 0, &SOBEL_Y);
            *edge = gx.abs() + gy.abs() > threshold;
        }
    });
    Ok(edges)
}

/// Radius-1 replicate mapping; entry `k` resolves coordinate `k - 1`.
fn replicate_table(len: usize) -> Result<Vec<usize>> {
    Ok(index_table(len, 1, &BorderMode::<u8>::Replicate)?
        .into_iter()
        .map(|i| i.unwrap_or(0))
        .collect())
}

#[allow(clippy::too_many_arguments)]
#[inline]
fn correlate3x3(
    samples: &[u8],
    row_len: usize,
    ch: usize,
    xtab: &[usize],
    ytab: &[usize],
    x: usize,
    y: usize,
    c: usize,
    kernel: &[[f32; 3]; 3],
) -> f32 {
    let mut acc = 0.0f32;
    for (krow, &sy) in kernel.iter().zip(&ytab[y..y + 3]) {
        let base = sy * row_len;
        for (&w, &sx) in krow.iter().zip(&xtab[x..x + 3]) {
            acc += w * samples[base + sx * ch + c] as f32;
        }
    }
    acc
}
