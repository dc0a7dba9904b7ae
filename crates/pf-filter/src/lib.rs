//! Border-aware spatial filters on 8-bit grayscale and RGB images.
//!
//! Linear filters run as two separable passes through an `f32` intermediate
//! and round once at the end. Rank and edge-preserving filters evaluate the
//! full square window per output sample. Every filter honours every
//! [`BorderMode`] and produces identical bytes on every backend.

mod bilateral;
mod kernels1d;
mod median;
mod separable;

use log::debug;
use pf_core::{Backend, BorderMode, Error, Image, ImageView, Result, require_contiguous};

pub use kernels1d::{GaussianKernel1D, MAX_RADIUS, box_kernel1d, window_radius};

/// Border and backend shared by every filter call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FilterOptions {
    pub border: BorderMode<u8>,
    pub backend: Backend,
}

impl FilterOptions {
    pub fn new(border: BorderMode<u8>, backend: Backend) -> Self {
        Self { border, backend }
    }
}

/// Box blur over a `ksize x ksize` window.
pub fn mean_filter(
    src: &ImageView<'_, u8>,
    ksize: usize,
    opts: &FilterOptions,
) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    let kernel = box_kernel1d(ksize)?;
    let exec = opts.backend.resolve()?;
    debug!(
        "mean_filter ksize={ksize} border={} {}x{} on {exec:?}",
        opts.border.name(),
        src.width(),
        src.height()
    );

    separable::convolve_separable_u8(src, samples, &kernel, opts.border, exec)
}

/// Gaussian blur; the kernel radius is `max(1, ceil(3 * sigma))`.
pub fn gaussian_filter(
    src: &ImageView<'_, u8>,
    sigma: f32,
    opts: &FilterOptions,
) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    let kernel = GaussianKernel1D::new(sigma)?;
    let exec = opts.backend.resolve()?;
    debug!(
        "gaussian_filter sigma={sigma} radius={} border={} on {exec:?}",
        kernel.radius,
        opts.border.name()
    );

    separable::convolve_separable_u8(src, samples, &kernel.weights, opts.border, exec)
}

pub fn median_filter(
    src: &ImageView<'_, u8>,
    ksize: usize,
    opts: &FilterOptions,
) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    let radius = window_radius(ksize)?;
    let exec = opts.backend.resolve()?;
    debug!(
        "median_filter ksize={ksize} border={} on {exec:?}",
        opts.border.name()
    );

    median::median_u8(src, samples, radius, opts.border, exec)
}

/// Bilateral filter with a per-channel range metric.
///
/// Both sigmas must be finite and positive.
pub fn bilateral_filter(
    src: &ImageView<'_, u8>,
    ksize: usize,
    sigma_color: f32,
    sigma_space: f32,
    opts: &FilterOptions,
) -> Result<Image<u8>> {
    let samples = require_contiguous(src)?;
    let radius = window_radius(ksize)?;
    for (name, sigma) in [("sigma_color", sigma_color), ("sigma_space", sigma_space)] {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(Error::invalid_parameter(format!(
                "{name} must be > 0 and finite, got {sigma}"
            )));
        }
    }
    let exec = opts.backend.resolve()?;
    debug!(
        "bilateral_filter ksize={ksize} sigma_color={sigma_color} sigma_space={sigma_space} border={} on {exec:?}",
        opts.border.name()
    );

    bilateral::bilateral_u8(
        src,
        samples,
        radius,
        sigma_color,
        sigma_space,
        opts.border,
        exec,
    )
}

#[cfg(test)]
mod tests {
    use pf_core::{Backend, BorderMode, Channels, Error, Image, clamp_round_u8};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::{
        FilterOptions, GaussianKernel1D, bilateral_filter, gaussian_filter, mean_filter,
        median_filter,
    };

    fn opts(border: BorderMode<u8>) -> FilterOptions {
        FilterOptions::new(border, Backend::Single)
    }

    fn variance(data: &[u8]) -> f64 {
        let n = data.len() as f64;
        let mean = data.iter().map(|&v| v as f64).sum::<f64>() / n;
        data.iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / n
    }

    #[test]
    fn default_options_reflect_auto() {
        let o = FilterOptions::default();
        assert_eq!(o.border, BorderMode::Reflect);
        assert_eq!(o.backend, Backend::Auto);
    }

    #[test]
    fn mean_constant_border_on_single_pixel() {
        let img = Image::new_fill(1, 1, Channels::Gray, 0u8);
        for c in 0..=255u8 {
            let expected = (8.0 * c as f64 / 9.0).round() as u8;
            for backend in [Backend::Single, Backend::Auto] {
                let o = FilterOptions::new(BorderMode::Constant(c), backend);
                let out = mean_filter(&img.as_view(), 3, &o).expect("mean");
                assert_eq!(out.data(), &[expected], "c={c} backend={backend}");
            }
        }
    }

    #[test]
    fn gaussian_constant_border_on_single_pixel() {
        let sigma = 0.8;
        let kernel = GaussianKernel1D::new(sigma).expect("valid sigma");
        // Both passes see `v` at the centre tap and `c` everywhere else.
        let pass = |centre: f32, c: f32| {
            kernel
                .weights
                .iter()
                .enumerate()
                .fold(0.0f32, |acc, (i, &w)| {
                    acc + w * if i == kernel.radius { centre } else { c }
                })
        };

        let v = 200u8;
        let img = Image::new_fill(1, 1, Channels::Gray, v);
        for c in 0..=255u8 {
            let cf = c as f32;
            let expected = clamp_round_u8(pass(pass(v as f32, cf), cf));
            for backend in [Backend::Single, Backend::Auto] {
                let o = FilterOptions::new(BorderMode::Constant(c), backend);
                let out = gaussian_filter(&img.as_view(), sigma, &o).expect("gaussian");
                assert_eq!(out.data(), &[expected], "c={c} backend={backend}");
            }
        }
    }

    #[test]
    fn bilateral_constant_border_on_single_pixel() {
        let (v, sigma_color, sigma_space) = (100u8, 50.0f64, 1.0f64);
        let img = Image::new_fill(1, 1, Channels::Gray, v);
        // Four edge neighbours at distance 1, four corners at distance sqrt(2).
        let space = 4.0 * (-1.0 / (2.0 * sigma_space * sigma_space)).exp()
            + 4.0 * (-2.0 / (2.0 * sigma_space * sigma_space)).exp();

        for c in [0u8, 40, 100, 160, 200, 255] {
            let diff = v as f64 - c as f64;
            let ring = space * (-(diff * diff) / (2.0 * sigma_color * sigma_color)).exp();
            let expected = ((v as f64 + c as f64 * ring) / (1.0 + ring)).round() as u8;

            let o = FilterOptions::new(BorderMode::Constant(c), Backend::Single);
            let out = bilateral_filter(&img.as_view(), 3, sigma_color as f32, sigma_space as f32, &o)
                .expect("bilateral");
            assert_eq!(out.data(), &[expected], "c={c}");
        }
    }

    #[test]
    fn mean_preserves_flat_images_for_non_constant_borders() {
        let img = Image::new_fill(5, 4, Channels::Rgb, 123u8);
        for border in [BorderMode::Reflect, BorderMode::Replicate, BorderMode::Wrap] {
            let out = mean_filter(&img.as_view(), 5, &opts(border)).expect("mean");
            assert_eq!(out, img);
        }
    }

    #[test]
    fn gaussian_preserves_shape_and_flat_regions() {
        let img = Image::new_fill(9, 7, Channels::Gray, 200u8);
        let out = gaussian_filter(&img.as_view(), 1.5, &opts(BorderMode::Reflect)).expect("gaussian");
        assert_eq!((out.width(), out.height(), out.channels()), (9, 7, Channels::Gray));
        assert!(out.data().iter().all(|&v| v == 200));
    }

    #[test]
    fn median_reduces_salt_and_pepper_variance() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut data = vec![128u8; 32 * 32];
        for v in &mut data {
            let r: f32 = rng.random();
            if r < 0.05 {
                *v = 0;
            } else if r < 0.10 {
                *v = 255;
            }
        }
        let img = Image::from_vec(32, 32, Channels::Gray, data).expect("valid image");
        let out = median_filter(&img.as_view(), 3, &opts(BorderMode::Reflect)).expect("median");
        assert!(variance(out.data()) < variance(img.data()) / 4.0);
    }

    #[test]
    fn bilateral_flat_image_unchanged() {
        let img = Image::new_fill(7, 6, Channels::Gray, 42u8);
        let out = bilateral_filter(&img.as_view(), 5, 30.0, 2.0, &opts(BorderMode::Reflect))
            .expect("bilateral");
        assert_eq!(out, img);
    }

    #[test]
    fn window_and_sigma_validation() {
        let img = Image::new_fill(4, 4, Channels::Gray, 1u8);
        let view = img.as_view();
        let o = opts(BorderMode::Reflect);

        for ksize in [0, 2, 4] {
            assert!(matches!(mean_filter(&view, ksize, &o), Err(Error::InvalidParameter { .. })));
            assert!(matches!(median_filter(&view, ksize, &o), Err(Error::InvalidParameter { .. })));
            assert!(matches!(
                bilateral_filter(&view, ksize, 10.0, 10.0, &o),
                Err(Error::InvalidParameter { .. })
            ));
        }
        assert!(matches!(gaussian_filter(&view, 0.0, &o), Err(Error::InvalidParameter { .. })));
        assert!(matches!(
            bilateral_filter(&view, 3, 0.0, 1.0, &o),
            Err(Error::InvalidParameter { .. })
        ));
        assert!(matches!(
            bilateral_filter(&view, 3, 1.0, f32::NAN, &o),
            Err(Error::InvalidParameter { .. })
        ));
    }

    #[test]
    fn oversized_windows_and_sigmas_are_errors() {
        let img = Image::new_fill(4, 4, Channels::Gray, 1u8);
        let view = img.as_view();
        let o = opts(BorderMode::Reflect);

        for ksize in [usize::MAX, usize::MAX - 2] {
            assert!(matches!(mean_filter(&view, ksize, &o), Err(Error::InvalidParameter { .. })));
            assert!(matches!(median_filter(&view, ksize, &o), Err(Error::InvalidParameter { .. })));
            assert!(matches!(
                bilateral_filter(&view, ksize, 10.0, 10.0, &o),
                Err(Error::InvalidParameter { .. })
            ));
        }
        for sigma in [1e20, f32::MAX] {
            assert!(matches!(
                gaussian_filter(&view, sigma, &o),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }
}
