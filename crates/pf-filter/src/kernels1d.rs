use pf_core::{Error, Result};

/// Largest kernel radius accepted by any filter window.
pub const MAX_RADIUS: usize = 4096;

/// Normalised 1D Gaussian.
///
/// Conventions:
/// - `radius = ceil(3*sigma)`, minimum 1, at most [`MAX_RADIUS`].
/// - `weights` has `2*radius + 1` taps and sums to ~1.
#[derive(Debug, Clone)]
pub struct GaussianKernel1D {
    pub sigma: f32,
    pub radius: usize,
    pub weights: Vec<f32>,
}

impl GaussianKernel1D {
    pub fn new(sigma: f32) -> Result<Self> {
        if !(sigma.is_finite() && sigma > 0.0) {
            return Err(Error::invalid_parameter(format!(
                "sigma must be > 0 and finite, got {sigma}"
            )));
        }

        let reach = (3.0 * sigma).ceil();
        if reach > MAX_RADIUS as f32 {
            return Err(Error::invalid_parameter(format!(
                "sigma {sigma} needs radius {reach}, limit is {MAX_RADIUS}"
            )));
        }
        let radius = (reach as usize).max(1);
        let len = kernel_len(radius)?;

        let sigma2 = sigma * sigma;
        let mut weights = vec![0.0f32; len];
        for (i, w) in weights.iter_mut().enumerate() {
            let x = i as isize - radius as isize;
            let xf = x as f32;
            *w = (-(xf * xf) / (2.0 * sigma2)).exp();
        }

        let sum: f32 = weights.iter().sum();
        for w in &mut weights {
            *w /= sum;
        }

        Ok(Self {
            sigma,
            radius,
            weights,
        })
    }
}

/// Checks that a window size is odd, non-zero and within [`MAX_RADIUS`];
/// returns its radius.
pub fn window_radius(ksize: usize) -> Result<usize> {
    if ksize == 0 || ksize.is_multiple_of(2) {
        return Err(Error::invalid_parameter(format!(
            "ksize must be odd and >= 1, got {ksize}"
        )));
    }
    let radius = ksize / 2;
    if radius > MAX_RADIUS {
        return Err(Error::invalid_parameter(format!(
            "ksize {ksize} exceeds the limit of {}",
            2 * MAX_RADIUS + 1
        )));
    }
    Ok(radius)
}

fn kernel_len(radius: usize) -> Result<usize> {
    radius
        .checked_mul(2)
        .and_then(|v| v.checked_add(1))
        .ok_or_else(|| Error::invalid_parameter(format!("kernel radius {radius} overflows")))
}

/// `ksize` equal taps of `1/ksize`.
pub fn box_kernel1d(ksize: usize) -> Result<Vec<f32>> {
    window_radius(ksize)?;
    Ok(vec![1.0 / ksize as f32; ksize])
}

#[cfg(test)]
mod tests {
    use pf_core::Error;

    use super::{GaussianKernel1D, MAX_RADIUS, box_kernel1d, window_radius};

    #[test]
    fn gaussian_is_normalised_and_symmetric() {
        let k = GaussianKernel1D::new(1.2).expect("valid sigma");
        assert_eq!(k.radius, 4);
        assert_eq!(k.weights.len(), 9);

        let sum: f32 = k.weights.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);

        for i in 1..=k.radius {
            assert!((k.weights[k.radius + i] - k.weights[k.radius - i]).abs() < 1e-7);
            assert!(k.weights[k.radius + i] < k.weights[k.radius + i - 1]);
        }
    }

    #[test]
    fn small_sigma_keeps_minimum_radius() {
        let k = GaussianKernel1D::new(0.1).expect("valid sigma");
        assert_eq!(k.radius, 1);
        assert_eq!(k.weights.len(), 3);
    }

    #[test]
    fn gaussian_rejects_bad_sigma() {
        for sigma in [0.0, -0.5, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                GaussianKernel1D::new(sigma),
                Err(Error::InvalidParameter { .. })
            ));
        }
    }

    #[test]
    fn oversized_sigma_is_rejected() {
        for sigma in [1e20, f32::MAX, 1366.0] {
            assert!(matches!(
                GaussianKernel1D::new(sigma),
                Err(Error::InvalidParameter { .. })
            ));
        }
        let k = GaussianKernel1D::new(1365.0).expect("below the limit");
        assert_eq!(k.radius, 4095);
        assert_eq!(k.weights.len(), 8191);
    }

    #[test]
    fn box_kernel_taps() {
        let k = box_kernel1d(5).expect("odd ksize");
        assert_eq!(k.len(), 5);
        assert!(k.iter().all(|&w| (w - 0.2).abs() < 1e-7));
        assert_eq!(box_kernel1d(1).expect("odd ksize"), vec![1.0]);
    }

    #[test]
    fn even_or_zero_window_rejected() {
        for ksize in [0, 2, 4] {
            assert!(matches!(
                box_kernel1d(ksize),
                Err(Error::InvalidParameter { .. })
            ));
        }
        assert_eq!(window_radius(7), Ok(3));
    }

    #[test]
    fn huge_window_rejected() {
        for ksize in [usize::MAX, usize::MAX - 2, 2 * MAX_RADIUS + 3] {
            assert!(matches!(
                window_radius(ksize),
                Err(Error::InvalidParameter { .. })
            ));
            assert!(matches!(
                box_kernel1d(ksize),
                Err(Error::InvalidParameter { .. })
            ));
        }
        assert_eq!(window_radius(2 * MAX_RADIUS + 1), Ok(MAX_RADIUS));
    }
}
