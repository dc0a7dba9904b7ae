use clap::{Args, ValueEnum};
use pixfoundry::{
    Backend, BorderMode, FilterOptions, Image, ImageView, Result, adjust_brightness_contrast,
    bilateral_filter, cartoonize, crop, emboss, flip_horizontal, flip_vertical, gamma_correct,
    gaussian_filter, invert, mean_filter, median_filter, resize, rotate, sepia, sharpen,
    to_grayscale,
};
use serde::Serialize;

/// Every engine operation reachable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Operation {
    Grayscale,
    Invert,
    Sepia,
    BrightnessContrast,
    Gamma,
    Mean,
    Gaussian,
    Median,
    Bilateral,
    Resize,
    FlipHorizontal,
    FlipVertical,
    Crop,
    Rotate,
    Sharpen,
    Emboss,
    Cartoonize,
}

impl Operation {
    pub const ALL: [Operation; 17] = [
        Operation::Grayscale,
        Operation::Invert,
        Operation::Sepia,
        Operation::BrightnessContrast,
        Operation::Gamma,
        Operation::Mean,
        Operation::Gaussian,
        Operation::Median,
        Operation::Bilateral,
        Operation::Resize,
        Operation::FlipHorizontal,
        Operation::FlipVertical,
        Operation::Crop,
        Operation::Rotate,
        Operation::Sharpen,
        Operation::Emboss,
        Operation::Cartoonize,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Grayscale => "grayscale",
            Self::Invert => "invert",
            Self::Sepia => "sepia",
            Self::BrightnessContrast => "brightness_contrast",
            Self::Gamma => "gamma",
            Self::Mean => "mean",
            Self::Gaussian => "gaussian",
            Self::Median => "median",
            Self::Bilateral => "bilateral",
            Self::Resize => "resize",
            Self::FlipHorizontal => "flip_horizontal",
            Self::FlipVertical => "flip_vertical",
            Self::Crop => "crop",
            Self::Rotate => "rotate",
            Self::Sharpen => "sharpen",
            Self::Emboss => "emboss",
            Self::Cartoonize => "cartoonize",
        }
    }

    /// Whether the operation reads the border mode.
    pub fn uses_border(self) -> bool {
        matches!(
            self,
            Self::Mean | Self::Gaussian | Self::Median | Self::Bilateral | Self::Rotate
        )
    }
}

const ALPHA: f32 = 1.2;
const BETA: f32 = 10.0;
const GAMMA: f32 = 2.2;
const KSIZE: usize = 5;
const SIGMA: f32 = 1.5;
const SIGMA_COLOR: f32 = 30.0;
const SIGMA_SPACE: f32 = 3.0;
const ANGLE: f32 = 30.0;
const AMOUNT: f32 = 1.0;
const STRENGTH: f32 = 1.0;
const EDGE_THRESHOLD: u8 = 60;

/// Operation parameters; each operation reads only the ones it needs.
#[derive(Args, Debug, Clone, PartialEq, Serialize)]
pub struct OpParams {
    #[arg(long, default_value_t = ALPHA)]
    pub alpha: f32,
    #[arg(long, default_value_t = BETA)]
    pub beta: f32,
    #[arg(long, default_value_t = GAMMA)]
    pub gamma: f32,
    #[arg(long, default_value_t = KSIZE)]
    pub ksize: usize,
    #[arg(long, default_value_t = SIGMA)]
    pub sigma: f32,
    #[arg(long, default_value_t = SIGMA_COLOR)]
    pub sigma_color: f32,
    #[arg(long, default_value_t = SIGMA_SPACE)]
    pub sigma_space: f32,
    /// Target height for resize, crop height for crop; half the input by default.
    #[arg(long)]
    pub height: Option<usize>,
    /// Target width for resize, crop width for crop; half the input by default.
    #[arg(long)]
    pub width: Option<usize>,
    /// Crop origin row; centres the crop by default.
    #[arg(long)]
    pub y: Option<usize>,
    /// Crop origin column; centres the crop by default.
    #[arg(long)]
    pub x: Option<usize>,
    #[arg(long, default_value_t = ANGLE)]
    pub angle: f32,
    #[arg(long, default_value_t = AMOUNT)]
    pub amount: f32,
    #[arg(long, default_value_t = STRENGTH)]
    pub strength: f32,
    #[arg(long, default_value_t = EDGE_THRESHOLD)]
    pub edge_threshold: u8,
}

impl Default for OpParams {
    fn default() -> Self {
        Self {
            alpha: ALPHA,
            beta: BETA,
            gamma: GAMMA,
            ksize: KSIZE,
            sigma: SIGMA,
            sigma_color: SIGMA_COLOR,
            sigma_space: SIGMA_SPACE,
            height: None,
            width: None,
            y: None,
            x: None,
            angle: ANGLE,
            amount: AMOUNT,
            strength: STRENGTH,
            edge_threshold: EDGE_THRESHOLD,
        }
    }
}

impl OpParams {
    fn target_dims(&self, src: &ImageView<'_, u8>) -> (usize, usize) {
        (
            self.height.unwrap_or((src.height() / 2).max(1)),
            self.width.unwrap_or((src.width() / 2).max(1)),
        )
    }

    fn crop_rect(&self, src: &ImageView<'_, u8>) -> (usize, usize, usize, usize) {
        let (h, w) = self.target_dims(src);
        let y = self.y.unwrap_or(src.height().saturating_sub(h) / 2);
        let x = self.x.unwrap_or(src.width().saturating_sub(w) / 2);
        (y, x, h, w)
    }
}

pub fn apply(
    op: Operation,
    src: &ImageView<'_, u8>,
    params: &OpParams,
    border: BorderMode<u8>,
    backend: Backend,
) -> Result<Image<u8>> {
    let opts = FilterOptions::new(border, backend);
    match op {
        Operation::Grayscale => to_grayscale(src, backend),
        Operation::Invert => invert(src, backend),
        Operation::Sepia => sepia(src, backend),
        Operation::BrightnessContrast => {
            adjust_brightness_contrast(src, params.alpha, params.beta, backend)
        }
        Operation::Gamma => gamma_correct(src, params.gamma, backend),
        Operation::Mean => mean_filter(src, params.ksize, &opts),
        Operation::Gaussian => gaussian_filter(src, params.sigma, &opts),
        Operation::Median => median_filter(src, params.ksize, &opts),
        Operation::Bilateral => bilateral_filter(
            src,
            params.ksize,
            params.sigma_color,
            params.sigma_space,
            &opts,
        ),
        Operation::Resize => {
            let (h, w) = params.target_dims(src);
            resize(src, h, w, backend)
        }
        Operation::FlipHorizontal => flip_horizontal(src, backend),
        Operation::FlipVertical => flip_vertical(src, backend),
        Operation::Crop => {
            let (y, x, h, w) = params.crop_rect(src);
            crop(src, y, x, h, w, backend)
        }
        Operation::Rotate => rotate(src, params.angle, border, backend),
        Operation::Sharpen => sharpen(src, params.amount, backend),
        Operation::Emboss => emboss(src, params.strength, backend),
        Operation::Cartoonize => cartoonize(src, params.sigma_space, params.edge_threshold, backend),
    }
}

#[cfg(test)]
mod tests {
    use clap::{Args, Command, FromArgMatches, ValueEnum};
    use pixfoundry::{Backend, BorderMode, Channels, Image};

    use super::{OpParams, Operation, apply};

    #[test]
    fn names_match_cli_values() {
        for op in Operation::ALL {
            let value = op.to_possible_value().expect("visible value");
            assert_eq!(value.get_name(), op.name());
        }
    }

    #[test]
    fn every_operation_runs_on_rgb_defaults() {
        let img = Image::new_fill(12, 10, Channels::Rgb, 90u8);
        let params = OpParams::default();
        for op in Operation::ALL {
            let out = apply(op, &img.as_view(), &params, BorderMode::Reflect, Backend::Single)
                .unwrap_or_else(|e| panic!("{} failed: {e}", op.name()));
            match op {
                Operation::Resize | Operation::Crop => {
                    assert_eq!((out.height(), out.width()), (5, 6));
                }
                Operation::Grayscale => assert_eq!(out.channels(), Channels::Gray),
                _ => assert_eq!((out.height(), out.width()), (10, 12)),
            }
        }
    }

    #[test]
    fn cli_defaults_match_default_impl() {
        let matches = OpParams::augment_args(Command::new("params"))
            .try_get_matches_from(["params"])
            .expect("no arguments");
        let parsed = OpParams::from_arg_matches(&matches).expect("defaults parse");
        assert_eq!(parsed, OpParams::default());
    }

    #[test]
    fn default_crop_is_centred() {
        let img = Image::new_fill(10, 8, Channels::Gray, 0u8);
        assert_eq!(OpParams::default().crop_rect(&img.as_view()), (2, 2, 4, 5));
    }
}
