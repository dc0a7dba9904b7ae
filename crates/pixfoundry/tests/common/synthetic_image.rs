#![allow(dead_code)]

use pixfoundry::{Channels, Image};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

pub const WIDTH: usize = 80;
pub const HEIGHT: usize = 64;

/// Uniform noise image, reproducible from `seed`.
pub fn noise_u8(width: usize, height: usize, channels: Channels, seed: u64) -> Image<u8> {
    let mut data = vec![0u8; width * height * channels.count()];
    StdRng::seed_from_u64(seed).fill_bytes(&mut data);
    Image::from_vec(width, height, channels, data).expect("valid image")
}

/// One gray and one RGB noise image of the standard test size.
pub fn test_images() -> [Image<u8>; 2] {
    [
        noise_u8(WIDTH, HEIGHT, Channels::Gray, 11),
        noise_u8(WIDTH, HEIGHT, Channels::Rgb, 12),
    ]
}

/// `value(y, x) = 10y + x` on a single-channel image.
pub fn ramp_u8(width: usize, height: usize) -> Image<u8> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            data.push((10 * y + x) as u8);
        }
    }
    Image::from_vec(width, height, Channels::Gray, data).expect("valid image")
}
