use pf_core::{BorderMode, Executor, Image, ImageView, Result, clamp_round_u8, index_table};

/// Edge-preserving smoothing over a `(2*radius + 1)^2` window.
///
/// Each channel is weighted by its own absolute difference to the centre
/// sample. Range weights come from a 256-entry table indexed by that
/// difference; spatial weights are precomputed per window offset.
pub(crate) fn bilateral_u8(
    src: &ImageView<'_, u8>,
    samples: &[u8],
    radius: usize,
    sigma_color: f32,
    sigma_space: f32,
    border: BorderMode<u8>,
    exec: Executor,
) -> Result<Image<u8>> {
    let width = src.width();
    let height = src.height();
    let ch = src.channels().count();
    let row_len = src.row_len();
    let ksize = 2 * radius + 1;
    let fill = match border {
        BorderMode::Constant(v) => v,
        _ => 0,
    };

    let space = spatial_weights(radius, sigma_space);
    let range = range_weights(sigma_color);

    let mut dst = Image::new_fill(width, height, src.channels(), 0u8);
    let xtab = index_table(width, radius, &border)?;
    let ytab = index_table(height, radius, &border)?;

    exec.fill_rows(dst.data_mut(), row_len, |y, row| {
        let rows = &ytab[y..y + ksize];
        for x in 0..width {
            let cols = &xtab[x..x + ksize];
            for c in 0..ch {
                let center = samples[y * row_len + x * ch + c];
                let mut acc = 0.0f32;
                let mut norm = 0.0f32;
                for (wy, &iy) in rows.iter().enumerate() {
                    for (wx, &ix) in cols.iter().enumerate() {
                        let v = match (iy, ix) {
                            (Some(iy), Some(ix)) => samples[iy * row_len + ix * ch + c],
                            _ => fill,
                        };
                        let w = space[wy * ksize + wx] * range[v.abs_diff(center) as usize];
                        acc += w * v as f32;
                        norm += w;
                    }
                }
                row[x * ch + c] = if norm > 0.0 {
                    clamp_round_u8(acc / norm)
                } else {
                    center
                };
            }
        }
    });

    Ok(dst)
}

fn spatial_weights(radius: usize, sigma_space: f32) -> Vec<f32> {
    let ksize = 2 * radius + 1;
    let denom = 2.0 * sigma_space * sigma_space;
    let mut weights = Vec::with_capacity(ksize * ksize);
    for dy in -(radius as isize)..=radius as isize {
        for dx in -(radius as isize)..=radius as isize {
            let d2 = (dx * dx + dy * dy) as f32;
            weights.push((-d2 / denom).exp());
        }
    }
    weights
}

fn range_weights(sigma_color: f32) -> [f32; 256] {
    let denom = 2.0 * sigma_color * sigma_color;
    let mut lut = [0.0f32; 256];
    for (d, w) in lut.iter_mut().enumerate() {
        let d = d as f32;
        *w = (-(d * d) / denom).exp();
    }
    lut
}
