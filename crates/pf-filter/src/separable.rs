use pf_core::{BorderMode, Executor, Image, ImageView, Result, clamp_round_u8, index_table};

/// Convolves rows then columns with the same symmetric `kernel`.
///
/// The horizontal pass writes an `f32` intermediate; rounding happens once,
/// after the vertical pass. Out-of-range taps in either pass go through
/// `border`, so a constant border contributes its value to both passes.
pub(crate) fn convolve_separable_u8(
    src: &ImageView<'_, u8>,
    samples: &[u8],
    kernel: &[f32],
    border: BorderMode<u8>,
    exec: Executor,
) -> Result<Image<u8>> {
    debug_assert_eq!(kernel.len() % 2, 1, "kernel length must be odd");

    let width = src.width();
    let height = src.height();
    let ch = src.channels().count();
    let row_len = src.row_len();
    let radius = kernel.len() / 2;
    let fill = match border {
        BorderMode::Constant(v) => v as f32,
        _ => 0.0,
    };

    let mut dst = Image::new_fill(width, height, src.channels(), 0u8);
    if row_len == 0 || height == 0 {
        return Ok(dst);
    }

    let xtab = index_table(width, radius, &border)?;
    let ytab = index_table(height, radius, &border)?;

    let mut tmp = vec![0.0f32; row_len * height];
    exec.fill_rows(&mut tmp, row_len, |y, row| {
        let src_row = &samples[y * row_len..(y + 1) * row_len];
        for x in 0..width {
            let taps = &xtab[x..x + kernel.len()];
            for c in 0..ch {
                let mut acc = 0.0f32;
                for (&w, &ix) in kernel.iter().zip(taps) {
                    let v = match ix {
                        Some(ix) => src_row[ix * ch + c] as f32,
                        None => fill,
                    };
                    acc += w * v;
                }
                row[x * ch + c] = acc;
            }
        }
    });

    // `fill_rows` has joined; `tmp` is complete before any column is read.
    let tmp = tmp.as_slice();
    exec.fill_rows(dst.data_mut(), row_len, |y, row| {
        let taps = &ytab[y..y + kernel.len()];
        for (i, out) in row.iter_mut().enumerate() {
            let mut acc = 0.0f32;
            for (&w, &iy) in kernel.iter().zip(taps) {
                let v = match iy {
                    Some(iy) => tmp[iy * row_len + i],
                    None => fill,
                };
                acc += w * v;
            }
            *out = clamp_round_u8(acc);
        }
    });

    Ok(dst)
}
