use pf_core::{BorderMode, Executor, Image, ImageView, Result, index_table};

/// Square-window median, each channel on its own.
///
/// The window always has odd length, so the lower median at `len / 2` is
/// the true median.
pub(crate) fn median_u8(
    src: &ImageView<'_, u8>,
    samples: &[u8],
    radius: usize,
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

    let mut dst = Image::new_fill(width, height, src.channels(), 0u8);
    let xtab = index_table(width, radius, &border)?;
    let ytab = index_table(height, radius, &border)?;

    exec.fill_rows(dst.data_mut(), row_len, |y, row| {
        let rows = &ytab[y..y + ksize];
        let mut window = Vec::with_capacity(ksize * ksize);
        for x in 0..width {
            let cols = &xtab[x..x + ksize];
            for c in 0..ch {
                window.clear();
                for &iy in rows {
                    for &ix in cols {
                        window.push(match (iy, ix) {
                            (Some(iy), Some(ix)) => samples[iy * row_len + ix * ch + c],
                            _ => fill,
                        });
                    }
                }
                let mid = window.len() / 2;
                let (_, median, _) = window.select_nth_unstable(mid);
                row[x * ch + c] = *median;
            }
        }
    });

    Ok(dst)
}
