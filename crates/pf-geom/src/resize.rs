use pf_core::{
    BorderMode, Executor, Image, ImageView, Result, clamp_round_u8, sample_bilinear_f32,
};

/// Source coordinate of destination index `i` under half-pixel centres.
#[inline]
pub(crate) fn source_coord(i: usize, scale: f32) -> f32 {
    (i as f32 + 0.5) * scale - 0.5
}

pub(crate) fn resize_bilinear_u8(
    src: &ImageView<'_, u8>,
    dst_h: usize,
    dst_w: usize,
    exec: Executor,
) -> Result<Image<u8>> {
    let channels = src.channels();
    let ch = channels.count();
    let scale_y = src.height() as f32 / dst_h as f32;
    let scale_x = src.width() as f32 / dst_w as f32;
    let mut dst = Image::try_new_fill(dst_w, dst_h, channels, 0u8)?;
    let sx: Vec<f32> = (0..dst_w).map(|x| source_coord(x, scale_x)).collect();
    exec.fill_rows(dst.data_mut(), dst_w * ch, |y, row| {
        let sy = source_coord(y, scale_y);
        for (px, &sx) in row.chunks_exact_mut(ch).zip(&sx) {
            for (c, out) in px.iter_mut().enumerate() {
                *out = clamp_round_u8(sample_bilinear_f32(src, sx, sy, c, &BorderMode::Replicate));
            }
        }
    });
    Ok(dst)
}
