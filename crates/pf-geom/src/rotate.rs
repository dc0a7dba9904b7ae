use pf_core::{BorderMode, Executor, Image, ImageView, clamp_round_u8, sample_bilinear_f32};

/// Rotation about the image centre; output keeps the source shape.
///
/// Each destination pixel is mapped back into the source:
/// `sx = cos*dx + sin*dy + cx`, `sy = -sin*dx + cos*dy + cy`, with `(dx, dy)`
/// the offset from the centre `((W-1)/2, (H-1)/2)`.
pub(crate) fn rotate_bilinear_u8(
    src: &ImageView<'_, u8>,
    angle_deg: f32,
    border: BorderMode<u8>,
    exec: Executor,
) -> Image<u8> {
    let ch = src.channels().count();
    let (sin_t, cos_t) = angle_deg.to_radians().sin_cos();
    let cx = (src.width() as f32 - 1.0) * 0.5;
    let cy = (src.height() as f32 - 1.0) * 0.5;
    let border = border.cast::<f32>();

    let mut dst = Image::new_fill(src.width(), src.height(), src.channels(), 0u8);
    exec.fill_rows(dst.data_mut(), src.row_len(), |y, row| {
        let dy = y as f32 - cy;
        for (x, px) in row.chunks_exact_mut(ch).enumerate() {
            let dx = x as f32 - cx;
            let sx = cos_t * dx + sin_t * dy + cx;
            let sy = -sin_t * dx + cos_t * dy + cy;
            for (c, out) in px.iter_mut().enumerate() {
                *out = clamp_round_u8(sample_bilinear_f32(src, sx, sy, c, &border));
            }
        }
    });
    dst
}
