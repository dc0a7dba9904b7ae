use pf_core::{Executor, Image, ImageView};

pub(crate) fn flip_horizontal_u8(
    src: &ImageView<'_, u8>,
    samples: &[u8],
    exec: Executor,
) -> Image<u8> {
    let ch = src.channels().count();
    let row_len = src.row_len();
    let mut dst = Image::new_fill(src.width(), src.height(), src.channels(), 0u8);
    exec.fill_rows(dst.data_mut(), row_len, |y, row| {
        let src_row = &samples[y * row_len..(y + 1) * row_len];
        for (out, px) in row.chunks_exact_mut(ch).zip(src_row.chunks_exact(ch).rev()) {
            out.copy_from_slice(px);
        }
    });
    dst
}

pub(crate) fn flip_vertical_u8(
    src: &ImageView<'_, u8>,
    samples: &[u8],
    exec: Executor,
) -> Image<u8> {
    let height = src.height();
    let row_len = src.row_len();
    let mut dst = Image::new_fill(src.width(), height, src.channels(), 0u8);
    exec.fill_rows(dst.data_mut(), row_len, |y, row| {
        let sy = height - 1 - y;
        row.copy_from_slice(&samples[sy * row_len..(sy + 1) * row_len]);
    });
    dst
}

/// Copies an already bounds-checked subview into a new contiguous image.
pub(crate) fn copy_view_u8(view: &ImageView<'_, u8>, exec: Executor) -> Image<u8> {
    let row_len = view.row_len();
    let mut dst = Image::new_fill(view.width(), view.height(), view.channels(), 0u8);
    exec.fill_rows(dst.data_mut(), row_len, |y, row| {
        row.copy_from_slice(view.row(y));
    });
    dst
}
