use crate::border::{BorderMode, map_index};
use crate::image::ImageView;

/// Bilinear interpolation of channel `c` at pixel-center coordinates `(x, y)`.
///
/// Uses the floor-based 2x2 neighborhood; taps outside the image are resolved
/// through `border`.
pub fn sample_bilinear_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: f32,
    y: f32,
    c: usize,
    border: &BorderMode<f32>,
) -> f32 {
    if img.is_empty() {
        if let BorderMode::Constant(v) = border {
            return *v;
        }
        panic!("cannot sample an empty image with non-constant border");
    }

    let x0 = x.floor() as isize;
    let y0 = y.floor() as isize;
    let x1 = x0 + 1;
    let y1 = y0 + 1;

    let dx = x - x0 as f32;
    let dy = y - y0 as f32;

    let p00 = sample_at_f32(img, x0, y0, c, border);
    let p10 = sample_at_f32(img, x1, y0, c, border);
    let p01 = sample_at_f32(img, x0, y1, c, border);
    let p11 = sample_at_f32(img, x1, y1, c, border);

    let top = p00 * (1.0 - dx) + p10 * dx;
    let bottom = p01 * (1.0 - dx) + p11 * dx;
    top * (1.0 - dy) + bottom * dy
}

fn sample_at_f32<T: Copy + Into<f32>>(
    img: &ImageView<'_, T>,
    x: isize,
    y: isize,
    c: usize,
    border: &BorderMode<f32>,
) -> f32 {
    let xi = map_index(x, img.width(), border);
    let yi = map_index(y, img.height(), border);
    match (xi, yi, border) {
        // SAFETY: `map_index` only returns indices in `[0, len)`.
        (Some(xi), Some(yi), _) => unsafe { (*img.get_unchecked(xi, yi, c)).into() },
        (_, _, BorderMode::Constant(v)) => *v,
        _ => unreachable!("non-constant border always maps into a non-empty image"),
    }
}
