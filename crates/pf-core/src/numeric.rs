/// Rounds to the nearest integer and saturates to `[0, 255]`.
///
/// Ties round away from zero (`2.5 -> 3`). NaN maps to `0`.
#[inline]
pub fn clamp_round_u8(x: f32) -> u8 {
    x.round().clamp(0.0, 255.0) as u8
}

/// Builds a 256-entry table applying `f` to every possible sample.
pub fn lut_u8(f: impl Fn(u8) -> u8) -> [u8; 256] {
    let mut lut = [0u8; 256];
    for (v, out) in lut.iter_mut().enumerate() {
        *out = f(v as u8);
    }
    lut
}
