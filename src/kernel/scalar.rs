use archmage::prelude::*;
use rgb::Rgba;

// ===========================================================================
// Scalar kernel
// ===========================================================================

/// `(c * factor) >> 8`, truncated to 8 bits. No saturation.
#[inline(always)]
fn scale(c: u8, factor: u16) -> u8 {
    ((u32::from(c) * u32::from(factor)) >> 8) as u8
}

#[inline(always)]
pub(super) fn darken_pixel_scalar(px: Rgba<u8>, factor: u16) -> Rgba<u8> {
    Rgba {
        r: scale(px.r, factor),
        g: scale(px.g, factor),
        b: scale(px.b, factor),
        a: px.a,
    }
}

pub(super) fn darken_row_scalar(row: &mut [Rgba<u8>], factor: u16) {
    for px in row.iter_mut() {
        *px = darken_pixel_scalar(*px, factor);
    }
}

// ===========================================================================
// Dispatch target for incant!
// ===========================================================================

pub(super) fn darken_impl_scalar(_token: ScalarToken, row: &mut [Rgba<u8>], factor: u16) {
    darken_row_scalar(row, factor);
}
