use archmage::prelude::*;
use core::arch::x86_64::{
    __m128i, __m256i, _mm_cvtsi128_si32, _mm_mullo_epi16, _mm_packus_epi16, _mm_set_epi64x,
    _mm_setr_epi16, _mm_srli_epi16, _mm256_cvtepu8_epi16, _mm256_extract_epi64,
    _mm256_mullo_epi16, _mm256_packus_epi16, _mm256_setr_epi16, _mm256_srli_epi16,
};
use rgb::Rgba;

use crate::pixel::{from_word, to_word};

// ===========================================================================
// x86-64 AVX2: rite pixel implementations
// ===========================================================================

/// One pixel in the low four 16-bit lanes of an SSE register.
///
/// `mul` holds the factor in lanes 0..3 and zero elsewhere; the low 16 bits
/// of each product survive `mullo`, which is the same wrap the scalar path
/// gets from truncating to `u8` after the shift.
#[rite]
pub(super) fn darken_pixel_v3(_token: X64V3Token, px: Rgba<u8>, mul: __m128i) -> Rgba<u8> {
    let wide = _mm_setr_epi16(
        i16::from(px.r),
        i16::from(px.g),
        i16::from(px.b),
        0,
        0,
        0,
        0,
        0,
    );
    let scaled = _mm_srli_epi16::<8>(_mm_mullo_epi16(wide, mul));
    let [r, g, b, _] = (_mm_cvtsi128_si32(_mm_packus_epi16(scaled, scaled)) as u32).to_le_bytes();
    Rgba { r, g, b, a: px.a }
}

/// Four pixels widened to sixteen 16-bit lanes.
///
/// Alpha lanes are multiplied by 256, so they come back unchanged after the
/// shift. Pixels 0-1 land in the low 128-bit lane and 2-3 in the high one;
/// `packus` works per lane, hence the extraction at qwords 0 and 2.
#[rite]
pub(super) fn darken_quad_v3(_token: X64V3Token, quad: &mut [Rgba<u8>; 4], mul: __m256i) {
    let lo = u64::from(to_word(quad[0])) | (u64::from(to_word(quad[1])) << 32);
    let hi = u64::from(to_word(quad[2])) | (u64::from(to_word(quad[3])) << 32);
    let wide = _mm256_cvtepu8_epi16(_mm_set_epi64x(hi as i64, lo as i64));
    let scaled = _mm256_srli_epi16::<8>(_mm256_mullo_epi16(wide, mul));
    let packed = _mm256_packus_epi16(scaled, scaled);
    let lo = _mm256_extract_epi64::<0>(packed) as u64;
    let hi = _mm256_extract_epi64::<2>(packed) as u64;
    quad[0] = from_word(lo as u32);
    quad[1] = from_word((lo >> 32) as u32);
    quad[2] = from_word(hi as u32);
    quad[3] = from_word((hi >> 32) as u32);
}

#[rite]
pub(super) fn darken_row_v3(token: X64V3Token, row: &mut [Rgba<u8>], factor: u16) {
    let f = factor as i16;
    let quad_mul = _mm256_setr_epi16(
        f, f, f, 256, f, f, f, 256, f, f, f, 256, f, f, f, 256,
    );
    let pixel_mul = _mm_setr_epi16(f, f, f, 0, 0, 0, 0, 0);
    let (quads, tail) = row.as_chunks_mut::<4>();
    for quad in quads {
        darken_quad_v3(token, quad, quad_mul);
    }
    for px in tail {
        *px = darken_pixel_v3(token, *px, pixel_mul);
    }
}

// ===========================================================================
// x86-64 AVX2: arcane dispatch target
// ===========================================================================

#[arcane]
pub(super) fn darken_impl_v3(t: X64V3Token, row: &mut [Rgba<u8>], factor: u16) {
    darken_row_v3(t, row, factor);
}
