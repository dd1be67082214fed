use core::arch::wasm32::{
    i16x8_mul, u16x8, u16x8_extend_low_u8x16, u16x8_shr, u64x2, u64x2_extract_lane,
    u8x16_narrow_i16x8, v128,
};

use archmage::prelude::*;
use rgb::Rgba;

use crate::pixel::{from_word, to_word};

// ===========================================================================
// WASM SIMD128: rite pixel implementations
// ===========================================================================

#[rite]
pub(super) fn darken_pair_wasm128(_token: Wasm128Token, pair: u64, mul: v128) -> u64 {
    let wide = u16x8_extend_low_u8x16(u64x2(pair, 0));
    let scaled = u16x8_shr(i16x8_mul(wide, mul), 8);
    // Lanes are 0..=255 after the shift, so the signed saturating narrow is exact.
    u64x2_extract_lane::<0>(u8x16_narrow_i16x8(scaled, scaled))
}

#[rite]
pub(super) fn darken_row_wasm128(token: Wasm128Token, row: &mut [Rgba<u8>], factor: u16) {
    let f = factor;
    let mul = u16x8(f, f, f, 256, f, f, f, 256);
    let (pairs, tail) = row.as_chunks_mut::<2>();
    for pair in pairs {
        let packed = u64::from(to_word(pair[0])) | (u64::from(to_word(pair[1])) << 32);
        let out = darken_pair_wasm128(token, packed, mul);
        pair[0] = from_word(out as u32);
        pair[1] = from_word((out >> 32) as u32);
    }
    for px in tail {
        *px = from_word(darken_pair_wasm128(token, u64::from(to_word(*px)), mul) as u32);
    }
}

// ===========================================================================
// WASM SIMD128: arcane dispatch target
// ===========================================================================

#[arcane]
pub(super) fn darken_impl_wasm128(t: Wasm128Token, row: &mut [Rgba<u8>], factor: u16) {
    darken_row_wasm128(t, row, factor);
}
