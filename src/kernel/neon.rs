use archmage::prelude::*;
use core::arch::aarch64::{
    uint16x8_t, vcombine_u16, vcreate_u16, vcreate_u8, vget_lane_u64, vmovl_u8, vmovn_u16,
    vmulq_u16, vreinterpret_u64_u8, vshrq_n_u16,
};
use rgb::Rgba;

use crate::pixel::{from_word, to_word};

// ===========================================================================
// ARM NEON: rite pixel implementations
// ===========================================================================

/// Two packed pixels (low word first) through widen, multiply, shift, narrow.
#[rite]
pub(super) fn darken_pair_neon(_token: NeonToken, pair: u64, mul: uint16x8_t) -> u64 {
    let wide = vmovl_u8(vcreate_u8(pair));
    let scaled = vshrq_n_u16::<8>(vmulq_u16(wide, mul));
    vget_lane_u64::<0>(vreinterpret_u64_u8(vmovn_u16(scaled)))
}

#[rite]
pub(super) fn darken_row_neon(token: NeonToken, row: &mut [Rgba<u8>], factor: u16) {
    // Alpha lanes scale by 256 so they pass through the shift unchanged.
    let f = u64::from(factor);
    let lanes = f | (f << 16) | (f << 32) | (256 << 48);
    let mul = vcombine_u16(vcreate_u16(lanes), vcreate_u16(lanes));
    let (pairs, tail) = row.as_chunks_mut::<2>();
    for pair in pairs {
        let packed = u64::from(to_word(pair[0])) | (u64::from(to_word(pair[1])) << 32);
        let out = darken_pair_neon(token, packed, mul);
        pair[0] = from_word(out as u32);
        pair[1] = from_word((out >> 32) as u32);
    }
    for px in tail {
        *px = from_word(darken_pair_neon(token, u64::from(to_word(*px)), mul) as u32);
    }
}

// ===========================================================================
// ARM NEON: arcane dispatch target
// ===========================================================================

#[arcane]
pub(super) fn darken_impl_neon(t: NeonToken, row: &mut [Rgba<u8>], factor: u16) {
    darken_row_neon(t, row, factor);
}
