// ---------------------------------------------------------------------------
// Fixed-point darkening kernel with SIMD dispatch.
//
// Architecture: #[rite] pixel functions hold the vector arithmetic,
// #[arcane] row wrappers are the incant! targets. The scalar row is both
// the fallback tier and the explicitly requested Strategy::Scalar.
// ---------------------------------------------------------------------------

use core::fmt;

use archmage::SimdToken;
use archmage::incant;
use imgref::ImgRefMut;
use log::debug;
use rgb::Rgba;

use crate::SizeError;
use crate::pixel::Lightness;

mod scalar;
use scalar::*;

#[cfg(target_arch = "x86_64")]
mod avx2;
#[cfg(target_arch = "x86_64")]
use avx2::*;

#[cfg(target_arch = "aarch64")]
mod neon;
#[cfg(target_arch = "aarch64")]
use neon::*;

#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
use wasm::*;


// ===========================================================================
// Strategy selection
// ===========================================================================

/// How the kernel runs. Both variants produce byte-identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One pixel at a time with plain integer arithmetic.
    Scalar,
    /// 16-bit vector lanes: AVX2 on x86-64, NEON on AArch64, SIMD128 on WASM.
    Vector,
}

impl Strategy {
    /// The fastest strategy this CPU supports.
    pub fn detect() -> Self {
        if simd_available() {
            Self::Vector
        } else {
            Self::Scalar
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Vector => "vector",
        }
    }

    /// The strategy that will actually run when `self` is requested.
    fn resolve(self) -> Self {
        match self {
            Self::Scalar => Self::Scalar,
            Self::Vector if simd_available() => Self::Vector,
            Self::Vector => {
                debug!("no supported SIMD tier on this CPU, falling back to scalar");
                Self::Scalar
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(target_arch = "x86_64")]
fn simd_available() -> bool {
    archmage::X64V3Token::summon().is_some()
}

#[cfg(target_arch = "aarch64")]
fn simd_available() -> bool {
    archmage::NeonToken::summon().is_some()
}

#[cfg(target_arch = "wasm32")]
fn simd_available() -> bool {
    archmage::Wasm128Token::summon().is_some()
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64", target_arch = "wasm32")))]
fn simd_available() -> bool {
    false
}

// ===========================================================================
// Public API
// ===========================================================================

/// Darken every pixel in place with the fastest available strategy.
///
/// Each color channel becomes `(c * lightness) >> 8`, truncated to 8 bits.
/// Alpha is never touched. Returns the strategy that ran.
pub fn darken_pixels(pixels: &mut [Rgba<u8>], lightness: Lightness) -> Strategy {
    darken_pixels_with(pixels, lightness, Strategy::Vector)
}

/// Darken every pixel in place with the requested strategy.
///
/// Requesting [`Strategy::Vector`] on a CPU without a supported SIMD tier
/// runs the scalar kernel instead; the return value says which one ran.
pub fn darken_pixels_with(
    pixels: &mut [Rgba<u8>],
    lightness: Lightness,
    strategy: Strategy,
) -> Strategy {
    let factor = lightness.factor();
    match strategy.resolve() {
        Strategy::Scalar => {
            darken_row_scalar(pixels, factor);
            Strategy::Scalar
        }
        Strategy::Vector => {
            incant!(darken_impl(pixels, factor), [v3, neon, wasm128, scalar]);
            Strategy::Vector
        }
    }
}

/// Darken a single pixel.
pub fn darken_pixel(px: Rgba<u8>, lightness: Lightness, strategy: Strategy) -> Rgba<u8> {
    let mut one = [px];
    darken_pixels_with(&mut one, lightness, strategy);
    one[0]
}

/// Darken raw RGBA bytes in place.
///
/// The length must be a multiple of 4. An empty buffer is valid.
pub fn darken_rgba_inplace(buf: &mut [u8], lightness: Lightness) -> Result<(), SizeError> {
    let pixels: &mut [Rgba<u8>] =
        bytemuck::try_cast_slice_mut(buf).map_err(|_| SizeError::NotPixelAligned)?;
    darken_pixels(pixels, lightness);
    Ok(())
}

/// Darken a possibly strided image row by row.
///
/// Padding between rows is never read or written.
pub fn darken_img(mut img: ImgRefMut<'_, Rgba<u8>>, lightness: Lightness) -> Strategy {
    let strategy = Strategy::detect();
    for row in img.rows_mut() {
        darken_pixels_with(row, lightness, strategy);
    }
    strategy
}
