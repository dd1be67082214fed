//! # darken
//!
//! Scale the color channels of an RGBA image by `lightness / 256` in
//! fixed point: `c' = (c * lightness) >> 8`, truncated to 8 bits. Alpha is
//! left alone.
//!
//! The kernel runs on x86-64 AVX2, ARM NEON, and WASM SIMD128 with
//! automatic fallback to scalar code. Every tier produces the same bytes.
//!
//! ## Core operations
//!
//! [`darken_pixels`] and friends work on `&mut [Rgba<u8>]` slices, raw RGBA
//! bytes, or strided [`imgref`] images. [`PixelBuffer`] adds decoding from
//! any format the [`image`] crate sniffs and encoding to RGBA PNG.
//!
//! ```rust
//! use darken::{Lightness, Strategy, darken_pixel};
//! use rgb::Rgba;
//!
//! let px = Rgba::new(200u8, 100, 50, 255);
//! let out = darken_pixel(px, Lightness::from(128u8), Strategy::detect());
//! assert_eq!(out, Rgba::new(100, 50, 25, 255));
//! ```
//!
//! ## Feature flags
//!
//! - **`cli`** (default): builds the `darken` binary, pulling in `clap`,
//!   `anyhow` and `env_logger`.

#![forbid(unsafe_code)]

mod buffer;
mod error;
mod kernel;
pub mod pixel;

pub use buffer::PixelBuffer;
pub use error::{DecodeError, EncodeError, ParseLightnessError, SizeError};
pub use kernel::*;
pub use pixel::{Lightness, Pixel};
