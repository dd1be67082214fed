use std::path::PathBuf;

use image::ImageError;

/// A buffer did not satisfy the pixel layout an operation requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SizeError {
    /// Byte length is not a multiple of 4 (one RGBA pixel).
    #[error("buffer length is not a multiple of the 4-byte pixel size")]
    NotPixelAligned,
    /// Pixel count is not `width × height`.
    #[error("pixel count does not match width × height")]
    DimensionMismatch,
    /// `width × height` does not fit in `usize`.
    #[error("width × height overflows the address space")]
    Overflow,
}

/// A lightness level was not a decimal integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid lightness level {0:?}, expected an integer")]
pub struct ParseLightnessError(pub String);

/// The input image could not be read, or its content could not be decoded.
#[derive(Debug, thiserror::Error)]
#[error("cannot load image {}", path.display())]
pub struct DecodeError {
    pub path: PathBuf,
    #[source]
    pub source: ImageError,
}

/// The output image could not be written.
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("cannot write PNG to {}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: ImageError,
    },
    /// Dimensions exceed what the PNG encoder accepts.
    #[error("image of {width}x{height} pixels is too large to encode")]
    TooLarge { width: usize, height: usize },
}
