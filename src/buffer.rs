//! Owned RGBA image buffer and its codec boundary.
//!
//! Decoding accepts whatever container formats the [`image`] crate can
//! sniff from file content and always normalizes to 4 channels. Encoding
//! always writes an 8-bit RGBA PNG.
//!
//! ```rust,no_run
//! use darken::{Lightness, PixelBuffer, Strategy};
//!
//! let mut img = PixelBuffer::load("in.jpg")?;
//! img.darken(Lightness::from(128u8), Strategy::detect());
//! img.save("out.png")?;
//! img.release();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;
use std::path::Path;

use image::{ExtendedColorType, ImageError, ImageFormat, ImageReader};
use imgref::{ImgRef, ImgVec};
use log::{debug, info};
use rgb::Rgba;

use crate::error::{DecodeError, EncodeError, SizeError};
use crate::kernel::{Strategy, darken_pixels_with};
use crate::pixel::{Lightness, Pixel};

/// A `width × height` grid of [`Pixel`]s in row-major order, no row padding.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pixels: Vec<Pixel>,
    width: usize,
    height: usize,
}

impl fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl PixelBuffer {
    /// A fully transparent black image.
    pub fn new(width: usize, height: usize) -> Result<Self, SizeError> {
        let len = width.checked_mul(height).ok_or(SizeError::Overflow)?;
        Ok(Self {
            pixels: vec![Rgba::new(0, 0, 0, 0); len],
            width,
            height,
        })
    }

    /// Wrap existing pixels. `pixels.len()` must equal `width * height`.
    pub fn from_pixels(pixels: Vec<Pixel>, width: usize, height: usize) -> Result<Self, SizeError> {
        let len = width.checked_mul(height).ok_or(SizeError::Overflow)?;
        if len != pixels.len() {
            return Err(SizeError::DimensionMismatch);
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Decode an image file, detecting the format from its content.
    ///
    /// Gray, gray+alpha, RGB and higher bit depth sources are converted to
    /// 8-bit RGBA; a missing alpha channel becomes 255.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DecodeError> {
        let path = path.as_ref();
        let decoded = ImageReader::open(path)
            .map_err(ImageError::IoError)
            .and_then(|reader| reader.with_guessed_format().map_err(ImageError::IoError))
            .and_then(|reader| reader.decode())
            .map_err(|source| DecodeError {
                path: path.to_path_buf(),
                source,
            })?;
        let color = decoded.color();
        let rgba = decoded.into_rgba8();
        let (width, height) = (rgba.width() as usize, rgba.height() as usize);
        // Reuses the decoder's allocation unless its capacity is not a whole
        // number of pixels.
        let pixels = bytemuck::allocation::try_cast_vec::<u8, Pixel>(rgba.into_raw())
            .unwrap_or_else(|(_, raw)| bytemuck::cast_slice(&raw).to_vec());
        info!(
            "loaded {} ({}x{}, {:?})",
            path.display(),
            width,
            height,
            color
        );
        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Write the buffer as an RGBA PNG with a row stride of `width * 4` bytes.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EncodeError> {
        let path = path.as_ref();
        let too_large = || EncodeError::TooLarge {
            width: self.width(),
            height: self.height(),
        };
        let width = u32::try_from(self.width()).map_err(|_| too_large())?;
        let height = u32::try_from(self.height()).map_err(|_| too_large())?;
        image::save_buffer_with_format(
            path,
            bytemuck::cast_slice(self.pixels()),
            width,
            height,
            ExtendedColorType::Rgba8,
            ImageFormat::Png,
        )
        .map_err(|source| EncodeError::Image {
            path: path.to_path_buf(),
            source,
        })?;
        info!("wrote {} ({}x{})", path.display(), width, height);
        Ok(())
    }

    /// Free the pixel memory now rather than at end of scope.
    pub fn release(self) {
        debug!(
            "releasing {}x{} pixel buffer",
            self.width(),
            self.height()
        );
        drop(self.pixels);
    }

    /// Darken every pixel in place, in index order. Returns the strategy that ran.
    pub fn darken(&mut self, lightness: Lightness, strategy: Strategy) -> Strategy {
        darken_pixels_with(self.pixels_mut(), lightness, strategy)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of pixels, always `width * height`.
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Pixel] {
        &mut self.pixels
    }

    /// Borrow as an [`imgref`] view, or `None` for an empty image.
    pub fn as_img(&self) -> Option<ImgRef<'_, Pixel>> {
        (!self.is_empty()).then(|| ImgRef::new(&self.pixels[..], self.width, self.height))
    }

    /// Hand the pixels over as an [`ImgVec`], or `None` for an empty image.
    pub fn into_img(self) -> Option<ImgVec<Pixel>> {
        (!self.is_empty()).then(|| ImgVec::new(self.pixels, self.width, self.height))
    }

    pub fn into_pixels(self) -> Vec<Pixel> {
        self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, RgbaImage};

    #[test]
    fn from_pixels_checks_length() {
        let px = Rgba::new(1, 2, 3, 4);
        assert!(PixelBuffer::from_pixels(vec![px; 6], 3, 2).is_ok());
        assert_eq!(
            PixelBuffer::from_pixels(vec![px; 5], 3, 2),
            Err(SizeError::DimensionMismatch)
        );
        assert_eq!(
            PixelBuffer::from_pixels(vec![], usize::MAX, 2),
            Err(SizeError::Overflow)
        );
    }

    #[test]
    fn new_rejects_overflowing_dimensions() {
        assert_eq!(PixelBuffer::new(usize::MAX, 2), Err(SizeError::Overflow));
        assert_eq!(PixelBuffer::new(2, usize::MAX / 2 + 1), Err(SizeError::Overflow));
        let buf = PixelBuffer::new(3, 2).unwrap();
        assert_eq!(buf.pixels(), &[Rgba::new(0, 0, 0, 0); 6]);
    }

    #[test]
    fn zero_sized_buffer_darkens_trivially() {
        let mut buf = PixelBuffer::new(0, 0).unwrap();
        assert!(buf.is_empty());
        buf.darken(Lightness::BLACK, Strategy::detect());
        assert_eq!(buf.len(), 0);
        assert!(buf.as_img().is_none());
    }

    #[test]
    fn imgref_view_matches_layout() {
        let px = Rgba::new(5, 6, 7, 8);
        let buf = PixelBuffer::from_pixels(vec![px; 6], 3, 2).unwrap();
        let img = buf.as_img().unwrap();
        assert_eq!((img.width(), img.height(), img.stride()), (3, 2, 3));
        assert_eq!(buf.into_img().unwrap().into_buf(), vec![px; 6]);
    }

    #[test]
    fn save_then_load_keeps_dimensions_and_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.png");
        let pixels = (0..12u8).map(|i| Rgba::new(i * 20, i, 255 - i, i * 10)).collect();
        let buf = PixelBuffer::from_pixels(pixels, 4, 3).unwrap();
        buf.save(&path).unwrap();

        let loaded = PixelBuffer::load(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (4, 3));
        assert_eq!(loaded, buf);
    }

    #[test]
    fn format_is_sniffed_from_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("actually_a_png.jpg");
        RgbaImage::from_pixel(2, 2, image::Rgba([1, 2, 3, 4]))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();
        let loaded = PixelBuffer::load(&path).unwrap();
        assert_eq!(loaded.pixels(), &[Rgba::new(1, 2, 3, 4); 4]);
    }

    #[test]
    fn gray_input_gets_opaque_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        GrayImage::from_pixel(3, 1, Luma([90])).save(&path).unwrap();
        let loaded = PixelBuffer::load(&path).unwrap();
        assert_eq!(loaded.pixels(), &[Rgba::new(90, 90, 90, 255); 3]);
    }

    #[test]
    fn missing_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.png");
        let err = PixelBuffer::load(&path).unwrap_err();
        assert_eq!(err.path, path);
    }

    #[test]
    fn corrupt_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("corrupt.png");
        std::fs::write(&path, [0xFF, 0xFE, 0x00, 0x01]).unwrap();
        assert!(PixelBuffer::load(&path).is_err());
    }

    #[test]
    fn unwritable_path_is_encode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("out.png");
        let err = PixelBuffer::new(1, 1).unwrap().save(&path).unwrap_err();
        assert!(matches!(err, EncodeError::Image { .. }));
        assert!(!path.exists());
    }
}
