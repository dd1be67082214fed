//! Pixel record and lightness factor.
//!
//! A [`Pixel`] is four `u8` channels laid out R, G, B, A from the lowest to
//! the highest address, which is the byte order of one little-endian `u32`.
//! Code that needs the packed form goes through [`to_word`] / [`from_word`]
//! instead of reinterpreting memory.

use core::str::FromStr;

use rgb::Rgba;

use crate::error::ParseLightnessError;

/// One 8-bit-per-channel RGBA pixel.
pub type Pixel = Rgba<u8>;

/// Pack a pixel into a little-endian word: R in bits 0..8, A in bits 24..32.
#[inline(always)]
pub fn to_word(px: Pixel) -> u32 {
    u32::from_le_bytes([px.r, px.g, px.b, px.a])
}

/// Inverse of [`to_word`].
#[inline(always)]
pub fn from_word(word: u32) -> Pixel {
    let [r, g, b, a] = word.to_le_bytes();
    Rgba { r, g, b, a }
}

/// Multiplicative scale applied to color channels as `(c * l) >> 8`.
///
/// Nominally `0..=255`. Larger factors are kept rather than clamped: the
/// kernel truncates each product to 8 bits, so they wrap. Only the low 16
/// bits of a factor can influence output, since bits 8..16 of `c * l`
/// depend only on `l mod 65536`; that is all this type stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Lightness(u16);

impl Lightness {
    /// Every color channel becomes 0.
    pub const BLACK: Self = Self(0);
    /// Top of the nominal range. Slightly darkens (`255/256`).
    pub const MAX_NOMINAL: Self = Self(255);
    /// `(c * 256) >> 8 == c`: leaves every channel unchanged.
    pub const IDENTITY: Self = Self(256);

    pub const fn new(factor: u16) -> Self {
        Self(factor)
    }

    /// Interpret a user-supplied level.
    ///
    /// Non-positive levels darken fully. Positive levels keep their low 16
    /// bits, which gives the same output as full-width unsigned arithmetic.
    pub fn from_level(level: i64) -> Self {
        if level <= 0 {
            Self::BLACK
        } else {
            Self(level as u16)
        }
    }

    #[inline(always)]
    pub const fn factor(self) -> u16 {
        self.0
    }

    /// True for factors above [`Lightness::MAX_NOMINAL`], whose output wraps.
    pub const fn is_out_of_range(self) -> bool {
        self.0 > Self::MAX_NOMINAL.0
    }
}

/// Decimal level of any length, with an optional sign.
///
/// Follows [`Lightness::from_level`] for levels too long for an `i64`:
/// negative gives black, positive keeps its value mod 65536.
impl FromStr for Lightness {
    type Err = ParseLightnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseLightnessError(s.to_owned());
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if negative {
            return Ok(Self::BLACK);
        }
        let low = digits.bytes().fold(0u16, |acc, b| {
            acc.wrapping_mul(10).wrapping_add(u16::from(b - b'0'))
        });
        Ok(Self(low))
    }
}

impl From<u8> for Lightness {
    fn from(level: u8) -> Self {
        Self(u16::from(level))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_is_little_endian_rgba() {
        let px = Rgba { r: 0x11, g: 0x22, b: 0x33, a: 0x44 };
        assert_eq!(to_word(px), 0x4433_2211);
        assert_eq!(from_word(0x4433_2211), px);
    }

    #[test]
    fn negative_levels_are_black() {
        assert_eq!(Lightness::from_level(-1), Lightness::BLACK);
        assert_eq!(Lightness::from_level(i64::MIN), Lightness::BLACK);
        assert_eq!(Lightness::from_level(0), Lightness::BLACK);
    }

    #[test]
    fn positive_levels_keep_low_bits() {
        assert_eq!(Lightness::from_level(128).factor(), 128);
        assert_eq!(Lightness::from_level(256), Lightness::IDENTITY);
        assert_eq!(Lightness::from_level(65536 + 7).factor(), 7);
        assert!(Lightness::from_level(300).is_out_of_range());
        assert!(!Lightness::from(255u8).is_out_of_range());
    }

    #[test]
    fn parse_accepts_levels_of_any_length() {
        let parse = |s: &str| s.parse::<Lightness>().map(Lightness::factor);
        assert_eq!(parse("128"), Ok(128));
        assert_eq!(parse("+12"), Ok(12));
        assert_eq!(parse("0007"), Ok(7));
        assert_eq!(parse("65543"), Ok(7));
        // 10^20 is a multiple of 2^16, so 10^20 - 1 wraps to 65535.
        assert_eq!(parse("99999999999999999999"), Ok(65535));
        assert_eq!(parse("-5"), Ok(0));
        assert_eq!(parse("-99999999999999999999"), Ok(0));
    }

    #[test]
    fn parse_matches_from_level_within_i64() {
        for level in [-70000i64, -1, 0, 1, 255, 256, 300, 65535, 65536, 1 << 40, i64::MAX] {
            assert_eq!(
                level.to_string().parse::<Lightness>(),
                Ok(Lightness::from_level(level)),
                "level={level}"
            );
        }
    }

    #[test]
    fn parse_rejects_non_integers() {
        for s in ["", "-", "+", "dark", "1.5", "12a", " 12", "--3"] {
            assert_eq!(
                s.parse::<Lightness>(),
                Err(ParseLightnessError(s.to_owned())),
                "{s:?}"
            );
        }
    }
}
