//! Pixel and color types.

use crate::error::{Error, Result};
use crate::image::ColorType;

/// The largest possible Euclidean distance between two RGB colors, `sqrt(3) * 255`.
pub const MAX_DISTANCE: f64 = 441.672_955_930_063_7;

/// Represents any type of pixel that can be stored in an [`Image`](crate::Image).
pub trait Pixel: Copy + Clone + Default + PartialEq + Eq {
    /// The color type an image of this pixel is stored as.
    const COLOR_TYPE: ColorType;

    /// Returns the alpha, or opacity level of the pixel.
    ///
    /// This is a value between 0 and 255.
    /// 0 is completely transparent, and 255 is completely opaque.
    fn alpha(&self) -> u8;

    /// Returns the color of this pixel with the alpha channel dropped.
    fn rgb(&self) -> Rgb;

    /// Appends the raw channel bytes of this pixel to the given buffer.
    fn extend_bytes(&self, out: &mut Vec<u8>);
}

/// Represents an RGB color.
///
/// This is the palette key used throughout the reduction engine: two colors are equal if and
/// only if all three channels match exactly.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    /// The red component of the pixel.
    pub r: u8,
    /// The green component of the pixel.
    pub g: u8,
    /// The blue component of the pixel.
    pub b: u8,
}

impl Pixel for Rgb {
    const COLOR_TYPE: ColorType = ColorType::Rgb;

    fn alpha(&self) -> u8 {
        255
    }

    fn rgb(&self) -> Rgb {
        *self
    }

    fn extend_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.r, self.g, self.b]);
    }
}

impl Rgb {
    /// Creates a new RGB pixel.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Creates a completely black pixel.
    #[must_use]
    pub const fn black() -> Self {
        Self::new(0, 0, 0)
    }

    /// Creates a completely white pixel.
    #[must_use]
    pub const fn white() -> Self {
        Self::new(255, 255, 255)
    }

    /// Reads the first three bytes of the given slice as a color.
    ///
    /// # Panics
    /// * The slice has fewer than three elements.
    #[inline]
    #[must_use]
    pub fn from_slice(channels: &[u8]) -> Self {
        Self::new(channels[0], channels[1], channels[2])
    }

    /// Returns the channels of this color as an array.
    #[inline]
    #[must_use]
    pub const fn as_array(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Returns the squared Euclidean distance between two colors.
    #[inline]
    #[must_use]
    pub fn distance_squared(&self, other: &Self) -> u32 {
        let dr = i32::from(self.r) - i32::from(other.r);
        let dg = i32::from(self.g) - i32::from(other.g);
        let db = i32::from(self.b) - i32::from(other.b);

        (dr * dr + dg * dg + db * db) as u32
    }

    /// Returns the Euclidean distance between two colors in RGB space. This is always a value
    /// between `0.0` and [`MAX_DISTANCE`].
    #[inline]
    #[must_use]
    pub fn distance(&self, other: &Self) -> f64 {
        f64::from(self.distance_squared(other)).sqrt()
    }

    /// Parses an RGB value from a hex code in the format `#RGB` or `#RRGGBB`. The leading `#` is
    /// optional.
    ///
    /// # Errors
    /// * The hex code is malformed.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let Rgba { r, g, b, a } = Rgba::from_hex(hex)?;

        if a != 255 {
            return Err(Error::InvalidHexCode(hex.to_string()));
        }
        Ok(Self { r, g, b })
    }

    /// Formats this color as an uppercase `#RRGGBB` hex code.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Represents an RGBA pixel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba {
    /// The red component of the pixel.
    pub r: u8,
    /// The green component of the pixel.
    pub g: u8,
    /// The blue component of the pixel.
    pub b: u8,
    /// The alpha component of the pixel.
    pub a: u8,
}

impl Pixel for Rgba {
    const COLOR_TYPE: ColorType = ColorType::Rgba;

    fn alpha(&self) -> u8 {
        self.a
    }

    fn rgb(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }

    fn extend_bytes(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[self.r, self.g, self.b, self.a]);
    }
}

impl Rgba {
    /// Creates a new RGBA pixel.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque pixel from an RGB pixel.
    #[must_use]
    pub const fn from_rgb(Rgb { r, g, b }: Rgb) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Creates a completely transparent pixel. This is the canonical transparent color, all
    /// fully transparent pixels are collapsed into it by the alpha policy.
    #[must_use]
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Creates an opaque black pixel.
    #[must_use]
    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    /// Creates an opaque white pixel.
    #[must_use]
    pub const fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parses an RGBA value from a hex code in the format `#RGB`, `#RRGGBB`, or `#RRGGBBAA`.
    /// The leading `#` is optional. Hex codes without an alpha component are opaque.
    ///
    /// # Errors
    /// * The hex code is malformed.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        let invalid = || Error::InvalidHexCode(hex.to_string());

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).map_err(|_| invalid());

        match digits.len() {
            3 => {
                let nibble = |i: usize| {
                    u8::from_str_radix(&digits[i..=i], 16)
                        .map(|v| v * 17)
                        .map_err(|_| invalid())
                };
                Ok(Self::new(nibble(0)?, nibble(1)?, nibble(2)?, 255))
            }
            6 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::new(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(invalid()),
        }
    }

    /// Formats this pixel as an uppercase `#RRGGBBAA` hex code.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

impl From<Rgba> for Rgb {
    fn from(Rgba { r, g, b, .. }: Rgba) -> Self {
        Self { r, g, b }
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        Self::from_rgb(rgb)
    }
}
