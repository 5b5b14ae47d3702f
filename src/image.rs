use crate::error::{Error, Result};
use crate::pixel::{Pixel, Rgba};

use std::ffi::OsStr;
use std::fmt;

/// The channel layout of an image's pixel buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorType {
    /// Three channels per pixel: red, green, blue.
    Rgb,
    /// Four channels per pixel: red, green, blue, alpha.
    Rgba,
}

impl ColorType {
    /// Returns the number of bytes each pixel occupies.
    #[inline]
    #[must_use]
    pub const fn channels(&self) -> usize {
        match self {
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }

    /// Returns whether the buffer carries an alpha channel.
    #[inline]
    #[must_use]
    pub const fn has_alpha_channel(&self) -> bool {
        matches!(self, Self::Rgba)
    }
}

/// An in-memory raster image.
///
/// The pixel buffer is dense and row-major, `channels` bytes per pixel. Channels 0 through 2 are
/// always red, green and blue, channel 3 (if present) is alpha.
///
/// Reduction never mutates an image: every operation borrows its input and returns a new image
/// with the same width, height, color type, alpha flag and format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Image {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) color_type: ColorType,
    pub(crate) has_alpha: bool,
    pub(crate) format: ImageFormat,
    pub(crate) data: Vec<u8>,
}

impl Image {
    /// Creates a new image from a raw pixel buffer.
    ///
    /// The alpha flag defaults to whether the color type carries an alpha channel, see
    /// [`Image::with_has_alpha`] to override it.
    ///
    /// # Errors
    /// * The length of `data` is not `width * height * channels`.
    pub fn new(width: u32, height: u32, color_type: ColorType, data: Vec<u8>) -> Result<Self> {
        let channels = color_type.channels();
        if data.len() != width as usize * height as usize * channels {
            return Err(Error::IncompatibleImageData {
                width,
                height,
                channels,
                received: data.len(),
            });
        }

        Ok(Self {
            width,
            height,
            color_type,
            has_alpha: color_type.has_alpha_channel(),
            format: ImageFormat::default(),
            data,
        })
    }

    /// Creates a new image from a slice of pixels laid out row by row.
    ///
    /// # Errors
    /// * The amount of pixels is not `width * height`.
    pub fn from_pixels<P: Pixel>(width: u32, height: u32, pixels: &[P]) -> Result<Self> {
        let mut data = Vec::with_capacity(pixels.len() * P::COLOR_TYPE.channels());
        for pixel in pixels {
            pixel.extend_bytes(&mut data);
        }

        Self::new(width, height, P::COLOR_TYPE, data)
    }

    /// Creates a new image of the given dimensions with every pixel set to `fill`.
    #[must_use]
    pub fn filled<P: Pixel>(width: u32, height: u32, fill: P) -> Self {
        let mut data = Vec::with_capacity(width as usize * height as usize * 4);
        for _ in 0..width as usize * height as usize {
            fill.extend_bytes(&mut data);
        }

        Self {
            width,
            height,
            color_type: P::COLOR_TYPE,
            has_alpha: P::COLOR_TYPE.has_alpha_channel(),
            format: ImageFormat::default(),
            data,
        }
    }

    /// Overrides the alpha flag carried alongside the image. This is nothing more than metadata,
    /// the alpha policy is driven by the buffer's [`ColorType`].
    #[must_use]
    pub fn with_has_alpha(mut self, has_alpha: bool) -> Self {
        self.has_alpha = has_alpha;
        self
    }

    /// Sets the encoding format tag of this image.
    #[must_use]
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Returns the width of the image.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the image.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns the dimensions of the image.
    #[inline]
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the amount of pixels in the image.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns true if the image contains no pixels.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the channel layout of the pixel buffer.
    #[inline]
    #[must_use]
    pub const fn color_type(&self) -> ColorType {
        self.color_type
    }

    /// Returns the number of bytes per pixel.
    #[inline]
    #[must_use]
    pub const fn channels(&self) -> usize {
        self.color_type.channels()
    }

    /// Returns the alpha flag carried with this image.
    #[inline]
    #[must_use]
    pub const fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// Returns the encoding format of the image. This is nothing more but metadata about the image.
    #[inline]
    #[must_use]
    pub const fn format(&self) -> ImageFormat {
        self.format
    }

    /// Returns the raw pixel buffer.
    #[inline]
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the image and returns the raw pixel buffer.
    #[inline]
    #[must_use]
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Returns the pixel at the given coordinates, or `None` if they are out of bounds. Images
    /// without an alpha channel report opaque pixels.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let channels = self.channels();
        let pos = (y as usize * self.width as usize + x as usize) * channels;
        let px = &self.data[pos..pos + channels];

        Some(Rgba::new(px[0], px[1], px[2], px.get(3).copied().unwrap_or(255)))
    }

    /// Returns an image with identical metadata wrapping the given data. It is up to you to make
    /// sure the data is the correct size.
    pub(crate) fn map_data(&self, data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), self.data.len());

        Self {
            width: self.width,
            height: self.height,
            color_type: self.color_type,
            has_alpha: self.has_alpha,
            format: self.format,
            data,
        }
    }
}

/// Represents the underlying encoding format of an image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    /// No known encoding is known for the image.
    ///
    /// This is usually because the image was created manually. See [`Image::with_format`]
    /// to manually set the encoding format.
    #[default]
    Unknown,

    /// The image is encoded in the PNG format.
    Png,

    /// The image is encoded in the JPEG format.
    Jpeg,

    /// The image is encoded in the GIF format.
    Gif,

    /// The image is encoded in the BMP format.
    Bmp,

    /// The image is encoded in the TIFF format.
    Tiff,

    /// The image is encoded in the WebP format.
    WebP,
}

impl ImageFormat {
    /// Returns whether the extension is unknown.
    #[inline]
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self == &Self::Unknown
    }

    /// Parses the given extension and returns the corresponding image format. Unrecognized or
    /// non UTF-8 extensions resolve to [`ImageFormat::Unknown`].
    pub fn from_extension(ext: impl AsRef<OsStr>) -> Self {
        match ext.as_ref().to_str().map(str::to_ascii_lowercase).as_deref() {
            Some("png") => Self::Png,
            Some("jpg" | "jpeg") => Self::Jpeg,
            Some("gif") => Self::Gif,
            Some("bmp") => Self::Bmp,
            Some("tif" | "tiff") => Self::Tiff,
            Some("webp") => Self::WebP,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Png => "png",
                Self::Jpeg => "jpeg",
                Self::Gif => "gif",
                Self::Bmp => "bmp",
                Self::Tiff => "tiff",
                Self::WebP => "webp",
                Self::Unknown => "",
            }
        )
    }
}
