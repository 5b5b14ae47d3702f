//! Live statistics a host displays next to the image.

use crate::image::Image;
use crate::pixel::Rgb;
use crate::reduce::count_distinct_colors;

/// Computed information about the current state of an image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageStatistics {
    /// Number of distinct colors, see [`count_distinct_colors`].
    pub distinct_color_count: usize,
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Hex code of the pixel under the cursor, if any.
    pub hover_hex_color: Option<String>,
}

impl ImageStatistics {
    /// Records the color of the pixel at the given coordinates as the hovered color, `#RRGGBB`
    /// for images without an alpha channel and `#RRGGBBAA` otherwise. Out of bounds coordinates
    /// clear it.
    #[must_use]
    pub fn with_hover(mut self, image: &Image, x: u32, y: u32) -> Self {
        self.hover_hex_color = image.pixel(x, y).map(|px| {
            if image.color_type().has_alpha_channel() {
                px.to_hex()
            } else {
                Rgb::from(px).to_hex()
            }
        });
        self
    }
}

impl Image {
    /// Computes the statistics of this image.
    #[must_use]
    pub fn statistics(&self) -> ImageStatistics {
        ImageStatistics {
            distinct_color_count: count_distinct_colors(self),
            width: self.width,
            height: self.height,
            hover_hex_color: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::image::Image;
    use crate::pixel::{Rgb, Rgba};

    #[test]
    fn test_statistics() -> crate::Result<()> {
        let image = Image::from_pixels(2, 1, &[Rgb::new(255, 87, 51), Rgb::black()])?;
        let stats = image.statistics().with_hover(&image, 0, 0);

        assert_eq!(stats.distinct_color_count, 2);
        assert_eq!((stats.width, stats.height), (2, 1));
        assert_eq!(stats.hover_hex_color.as_deref(), Some("#FF5733"));
        assert_eq!(stats.with_hover(&image, 5, 0).hover_hex_color, None);
        Ok(())
    }

    #[test]
    fn test_hover_includes_alpha() {
        let image = Image::filled(1, 1, Rgba::new(1, 2, 3, 4));
        let stats = image.statistics().with_hover(&image, 0, 0);

        assert_eq!(stats.hover_hex_color.as_deref(), Some("#01020304"));
    }
}
