//! Alpha sanitization applied to every reduced image.

use crate::image::Image;

/// Alpha values at or above this become opaque, anything below becomes fully transparent.
pub const ALPHA_THRESHOLD: u8 = 128;

/// Binarizes the alpha channel of a packed RGBA buffer and zeroes the color of every pixel that
/// ends up transparent, so all of them become the canonical `(0, 0, 0, 0)`.
///
/// Buffers without an alpha channel are left untouched.
pub fn binarize_in_place(data: &mut [u8], channels: usize) {
    if channels != 4 {
        return;
    }

    for px in data.chunks_exact_mut(4) {
        if px[3] >= ALPHA_THRESHOLD {
            px[3] = 255;
        } else {
            px.fill(0);
        }
    }
}

/// Returns a copy of the image with its alpha channel binarized, see [`binarize_in_place`].
#[must_use]
pub fn binarize_alpha(image: &Image) -> Image {
    let mut data = image.data().to_vec();
    binarize_in_place(&mut data, image.channels());

    image.map_data(data)
}

/// Whether binarizing this buffer would produce at least one transparent pixel.
#[must_use]
pub fn has_transparent_pixels(data: &[u8], channels: usize) -> bool {
    channels == 4 && data.chunks_exact(4).any(|px| px[3] < ALPHA_THRESHOLD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ColorType;
    use crate::pixel::Rgba;

    #[test]
    fn test_binarize() {
        let mut data = [9, 8, 7, 0, 9, 8, 7, 127, 9, 8, 7, 128, 9, 8, 7, 255];
        binarize_in_place(&mut data, 4);

        assert_eq!(data, [0, 0, 0, 0, 0, 0, 0, 0, 9, 8, 7, 255, 9, 8, 7, 255]);
    }

    #[test]
    fn test_rgb_is_identity() {
        let mut data = [9, 8, 7, 0, 1, 2];
        binarize_in_place(&mut data, 3);

        assert_eq!(data, [9, 8, 7, 0, 1, 2]);
        assert!(!has_transparent_pixels(&data, 3));
    }

    #[test]
    fn test_binarize_alpha_returns_new_image() -> crate::Result<()> {
        let image = Image::from_pixels(2, 1, &[Rgba::new(1, 2, 3, 4), Rgba::new(5, 6, 7, 200)])?;
        let out = binarize_alpha(&image);

        assert_eq!(out.color_type(), ColorType::Rgba);
        assert_eq!(out.data(), [0, 0, 0, 0, 5, 6, 7, 255]);
        assert_eq!(image.data(), [1, 2, 3, 4, 5, 6, 7, 200]);
        Ok(())
    }
}
