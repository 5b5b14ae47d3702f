//! An interfacing layer between fast_image_resize and this crate, used to build the k-means
//! training thumbnail.

use crate::error::Result;
use fast_image_resize::{FilterType as ResizeFilterType, Image as ResizeImage, PixelType};
use fast_image_resize::{ResizeAlg, Resizer};
use std::num::NonZeroU32;

/// A filtering algorithm that is used to resize an image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FilterType {
    /// A simple nearest neighbor algorithm. Although the fastest, this gives the lowest quality
    /// resizings.
    Nearest,
    /// A box filter algorithm. When downscaling this averages the area each output pixel covers,
    /// which keeps the thumbnail's palette representative of the source.
    #[default]
    Box,
    /// A bilinear filter. Calculates output pixel value using linear interpolation on all pixels.
    Bilinear,
    /// While having similar performance as the [`Bilinear`] filter, this produces a sharper and
    /// usually considered better quality image than the [`Bilinear`] filter, but **only** when
    /// downscaling.
    Hamming,
    /// A Catmull-Rom bicubic filter.
    Bicubic,
    /// A Mitchell-Netravali bicubic filter.
    Mitchell,
    /// A Lanczos filter with a window of 3.
    Lanczos3,
}

impl From<FilterType> for ResizeAlg {
    fn from(f: FilterType) -> Self {
        type F = ResizeFilterType;

        ResizeAlg::Convolution(match f {
            FilterType::Nearest => return ResizeAlg::Nearest,
            FilterType::Box => F::Box,
            FilterType::Bilinear => F::Bilinear,
            FilterType::Hamming => F::Hamming,
            FilterType::Bicubic => F::CatmullRom,
            FilterType::Mitchell => F::Mitchell,
            FilterType::Lanczos3 => F::Lanczos3,
        })
    }
}

/// Returns the dimensions of a thumbnail whose longest side is at most `max_side`, preserving
/// the aspect ratio. Dimensions that already fit are returned unchanged.
#[must_use]
pub fn training_dimensions(width: u32, height: u32, max_side: u32) -> (u32, u32) {
    let longest = width.max(height);
    let max_side = max_side.max(1);
    if longest <= max_side {
        return (width, height);
    }

    let scale = f64::from(max_side) / f64::from(longest);
    let fit = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, max_side);

    (fit(width), fit(height))
}

/// Downsamples a packed RGB buffer so its longest side is at most `max_side`.
///
/// Returns the resized buffer along with its dimensions. Buffers that already fit, and empty
/// buffers, are copied as is.
///
/// # Errors
/// * The buffer does not match the given dimensions.
pub fn downsample_rgb(
    rgb: &[u8],
    width: u32,
    height: u32,
    max_side: u32,
    filter: FilterType,
) -> Result<(Vec<u8>, u32, u32)> {
    let (dst_width, dst_height) = training_dimensions(width, height, max_side);
    let (src_w, src_h, dst_w, dst_h) = match (
        NonZeroU32::new(width),
        NonZeroU32::new(height),
        NonZeroU32::new(dst_width),
        NonZeroU32::new(dst_height),
    ) {
        (Some(a), Some(b), Some(c), Some(d)) if (dst_width, dst_height) != (width, height) => {
            (a, b, c, d)
        }
        _ => return Ok((rgb.to_vec(), width, height)),
    };

    let src = ResizeImage::from_vec_u8(src_w, src_h, rgb.to_vec(), PixelType::U8x3)?;
    let mut dst = ResizeImage::new(dst_w, dst_h, PixelType::U8x3);

    let mut resizer = Resizer::new(filter.into());
    resizer.resize(&src.view(), &mut dst.view_mut())?;

    Ok((dst.into_vec(), dst_width, dst_height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_dimensions() {
        assert_eq!(training_dimensions(100, 50, 200), (100, 50));
        assert_eq!(training_dimensions(2000, 2000, 200), (200, 200));
        assert_eq!(training_dimensions(2000, 1000, 200), (200, 100));
        assert_eq!(training_dimensions(4000, 1, 200), (200, 1));
        assert_eq!(training_dimensions(0, 0, 200), (0, 0));
    }

    #[test]
    fn test_downsample_uniform_color_is_preserved() -> Result<()> {
        let rgb = [10u8, 120, 230].repeat(400 * 300);
        let (small, w, h) = downsample_rgb(&rgb, 400, 300, 200, FilterType::Box)?;

        assert_eq!((w, h), (200, 150));
        assert_eq!(small.len(), 200 * 150 * 3);
        for px in small.chunks_exact(3) {
            for (got, want) in px.iter().zip([10u8, 120, 230]) {
                assert!(got.abs_diff(want) <= 1);
            }
        }
        Ok(())
    }

    #[test]
    fn test_downsample_small_image_is_copied() -> Result<()> {
        let rgb = vec![1, 2, 3, 4, 5, 6];
        let (out, w, h) = downsample_rgb(&rgb, 2, 1, 200, FilterType::Box)?;

        assert_eq!((out, w, h), (rgb, 2, 1));
        Ok(())
    }
}
