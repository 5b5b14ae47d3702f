//! A color reduction engine for RGB(A) rasters.
//!
//! Two strategies are offered behind a single entry point, [`reduce_colors`]:
//!
//! * [`Reduction::Sensitivity`] rounds every channel to a coarser grid and then greedily merges
//!   palette colors that lie close together, replacing each group with its pixel-weighted
//!   average.
//! * [`Reduction::Colors`] and [`Reduction::Bins`] run k-means on a thumbnail of the image and
//!   assign every full-resolution pixel to its nearest center.
//!
//! Images with an alpha channel have it binarized afterwards, with every transparent pixel
//! collapsed into `(0, 0, 0, 0)`.
//!
//! ```
//! use chromacut::prelude::*;
//!
//! let image = Image::filled(4, 4, Rgb::new(100, 150, 200));
//! let reduced = reduce_colors(&image, Reduction::Sensitivity(0.5))?;
//!
//! assert_eq!(reduced.dimensions(), (4, 4));
//! assert_eq!(count_distinct_colors(&reduced), 1);
//! # Ok::<(), chromacut::Error>(())
//! ```

pub mod error;
pub mod image;
pub mod pixel;
pub mod quantize;
pub mod reduce;
pub mod resize;
pub mod settings;
pub mod stats;

pub use error::{Error, Result};
pub use image::{ColorType, Image, ImageFormat};
pub use pixel::{Pixel, Rgb, Rgba, MAX_DISTANCE};
pub use quantize::alpha::binarize_alpha;
pub use quantize::count::count_distinct;
pub use quantize::{KMeans, Quantizer, Strategy, UniformCluster};
pub use reduce::{count_distinct_colors, reduce_colors, ColorReducer};
pub use resize::FilterType;
pub use settings::{BinCount, ColorReductionSettings, KMeansOptions, ReduceOptions, Reduction};
pub use stats::ImageStatistics;

pub mod prelude {
    pub use super::{
        count_distinct_colors, reduce_colors, BinCount, ColorReducer, ColorType, Image, Pixel,
        Reduction, Rgb, Rgba,
    };
}
