//! The color quantization strategies and the passes they are built from.

pub mod alpha;
pub mod cluster;
pub mod count;
pub mod kmeans;
pub mod uniform;

use crate::error::Result;
use crate::image::Image;
use crate::settings::{KMeansOptions, Reduction, DEFAULT_CLUSTER_CEILING};

/// A strategy that reduces the colors of an image.
///
/// Implementors never mutate the input and always return an image with the same dimensions and
/// metadata. Alpha sanitization is left to the caller.
pub trait Quantizer {
    /// Quantizes the RGB channels of the image into a newly allocated image.
    ///
    /// # Errors
    /// * The strategy failed internally. Callers are expected to treat this as advisory.
    fn quantize(&self, image: &Image) -> Result<Image>;
}

/// Uniform per-channel quantization followed by greedy palette clustering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformCluster {
    /// Channel step size, see [`uniform::quantize_channel`].
    pub step: u8,
    /// Palette merge distance, see [`cluster::cluster`].
    pub threshold: f64,
    /// Distinct-color count above which clustering is skipped.
    pub ceiling: usize,
}

impl UniformCluster {
    /// Derives the step size and threshold from a sensitivity in `[0.0, 1.0]`.
    #[must_use]
    pub fn from_sensitivity(sensitivity: f64) -> Self {
        Self {
            step: Reduction::step_for(sensitivity),
            threshold: Reduction::threshold_for(sensitivity),
            ceiling: DEFAULT_CLUSTER_CEILING,
        }
    }

    /// Sets the clustering ceiling.
    #[must_use]
    pub fn with_ceiling(mut self, ceiling: usize) -> Self {
        self.ceiling = ceiling;
        self
    }
}

impl Quantizer for UniformCluster {
    fn quantize(&self, image: &Image) -> Result<Image> {
        let channels = image.channels();
        let mut data = image.data().to_vec();

        uniform::quantize_in_place(&mut data, channels, self.step);
        let clustered = cluster::merge_in_place(&mut data, channels, self.threshold, self.ceiling);
        tracing::debug!(
            step = self.step,
            threshold = self.threshold,
            clustered,
            "uniform quantization"
        );

        Ok(image.map_data(data))
    }
}

/// K-means clustering trained on a thumbnail and applied at full resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KMeans {
    /// The requested number of colors.
    pub k: usize,
    /// Solver tunables.
    pub options: KMeansOptions,
}

impl KMeans {
    /// Creates a k-means strategy with default tunables.
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            options: KMeansOptions::default(),
        }
    }

    /// Sets the solver tunables.
    #[must_use]
    pub fn with_options(mut self, options: KMeansOptions) -> Self {
        self.options = options;
        self
    }
}

impl Quantizer for KMeans {
    fn quantize(&self, image: &Image) -> Result<Image> {
        let channels = image.channels();
        let mut data = image.data().to_vec();

        // The canonical transparent color takes one of the k slots.
        let k = if alpha::has_transparent_pixels(&data, channels) {
            self.k.saturating_sub(1).max(1)
        } else {
            self.k
        };

        kmeans::quantize_in_place(
            &mut data,
            image.width(),
            image.height(),
            channels,
            k,
            &self.options,
        )?;

        Ok(image.map_data(data))
    }
}

/// The closed set of strategies the reducer dispatches between.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Strategy {
    UniformCluster(UniformCluster),
    KMeans(KMeans),
}

impl Quantizer for Strategy {
    fn quantize(&self, image: &Image) -> Result<Image> {
        match self {
            Self::UniformCluster(strategy) => strategy.quantize(image),
            Self::KMeans(strategy) => strategy.quantize(image),
        }
    }
}
