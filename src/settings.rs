//! Reduction parameters and engine tunables.

use crate::error::{Error, Result};
use crate::resize::FilterType;

/// Distinct-color count above which palette clustering is skipped. Greedy clustering is
/// quadratic in the number of distinct colors.
pub const DEFAULT_CLUSTER_CEILING: usize = 2000;

/// Longest side of the k-means training thumbnail.
pub const DEFAULT_TRAINING_MAX_SIDE: u32 = 200;

/// Number of pixels assigned to centers per pass of the full-resolution assignment.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// The largest step size derived from a sensitivity of `1.0`.
pub const MAX_STEP: u8 = 64;

/// Describes how much, and how, an image's colors should be reduced.
///
/// Exactly one parameterization governs a call: sensitivity drives uniform quantization followed
/// by palette clustering, while an explicit color or bin count drives k-means.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Reduction {
    /// Leave the image untouched.
    None,
    /// A reduction aggressiveness between `0.0` and `1.0`. Higher means fewer colors.
    Sensitivity(f64),
    /// An explicit k-means cluster count. Must be positive.
    Colors(usize),
    /// A k-means cluster count picked from the enumerated set of bin counts.
    Bins(BinCount),
}

impl Default for Reduction {
    fn default() -> Self {
        Self::None
    }
}

impl Reduction {
    /// Checks the parameter is in range.
    ///
    /// # Errors
    /// * [`Error::InvalidSensitivity`] if the sensitivity is outside `[0.0, 1.0]` or `NaN`.
    /// * [`Error::InvalidClusterCount`] if the cluster count is zero.
    pub fn validate(&self) -> Result<()> {
        match *self {
            Self::Sensitivity(s) if !(0.0..=1.0).contains(&s) => Err(Error::InvalidSensitivity(s)),
            Self::Colors(0) => Err(Error::InvalidClusterCount(0)),
            _ => Ok(()),
        }
    }

    /// Whether this reduction is a defined no-op.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        match *self {
            Self::None => true,
            Self::Sensitivity(s) => s == 0.0,
            Self::Colors(_) | Self::Bins(_) => false,
        }
    }

    /// Returns the channel step size derived from a sensitivity: `1 + floor(s * 63)`, so `0.0`
    /// maps to the identity step of 1 and `1.0` maps to [`MAX_STEP`].
    #[must_use]
    pub fn step_for(sensitivity: f64) -> u8 {
        1 + (sensitivity.clamp(0.0, 1.0) * f64::from(MAX_STEP - 1)) as u8
    }

    /// Returns the palette merge threshold derived from a sensitivity, linear between `0.0` and
    /// [`MAX_DISTANCE`](crate::pixel::MAX_DISTANCE).
    #[must_use]
    pub fn threshold_for(sensitivity: f64) -> f64 {
        sensitivity.clamp(0.0, 1.0) * crate::pixel::MAX_DISTANCE
    }
}

impl From<BinCount> for Reduction {
    fn from(bins: BinCount) -> Self {
        Self::Bins(bins)
    }
}

/// The enumerated set of bin counts a UI is expected to offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BinCount {
    B4,
    B8,
    B16,
    B32,
    B64,
    B128,
    B256,
}

impl BinCount {
    /// All bin counts in ascending order.
    pub const ALL: [Self; 7] = [
        Self::B4,
        Self::B8,
        Self::B16,
        Self::B32,
        Self::B64,
        Self::B128,
        Self::B256,
    ];

    /// Returns the number of colors this bin count represents.
    #[must_use]
    pub const fn get(&self) -> usize {
        match self {
            Self::B4 => 4,
            Self::B8 => 8,
            Self::B16 => 16,
            Self::B32 => 32,
            Self::B64 => 64,
            Self::B128 => 128,
            Self::B256 => 256,
        }
    }
}

impl TryFrom<usize> for BinCount {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|bins| bins.get() == value)
            .ok_or(Error::InvalidBinCount(value))
    }
}

/// User-facing color reduction settings, keyed by an optional bin count.
///
/// `is_enabled` is derived from the bin count when the settings are built and whenever the bin
/// count is replaced through [`ColorReductionSettings::set_bin_count`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorReductionSettings {
    bin_count: Option<BinCount>,
    is_enabled: bool,
}

impl ColorReductionSettings {
    /// Creates new settings with the given bin count.
    #[must_use]
    pub const fn new(bin_count: Option<BinCount>) -> Self {
        Self {
            bin_count,
            is_enabled: bin_count.is_some(),
        }
    }

    /// Returns settings with the bin count replaced and the enabled flag recomputed.
    #[must_use]
    pub const fn set_bin_count(self, bin_count: Option<BinCount>) -> Self {
        Self::new(bin_count)
    }

    /// The selected bin count, if any.
    #[must_use]
    pub const fn bin_count(&self) -> Option<BinCount> {
        self.bin_count
    }

    /// Whether color reduction should be applied.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.is_enabled
    }

    /// The reduction these settings describe.
    #[must_use]
    pub fn reduction(&self) -> Reduction {
        self.bin_count.map_or(Reduction::None, Reduction::Bins)
    }
}

/// Tunables of the k-means strategy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KMeansOptions {
    /// The training set is downsampled so its longest side is at most this many pixels.
    pub training_max_side: u32,
    /// Pixels per chunk of the full-resolution assignment pass.
    pub chunk_size: usize,
    /// Upper bound on Lloyd iterations.
    pub max_iterations: usize,
    /// Iteration stops once no center moves further than this (in RGB units).
    pub epsilon: f32,
    /// Seed of the k-means++ initialization, results are deterministic for a given seed.
    pub seed: u64,
    /// Filter used to build the training thumbnail.
    pub filter: FilterType,
}

impl Default for KMeansOptions {
    fn default() -> Self {
        Self {
            training_max_side: DEFAULT_TRAINING_MAX_SIDE,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_iterations: 10,
            epsilon: 1.0,
            seed: 0x5eed,
            filter: FilterType::Box,
        }
    }
}

impl KMeansOptions {
    /// Sets the longest side of the training thumbnail. Clamped to at least 1.
    #[must_use]
    pub fn with_training_max_side(mut self, side: u32) -> Self {
        self.training_max_side = side.max(1);
        self
    }

    /// Sets the assignment chunk size. Clamped to at least 1.
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Sets the iteration bound.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence epsilon.
    #[must_use]
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the seeding RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the training thumbnail filter.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}

/// Engine tunables shared by both strategies.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReduceOptions {
    /// Palettes with more distinct colors than this skip clustering and keep the uniformly
    /// quantized result.
    pub cluster_ceiling: usize,
    /// Tunables of the k-means strategy.
    pub kmeans: KMeansOptions,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            cluster_ceiling: DEFAULT_CLUSTER_CEILING,
            kmeans: KMeansOptions::default(),
        }
    }
}

impl ReduceOptions {
    /// Creates the default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the clustering ceiling.
    #[must_use]
    pub fn with_cluster_ceiling(mut self, ceiling: usize) -> Self {
        self.cluster_ceiling = ceiling;
        self
    }

    /// Sets the k-means tunables.
    #[must_use]
    pub fn with_kmeans(mut self, kmeans: KMeansOptions) -> Self {
        self.kmeans = kmeans;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        assert!(Reduction::Sensitivity(0.0).validate().is_ok());
        assert!(Reduction::Sensitivity(1.0).validate().is_ok());
        assert!(matches!(
            Reduction::Sensitivity(-0.1).validate(),
            Err(Error::InvalidSensitivity(_))
        ));
        assert!(Reduction::Sensitivity(1.1).validate().is_err());
        assert!(Reduction::Sensitivity(f64::NAN).validate().is_err());
        assert!(matches!(
            Reduction::Colors(0).validate(),
            Err(Error::InvalidClusterCount(0))
        ));
        assert!(Reduction::Colors(3).validate().is_ok());
    }

    #[test]
    fn test_noop() {
        assert!(Reduction::None.is_noop());
        assert!(Reduction::Sensitivity(0.0).is_noop());
        assert!(!Reduction::Sensitivity(0.01).is_noop());
        assert!(!Reduction::Bins(BinCount::B4).is_noop());
    }

    #[test]
    fn test_derived_parameters() {
        assert_eq!(Reduction::step_for(0.0), 1);
        assert_eq!(Reduction::step_for(0.5), 32);
        assert_eq!(Reduction::step_for(1.0), 64);
        assert_eq!(Reduction::threshold_for(0.0), 0.0);
        assert!((Reduction::threshold_for(1.0) - 441.67).abs() < 0.01);
    }

    #[test]
    fn test_bin_count() {
        for bins in BinCount::ALL {
            assert_eq!(BinCount::try_from(bins.get()).ok(), Some(bins));
        }
        for invalid in [0usize, 1, 2, 3, 5, 10, 20, 100, 512] {
            assert!(matches!(
                BinCount::try_from(invalid),
                Err(Error::InvalidBinCount(v)) if v == invalid
            ));
        }
    }

    #[test]
    fn test_settings_derive_enabled() {
        let settings = ColorReductionSettings::default();
        assert!(!settings.is_enabled());
        assert_eq!(settings.reduction(), Reduction::None);

        let settings = settings.set_bin_count(Some(BinCount::B32));
        assert!(settings.is_enabled());
        assert_eq!(settings.reduction(), Reduction::Bins(BinCount::B32));

        let settings = settings.set_bin_count(None);
        assert!(!settings.is_enabled());
    }

    #[test]
    fn test_options_clamp() {
        let kmeans = KMeansOptions::default()
            .with_chunk_size(0)
            .with_training_max_side(0);

        assert_eq!(kmeans.chunk_size, 1);
        assert_eq!(kmeans.training_max_side, 1);
    }
}
