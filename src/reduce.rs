//! The single entry point of the engine.

use crate::error::Result;
use crate::image::Image;
use crate::quantize::{alpha, count, KMeans, Quantizer, Strategy, UniformCluster};
use crate::settings::{ColorReductionSettings, ReduceOptions, Reduction};

/// Reduces the number of distinct colors in images.
///
/// The reducer holds no state besides its tunables, every call is a pure function of its inputs.
/// Inputs are only ever borrowed and the output is always a freshly allocated image with the
/// input's width, height, color type, alpha flag and format.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ColorReducer {
    options: ReduceOptions,
}

impl ColorReducer {
    /// Creates a reducer with the default tunables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reducer with the given tunables.
    #[must_use]
    pub const fn with_options(options: ReduceOptions) -> Self {
        Self { options }
    }

    /// Returns the tunables of this reducer.
    #[must_use]
    pub const fn options(&self) -> &ReduceOptions {
        &self.options
    }

    /// Returns the strategy a reduction dispatches to, or `None` for a no-op.
    #[must_use]
    pub fn strategy(&self, reduction: Reduction) -> Option<Strategy> {
        let kmeans = |k| Strategy::KMeans(KMeans::new(k).with_options(self.options.kmeans));

        match reduction {
            Reduction::Sensitivity(s) if s > 0.0 => Some(Strategy::UniformCluster(
                UniformCluster::from_sensitivity(s).with_ceiling(self.options.cluster_ceiling),
            )),
            Reduction::Colors(k) => Some(kmeans(k)),
            Reduction::Bins(bins) => Some(kmeans(bins.get())),
            Reduction::None | Reduction::Sensitivity(_) => None,
        }
    }

    /// Reduces the colors of `image`.
    ///
    /// A no-op reduction (see [`Reduction::is_noop`]) and an empty image both produce an
    /// unchanged copy. Otherwise the image is quantized by the selected strategy and then its
    /// alpha channel, if any, is binarized.
    ///
    /// # Errors
    /// * The reduction parameter is out of range, see [`Reduction::validate`].
    ///
    /// Failures inside a strategy are not errors: they are logged and an unchanged copy of the
    /// input is returned.
    pub fn reduce(&self, image: &Image, reduction: Reduction) -> Result<Image> {
        reduction.validate()?;

        let strategy = match self.strategy(reduction) {
            Some(strategy) if !image.is_empty() => strategy,
            _ => return Ok(image.clone()),
        };
        tracing::debug!(
            ?strategy,
            width = image.width(),
            height = image.height(),
            "reducing colors"
        );

        Ok(apply(image, &strategy))
    }

    /// Reduces the colors of `image` as described by user settings. Disabled settings produce an
    /// unchanged copy.
    ///
    /// # Errors
    /// * See [`ColorReducer::reduce`].
    pub fn reduce_with_settings(
        &self,
        image: &Image,
        settings: &ColorReductionSettings,
    ) -> Result<Image> {
        if !settings.is_enabled() {
            return Ok(image.clone());
        }

        self.reduce(image, settings.reduction())
    }
}

/// Runs a quantizer and sanitizes the alpha channel of its output. A failing quantizer yields an
/// unchanged copy of the input.
fn apply(image: &Image, quantizer: &impl Quantizer) -> Image {
    let quantized = match quantizer.quantize(image) {
        Ok(quantized) => quantized,
        Err(err) => {
            tracing::warn!(%err, "color reduction failed, keeping the image unchanged");
            return image.clone();
        }
    };

    let channels = quantized.channels();
    let mut data = quantized.into_data();
    alpha::binarize_in_place(&mut data, channels);

    image.map_data(data)
}

/// Reduces the colors of `image` with the default tunables.
///
/// # Errors
/// * See [`ColorReducer::reduce`].
pub fn reduce_colors(image: &Image, reduction: Reduction) -> Result<Image> {
    ColorReducer::new().reduce(image, reduction)
}

/// Counts the distinct colors of an image. Fully transparent pixels count as a single color.
#[must_use]
pub fn count_distinct_colors(image: &Image) -> usize {
    count::count_distinct(image.data(), image.channels())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ColorType;
    use crate::pixel::{Rgb, Rgba};
    use crate::settings::{BinCount, KMeansOptions};
    use crate::Error;

    fn gradient(size: u32) -> Image {
        let pixels: Vec<Rgb> = (0..size * size)
            .map(|i| {
                let (x, y) = (i % size, i / size);
                Rgb::new((x * 25) as u8, (y * 25) as u8, ((x + y) * 12) as u8)
            })
            .collect();

        Image::from_pixels(size, size, &pixels).unwrap()
    }

    #[test]
    fn test_strategy_dispatch() {
        let reducer = ColorReducer::new();

        assert_eq!(reducer.strategy(Reduction::None), None);
        assert_eq!(reducer.strategy(Reduction::Sensitivity(0.0)), None);
        assert!(matches!(
            reducer.strategy(Reduction::Sensitivity(0.5)),
            Some(Strategy::UniformCluster(UniformCluster { step: 32, .. }))
        ));
        assert!(matches!(
            reducer.strategy(Reduction::Bins(BinCount::B16)),
            Some(Strategy::KMeans(KMeans { k: 16, .. }))
        ));
    }

    #[test]
    fn test_options_are_forwarded() {
        let options = ReduceOptions::new()
            .with_cluster_ceiling(10)
            .with_kmeans(KMeansOptions::default().with_seed(7));
        let reducer = ColorReducer::with_options(options);

        assert!(matches!(
            reducer.strategy(Reduction::Sensitivity(0.2)),
            Some(Strategy::UniformCluster(UniformCluster { ceiling: 10, .. }))
        ));
        match reducer.strategy(Reduction::Colors(3)) {
            Some(Strategy::KMeans(kmeans)) => assert_eq!(kmeans.options.seed, 7),
            other => panic!("unexpected strategy {other:?}"),
        }
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let image = gradient(4);

        assert!(matches!(
            reduce_colors(&image, Reduction::Sensitivity(1.5)),
            Err(Error::InvalidSensitivity(_))
        ));
        assert!(matches!(
            reduce_colors(&image, Reduction::Colors(0)),
            Err(Error::InvalidClusterCount(0))
        ));
    }

    #[test]
    fn test_empty_image_is_noop() -> Result<()> {
        let image = Image::new(0, 5, ColorType::Rgba, Vec::new())?;
        let out = reduce_colors(&image, Reduction::Colors(4))?;

        assert_eq!(out, image);
        assert_eq!(count_distinct_colors(&out), 0);
        Ok(())
    }

    #[test]
    fn test_solver_failure_keeps_image() -> Result<()> {
        struct Failing;

        impl Quantizer for Failing {
            fn quantize(&self, _image: &Image) -> Result<Image> {
                Err(Error::KMeansFailure("non-finite center"))
            }
        }

        let image = Image::from_pixels(2, 1, &[Rgba::new(1, 2, 3, 4), Rgba::new(5, 6, 7, 8)])?;
        let out = apply(&image, &Failing);

        assert_eq!(out, image);
        Ok(())
    }

    #[test]
    fn test_nan_epsilon_stops_at_iteration_bound() -> Result<()> {
        let image = gradient(10);
        let options = ReduceOptions::new().with_kmeans(KMeansOptions {
            epsilon: f32::NAN,
            ..KMeansOptions::default()
        });
        let out = ColorReducer::with_options(options).reduce(&image, Reduction::Colors(4))?;

        assert!(count_distinct_colors(&out) <= 4);
        Ok(())
    }

    #[test]
    fn test_disabled_settings_are_noop() -> Result<()> {
        let image = gradient(10);
        let settings = ColorReductionSettings::default();
        let out = ColorReducer::new().reduce_with_settings(&image, &settings)?;

        assert_eq!(out, image);
        Ok(())
    }
}
