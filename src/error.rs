//! Common error types.

use std::fmt;

/// A shortcut type equivalent to `Result<T, chromacut::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error that occurs within the crate.
///
/// Only the parameter and construction variants are ever returned from
/// [`reduce_colors`](crate::reduce_colors). The remaining variants describe internal failures
/// which the reducer degrades into "return the input unchanged".
#[derive(Debug)]
pub enum Error {
    /// A sensitivity outside of `[0.0, 1.0]` (or `NaN`) was provided.
    InvalidSensitivity(f64),

    /// A cluster count of zero was requested.
    InvalidClusterCount(usize),

    /// A bin count outside of the supported set `{4, 8, 16, 32, 64, 128, 256}` was provided.
    InvalidBinCount(usize),

    /// An invalid hex code was provided when trying to parse a hex value.
    InvalidHexCode(String),

    /// An image received data incompatible with the image's dimensions.
    IncompatibleImageData {
        width: u32,
        height: u32,
        channels: usize,
        received: usize,
    },

    /// Failed to downsample the k-means training set.
    ResizeError(String),

    /// The k-means solver produced unusable centers.
    KMeansFailure(&'static str),
}

impl std::error::Error for Error {}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::InvalidSensitivity(value) => {
                write!(f, "sensitivity must be between 0.0 and 1.0, got {value}")
            }
            Self::InvalidClusterCount(k) => {
                write!(f, "cluster count must be a positive integer, got {k}")
            }
            Self::InvalidBinCount(count) => write!(
                f,
                "bin count must be one of 4, 8, 16, 32, 64, 128 or 256, got {count}"
            ),
            Self::InvalidHexCode(hex_code) => write!(f, "Invalid hex code: {hex_code}"),
            Self::IncompatibleImageData {
                width,
                height,
                channels,
                received,
            } => write!(
                f,
                "An image with dimensions {width}x{height} and {channels} channels should have \
                 {} bytes, received {received} instead",
                *width as usize * *height as usize * channels,
            ),
            Self::ResizeError(msg) => write!(f, "Resize error: {msg}"),
            Self::KMeansFailure(msg) => write!(f, "k-means failed: {msg}"),
        }
    }
}

impl From<fast_image_resize::ImageBufferError> for Error {
    fn from(err: fast_image_resize::ImageBufferError) -> Self {
        Self::ResizeError(err.to_string())
    }
}

impl From<fast_image_resize::DifferentTypesOfPixelsError> for Error {
    fn from(err: fast_image_resize::DifferentTypesOfPixelsError) -> Self {
        Self::ResizeError(err.to_string())
    }
}
