//! The error type shared by all extraction operations.

use thiserror::Error;

/// A `Result` alias with [`ExtractError`] as the error type.
pub type Result<T> = std::result::Result<T, ExtractError>;

/// The ways a palette extraction can fail.
///
/// Errors are surfaced to the caller as-is; there is no fallback palette and
/// no retry, since clustering is deterministic for a given input and seed.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The image resource could not be decoded as a raster image.
    #[error("failed to decode image")]
    Decode(#[from] image::ImageError),

    /// Clustering was asked to run over zero pixel vectors.
    #[error("cannot cluster an empty pixel set")]
    EmptyPixelSet,

    /// Dominant-color selection was given an empty pixel set or codebook.
    ///
    /// This cannot occur when the inputs come from [`sampler::sample`] and
    /// [`kmeans::cluster`] with a non-zero cluster count; hitting it signals
    /// a bug in the caller, not a property of the image.
    ///
    /// [`sampler::sample`]: crate::sampler::sample
    /// [`kmeans::cluster`]: crate::kmeans::cluster
    #[error("no assignments to build a histogram from")]
    EmptyHistogram,
}
