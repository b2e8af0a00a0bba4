//! Decoding and resampling of images into pixel-channel vectors.
//!
//! Every analysis starts here: the image is resampled to a fixed
//! [`SAMPLE_DIM`]×[`SAMPLE_DIM`] grid and flattened into one `f32` channel
//! vector per pixel. The fixed grid bounds clustering cost regardless of the
//! source resolution, and it means a large image gets no more say in the
//! palette than a small one.

use crate::{ExtractError, PixelMatrix, Result, SAMPLE_DIM};

use image::{imageops::FilterType, ColorType, DynamicImage};
use std::path::Path;

/// The pixel vectors of one resampled image, tagged with the channel layout
/// of the source color mode.
///
/// The variant is decided by the decoded image, not by the caller: grayscale
/// sources produce one channel per pixel, RGBA sources four, and so on.
/// 16-bit and float color modes fold down to their 8-bit equivalents before
/// the lossless cast to `f32`.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// Single-channel luma vectors.
    Gray(PixelMatrix<1>),
    /// Luma plus alpha vectors.
    GrayAlpha(PixelMatrix<2>),
    /// Red, green, blue vectors.
    Rgb(PixelMatrix<3>),
    /// Red, green, blue, alpha vectors.
    Rgba(PixelMatrix<4>),
}

impl Samples {
    /// Returns the number of pixel vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Gray(pixels) => pixels.len(),
            Self::GrayAlpha(pixels) => pixels.len(),
            Self::Rgb(pixels) => pixels.len(),
            Self::Rgba(pixels) => pixels.len(),
        }
    }

    /// Returns `true` if there are no pixel vectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the channel count of each pixel vector.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        match self {
            Self::Gray(_) => 1,
            Self::GrayAlpha(_) => 2,
            Self::Rgb(_) => 3,
            Self::Rgba(_) => 4,
        }
    }
}

/// Decodes an in-memory image, guessing the format from its magic bytes.
///
/// # Errors
/// Returns [`ExtractError::Decode`] if the bytes are not a decodable raster
/// image.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(ExtractError::from)
}

/// Opens and decodes an image file.
///
/// # Errors
/// Returns [`ExtractError::Decode`] if the file cannot be read or decoded.
pub fn open(path: impl AsRef<Path>) -> Result<DynamicImage> {
    image::open(path).map_err(ExtractError::from)
}

/// Resamples `image` to the canonical grid and flattens it into pixel
/// vectors.
///
/// The output always holds exactly [`SAMPLE_PIXELS`](crate::SAMPLE_PIXELS)
/// vectors in row-major order. The source image is only read, never modified.
#[must_use]
pub fn sample(image: &DynamicImage) -> Samples {
    let resized = if image.width() == SAMPLE_DIM && image.height() == SAMPLE_DIM {
        image.clone()
    } else {
        image.resize_exact(SAMPLE_DIM, SAMPLE_DIM, FilterType::CatmullRom)
    };

    match image.color() {
        ColorType::L8 | ColorType::L16 => Samples::Gray(
            resized
                .to_luma8()
                .pixels()
                .map(|p| p.0.map(f32::from))
                .collect::<Vec<_>>()
                .into(),
        ),
        ColorType::La8 | ColorType::La16 => Samples::GrayAlpha(
            resized
                .to_luma_alpha8()
                .pixels()
                .map(|p| p.0.map(f32::from))
                .collect::<Vec<_>>()
                .into(),
        ),
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => Samples::Rgba(
            resized
                .to_rgba8()
                .pixels()
                .map(|p| p.0.map(f32::from))
                .collect::<Vec<_>>()
                .into(),
        ),
        _ => Samples::Rgb(
            resized
                .to_rgb8()
                .pixels()
                .map(|p| p.0.map(f32::from))
                .collect::<Vec<_>>()
                .into(),
        ),
    }
}
