//! A library for extracting a representative color palette and the single
//! dominant color from an image.
//!
//! `colorgist` resamples the input image down to a fixed 150×150 grid, runs
//! k-means clustering over the pixel-channel vectors to build a codebook of
//! `k` centroids, and counts nearest-centroid assignments to find the color
//! that covers the most pixels. Centroid initialization is seeded, so results
//! are fully reproducible for a given image, `k`, and seed.
//!
//! # Features
//! - `threads`: exposes parallel versions of the extraction functions via
//!   [`rayon`]. The parallel versions return bit-identical results to their
//!   serial counterparts.
//!
//! # High-Level API
//! To get started, see [`Extractor`], or use the [`extract_palette`] and
//! [`extract_dominant`] shorthands:
//! ```no_run
//! # use colorgist::{Extractor, ClusterCount};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?;
//!
//! let dominant = Extractor::new(&img)
//!     .cluster_count(5.into()) // number of palette entries
//!     .seed(42)
//!     .dominant()?;
//!
//! println!("#{}", dominant.hex);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod error;
mod format;
mod types;

pub mod dominant;
pub mod kmeans;
pub mod sampler;

pub use api::*;
pub use error::{ExtractError, Result};
pub use format::{format_color, FormattedColor};
pub use types::*;

/// The side length of the canonical sampling grid. Every image is resampled
/// to this resolution before clustering, bounding the cost of k-means
/// independently of the source image size.
pub const SAMPLE_DIM: u32 = 150;

/// The number of pixel vectors produced by the sampler (`SAMPLE_DIM`²).
pub const SAMPLE_PIXELS: u32 = SAMPLE_DIM * SAMPLE_DIM;

/// The maximum supported number of palette colors is `256`.
pub const MAX_CLUSTERS: u16 = 256;

/// The default number of palette colors.
pub(crate) const DEFAULT_CLUSTERS: u16 = 10;

/// Shared fixtures for the per-module test suites.
#[cfg(test)]
pub(crate) mod tests {
    use crate::PixelMatrix;

    /// A deterministic spread of RGB vectors covering the channel range.
    pub fn gradient_rgb(len: usize) -> PixelMatrix<3> {
        (0..len)
            .map(|i| {
                #[allow(clippy::cast_possible_truncation)]
                let v = (i * 255 / len.max(1)) as u8;
                [f32::from(v), f32::from(255 - v), f32::from(v / 2)]
            })
            .collect::<Vec<_>>()
            .into()
    }

    /// A pixel matrix with every vector equal to `pixel`.
    pub fn uniform<const N: usize>(pixel: [f32; N], len: usize) -> PixelMatrix<N> {
        vec![pixel; len].into()
    }

    /// The per-channel mean of `pixels`, accumulated in `f64`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub fn channel_means<const N: usize>(pixels: &PixelMatrix<N>) -> [f32; N] {
        let mut sums = [0.0f64; N];
        for pixel in pixels.iter() {
            for (sum, &c) in sums.iter_mut().zip(pixel) {
                *sum += f64::from(c);
            }
        }
        sums.map(|s| (s / pixels.len() as f64) as f32)
    }
}
