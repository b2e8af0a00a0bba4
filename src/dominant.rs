//! Selection of the most dominant centroid by assignment counts.
//!
//! Assignment is recomputed from scratch here instead of reusing state from
//! clustering: the final Lloyd iteration updates centroids after assigning,
//! so cached assignments would be against stale positions.

use crate::{kmeans::nearest, Codebook, ExtractError, PixelMatrix, Result};

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Counts how many pixels are nearest to each centroid.
///
/// The returned vector has one count per codebook entry, and the counts sum
/// to the number of pixels. Ties go to the lowest-indexed centroid, matching
/// the assignment rule used during clustering.
#[must_use]
pub fn histogram<const N: usize>(pixels: &PixelMatrix<N>, codebook: &Codebook<N>) -> Vec<u32> {
    let mut counts = vec![0u32; codebook.len()];
    if codebook.is_empty() {
        return counts;
    }

    for &pixel in pixels.iter() {
        counts[nearest(codebook, pixel)] += 1;
    }
    counts
}

/// Like [`histogram`], but assigns pixels in parallel.
#[cfg(feature = "threads")]
#[must_use]
pub fn histogram_par<const N: usize>(
    pixels: &PixelMatrix<N>,
    codebook: &Codebook<N>,
) -> Vec<u32> {
    if codebook.is_empty() {
        return Vec::new();
    }

    let assignments: Vec<usize> = pixels
        .par_iter()
        .map(|&pixel| nearest(codebook, pixel))
        .collect();

    let mut counts = vec![0u32; codebook.len()];
    for cluster in assignments {
        counts[cluster] += 1;
    }
    counts
}

/// Picks the index with the highest count, ties toward the lowest index.
///
/// Returns `None` for an empty or all-zero histogram.
fn peak(counts: &[u32]) -> Option<usize> {
    let mut best = None;
    let mut best_count = 0;
    for (i, &count) in counts.iter().enumerate() {
        if count > best_count {
            best_count = count;
            best = Some(i);
        }
    }
    best
}

/// Returns the index of the centroid with the most assigned pixels.
///
/// # Errors
/// Returns [`ExtractError::EmptyHistogram`] if `pixels` or `codebook` is
/// empty. Neither can happen for inputs produced by the sampler and
/// clusterer, so hitting this is a caller bug rather than an image property.
pub fn dominant_index<const N: usize>(
    pixels: &PixelMatrix<N>,
    codebook: &Codebook<N>,
) -> Result<usize> {
    peak(&histogram(pixels, codebook)).ok_or(ExtractError::EmptyHistogram)
}

/// Returns the centroid with the most assigned pixels.
///
/// # Errors
/// Returns [`ExtractError::EmptyHistogram`] if `pixels` or `codebook` is
/// empty.
pub fn dominant<const N: usize>(
    pixels: &PixelMatrix<N>,
    codebook: &Codebook<N>,
) -> Result<[f32; N]> {
    dominant_index(pixels, codebook).map(|i| codebook[i])
}

/// Like [`dominant_index`], but assigns pixels in parallel.
///
/// # Errors
/// Returns [`ExtractError::EmptyHistogram`] if `pixels` or `codebook` is
/// empty.
#[cfg(feature = "threads")]
pub fn dominant_index_par<const N: usize>(
    pixels: &PixelMatrix<N>,
    codebook: &Codebook<N>,
) -> Result<usize> {
    peak(&histogram_par(pixels, codebook)).ok_or(ExtractError::EmptyHistogram)
}

/// Like [`dominant`], but assigns pixels in parallel.
///
/// # Errors
/// Returns [`ExtractError::EmptyHistogram`] if `pixels` or `codebook` is
/// empty.
#[cfg(feature = "threads")]
pub fn dominant_par<const N: usize>(
    pixels: &PixelMatrix<N>,
    codebook: &Codebook<N>,
) -> Result<[f32; N]> {
    dominant_index_par(pixels, codebook).map(|i| codebook[i])
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{kmeans, tests::*, ClusterCount};

    /// A codebook built directly from centroid vectors, bypassing clustering.
    fn codebook<const N: usize>(centroids: Vec<[f32; N]>) -> Codebook<N> {
        Codebook::new(centroids)
    }

    #[test]
    fn counts_sum_to_pixel_count() {
        let pixels = gradient_rgb(4321);
        let codebook = kmeans::cluster(
            &pixels,
            ClusterCount::default(),
            &kmeans::ClusterOptions::new(),
        )
        .unwrap();

        let counts = histogram(&pixels, &codebook);
        assert_eq!(counts.len(), codebook.len());
        assert_eq!(counts.iter().sum::<u32>(), pixels.num_pixels());
    }

    #[test]
    fn dominant_is_the_largest_cluster() {
        // 30 pixels near zero, 10 pixels near 200; centroids placed on each.
        let mut pixels = vec![[1.0f32, 1.0, 1.0]; 30];
        pixels.extend(vec![[199.0, 199.0, 199.0]; 10]);
        let pixels = PixelMatrix::from(pixels);
        let codebook = codebook(vec![[200.0, 200.0, 200.0], [0.0, 0.0, 0.0]]);

        assert_eq!(histogram(&pixels, &codebook), vec![10, 30]);
        assert_eq!(dominant_index(&pixels, &codebook).unwrap(), 1);
        assert_eq!(dominant(&pixels, &codebook).unwrap(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn count_ties_break_toward_lowest_index() {
        let mut pixels = vec![[0.0f32]; 20];
        pixels.extend(vec![[100.0]; 20]);
        let pixels = PixelMatrix::from(pixels);
        let codebook = codebook(vec![[100.0], [0.0]]);

        assert_eq!(histogram(&pixels, &codebook), vec![20, 20]);
        assert_eq!(dominant_index(&pixels, &codebook).unwrap(), 0);
    }

    #[test]
    fn empty_inputs_fail() {
        let pixels = uniform([0.0f32; 3], 10);
        let empty_codebook = codebook(Vec::new());
        assert!(matches!(
            dominant_index(&pixels, &empty_codebook),
            Err(ExtractError::EmptyHistogram)
        ));

        let no_pixels = PixelMatrix::<3>::from(Vec::new());
        let codebook = codebook(vec![[0.0f32; 3]]);
        assert!(matches!(
            dominant_index(&no_pixels, &codebook),
            Err(ExtractError::EmptyHistogram)
        ));
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let pixels = gradient_rgb(2500);
        let codebook = kmeans::cluster(
            &pixels,
            ClusterCount::default(),
            &kmeans::ClusterOptions::new(),
        )
        .unwrap();

        assert_eq!(histogram(&pixels, &codebook), histogram_par(&pixels, &codebook));
        assert_eq!(
            dominant_index(&pixels, &codebook).unwrap(),
            dominant_index_par(&pixels, &codebook).unwrap()
        );
    }
}
