//! K-means clustering of pixel vectors into a centroid codebook.
//!
//! This is Lloyd's algorithm over `[f32; N]` channel vectors: seed `k`
//! centroids from the pixel set, then alternate nearest-centroid assignment
//! and mean recomputation until the centroids stop moving or the iteration
//! bound is hit. The iteration bound guarantees termination even on inputs
//! that oscillate below the convergence threshold.
//!
//! All randomness comes from a [`Xoroshiro128PlusPlus`] seeded per call, so
//! two runs over the same pixels with the same [`ClusterOptions`] produce the
//! same codebook. There is no global RNG state and nothing shared between
//! concurrent runs.

use crate::{ClusterCount, Codebook, ExtractError, PixelMatrix, Result};

use ordered_float::OrderedFloat;
use rand::{
    distributions::{Distribution, Uniform},
    SeedableRng,
};
use rand_xoshiro::Xoroshiro128PlusPlus;

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Tuning parameters for one clustering run.
///
/// # Examples
/// ```
/// # use colorgist::kmeans::ClusterOptions;
/// let options = ClusterOptions::new()
///     .seed(42)
///     .max_iterations(50);
/// ```
#[derive(Debug, Clone)]
pub struct ClusterOptions {
    /// The seed value for the random number generator.
    seed: u64,
    /// The maximum number of assign/update iterations.
    max_iterations: u32,
    /// The centroid movement (Euclidean) below which iteration stops.
    convergence: f32,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ClusterOptions {
    /// Creates a new [`ClusterOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            seed: 0,
            max_iterations: 100,
            convergence: 1e-3,
        }
    }

    /// Sets the seed value for the random number generator.
    ///
    /// The default seed is `0`.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the maximum number of iterations.
    ///
    /// The default is `100`.
    #[must_use]
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the convergence threshold: iteration stops once no centroid has
    /// moved farther than this distance in one update.
    ///
    /// The default is `1e-3`.
    #[must_use]
    pub fn convergence(mut self, convergence: f32) -> Self {
        self.convergence = convergence;
        self
    }
}

/// The squared Euclidean distance between two channel vectors.
#[inline]
pub(crate) fn squared_distance<const N: usize>(a: [f32; N], b: [f32; N]) -> f32 {
    let mut sum = 0.0;
    for c in 0..N {
        let diff = a[c] - b[c];
        sum += diff * diff;
    }
    sum
}

/// The index of the centroid nearest to `pixel`, with ties broken toward the
/// lowest index.
#[inline]
pub(crate) fn nearest<const N: usize>(centroids: &[[f32; N]], pixel: [f32; N]) -> usize {
    let mut best = 0;
    let mut best_distance = OrderedFloat(f32::INFINITY);
    for (i, &centroid) in centroids.iter().enumerate() {
        let distance = OrderedFloat(squared_distance(centroid, pixel));
        if distance < best_distance {
            best_distance = distance;
            best = i;
        }
    }
    best
}

/// Draws `k` initial centroids uniformly (with replacement) from the pixel
/// set. Duplicates are acceptable; clusters that end up empty keep their
/// position (see [`step`]).
fn initial_centroids<const N: usize>(
    pixels: &[[f32; N]],
    k: usize,
    seed: u64,
) -> Vec<[f32; N]> {
    let rng = &mut Xoroshiro128PlusPlus::seed_from_u64(seed);
    let indices = Uniform::new(0, pixels.len());
    (0..k).map(|_| pixels[indices.sample(rng)]).collect()
}

/// Recomputes each centroid as the mean of its assigned pixels, accumulating
/// in `f64` to avoid precision loss over tens of thousands of samples.
///
/// A centroid with no assigned pixels keeps its previous position, so a
/// degenerate `k` (larger than the number of distinct pixel vectors) can
/// never produce a division by zero or NaN.
#[allow(clippy::cast_possible_truncation)]
fn step<const N: usize>(
    pixels: &[[f32; N]],
    assignments: &[usize],
    previous: &[[f32; N]],
) -> Vec<[f32; N]> {
    let mut sums = vec![[0.0f64; N]; previous.len()];
    let mut counts = vec![0u32; previous.len()];

    for (&pixel, &cluster) in pixels.iter().zip(assignments) {
        let sum = &mut sums[cluster];
        for (sum, &channel) in sum.iter_mut().zip(&pixel) {
            *sum += f64::from(channel);
        }
        counts[cluster] += 1;
    }

    previous
        .iter()
        .zip(sums.iter().zip(&counts))
        .map(|(&previous, (sum, &count))| {
            if count == 0 {
                previous
            } else {
                sum.map(|s| (s / f64::from(count)) as f32)
            }
        })
        .collect()
}

/// The largest Euclidean distance any centroid moved between two iterations.
fn max_movement<const N: usize>(previous: &[[f32; N]], next: &[[f32; N]]) -> f32 {
    previous
        .iter()
        .zip(next)
        .map(|(&a, &b)| squared_distance(a, b).sqrt())
        .fold(0.0, f32::max)
}

/// Runs Lloyd's algorithm with the given assignment strategy.
fn lloyd<const N: usize>(
    pixels: &PixelMatrix<N>,
    k: ClusterCount,
    options: &ClusterOptions,
    assign: impl Fn(&[[f32; N]], &[[f32; N]]) -> Vec<usize>,
) -> Result<Codebook<N>> {
    if pixels.is_empty() {
        return Err(ExtractError::EmptyPixelSet);
    }

    let k = usize::from(k.into_inner());
    if k == 0 {
        return Ok(Codebook::new(Vec::new()));
    }

    let mut centroids = initial_centroids(pixels, k, options.seed);
    for _ in 0..options.max_iterations {
        let assignments = assign(pixels, &centroids);
        let next = step(pixels, &assignments, &centroids);
        let moved = max_movement(&centroids, &next);
        centroids = next;
        if moved <= options.convergence {
            break;
        }
    }

    Ok(Codebook::new(centroids))
}

/// Clusters `pixels` into a codebook of exactly `k` centroids.
///
/// # Errors
/// Returns [`ExtractError::EmptyPixelSet`] if `pixels` is empty.
pub fn cluster<const N: usize>(
    pixels: &PixelMatrix<N>,
    k: ClusterCount,
    options: &ClusterOptions,
) -> Result<Codebook<N>> {
    lloyd(pixels, k, options, |pixels, centroids| {
        pixels.iter().map(|&pixel| nearest(centroids, pixel)).collect()
    })
}

/// Like [`cluster`], but computes each iteration's assignments in parallel.
///
/// Assignments are independent per pixel and the mean update stays
/// sequential, so the result is bit-identical to [`cluster`] with the same
/// options.
///
/// # Errors
/// Returns [`ExtractError::EmptyPixelSet`] if `pixels` is empty.
#[cfg(feature = "threads")]
pub fn cluster_par<const N: usize>(
    pixels: &PixelMatrix<N>,
    k: ClusterCount,
    options: &ClusterOptions,
) -> Result<Codebook<N>> {
    lloyd(pixels, k, options, |pixels, centroids| {
        pixels
            .par_iter()
            .map(|&pixel| nearest(centroids, pixel))
            .collect()
    })
}
