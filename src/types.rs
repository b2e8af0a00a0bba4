//! Contains various types needed across the crate.

use crate::{DEFAULT_CLUSTERS, MAX_CLUSTERS};
use std::{
    fmt::{Debug, Display},
    ops::Deref,
};
use thiserror::Error;

/// An error type for when an input value is above its maximum supported
/// value.
///
/// The inner value is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Error)]
#[error("above the maximum of {0}")]
pub struct AboveMax<T: Display>(pub T);

/// The number of centroids to compute, i.e. the size of the resulting
/// palette.
///
/// This is a simple new type wrapper around `u16` with the invariant that it
/// must be less than or equal to [`MAX_CLUSTERS`]. The default is `10`.
///
/// A [`ClusterCount`] of `0` produces an empty codebook.
///
/// # Examples
/// Use `into` to create [`ClusterCount`]s from `u8`s.
/// For `u16`s, use `try_into` or [`ClusterCount::from_clamped`].
///
/// ```
/// # use colorgist::{ClusterCount, AboveMax};
/// # fn main() -> Result<(), AboveMax<u16>> {
/// let k = ClusterCount::from(16);
/// let k: ClusterCount = 128u16.try_into()?;
/// let k = ClusterCount::from_clamped(1024);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ClusterCount(u16);

impl ClusterCount {
    /// The maximum supported cluster count (given by [`MAX_CLUSTERS`]).
    pub const MAX: Self = Self(MAX_CLUSTERS);

    /// Gets the inner `u16` value.
    #[must_use]
    pub const fn into_inner(self) -> u16 {
        self.0
    }

    /// Creates a [`ClusterCount`] by clamping the given `u16` to be less
    /// than or equal to [`MAX_CLUSTERS`].
    #[must_use]
    pub const fn from_clamped(value: u16) -> Self {
        if value <= MAX_CLUSTERS {
            Self(value)
        } else {
            Self(MAX_CLUSTERS)
        }
    }
}

impl Default for ClusterCount {
    fn default() -> Self {
        Self(DEFAULT_CLUSTERS)
    }
}

impl From<ClusterCount> for u16 {
    fn from(val: ClusterCount) -> Self {
        val.into_inner()
    }
}

impl From<u8> for ClusterCount {
    fn from(value: u8) -> Self {
        Self(value.into())
    }
}

impl TryFrom<u16> for ClusterCount {
    type Error = AboveMax<u16>;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        if value <= MAX_CLUSTERS {
            Ok(ClusterCount(value))
        } else {
            Err(AboveMax(MAX_CLUSTERS))
        }
    }
}

impl Display for ClusterCount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.into_inner())
    }
}

/// An ordered set of pixel-channel vectors in row-major order, one `[f32; N]`
/// per pixel.
///
/// `N` is the channel count of the source color mode (1 for grayscale up to
/// 4 for RGBA) and is uniform across the whole matrix. A [`PixelMatrix`] is
/// built once per analysis by [`sampler::sample`](crate::sampler::sample) and
/// never mutated afterwards; clustering and selection only read it.
#[derive(Debug, Clone, PartialEq)]
#[repr(transparent)]
pub struct PixelMatrix<const N: usize>(Vec<[f32; N]>);

impl<const N: usize> PixelMatrix<N> {
    /// Returns the number of pixel vectors as a `u32`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_pixels(&self) -> u32 {
        self.0.len() as u32
    }
}

impl<const N: usize> From<Vec<[f32; N]>> for PixelMatrix<N> {
    fn from(pixels: Vec<[f32; N]>) -> Self {
        Self(pixels)
    }
}

impl<const N: usize> AsRef<[[f32; N]]> for PixelMatrix<N> {
    fn as_ref(&self) -> &[[f32; N]] {
        self
    }
}

impl<const N: usize> Deref for PixelMatrix<N> {
    type Target = [[f32; N]];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// The centroids produced by one clustering run, indexed `0..k`.
///
/// Centroids live in the same channel space as the pixel vectors they were
/// clustered from. They are not guaranteed to be unique: a degenerate input
/// (fewer distinct pixel vectors than `k`) yields duplicate entries rather
/// than an error.
#[derive(Debug, Clone, PartialEq)]
#[repr(transparent)]
pub struct Codebook<const N: usize>(Vec<[f32; N]>);

impl<const N: usize> Codebook<N> {
    /// Creates a [`Codebook`] from centroid vectors.
    pub(crate) fn new(centroids: Vec<[f32; N]>) -> Self {
        Self(centroids)
    }

    /// Returns the inner centroid vectors.
    #[must_use]
    pub fn into_inner(self) -> Vec<[f32; N]> {
        self.0
    }

    /// Returns the number of centroids as a `u16`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn cluster_count(&self) -> u16 {
        self.0.len() as u16
    }
}

impl<const N: usize> AsRef<[[f32; N]]> for Codebook<N> {
    fn as_ref(&self) -> &[[f32; N]] {
        self
    }
}

impl<const N: usize> Deref for Codebook<N> {
    type Target = [[f32; N]];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cluster_count_bounds() {
        assert_eq!(ClusterCount::try_from(MAX_CLUSTERS).map(u16::from), Ok(MAX_CLUSTERS));
        assert_eq!(
            ClusterCount::try_from(MAX_CLUSTERS + 1),
            Err(AboveMax(MAX_CLUSTERS))
        );
        assert_eq!(u16::from(ClusterCount::from_clamped(u16::MAX)), MAX_CLUSTERS);
        assert_eq!(u16::from(ClusterCount::default()), 10);
    }

    #[test]
    fn pixel_matrix_len() {
        let pixels = PixelMatrix::from(vec![[0.0f32; 3]; 7]);
        assert_eq!(pixels.num_pixels(), 7);
        assert_eq!(pixels.len(), 7);
    }
}
