//! The high level builder API tying the pipeline together.

use crate::{
    dominant, format_color,
    kmeans::{self, ClusterOptions},
    sampler::{self, Samples},
    ClusterCount, FormattedColor, PixelMatrix, Result,
};

use image::DynamicImage;

/// Runs `$body` against the pixel matrix inside a [`Samples`], whatever its
/// channel count.
macro_rules! with_samples {
    ($samples:expr, $pixels:ident => $body:expr) => {
        match $samples {
            Samples::Gray($pixels) => $body,
            Samples::GrayAlpha($pixels) => $body,
            Samples::Rgb($pixels) => $body,
            Samples::Rgba($pixels) => $body,
        }
    };
}

/// A builder struct to configure and run one palette extraction.
///
/// Each terminal method ([`palette`](Self::palette),
/// [`dominant`](Self::dominant), and their `_par` variants) samples the image
/// and clusters from scratch, owning all of its intermediate state. Nothing
/// is shared between runs, so concurrent extractions on different images
/// cannot interfere with each other.
///
/// # Examples
/// ```no_run
/// # use colorgist::Extractor;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?;
///
/// let palette = Extractor::new(&img)
///     .cluster_count(16.into())
///     .seed(42)
///     .palette()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Extractor<'a> {
    /// The image to extract from.
    image: &'a DynamicImage,
    /// The number of palette entries to produce.
    k: ClusterCount,
    /// Clustering parameters (seed, iteration bound, convergence).
    options: ClusterOptions,
}

impl<'a> Extractor<'a> {
    /// Creates an [`Extractor`] over `image` with the default cluster count
    /// and clustering options.
    #[must_use]
    pub fn new(image: &'a DynamicImage) -> Self {
        Self {
            image,
            k: ClusterCount::default(),
            options: ClusterOptions::new(),
        }
    }

    /// Sets the number of palette entries. The default is `10`.
    #[must_use]
    pub fn cluster_count(mut self, k: ClusterCount) -> Self {
        self.k = k;
        self
    }

    /// Sets the clustering seed. The default is `0`.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.options = self.options.seed(seed);
        self
    }

    /// Sets the clustering iteration bound. The default is `100`.
    #[must_use]
    pub fn max_iterations(mut self, max_iterations: u32) -> Self {
        self.options = self.options.max_iterations(max_iterations);
        self
    }

    /// Sets the clustering convergence threshold. The default is `1e-3`.
    #[must_use]
    pub fn convergence(mut self, convergence: f32) -> Self {
        self.options = self.options.convergence(convergence);
        self
    }

    /// Extracts the full palette: `k` centroids, formatted.
    ///
    /// # Errors
    /// Returns [`ExtractError::EmptyPixelSet`](crate::ExtractError) if the
    /// image sampled to zero pixels.
    pub fn palette(self) -> Result<Vec<FormattedColor>> {
        with_samples!(sampler::sample(self.image), pixels => {
            run_palette(&pixels, self.k, &self.options)
        })
    }

    /// Extracts the single most dominant color.
    ///
    /// The result is always one of the centroids [`palette`](Self::palette)
    /// would return for the same configuration.
    ///
    /// # Errors
    /// Returns [`ExtractError::EmptyPixelSet`](crate::ExtractError) if the
    /// image sampled to zero pixels, or
    /// [`ExtractError::EmptyHistogram`](crate::ExtractError) if the cluster
    /// count is zero.
    pub fn dominant(self) -> Result<FormattedColor> {
        with_samples!(sampler::sample(self.image), pixels => {
            run_dominant(&pixels, self.k, &self.options)
        })
    }

    /// Like [`palette`](Self::palette), but runs the assignment phases in
    /// parallel. The result is identical to the serial version.
    ///
    /// # Errors
    /// See [`palette`](Self::palette).
    #[cfg(feature = "threads")]
    pub fn palette_par(self) -> Result<Vec<FormattedColor>> {
        with_samples!(sampler::sample(self.image), pixels => {
            let codebook = kmeans::cluster_par(&pixels, self.k, &self.options)?;
            Ok(codebook.iter().map(|centroid| format_color(centroid)).collect())
        })
    }

    /// Like [`dominant`](Self::dominant), but runs the assignment phases in
    /// parallel. The result is identical to the serial version.
    ///
    /// # Errors
    /// See [`dominant`](Self::dominant).
    #[cfg(feature = "threads")]
    pub fn dominant_par(self) -> Result<FormattedColor> {
        with_samples!(sampler::sample(self.image), pixels => {
            let codebook = kmeans::cluster_par(&pixels, self.k, &self.options)?;
            dominant::dominant_par(&pixels, &codebook).map(|centroid| format_color(&centroid))
        })
    }
}

/// Clusters and formats the full codebook.
fn run_palette<const N: usize>(
    pixels: &PixelMatrix<N>,
    k: ClusterCount,
    options: &ClusterOptions,
) -> Result<Vec<FormattedColor>> {
    let codebook = kmeans::cluster(pixels, k, options)?;
    Ok(codebook.iter().map(|centroid| format_color(centroid)).collect())
}

/// Clusters, selects the dominant centroid, and formats it.
fn run_dominant<const N: usize>(
    pixels: &PixelMatrix<N>,
    k: ClusterCount,
    options: &ClusterOptions,
) -> Result<FormattedColor> {
    let codebook = kmeans::cluster(pixels, k, options)?;
    dominant::dominant(pixels, &codebook).map(|centroid| format_color(&centroid))
}

/// Extracts a palette of `k` formatted colors from `image` with default
/// clustering options.
///
/// # Errors
/// See [`Extractor::palette`].
pub fn extract_palette(image: &DynamicImage, k: ClusterCount) -> Result<Vec<FormattedColor>> {
    Extractor::new(image).cluster_count(k).palette()
}

/// Extracts the single most dominant of `k` palette colors from `image` with
/// default clustering options.
///
/// # Errors
/// See [`Extractor::dominant`].
pub fn extract_dominant(image: &DynamicImage, k: ClusterCount) -> Result<FormattedColor> {
    Extractor::new(image).cluster_count(k).dominant()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{SAMPLE_DIM, SAMPLE_PIXELS};
    use image::{Rgb, RgbImage};

    fn solid_red() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(
            SAMPLE_DIM,
            SAMPLE_DIM,
            Rgb([255, 0, 0]),
        ))
    }

    fn black_white_halves() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(SAMPLE_DIM, SAMPLE_DIM, |x, _| {
            if x < SAMPLE_DIM / 2 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        }))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn speckled() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(SAMPLE_DIM, SAMPLE_DIM, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn palette_has_k_entries() {
        let image = speckled();
        for k in [1u8, 2, 10, 32] {
            let palette = extract_palette(&image, k.into()).unwrap();
            assert_eq!(palette.len(), usize::from(k));
        }
    }

    #[test]
    fn dominant_is_in_the_palette() {
        let image = speckled();
        let palette = extract_palette(&image, ClusterCount::default()).unwrap();
        let dominant = extract_dominant(&image, ClusterCount::default()).unwrap();
        assert!(palette.contains(&dominant));
    }

    #[test]
    fn same_seed_same_palette() {
        let image = speckled();
        let first = Extractor::new(&image).seed(3).palette().unwrap();
        let second = Extractor::new(&image).seed(3).palette().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn solid_red_dominates() {
        let image = solid_red();
        let palette = extract_palette(&image, 3.into()).unwrap();
        assert_eq!(palette.len(), 3);
        for color in &palette {
            assert_eq!(color.hex, "ff0000");
        }

        let dominant = extract_dominant(&image, 3.into()).unwrap();
        assert!(dominant.hex.starts_with("ff0000"));
    }

    #[test]
    fn split_image_finds_both_halves() {
        let image = black_white_halves();
        let samples = sampler::sample(&image);
        let Samples::Rgb(pixels) = samples else {
            panic!("expected rgb samples");
        };

        let options = ClusterOptions::new();
        let codebook = kmeans::cluster(&pixels, 2.into(), &options).unwrap();
        let mut hexes = codebook
            .iter()
            .map(|centroid| format_color(centroid).hex)
            .collect::<Vec<_>>();
        hexes.sort();
        assert_eq!(hexes, ["000000", "ffffff"]);

        let counts = dominant::histogram(&pixels, &codebook);
        assert_eq!(counts.iter().sum::<u32>(), SAMPLE_PIXELS);
        assert_eq!(counts, vec![SAMPLE_PIXELS / 2; 2]);

        // Equal counts tie toward the lower centroid index.
        let index = dominant::dominant_index(&pixels, &codebook).unwrap();
        assert_eq!(index, 0);
        let dominant = extract_dominant(&image, 2.into()).unwrap();
        assert_eq!(dominant.channels, codebook[0].to_vec());
    }

    #[test]
    #[cfg(feature = "threads")]
    fn parallel_matches_serial() {
        let image = speckled();
        let serial = Extractor::new(&image).palette().unwrap();
        let parallel = Extractor::new(&image).palette_par().unwrap();
        assert_eq!(serial, parallel);

        let serial = Extractor::new(&image).dominant().unwrap();
        let parallel = Extractor::new(&image).dominant_par().unwrap();
        assert_eq!(serial, parallel);
    }
}
