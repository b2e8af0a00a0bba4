//! Conversion of numeric color vectors into display form.

use std::fmt::Write;

/// A color ready for display: the raw channel vector paired with its
/// hexadecimal encoding.
///
/// The hex string is lowercase, without a leading `#`, and two digits per
/// channel; whatever alpha or luma channels the source color mode had are
/// encoded along with the color channels. The `channels` field keeps the
/// unrounded values so callers can show the exact centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct FormattedColor {
    /// The channel values exactly as produced by clustering.
    pub channels: Vec<f32>,
    /// Lowercase hexadecimal encoding of the rounded channel bytes.
    pub hex: String,
}

/// Formats a channel vector as a [`FormattedColor`].
///
/// Each channel is rounded to the nearest integer and clamped to `0..=255`
/// before encoding, so out-of-range values from centroid arithmetic cannot
/// overflow a byte.
///
/// # Examples
/// ```
/// # use colorgist::format_color;
/// let red = format_color(&[254.7, 0.2, 0.0]);
/// assert_eq!(red.hex, "ff0000");
/// ```
#[must_use]
pub fn format_color(channels: &[f32]) -> FormattedColor {
    let mut hex = String::with_capacity(channels.len() * 2);
    for &channel in channels {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let byte = channel.round().clamp(0.0, 255.0) as u8;
        // String formatting is infallible.
        let _ = write!(hex, "{byte:02x}");
    }

    FormattedColor { channels: channels.to_vec(), hex }
}
