//! Normalized 28x28 ink-density images.
//!
//! A [`NormalizedImage`] is the interchange format between the drawing
//! surface, the preview renderer and the remote API: 784 row-major `f32`
//! values where 0.0 is unmarked background and 1.0 is solid ink. This is the
//! inverse of luminance, so white paper maps to 0.0.

use serde::{Deserialize, Serialize};

/// Side length of the normalized image in pixels.
pub const IMAGE_SIDE: u32 = 28;

/// Number of values in a normalized image (28 * 28).
pub const IMAGE_LEN: usize = (IMAGE_SIDE * IMAGE_SIDE) as usize;

/// Added before flooring in [`decode_channel`].
///
/// `1 - c/255` is not exactly representable in `f32`, so a plain
/// `floor((1 - v) * 255)` lands one below `c` for about a hundred channel
/// values. The guard is far below one quantization step (1/255), so genuine
/// fractional values still floor the same way.
const QUANTIZATION_GUARD: f64 = 1e-3;

/// Convert an 8-bit luminance channel into an ink-density value.
///
/// White (255) becomes 0.0, black (0) becomes 1.0.
#[inline]
pub fn encode_channel(channel: u8) -> f32 {
    1.0 - (channel as f32 / 255.0)
}

/// Convert an ink-density value back into an 8-bit luminance channel.
///
/// Computes `floor((1 - v) * 255 + 1e-3)` in `f64`. The guard makes
/// `decode_channel(encode_channel(c)) == c` for every channel. An input whose
/// scaled value `(1 - v) * 255` sits less than 1e-3 below an integer decodes
/// one step higher than the bare `floor((1 - v) * 255)` would (about 0.1% of
/// evenly spaced inputs, never by more than one). Values outside [0, 1]
/// saturate at the channel bounds.
#[inline]
pub fn decode_channel(value: f32) -> u8 {
    let channel = ((1.0 - value as f64) * 255.0 + QUANTIZATION_GUARD).floor();
    channel.clamp(0.0, 255.0) as u8
}

/// Errors produced when building a [`NormalizedImage`] from raw values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TensorError {
    #[error("expected {expected} values, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("value at index {index} is NaN")]
    NaN { index: usize },

    #[error("value {value} at index {index} is outside [0, 1]")]
    OutOfRange { index: usize, value: f32 },
}

/// A 28x28 ink-density image. Always exactly 784 finite values in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NormalizedImage {
    values: Vec<f32>,
}

impl NormalizedImage {
    /// An all-background image.
    pub fn blank() -> Self {
        Self {
            values: vec![0.0; IMAGE_LEN],
        }
    }

    /// Build an image from 784 grayscale channel samples (255 = white).
    ///
    /// Returns `None` unless exactly 784 samples are supplied. Every `u8`
    /// maps into [0, 1], so no further checks are needed.
    pub fn from_channels(channels: impl IntoIterator<Item = u8>) -> Option<Self> {
        let values: Vec<f32> = channels.into_iter().map(encode_channel).collect();
        (values.len() == IMAGE_LEN).then_some(Self { values })
    }

    /// The values in row-major order.
    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> f32 {
        self.values[(y * IMAGE_SIDE + x) as usize]
    }

    /// Total ink over all pixels.
    pub fn ink(&self) -> f32 {
        self.values.iter().sum()
    }

    /// True if no pixel carries ink.
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }
}

impl Default for NormalizedImage {
    fn default() -> Self {
        Self::blank()
    }
}

impl AsRef<[f32]> for NormalizedImage {
    fn as_ref(&self) -> &[f32] {
        &self.values
    }
}

impl TryFrom<Vec<f32>> for NormalizedImage {
    type Error = TensorError;

    fn try_from(values: Vec<f32>) -> Result<Self, Self::Error> {
        if values.len() != IMAGE_LEN {
            return Err(TensorError::WrongLength {
                expected: IMAGE_LEN,
                actual: values.len(),
            });
        }
        for (index, &value) in values.iter().enumerate() {
            if value.is_nan() {
                return Err(TensorError::NaN { index });
            }
            if !(0.0..=1.0).contains(&value) {
                return Err(TensorError::OutOfRange { index, value });
            }
        }
        Ok(Self { values })
    }
}

impl<'de> Deserialize<'de> for NormalizedImage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = Vec::<f32>::deserialize(deserializer)?;
        NormalizedImage::try_from(values).map_err(serde::de::Error::custom)
    }
}
