//! Error types surfaced by the watermarking pipeline.

use thiserror::Error;

/// Errors that can escape a watermark call.
///
/// Font problems are deliberately absent: font resolution always ends at the
/// built-in face, so a missing or broken font file never fails a call.
#[derive(Debug, Error)]
pub enum WatermarkError {
    /// Input bytes are not a decodable image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The flattened result could not be serialized as PNG.
    #[error("Failed to encode PNG: {0}")]
    Encode(String),

    /// Overlay and base image disagree on size.
    #[error("Overlay is {overlay_width}x{overlay_height} but image is {width}x{height}")]
    Composite {
        width: u32,
        height: u32,
        overlay_width: u32,
        overlay_height: u32,
    },

    /// Settings failed validation (bad colour, zero divisor, ...).
    #[error("Watermark configuration error: {0}")]
    Config(String),
}

impl From<image::ImageError> for WatermarkError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => WatermarkError::Encode(e.to_string()),
            other => WatermarkError::Decode(other.to_string()),
        }
    }
}
