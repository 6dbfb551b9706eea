//! The watermarking pipeline.
//!
//! decode -> overlay (font, measure, draw, rotate, crop) -> composite -> flatten -> PNG

use super::codec::{decode_rgba, encode_png};
use super::compositor::{alpha_composite, flatten_to_rgb};
use super::config::WatermarkConfig;
use super::font::{FontRequest, WatermarkFont};
use super::rotate::{crop_to, rotate_expand};
use super::text_renderer::{centered_origin, draw_text, measure_text, parse_hex_color, Color};
use crate::error::WatermarkError;
use image::RgbaImage;
use std::path::{Path, PathBuf};

/// Watermark `data` with `text`, using `font_path` if it loads.
///
/// Returns PNG bytes the same size as the input. Fails only when the input
/// cannot be decoded or the result cannot be encoded; a missing or broken
/// font silently falls back to the built-in face.
pub fn add_watermark(
    data: &[u8],
    text: &str,
    font_path: Option<&Path>,
) -> Result<Vec<u8>, WatermarkError> {
    let mut config = WatermarkConfig::with_text(text);
    config.font_path = font_path.map(Path::to_path_buf);
    Watermarker::new(config)?.apply(data)
}

/// Font size for an image: the shorter side divided by `divisor`.
pub fn font_size_for(width: u32, height: u32, divisor: u32) -> u32 {
    width.min(height) / divisor.max(1)
}

/// Applies one configured watermark to any number of images.
///
/// The font file is located once, when the watermarker is built, so a bare
/// system font name costs one directory walk rather than one per image.
/// Holds only immutable settings, so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct Watermarker {
    config: WatermarkConfig,
    color: Color,
    font_source: Option<PathBuf>,
}

impl Default for Watermarker {
    fn default() -> Self {
        let config = WatermarkConfig::default();
        let font_source = locate_font_source(&config);
        Self {
            config,
            color: Color::watermark_gray(),
            font_source,
        }
    }
}

/// Font file for `config`, or `None` when only the built-in face can be used.
fn locate_font_source(config: &WatermarkConfig) -> Option<PathBuf> {
    let request = FontRequest::new(config.font_path.as_deref(), &config.system_font);
    match request.locate() {
        Ok(path) => Some(path),
        Err(error) => {
            tracing::warn!(
                error = %error,
                "Watermark font not found, using built-in face"
            );
            None
        }
    }
}

impl Watermarker {
    /// Validate `config` and build a watermarker from it.
    pub fn new(config: WatermarkConfig) -> Result<Self, WatermarkError> {
        config.validate().map_err(WatermarkError::Config)?;
        let color = parse_hex_color(&config.color)?;
        let font_source = locate_font_source(&config);
        Ok(Self {
            config,
            color,
            font_source,
        })
    }

    pub fn config(&self) -> &WatermarkConfig {
        &self.config
    }

    /// The font file found at construction, if any.
    pub fn font_source(&self) -> Option<&Path> {
        self.font_source.as_deref()
    }

    /// Watermark encoded image bytes, returning PNG bytes.
    pub fn apply(&self, data: &[u8]) -> Result<Vec<u8>, WatermarkError> {
        let mut image = decode_rgba(data)?;
        let (width, height) = image.dimensions();

        tracing::debug!(
            width,
            height,
            input_bytes = data.len(),
            "Decoded image for watermarking"
        );

        let overlay = self.render_overlay(width, height);
        alpha_composite(&mut image, &overlay)?;

        let encoded = encode_png(&flatten_to_rgb(image))?;

        tracing::debug!(
            width,
            height,
            output_bytes = encoded.len(),
            "Encoded watermarked image"
        );

        Ok(encoded)
    }

    /// Build the rotated, cropped overlay for a `width` x `height` image.
    ///
    /// The overlay is fully transparent when the text is empty.
    pub fn render_overlay(&self, width: u32, height: u32) -> RgbaImage {
        let mut overlay = RgbaImage::new(width, height);
        let text = self.config.text.as_str();
        if text.is_empty() {
            return overlay;
        }

        let font_size = font_size_for(width, height, self.config.font_size_divisor);
        let font = match self.font_source.as_deref() {
            Some(path) => FontRequest::new(Some(path), &self.config.system_font).resolve(font_size),
            None => WatermarkFont::builtin(font_size),
        };

        let extent = measure_text(&font, text);
        let origin = centered_origin((width, height), extent);

        tracing::debug!(
            font_size,
            builtin_font = font.is_builtin(),
            text_width = extent.width,
            text_height = extent.height,
            origin_x = origin.0,
            origin_y = origin.1,
            "Drawing watermark text"
        );

        draw_text(&mut overlay, &font, origin, text, self.color);

        let rotated = rotate_expand(&overlay, self.config.angle_degrees, self.config.resample);
        crop_to(&rotated, width, height, self.config.crop_anchor)
    }
}
