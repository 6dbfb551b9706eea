//! Watermark settings.
//!
//! Every field has a default, and the defaults reproduce the classic
//! behaviour: "SAMPLE" in translucent light gray, rotated 45 degrees,
//! sized to a fifth of the image's shorter side.

use super::font::DEFAULT_SYSTEM_FONT;
use super::rotate::{CropAnchor, Resample};
use super::text_renderer::parse_hex_color;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Text drawn when the caller does not choose one.
pub const DEFAULT_TEXT: &str = "SAMPLE";

fn default_text() -> String {
    DEFAULT_TEXT.to_string()
}

fn default_system_font() -> String {
    DEFAULT_SYSTEM_FONT.to_string()
}

fn default_color() -> String {
    "#C8C8C880".to_string()
}

fn default_angle() -> f32 {
    45.0
}

fn default_font_size_divisor() -> u32 {
    5
}

/// Settings for a single watermark pass.
///
/// ```yaml
/// text: "PREVIEW"
/// font_path: /usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf
/// color: "#C8C8C880"
/// angle_degrees: 45
/// crop_anchor: top-left
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkConfig {
    /// Text to draw (default: "SAMPLE")
    #[serde(default = "default_text")]
    pub text: String,

    /// Explicit TrueType/OpenType file. Takes precedence over `system_font`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,

    /// Font file name looked up in the system font directories when
    /// `font_path` is unset (default: "arial.ttf")
    #[serde(default = "default_system_font")]
    pub system_font: String,

    /// Fill as #RGB, #RGBA, #RRGGBB or #RRGGBBAA (default: "#C8C8C880")
    #[serde(default = "default_color")]
    pub color: String,

    /// Counter-clockwise rotation in degrees (default: 45)
    #[serde(default = "default_angle")]
    pub angle_degrees: f32,

    /// Font size is min(width, height) / divisor (default: 5)
    #[serde(default = "default_font_size_divisor")]
    pub font_size_divisor: u32,

    /// Window taken from the rotated overlay (default: top-left)
    #[serde(default)]
    pub crop_anchor: CropAnchor,

    /// Sampling used for the rotation (default: nearest)
    #[serde(default)]
    pub resample: Resample,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            text: default_text(),
            font_path: None,
            system_font: default_system_font(),
            color: default_color(),
            angle_degrees: default_angle(),
            font_size_divisor: default_font_size_divisor(),
            crop_anchor: CropAnchor::default(),
            resample: Resample::default(),
        }
    }
}

impl WatermarkConfig {
    /// Settings with the given text and everything else defaulted.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.font_path = Some(path.into());
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.font_size_divisor == 0 {
            return Err("font_size_divisor must be greater than 0".to_string());
        }

        if !self.angle_degrees.is_finite() {
            return Err(format!(
                "angle_degrees must be a finite number, got {}",
                self.angle_degrees
            ));
        }

        if self.font_path.is_none() && self.system_font.trim().is_empty() {
            return Err("system_font cannot be empty when font_path is unset".to_string());
        }

        parse_hex_color(&self.color).map_err(|e| format!("invalid color: {}", e))?;

        Ok(())
    }
}
