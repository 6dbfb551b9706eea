//! Text watermark rendering.
//!
//! Measures and rasterizes watermark text onto a transparent RGBA overlay.
//!
//! # Features
//!
//! - Hex color parsing (#RGB, #RGBA, #RRGGBB and #RRGGBBAA formats)
//! - Outline fonts through `ab_glyph`, with kerning
//! - The built-in bitmap face, nearest-neighbour scaled
//! - Anti-aliased coverage blended with the "over" operator
//!
//! # Example
//!
//! ```ignore
//! use sheetmark::watermark::font::WatermarkFont;
//! use sheetmark::watermark::text_renderer::{centered_origin, draw_text, measure_text, Color};
//!
//! let font = WatermarkFont::builtin(40);
//! let mut overlay = image::RgbaImage::new(400, 300);
//! let extent = measure_text(&font, "SAMPLE");
//! let origin = centered_origin(overlay.dimensions(), extent);
//! draw_text(&mut overlay, &font, origin, "SAMPLE", Color::new(200, 200, 200, 128));
//! ```

use super::compositor::blend_pixels;
use super::font::{builtin_glyph, WatermarkFont, BUILTIN_CELL};
use crate::error::WatermarkError;
use ab_glyph::{Font, ScaleFont};
use image::{Rgba, RgbaImage};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Light gray at roughly half opacity, the default watermark fill.
    pub fn watermark_gray() -> Self {
        Self::new(200, 200, 200, 128)
    }

    fn with_coverage(self, coverage: f32) -> Rgba<u8> {
        let alpha = (coverage.clamp(0.0, 1.0) * self.a as f32) as u8;
        Rgba([self.r, self.g, self.b, alpha])
    }
}

impl From<Color> for Rgba<u8> {
    fn from(c: Color) -> Self {
        Rgba([c.r, c.g, c.b, c.a])
    }
}

/// Parse a hex color string.
///
/// Supports #RGB, #RGBA, #RRGGBB and #RRGGBBAA. Alpha defaults to 255.
///
/// ```ignore
/// assert_eq!(parse_hex_color("#FFF").unwrap(), Color::new(255, 255, 255, 255));
/// assert_eq!(parse_hex_color("#C8C8C880").unwrap(), Color::new(200, 200, 200, 128));
/// ```
pub fn parse_hex_color(hex: &str) -> Result<Color, WatermarkError> {
    let hex = hex
        .strip_prefix('#')
        .ok_or_else(|| WatermarkError::Config("Color must start with '#'".to_string()))?;

    if !hex.is_ascii() {
        return Err(WatermarkError::Config("Invalid hex digit".to_string()));
    }

    let digit = |s: &str| -> Result<u8, WatermarkError> {
        u8::from_str_radix(s, 16)
            .map_err(|_| WatermarkError::Config(format!("Invalid hex digit in '{}'", s)))
    };

    match hex.len() {
        3 | 4 => {
            // Short form: each digit doubles, 0xF -> 0xFF
            let r = digit(&hex[0..1])? * 17;
            let g = digit(&hex[1..2])? * 17;
            let b = digit(&hex[2..3])? * 17;
            let a = if hex.len() == 4 {
                digit(&hex[3..4])? * 17
            } else {
                255
            };
            Ok(Color::new(r, g, b, a))
        }
        6 | 8 => {
            let r = digit(&hex[0..2])?;
            let g = digit(&hex[2..4])?;
            let b = digit(&hex[4..6])?;
            let a = if hex.len() == 8 { digit(&hex[6..8])? } else { 255 };
            Ok(Color::new(r, g, b, a))
        }
        n => Err(WatermarkError::Config(format!(
            "Color must be #RGB, #RGBA, #RRGGBB or #RRGGBBAA, got {} digits",
            n
        ))),
    }
}

/// Size of the box a piece of text occupies when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
}

/// Measure `text` in `font`.
///
/// Outline fonts use summed advances (with kerning) by ascent minus descent.
/// The built-in face is a fixed cell per character.
pub fn measure_text(font: &WatermarkFont, text: &str) -> TextExtent {
    match font {
        WatermarkFont::Outline { font, scale, .. } => {
            let scaled = font.as_scaled(*scale);

            let mut width = 0.0f32;
            let mut prev_glyph: Option<ab_glyph::GlyphId> = None;
            for c in text.chars() {
                let glyph_id = scaled.glyph_id(c);
                if let Some(prev) = prev_glyph {
                    width += scaled.kern(prev, glyph_id);
                }
                width += scaled.h_advance(glyph_id);
                prev_glyph = Some(glyph_id);
            }

            let height = if text.is_empty() {
                0.0
            } else {
                scaled.ascent() - scaled.descent()
            };

            TextExtent {
                width: width.max(0.0).ceil() as u32,
                height: height.max(0.0).ceil() as u32,
            }
        }
        WatermarkFont::Builtin { scale } => {
            let cell = BUILTIN_CELL.saturating_mul(*scale);
            let chars = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);
            TextExtent {
                width: chars.saturating_mul(cell),
                height: if chars == 0 { 0 } else { cell },
            }
        }
    }
}

/// Top-left origin that centers `extent` on a canvas of `(width, height)`.
///
/// Negative when the text is larger than the canvas.
pub fn centered_origin(canvas: (u32, u32), extent: TextExtent) -> (f32, f32) {
    let (width, height) = canvas;
    (
        (width as f32 - extent.width as f32) / 2.0,
        (height as f32 - extent.height as f32) / 2.0,
    )
}

/// Draw `text` onto `canvas` with its box's top-left corner at `origin`.
///
/// Pixels outside the canvas are clipped.
pub fn draw_text(
    canvas: &mut RgbaImage,
    font: &WatermarkFont,
    origin: (f32, f32),
    text: &str,
    color: Color,
) {
    if text.is_empty() || color.a == 0 {
        return;
    }

    match font {
        WatermarkFont::Outline { font, scale, .. } => {
            draw_outline_text(canvas, font, *scale, origin, text, color)
        }
        WatermarkFont::Builtin { scale } => draw_builtin_text(canvas, *scale, origin, text, color),
    }
}

fn draw_outline_text(
    canvas: &mut RgbaImage,
    font: &ab_glyph::FontVec,
    scale: ab_glyph::PxScale,
    origin: (f32, f32),
    text: &str,
    color: Color,
) {
    let scaled_font = font.as_scaled(scale);
    let baseline_y = origin.1 + scaled_font.ascent();

    let mut cursor_x = origin.0;
    let mut prev_glyph: Option<ab_glyph::GlyphId> = None;

    for c in text.chars() {
        let glyph_id = scaled_font.glyph_id(c);

        if let Some(prev) = prev_glyph {
            cursor_x += scaled_font.kern(prev, glyph_id);
        }

        let glyph = glyph_id.with_scale_and_position(scale, ab_glyph::point(cursor_x, baseline_y));

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();

            outlined.draw(|px, py, coverage| {
                let x = i64::from(px) + bounds.min.x as i64;
                let y = i64::from(py) + bounds.min.y as i64;
                blend_at(canvas, x, y, color.with_coverage(coverage));
            });
        }

        cursor_x += scaled_font.h_advance(glyph_id);
        prev_glyph = Some(glyph_id);
    }
}

fn draw_builtin_text(
    canvas: &mut RgbaImage,
    scale: u32,
    origin: (f32, f32),
    text: &str,
    color: Color,
) {
    let cell = i64::from(BUILTIN_CELL) * i64::from(scale);
    let scale = i64::from(scale);
    let origin_x = origin.0.floor() as i64;
    let origin_y = origin.1.floor() as i64;
    let canvas_width = i64::from(canvas.width());
    let canvas_height = i64::from(canvas.height());
    let pixel = color.with_coverage(1.0);

    for (index, ch) in text.chars().enumerate() {
        let cell_x = origin_x.saturating_add((index as i64).saturating_mul(cell));
        if cell_x >= canvas_width {
            break;
        }
        if cell_x + cell <= 0 {
            continue;
        }

        for (row, bits) in builtin_glyph(ch).iter().enumerate() {
            for col in 0..i64::from(BUILTIN_CELL) {
                if (bits >> col) & 1 == 0 {
                    continue;
                }
                let base_x = cell_x + col * scale;
                let base_y = origin_y + row as i64 * scale;
                let xs = base_x.max(0)..(base_x + scale).min(canvas_width);
                let ys = base_y.max(0)..(base_y + scale).min(canvas_height);
                for y in ys {
                    for x in xs.clone() {
                        blend_at(canvas, x, y, pixel);
                    }
                }
            }
        }
    }
}

fn blend_at(canvas: &mut RgbaImage, x: i64, y: i64, pixel: Rgba<u8>) {
    if x < 0 || y < 0 || x >= i64::from(canvas.width()) || y >= i64::from(canvas.height()) {
        return;
    }
    if pixel[3] == 0 {
        return;
    }
    let existing = canvas.get_pixel(x as u32, y as u32);
    let blended = blend_pixels(*existing, pixel);
    canvas.put_pixel(x as u32, y as u32, blended);
}
