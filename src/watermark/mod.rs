//! Diagonal text watermarks for raster images.
//!
//! A watermark call decodes the input, draws the text centered on a
//! transparent overlay, rotates the overlay, composites it over the image,
//! drops the alpha channel and encodes PNG.
//!
//! # Example
//!
//! ```ignore
//! let png = std::fs::read("sheet.png")?;
//! let marked = sheetmark::add_watermark(&png, "SAMPLE", None)?;
//! std::fs::write("sheet_sample.png", marked)?;
//! ```
//!
//! # Fonts
//!
//! The requested font file is used when it loads. Without one, the named
//! system font (`arial.ttf` unless configured) is looked up in the platform
//! font directories. If neither loads, a built-in bitmap face is used, so
//! font problems never fail a call.

pub mod codec;
pub mod compositor;
pub mod config;
pub mod font;
pub mod processor;
pub mod rotate;
pub mod text_renderer;

pub use codec::{decode_rgba, encode_png};
pub use compositor::{alpha_composite, flatten_to_rgb};
pub use config::{WatermarkConfig, DEFAULT_TEXT};
pub use font::{FontError, FontRequest, WatermarkFont, DEFAULT_SYSTEM_FONT};
pub use processor::{add_watermark, font_size_for, Watermarker};
pub use rotate::{crop_to, rotate_expand, rotated_canvas_size, CropAnchor, Resample};
pub use text_renderer::{
    centered_origin, draw_text, measure_text, parse_hex_color, Color, TextExtent,
};
