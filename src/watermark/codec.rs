//! Decoding input bytes and encoding the PNG result.

use crate::error::WatermarkError;
use image::io::Reader as ImageReader;
use image::{RgbImage, RgbaImage};
use std::io::Cursor;

/// Decode image bytes (format sniffed from content) into RGBA8.
pub fn decode_rgba(data: &[u8]) -> Result<RgbaImage, WatermarkError> {
    if data.is_empty() {
        return Err(WatermarkError::Decode("input is empty".to_string()));
    }

    let image = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| WatermarkError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| WatermarkError::Decode(e.to_string()))?;

    Ok(image.to_rgba8())
}

/// Encode an RGB8 buffer as PNG.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>, WatermarkError> {
    use image::codecs::png::PngEncoder;
    use image::ImageEncoder as _;

    let (width, height) = image.dimensions();
    // Header plus roughly one byte per pixel after deflate on flat artwork.
    let mut output = Cursor::new(Vec::with_capacity((width * height) as usize / 2 + 64));
    PngEncoder::new(&mut output)
        .write_image(image.as_raw(), width, height, image::ColorType::Rgb8)
        .map_err(|e| WatermarkError::Encode(e.to_string()))?;

    Ok(output.into_inner())
}
