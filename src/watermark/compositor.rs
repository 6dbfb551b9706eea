//! Alpha compositing of the watermark overlay onto the source image.
//!
//! Uses the Porter-Duff "over" operator on straight (non-premultiplied) alpha,
//! then flattens the result to RGB by dropping the alpha channel.

use crate::error::WatermarkError;
use image::{Rgb, RgbImage, Rgba, RgbaImage};

/// Composite `overlay` over `base` in place.
///
/// Both images must have the same dimensions.
pub fn alpha_composite(base: &mut RgbaImage, overlay: &RgbaImage) -> Result<(), WatermarkError> {
    if base.dimensions() != overlay.dimensions() {
        return Err(WatermarkError::Composite {
            width: base.width(),
            height: base.height(),
            overlay_width: overlay.width(),
            overlay_height: overlay.height(),
        });
    }

    for (target, top) in base.pixels_mut().zip(overlay.pixels()) {
        if top[3] == 0 {
            continue;
        }
        *target = blend_pixels(*target, *top);
    }

    Ok(())
}

/// Drop the alpha channel. Color values are kept as-is, no matting.
pub fn flatten_to_rgb(image: RgbaImage) -> RgbImage {
    let (width, height) = image.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        let p = image.get_pixel(x, y);
        Rgb([p[0], p[1], p[2]])
    })
}

/// Blend two pixels: result = foreground + background * (1 - foreground.alpha)
pub(crate) fn blend_pixels(background: Rgba<u8>, foreground: Rgba<u8>) -> Rgba<u8> {
    let fg_alpha = foreground[3] as f32 / 255.0;
    let bg_alpha = background[3] as f32 / 255.0;

    let out_alpha = fg_alpha + bg_alpha * (1.0 - fg_alpha);

    if out_alpha < 0.001 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend_channel = |fg: u8, bg: u8| -> u8 {
        let fg_f = fg as f32 / 255.0;
        let bg_f = bg as f32 / 255.0;
        let result = (fg_f * fg_alpha + bg_f * bg_alpha * (1.0 - fg_alpha)) / out_alpha;
        (result * 255.0).round().clamp(0.0, 255.0) as u8
    };

    Rgba([
        blend_channel(foreground[0], background[0]),
        blend_channel(foreground[1], background[1]),
        blend_channel(foreground[2], background[2]),
        (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}
