//! Expanding rotation of the overlay and the crop back to image size.
//!
//! The rotation grows the canvas so no pixel is clipped, which moves the
//! content center to the middle of a larger canvas. Cropping that canvas with
//! [`CropAnchor::TopLeft`] therefore does *not* put the watermark back in the
//! middle of the image; it lands up and to the left of center. That is the
//! long-standing output of this tool and stays the default. [`CropAnchor::Center`]
//! is available for callers who want the centered result instead.

use image::{imageops, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

/// Sampling used when rotating.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Resample {
    #[default]
    Nearest,
    Bilinear,
}

/// Where the image-sized window is taken from the rotated canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CropAnchor {
    /// Window starts at (0, 0) of the expanded canvas.
    #[default]
    TopLeft,
    /// Window is centered on the expanded canvas.
    Center,
}

/// Rotate `image` counter-clockwise by `degrees` around its center,
/// growing the canvas to hold every rotated pixel. Uncovered area is transparent.
pub fn rotate_expand(image: &RgbaImage, degrees: f32, resample: Resample) -> RgbaImage {
    let (src_w, src_h) = image.dimensions();
    let (sin, cos) = rotation_terms(degrees);
    let (dst_w, dst_h) = expanded_size(src_w, src_h, sin, cos);

    let mut rotated = RgbaImage::new(dst_w, dst_h);
    if src_w == 0 || src_h == 0 {
        return rotated;
    }

    let src_cx = src_w as f64 / 2.0;
    let src_cy = src_h as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    // Inverse mapping: destination pixel centers back to source coordinates.
    for (dx, dy, pixel) in rotated.enumerate_pixels_mut() {
        let rx = dx as f64 + 0.5 - dst_cx;
        let ry = dy as f64 + 0.5 - dst_cy;

        let sx = cos * rx - sin * ry + src_cx;
        let sy = sin * rx + cos * ry + src_cy;

        let sampled = match resample {
            Resample::Nearest => sample_nearest(image, sx, sy),
            Resample::Bilinear => sample_bilinear(image, sx, sy),
        };
        if let Some(p) = sampled {
            *pixel = p;
        }
    }

    rotated
}

/// Canvas size needed to hold a `width` x `height` image rotated by `degrees`.
pub fn rotated_canvas_size(width: u32, height: u32, degrees: f32) -> (u32, u32) {
    let (sin, cos) = rotation_terms(degrees);
    expanded_size(width, height, sin, cos)
}

/// Take a `width` x `height` window out of `image`.
///
/// Parts of the window that fall outside `image` come out transparent.
pub fn crop_to(image: &RgbaImage, width: u32, height: u32, anchor: CropAnchor) -> RgbaImage {
    if image.dimensions() == (width, height) {
        return image.clone();
    }

    let (offset_x, offset_y) = match anchor {
        CropAnchor::TopLeft => (0i64, 0i64),
        CropAnchor::Center => (
            (image.width() as i64 - width as i64) / 2,
            (image.height() as i64 - height as i64) / 2,
        ),
    };

    let mut window = RgbaImage::new(width, height);
    imageops::replace(&mut window, image, -offset_x, -offset_y);
    window
}

/// sin/cos rounded to 15 places so right angles stay exact.
fn rotation_terms(degrees: f32) -> (f64, f64) {
    let radians = (degrees as f64).rem_euclid(360.0).to_radians();
    let round15 = |v: f64| (v * 1e15).round() / 1e15;
    (round15(radians.sin()), round15(radians.cos()))
}

fn expanded_size(width: u32, height: u32, sin: f64, cos: f64) -> (u32, u32) {
    let w = width as f64;
    let h = height as f64;
    let cx = w / 2.0;
    let cy = h / 2.0;

    let corners = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);

    for (x, y) in corners {
        let ox = x - cx;
        let oy = y - cy;
        let rx = cos * ox + sin * oy + cx;
        let ry = -sin * ox + cos * oy + cy;
        min_x = min_x.min(rx);
        max_x = max_x.max(rx);
        min_y = min_y.min(ry);
        max_y = max_y.max(ry);
    }

    (
        (max_x.ceil() - min_x.floor()).max(0.0) as u32,
        (max_y.ceil() - min_y.floor()).max(0.0) as u32,
    )
}

fn sample_nearest(image: &RgbaImage, sx: f64, sy: f64) -> Option<Rgba<u8>> {
    if sx < 0.0 || sy < 0.0 || sx >= image.width() as f64 || sy >= image.height() as f64 {
        return None;
    }
    Some(*image.get_pixel(sx.floor() as u32, sy.floor() as u32))
}

fn sample_bilinear(image: &RgbaImage, sx: f64, sy: f64) -> Option<Rgba<u8>> {
    let (w, h) = image.dimensions();
    if sx < 0.0 || sy < 0.0 || sx >= w as f64 || sy >= h as f64 {
        return None;
    }

    // Shift from pixel-center to pixel-index space.
    let px = (sx - 0.5).max(0.0);
    let py = (sy - 0.5).max(0.0);
    let x0 = (px.floor() as u32).min(w - 1);
    let y0 = (py.floor() as u32).min(h - 1);
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    let fx = (px - x0 as f64).clamp(0.0, 1.0);
    let fy = (py - y0 as f64).clamp(0.0, 1.0);

    let p00 = image.get_pixel(x0, y0);
    let p10 = image.get_pixel(x1, y0);
    let p01 = image.get_pixel(x0, y1);
    let p11 = image.get_pixel(x1, y1);

    let interpolate = |c: usize| -> u8 {
        let v = p00[c] as f64 * (1.0 - fx) * (1.0 - fy)
            + p10[c] as f64 * fx * (1.0 - fy)
            + p01[c] as f64 * (1.0 - fx) * fy
            + p11[c] as f64 * fx * fy;
        v.round().clamp(0.0, 255.0) as u8
    };

    Some(Rgba([
        interpolate(0),
        interpolate(1),
        interpolate(2),
        interpolate(3),
    ]))
}
