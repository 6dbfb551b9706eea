// Watermark pipeline tests against the public API

use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use rstest::rstest;
use sheetmark::watermark::{
    centered_origin, measure_text, rotated_canvas_size, FontRequest, WatermarkConfig,
    Watermarker,
};
use sheetmark::{add_watermark, WatermarkError};
use std::io::Cursor;
use std::path::Path;

const MISSING_FONT: &str = "/nonexistent/sheetmark/missing.ttf";

fn encode(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    img.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

fn white_png(width: u32, height: u32) -> Vec<u8> {
    encode(
        &RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255])),
        ImageFormat::Png,
    )
}

fn decode_rgb(data: &[u8]) -> RgbImage {
    image::load_from_memory_with_format(data, ImageFormat::Png)
        .expect("output should be a valid PNG")
        .to_rgb8()
}

fn watermark_builtin(data: &[u8]) -> Vec<u8> {
    add_watermark(data, "SAMPLE", Some(Path::new(MISSING_FONT))).unwrap()
}

#[rstest]
#[case(64, 64)]
#[case(200, 200)]
#[case(640, 480)]
#[case(480, 640)]
fn test_output_is_png_with_input_dimensions(#[case] width: u32, #[case] height: u32) {
    let output = watermark_builtin(&white_png(width, height));

    assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Png);
    assert_eq!(decode_rgb(&output).dimensions(), (width, height));
}

#[rstest]
#[case(64, 64)]
#[case(200, 200)]
#[case(640, 480)]
#[case(480, 640)]
fn test_output_differs_from_input(#[case] width: u32, #[case] height: u32) {
    let output = decode_rgb(&watermark_builtin(&white_png(width, height)));

    let changed = output.pixels().filter(|p| **p != Rgb([255, 255, 255])).count();
    assert!(changed > 0, "watermark should touch at least one pixel");
}

#[test]
fn test_watermark_pixels_are_translucent_gray_over_white() {
    let output = decode_rgb(&watermark_builtin(&white_png(300, 300)));

    // 200 at alpha 128 over 255 rounds to 227
    for p in output.pixels().filter(|p| **p != Rgb([255, 255, 255])) {
        assert_eq!(*p, Rgb([227, 227, 227]));
    }
}

#[test]
fn test_missing_font_falls_back() {
    let result = add_watermark(
        &white_png(120, 120),
        "SAMPLE",
        Some(Path::new(MISSING_FONT)),
    );
    assert!(result.is_ok());
}

#[test]
fn test_invalid_font_file_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("bogus.ttf");
    std::fs::write(&bogus, b"this is not a font").unwrap();

    let output = add_watermark(&white_png(120, 120), "SAMPLE", Some(bogus.as_path())).unwrap();
    assert_eq!(decode_rgb(&output).dimensions(), (120, 120));
}

#[rstest]
#[case(b"not an image at all".as_slice())]
#[case(b"".as_slice())]
#[case(b"\x89PNG\r\n\x1a\n".as_slice())]
fn test_malformed_input_is_decode_error(#[case] data: &[u8]) {
    let result = add_watermark(data, "SAMPLE", None);
    assert!(matches!(result, Err(WatermarkError::Decode(_))));
}

#[test]
fn test_text_origin_is_centered() {
    let (width, height) = (400, 300);
    let font = FontRequest::new(Some(Path::new(MISSING_FONT)), "arial.ttf").resolve(60);
    let extent = measure_text(&font, "SAMPLE");

    let (x, y) = centered_origin((width, height), extent);

    assert_eq!(x, (width as f32 - extent.width as f32) / 2.0);
    assert_eq!(y, (height as f32 - extent.height as f32) / 2.0);
    // Built-in face at 60px: 7x scale of an 8px cell
    assert_eq!((extent.width, extent.height), (336, 56));
    assert_eq!((x, y), (32.0, 122.0));
}

#[test]
fn test_double_application_darkens_further() {
    let once = watermark_builtin(&white_png(240, 240));
    let twice = watermark_builtin(&once);

    let once_rgb = decode_rgb(&once);
    let twice_rgb = decode_rgb(&twice);
    assert_ne!(once_rgb, twice_rgb);

    let darker = once_rgb
        .pixels()
        .zip(twice_rgb.pixels())
        .filter(|(a, b)| b[0] < a[0])
        .count();
    assert!(darker > 0);
}

#[test]
fn test_jpeg_input_produces_png() {
    let rgb = image::DynamicImage::ImageRgb8(RgbImage::from_pixel(160, 120, Rgb([30, 60, 90])));
    let mut buffer = Cursor::new(Vec::new());
    rgb.write_to(&mut buffer, ImageFormat::Jpeg).unwrap();
    let jpeg = buffer.into_inner();

    let output = watermark_builtin(&jpeg);
    assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Png);
    assert_eq!(decode_rgb(&output).dimensions(), (160, 120));
}

#[test]
fn test_alpha_is_discarded() {
    let translucent = encode(
        &RgbaImage::from_pixel(100, 100, Rgba([10, 20, 30, 0])),
        ImageFormat::Png,
    );
    let output = watermark_builtin(&translucent);

    let decoded = image::load_from_memory(&output).unwrap();
    assert!(!decoded.color().has_alpha());
}

#[test]
fn test_empty_text_leaves_pixels_unchanged() {
    let input = white_png(80, 80);
    let output = add_watermark(&input, "", None).unwrap();

    assert!(decode_rgb(&output).pixels().all(|p| *p == Rgb([255, 255, 255])));
}

#[test]
fn test_watermarker_is_reusable_across_threads() {
    let watermarker = Watermarker::new(WatermarkConfig::default().font_path(MISSING_FONT)).unwrap();
    let input = white_png(96, 96);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| watermarker.apply(&input).unwrap()))
            .collect();
        let outputs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(outputs.windows(2).all(|w| w[0] == w[1]));
    });
}

#[test]
fn test_rotated_canvas_covers_image() {
    let (w, h) = rotated_canvas_size(640, 480, 45.0);
    assert!(w >= 640);
    assert!(h >= 480);
}
