// Font loading and fallback tests

use sheetmark::watermark::font::{builtin_glyph, BUILTIN_CELL};
use sheetmark::watermark::{measure_text, FontError, FontRequest, WatermarkFont};
use std::path::Path;

#[test]
fn test_from_file_missing_is_not_found() {
    let result = WatermarkFont::from_file(Path::new("/nonexistent/font.ttf"), 24);
    assert!(matches!(result, Err(FontError::NotFound(_))));
}

#[test]
fn test_from_file_garbage_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("garbage.otf");
    std::fs::write(&path, [0u8; 64]).unwrap();

    let result = WatermarkFont::from_file(&path, 24);
    assert!(matches!(result, Err(FontError::Invalid(_))));
}

#[test]
fn test_from_file_zero_size() {
    let result = WatermarkFont::from_file(Path::new("/nonexistent/font.ttf"), 0);
    assert!(matches!(result, Err(FontError::ZeroSize)));
}

#[test]
fn test_request_for_unknown_system_font_uses_builtin() {
    let font = FontRequest::new(None, "sheetmark-no-such-face-8c1f.ttf").resolve(40);
    assert!(font.is_builtin());
    assert_eq!(font.size_px(), 40.0);
}

#[test]
fn test_request_for_directory_uses_builtin() {
    let dir = tempfile::tempdir().unwrap();
    let font = FontRequest::new(Some(dir.path()), "arial.ttf").resolve(16);
    assert!(font.is_builtin());
}

#[test]
fn test_builtin_scale_never_below_one() {
    let font = WatermarkFont::builtin(3);
    assert_eq!(font.size_px(), BUILTIN_CELL as f32);

    let extent = measure_text(&font, "AB");
    assert_eq!((extent.width, extent.height), (16, 8));
}

#[test]
fn test_builtin_glyph_unknown_char_renders_question_mark() {
    assert_eq!(builtin_glyph('\u{1F600}'), builtin_glyph('?'));
    assert_ne!(builtin_glyph('S'), [0; 8]);
    assert_eq!(builtin_glyph(' '), [0; 8]);
}

#[test]
fn test_font_error_messages() {
    assert_eq!(
        FontError::NotFound("arial.ttf".to_string()).to_string(),
        "Font not found: arial.ttf"
    );
    assert_eq!(
        FontError::ZeroSize.to_string(),
        "Font size must be greater than zero"
    );
}
