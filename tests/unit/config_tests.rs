// Configuration file loading tests

use sheetmark::config::Config;
use sheetmark::logging::LogFormat;
use sheetmark::watermark::{CropAnchor, Resample, Watermarker};
use std::io::Write;
use std::path::PathBuf;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_from_file_reads_full_config() {
    let file = write_config(
        r##"
log_format: json
watermark:
  text: "PROOF"
  font_path: /usr/share/fonts/truetype/dejavu/DejaVuSans.ttf
  color: "#FF000040"
  angle_degrees: 30
  font_size_divisor: 8
  crop_anchor: center
  resample: bilinear
"##,
    );

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.log_format, LogFormat::Json);

    let watermark = &config.watermark;
    assert_eq!(watermark.text, "PROOF");
    assert_eq!(
        watermark.font_path,
        Some(PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"))
    );
    assert_eq!(watermark.color, "#FF000040");
    assert_eq!(watermark.angle_degrees, 30.0);
    assert_eq!(watermark.font_size_divisor, 8);
    assert_eq!(watermark.crop_anchor, CropAnchor::Center);
    assert_eq!(watermark.resample, Resample::Bilinear);
}

#[test]
fn test_from_file_partial_config_keeps_defaults() {
    let file = write_config("watermark:\n  text: DRAFT\n");

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.watermark.text, "DRAFT");
    assert_eq!(config.watermark.color, "#C8C8C880");
    assert_eq!(config.watermark.angle_degrees, 45.0);
    assert_eq!(config.log_format, LogFormat::Text);
}

#[test]
fn test_from_file_substitutes_environment() {
    std::env::set_var("SHEETMARK_CONFIG_TEST_TEXT", "INTERNAL");
    let file = write_config("watermark:\n  text: \"${SHEETMARK_CONFIG_TEST_TEXT}\"\n");

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.watermark.text, "INTERNAL");
}

#[test]
fn test_invalid_color_fails_validation_and_construction() {
    let file = write_config("watermark:\n  color: \"#12\"\n");

    let config = Config::from_file(file.path()).unwrap();
    assert!(config.validate().is_err());
    assert!(Watermarker::new(config.watermark).is_err());
}

#[test]
fn test_unknown_log_format_is_rejected() {
    let file = write_config("log_format: xml\n");
    assert!(Config::from_file(file.path()).is_err());
}
