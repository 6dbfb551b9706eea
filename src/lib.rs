// Sheetmark Watermarking Library

pub mod config;
pub mod error;
pub mod logging;
pub mod watermark;

pub use error::WatermarkError;
pub use watermark::{add_watermark, WatermarkConfig, Watermarker};
