//! Font resolution for text watermarks.
//!
//! Resolution is an explicit two-step lookup:
//!
//! 1. The requested font file, or the named system default when no path was
//!    given. Bare file names are searched for in the platform font directories.
//! 2. The built-in 8x8 bitmap face, which cannot fail.
//!
//! Each step-one failure is a typed [`FontError`] that is logged and then
//! discarded; nothing here ever fails a watermark call.

use ab_glyph::{FontVec, PxScale};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Named font tried when the caller does not supply a path.
pub const DEFAULT_SYSTEM_FONT: &str = "arial.ttf";

/// Edge length of a built-in glyph cell, in unscaled pixels.
pub const BUILTIN_CELL: u32 = 8;

/// Reasons a font file could not be used.
#[derive(Debug, Error)]
pub enum FontError {
    #[error("Font not found: {0}")]
    NotFound(String),

    #[error("Failed to read font {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Not a usable TrueType/OpenType font: {0}")]
    Invalid(PathBuf),

    #[error("Font size must be greater than zero")]
    ZeroSize,
}

/// A font ready to lay out and rasterize text at a fixed pixel size.
pub enum WatermarkFont {
    /// A TrueType/OpenType face loaded from disk.
    Outline {
        font: FontVec,
        scale: PxScale,
        source: PathBuf,
    },
    /// The built-in bitmap face, scaled by an integer factor.
    Builtin { scale: u32 },
}

impl std::fmt::Debug for WatermarkFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Outline { scale, source, .. } => f
                .debug_struct("Outline")
                .field("source", source)
                .field("scale", &scale.y)
                .finish(),
            Self::Builtin { scale } => f.debug_struct("Builtin").field("scale", scale).finish(),
        }
    }
}

impl WatermarkFont {
    /// The built-in face sized as close to `size_px` as whole cells allow.
    pub fn builtin(size_px: u32) -> Self {
        Self::Builtin {
            scale: (size_px / BUILTIN_CELL).max(1),
        }
    }

    /// Load an outline font from `path` at `size_px` pixels.
    pub fn from_file(path: &Path, size_px: u32) -> Result<Self, FontError> {
        if size_px == 0 {
            return Err(FontError::ZeroSize);
        }

        let data = std::fs::read(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                FontError::NotFound(path.display().to_string())
            } else {
                FontError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        let font = FontVec::try_from_vec(data).map_err(|_| FontError::Invalid(path.to_path_buf()))?;

        Ok(Self::Outline {
            font,
            scale: PxScale::from(size_px as f32),
            source: path.to_path_buf(),
        })
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, Self::Builtin { .. })
    }

    /// Nominal pixel height of a line of text.
    pub fn size_px(&self) -> f32 {
        match self {
            Self::Outline { scale, .. } => scale.y,
            Self::Builtin { scale } => (BUILTIN_CELL * scale) as f32,
        }
    }
}

/// Bitmap rows for `ch` in the built-in face, `?` for unsupported characters.
///
/// Bit 0 of each row is the leftmost pixel.
pub fn builtin_glyph(ch: char) -> [u8; 8] {
    BASIC_FONTS
        .get(ch)
        .or_else(|| BASIC_FONTS.get('?'))
        .unwrap_or([0; 8])
}

/// What the caller asked for: an explicit font path, or a named system font.
#[derive(Debug, Clone, Copy)]
pub struct FontRequest<'a> {
    path: Option<&'a Path>,
    system_font: &'a str,
}

impl<'a> FontRequest<'a> {
    pub fn new(path: Option<&'a Path>, system_font: &'a str) -> Self {
        Self { path, system_font }
    }

    /// Resolve to a usable font, falling back to the built-in face.
    pub fn resolve(&self, size_px: u32) -> WatermarkFont {
        match self.load_named(size_px) {
            Ok(font) => {
                tracing::debug!(font = ?font, size_px, "Loaded watermark font");
                font
            }
            Err(error) => {
                tracing::warn!(
                    requested = %self.name(),
                    error = %error,
                    size_px,
                    "Falling back to built-in watermark font"
                );
                WatermarkFont::builtin(size_px)
            }
        }
    }

    fn name(&self) -> String {
        match self.path {
            Some(path) => path.display().to_string(),
            None => self.system_font.to_string(),
        }
    }

    /// Find the file this request names, without loading it.
    ///
    /// Bare file names that are not in the working directory trigger a walk
    /// of [`font_search_dirs`], which can be slow; callers that render many
    /// images should locate once and keep the path.
    pub fn locate(&self) -> Result<PathBuf, FontError> {
        let requested = match self.path {
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(self.system_font),
        };

        if requested.is_file() {
            return Ok(requested);
        }

        // Only bare file names are looked up in the system directories;
        // a path with directories that doesn't exist is simply missing.
        if requested.components().count() == 1 {
            if let Some(found) = locate_font(&requested.to_string_lossy()) {
                return Ok(found);
            }
        }

        Err(FontError::NotFound(requested.display().to_string()))
    }

    fn load_named(&self, size_px: u32) -> Result<WatermarkFont, FontError> {
        if size_px == 0 {
            return Err(FontError::ZeroSize);
        }
        WatermarkFont::from_file(&self.locate()?, size_px)
    }
}

/// Directories searched for bare font file names, in priority order.
pub fn font_search_dirs() -> Vec<PathBuf> {
    let mut dirs_out = Vec::new();

    if let Some(windir) = std::env::var_os("WINDIR") {
        dirs_out.push(PathBuf::from(windir).join("Fonts"));
    }

    if let Some(user_fonts) = dirs::font_dir() {
        dirs_out.push(user_fonts);
    }

    if cfg!(target_os = "macos") {
        dirs_out.push(PathBuf::from("/Library/Fonts"));
        dirs_out.push(PathBuf::from("/System/Library/Fonts"));
    }

    let data_dirs = std::env::var("XDG_DATA_DIRS")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
    for dir in data_dirs.split(':').filter(|d| !d.is_empty()) {
        dirs_out.push(Path::new(dir).join("fonts"));
    }

    if let Some(home) = dirs::home_dir() {
        dirs_out.push(home.join(".fonts"));
    }

    dirs_out.dedup();
    dirs_out
}

/// Find a font file by name in the system font directories.
///
/// Matching is case-insensitive on the file name. A name without an
/// extension also matches `.ttf`, `.otf` and `.ttc` files.
pub fn locate_font(name: &str) -> Option<PathBuf> {
    locate_font_in(name, &font_search_dirs())
}

pub(crate) fn locate_font_in(name: &str, search_dirs: &[PathBuf]) -> Option<PathBuf> {
    let wanted = name.to_lowercase();
    let has_extension = Path::new(&wanted).extension().is_some();

    let matches = |file_name: &str| -> bool {
        let file_name = file_name.to_lowercase();
        if has_extension {
            return file_name == wanted;
        }
        ["ttf", "otf", "ttc"]
            .iter()
            .any(|ext| file_name == format!("{}.{}", wanted, ext))
    };

    search_dirs
        .iter()
        .filter(|dir| dir.is_dir())
        .flat_map(|dir| {
            WalkDir::new(dir)
                .follow_links(true)
                .into_iter()
                .filter_map(Result::ok)
        })
        .find(|entry| entry.file_type().is_file() && matches(&entry.file_name().to_string_lossy()))
        .map(|entry| entry.into_path())
}
