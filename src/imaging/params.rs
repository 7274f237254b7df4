//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! the [`convert`](crate::convert) step (which decides which file goes where)
//! and the [`backend`](super::backend) (which does the pixel work), so a mock
//! backend can stand in for the real codecs in tests.
//!
//! ## Types
//!
//! - [`OutputFormat`]: the encoder chosen from a `-type` token, with its file extension.
//! - [`TiffCompression`]: LZW, Deflate or none.
//! - [`Quality`]: lossy encoding quality (1–100). Clamped on construction.
//! - [`ResizeMode`]: exact stretch to the target size, or fit within it.
//! - [`ResizeParams`]: everything one conversion needs: source, output, target size, encoder.

use std::fmt;
use std::path::PathBuf;

/// Quality setting for lossy image encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u8) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(95)
    }
}

/// Compression applied inside a TIFF container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TiffCompression {
    Lzw,
    Deflate,
    Uncompressed,
}

/// Output encoder selected by the `-type` token.
///
/// | token | encoder | extension |
/// |---|---|---|
/// | `jpeg` | JPEG, quality 95 | `jpeg` |
/// | `tiff`, `tiff-deflate` | TIFF, Deflate | `tif` |
/// | `tiff-lzw` | TIFF, LZW | `tif` |
/// | `tiff-none` | TIFF, uncompressed | `tif` |
/// | `png` | PNG | `png` |
/// | anything else | JPEG, quality 95 | `jpeg` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg(Quality),
    Tiff(TiffCompression),
    Png,
}

impl OutputFormat {
    /// Every token with a dedicated encoder. Matching is case-sensitive.
    pub const TOKENS: &'static [&'static str] =
        &["jpeg", "tiff", "tiff-lzw", "tiff-deflate", "tiff-none", "png"];

    /// Map a `-type` token to an encoder.
    ///
    /// Total: unknown tokens (including the empty string) fall back to JPEG
    /// rather than failing.
    pub fn from_token(token: &str) -> Self {
        match token {
            "tiff" | "tiff-deflate" => Self::Tiff(TiffCompression::Deflate),
            "tiff-lzw" => Self::Tiff(TiffCompression::Lzw),
            "tiff-none" => Self::Tiff(TiffCompression::Uncompressed),
            "png" => Self::Png,
            _ => Self::Jpeg(Quality::default()),
        }
    }

    /// File extension (without the dot) written for this encoder.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg(_) => "jpeg",
            Self::Tiff(_) => "tif",
            Self::Png => "png",
        }
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Jpeg(Quality::default())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jpeg(q) => write!(f, "JPEG (quality {})", q.value()),
            Self::Tiff(TiffCompression::Lzw) => f.write_str("TIFF (LZW)"),
            Self::Tiff(TiffCompression::Deflate) => f.write_str("TIFF (Deflate)"),
            Self::Tiff(TiffCompression::Uncompressed) => f.write_str("TIFF (uncompressed)"),
            Self::Png => f.write_str("PNG"),
        }
    }
}

/// How the decoded image is mapped onto the target width × height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResizeMode {
    /// Stretch to exactly width × height, ignoring the source aspect ratio.
    #[default]
    Exact,
    /// Largest size that fits within width × height, aspect ratio kept.
    Fit,
}

/// Parameters for one decode → resize → encode operation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub mode: ResizeMode,
    pub format: OutputFormat,
}
