//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the seam between file-level orchestration
//! ([`convert`](crate::convert)) and pixel work. One call covers the whole
//! decode → resize → encode → write sequence for one file.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend): pure Rust codecs from
//! the `image` and `tiff` crates, statically linked into the binary.

use super::params::ResizeParams;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("encode failed: {0}")]
    Encode(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Implementations must decode before touching the output path: a decode
/// failure leaves no destination file behind.
pub trait ImageBackend: Sync {
    /// Decode `params.source`, resize it, encode it with `params.format` and
    /// write the result to `params.output` (overwriting). Returns the
    /// dimensions of the written image.
    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError>;
}
