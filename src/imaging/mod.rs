//! Image processing in pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` (JPEG, PNG, TIFF), embedded JPEG for CR2 |
//! | **EXIF** | `kamadak-exif` |
//! | **Resize** | Lanczos3, exact or fit-within |
//! | **Encode** | JPEG q95, PNG, TIFF (LZW / Deflate / none) |
//!
//! The module is split into:
//! - **Parameters**: [`OutputFormat`] (the encoder selector) and [`ResizeParams`]
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **EXIF reader**: tag decoding and JSON value mapping
//! - **Raw**: CR2 rendition extraction

pub mod backend;
pub mod exif_reader;
mod params;
mod raw;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use exif_reader::{ExifTags, ExifValue};
pub use params::{OutputFormat, Quality, ResizeMode, ResizeParams, TiffCompression};
pub use rust_backend::RustBackend;
