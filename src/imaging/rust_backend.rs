//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF) | `image::ImageReader` with content sniffing |
//! | Decode (CR2) | embedded JPEG rendition, see [`raw`](super::raw) |
//! | Resize | `resize_exact` / `resize` with `Lanczos3` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → TIFF | `tiff::encoder::TiffEncoder` (LZW / Deflate / none) |
//!
//! Encoding happens into memory; the output file is written only once the
//! encoder succeeded.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::params::{OutputFormat, Quality, ResizeMode, ResizeParams, TiffCompression};
use super::raw;
use crate::naming;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::{Cursor, Seek, Write};
use std::path::Path;
use tiff::encoder::compression::{Compression, Deflate, DeflateLevel, Lzw, Uncompressed};
use tiff::encoder::{TiffEncoder, colortype};

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Same extension rule as the walker, so a bare `.CR2` is still a CR2.
fn is_cr2(path: &Path) -> bool {
    naming::accepted_extension(path).as_deref() == Some("cr2")
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    if is_cr2(path) {
        return raw::decode_cr2(path);
    }
    ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| BackendError::Decode(e.to_string()))
}

fn resize_image(img: &DynamicImage, width: u32, height: u32, mode: ResizeMode) -> DynamicImage {
    match mode {
        ResizeMode::Exact => img.resize_exact(width, height, FilterType::Lanczos3),
        ResizeMode::Fit => img.resize(width, height, FilterType::Lanczos3),
    }
}

/// Encode `img` with the selected encoder into an in-memory buffer.
fn encode_image(img: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>, BackendError> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        OutputFormat::Jpeg(quality) => encode_jpeg(img, quality, &mut buffer)?,
        OutputFormat::Png => {
            let encoder = image::codecs::png::PngEncoder::new(&mut buffer);
            img.write_with_encoder(encoder)
                .map_err(|e| BackendError::Encode(format!("PNG: {}", e)))?;
        }
        OutputFormat::Tiff(compression) => encode_tiff(img, compression, &mut buffer)?,
    }
    Ok(buffer.into_inner())
}

/// JPEG carries neither alpha nor 16-bit samples; flatten to 8-bit first.
fn encode_jpeg<W: Write>(img: &DynamicImage, quality: Quality, writer: W) -> Result<(), BackendError> {
    let flattened = match img {
        DynamicImage::ImageLuma8(_) | DynamicImage::ImageRgb8(_) => None,
        DynamicImage::ImageLuma16(_) => Some(DynamicImage::ImageLuma8(img.to_luma8())),
        _ => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
    };
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(writer, quality.value());
    flattened
        .as_ref()
        .unwrap_or(img)
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::Encode(format!("JPEG: {}", e)))
}

fn encode_tiff<W: Write + Seek>(
    img: &DynamicImage,
    compression: TiffCompression,
    writer: W,
) -> Result<(), BackendError> {
    let mut encoder =
        TiffEncoder::new(writer).map_err(|e| BackendError::Encode(format!("TIFF: {}", e)))?;
    let result = match compression {
        TiffCompression::Lzw => write_tiff_pixels(&mut encoder, img, Lzw),
        TiffCompression::Deflate => {
            write_tiff_pixels(&mut encoder, img, Deflate::with_level(DeflateLevel::Balanced))
        }
        TiffCompression::Uncompressed => write_tiff_pixels(&mut encoder, img, Uncompressed),
    };
    result.map_err(|e| BackendError::Encode(format!("TIFF: {}", e)))
}

/// Write one image, keeping 8/16-bit gray, RGB and RGBA sample layouts.
fn write_tiff_pixels<W: Write + Seek, D: Compression>(
    encoder: &mut TiffEncoder<W>,
    img: &DynamicImage,
    compression: D,
) -> tiff::TiffResult<()> {
    let (width, height) = (img.width(), img.height());
    match img {
        DynamicImage::ImageLuma8(buf) => encoder
            .write_image_with_compression::<colortype::Gray8, D>(width, height, compression, buf.as_raw()),
        DynamicImage::ImageLuma16(buf) => encoder
            .write_image_with_compression::<colortype::Gray16, D>(width, height, compression, buf.as_raw()),
        DynamicImage::ImageRgb16(buf) => encoder
            .write_image_with_compression::<colortype::RGB16, D>(width, height, compression, buf.as_raw()),
        DynamicImage::ImageLumaA16(_) | DynamicImage::ImageRgba16(_) => {
            let rgba = img.to_rgba16();
            encoder.write_image_with_compression::<colortype::RGBA16, D>(
                width,
                height,
                compression,
                rgba.as_raw(),
            )
        }
        DynamicImage::ImageLumaA8(_) | DynamicImage::ImageRgba8(_) => {
            let rgba = img.to_rgba8();
            encoder.write_image_with_compression::<colortype::RGBA8, D>(
                width,
                height,
                compression,
                rgba.as_raw(),
            )
        }
        _ => {
            let rgb = img.to_rgb8();
            encoder.write_image_with_compression::<colortype::RGB8, D>(
                width,
                height,
                compression,
                rgb.as_raw(),
            )
        }
    }
}

impl ImageBackend for RustBackend {
    fn resize(&self, params: &ResizeParams) -> Result<Dimensions, BackendError> {
        let img = load_image(&params.source)?;
        log::debug!(
            target: "convert",
            "decoded {} ({}x{})",
            params.source.display(),
            img.width(),
            img.height()
        );

        let resized = resize_image(&img, params.width, params.height, params.mode);
        log::debug!(
            target: "convert",
            "resized {} to {}x{}",
            params.source.display(),
            resized.width(),
            resized.height()
        );

        let bytes = encode_image(&resized, params.format)?;
        log::debug!(
            target: "convert",
            "encoded {} as {} ({} bytes)",
            params.output.display(),
            params.format,
            bytes.len()
        );
        std::fs::write(&params.output, bytes)?;

        Ok(Dimensions {
            width: resized.width(),
            height: resized.height(),
        })
    }
}
