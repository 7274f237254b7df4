//! Shared test utilities for the batch-resize test suite.
//!
//! Fixtures are synthesized at test time instead of being checked in:
//! small gradient JPEGs from the `image` encoder, JPEGs carrying a
//! hand-built EXIF APP1 segment, and minimal TIFF containers whose IFD0
//! strip points at an arbitrary payload (the layout of a Canon CR2).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! create_test_jpeg(&tmp.path().join("plain.jpg"), 300, 200);
//! create_test_jpeg_with_exif(&tmp.path().join("camera.jpg"), 300, 200, "TestCam");
//! ```

use image::{ImageEncoder, RgbImage};
use std::path::Path;

// =========================================================================
// JPEG fixtures
// =========================================================================

/// Encode a gradient JPEG of the given size into memory. Carries no EXIF.
pub fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new(&mut bytes)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
    bytes
}

/// Create a small valid JPEG file with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    std::fs::write(path, jpeg_bytes(width, height)).unwrap();
}

/// A JPEG whose APP1 segment carries a single EXIF `Make` tag.
pub fn jpeg_with_exif_bytes(width: u32, height: u32, make: &str) -> Vec<u8> {
    let tiff = tiff_with_make(make);
    let segment_len = u16::try_from(2 + 6 + tiff.len()).unwrap();

    let jpeg = jpeg_bytes(width, height);
    let mut bytes = Vec::with_capacity(jpeg.len() + tiff.len() + 10);
    bytes.extend_from_slice(&jpeg[..2]); // SOI
    bytes.extend_from_slice(&[0xFF, 0xE1]);
    bytes.extend_from_slice(&segment_len.to_be_bytes());
    bytes.extend_from_slice(b"Exif\0\0");
    bytes.extend_from_slice(&tiff);
    bytes.extend_from_slice(&jpeg[2..]);
    bytes
}

/// Create a JPEG file with an EXIF `Make` tag.
pub fn create_test_jpeg_with_exif(path: &Path, width: u32, height: u32, make: &str) {
    std::fs::write(path, jpeg_with_exif_bytes(width, height, make)).unwrap();
}

// =========================================================================
// TIFF structures (little-endian)
// =========================================================================

const IFD0_OFFSET: u32 = 8;
const TYPE_ASCII: u16 = 2;
const TYPE_LONG: u16 = 4;

fn tiff_header() -> Vec<u8> {
    let mut bytes = b"II".to_vec();
    bytes.extend_from_slice(&42u16.to_le_bytes());
    bytes.extend_from_slice(&IFD0_OFFSET.to_le_bytes());
    bytes
}

fn ifd_entry(bytes: &mut Vec<u8>, tag: u16, kind: u16, count: u32, value: u32) {
    bytes.extend_from_slice(&tag.to_le_bytes());
    bytes.extend_from_slice(&kind.to_le_bytes());
    bytes.extend_from_slice(&count.to_le_bytes());
    bytes.extend_from_slice(&value.to_le_bytes());
}

/// TIFF-structured EXIF block with IFD0 holding only `Make`.
fn tiff_with_make(make: &str) -> Vec<u8> {
    let mut text = make.as_bytes().to_vec();
    text.push(0);
    // header + entry count + one entry + next-IFD offset
    let data_offset = IFD0_OFFSET + 2 + 12 + 4;

    let mut bytes = tiff_header();
    bytes.extend_from_slice(&1u16.to_le_bytes());
    if text.len() <= 4 {
        let mut inline = [0u8; 4];
        inline[..text.len()].copy_from_slice(&text);
        ifd_entry(
            &mut bytes,
            0x010F,
            TYPE_ASCII,
            text.len() as u32,
            u32::from_le_bytes(inline),
        );
        bytes.extend_from_slice(&0u32.to_le_bytes());
    } else {
        ifd_entry(&mut bytes, 0x010F, TYPE_ASCII, text.len() as u32, data_offset);
        bytes.extend_from_slice(&0u32.to_le_bytes());
        bytes.extend_from_slice(&text);
    }
    bytes
}

/// TIFF container whose IFD0 `StripOffsets`/`StripByteCounts` reference
/// `payload`, appended after the IFD.
pub fn tiff_with_strip(payload: &[u8]) -> Vec<u8> {
    // header + entry count + two entries + next-IFD offset
    let payload_offset = IFD0_OFFSET + 2 + 2 * 12 + 4;

    let mut bytes = tiff_header();
    bytes.extend_from_slice(&2u16.to_le_bytes());
    ifd_entry(&mut bytes, 0x0111, TYPE_LONG, 1, payload_offset);
    ifd_entry(&mut bytes, 0x0117, TYPE_LONG, 1, payload.len() as u32);
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(payload);
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exif_jpeg_still_decodes() {
        let bytes = jpeg_with_exif_bytes(20, 10, "TestCam");
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (20, 10));
    }

    #[test]
    fn strip_container_layout() {
        let data = tiff_with_strip(b"abc");
        assert_eq!(&data[..4], b"II*\0");
        assert_eq!(&data[data.len() - 3..], b"abc");
    }
}
