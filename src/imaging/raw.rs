//! Canon CR2 decoding through the embedded JPEG rendition.
//!
//! A CR2 is a TIFF container whose IFD0 strip holds a full-size JPEG of
//! the raw capture. That strip is decoded first. Files with a damaged or
//! unusual IFD0 fall back to the largest embedded JPEG stream that decodes.
//! Sensor data is never demosaiced.

use super::backend::BackendError;
use super::exif_reader::primary_strip_range;
use image::{DynamicImage, ImageFormat};
use std::path::Path;

const SOI: [u8; 2] = [0xFF, 0xD8];
const EOI: [u8; 2] = [0xFF, 0xD9];

/// Stray SOI byte pairs occur in sensor data; stop after this many attempts.
const MAX_SCAN_CANDIDATES: usize = 16;

/// Decode a CR2 file into its embedded full-size rendition.
pub fn decode_cr2(path: &Path) -> Result<DynamicImage, BackendError> {
    let data = std::fs::read(path)?;

    if let Some(range) = primary_strip_range(&data) {
        let strip = &data[range];
        if strip.starts_with(&SOI) {
            match image::load_from_memory_with_format(strip, ImageFormat::Jpeg) {
                Ok(img) => return Ok(img),
                Err(e) => log::debug!(
                    target: "convert",
                    "IFD0 preview of {} did not decode: {}",
                    path.display(),
                    e
                ),
            }
        }
    }

    largest_embedded_jpeg(&data)
        .ok_or_else(|| BackendError::Decode("no decodable JPEG rendition".to_string()))
}

/// Try SOI…EOI spans, largest first, and return the first that decodes.
fn largest_embedded_jpeg(data: &[u8]) -> Option<DynamicImage> {
    jpeg_spans(data)
        .into_iter()
        .take(MAX_SCAN_CANDIDATES)
        .find_map(|span| image::load_from_memory_with_format(&data[span], ImageFormat::Jpeg).ok())
}

/// Candidate JPEG byte ranges: each SOI marker up to the last EOI after it.
/// Earlier markers give longer spans, so the result is ordered largest first.
fn jpeg_spans(data: &[u8]) -> Vec<std::ops::Range<usize>> {
    let Some(last_eoi) = data.windows(2).rposition(|w| w == EOI) else {
        return Vec::new();
    };
    data.windows(2)
        .enumerate()
        .filter(|(i, w)| *w == SOI && *i < last_eoi)
        .map(|(i, _)| i..last_eoi + 2)
        .collect()
}
