//! EXIF metadata extraction and JSON sidecars.
//!
//! For every converted image the source's EXIF tags are written next to the
//! output as `<output file name>.json`:
//!
//! ```text
//! dest/
//! ├── IMG_0001.jpeg
//! └── IMG_0001.jpeg.json     # {"DateTimeOriginal": "2023:06:01 10:12:44", "Make": "Canon", ...}
//! ```
//!
//! Extraction is best-effort. A missing EXIF block, a decode failure or an
//! empty tag set all surface as a [`MetadataError`]; the caller logs it and
//! carries on without a sidecar. [`extract`] is read-only; the converter
//! decides when to call [`write_sidecar`].

use crate::imaging::exif_reader::{self, ExifTags};
use std::ffi::OsString;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("no EXIF data in {}: {source}", path.display())]
    Exif {
        path: PathBuf,
        source: exif::Error,
    },
    #[error("EXIF block of {} has no tags", path.display())]
    Empty { path: PathBuf },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read the EXIF tags of `path`.
pub fn read_tags(path: &Path) -> Result<ExifTags, MetadataError> {
    let file = File::open(path).map_err(|source| MetadataError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let exif = exif_reader::read_exif(&mut BufReader::new(file)).map_err(|source| {
        MetadataError::Exif {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let tags = exif_reader::tag_map(&exif);
    if tags.is_empty() {
        return Err(MetadataError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(tags)
}

/// Extract the EXIF tags of `path` as a pretty-printed JSON object.
pub fn extract(path: &Path) -> Result<Vec<u8>, MetadataError> {
    let tags = read_tags(path)?;
    Ok(serde_json::to_vec_pretty(&tags)?)
}

/// Sidecar location for an output image: the full file name plus `.json`.
///
/// `dest/photo.jpeg` → `dest/photo.jpeg.json`
pub fn sidecar_path(output: &Path) -> PathBuf {
    let mut name = OsString::from(output.as_os_str());
    name.push(".json");
    PathBuf::from(name)
}

/// Write `payload` as the sidecar of `output`, returning the sidecar path.
pub fn write_sidecar(output: &Path, payload: &[u8]) -> std::io::Result<PathBuf> {
    let path = sidecar_path(output);
    std::fs::write(&path, payload)?;
    Ok(path)
}
