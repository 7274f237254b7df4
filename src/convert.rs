//! Single-image conversion.
//!
//! One accepted source file becomes one output image plus, when the source
//! carries EXIF data, a JSON sidecar:
//!
//! ```text
//! photos/IMG_0001.CR2  ──►  1920x1080/IMG_0001.jpeg
//!                           1920x1080/IMG_0001.jpeg.json
//! ```
//!
//! The steps run in a fixed order:
//!
//! 1. Extract EXIF from the source. Failure is logged under `[exif]` and the
//!    conversion goes on.
//! 2. Write the sidecar, overwriting any existing one.
//! 3. Decode, resize and encode through the [`ImageBackend`], overwriting any
//!    existing output.
//!
//! A failure in step 3 is returned to the walker, which reports it and moves
//! on to the next file. No output file is left behind for a source that fails
//! to decode or encode.

use crate::config::RunConfig;
use crate::imaging::{BackendError, Dimensions, ImageBackend, ResizeParams};
use crate::metadata;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("{}: {source}", path.display())]
    Backend {
        path: PathBuf,
        source: BackendError,
    },
    #[error("cannot create {}: {source}", dir.display())]
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
}

/// A successfully converted image.
#[derive(Debug, Clone, PartialEq)]
pub struct Converted {
    pub output: PathBuf,
    /// Sidecar written next to the output, if the source had EXIF tags.
    pub sidecar: Option<PathBuf>,
    pub dimensions: Dimensions,
}

/// Convert `source` to `output` with the settings in `config`.
pub fn convert_image(
    backend: &impl ImageBackend,
    config: &RunConfig,
    source: &Path,
    output: &Path,
) -> Result<Converted, ConvertError> {
    if config.mirror {
        if let Some(parent) = output.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConvertError::CreateDir {
                dir: parent.to_path_buf(),
                source,
            })?;
        }
    }

    let sidecar = write_exif_sidecar(source, output);

    let params = ResizeParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        width: config.width,
        height: config.height,
        mode: config.mode,
        format: config.format,
    };
    let dimensions = backend
        .resize(&params)
        .map_err(|source_err| ConvertError::Backend {
            path: source.to_path_buf(),
            source: source_err,
        })?;

    Ok(Converted {
        output: output.to_path_buf(),
        sidecar,
        dimensions,
    })
}

fn write_exif_sidecar(source: &Path, output: &Path) -> Option<PathBuf> {
    let payload = match metadata::extract(source) {
        Ok(payload) => payload,
        Err(e) => {
            log::warn!(target: "exif", "couldn't read data from {}: {}", source.display(), e);
            return None;
        }
    };
    match metadata::write_sidecar(output, &payload) {
        Ok(path) => Some(path),
        Err(e) => {
            log::warn!(
                target: "exif",
                "couldn't write json for {}: {}",
                output.display(),
                e
            );
            None
        }
    }
}
