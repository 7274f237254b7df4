//! File name handling for the tree walk.
//!
//! A source file is accepted by its extension alone (case-insensitive):
//! `jpeg`, `jpg`, `tif`, `tiff`, `cr2`. Its destination name keeps the
//! base name and swaps the extension for the encoder's:
//!
//! - `IMG_0001.CR2` → `IMG_0001.jpeg`
//! - `scan.final.tif` → `scan.final.png`
//! - `.jpg` → `.jpeg` (the whole name is the extension, the base is empty)
//!
//! The extension is everything from the last `.` of the file name, so a
//! dot-file such as `.jpg` still counts as a JPEG.

use std::path::{Path, PathBuf};

/// Source extensions the walker converts, lowercase, without the dot.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "tif", "tiff", "cr2"];

/// Split a file name at its last `.` into (base, extension without the dot).
///
/// Names without a dot have an empty extension.
pub fn split_extension(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(pos) => (&file_name[..pos], &file_name[pos + 1..]),
        None => (file_name, ""),
    }
}

/// Lowercased extension of `path` if it is one of [`ACCEPTED_EXTENSIONS`].
pub fn accepted_extension(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let (_, ext) = split_extension(name);
    let ext = ext.to_ascii_lowercase();
    ACCEPTED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Destination path of `source`: `<dest_root>/<base>.<extension>`.
///
/// With `mirror_from` set to the source root, the subdirectories between
/// the root and the file are reproduced under `dest_root`.
pub fn destination_path(
    source: &Path,
    dest_root: &Path,
    extension: &str,
    mirror_from: Option<&Path>,
) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    let (base, _) = split_extension(&name);
    let file_name = format!("{}.{}", base, extension);

    let relative_dir = mirror_from
        .and_then(|root| source.parent()?.strip_prefix(root).ok())
        .unwrap_or(Path::new(""));

    dest_root.join(relative_dir).join(file_name)
}
