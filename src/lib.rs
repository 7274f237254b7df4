//! # Batch Resize
//!
//! Walks a directory tree, and converts every JPEG, TIFF and Canon CR2 file
//! it finds into a resized copy in a single destination directory, writing
//! the source's EXIF tags next to each output as JSON.
//!
//! ```text
//! photos/                          photos/1920x1080/
//! ├── IMG_0001.CR2        ──►      ├── IMG_0001.jpeg
//! ├── notes.txt                    ├── IMG_0001.jpeg.json
//! └── 2023/                        ├── scan.jpeg
//!     └── scan.tif                 └── scan.jpeg.json   (if scan.tif has EXIF)
//! ```
//!
//! # Pipeline
//!
//! ```text
//! 1. Config    CLI flags      →  RunConfig        (fatal on bad input)
//! 2. Walk      source tree    →  candidates       (lexical order, extension filter)
//! 3. Convert   each candidate →  image + sidecar  (failures reported, walk goes on)
//! ```
//!
//! Converted files are announced on stdout as absolute paths, one per line.
//! Diagnostics go to stderr through `log`, tagged `[config]`, `[path]`,
//! `[exif]`, `[convert]`, `[walk]` and `[summary]`.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | Resolution parsing, destination defaults, worker count, flag normalization |
//! | [`walk`] | Ordered traversal, sequential and parallel runs, run summary |
//! | [`convert`] | One source file → sidecar + resized image |
//! | [`naming`] | Accepted extensions and destination file names |
//! | [`metadata`] | EXIF extraction to JSON sidecars |
//! | [`imaging`] | Pure-Rust decode, resize and encode behind the [`imaging::ImageBackend`] trait |
//! | [`output`] | stdout and summary formatting |
//!
//! # Design Decisions
//!
//! ## Pure-Rust Imaging
//!
//! Decoding, Lanczos3 resampling and encoding are done with the `image` and
//! `tiff` crates; EXIF comes from `kamadak-exif`. There is no ImageMagick or
//! libraw to install, and the binary runs anywhere it is copied to.
//!
//! ## CR2 Through the Embedded Preview
//!
//! A Canon CR2 file is a TIFF container whose first IFD points at a
//! full-size JPEG rendition. The converter decodes that rendition instead
//! of demosaicing the sensor data. See `imaging::raw`.
//!
//! ## Exact Dimensions by Default
//!
//! Outputs are exactly the requested size, stretching if the aspect ratio
//! differs. `-fit` keeps the aspect ratio and fits inside the box instead.

pub mod config;
pub mod convert;
pub mod imaging;
pub mod metadata;
pub mod naming;
pub mod output;
pub mod walk;

#[cfg(test)]
pub(crate) mod test_helpers;
