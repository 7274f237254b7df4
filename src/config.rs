//! Run configuration.
//!
//! Everything a run needs is fixed once at startup from the command line and
//! collected in an immutable [`RunConfig`] that the walker and converter
//! borrow. Nothing is read from or written to config files.
//!
//! ## Command line
//!
//! ```text
//! batch-resize <source> [-res WxH] [-type TOKEN] [-output DIR]
//!              [-jobs N] [-fit] [-mirror] [-summary] [-strict] [-v]
//! ```
//!
//! Long flags are accepted with one dash (`-res 800x600`, `-type=png`) as
//! well as two; [`normalize_args`] rewrites the single-dash form before clap
//! sees it.
//!
//! ## Defaults
//!
//! ```text
//! -res     1920x1080
//! -type    jpeg            # unknown tokens also mean jpeg
//! -output  <source>/<res>  # created if missing
//! -jobs    1               # 0 = one worker per CPU core
//! ```
//!
//! ## Fatal errors
//!
//! A missing source or a malformed resolution stops the run before any file
//! is touched (see [`ConfigError`]).

use crate::imaging::{OutputFormat, ResizeMode};
use std::ffi::OsString;
use std::num::ParseIntError;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_RESOLUTION: &str = "1920x1080";
pub const DEFAULT_TYPE: &str = "jpeg";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolutionError {
    #[error("resolution {0:?} is not of the form <width>x<height>")]
    MissingSeparator(String),
    #[error("invalid {axis} {value:?} in resolution {input:?}: {source}")]
    InvalidComponent {
        input: String,
        axis: &'static str,
        value: String,
        source: ParseIntError,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("<source> {} does not exist", .0.display())]
    SourceMissing(PathBuf),
    #[error("cannot read <source> {}: {source}", path.display())]
    SourceUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("resolution {0:?} must have a non-zero width and height")]
    ZeroDimension(String),
}

impl ConfigError {
    /// Log tag the error is reported under.
    pub fn log_target(&self) -> &'static str {
        match self {
            Self::SourceMissing(_) | Self::SourceUnreadable { .. } => "path",
            Self::Resolution(_) | Self::ZeroDimension(_) => "config",
        }
    }
}

/// Parse a `"<width>x<height>"` string.
///
/// Splits on the literal, lowercase `x` and parses the first two pieces as
/// non-negative integers. Anything after a second `x` is ignored, so
/// `"100x50x7"` is `(100, 50)`.
pub fn parse_resolution(input: &str) -> Result<(u32, u32), ResolutionError> {
    let mut parts = input.split('x');
    let (Some(width), Some(height)) = (parts.next(), parts.next()) else {
        return Err(ResolutionError::MissingSeparator(input.to_string()));
    };

    let parse = |axis: &'static str, value: &str| {
        value
            .parse::<u32>()
            .map_err(|source| ResolutionError::InvalidComponent {
                input: input.to_string(),
                axis,
                value: value.to_string(),
                source,
            })
    };

    Ok((parse("width", width)?, parse("height", height)?))
}

/// Immutable settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub source_root: PathBuf,
    pub dest_root: PathBuf,
    /// The resolution exactly as given, e.g. `"1920x1080"`.
    pub resolution: String,
    pub width: u32,
    pub height: u32,
    /// The `-type` token exactly as given.
    pub format_token: String,
    pub format: OutputFormat,
    pub mode: ResizeMode,
    /// Reproduce source subdirectories under `dest_root`.
    pub mirror: bool,
    /// Worker threads; 1 converts sequentially.
    pub jobs: usize,
}

impl RunConfig {
    /// Validate the source and resolve every derived setting.
    ///
    /// Without an explicit `output`, the destination is `<source>/<resolution>`.
    pub fn resolve(
        source: &Path,
        output: Option<&Path>,
        resolution: &str,
        format_token: &str,
    ) -> Result<Self, ConfigError> {
        if let Err(e) = std::fs::metadata(source) {
            return Err(if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::SourceMissing(source.to_path_buf())
            } else {
                ConfigError::SourceUnreadable {
                    path: source.to_path_buf(),
                    source: e,
                }
            });
        }

        let (width, height) = parse_resolution(resolution)?;
        if width == 0 || height == 0 {
            return Err(ConfigError::ZeroDimension(resolution.to_string()));
        }

        let dest_root = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| source.join(resolution));

        Ok(Self {
            source_root: source.to_path_buf(),
            dest_root,
            resolution: resolution.to_string(),
            width,
            height,
            format_token: format_token.to_string(),
            format: OutputFormat::from_token(format_token),
            mode: ResizeMode::Exact,
            mirror: false,
            jobs: 1,
        })
    }

    pub fn with_mode(mut self, mode: ResizeMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_mirror(mut self, mirror: bool) -> Self {
        self.mirror = mirror;
        self
    }

    /// Set the worker count; see [`effective_threads`].
    pub fn with_jobs(mut self, requested: usize) -> Self {
        self.jobs = effective_threads(requested);
        self
    }

    /// Extension written for converted files.
    pub fn extension(&self) -> &'static str {
        self.format.extension()
    }

    /// Create the destination directory and its parents. Best-effort: a
    /// failure here shows up later as per-file write errors.
    pub fn create_destination(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.dest_root)
    }
}

/// Resolve the effective worker count.
///
/// - `0` → use all available cores
/// - `n` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(requested: usize) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    match requested {
        0 => cores,
        n => n.min(cores),
    }
}

/// Long flags that may be written with a single dash.
const LONG_FLAGS: &[&str] = &[
    "res", "type", "output", "jobs", "fit", "mirror", "summary", "strict", "verbose", "help",
    "version",
];

/// Rewrite single-dash long flags (`-res`, `-type=png`) to their double-dash
/// form. The program name, short flags, values and everything after a bare
/// `--` pass through untouched.
pub fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut normalized = Vec::new();
    let mut flags_done = false;

    for (i, arg) in args.into_iter().enumerate() {
        if i == 0 || flags_done {
            normalized.push(arg);
            continue;
        }
        let Some(text) = arg.to_str() else {
            normalized.push(arg);
            continue;
        };
        if text == "--" {
            flags_done = true;
            normalized.push(arg);
            continue;
        }

        let rewritten = text
            .strip_prefix('-')
            .filter(|rest| !rest.starts_with('-'))
            .filter(|rest| {
                let name = rest.split_once('=').map_or(*rest, |(name, _)| name);
                LONG_FLAGS.contains(&name)
            })
            .map(|rest| OsString::from(format!("--{rest}")));
        normalized.push(rewritten.unwrap_or(arg));
    }
    normalized
}
