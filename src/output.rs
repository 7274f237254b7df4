//! CLI output formatting.
//!
//! # Streams
//!
//! stdout carries exactly one line per converted image: the absolute path of
//! the written file. Nothing else goes to stdout, so the output can be piped
//! straight into other tools:
//!
//! ```text
//! /home/me/photos/1920x1080/IMG_0001.jpeg
//! /home/me/photos/1920x1080/IMG_0002.jpeg
//! ```
//!
//! Everything else (failures, walk errors, the optional run summary) goes
//! through the logger to stderr, tagged by the stage that produced it:
//!
//! ```text
//! [convert] photos/broken.jpg: decode failed: ...
//! [walk] IO error for operation on photos/locked: Permission denied
//! [summary] converted 2, failed 1, walk errors 1
//! [summary] failed: photos/broken.jpg
//! ```
//!
//! # Architecture
//!
//! Format functions are pure (no I/O, no side effects) and return the text to
//! emit; `main` decides where it goes.

use crate::walk::{ConvertEvent, RunSummary};
use std::path::{Path, PathBuf};

/// Absolute form of `path`, falling back to `path` itself when the current
/// directory cannot be determined.
pub fn display_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// stdout line for a converted image.
pub fn format_success(output: &Path) -> String {
    display_path(output).display().to_string()
}

/// Log message for a failed image.
pub fn format_failure(source: &Path, reason: &str) -> String {
    // ConvertError messages already lead with the source path.
    if reason.starts_with(&source.display().to_string()) {
        reason.to_string()
    } else {
        format!("{}: {}", source.display(), reason)
    }
}

/// Format a progress event: `Ok` lines go to stdout, `Err` lines to the
/// `[convert]` log.
pub fn format_event(event: &ConvertEvent) -> Result<String, String> {
    match event {
        ConvertEvent::Converted { output, .. } => Ok(format_success(output)),
        ConvertEvent::Failed { source, reason } => Err(format_failure(source, reason)),
    }
}

/// `[walk]` log lines for entries the walk could not read, emitted after
/// every conversion has finished.
pub fn format_walk_errors(summary: &RunSummary) -> Vec<String> {
    summary.walk_errors.iter().map(|e| e.to_string()).collect()
}

/// Summary lines printed with `-summary`.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "converted {}, failed {}, walk errors {}",
        summary.converted(),
        summary.failed(),
        summary.walk_errors.len()
    )];
    for report in summary.reports.iter().filter(|r| r.outcome.is_err()) {
        lines.push(format!("failed: {}", report.source.display()));
    }
    lines
}
