//! Source tree traversal and run orchestration.
//!
//! The walker visits every entry under the source root in lexical order,
//! keeps files whose extension is accepted (see [`naming`]), and converts
//! each of them with [`convert_image`]. A failing file is reported and the
//! walk continues; nothing short of a configuration error stops a run.
//!
//! ## Traversal
//!
//! - Entries are visited sorted by file name within each directory.
//! - Symlinks are not followed.
//! - The destination directory is skipped when it lies inside the source
//!   tree, so earlier outputs are never picked up as new sources.
//! - Unreadable entries become walk errors and the rest of the tree is still
//!   visited. They are collected in the [`RunSummary`] and logged once the
//!   conversions are done.
//!
//! ## Parallel runs
//!
//! With more than one job, candidates that map to the same destination file
//! are grouped and each group is converted sequentially in traversal order on
//! one rayon worker. Groups run in parallel. The last source in traversal
//! order therefore wins a name collision, exactly as in a sequential run.
//! Reports are always returned in traversal order.

use crate::config::RunConfig;
use crate::convert::{ConvertError, Converted, convert_image};
use crate::imaging::{ImageBackend, RustBackend};
use crate::naming;
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use walkdir::WalkDir;

/// An accepted source file and the output it will be written to.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Outcome of converting one candidate.
#[derive(Debug)]
pub struct FileReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub outcome: Result<Converted, ConvertError>,
}

/// Progress events streamed while a run is in flight.
#[derive(Debug, Clone, PartialEq)]
pub enum ConvertEvent {
    Converted { source: PathBuf, output: PathBuf },
    Failed { source: PathBuf, reason: String },
}

/// Everything a run produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<FileReport>,
    pub walk_errors: Vec<walkdir::Error>,
}

impl RunSummary {
    pub fn converted(&self) -> usize {
        self.reports.iter().filter(|r| r.outcome.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.converted()
    }

    /// No file failed and the whole tree was readable.
    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.walk_errors.is_empty()
    }
}

/// Walk `config.source_root` and collect every file to convert.
pub fn collect_candidates(config: &RunConfig) -> (Vec<Candidate>, Vec<walkdir::Error>) {
    let skip_dir = std::fs::canonicalize(&config.dest_root).ok();
    let mirror_from = config.mirror.then_some(config.source_root.as_path());

    let mut candidates = Vec::new();
    let mut errors = Vec::new();

    let walker = WalkDir::new(&config.source_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            !(entry.depth() > 0
                && entry.file_type().is_dir()
                && is_same_dir(entry.path(), skip_dir.as_deref()))
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                errors.push(e);
                continue;
            }
        };
        if entry.file_type().is_dir() || naming::accepted_extension(entry.path()).is_none() {
            continue;
        }
        let source = entry.into_path();
        let output = naming::destination_path(
            &source,
            &config.dest_root,
            config.extension(),
            mirror_from,
        );
        candidates.push(Candidate { source, output });
    }

    (candidates, errors)
}

fn is_same_dir(path: &Path, target: Option<&Path>) -> bool {
    let Some(target) = target else {
        return false;
    };
    std::fs::canonicalize(path).is_ok_and(|p| p == target)
}

/// Convert the whole source tree with the default backend.
pub fn run(config: &RunConfig, events: Option<Sender<ConvertEvent>>) -> RunSummary {
    run_with_backend(&RustBackend::new(), config, events)
}

/// Convert the whole source tree using a specific backend (allows testing with mock).
pub fn run_with_backend(
    backend: &impl ImageBackend,
    config: &RunConfig,
    events: Option<Sender<ConvertEvent>>,
) -> RunSummary {
    let (candidates, walk_errors) = collect_candidates(config);
    log::debug!(
        target: "walk",
        "{} candidate(s) under {}",
        candidates.len(),
        config.source_root.display()
    );

    let convert_one = |candidate: &Candidate| {
        let outcome = convert_image(backend, config, &candidate.source, &candidate.output);
        if let Some(tx) = &events {
            tx.send(event_for(&candidate.source, &outcome)).ok();
        }
        FileReport {
            source: candidate.source.clone(),
            output: candidate.output.clone(),
            outcome,
        }
    };

    let reports = if config.jobs > 1 {
        let mut indexed: Vec<(usize, FileReport)> = group_by_output(&candidates)
            .into_par_iter()
            .flat_map_iter(|group| {
                group
                    .into_iter()
                    .map(|i| (i, convert_one(&candidates[i])))
                    .collect::<Vec<_>>()
            })
            .collect();
        indexed.sort_by_key(|(i, _)| *i);
        indexed.into_iter().map(|(_, report)| report).collect()
    } else {
        candidates.iter().map(convert_one).collect()
    };

    RunSummary {
        reports,
        walk_errors,
    }
}

/// Candidate indices grouped by output path, groups in order of first
/// appearance, indices ascending within a group.
fn group_by_output(candidates: &[Candidate]) -> Vec<Vec<usize>> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut by_output: HashMap<&Path, usize> = HashMap::new();
    for (i, candidate) in candidates.iter().enumerate() {
        let slot = *by_output
            .entry(candidate.output.as_path())
            .or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
        groups[slot].push(i);
    }
    groups
}

fn event_for(source: &Path, outcome: &Result<Converted, ConvertError>) -> ConvertEvent {
    match outcome {
        Ok(converted) => ConvertEvent::Converted {
            source: source.to_path_buf(),
            output: converted.output.clone(),
        },
        Err(e) => ConvertEvent::Failed {
            source: source.to_path_buf(),
            reason: e.to_string(),
        },
    }
}
