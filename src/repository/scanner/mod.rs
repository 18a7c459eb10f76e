//! Release directory scanner
//!
//! Produces one [`PathSizeRecord`] per file under a scan root.
//!
//! # Phases
//!
//! - **enumerate**: recursive walk on a blocking thread (walkdir), sorted by
//!   file name so repeated runs list files in the same order
//! - **collect_sizes**: scatter/gather `metadata` lookups, bounded in flight,
//!   results kept in enumeration order
//!
//! Either phase fails the whole scan on the first error. There is no
//! partial result.

mod progress;

pub use progress::{reporter, IndicatifProgress, NoopProgress, ProgressHandle, ProgressReporter};

use futures_util::{stream, StreamExt, TryStreamExt};
use std::path::{Path, PathBuf};
use std::time::Instant;
use walkdir::{DirEntry, WalkDir};

use crate::error::TrackError;
use crate::model::PathSizeRecord;
use crate::util::{posix_join, root_label};

/// Default number of size lookups in flight at once
pub const DEFAULT_CONCURRENCY: usize = 64;

/// A file found by the walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// POSIX-style path as it appears in the snapshot, e.g. `package/src/index.js`
    pub path: String,
    /// Location on disk used for the size lookup
    pub location: PathBuf,
}

/// Walks a release directory and measures its files
pub struct FileScanner {
    root: PathBuf,
    verbose: bool,
    concurrency: usize,
}

impl FileScanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            verbose: true,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Create a quiet scanner (no progress output, used by tests and benchmarks)
    pub fn quiet(root: impl Into<PathBuf>) -> Self {
        Self {
            verbose: false,
            ..Self::new(root)
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Prefix every emitted path starts with
    pub fn root_label(&self) -> String {
        root_label(&self.root)
    }

    /// Enumerate then measure every file under the root
    pub async fn scan(&self) -> Result<Vec<PathSizeRecord>, TrackError> {
        let progress = reporter(self.verbose);

        let start = Instant::now();
        let files = self.enumerate(progress.as_ref()).await?;
        log::debug!("Enumerated {} files in {:?}", files.len(), start.elapsed());

        let start = Instant::now();
        let records = self.collect_sizes(files, progress.as_ref()).await?;
        log::debug!("Measured {} files in {:?}", records.len(), start.elapsed());

        Ok(records)
    }

    /// Recursively list every non-directory entry under the root.
    ///
    /// Dot entries (`.bin`, `.package-lock.json`, `.env`) are skipped and
    /// dot directories are not descended into. Symlinks are listed but not
    /// followed during the walk, so a broken link surfaces later as a stat
    /// failure.
    pub async fn enumerate(&self, progress: &dyn ProgressReporter) -> Result<Vec<DiscoveredFile>, TrackError> {
        let root = self.root.clone();
        let label = self.root_label();
        let pb = progress.spinner("Walking");

        tokio::task::spawn_blocking(move || {
            let result = walk(&root, &label, pb.as_ref());
            pb.finish();
            result
        })
        .await
        .map_err(|e| TrackError::Enumeration {
            root: self.root.clone(),
            message: e.to_string(),
        })?
    }

    /// Look up the size of every file, issuing the lookups concurrently.
    ///
    /// Output order matches `files`. The first failing lookup aborts the batch.
    pub async fn collect_sizes(
        &self,
        files: Vec<DiscoveredFile>,
        progress: &dyn ProgressReporter,
    ) -> Result<Vec<PathSizeRecord>, TrackError> {
        let pb = progress.start("Measuring", files.len() as u64);

        let records = stream::iter(files)
            .map(|file| async move {
                let metadata = tokio::fs::metadata(&file.location)
                    .await
                    .map_err(|source| TrackError::Stat {
                        path: file.path.clone(),
                        source,
                    })?;
                Ok::<_, TrackError>(PathSizeRecord::new(file.path, metadata.len()))
            })
            .buffered(self.concurrency)
            .inspect_ok(|_| pb.inc(1))
            .try_collect::<Vec<_>>()
            .await;

        pb.finish();
        records
    }
}

fn walk(root: &Path, label: &str, pb: &dyn ProgressHandle) -> Result<Vec<DiscoveredFile>, TrackError> {
    let enumeration_error = |message: String| TrackError::Enumeration {
        root: root.to_path_buf(),
        message,
    };

    let metadata = std::fs::metadata(root).map_err(|e| enumeration_error(e.to_string()))?;
    if !metadata.is_dir() {
        return Err(enumeration_error("not a directory".to_string()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry.map_err(|e| enumeration_error(e.to_string()))?;
        pb.inc(1);

        if entry.file_type().is_dir() {
            continue;
        }

        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        files.push(DiscoveredFile {
            path: posix_join(label, relative),
            location: entry.into_path(),
        });
    }

    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
