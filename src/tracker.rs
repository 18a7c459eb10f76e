//! Release tracking pipeline
//!
//! enumerate -> measure -> aggregate -> publish, each step awaited in turn.
//! Nothing is published unless every file was measured.

use std::path::Path;
use std::time::Instant;

use crate::error::TrackError;
use crate::model::{aggregate, DependencyLayout, ReleaseSnapshot};
use crate::repository::{EntryId, FileScanner, SnapshotStore};
use crate::util::format_size;

/// Branch snapshots are filed under when none is given
pub const DEFAULT_BRANCH: &str = "master";

/// Measures release directories and records the result
pub struct ReleaseTracker {
    layout: Option<DependencyLayout>,
    verbose: bool,
}

impl Default for ReleaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ReleaseTracker {
    /// Tracker that derives the dependency prefix from each scan root
    pub fn new() -> Self {
        Self { layout: None, verbose: true }
    }

    /// Create a quiet tracker (no progress bars, used by tests)
    pub fn quiet() -> Self {
        Self { layout: None, verbose: false }
    }

    /// Use a fixed dependency prefix instead of `<root>/node_modules/`
    pub fn with_layout(mut self, layout: DependencyLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    fn scanner(&self, root: &Path) -> FileScanner {
        if self.verbose {
            FileScanner::new(root)
        } else {
            FileScanner::quiet(root)
        }
    }

    /// Enumerate, measure and aggregate every file under `root`
    pub async fn measure(&self, root: &Path) -> Result<ReleaseSnapshot, TrackError> {
        let start = Instant::now();
        let scanner = self.scanner(root);

        log::info!("Scanning {}...", root.display());
        let records = scanner.scan().await?;

        let layout = self
            .layout
            .clone()
            .unwrap_or_else(|| DependencyLayout::for_root(&scanner.root_label()));
        log::debug!("Dependency prefix: {}", layout.prefix());

        let snapshot = aggregate(&records, &layout);
        log::info!(
            "Measured {} files ({}) in {:?}",
            records.len(),
            format_size(snapshot.total_size),
            start.elapsed()
        );

        Ok(snapshot)
    }

    /// Measure `root` and append the snapshot to `store` under `branch`
    pub async fn track(
        &self,
        root: &Path,
        branch: &str,
        store: &impl SnapshotStore,
    ) -> Result<(ReleaseSnapshot, EntryId), TrackError> {
        let snapshot = self.measure(root).await?;

        log::info!("Publishing snapshot to {} (branch {})...", store.describe(), branch);
        let id = store.publish(branch, &snapshot).await?;
        log::info!("Recorded entry {}", id);

        Ok((snapshot, id))
    }
}
