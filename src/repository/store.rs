//! Snapshot store trait for persistence abstraction
//!
//! Decouples the tracking pipeline from where snapshots end up.

use std::fmt;

use crate::error::TrackError;
use crate::model::ReleaseSnapshot;

/// Identifier a store assigns to an appended snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntryId(pub String);

impl EntryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Append-only log of snapshots, keyed by branch
///
/// Implementations write each snapshot exactly once and never retry.
#[allow(async_fn_in_trait)]
pub trait SnapshotStore {
    /// Append `snapshot` under `branch` and return the id the store generated
    async fn publish(&self, branch: &str, snapshot: &ReleaseSnapshot) -> Result<EntryId, TrackError>;

    /// Human-readable location for log lines
    fn describe(&self) -> String;
}
