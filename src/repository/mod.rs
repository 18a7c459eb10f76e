mod database;
mod remote;
mod scanner;
mod store;

pub use database::{Database, StoredSnapshot};
pub use remote::{RemoteStore, DEFAULT_DATABASE_URL};
pub use scanner::{
    reporter, DiscoveredFile, FileScanner, IndicatifProgress, NoopProgress, ProgressHandle,
    ProgressReporter, DEFAULT_CONCURRENCY,
};
pub use store::{EntryId, SnapshotStore};

use crate::error::TrackError;
use crate::model::ReleaseSnapshot;

/// Version stamped into the `metadata` table of a local snapshot log
pub const SCHEMA_VERSION: &str = "1";

/// URL scheme that selects the local SQLite log instead of the remote store
pub const SQLITE_SCHEME: &str = "sqlite:";

/// Store chosen from a `--database-url` value
pub enum Destination {
    Remote(RemoteStore),
    Local(Database),
}

impl Destination {
    /// `sqlite:<path>` opens (and migrates) a local log, anything else is a remote URL
    pub async fn connect(database_url: &str) -> Result<Self, TrackError> {
        match database_url.strip_prefix(SQLITE_SCHEME) {
            Some(path) => {
                let db = Database::new(path.trim_start_matches("//")).await?;
                db.init_schema().await?;
                Ok(Destination::Local(db))
            }
            None => Ok(Destination::Remote(RemoteStore::new(database_url))),
        }
    }
}

impl SnapshotStore for Destination {
    async fn publish(&self, branch: &str, snapshot: &ReleaseSnapshot) -> Result<EntryId, TrackError> {
        match self {
            Destination::Remote(store) => store.publish(branch, snapshot).await,
            Destination::Local(store) => store.publish(branch, snapshot).await,
        }
    }

    fn describe(&self) -> String {
        match self {
            Destination::Remote(store) => store.describe(),
            Destination::Local(store) => store.describe(),
        }
    }
}
