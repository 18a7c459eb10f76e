//! Realtime-database REST store
//!
//! Appends snapshots with `POST {database_url}/branch/{branch}.json`. The
//! server answers `{"name": "<push id>"}`, which becomes the entry id.

use serde::Deserialize;

use crate::error::TrackError;
use crate::model::ReleaseSnapshot;

use super::store::{EntryId, SnapshotStore};

/// Database that has always held release-tracking snapshots
pub const DEFAULT_DATABASE_URL: &str = "https://release-tracking.firebaseio.com";

#[derive(Debug, Deserialize)]
struct PushResponse {
    name: String,
}

/// Remote append-only store reached over HTTPS
#[derive(Debug, Clone)]
pub struct RemoteStore {
    database_url: String,
}

impl Default for RemoteStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATABASE_URL)
    }
}

impl RemoteStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self { database_url: database_url.into() }
    }

    /// Collection URL entries for `branch` are pushed to
    pub fn branch_url(&self, branch: &str) -> String {
        format!(
            "{}/branch/{}.json",
            self.database_url.trim_end_matches('/'),
            branch.trim_matches('/')
        )
    }
}

impl SnapshotStore for RemoteStore {
    async fn publish(&self, branch: &str, snapshot: &ReleaseSnapshot) -> Result<EntryId, TrackError> {
        let url = self.branch_url(branch);
        log::debug!("POST {}", url);

        // One client per publish, dropped when the write completes
        let client = reqwest::Client::new();
        let response = client.post(&url).json(snapshot).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackError::Publish(format!(
                "{} responded with {}: {}",
                url,
                status,
                body.trim()
            )));
        }

        let push: PushResponse = response.json().await?;
        if push.name.is_empty() {
            return Err(TrackError::Publish(format!("{} returned an empty entry id", url)));
        }

        Ok(EntryId(push.name))
    }

    fn describe(&self) -> String {
        self.database_url.clone()
    }
}
