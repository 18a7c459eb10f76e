use sqlx::{sqlite::{SqliteConnectOptions, SqlitePoolOptions}, Pool, QueryBuilder, Row, Sqlite, Transaction};
use std::str::FromStr;
use time::OffsetDateTime;

use crate::error::TrackError;
use crate::model::{PackageGroup, ReleaseSnapshot};

use super::store::{EntryId, SnapshotStore};
use super::SCHEMA_VERSION;

/// A snapshot read back from the local log
#[derive(Debug, Clone)]
pub struct StoredSnapshot {
    pub id: EntryId,
    pub branch: String,
    /// Unix timestamp (seconds) of the publish
    pub created_at: i64,
    pub snapshot: ReleaseSnapshot,
}

/// SQLite-backed append-only snapshot log
pub struct Database {
    pool: Pool<Sqlite>,
    location: String,
}

impl Database {
    /// Create a new database connection
    pub async fn new(db_path: &str) -> Result<Self, TrackError> {
        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", db_path))?
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        Ok(Self { pool, location: db_path.to_string() })
    }

    /// Initialize database schema, returns true if the log was created.
    ///
    /// A log written with another schema version is left untouched and
    /// reported as [`TrackError::SchemaMismatch`].
    pub async fn init_schema(&self) -> Result<bool, TrackError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS metadata (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )"
        ).execute(&self.pool).await?;

        let stored_version: Option<String> = sqlx::query("SELECT value FROM metadata WHERE key = 'schema_version'")
            .fetch_optional(&self.pool)
            .await?
            .map(|row| row.get("value"));

        if let Some(found) = stored_version.as_deref() {
            if found != SCHEMA_VERSION {
                return Err(TrackError::SchemaMismatch {
                    found: found.to_string(),
                    expected: SCHEMA_VERSION.to_string(),
                });
            }
        }
        let created = stored_version.is_none();

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS snapshots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                branch TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                total_node_module_size INTEGER NOT NULL,
                total_project_size INTEGER NOT NULL,
                total_size INTEGER NOT NULL,
                payload TEXT NOT NULL
            )"
        ).execute(&self.pool).await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS snapshots_branch ON snapshots (branch, id)"
        ).execute(&self.pool).await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS package_sizes (
                snapshot_id INTEGER NOT NULL REFERENCES snapshots (id),
                position INTEGER NOT NULL,
                module_name TEXT NOT NULL,
                size INTEGER NOT NULL,
                PRIMARY KEY (snapshot_id, position)
            )"
        ).execute(&self.pool).await?;

        if created {
            sqlx::query("INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)")
                .bind(SCHEMA_VERSION)
                .execute(&self.pool)
                .await?;
        }

        Ok(created)
    }

    /// Get metadata value by key
    pub async fn get_metadata(&self, key: &str) -> Option<String> {
        sqlx::query("SELECT value FROM metadata WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .ok()
            .flatten()
            .map(|row| row.get("value"))
    }

    /// Set metadata value
    pub async fn set_metadata(&self, key: &str, value: &str) -> Result<(), TrackError> {
        sqlx::query("INSERT OR REPLACE INTO metadata (key, value) VALUES (?, ?)")
            .bind(key)
            .bind(value)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Snapshots recorded for `branch`, oldest first
    pub async fn load_snapshots(&self, branch: &str) -> Result<Vec<StoredSnapshot>, TrackError> {
        let rows = sqlx::query(
            "SELECT id, branch, created_at, payload FROM snapshots WHERE branch = ? ORDER BY id"
        )
        .bind(branch)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| -> Result<StoredSnapshot, TrackError> {
                let payload: String = row.get("payload");
                Ok(StoredSnapshot {
                    id: EntryId(row.get::<i64, _>("id").to_string()),
                    branch: row.get("branch"),
                    created_at: row.get("created_at"),
                    snapshot: serde_json::from_str(&payload)?,
                })
            })
            .collect()
    }

    /// Per-package sizes recorded with one snapshot, in stored order
    pub async fn load_package_sizes(&self, id: &EntryId) -> Result<Vec<PackageGroup>, TrackError> {
        let snapshot_id: i64 = id
            .as_str()
            .parse()
            .map_err(|_| TrackError::InvalidEntryId(id.to_string()))?;

        let rows = sqlx::query(
            "SELECT module_name, size FROM package_sizes WHERE snapshot_id = ? ORDER BY position"
        )
        .bind(snapshot_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| {
            PackageGroup {
                module_name: row.get("module_name"),
                size: row.get::<i64, _>("size") as u64,
            }
        }).collect())
    }

    async fn insert_snapshot_in_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        branch: &str,
        created_at: i64,
        snapshot: &ReleaseSnapshot,
    ) -> Result<i64, TrackError> {
        let payload = serde_json::to_string(snapshot)?;

        let result = sqlx::query(
            "INSERT INTO snapshots (branch, created_at, total_node_module_size, total_project_size, total_size, payload)
             VALUES (?, ?, ?, ?, ?, ?)"
        )
        .bind(branch)
        .bind(created_at)
        .bind(as_sql_size(snapshot.total_node_module_size))
        .bind(as_sql_size(snapshot.total_project_size))
        .bind(as_sql_size(snapshot.total_size))
        .bind(payload)
        .execute(&mut **tx)
        .await?;

        Ok(result.last_insert_rowid())
    }

    async fn save_package_sizes_in_tx(
        &self,
        tx: &mut Transaction<'_, Sqlite>,
        snapshot_id: i64,
        groups: &[PackageGroup],
    ) -> Result<(), TrackError> {
        const BATCH_SIZE: usize = 5000;

        for (batch, chunk) in groups.chunks(BATCH_SIZE).enumerate() {
            let offset = batch * BATCH_SIZE;
            let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO package_sizes (snapshot_id, position, module_name, size) "
            );
            qb.push_values(chunk.iter().enumerate(), |mut row, (i, group)| {
                row.push_bind(snapshot_id)
                    .push_bind((offset + i) as i64)
                    .push_bind(group.module_name.as_str())
                    .push_bind(as_sql_size(group.size));
            });
            qb.build().execute(&mut **tx).await?;
        }

        Ok(())
    }
}

impl SnapshotStore for Database {
    /// Snapshot row and package rows are written in one transaction
    async fn publish(&self, branch: &str, snapshot: &ReleaseSnapshot) -> Result<EntryId, TrackError> {
        let created_at = OffsetDateTime::now_utc().unix_timestamp();

        let mut tx = self.pool.begin().await?;
        let id = self.insert_snapshot_in_tx(&mut tx, branch, created_at, snapshot).await?;
        self.save_package_sizes_in_tx(&mut tx, id, &snapshot.node_module_stats).await?;
        tx.commit().await?;

        log::debug!("Stored snapshot {} for {} at {}", id, branch, format_timestamp(created_at));
        Ok(EntryId(id.to_string()))
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.location)
    }
}

/// SQLite integers are signed; sizes past i64::MAX are clamped
fn as_sql_size(size: u64) -> i64 {
    i64::try_from(size).unwrap_or(i64::MAX)
}

fn format_timestamp(timestamp: i64) -> String {
    use time::macros::format_description;

    OffsetDateTime::from_unix_timestamp(timestamp)
        .ok()
        .and_then(|dt| {
            let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
            dt.format(&format).ok()
        })
        .unwrap_or_else(|| "unknown".to_string())
}
