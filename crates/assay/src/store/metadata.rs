//! SQLite-backed append-only metadata store.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::info;

use crate::error::{AssayError, Result};
use crate::profile::Profile;

use super::records::{
    ProfileId, StoredProfileRecord, StoredTransformationRecord, TransformationMetadata,
};

/// Location string that selects a private in-memory database.
pub const IN_MEMORY: &str = ":memory:";

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS data_profiles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        profile_data TEXT NOT NULL
    );

    CREATE TABLE IF NOT EXISTS transformations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        timestamp TEXT NOT NULL,
        profile_id INTEGER NOT NULL,
        quality_report TEXT NOT NULL,
        output_path TEXT NOT NULL,
        FOREIGN KEY(profile_id) REFERENCES data_profiles(id)
    );

    CREATE INDEX IF NOT EXISTS idx_transformations_profile
        ON transformations(profile_id);
";

/// Durable store for profiles and the quality reports derived from them.
///
/// Records are only ever appended. The store assumes it is the only writer.
pub struct MetadataStore {
    conn: Connection,
}

impl MetadataStore {
    /// Open or create the store at `location` and make sure both tables exist.
    ///
    /// Safe to call repeatedly on the same location.
    pub fn initialize(location: impl AsRef<Path>) -> Result<Self> {
        let location = location.as_ref();
        if location == Path::new(IN_MEMORY) {
            return Self::in_memory();
        }

        if let Some(parent) = location.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| AssayError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        let store = Self::from_connection(Connection::open(location)?)?;
        info!(location = %location.display(), "Metadata store initialized");
        Ok(store)
    }

    /// Create an in-memory store for testing.
    pub fn in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Append a profile and return its identity. All or nothing.
    pub fn save_profile(&mut self, profile: &Profile) -> Result<ProfileId> {
        let profile_json = serde_json::to_string(profile)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO data_profiles (timestamp, profile_data) VALUES (?1, ?2)",
            params![Utc::now().to_rfc3339(), profile_json],
        )?;
        let id = ProfileId(tx.last_insert_rowid());
        tx.commit()?;

        info!(profile_id = %id, "Saved data profile");
        Ok(id)
    }

    /// Append a quality report linked to a stored profile. All or nothing.
    ///
    /// Fails if `metadata.profile_id` does not name a stored profile.
    pub fn save_transformation_metadata(
        &mut self,
        metadata: &TransformationMetadata,
    ) -> Result<i64> {
        let report_json = serde_json::to_string(&metadata.quality_report)?;

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO transformations (timestamp, profile_id, quality_report, output_path)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                Utc::now().to_rfc3339(),
                metadata.profile_id.0,
                report_json,
                metadata.output_location
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!(transformation_id = id, profile_id = %metadata.profile_id, "Saved transformation metadata");
        Ok(id)
    }

    /// Read back a stored profile.
    pub fn load_profile(&self, id: ProfileId) -> Result<StoredProfileRecord> {
        let row = self
            .conn
            .query_row(
                "SELECT id, timestamp, profile_data FROM data_profiles WHERE id = ?1",
                params![id.0],
                read_profile_row,
            )
            .optional()?;

        let (id, timestamp, json) = row.ok_or(AssayError::NotFound {
            kind: "profile",
            id: id.0,
        })?;
        Ok(StoredProfileRecord {
            id: ProfileId(id),
            timestamp,
            profile: serde_json::from_str(&json)?,
        })
    }

    /// Most recent profiles first.
    pub fn recent_profiles(&self, limit: usize) -> Result<Vec<StoredProfileRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, profile_data FROM data_profiles ORDER BY id DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map(params![limit as i64], read_profile_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(id, timestamp, json)| {
                Ok(StoredProfileRecord {
                    id: ProfileId(id),
                    timestamp,
                    profile: serde_json::from_str(&json)?,
                })
            })
            .collect()
    }

    /// Read back a stored transformation record.
    pub fn load_transformation(&self, id: i64) -> Result<StoredTransformationRecord> {
        let row = self
            .conn
            .query_row(
                "SELECT id, timestamp, profile_id, quality_report, output_path
                 FROM transformations WHERE id = ?1",
                params![id],
                read_transformation_row,
            )
            .optional()?;

        let row = row.ok_or(AssayError::NotFound {
            kind: "transformation",
            id,
        })?;
        row.into_record()
    }

    /// All transformation records that reference a profile, oldest first.
    pub fn transformations_for_profile(
        &self,
        profile_id: ProfileId,
    ) -> Result<Vec<StoredTransformationRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, profile_id, quality_report, output_path
             FROM transformations WHERE profile_id = ?1 ORDER BY id",
        )?;
        let rows = stmt
            .query_map(params![profile_id.0], read_transformation_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(TransformationRow::into_record).collect()
    }
}

struct TransformationRow {
    id: i64,
    timestamp: DateTime<Utc>,
    profile_id: i64,
    report_json: String,
    output_location: String,
}

impl TransformationRow {
    fn into_record(self) -> Result<StoredTransformationRecord> {
        Ok(StoredTransformationRecord {
            id: self.id,
            timestamp: self.timestamp,
            profile_id: ProfileId(self.profile_id),
            quality_report: serde_json::from_str(&self.report_json)?,
            output_location: self.output_location,
        })
    }
}

fn read_profile_row(row: &Row<'_>) -> rusqlite::Result<(i64, DateTime<Utc>, String)> {
    Ok((row.get(0)?, read_timestamp(row, 1)?, row.get(2)?))
}

fn read_transformation_row(row: &Row<'_>) -> rusqlite::Result<TransformationRow> {
    Ok(TransformationRow {
        id: row.get(0)?,
        timestamp: read_timestamp(row, 1)?,
        profile_id: row.get(2)?,
        report_json: row.get(3)?,
        output_location: row.get(4)?,
    })
}

fn read_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
