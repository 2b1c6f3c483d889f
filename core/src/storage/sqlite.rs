use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use sweepr_common::network::host::ScanRecord;

use super::{PersistError, ResultStore, ensure_parent_dir};

const CREATE_SCANS_TABLE: &str = "CREATE TABLE IF NOT EXISTS scans (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    target TEXT,
    port INTEGER,
    status TEXT,
    timestamp DATETIME DEFAULT CURRENT_TIMESTAMP
)";

const INSERT_SCAN: &str = "INSERT INTO scans (target, port, status) VALUES (?1, ?2, ?3)";

/// The `scans` table, one row per retained port result.
pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts every port of `record` in a single transaction. Returns the
    /// number of rows written.
    pub fn insert(&self, record: &ScanRecord) -> Result<usize, PersistError> {
        ensure_parent_dir(&self.path)?;

        let mut conn = Connection::open(&self.path).map_err(|e| self.sqlite_error(e))?;
        conn.execute(CREATE_SCANS_TABLE, [])
            .map_err(|e| self.sqlite_error(e))?;

        let tx = conn.transaction().map_err(|e| self.sqlite_error(e))?;
        let mut rows: usize = 0;
        {
            let mut stmt = tx.prepare(INSERT_SCAN).map_err(|e| self.sqlite_error(e))?;
            for host in &record.results {
                for result in &host.ports {
                    rows += stmt
                        .execute(params![host.ip, result.port, result.status.to_string()])
                        .map_err(|e| self.sqlite_error(e))?;
                }
            }
        }
        tx.commit().map_err(|e| self.sqlite_error(e))?;

        Ok(rows)
    }

    fn sqlite_error(&self, source: rusqlite::Error) -> PersistError {
        PersistError::Sqlite {
            path: self.path.clone(),
            source,
        }
    }
}

impl ResultStore for SqliteStore {
    fn name(&self) -> &'static str {
        "SQLite"
    }

    fn save(&self, record: &ScanRecord) -> Result<(), PersistError> {
        self.insert(record).map(|_| ())
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
