//! # Result Persistence
//!
//! Two independent representations of every scan: an append-only JSON log
//! and a SQLite table. Both receive the same [`ScanRecord`], stamped once
//! when persistence begins.

use std::fs;
use std::path::{Path, PathBuf};

use sweepr_common::network::host::{ScanBatch, ScanRecord};
use sweepr_common::success;
use thiserror::Error;

pub mod json;
pub mod sqlite;

pub use json::JsonLog;
pub use sqlite::SqliteStore;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cannot create directory {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed scan log {path}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("database error in {path}")]
    Sqlite {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },
}

/// A destination for scan records.
pub trait ResultStore {
    fn name(&self) -> &'static str;
    fn save(&self, record: &ScanRecord) -> Result<(), PersistError>;
}

/// Stamps `batch` and writes it to every store in order.
///
/// Stops at the first failing store and returns its error.
pub fn persist(batch: ScanBatch, stores: &[&dyn ResultStore]) -> Result<ScanRecord, PersistError> {
    let record: ScanRecord = batch.stamp();
    for store in stores {
        store.save(&record)?;
        success!("Results saved to {}", store.name());
    }
    Ok(record)
}

pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), PersistError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|source| PersistError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })
        }
        _ => Ok(()),
    }
}
