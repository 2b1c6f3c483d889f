use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use sweepr_common::network::host::ScanRecord;
use sweepr_common::warn;

use super::{PersistError, ResultStore, ensure_parent_dir};

const INDENT: &[u8] = b"    ";

/// A JSON file holding one top-level array of scan records.
pub struct JsonLog {
    path: PathBuf,
}

impl JsonLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads back every record in the log. A missing file is an empty log.
    /// Entries that are not scan records are skipped with a warning.
    pub fn load(&self) -> Result<Vec<ScanRecord>, PersistError> {
        let Some(contents) = self.read()? else {
            return Ok(Vec::new());
        };
        let entries: Vec<Value> = serde_json::from_str(&contents).map_err(|source| self.json_error(source))?;

        let records = entries
            .into_iter()
            .enumerate()
            .filter_map(|(idx, entry)| match serde_json::from_value::<ScanRecord>(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping entry {idx} of {}: {e}", self.path.display());
                    None
                }
            })
            .collect();
        Ok(records)
    }

    /// Appends `record`, rewriting the whole file.
    ///
    /// Existing entries are carried over untouched, even ones this version
    /// would not produce.
    pub fn append(&self, record: &ScanRecord) -> Result<(), PersistError> {
        ensure_parent_dir(&self.path)?;

        let mut records: Vec<Value> = match self.read()? {
            Some(contents) => serde_json::from_str(&contents).map_err(|source| self.json_error(source))?,
            None => Vec::new(),
        };
        records.push(serde_json::to_value(record).map_err(|source| self.json_error(source))?);

        let mut buf: Vec<u8> = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
        records
            .serialize(&mut serializer)
            .map_err(|source| self.json_error(source))?;

        fs::write(&self.path, buf).map_err(|source| PersistError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn read(&self) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PersistError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    fn json_error(&self, source: serde_json::Error) -> PersistError {
        PersistError::Json {
            path: self.path.clone(),
            source,
        }
    }
}

impl ResultStore for JsonLog {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn save(&self, record: &ScanRecord) -> Result<(), PersistError> {
        self.append(record)
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
