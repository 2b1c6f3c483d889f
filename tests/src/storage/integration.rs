#![cfg(test)]
use std::fs;

use chrono::NaiveDate;
use rusqlite::Connection;
use serde_json::Value;
use sweepr_common::network::host::{HostScanResult, PortResult, PortStatus, ScanBatch};
use sweepr_core::storage::{self, JsonLog, PersistError, SqliteStore};
use tempfile::TempDir;

fn batch(entries: &[(&str, &[u16])]) -> ScanBatch {
    let results = entries
        .iter()
        .map(|(ip, ports)| {
            let mut host = HostScanResult::new(*ip);
            for &port in *ports {
                host.record(PortResult::new(port, PortStatus::Open));
            }
            host
        })
        .collect();
    ScanBatch::new(results)
}

fn count_rows(path: &std::path::Path) -> i64 {
    let conn = Connection::open(path).unwrap();
    conn.query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn first_save_creates_the_log_and_its_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("results").join("scans.json");
    let log = JsonLog::new(&path);

    let record = batch(&[("192.168.10.5", &[22])]).stamp();
    log.append(&record).unwrap();

    let parsed: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["results"][0]["ip"], "192.168.10.5");
    assert_eq!(entries[0]["results"][0]["ports"][0], serde_json::json!([22, "Open"]));
}

#[test]
fn appends_accumulate_in_order() {
    let dir = TempDir::new().unwrap();
    let log = JsonLog::new(dir.path().join("scans.json"));
    let batches = [
        batch(&[("10.0.0.1", &[22])]),
        batch(&[]),
        batch(&[("10.0.0.2", &[80, 443]), ("10.0.0.3", &[])]),
    ];

    for (i, b) in batches.iter().enumerate() {
        let stamp = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 0, i as u32)
            .unwrap();
        log.append(&b.clone().stamp_at(stamp)).unwrap();
    }

    let records = log.load().unwrap();
    assert_eq!(records.len(), batches.len());
    for (record, b) in records.iter().zip(&batches) {
        assert_eq!(record.results, b.results);
    }
    assert!(records.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
}

#[test]
fn database_gets_one_row_per_open_port() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("scans.db");
    let store = SqliteStore::new(&path);

    let written = store
        .insert(&batch(&[("10.0.0.2", &[80, 443]), ("10.0.0.3", &[])]).stamp())
        .unwrap();
    assert_eq!(written, 2);

    let written = store.insert(&batch(&[("10.0.0.9", &[22])]).stamp()).unwrap();
    assert_eq!(written, 1);
    assert_eq!(count_rows(&path), 3);

    let conn = Connection::open(&path).unwrap();
    let mut stmt = conn
        .prepare("SELECT target, port, status FROM scans ORDER BY id")
        .unwrap();
    let rows: Vec<(String, u16, String)> = stmt
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        rows,
        [
            ("10.0.0.2".to_string(), 80, "Open".to_string()),
            ("10.0.0.2".to_string(), 443, "Open".to_string()),
            ("10.0.0.9".to_string(), 22, "Open".to_string()),
        ]
    );
}

#[test]
fn empty_batch_still_creates_the_table() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scans.db");

    SqliteStore::new(&path).insert(&ScanBatch::default().stamp()).unwrap();

    assert_eq!(count_rows(&path), 0);
}

#[test]
fn persist_writes_the_same_record_to_both_stores() {
    let dir = TempDir::new().unwrap();
    let log = JsonLog::new(dir.path().join("results/scans.json"));
    let db = SqliteStore::new(dir.path().join("data/scans.db"));

    let record = storage::persist(batch(&[("10.0.0.1", &[21, 22, 8080])]), &[&log, &db]).unwrap();

    let saved = log.load().unwrap();
    assert_eq!(saved, [record]);
    assert_eq!(count_rows(db.path()), 3);
}

#[test]
fn malformed_log_stops_persistence_before_the_database() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("scans.json");
    fs::write(&log_path, "{ not json").unwrap();
    let log = JsonLog::new(&log_path);
    let db = SqliteStore::new(dir.path().join("scans.db"));

    let err = storage::persist(batch(&[("10.0.0.1", &[22])]), &[&log, &db]).unwrap_err();

    assert!(matches!(err, PersistError::Json { .. }));
    assert_eq!(fs::read_to_string(&log_path).unwrap(), "{ not json");
    assert!(!db.path().exists());
}
