//! # Scan Result Model
//!
//! Values produced by the engines and handed to persistence.
//!
//! The serialized shape is shared with existing scan logs:
//! `{"ip": "10.0.0.1", "ports": [[22, "Open"]]}` per host, and a
//! [`ScanRecord`] adds the ISO-8601 timestamp taken when persistence begins.

use std::fmt;

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Liveness verdict for one discovery candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostStatus {
    pub addr: String,
    pub is_up: bool,
}

impl HostStatus {
    pub fn new(addr: String, is_up: bool) -> Self {
        Self { addr, is_up }
    }
}

/// Outcome of one TCP connect attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortStatus {
    Open,
    Closed,
    /// The attempt raised an error; holds its message.
    Error(String),
}

impl PortStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, PortStatus::Open)
    }
}

impl fmt::Display for PortStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PortStatus::Open => write!(f, "Open"),
            PortStatus::Closed => write!(f, "Closed"),
            PortStatus::Error(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl Serialize for PortStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PortStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(match raw.as_str() {
            "Open" => PortStatus::Open,
            "Closed" => PortStatus::Closed,
            other => PortStatus::Error(other.strip_prefix("Error: ").unwrap_or(other).to_string()),
        })
    }
}

/// A port paired with its classification. Serialized as `[port, status]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u16, PortStatus)", into = "(u16, PortStatus)")]
pub struct PortResult {
    pub port: u16,
    pub status: PortStatus,
}

impl PortResult {
    pub fn new(port: u16, status: PortStatus) -> Self {
        Self { port, status }
    }
}

impl From<(u16, PortStatus)> for PortResult {
    fn from((port, status): (u16, PortStatus)) -> Self {
        Self { port, status }
    }
}

impl From<PortResult> for (u16, PortStatus) {
    fn from(result: PortResult) -> Self {
        (result.port, result.status)
    }
}

/// Open ports of one host, in the order they were probed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostScanResult {
    pub ip: String,
    pub ports: Vec<PortResult>,
}

impl HostScanResult {
    pub fn new(ip: impl Into<String>) -> Self {
        Self {
            ip: ip.into(),
            ports: Vec::new(),
        }
    }

    /// Keeps `result` only when the port is open. Returns whether it was kept.
    pub fn record(&mut self, result: PortResult) -> bool {
        if !result.status.is_open() {
            return false;
        }
        self.ports.push(result);
        true
    }
}

/// Output of one port-scan run, one entry per host in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScanBatch {
    pub results: Vec<HostScanResult>,
}

impl ScanBatch {
    pub fn new(results: Vec<HostScanResult>) -> Self {
        Self { results }
    }

    pub fn open_port_count(&self) -> usize {
        self.results.iter().map(|host| host.ports.len()).sum()
    }

    /// Stamps the batch with the current local time.
    pub fn stamp(self) -> ScanRecord {
        self.stamp_at(Local::now().naive_local())
    }

    pub fn stamp_at(self, timestamp: NaiveDateTime) -> ScanRecord {
        ScanRecord {
            timestamp,
            results: self.results,
        }
    }
}

/// A [`ScanBatch`] as it is written to the scan log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    pub timestamp: NaiveDateTime,
    pub results: Vec<HostScanResult>,
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
