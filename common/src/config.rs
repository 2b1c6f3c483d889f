use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_FALLBACK_PORTS: [u16; 3] = [22, 80, 443];
pub const DEFAULT_JSON_LOG: &str = "results/scans.json";
pub const DEFAULT_DATABASE: &str = "data/scans.db";

/// Presentation settings for the front end.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Hides the startup banner.
    pub no_banner: bool,
    /// 0 prints everything, 1 drops headers and trees, 2 prints summaries only.
    pub quiet: u8,
}

/// How discovery waits for its probes before collecting verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinPolicy {
    /// Wait until every probe reaches a terminal state.
    Unbounded,
    /// Wait at most this long on each probe, in launch order. Probes still
    /// running afterwards are left to finish on their own and their verdicts
    /// are not reported.
    PerProbe(Duration),
}

/// Ordering applied to the list of live hosts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressOrder {
    /// Plain string comparison, so "10.0.0.10" sorts before "10.0.0.9".
    #[default]
    Lexicographic,
    /// Octet-wise numeric comparison. Addresses that do not parse as IPv4
    /// sort after the ones that do, lexicographically among themselves.
    Numeric,
}

/// Tuning knobs for both engines.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Timeout for the ICMP echo that opens every liveness test.
    pub icmp_timeout: Duration,
    /// Timeout for each TCP connect of the liveness fallback.
    pub fallback_timeout: Duration,
    /// Ports tried, in order, when the echo gets no answer.
    pub fallback_ports: Vec<u16>,
    pub join_policy: JoinPolicy,
    /// Upper bound on discovery probes running at once.
    pub max_concurrent_probes: usize,
    /// Timeout for each connect of the port scan.
    pub connect_timeout: Duration,
    /// Ports probed at once within one host. 1 keeps the scan sequential.
    pub port_workers: usize,
    pub address_order: AddressOrder,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            icmp_timeout: Duration::from_secs(1),
            fallback_timeout: Duration::from_millis(500),
            fallback_ports: DEFAULT_FALLBACK_PORTS.to_vec(),
            join_policy: JoinPolicy::Unbounded,
            max_concurrent_probes: 64,
            connect_timeout: Duration::from_millis(500),
            port_workers: 1,
            address_order: AddressOrder::default(),
        }
    }
}

/// Where the persistence writers keep their files.
#[derive(Debug, Clone)]
pub struct StoragePaths {
    pub json_log: PathBuf,
    pub database: PathBuf,
}

impl Default for StoragePaths {
    fn default() -> Self {
        Self {
            json_log: PathBuf::from(DEFAULT_JSON_LOG),
            database: PathBuf::from(DEFAULT_DATABASE),
        }
    }
}
