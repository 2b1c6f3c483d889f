use sweepr_common::network::host::{HostScanResult, PortResult};
use sweepr_common::network::ports::PortRange;

/// Receives progress notifications from the port scan. Purely a side
/// channel: nothing reported here changes the returned batch.
pub trait ScanObserver: Send + Sync {
    fn host_started(&self, _ip: &str, _ports: PortRange) {}

    /// Called once per port attempted, whatever its status.
    fn port_checked(&self, _ip: &str, _result: &PortResult) {}

    fn host_finished(&self, _result: &HostScanResult) {}
}

/// Discards every notification.
pub struct NoProgress;

impl ScanObserver for NoProgress {}
