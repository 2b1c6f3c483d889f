//! # Host Discovery Engine
//!
//! Finds the live hosts of a /24 by testing all 254 candidates concurrently.
//!
//! A candidate is live when it answers one ICMP echo, or, failing that, when
//! one of the fallback ports accepts a TCP connection. Probe failures of any
//! kind only ever make a candidate "not live"; they never abort discovery.

use std::cmp::Ordering;
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::time::Duration;

use sweepr_common::config::{AddressOrder, JoinPolicy, ScanConfig};
use sweepr_common::network::host::HostStatus;
use sweepr_common::network::subnet::Subnet;
use sweepr_common::stop::StopSignal;
use sweepr_common::{debug, error, info, warn};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use crate::network::Prober;

/// Called with the running total each time a live host is found.
pub type HostFoundCallback = Box<dyn Fn(usize) + Send + Sync>;

/// The liveness test applied to every candidate.
#[derive(Clone)]
pub struct LivenessTest {
    prober: Arc<dyn Prober>,
    icmp_timeout: Duration,
    fallback_timeout: Duration,
    fallback_ports: Arc<[u16]>,
}

impl LivenessTest {
    pub fn new(prober: Arc<dyn Prober>, cfg: &ScanConfig) -> Self {
        Self {
            prober,
            icmp_timeout: cfg.icmp_timeout,
            fallback_timeout: cfg.fallback_timeout,
            fallback_ports: cfg.fallback_ports.clone().into(),
        }
    }

    pub async fn check(&self, addr: String) -> HostStatus {
        let is_up = self.is_up(&addr).await;
        HostStatus::new(addr, is_up)
    }

    async fn is_up(&self, addr: &str) -> bool {
        match self.prober.echo(addr, self.icmp_timeout).await {
            Ok(true) => return true,
            Ok(false) => {}
            Err(e) => debug!("echo to {addr} failed: {e:#}"),
        }

        for &port in self.fallback_ports.iter() {
            match self.prober.connect(addr, port, self.fallback_timeout).await {
                Ok(true) => return true,
                Ok(false) => {}
                Err(e) => debug!("connect to {addr}:{port} failed: {e:#}"),
            }
        }
        false
    }
}

pub struct HostDiscovery {
    liveness: LivenessTest,
    join_policy: JoinPolicy,
    max_concurrent_probes: usize,
    address_order: AddressOrder,
}

impl HostDiscovery {
    pub fn new(prober: Arc<dyn Prober>, cfg: &ScanConfig) -> Self {
        Self {
            liveness: LivenessTest::new(prober, cfg),
            join_policy: cfg.join_policy,
            max_concurrent_probes: cfg.max_concurrent_probes.max(1),
            address_order: cfg.address_order,
        }
    }

    /// Probes every candidate of `subnet` and returns the live ones, sorted.
    ///
    /// Candidates whose probe has not started when `stop` is triggered are
    /// skipped. Probes already running finish on their own timeouts.
    pub async fn discover(
        &self,
        subnet: &Subnet,
        stop: &StopSignal,
        on_host_found: Option<HostFoundCallback>,
    ) -> Vec<String> {
        info!("Discovering active hosts on {subnet}.1-254...");

        let semaphore = Arc::new(Semaphore::new(self.max_concurrent_probes));
        let live_hosts: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let found_count = Arc::new(AtomicUsize::new(0));
        let callback: Option<Arc<dyn Fn(usize) + Send + Sync>> = on_host_found.map(Arc::from);

        let mut handles: Vec<JoinHandle<()>> = Vec::new();

        for addr in subnet.candidates() {
            let semaphore = Arc::clone(&semaphore);
            let live_hosts = Arc::clone(&live_hosts);
            let found_count = Arc::clone(&found_count);
            let callback = callback.clone();
            let liveness = self.liveness.clone();
            let stop = stop.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return;
                };
                if stop.is_triggered() {
                    return;
                }

                let status: HostStatus = liveness.check(addr).await;
                if !status.is_up {
                    return;
                }

                live_hosts.lock().await.push(status.addr);
                let total = found_count.fetch_add(1, AtomicOrdering::Relaxed) + 1;
                if let Some(cb) = &callback {
                    cb(total);
                }
            });
            handles.push(handle);
        }

        join_probes(handles, self.join_policy).await;

        let mut hosts: Vec<String> = live_hosts.lock().await.clone();
        sort_addresses(&mut hosts, self.address_order);
        hosts
    }
}

/// Waits on every probe according to `policy`. Under `PerProbe`, a probe
/// that outlives its wait is aborted, so nothing keeps probing or reporting
/// after discovery returns.
async fn join_probes(handles: Vec<JoinHandle<()>>, policy: JoinPolicy) {
    let mut abandoned: usize = 0;

    for handle in handles {
        match policy {
            JoinPolicy::Unbounded => {
                if let Err(e) = handle.await {
                    error!("Discovery probe failed: {e}");
                }
            }
            JoinPolicy::PerProbe(wait) => {
                let abort = handle.abort_handle();
                match timeout(wait, handle).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => error!("Discovery probe failed: {e}"),
                    Err(_elapsed) => {
                        abort.abort();
                        abandoned += 1;
                    }
                }
            }
        }
    }

    if abandoned > 0 {
        warn!("{abandoned} probes did not finish within the per-probe wait, their hosts are not reported");
    }
}

/// Orders live hosts for display and selection.
pub fn sort_addresses(hosts: &mut [String], order: AddressOrder) {
    match order {
        AddressOrder::Lexicographic => hosts.sort(),
        AddressOrder::Numeric => hosts.sort_by(|a, b| compare_numeric(a, b)),
    }
}

fn compare_numeric(a: &str, b: &str) -> Ordering {
    let key = |s: &str| s.parse::<Ipv4Addr>().map_err(|_| ());
    key(a).cmp(&key(b)).then_with(|| a.cmp(b))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
