//! # Port Scan Engine
//!
//! Probes every port of a range on each selected host and keeps the open
//! ones.
//!
//! Hosts are scanned one after another in the order given. Within a host,
//! ports are probed in ascending order, one at a time unless
//! `ScanConfig::port_workers` allows a few connects to overlap. Either way
//! the retained ports come out ascending and hosts keep their input order.

use std::sync::Arc;
use std::time::Duration;

use sweepr_common::config::ScanConfig;
use sweepr_common::network::host::{HostScanResult, PortResult, PortStatus, ScanBatch};
use sweepr_common::network::ports::PortRange;
use sweepr_common::stop::StopSignal;
use sweepr_common::{error, info};
use tokio::task::JoinHandle;

use crate::network::Prober;

mod progress;

pub use progress::{NoProgress, ScanObserver};

pub struct PortScanner {
    prober: Arc<dyn Prober>,
    connect_timeout: Duration,
    port_workers: usize,
}

impl PortScanner {
    pub fn new(prober: Arc<dyn Prober>, cfg: &ScanConfig) -> Self {
        Self {
            prober,
            connect_timeout: cfg.connect_timeout,
            port_workers: cfg.port_workers.max(1),
        }
    }

    /// Scans `hosts` in order.
    ///
    /// `stop` is checked before each host and before each port. Whatever was
    /// collected when it fires, including the partial result of the host in
    /// progress, is part of the returned batch.
    pub async fn scan(
        &self,
        hosts: &[String],
        ports: PortRange,
        stop: &StopSignal,
        observer: &dyn ScanObserver,
    ) -> ScanBatch {
        let mut results: Vec<HostScanResult> = Vec::with_capacity(hosts.len());

        for ip in hosts {
            if stop.is_triggered() {
                info!("Stop requested, skipping remaining hosts");
                break;
            }

            observer.host_started(ip, ports);
            let host_result = match self.port_workers {
                1 => self.scan_sequential(ip, ports, stop, observer).await,
                _ => self.scan_chunked(ip, ports, stop, observer).await,
            };
            observer.host_finished(&host_result);
            results.push(host_result);
        }

        ScanBatch::new(results)
    }

    async fn scan_sequential(
        &self,
        ip: &str,
        ports: PortRange,
        stop: &StopSignal,
        observer: &dyn ScanObserver,
    ) -> HostScanResult {
        let mut host = HostScanResult::new(ip);

        for port in ports.iter() {
            if stop.is_triggered() {
                break;
            }
            let result: PortResult = probe_port(self.prober.as_ref(), ip, port, self.connect_timeout).await;
            observer.port_checked(ip, &result);
            host.record(result);
        }
        host
    }

    /// Probes up to `port_workers` ports at once and records each chunk in
    /// port order before starting the next.
    async fn scan_chunked(
        &self,
        ip: &str,
        ports: PortRange,
        stop: &StopSignal,
        observer: &dyn ScanObserver,
    ) -> HostScanResult {
        let mut host = HostScanResult::new(ip);
        let port_list: Vec<u16> = ports.iter().collect();

        for chunk in port_list.chunks(self.port_workers) {
            if stop.is_triggered() {
                break;
            }

            let mut handles: Vec<(u16, JoinHandle<PortResult>)> = Vec::with_capacity(chunk.len());
            for &port in chunk {
                if stop.is_triggered() {
                    break;
                }
                let prober = Arc::clone(&self.prober);
                let target = ip.to_string();
                let connect_timeout = self.connect_timeout;
                let handle = tokio::spawn(async move {
                    probe_port(prober.as_ref(), &target, port, connect_timeout).await
                });
                handles.push((port, handle));
            }

            for (port, handle) in handles {
                let result = match handle.await {
                    Ok(result) => result,
                    Err(e) => {
                        error!("Probe of {ip}:{port} did not complete: {e}");
                        PortResult::new(port, PortStatus::Error(e.to_string()))
                    }
                };
                observer.port_checked(ip, &result);
                host.record(result);
            }
        }
        host
    }
}

/// One connect attempt, classified.
pub async fn probe_port(prober: &dyn Prober, ip: &str, port: u16, connect_timeout: Duration) -> PortResult {
    let status = match prober.connect(ip, port, connect_timeout).await {
        Ok(true) => PortStatus::Open,
        Ok(false) => PortStatus::Closed,
        Err(e) => PortStatus::Error(e.to_string()),
    };
    PortResult::new(port, status)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
