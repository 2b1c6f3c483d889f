//! # Probe Layer
//!
//! Every network interaction of the engines goes through [`Prober`], so the
//! engines can be driven by a scripted implementation in tests.
//! [`SystemProber`] is the real one: ICMP echo through `surge-ping` and TCP
//! connects through `tokio`.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sweepr_common::debug;

pub mod icmp;
pub mod tcp;

use icmp::IcmpPinger;

#[async_trait]
pub trait Prober: Send + Sync {
    /// Sends a single ICMP echo request. `Ok(true)` means a reply arrived
    /// within `timeout`.
    async fn echo(&self, host: &str, timeout: Duration) -> anyhow::Result<bool>;

    /// Attempts one TCP handshake. `Ok(true)` when it completes, `Ok(false)`
    /// when it is refused or does not complete within `timeout`, `Err` when
    /// the attempt could not be made at all.
    async fn connect(&self, host: &str, port: u16, timeout: Duration) -> anyhow::Result<bool>;
}

/// Probes the real network.
pub struct SystemProber {
    pinger: Option<IcmpPinger>,
}

impl SystemProber {
    /// Must be called from within a tokio runtime.
    ///
    /// When no ICMP socket can be opened (missing privileges or a sandbox),
    /// every echo reports an error and liveness relies on the TCP fallback.
    pub fn new() -> Self {
        let pinger = match IcmpPinger::new() {
            Ok(pinger) => Some(pinger),
            Err(e) => {
                debug!("ICMP echo unavailable: {e:#}");
                None
            }
        };
        Self { pinger }
    }

    pub fn has_icmp(&self) -> bool {
        self.pinger.is_some()
    }
}

#[async_trait]
impl Prober for SystemProber {
    async fn echo(&self, host: &str, timeout: Duration) -> anyhow::Result<bool> {
        let Some(pinger) = &self.pinger else {
            anyhow::bail!("ICMP echo unavailable");
        };
        let addr: SocketAddr = resolve(host, 0).await?;
        pinger.ping(addr.ip(), timeout).await
    }

    async fn connect(&self, host: &str, port: u16, timeout: Duration) -> anyhow::Result<bool> {
        let addr: SocketAddr = resolve(host, port).await?;
        Ok(tcp::handshake(addr, timeout).await)
    }
}

/// Turns `host` into an IPv4 socket address. IP literals skip the resolver.
pub async fn resolve(host: &str, port: u16) -> anyhow::Result<SocketAddr> {
    if let Ok(ip) = host.parse::<IpAddr>() {
        return Ok(SocketAddr::new(ip, port));
    }

    tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("cannot resolve '{host}'"))?
        .find(SocketAddr::is_ipv4)
        .with_context(|| format!("'{host}' has no IPv4 address"))
}
