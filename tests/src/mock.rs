use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use sweepr_common::stop::StopSignal;
use sweepr_core::network::Prober;

/// A [`Prober`] whose answers are fixed up front.
///
/// Unknown hosts fail the echo and refuse every connection. Every connect
/// is recorded, so tests can assert on the exact probe order.
#[derive(Default)]
pub struct ScriptedProber {
    echo_replies: HashSet<String>,
    echo_broken: bool,
    open: HashSet<(String, u16)>,
    unreachable: HashSet<String>,
    echo_delays: HashMap<String, Duration>,
    stop_at: Option<(String, u16, StopSignal)>,
    connects: Mutex<Vec<(String, u16)>>,
}

impl ScriptedProber {
    pub fn new() -> Self {
        Self::default()
    }

    /// `hosts` answer the ICMP echo.
    pub fn echo_replies(mut self, hosts: &[&str]) -> Self {
        self.echo_replies.extend(hosts.iter().map(|h| h.to_string()));
        self
    }

    /// Every echo errors, as when no raw socket is available.
    pub fn without_icmp(mut self) -> Self {
        self.echo_broken = true;
        self
    }

    pub fn open_ports(mut self, host: &str, ports: &[u16]) -> Self {
        self.open.extend(ports.iter().map(|&p| (host.to_string(), p)));
        self
    }

    /// Connects to `host` error out instead of being refused.
    pub fn unreachable(mut self, host: &str) -> Self {
        self.unreachable.insert(host.to_string());
        self
    }

    /// The echo to `host` answers only after `delay`.
    pub fn slow_echo(mut self, host: &str, delay: Duration) -> Self {
        self.echo_delays.insert(host.to_string(), delay);
        self
    }

    /// Triggers `stop` while the connect to `host:port` is in flight.
    pub fn stop_during(mut self, host: &str, port: u16, stop: &StopSignal) -> Self {
        self.stop_at = Some((host.to_string(), port, stop.clone()));
        self
    }

    pub fn connects(&self) -> Vec<(String, u16)> {
        self.connects.lock().unwrap().clone()
    }

    pub fn connects_to(&self, host: &str) -> Vec<u16> {
        self.connects()
            .into_iter()
            .filter(|(h, _)| h == host)
            .map(|(_, p)| p)
            .collect()
    }
}

#[async_trait]
impl Prober for ScriptedProber {
    async fn echo(&self, host: &str, _timeout: Duration) -> anyhow::Result<bool> {
        if self.echo_broken {
            anyhow::bail!("ICMP echo unavailable");
        }
        if let Some(delay) = self.echo_delays.get(host) {
            tokio::time::sleep(*delay).await;
        }
        Ok(self.echo_replies.contains(host))
    }

    async fn connect(&self, host: &str, port: u16, _timeout: Duration) -> anyhow::Result<bool> {
        self.connects.lock().unwrap().push((host.to_string(), port));

        if let Some((stop_host, stop_port, stop)) = &self.stop_at {
            if stop_host == host && *stop_port == port {
                stop.trigger();
            }
        }

        if self.unreachable.contains(host) {
            anyhow::bail!("failed to resolve {host}");
        }
        Ok(self.open.contains(&(host.to_string(), port)))
    }
}
