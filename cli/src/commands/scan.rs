use std::sync::mpsc::Sender;
use std::time::Instant;

use anyhow::Context;
use colored::*;
use sweepr_common::config::Config;
use sweepr_common::network::host::{HostScanResult, PortResult, ScanBatch};
use sweepr_common::network::ports::PortRange;
use sweepr_common::network::services::service_name;
use sweepr_common::{info, success};
use sweepr_core::scanner::{PortScanner, ScanObserver};
use sweepr_core::storage::{self, json::JsonLog, sqlite::SqliteStore};
use tracing::{Instrument, info_span};

use super::{ScanArgs, Session};
use crate::sprint;
use crate::terminal::{colors, print, spinner::{self, SpinnerHandle}};

type Detail = (String, ColoredString);

pub async fn scan(args: ScanArgs, session: &Session) -> anyhow::Result<()> {
    let ports = PortRange::from_input(args.ports.as_deref().unwrap_or_default());
    let batch = scan_hosts(&args.hosts, ports, session).await;
    save(batch, session)
}

/// Scans `hosts` one after another, reporting each port as it is checked.
pub async fn scan_hosts(hosts: &[String], ports: PortRange, session: &Session) -> ScanBatch {
    let span = info_span!("port_scan", indicatif.pb_show = true);
    let spinner_handle = SpinnerHandle::start(span.clone());
    let observer = TerminalObserver {
        progress: spinner_handle.sender(),
        cfg: session.cfg.clone(),
    };

    let scanner = PortScanner::new(session.prober.clone(), &session.scan_cfg);
    let start_time: Instant = Instant::now();
    let batch: ScanBatch = scanner
        .scan(hosts, ports, &session.stop, &observer)
        .instrument(span)
        .await;

    drop(observer);
    spinner_handle.finish();

    print_summary(&batch, start_time.elapsed().as_secs_f64(), &session.cfg);
    batch
}

/// Writes the batch to the JSON log and the database under one timestamp.
pub fn save(batch: ScanBatch, session: &Session) -> anyhow::Result<()> {
    if session.no_save {
        info!("Results not saved (--no-save)");
        return Ok(());
    }

    let json_log = JsonLog::new(&session.paths.json_log);
    let database = SqliteStore::new(&session.paths.database);

    storage::persist(batch, &[&json_log, &database]).context("failed to save scan results")?;
    Ok(())
}

struct TerminalObserver {
    progress: Sender<String>,
    cfg: Config,
}

impl ScanObserver for TerminalObserver {
    fn host_started(&self, ip: &str, ports: PortRange) {
        if self.cfg.quiet < 2 {
            info!("Scanning ports {ports} on {ip}...");
        }
    }

    fn port_checked(&self, ip: &str, result: &PortResult) {
        spinner::report_port_progress(&self.progress, ip, result.port);
        if result.status.is_open() && self.cfg.quiet < 2 {
            success!("Port {}: {}", result.port, result.status);
        }
    }

    fn host_finished(&self, result: &HostScanResult) {
        if self.cfg.quiet > 1 {
            return;
        }

        print::header(&format!("open ports on {}", result.ip), self.cfg.quiet);
        if result.ports.is_empty() {
            print::print_status("No open ports found");
            return;
        }

        match self.cfg.quiet {
            0 => print::as_tree_one_level(port_details(&result.ports)),
            _ => {
                for port in &result.ports {
                    print::print_status(summary_line(port));
                }
            }
        }
    }
}

/// `Port 22 - SSH : Open`
fn summary_line(result: &PortResult) -> String {
    format!("Port {} - {} : {}", result.port, service_name(result.port), result.status)
}

fn port_details(ports: &[PortResult]) -> Vec<Detail> {
    ports
        .iter()
        .map(|result| {
            let value = format!(
                "{} : {}",
                service_name(result.port).color(colors::SERVICE),
                result.status.to_string().color(colors::PORT_OPEN)
            );
            (format!("Port {}", result.port), value.normal())
        })
        .collect()
}

fn print_summary(batch: &ScanBatch, total_secs: f64, cfg: &Config) {
    let open_ports: ColoredString = format!("{} open ports", batch.open_port_count()).bold().green();
    let hosts: ColoredString = format!("{} hosts", batch.results.len()).bold().green();
    let total_time: ColoredString = format!("{total_secs:.2}s").bold().yellow();
    let output: String = format!("Scan Complete: {open_ports} across {hosts} in {total_time}");

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => {
            sprint!();
            success!("{}", output)
        }
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
