use std::time::{Duration, Instant};

use colored::*;
use sweepr_common::config::Config;
use sweepr_common::error::InputError;
use sweepr_common::network::{interface, subnet::Subnet};
use sweepr_common::{info, success};
use sweepr_core::discovery::{HostDiscovery, HostFoundCallback};
use tracing::{Instrument, info_span};

use super::{Session, SubnetArgs};
use crate::sprint;
use crate::terminal::{colors, print, prompt, spinner::{self, SpinnerHandle}};

pub async fn discover(args: SubnetArgs, session: &Session) -> anyhow::Result<()> {
    let subnet = resolve_subnet(&args).await?;
    let hosts = find_hosts(&subnet, session).await;

    if hosts.is_empty() {
        return Err(InputError::NoLiveHosts.into());
    }

    Ok(())
}

/// Takes the subnet from `--lan`, `--base-ip` or the prompt, in that order.
pub async fn resolve_subnet(args: &SubnetArgs) -> anyhow::Result<Subnet> {
    if args.lan {
        let subnet = interface::get_lan_subnet()?;
        info!("Using LAN subnet {subnet}.0/24");
        return Ok(subnet);
    }

    let raw = match &args.base_ip {
        Some(base_ip) => base_ip.clone(),
        None => prompt::ask(prompt::BASE_IP_PROMPT).await?,
    };

    Ok(Subnet::new(&raw)?)
}

/// Sweeps `subnet` behind a spinner and prints the numbered host list.
pub async fn find_hosts(subnet: &Subnet, session: &Session) -> Vec<String> {
    let span = info_span!("discovery", indicatif.pb_show = true);
    let spinner_handle = SpinnerHandle::start(span.clone());
    let reporter = spinner_handle.sender();
    let on_host_found: HostFoundCallback =
        Box::new(move |count| spinner::report_discovery_progress(&reporter, count));

    info!("Scanning {subnet}.0/24 for active hosts...");

    let engine = HostDiscovery::new(session.prober.clone(), &session.scan_cfg);
    let start_time: Instant = Instant::now();
    let hosts: Vec<String> = engine
        .discover(subnet, &session.stop, Some(on_host_found))
        .instrument(span)
        .await;

    spinner_handle.finish();

    discovery_ends(&hosts, start_time.elapsed(), &session.cfg);
    hosts
}

fn discovery_ends(hosts: &[String], total_time: Duration, cfg: &Config) {
    if hosts.is_empty() {
        no_hosts_found(cfg);
        return;
    }

    if cfg.quiet > 0 {
        sprint!();
    }

    print::header("active hosts", cfg.quiet);
    print_hosts(hosts, cfg);
    print_summary(hosts.len(), total_time, cfg);
}

fn no_hosts_found(cfg: &Config) {
    print::header("zero hosts detected", cfg.quiet);
    if cfg.quiet == 0 {
        print::no_results();
    }
}

fn print_hosts(hosts: &[String], cfg: &Config) {
    if cfg.quiet > 1 {
        return;
    }

    for (idx, host) in hosts.iter().enumerate() {
        print::tree_head(idx + 1, host);
    }
}

fn print_summary(hosts_len: usize, total_time: Duration, cfg: &Config) {
    let active_hosts: ColoredString = format!("{hosts_len} active hosts").bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: &ColoredString = &format!("Discovery Complete: {active_hosts} identified in {total_time}")
        .color(colors::TEXT_DEFAULT);

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output.to_string());
        }
        _ => {
            sprint!();
            success!("{}", output)
        }
    }
}
