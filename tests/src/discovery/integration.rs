#![cfg(test)]
use std::sync::{Arc, Mutex};
use std::time::Duration;

use sweepr_common::config::{AddressOrder, JoinPolicy, ScanConfig};
use sweepr_common::network::subnet::Subnet;
use sweepr_common::stop::StopSignal;
use sweepr_core::discovery::{HostDiscovery, HostFoundCallback};
use sweepr_integration_tests::mock::ScriptedProber;

fn subnet() -> Subnet {
    Subnet::new("10.0.0").unwrap()
}

async fn run(prober: ScriptedProber, cfg: ScanConfig) -> (Vec<String>, Arc<ScriptedProber>) {
    let prober = Arc::new(prober);
    let engine = HostDiscovery::new(prober.clone(), &cfg);
    let hosts = engine.discover(&subnet(), &StopSignal::new(), None).await;
    (hosts, prober)
}

/// Three hosts answer the echo; the rest of the /24 is silent.
#[tokio::test]
async fn echo_replies_are_reported_sorted_as_text() {
    let prober = ScriptedProber::new().echo_replies(&["10.0.0.5", "10.0.0.1", "10.0.0.254"]);
    let (hosts, _) = run(prober, ScanConfig::default()).await;

    assert_eq!(hosts, ["10.0.0.1", "10.0.0.254", "10.0.0.5"]);
}

#[tokio::test]
async fn numeric_order_sorts_by_last_octet() {
    let prober = ScriptedProber::new().echo_replies(&["10.0.0.5", "10.0.0.1", "10.0.0.254"]);
    let cfg = ScanConfig {
        address_order: AddressOrder::Numeric,
        ..ScanConfig::default()
    };
    let (hosts, _) = run(prober, cfg).await;

    assert_eq!(hosts, ["10.0.0.1", "10.0.0.5", "10.0.0.254"]);
}

#[tokio::test]
async fn every_candidate_gets_the_full_fallback_when_icmp_is_missing() {
    let prober = ScriptedProber::new()
        .without_icmp()
        .open_ports("10.0.0.7", &[443])
        .open_ports("10.0.0.8", &[22]);
    let (hosts, prober) = run(prober, ScanConfig::default()).await;

    assert_eq!(hosts, ["10.0.0.7", "10.0.0.8"]);
    assert_eq!(prober.connects_to("10.0.0.7"), [22, 80, 443]);
    assert_eq!(prober.connects_to("10.0.0.8"), [22]);
    assert_eq!(prober.connects_to("10.0.0.9"), [22, 80, 443]);
    // .1 through .254, never .0 or .255
    assert!(prober.connects_to("10.0.0.0").is_empty());
    assert!(prober.connects_to("10.0.0.255").is_empty());
    assert_eq!(prober.connects_to("10.0.0.254"), [22, 80, 443]);
}

#[tokio::test]
async fn echo_reply_skips_the_tcp_fallback() {
    let prober = ScriptedProber::new().echo_replies(&["10.0.0.3"]);
    let (hosts, prober) = run(prober, ScanConfig::default()).await;

    assert_eq!(hosts, ["10.0.0.3"]);
    assert!(prober.connects_to("10.0.0.3").is_empty());
}

#[tokio::test]
async fn silent_subnet_yields_no_hosts() {
    let (hosts, _) = run(ScriptedProber::new(), ScanConfig::default()).await;
    assert!(hosts.is_empty());
}

#[tokio::test]
async fn triggered_stop_skips_every_probe() {
    let prober = Arc::new(ScriptedProber::new().without_icmp().open_ports("10.0.0.1", &[22]));
    let engine = HostDiscovery::new(prober.clone(), &ScanConfig::default());
    let stop = StopSignal::new();
    stop.trigger();

    let hosts = engine.discover(&subnet(), &stop, None).await;

    assert!(hosts.is_empty());
    assert!(prober.connects().is_empty());
}

#[tokio::test]
async fn callback_sees_a_running_total() {
    let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let on_found: HostFoundCallback = Box::new(move |total| sink.lock().unwrap().push(total));

    let prober = Arc::new(ScriptedProber::new().echo_replies(&["10.0.0.10", "10.0.0.20", "10.0.0.30"]));
    let engine = HostDiscovery::new(prober, &ScanConfig::default());
    let hosts = engine.discover(&subnet(), &StopSignal::new(), Some(on_found)).await;

    let mut totals = seen.lock().unwrap().clone();
    totals.sort_unstable();
    assert_eq!(hosts.len(), 3);
    assert_eq!(totals, [1, 2, 3]);
}

#[tokio::test]
async fn per_probe_wait_drops_hosts_that_answer_late() {
    let prober = ScriptedProber::new()
        .echo_replies(&["10.0.0.2", "10.0.0.3"])
        .slow_echo("10.0.0.3", Duration::from_secs(5));
    let cfg = ScanConfig {
        join_policy: JoinPolicy::PerProbe(Duration::from_millis(100)),
        ..ScanConfig::default()
    };
    let (hosts, _) = run(prober, cfg).await;

    assert_eq!(hosts, ["10.0.0.2"]);
}

#[tokio::test]
async fn default_wait_keeps_hosts_that_answer_late() {
    let prober = ScriptedProber::new()
        .echo_replies(&["10.0.0.2", "10.0.0.3"])
        .slow_echo("10.0.0.3", Duration::from_millis(300));
    let (hosts, _) = run(prober, ScanConfig::default()).await;

    assert_eq!(hosts, ["10.0.0.2", "10.0.0.3"]);
}

#[tokio::test]
async fn abandoned_probes_stop_once_discovery_returns() {
    let found: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = found.clone();
    let on_found: HostFoundCallback = Box::new(move |total| sink.lock().unwrap().push(total));

    let prober = Arc::new(
        ScriptedProber::new()
            .without_icmp()
            .open_ports("10.0.0.1", &[22])
            .open_ports("10.0.0.200", &[443]),
    );
    let cfg = ScanConfig {
        join_policy: JoinPolicy::PerProbe(Duration::ZERO),
        ..ScanConfig::default()
    };
    let engine = HostDiscovery::new(prober.clone(), &cfg);
    let hosts = engine.discover(&subnet(), &StopSignal::new(), Some(on_found)).await;

    let connects_at_return = prober.connects().len();
    let reported_at_return = found.lock().unwrap().len();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(prober.connects().len(), connects_at_return);
    assert_eq!(found.lock().unwrap().len(), reported_at_return);
    assert_eq!(hosts.len(), reported_at_return);
}

#[tokio::test]
async fn small_worker_pool_still_covers_the_whole_subnet() {
    let prober = ScriptedProber::new().echo_replies(&["10.0.0.1", "10.0.0.128", "10.0.0.254"]);
    let cfg = ScanConfig {
        max_concurrent_probes: 2,
        ..ScanConfig::default()
    };
    let (hosts, _) = run(prober, cfg).await;

    assert_eq!(hosts, ["10.0.0.1", "10.0.0.128", "10.0.0.254"]);
}

/// Needs a host that answers on loopback.
#[tokio::test]
#[ignore]
async fn loopback_subnet_finds_localhost() {
    let prober = Arc::new(sweepr_core::network::SystemProber::new());
    let engine = HostDiscovery::new(prober, &ScanConfig::default());
    let hosts = engine
        .discover(&Subnet::new("127.0.0").unwrap(), &StopSignal::new(), None)
        .await;

    assert!(hosts.contains(&"127.0.0.1".to_string()));
}
