#![cfg(test)]
use std::sync::{Arc, Mutex};

use sweepr_common::config::ScanConfig;
use sweepr_common::network::host::{PortResult, PortStatus};
use sweepr_common::network::ports::PortRange;
use sweepr_common::stop::StopSignal;
use sweepr_core::scanner::{NoProgress, PortScanner, ScanObserver};
use sweepr_integration_tests::mock::ScriptedProber;

fn hosts(list: &[&str]) -> Vec<String> {
    list.iter().map(|h| h.to_string()).collect()
}

/// Keeps every status the scanner reports, retained or not.
#[derive(Default)]
struct Recorder {
    checked: Mutex<Vec<(String, PortStatus)>>,
    finished: Mutex<Vec<String>>,
}

impl ScanObserver for Recorder {
    fn port_checked(&self, ip: &str, result: &PortResult) {
        self.checked
            .lock()
            .unwrap()
            .push((ip.to_string(), result.status.clone()));
    }

    fn host_finished(&self, result: &sweepr_common::network::host::HostScanResult) {
        self.finished.lock().unwrap().push(result.ip.clone());
    }
}

#[tokio::test]
async fn only_open_ports_are_kept() {
    let prober = Arc::new(ScriptedProber::new().open_ports("127.0.0.1", &[22]));
    let scanner = PortScanner::new(prober.clone(), &ScanConfig::default());

    let batch = scanner
        .scan(
            &hosts(&["127.0.0.1"]),
            PortRange::new(20, 23).unwrap(),
            &StopSignal::new(),
            &NoProgress,
        )
        .await;

    assert_eq!(batch.results.len(), 1);
    assert_eq!(batch.results[0].ip, "127.0.0.1");
    assert_eq!(batch.results[0].ports, [PortResult::new(22, PortStatus::Open)]);
    assert_eq!(prober.connects_to("127.0.0.1"), [20, 21, 22, 23]);
}

#[tokio::test]
async fn hosts_keep_selection_order() {
    let prober = Arc::new(
        ScriptedProber::new()
            .open_ports("10.0.0.9", &[80])
            .open_ports("10.0.0.2", &[22, 443]),
    );
    let scanner = PortScanner::new(prober, &ScanConfig::default());

    let batch = scanner
        .scan(
            &hosts(&["10.0.0.9", "10.0.0.40", "10.0.0.2"]),
            PortRange::new(1, 500).unwrap(),
            &StopSignal::new(),
            &NoProgress,
        )
        .await;

    let order: Vec<&str> = batch.results.iter().map(|r| r.ip.as_str()).collect();
    assert_eq!(order, ["10.0.0.9", "10.0.0.40", "10.0.0.2"]);
    assert!(batch.results[1].ports.is_empty());
    let ports: Vec<u16> = batch.results[2].ports.iter().map(|r| r.port).collect();
    assert_eq!(ports, [22, 443]);
    assert_eq!(batch.open_port_count(), 3);
}

#[tokio::test]
async fn failed_probes_are_reported_but_not_kept() {
    let prober = Arc::new(ScriptedProber::new().unreachable("printer.invalid"));
    let scanner = PortScanner::new(prober, &ScanConfig::default());
    let recorder = Recorder::default();

    let batch = scanner
        .scan(
            &hosts(&["printer.invalid"]),
            PortRange::new(1, 3).unwrap(),
            &StopSignal::new(),
            &recorder,
        )
        .await;

    assert!(batch.results[0].ports.is_empty());
    let checked = recorder.checked.lock().unwrap();
    assert_eq!(checked.len(), 3);
    assert!(checked
        .iter()
        .all(|(_, status)| matches!(status, PortStatus::Error(msg) if msg.contains("printer.invalid"))));
}

#[tokio::test]
async fn stop_keeps_partial_results_of_the_current_host() {
    let stop = StopSignal::new();
    let prober = Arc::new(
        ScriptedProber::new()
            .open_ports("10.0.0.1", &[5])
            .open_ports("10.0.0.2", &[3, 10, 20])
            .open_ports("10.0.0.3", &[1])
            .stop_during("10.0.0.2", 10, &stop),
    );
    let scanner = PortScanner::new(prober.clone(), &ScanConfig::default());
    let recorder = Recorder::default();

    let batch = scanner
        .scan(
            &hosts(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]),
            PortRange::new(1, 50).unwrap(),
            &stop,
            &recorder,
        )
        .await;

    assert_eq!(batch.results.len(), 2);
    assert_eq!(batch.results[0].ports, [PortResult::new(5, PortStatus::Open)]);
    let partial: Vec<u16> = batch.results[1].ports.iter().map(|r| r.port).collect();
    assert_eq!(partial, [3, 10]);
    assert_eq!(prober.connects_to("10.0.0.2"), (1..=10).collect::<Vec<u16>>());
    assert!(prober.connects_to("10.0.0.3").is_empty());
    assert_eq!(*recorder.finished.lock().unwrap(), ["10.0.0.1", "10.0.0.2"]);
}

#[tokio::test]
async fn parallel_workers_match_the_sequential_scan() {
    let prober = Arc::new(ScriptedProber::new().open_ports("10.0.0.4", &[2, 17, 18, 63]));
    let ports = PortRange::new(1, 64).unwrap();
    let targets = hosts(&["10.0.0.4"]);

    let sequential = PortScanner::new(prober.clone(), &ScanConfig::default())
        .scan(&targets, ports, &StopSignal::new(), &NoProgress)
        .await;
    let parallel = PortScanner::new(
        prober,
        &ScanConfig {
            port_workers: 8,
            ..ScanConfig::default()
        },
    )
    .scan(&targets, ports, &StopSignal::new(), &NoProgress)
    .await;

    assert_eq!(sequential, parallel);
}

/// Touches the real network stack.
#[tokio::test]
#[ignore]
async fn local_listener_shows_up_open() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let prober = Arc::new(sweepr_core::network::SystemProber::new());
    let scanner = PortScanner::new(prober, &ScanConfig::default());

    let batch = scanner
        .scan(
            &hosts(&["127.0.0.1"]),
            PortRange::new(port, port).unwrap(),
            &StopSignal::new(),
            &NoProgress,
        )
        .await;

    assert_eq!(batch.results[0].ports, [PortResult::new(port, PortStatus::Open)]);
}
