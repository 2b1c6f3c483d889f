use colored::*;
use sweepr_common::network::host::ScanRecord;
use sweepr_common::network::services::service_name;
use sweepr_core::storage::json::JsonLog;

use super::Session;
use crate::sprint;
use crate::terminal::{colors, print};

pub fn history(session: &Session) -> anyhow::Result<()> {
    let log = JsonLog::new(&session.paths.json_log);
    let records = log.load()?;

    if records.is_empty() {
        print::header("no saved scans", session.cfg.quiet);
        print::print_status(format!("Nothing recorded in {}", log.path().display()));
        return Ok(());
    }

    print::header("saved scans", session.cfg.quiet);
    if session.cfg.quiet == 0 {
        print::aligned_line("Log", log.path().display().to_string(), 7);
        print::aligned_line("Scans", records.len().to_string(), 7);
        sprint!();
    }
    for (idx, record) in records.iter().enumerate() {
        print_record(idx + 1, record);
        if idx + 1 != records.len() {
            sprint!();
        }
    }

    Ok(())
}

fn print_record(idx: usize, record: &ScanRecord) {
    let stamp = record.timestamp.format("%Y-%m-%d %H:%M:%S").to_string();
    print::tree_head(idx, &stamp);

    let details: Vec<(String, ColoredString)> = record
        .results
        .iter()
        .map(|host| {
            let ports: Vec<String> = host
                .ports
                .iter()
                .map(|result| format!("{} ({})", result.port, service_name(result.port)))
                .collect();
            let value = if ports.is_empty() {
                "no open ports".color(colors::SEPARATOR)
            } else {
                ports.join(", ").color(colors::PORT_OPEN)
            };
            (host.ip.clone(), value)
        })
        .collect();

    if details.is_empty() {
        print::print_status("No hosts scanned");
    } else {
        print::as_tree_one_level(details);
    }
}
