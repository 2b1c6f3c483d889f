//! Turns the user's host selection into the list handed to the port scan.

use sweepr_common::error::InputError;
use sweepr_common::warn;

/// Resolves `input` against the discovered `hosts`.
///
/// `all` picks every host. Otherwise `input` is a comma-separated list of
/// 1-based indexes, kept in the order typed; tokens that are not numbers and
/// indexes past the end of the list are ignored.
pub fn select_hosts(input: &str, hosts: &[String]) -> Result<Vec<String>, InputError> {
    let input = input.trim();

    if input.eq_ignore_ascii_case("all") {
        return non_empty(hosts.to_vec());
    }

    let mut selected: Vec<String> = Vec::new();
    for token in input.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if !token.chars().all(|c| c.is_ascii_digit()) {
            warn!("Ignoring '{token}' in selection");
            continue;
        }
        match token.parse::<usize>() {
            Ok(idx) if (1..=hosts.len()).contains(&idx) => selected.push(hosts[idx - 1].clone()),
            _ => warn!("No host number {token}"),
        }
    }

    non_empty(selected)
}

fn non_empty(selected: Vec<String>) -> Result<Vec<String>, InputError> {
    if selected.is_empty() {
        return Err(InputError::NoHostsSelected);
    }
    Ok(selected)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
