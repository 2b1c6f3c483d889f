use sweepr_common::error::InputError;
use sweepr_common::network::ports::PortRange;
use sweepr_common::warn;
use sweepr_core::selection::select_hosts;

use super::{RunArgs, Session, discover, scan};
use crate::terminal::prompt;

/// The full interactive flow: subnet, port range, discovery, selection,
/// port scan, persistence. Anything not given as a flag is prompted for.
pub async fn run(args: RunArgs, session: &Session) -> anyhow::Result<()> {
    let subnet = discover::resolve_subnet(&args.subnet).await?;

    let raw_ports = match args.ports {
        Some(ports) => ports,
        None => prompt::ask(prompt::PORT_RANGE_PROMPT).await?,
    };
    let ports = PortRange::from_input(&raw_ports);

    let hosts = discover::find_hosts(&subnet, session).await;
    if hosts.is_empty() {
        return Err(InputError::NoLiveHosts.into());
    }

    let raw_selection = match args.select {
        Some(selection) => selection,
        None => prompt::ask(prompt::SELECTION_PROMPT).await?,
    };
    let selected = select_hosts(&raw_selection, &hosts)?;

    if session.stop.is_triggered() {
        warn!("Stopped before the port scan started");
        return Ok(());
    }

    let batch = scan::scan_hosts(&selected, ports, session).await;
    scan::save(batch, session)
}
