//! Local interface inspection, used to derive the subnet of the LAN this
//! machine sits on.

use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

#[cfg(target_os = "linux")]
use linux_impl::{is_physical, is_wireless};
#[cfg(not(target_os = "linux"))]
use fallback_impl::{is_physical, is_wireless};

use thiserror::Error;

use crate::debug;
use crate::network::subnet::Subnet;

/// Why an interface cannot carry LAN discovery.
#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    #[error("interface is down")]
    IsDown,
    #[error("not a physical interface")]
    NotPhysical,
    #[error("no MAC address")]
    NoMacAddress,
    #[error("no broadcast support")]
    NotBroadcast,
    /// Typically a VPN tunnel.
    #[error("point-to-point link")]
    IsPointToPoint,
    #[error("no private IPv4 address")]
    NoPrivateIpv4,
}

/// Finds the subnet of the primary LAN interface.
pub fn get_lan_subnet() -> anyhow::Result<Subnet> {
    let interfaces: Vec<NetworkInterface> = pnet::datalink::interfaces();
    let Some(network) = select_lan_network(&interfaces, is_physical, is_wired) else {
        anyhow::bail!("No interfaces available for LAN discovery");
    };
    Ok(Subnet::from_network(network))
}

/// Picks the private IPv4 network of the best viable interface, preferring
/// wired over wireless.
pub fn select_lan_network(
    interfaces: &[NetworkInterface],
    is_physical: impl Fn(&NetworkInterface) -> bool,
    is_wired: impl Fn(&NetworkInterface) -> bool,
) -> Option<Ipv4Network> {
    let (viable, rejected) = partition_viable(interfaces, &is_physical);
    for (name, reason) in &rejected {
        debug!("Skipping interface {name}: {reason}");
    }

    let interface: &NetworkInterface = viable
        .iter()
        .find(|interface| is_wired(**interface))
        .or(viable.first())?;

    private_ipv4(interface)
}

/// Splits `interfaces` into viable ones and the names of the rest with the
/// reason each was rejected.
fn partition_viable<'a>(
    interfaces: &'a [NetworkInterface],
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> (Vec<&'a NetworkInterface>, Vec<(&'a str, ViabilityError)>) {
    let mut viable = Vec::new();
    let mut rejected = Vec::new();

    for interface in interfaces {
        match is_viable_lan_interface(interface, &is_physical) {
            Ok(()) => viable.push(interface),
            Err(reason) => rejected.push((interface.name.as_str(), reason)),
        }
    }
    (viable, rejected)
}

fn is_viable_lan_interface(
    interface: &NetworkInterface,
    is_physical: impl Fn(&NetworkInterface) -> bool,
) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() || !is_physical(interface) {
        return Err(ViabilityError::NotPhysical);
    }
    if interface.mac.is_none() {
        return Err(ViabilityError::NoMacAddress);
    }
    if !interface.is_broadcast() {
        return Err(ViabilityError::NotBroadcast);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    if private_ipv4(interface).is_none() {
        return Err(ViabilityError::NoPrivateIpv4);
    }
    Ok(())
}

fn private_ipv4(interface: &NetworkInterface) -> Option<Ipv4Network> {
    interface.ips.iter().find_map(|net| match net {
        IpNetwork::V4(v4) if v4.ip().is_private() => Some(*v4),
        _ => None,
    })
}

fn is_wired(interface: &NetworkInterface) -> bool {
    is_physical(interface) && !is_wireless(interface)
}

#[cfg(target_os = "linux")]
mod linux_impl {
    use super::*;
    use std::path::Path;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/device", interface.name)).exists()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        Path::new(&format!("/sys/class/net/{}/wireless", interface.name)).exists()
    }
}

#[cfg(not(target_os = "linux"))]
mod fallback_impl {
    use super::*;

    pub fn is_physical(interface: &NetworkInterface) -> bool {
        !interface.is_loopback()
    }

    pub fn is_wireless(interface: &NetworkInterface) -> bool {
        interface.name.starts_with("wl")
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
