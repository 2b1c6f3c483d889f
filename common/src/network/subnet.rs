//! # Subnet Model
//!
//! A subnet is the first three octets of an IPv4 /24, kept as the text the
//! user typed (e.g. `192.168.10`). Discovery appends every host octet from
//! 1 to 254 to it.

use std::fmt;
use std::str::FromStr;

use pnet::ipnetwork::Ipv4Network;

use crate::error::InputError;

pub const FIRST_HOST_OCTET: u8 = 1;
pub const LAST_HOST_OCTET: u8 = 254;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subnet {
    prefix: String,
}

impl Subnet {
    /// Builds a subnet from a prefix, trimming surrounding whitespace.
    pub fn new(prefix: &str) -> Result<Self, InputError> {
        let prefix = prefix.trim();
        if prefix.is_empty() {
            return Err(InputError::EmptySubnet);
        }
        Ok(Self {
            prefix: prefix.to_string(),
        })
    }

    /// Takes the first three octets of the network address.
    pub fn from_network(network: Ipv4Network) -> Self {
        let [a, b, c, _] = network.network().octets();
        Self {
            prefix: format!("{a}.{b}.{c}"),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Every candidate host address, `prefix.1` through `prefix.254`.
    pub fn candidates(&self) -> impl Iterator<Item = String> + '_ {
        (FIRST_HOST_OCTET..=LAST_HOST_OCTET).map(move |octet| format!("{}.{octet}", self.prefix))
    }
}

impl FromStr for Subnet {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl fmt::Display for Subnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix)
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
