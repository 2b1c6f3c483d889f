//! Input errors surfaced to the front end.
//!
//! Probe failures never appear here: the engines fold them into verdicts.

use thiserror::Error;

/// Problems with user-supplied input. Each one ends the run before any
/// persistence takes place.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Base IP cannot be empty")]
    EmptySubnet,
    #[error("No active hosts found")]
    NoLiveHosts,
    #[error("No hosts selected")]
    NoHostsSelected,
}
