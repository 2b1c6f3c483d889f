//! # Sweepr Core
//!
//! The scanning core: [`discovery`] finds live hosts on a /24, [`scanner`]
//! enumerates open TCP ports on the hosts the user picked, and [`storage`]
//! writes the resulting batch to the JSON log and the SQLite table.
//!
//! All network access goes through the [`network::Prober`] trait.

pub mod discovery;
pub mod network;
pub mod scanner;
pub mod selection;
pub mod storage;
