//! # Sweepr Common
//!
//! Types and helpers shared by the scanning engines and the front end:
//! the result model, input normalization, configuration, errors, the stop
//! signal and the logging macros.

pub mod config;
pub mod error;
pub mod log;
pub mod network;
pub mod stop;

#[doc(hidden)]
pub use tracing as __tracing;
