//! Logging macros.
//!
//! Thin wrappers around `tracing` so every crate logs through the same
//! targets. The CLI formatter renders `success!` with its own symbol.

/// Target used for positive outcomes (hosts found, results saved).
pub const SUCCESS_TARGET: &str = "sweepr::success";

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!($($arg)*)
    };
}

#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "sweepr::success", $($arg)*)
    };
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!($($arg)*)
    };
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!($($arg)*)
    };
}

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!($($arg)*)
    };
}
