//! # Port Range Model
//!
//! Parses the `start-end` notation accepted by the front ends. Anything that
//! does not describe a valid inclusive range falls back to [`PortRange::DEFAULT`].

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    pub const DEFAULT: PortRange = PortRange { start: 1, end: 100 };

    /// Returns `None` unless `1 <= start <= end`.
    pub fn new(start: u16, end: u16) -> Option<Self> {
        (start >= 1 && start <= end).then_some(Self { start, end })
    }

    /// Normalizes raw user input.
    ///
    /// Blank input silently means the default range. Malformed input also
    /// yields the default range, with a warning instead of an error.
    pub fn from_input(input: &str) -> Self {
        let input = input.trim();
        if input.is_empty() {
            return Self::DEFAULT;
        }
        match input.parse::<PortRange>() {
            Ok(range) => range,
            Err(e) => {
                warn!("{e}, defaulting to {}", Self::DEFAULT);
                Self::DEFAULT
            }
        }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    pub fn iter(&self) -> RangeInclusive<u16> {
        self.start..=self.end
    }
}

impl Default for PortRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl FromStr for PortRange {
    type Err = String;

    /// Parses `"start-end"`, e.g. `"20-25"`. Both ends are inclusive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((start_str, end_str)) = s.split_once('-') else {
            return Err(format!("Invalid port range '{s}': expected START-END"));
        };

        let start: u16 = parse_port(start_str, s)?;
        let end: u16 = parse_port(end_str, s)?;

        PortRange::new(start, end)
            .ok_or_else(|| format!("Invalid port range '{s}': start must be between 1 and end"))
    }
}

fn parse_port(port_str: &str, original_s: &str) -> Result<u16, String> {
    port_str
        .trim()
        .parse::<u16>()
        .map_err(|e| format!("Invalid port range '{original_s}': {e}"))
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
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
