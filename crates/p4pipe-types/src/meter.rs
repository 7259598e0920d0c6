//! Meter rate accounting units.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unit in which a meter array accounts traffic rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeterUnit {
    /// Rates are expressed in packets per second.
    Packets,
    /// Rates are expressed in bytes per second.
    Bytes,
}

impl fmt::Display for MeterUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MeterUnit::Packets => "packets",
            MeterUnit::Bytes => "bytes",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MeterUnit {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "packets" => Ok(MeterUnit::Packets),
            "bytes" => Ok(MeterUnit::Bytes),
            _ => Err(ParseError::InvalidMeterUnit(s.to_string())),
        }
    }
}
