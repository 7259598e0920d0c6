//! Addressable pipeline resource kinds.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of an addressable pipeline resource.
///
/// Name resolution is always scoped by kind: a table and a register may
/// share a name without colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// Match-action table.
    Table,
    /// Action profile (member/group indirection).
    ActionProf,
    /// Action declaration.
    Action,
    /// Meter array.
    MeterArray,
    /// Counter array.
    CounterArray,
    /// Register array.
    RegisterArray,
}

impl ResourceKind {
    /// All resource kinds, in registry iteration order.
    pub const ALL: [ResourceKind; 6] = [
        ResourceKind::Table,
        ResourceKind::ActionProf,
        ResourceKind::Action,
        ResourceKind::MeterArray,
        ResourceKind::CounterArray,
        ResourceKind::RegisterArray,
    ];
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResourceKind::Table => "table",
            ResourceKind::ActionProf => "action_prof",
            ResourceKind::Action => "action",
            ResourceKind::MeterArray => "meter_array",
            ResourceKind::CounterArray => "counter_array",
            ResourceKind::RegisterArray => "register_array",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for ResourceKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(ResourceKind::Table),
            "action_prof" => Ok(ResourceKind::ActionProf),
            "action" => Ok(ResourceKind::Action),
            "meter_array" => Ok(ResourceKind::MeterArray),
            "counter_array" => Ok(ResourceKind::CounterArray),
            "register_array" => Ok(ResourceKind::RegisterArray),
            _ => Err(ParseError::InvalidResourceKind(s.to_string())),
        }
    }
}
