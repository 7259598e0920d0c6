//! Table implementation kinds.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Implementation kind of a match-action table.
///
/// Indirect tables delegate action selection to an action profile; the
/// `indirect_ws` variant additionally load-balances over member groups
/// through a selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// Entries carry their action directly.
    Simple,
    /// Entries point at an action-profile member.
    Indirect,
    /// Entries point at an action-profile group chosen by a selector.
    #[serde(rename = "indirect_ws")]
    IndirectWithSelector,
}

impl TableKind {
    /// Returns true if tables of this kind must be bound to an action
    /// profile.
    pub const fn is_indirect(&self) -> bool {
        matches!(self, TableKind::Indirect | TableKind::IndirectWithSelector)
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TableKind::Simple => "simple",
            TableKind::Indirect => "indirect",
            TableKind::IndirectWithSelector => "indirect_ws",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for TableKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "simple" => Ok(TableKind::Simple),
            "indirect" => Ok(TableKind::Indirect),
            "indirect_ws" => Ok(TableKind::IndirectWithSelector),
            _ => Err(ParseError::InvalidTableKind(s.to_string())),
        }
    }
}
