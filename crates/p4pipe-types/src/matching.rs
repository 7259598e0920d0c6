//! Match-kind definitions for table key fields.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Match discipline of a table or key field.
///
/// Corresponds to the `match_type` tokens emitted by the pipeline
/// compiler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Exact-match lookup.
    Exact,
    /// Longest-prefix match.
    Lpm,
    /// Ternary (value/mask) match.
    Ternary,
    /// Header-validity match.
    Valid,
    /// Range match.
    Range,
}

impl MatchKind {
    /// Returns true if entries under this match kind carry a priority.
    pub const fn needs_priority(&self) -> bool {
        matches!(self, MatchKind::Ternary | MatchKind::Range)
    }
}

impl fmt::Display for MatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchKind::Exact => "exact",
            MatchKind::Lpm => "lpm",
            MatchKind::Ternary => "ternary",
            MatchKind::Valid => "valid",
            MatchKind::Range => "range",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for MatchKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(MatchKind::Exact),
            "lpm" => Ok(MatchKind::Lpm),
            "ternary" => Ok(MatchKind::Ternary),
            "valid" => Ok(MatchKind::Valid),
            "range" => Ok(MatchKind::Range),
            _ => Err(ParseError::InvalidMatchKind(s.to_string())),
        }
    }
}
