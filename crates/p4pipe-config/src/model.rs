//! In-memory pipeline resource model.
//!
//! Plain owned data populated by the ingestor and never mutated after a
//! configuration is published. `Display` implementations produce the
//! one-line operator summaries used by listing commands.

use p4pipe_types::{MatchKind, MeterUnit, TableKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// One component of a table's lookup key.
///
/// Key order is significant: it defines the lookup key layout on the
/// wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyField {
    /// Dotted field reference, or the synthetic `<header>_valid` name.
    pub name: String,
    /// Match discipline for this component.
    pub match_kind: MatchKind,
    /// Field width in bits (1 for validity fields).
    pub bit_width: u32,
}

impl fmt::Display for KeyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {})", self.name, self.match_kind, self.bit_width)
    }
}

/// A match-action table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Fully-qualified table name.
    pub name: String,
    /// Compiler-assigned id.
    pub id: u32,
    /// Overall match kind of the table.
    pub match_kind: MatchKind,
    /// Implementation kind (simple / indirect / indirect_ws).
    pub kind: TableKind,
    /// Whether entries support idle timeouts.
    pub support_timeout: bool,
    /// Action names usable from this table, in declaration order.
    pub actions: Vec<String>,
    /// Ordered key fields.
    pub key: Vec<KeyField>,
    /// Default action name, when one has been chosen at runtime.
    pub default_action: Option<String>,
    /// Bound action profile; always set for indirect kinds after ingest.
    pub action_profile: Option<String>,
}

impl Table {
    /// Number of key fields.
    pub fn num_key_fields(&self) -> usize {
        self.key.len()
    }

    /// Returns true if `action` (fully qualified) is usable from this
    /// table.
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.iter().any(|a| a == action)
    }

    /// Comma-separated rendering of the key fields.
    pub fn key_summary(&self) -> String {
        self.key
            .iter()
            .map(KeyField::to_string)
            .collect::<Vec<_>>()
            .join(",\t")
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let implementation = self.action_profile.as_deref().unwrap_or("None");
        write!(
            f,
            "{:30} [implementation={}, mk={}]",
            self.name,
            implementation,
            self.key_summary()
        )
    }
}

/// One runtime parameter of an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionParam {
    /// Parameter name.
    pub name: String,
    /// Parameter width in bits.
    pub bit_width: u32,
}

impl fmt::Display for ActionParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.bit_width)
    }
}

/// An action declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// Fully-qualified action name.
    pub name: String,
    /// Compiler-assigned id.
    pub id: u32,
    /// Ordered runtime parameters; order defines the call-argument
    /// layout.
    pub runtime_data: Vec<ActionParam>,
}

impl Action {
    /// Number of runtime parameters.
    pub fn num_params(&self) -> usize {
        self.runtime_data.len()
    }

    /// Comma-separated rendering of the parameter signature.
    pub fn param_summary(&self) -> String {
        self.runtime_data
            .iter()
            .map(ActionParam::to_string)
            .collect::<Vec<_>>()
            .join(",\t")
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:30} [{}]", self.name, self.param_summary())
    }
}

/// An action profile: the member/group indirection indirect tables bind
/// to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionProfile {
    /// Fully-qualified profile name.
    pub name: String,
    /// Compiler-assigned id (the owning table's id for synthesized
    /// profiles).
    pub id: u32,
    /// Whether member selection goes through a selector.
    pub with_selection: bool,
    /// Union of the action sets of every referencing table.
    pub actions: BTreeSet<String>,
    /// Number of tables bound to this profile.
    pub ref_count: u32,
}

impl ActionProfile {
    /// Creates an empty, unreferenced profile.
    pub fn new(name: impl Into<String>, id: u32, with_selection: bool) -> Self {
        Self {
            name: name.into(),
            id,
            with_selection,
            actions: BTreeSet::new(),
            ref_count: 0,
        }
    }

    /// Returns true if `action` (fully qualified) belongs to this
    /// profile's merged action set.
    pub fn has_action(&self, action: &str) -> bool {
        self.actions.contains(action)
    }
}

impl fmt::Display for ActionProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:30} [{}]", self.name, self.with_selection)
    }
}

/// Index space of a meter or counter array.
///
/// Direct arrays are indexed per entry of their binding table; indirect
/// arrays carry their own size. Exactly one of the two applies, so the
/// choice is a closed sum type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArrayBacking {
    /// Bound 1:1 to the entries of the named table.
    Direct {
        /// The binding table's fully-qualified name.
        table: String,
    },
    /// Standalone array with its own index space.
    Indirect {
        /// Number of cells.
        size: u64,
    },
}

impl ArrayBacking {
    /// Returns true for table-bound arrays.
    pub const fn is_direct(&self) -> bool {
        matches!(self, ArrayBacking::Direct { .. })
    }

    /// Binding table name, if direct.
    pub fn binding(&self) -> Option<&str> {
        match self {
            ArrayBacking::Direct { table } => Some(table),
            ArrayBacking::Indirect { .. } => None,
        }
    }

    /// Cell count, if indirect.
    pub const fn size(&self) -> Option<u64> {
        match self {
            ArrayBacking::Direct { .. } => None,
            ArrayBacking::Indirect { size } => Some(*size),
        }
    }
}

impl fmt::Display for ArrayBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArrayBacking::Direct { table } => write!(f, "direct({})", table),
            ArrayBacking::Indirect { size } => write!(f, "{}", size),
        }
    }
}

/// A meter array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeterArray {
    /// Fully-qualified array name.
    pub name: String,
    /// Compiler-assigned id.
    pub id: u32,
    /// Rate accounting unit.
    pub unit: MeterUnit,
    /// Direct binding or standalone size.
    pub backing: ArrayBacking,
    /// Number of rates per meter (2 for trTCM-style meters).
    pub rate_count: u32,
}

impl fmt::Display for MeterArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:30} [{}, {}]", self.name, self.backing, self.unit)
    }
}

/// A counter array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterArray {
    /// Fully-qualified array name.
    pub name: String,
    /// Compiler-assigned id.
    pub id: u32,
    /// Direct binding or standalone size.
    pub backing: ArrayBacking,
}

impl fmt::Display for CounterArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:30} [{}]", self.name, self.backing)
    }
}

/// A register array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterArray {
    /// Fully-qualified array name.
    pub name: String,
    /// Compiler-assigned id.
    pub id: u32,
    /// Cell width in bits.
    pub bit_width: u32,
    /// Number of cells.
    pub size: u64,
}

impl fmt::Display for RegisterArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:30} [{}]", self.name, self.size)
    }
}

/// Output width of a custom CRC calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrcWidth {
    /// crc16_custom calculations.
    Crc16,
    /// crc32_custom calculations.
    Crc32,
}

impl CrcWidth {
    /// Width in bits.
    pub const fn bits(&self) -> u32 {
        match self {
            CrcWidth::Crc16 => 16,
            CrcWidth::Crc32 => 32,
        }
    }

    /// Maps a calculation algorithm token to a custom CRC width.
    ///
    /// Only the two customizable variants are retained; every other
    /// algorithm kind returns `None` and is skipped by the ingestor.
    pub fn from_algo(algo: &str) -> Option<Self> {
        match algo {
            "crc16_custom" => Some(CrcWidth::Crc16),
            "crc32_custom" => Some(CrcWidth::Crc32),
            _ => None,
        }
    }
}
