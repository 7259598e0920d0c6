//! Common type definitions for P4 pipeline resources.
//!
//! This crate provides closed, type-safe representations of the stringly
//! typed concepts in compiler-emitted pipeline JSON:
//!
//! - [`MatchKind`]: table key match disciplines (exact, lpm, ...)
//! - [`TableKind`]: simple vs. indirect table implementations
//! - [`MeterUnit`]: meter rate accounting units
//! - [`ResourceKind`]: the six addressable pipeline resource kinds
//!
//! Every enum converts to and from its document token via `Display` and
//! `FromStr`; a token outside the closed set is a typed [`ParseError`],
//! never a panic.

mod matching;
mod meter;
mod resource;
mod table;

pub use matching::MatchKind;
pub use meter::MeterUnit;
pub use resource::ResourceKind;
pub use table::TableKind;

/// Common error type for token-conversion failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid match kind: {0}")]
    InvalidMatchKind(String),

    #[error("invalid table kind: {0}")]
    InvalidTableKind(String),

    #[error("invalid meter rate unit: {0}")]
    InvalidMeterUnit(String),

    #[error("invalid resource kind: {0}")]
    InvalidResourceKind(String),
}
