//! Error types for pipeline-configuration loading and queries.
//!
//! Two distinct taxonomies: [`ConfigError`] covers everything that can
//! abort an ingestion attempt (malformed input, inconsistent references),
//! [`QueryError`] covers the recoverable failures a caller of the query
//! facade must be able to tell apart ("name not found" vs. "nothing
//! loaded yet").

use p4pipe_types::{ParseError, ResourceKind};
use thiserror::Error;

/// Result type alias for ingestion operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for query operations.
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that abort an ingestion attempt.
///
/// A failed ingest never publishes a partially-built configuration;
/// callers keep whatever configuration was previously loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not valid JSON, or a mandated key is missing.
    #[error("invalid pipeline JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A document token falls outside one of the closed enumerations.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A table lists an action that was never declared.
    #[error("table '{table}' references unknown action '{action}'")]
    UnknownAction {
        /// The referencing table.
        table: String,
        /// The undeclared action name.
        action: String,
    },

    /// A table references an action profile that was never declared.
    #[error("table '{table}' references unknown action profile '{profile}'")]
    UnknownActionProfile {
        /// The referencing table.
        table: String,
        /// The undeclared profile name.
        profile: String,
    },

    /// A key target names a header instance absent from the document.
    #[error("unknown header instance '{header}'")]
    UnknownHeader {
        /// The missing header instance name.
        header: String,
    },

    /// A key target names a field its header type does not declare.
    #[error("header type '{header_type}' has no field '{field}'")]
    UnknownField {
        /// The header type that was searched.
        header_type: String,
        /// The missing field name.
        field: String,
    },

    /// A key target has the wrong shape.
    #[error("table '{table}' has a malformed key target: {message}")]
    KeyTarget {
        /// The table declaring the key.
        table: String,
        /// What was wrong with the target.
        message: String,
    },

    /// A direct meter or counter array declares no binding table.
    #[error("direct {kind} '{name}' declares no binding table")]
    MissingBinding {
        /// The array's resource kind.
        kind: ResourceKind,
        /// The array name.
        name: String,
    },

    /// An indirect meter or counter array declares no size.
    #[error("indirect {kind} '{name}' declares no size")]
    MissingSize {
        /// The array's resource kind.
        kind: ResourceKind,
        /// The array name.
        name: String,
    },
}

impl ConfigError {
    /// Creates an unknown-action error.
    pub fn unknown_action(table: impl Into<String>, action: impl Into<String>) -> Self {
        Self::UnknownAction {
            table: table.into(),
            action: action.into(),
        }
    }

    /// Creates an unknown-action-profile error.
    pub fn unknown_action_profile(table: impl Into<String>, profile: impl Into<String>) -> Self {
        Self::UnknownActionProfile {
            table: table.into(),
            profile: profile.into(),
        }
    }

    /// Creates an unknown-header error.
    pub fn unknown_header(header: impl Into<String>) -> Self {
        Self::UnknownHeader {
            header: header.into(),
        }
    }

    /// Creates an unknown-field error.
    pub fn unknown_field(header_type: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            header_type: header_type.into(),
            field: field.into(),
        }
    }

    /// Creates a malformed-key-target error.
    pub fn key_target(table: impl Into<String>, message: impl Into<String>) -> Self {
        Self::KeyTarget {
            table: table.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by the query facade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// No resource of the kind matches the queried name or suffix.
    /// Either it never existed, or the suffix was ambiguous and dropped
    /// from the index.
    #[error("{kind} '{name}' not found in the loaded pipeline")]
    NotFound {
        /// The queried resource kind.
        kind: ResourceKind,
        /// The queried name or suffix.
        name: String,
    },

    /// No pipeline configuration has been loaded yet.
    #[error("no pipeline configuration loaded")]
    NotLoaded,
}

impl QueryError {
    /// Creates a not-found error for a kind/name query.
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            name: name.into(),
        }
    }
}
