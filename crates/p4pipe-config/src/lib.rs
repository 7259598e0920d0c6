//! Pipeline-configuration resolver for compiler-emitted P4 pipeline
//! JSON.
//!
//! This crate turns the JSON document a pipeline compiler emits into a
//! validated, cross-referenced in-memory resource model, and resolves
//! user-supplied short names against it:
//!
//! - [`PipelineConfig`]: the resource registry built by one ingestion:
//!   tables, action profiles, actions, meter/counter/register arrays and
//!   custom CRC calculations, cross-linked and owned in one place
//! - [`SuffixIndex`]: (kind, dotted-name-suffix) resolution with
//!   ambiguous suffixes excluded outright
//! - [`SharedPipelineConfig`]: copy-on-build / atomic-swap handle so
//!   reloads never expose a partially-built registry to readers
//! - [`ConfigError`] / [`QueryError`]: fatal ingest errors vs.
//!   recoverable query failures
//!
//! # Example
//!
//! ```
//! use p4pipe_config::PipelineConfig;
//!
//! let doc = r#"{
//!     "actions": [{"name": "ingress.drop", "id": 0, "runtime_data": []}]
//! }"#;
//! let cfg = PipelineConfig::from_json_str(doc).unwrap();
//! let action = cfg.action("drop").unwrap();
//! assert_eq!(action.name, "ingress.drop");
//! ```

mod config;
mod error;
mod handle;
mod headers;
mod ingest;
mod model;
mod schema;
mod suffix;

pub use config::{PipelineConfig, ResourceRef};
pub use error::{ConfigError, ConfigResult, QueryError, QueryResult};
pub use handle::SharedPipelineConfig;
pub use model::{
    Action, ActionParam, ActionProfile, ArrayBacking, CounterArray, CrcWidth, KeyField,
    MeterArray, RegisterArray, Table,
};
pub use suffix::SuffixIndex;
