//! pipemgrd - Pipeline Configuration Manager Daemon
//!
//! pipemgrd loads a compiler-emitted pipeline JSON document through the
//! resolver core and renders per-kind resource listings, the same
//! introspection surface interactive CLIs use for display and
//! auto-completion.
//!
//! Key features:
//! - Validate a pipeline document end to end (parse, cross-link, index)
//! - List tables, action profiles, actions and stateful arrays with
//!   their operator summaries
//! - Restrict the listing to a single resource kind

pub mod show;

pub use show::{render_all, render_section};
