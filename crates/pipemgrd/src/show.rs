//! Listing renderers for loaded pipeline resources.
//!
//! Pure functions from a configuration snapshot to display text, kept
//! free of I/O so they are unit-testable; the binary decides where the
//! text goes.

use p4pipe_config::PipelineConfig;
use p4pipe_types::ResourceKind;
use std::fmt::Write;

/// Section heading for one resource kind.
fn section_title(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Table => "Tables",
        ResourceKind::ActionProf => "Action profiles",
        ResourceKind::Action => "Actions",
        ResourceKind::MeterArray => "Meter arrays",
        ResourceKind::CounterArray => "Counter arrays",
        ResourceKind::RegisterArray => "Register arrays",
    }
}

/// Renders the listing section for one resource kind.
pub fn render_section(cfg: &PipelineConfig, kind: ResourceKind) -> String {
    let resources = cfg.resources(kind);
    let mut out = String::new();
    let _ = writeln!(out, "{} ({}):", section_title(kind), resources.len());
    for resource in resources {
        let _ = writeln!(out, "  {}", resource);
    }
    out
}

/// Renders listings for every resource kind plus the retained custom
/// CRC calculations.
pub fn render_all(cfg: &PipelineConfig) -> String {
    let mut out = String::new();
    for kind in ResourceKind::ALL {
        out.push_str(&render_section(cfg, kind));
        out.push('\n');
    }

    let calcs = cfg.custom_crc_calcs();
    let _ = writeln!(out, "Custom CRC calculations ({}):", calcs.len());
    for (name, width) in calcs {
        let _ = writeln!(out, "  {:30} [{}]", name, width.bits());
    }
    out
}
