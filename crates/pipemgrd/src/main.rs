//! pipemgrd - Pipeline Configuration Manager Daemon
//!
//! Entry point for the pipemgrd binary: load a compiler-emitted
//! pipeline JSON document, validate it through the resolver core, and
//! print the per-kind resource listings.

use anyhow::Context;
use clap::Parser;
use p4pipe_config::SharedPipelineConfig;
use p4pipe_mgrd::{render_all, render_section};
use p4pipe_types::ResourceKind;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// P4 pipeline configuration manager
#[derive(Parser, Debug)]
#[command(name = "pipemgrd")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Compiler-emitted pipeline JSON file
    #[arg(short = 'c', long)]
    config_json: PathBuf,

    /// Restrict the listing to one resource kind (table, action_prof,
    /// action, meter_array, counter_array, register_array)
    #[arg(short = 'k', long)]
    kind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long, default_value = "info")]
    log_level: String,
}

/// Initializes tracing/logging subsystem
fn init_logging(level: &str) {
    let level = level.parse().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

fn run(args: &Args) -> anyhow::Result<String> {
    let text = std::fs::read_to_string(&args.config_json)
        .with_context(|| format!("failed to read {}", args.config_json.display()))?;

    let shared = SharedPipelineConfig::new();
    shared.load_json_str(&text).with_context(|| {
        format!(
            "failed to load pipeline configuration from {}",
            args.config_json.display()
        )
    })?;
    let cfg = shared.snapshot()?;

    match &args.kind {
        Some(kind) => {
            let kind: ResourceKind = kind.parse()?;
            Ok(render_section(&cfg, kind))
        }
        None => Ok(render_all(&cfg)),
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("--- Starting pipemgrd ---");

    match run(&args) {
        Ok(listing) => {
            print!("{}", listing);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("pipemgrd failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
