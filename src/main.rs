//! pcb-drc: stand-alone checker binary wrapping the `pcb_drc` library.
//!
//! Loads a board snapshot (JSON [`pcb_drc::data::Data`]) from disk, runs the
//! full rule-check catalogue, and prints the resulting messages as JSON.
//! This binary is ambient tooling, not part of the DRC core's contract
//! (SPEC_FULL.md §6.4) — it exists so the crate is runnable and testable
//! end-to-end outside of a host editor.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::AtomicBool;

use clap::Parser;
use tracing::{error, info, info_span, Level};
use tracing_subscriber::EnvFilter;

use pcb_drc::config::{self, CheckerConfig};
use pcb_drc::data::Data;
use pcb_drc::message::Severity;
use pcb_drc::scheduler::NullSink;

/// Design rule checker for board snapshots.
#[derive(Parser, Debug)]
#[command(name = "pcb-drc")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the board snapshot (JSON)
    #[arg(value_name = "SNAPSHOT")]
    input: Option<PathBuf>,

    /// Write the result JSON here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Restrict to the quick-check subset (spec.md §4.4)
    #[arg(long)]
    quick: bool,

    /// Increase logging verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Decrease logging verbosity (only show errors)
    #[arg(short, long)]
    quiet: bool,
}

/// Determines the log level from CLI arguments.
fn get_log_level(verbose: u8, quiet: bool, config_level: &str) -> Level {
    if quiet {
        return Level::ERROR;
    }

    match verbose {
        0 => match config_level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "error" => Level::ERROR,
            _ => Level::WARN,
        },
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialises the tracing subscriber for logging.
fn init_tracing(level: Level) {
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cfg: &CheckerConfig) -> Result<i32, String> {
    let contents = std::fs::read_to_string(&cfg.input)
        .map_err(|e| format!("failed to read snapshot {}: {e}", cfg.input.display()))?;
    let mut data: Data = serde_json::from_str(&contents)
        .map_err(|e| format!("failed to parse snapshot {}: {e}", cfg.input.display()))?;
    data.quick = data.quick || cfg.quick;

    info!(path = %cfg.input.display(), quick = data.quick, "loaded board snapshot");

    let span = info_span!("drc_run", quick = data.quick);
    let _enter = span.enter();

    let scheduler = pcb_drc::checks::build_scheduler();
    let abort = AtomicBool::new(false);
    let result = scheduler.run(&data, &NullSink, &abort);

    info!(messages = result.messages.len(), errors = result.errors.len(), "run finished");

    let json = serde_json::to_string_pretty(&result).map_err(|e| format!("failed to serialize result: {e}"))?;

    match &cfg.output {
        Some(path) => std::fs::write(path, json).map_err(|e| format!("failed to write {}: {e}", path.display()))?,
        None => println!("{json}"),
    }

    let exit = if !result.errors.is_empty() || result.messages.iter().any(|m| m.severity == Severity::Error) {
        1
    } else {
        0
    };
    Ok(exit)
}

fn main() -> ExitCode {
    let args = Args::parse();

    let file_cfg = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let log_level = get_log_level(args.verbose, args.quiet, file_cfg.as_ref().map_or("warn", |c| c.logging.level.as_str()));
    init_tracing(log_level);

    let cfg = match CheckerConfig::merge(file_cfg, args.input, args.output, args.quick) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(version = env!("CARGO_PKG_VERSION"), "starting pcb-drc");

    match run(&cfg) {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::from(1),
        Err(e) => {
            error!(error = %e, "check run failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Args::command().debug_assert();
    }
}
