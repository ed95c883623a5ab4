//! netbar replay agent
//!
//! Feeds a JSON-lines telemetry script through the network status runtime
//! and prints every notification it produces, one JSON object per line.
//!
//! - `--config` loads a TOML device/display profile
//! - `--events` reads the script from a file (stdin otherwise)
//! - `--dump` prints the diagnostic dump after the script finishes

mod printer;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;

use anyhow::Context;
use clap::Parser;
use netbar_core::presentation::Field;
use netbar_core::{NetworkConfig, NetworkRuntime, TelemetryEvent};
use tracing_subscriber::EnvFilter;

use printer::JsonPrinter;

/// Replay telemetry through the network status engine.
#[derive(Parser, Debug)]
#[command(name = "netbar-agent", about = "Network status engine replay agent")]
struct Cli {
    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-lines telemetry script; `-` or absent reads stdin.
    #[arg(long)]
    events: Option<PathBuf>,

    /// Print the diagnostic dump at the end.
    #[arg(long, default_value_t = false)]
    dump: bool,

    /// Also print the per-pass signal callbacks.
    #[arg(long, default_value_t = false)]
    signals: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => NetworkConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => NetworkConfig::default(),
    };

    tracing::info!(
        config = ?cli.config,
        events = ?cli.events,
        mobile = config.device.mobile_feature_present,
        "netbar-agent starting"
    );

    // ── Output thread ───────────────────────────────────────────
    let (line_tx, line_rx) = crossbeam_channel::unbounded::<String>();
    let output = thread::spawn(move || {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        for line in line_rx {
            if writeln!(out, "{line}").is_err() {
                break;
            }
        }
    });

    // ── Runtime and observers ───────────────────────────────────
    let mut runtime = NetworkRuntime::new(config);
    let printer = Arc::new(JsonPrinter::new(line_tx.clone(), cli.signals));
    runtime.add_cluster_observer(printer.clone());
    runtime.add_field_observer(&Field::ALL, printer.clone());
    runtime.add_signal_callback(printer.clone());
    runtime.add_carrier_observer(printer.clone());
    runtime.add_connection_observer(printer);

    let reader: Box<dyn BufRead> = match &cli.events {
        Some(path) if path.as_os_str() != "-" => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("opening {}", path.display()))?,
        )),
        _ => Box::new(BufReader::new(io::stdin())),
    };
    let posted = replay(&runtime, reader)?;
    tracing::info!(events = posted, "script replayed");

    if cli.dump {
        let text = runtime.dump()?;
        let _ = line_tx.send(text);
    }

    runtime.shutdown();
    drop(runtime);
    drop(line_tx);
    let _ = output.join();

    tracing::info!("netbar-agent stopped");
    Ok(())
}

/// Post every event line; blank lines and `#` comments are skipped and
/// undecodable lines are logged and dropped.
fn replay(runtime: &NetworkRuntime, reader: Box<dyn BufRead>) -> anyhow::Result<usize> {
    let mut posted = 0;
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("reading telemetry script")?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        match serde_json::from_str::<TelemetryEvent>(trimmed) {
            Ok(event) => {
                runtime.post(event)?;
                posted += 1;
            }
            Err(e) => tracing::warn!(line = index + 1, error = %e, "skipping bad event"),
        }
    }
    Ok(posted)
}
