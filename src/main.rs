//! US Tornado Dashboard - service entry point
//!
//! Startup sequence:
//! 1. Load configuration (dashboard.toml, .env, environment)
//! 2. Download the weather-events CSV if it is not on disk
//! 3. Ingest tornado events in batches and build the aggregate tables
//! 4. Serve the dashboard page and its JSON views
//!
//! Any failure in steps 1–3, or failing to bind the port, exits with
//! status 1.
//!
//! Usage:
//!   cargo run --release                 # Serve on $PORT (default 8050)
//!   cargo run --release -- --port 9000  # Override the port
//!
//! Environment:
//!   PORT, TORNADO_DATA_PATH, TORNADO_DATA_URL, TORNADO_BATCH_SIZE,
//!   TORNADO_WORKERS, TORNADO_CONFIG, RUST_LOG

use anyhow::{Context, Result, anyhow, bail};
use std::env;
use std::sync::Arc;
use tornado_dashboard::config::load_config;
use tornado_dashboard::dashboard::Dashboard;
use tornado_dashboard::endpoint;
use tornado_dashboard::logging::init_logging;
use tracing::error;

fn main() {
    init_logging();

    println!("🌪  US Tornado Dashboard");
    println!("=======================\n");

    if let Err(e) = run() {
        error!("{:#}", e);
        eprintln!("\n❌ {:#}\n", e);
        std::process::exit(1);
    }
}

/// Parses `--port N`; anything else is a usage error.
fn parse_port_override(args: &[String]) -> Result<Option<u16>> {
    let mut port = None;
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" => {
                let value = args
                    .get(i + 1)
                    .ok_or_else(|| anyhow!("--port requires a port number"))?;
                port = Some(value.parse().with_context(|| format!("invalid port '{}'", value))?);
                i += 2;
            }
            other => bail!("Unknown argument: {}\nUsage: {} [--port PORT]", other, args[0]),
        }
    }
    Ok(port)
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let port_override = parse_port_override(&args)?;

    let mut config = load_config().context("Failed to load configuration")?;
    if let Some(port) = port_override {
        config.port = port;
    }

    println!("📥 Preparing tornado data from {}...", config.data_path.display());
    let dashboard = Dashboard::prepare(&config).context("Data preparation failed")?;

    let report = dashboard.report();
    println!("✓ {} tornado events loaded ({} rows read)", report.events, report.rows_read);
    if let (Some(first), Some(last)) = (dashboard.years().first(), dashboard.years().last()) {
        println!("   Years available: {}–{}", first, last);
    }
    println!(
        "   Dropped: {} unparseable dates; excluded from state views: {}; unrated: {}\n",
        report.unparsed_dates, report.unresolved_states, report.unrated_events
    );

    println!("🚀 Dashboard on http://0.0.0.0:{}", config.port);
    println!("   GET /                - Dashboard page");
    println!("   GET /tornado-data    - State/year table as JSON");
    println!("   GET /views/...       - map, choropleth, trend, severity, controls");
    println!("   Press Ctrl+C to stop\n");

    endpoint::start_endpoint_server(config.port, Arc::new(dashboard), config.worker_threads)
        .map_err(|e| anyhow!(e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_no_arguments_keeps_configured_port() {
        assert_eq!(parse_port_override(&args(&["tornado_dashboard"])).unwrap(), None);
    }

    #[test]
    fn test_port_flag() {
        let parsed = parse_port_override(&args(&["tornado_dashboard", "--port", "9000"])).unwrap();
        assert_eq!(parsed, Some(9000));
    }

    #[test]
    fn test_bad_arguments_are_errors() {
        assert!(parse_port_override(&args(&["tornado_dashboard", "--port"])).is_err());
        assert!(parse_port_override(&args(&["tornado_dashboard", "--port", "x"])).is_err());
        assert!(parse_port_override(&args(&["tornado_dashboard", "--verbose"])).is_err());
    }
}
