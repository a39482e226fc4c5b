//! Tornado Dataset Summary
//!
//! Runs the same preparation as the dashboard service and prints what it
//! found, without starting the HTTP server:
//! 1. Ingestion report (rows read, dropped rows by reason)
//! 2. Available years
//! 3. National tornado count per year
//! 4. National count per EF rating
//!
//! Usage:
//!   cargo run --bin summarize_tornadoes
//!   cargo run --bin summarize_tornadoes -- --json   # State/year export table as JSON
//!
//! Environment:
//!   Same as the service (TORNADO_DATA_PATH, TORNADO_DATA_URL, ...)

use anyhow::{Context, Result};
use std::env;
use tornado_dashboard::analysis::groupings;
use tornado_dashboard::config::load_config;
use tornado_dashboard::dashboard::Dashboard;
use tornado_dashboard::logging::init_logging;
use tornado_dashboard::model::ScaleSelection;

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|a| a == "--json");

    let config = load_config().context("Failed to load configuration")?;
    let dashboard = Dashboard::prepare(&config).context("Data preparation failed")?;

    if json {
        let rows = serde_json::to_string_pretty(&dashboard.export_rows())?;
        println!("{}", rows);
        return Ok(());
    }

    println!("🌪  Tornado Dataset Summary");
    println!("==========================\n");

    let report = dashboard.report();
    println!("📄 {}", config.data_path.display());
    println!("   Rows read:            {}", report.rows_read);
    println!("   Malformed rows:       {}", report.malformed_rows);
    println!("   Tornado rows:         {}", report.tornado_rows);
    println!("   Unparseable dates:    {}", report.unparsed_dates);
    println!("   Events kept:          {}", report.events);
    println!("   Unresolved states:    {}", report.unresolved_states);
    println!("   Unrated events:       {}", report.unrated_events);
    println!("   Missing coordinates:  {}\n", report.missing_coordinates);

    if dashboard.years().is_empty() {
        println!("⚠️  No state-resolved tornado events in the dataset");
        return Ok(());
    }

    println!("📅 Tornadoes per year (all states):");
    let national = groupings::national_by_year(&dashboard.counts_for(&ScaleSelection::Unfiltered));
    for (year, count) in &national {
        println!("   {}  {:>6}", year, count);
    }

    println!("\n📊 Tornadoes per rating (all years):");
    for (severity, count) in groupings::totals_by_severity(dashboard.state_year_severity()) {
        println!("   {:<4}  {:>6}", severity.as_str(), count);
    }

    Ok(())
}
