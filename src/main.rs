//! Student Dashboard - one-shot data export
//!
//! Reads the configured sources and writes the dashboard payload as JSON.

use anyhow::{Context, Result};
use env_logger::Env;
use student_dashboard::{load_and_process, output, DashboardConfig};

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = DashboardConfig::from_env().context("Failed to load configuration")?;
    let data = load_and_process(&config).context("Failed to load student data")?;

    output::write_json(&data, config.output.as_deref()).context("Failed to write output")?;
    Ok(())
}
