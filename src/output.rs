//! JSON output of the dashboard payload.

use crate::pipeline::DashboardData;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    WriteFailed(#[from] io::Error),
    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Serialize `data` as pretty JSON into any writer.
pub fn write_json_to<W: Write>(data: &DashboardData, writer: W) -> Result<(), OutputError> {
    let mut writer = BufWriter::new(writer);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write to `path`, or stdout when no path is given.
pub fn write_json(data: &DashboardData, path: Option<&Path>) -> Result<(), OutputError> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)?;
            }
            write_json_to(data, File::create(path)?)?;
            info!("Wrote dashboard data to {}", path.display());
        }
        None => write_json_to(data, io::stdout().lock())?,
    }
    Ok(())
}
