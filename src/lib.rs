//! Student Dashboard - data pipeline for a student performance dashboard
//!
//! Loads two CSV sources, computes a Pearson correlation matrix, Sankey flow
//! data and scatter series, and hands them to a renderer as plain data.

pub mod config;
pub mod data;
pub mod output;
pub mod pipeline;
pub mod stats;

pub use config::DashboardConfig;
pub use pipeline::{load_and_process, DashboardData, PipelineError};
