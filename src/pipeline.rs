//! Pipeline Module
//! Load both sources, then derive everything the dashboard renders.

use crate::config::{ConfigError, DashboardConfig};
use crate::data::{DataLoader, LoaderError, Record};
use crate::stats::{
    AttributeCorrelation, CorrelationCalculator, CorrelationMatrix, FlowGraph, ScatterSeries,
};
use log::{info, warn};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoaderError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    #[serde(flatten)]
    pub correlation: CorrelationMatrix,
    pub p_values: Vec<Vec<f64>>,
    pub grade_correlations: Vec<AttributeCorrelation>,
    #[serde(rename = "combinedData")]
    pub records: Vec<Record>,
    #[serde(rename = "sankeyData")]
    pub flow: FlowGraph,
    pub scatter: ScatterSeries,
}

impl DashboardData {
    /// Compute all derived structures from already loaded records.
    pub fn from_records(records: Vec<Record>, config: &DashboardConfig) -> Self {
        if records.is_empty() {
            warn!("Both sources are empty");
        }

        let correlation = CorrelationCalculator::correlation_matrix(&records, &config.columns);
        let p_values = CorrelationCalculator::significance_matrix(&correlation, records.len());
        let grade_correlations = correlation.ranked_against(&config.target_column, &p_values);
        let flow = FlowGraph::from_records(&records);
        let scatter = ScatterSeries::extract(
            &records,
            &config.scatter_x,
            &config.scatter_y,
            &config.scatter_group,
        );

        Self {
            correlation,
            p_values,
            grade_correlations,
            records,
            flow,
            scatter,
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.correlation.labels
    }

    pub fn matrix(&self) -> &[Vec<f64>] {
        &self.correlation.values
    }
}

/// Read both configured sources and compute the dashboard payload.
///
/// A source that cannot be read fails the whole run; nothing partial is returned.
pub fn load_and_process(config: &DashboardConfig) -> Result<DashboardData, PipelineError> {
    let loader = DataLoader::new().with_separator(config.separator()?);
    let records = loader.load_sources(&config.first_source, &config.second_source)?;

    let data = DashboardData::from_records(records, config);
    info!(
        "Processed {} records: {}x{} matrix, {} flow nodes, {} scatter points",
        data.records.len(),
        data.correlation.size(),
        data.correlation.size(),
        data.flow.nodes.len(),
        data.scatter.points.len()
    );
    Ok(data)
}
