//! Configuration and constants for the dashboard pipeline.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an optional JSON config file
pub const CONFIG_ENV_VAR: &str = "STUDENT_DASHBOARD_CONFIG";

pub const DEFAULT_FIRST_SOURCE: &str = "data/student-por.csv";
pub const DEFAULT_SECOND_SOURCE: &str = "data/student-mat.csv";

/// Attributes of the correlation heatmap, in row/column order
pub const DEFAULT_COLUMNS: &[&str] = &[
    "age",
    "Medu",
    "Fedu",
    "traveltime",
    "studytime",
    "failures",
    "famrel",
    "freetime",
    "goout",
    "Dalc",
    "Walc",
    "health",
    "absences",
    "G1",
    "G2",
    "G3",
];

/// Significance threshold for correlation p-values
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

// Tier thresholds for the flow graph. Education and study time are "lower"
// at or below the limit, grades are "lower" strictly below it.
pub const EDUCATION_LOWER_MAX: f64 = 2.0;
pub const STUDYTIME_SHORTER_MAX: f64 = 2.0;
pub const PASSING_GRADE: f64 = 10.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Delimiter must be a single ASCII character, got {0:?}")]
    InvalidDelimiter(char),
}

/// Pipeline settings. Every field has a default, so a config file only
/// needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub first_source: PathBuf,
    pub second_source: PathBuf,
    pub delimiter: char,
    pub columns: Vec<String>,
    pub target_column: String,
    pub scatter_x: String,
    pub scatter_y: String,
    pub scatter_group: String,
    /// Output file; stdout when unset
    pub output: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            first_source: PathBuf::from(DEFAULT_FIRST_SOURCE),
            second_source: PathBuf::from(DEFAULT_SECOND_SOURCE),
            delimiter: ',',
            columns: DEFAULT_COLUMNS.iter().map(|s| s.to_string()).collect(),
            target_column: "G3".to_string(),
            scatter_x: "Dalc".to_string(),
            scatter_y: "G3".to_string(),
            scatter_group: "sex".to_string(),
            output: None,
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.separator()?;
        Ok(config)
    }

    /// Load from the file named by [`CONFIG_ENV_VAR`], or defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    /// Delimiter as the byte the CSV reader expects.
    pub fn separator(&self) -> Result<u8, ConfigError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(ConfigError::InvalidDelimiter(self.delimiter))
        }
    }
}
