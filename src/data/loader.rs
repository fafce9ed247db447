//! CSV Data Loader Module
//! Reads delimited sources with Polars and coerces every cell into a typed record.

use super::record::{parse_value, Header, Record, Value};
use log::{debug, info};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV {}: {source}", path.display())]
    SourceUnavailable { path: PathBuf, source: PolarsError },
    #[error("CSV {} has no header columns", path.display())]
    MissingHeader { path: PathBuf },
}

/// Handles CSV loading. Cells are read as text and coerced one by one, so a
/// column mixing numbers and words keeps the numeric cells as numbers.
#[derive(Debug, Clone)]
pub struct DataLoader {
    separator: u8,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self { separator: b',' }
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }

    /// Load a single CSV file into records, in file order.
    pub fn load_csv(&self, file_path: impl AsRef<Path>) -> Result<Vec<Record>, LoaderError> {
        let path = file_path.as_ref();
        let unavailable = |source: PolarsError| LoaderError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        };

        // Schema inference off: every column arrives as String. Fields past
        // the header width are dropped rather than failing the source.
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_separator(self.separator)
            .with_infer_schema_length(Some(0))
            .with_truncate_ragged_lines(true)
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(unavailable)?;

        let Some(records) = Self::records_from_dataframe(&df).map_err(unavailable)? else {
            return Err(LoaderError::MissingHeader {
                path: path.to_path_buf(),
            });
        };

        info!("Loaded {} rows from {}", records.len(), path.display());
        Ok(records)
    }

    /// Load both sources concurrently; the first source's rows come first.
    ///
    /// Either source failing fails the whole load.
    pub fn load_sources(
        &self,
        first: impl AsRef<Path> + Send,
        second: impl AsRef<Path> + Send,
    ) -> Result<Vec<Record>, LoaderError> {
        let (first, second) = rayon::join(|| self.load_csv(first), || self.load_csv(second));
        let mut combined = first?;
        let second = second?;

        debug!(
            "Combining {} + {} records",
            combined.len(),
            second.len()
        );
        combined.extend(second);
        Ok(combined)
    }

    /// Convert an all-String DataFrame into records. `None` when there are no columns.
    fn records_from_dataframe(df: &DataFrame) -> PolarsResult<Option<Vec<Record>>> {
        if df.width() == 0 {
            return Ok(None);
        }

        let names: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let header = Arc::new(Header::new(names));

        let columns: Vec<&StringChunked> = df
            .get_columns()
            .iter()
            .map(|col| col.as_materialized_series().str())
            .collect::<PolarsResult<_>>()?;

        let records = (0..df.height())
            .map(|i| {
                let values = columns
                    .iter()
                    .map(|ca| match ca.get(i) {
                        Some(raw) => parse_value(raw),
                        None => Value::Text(String::new()),
                    })
                    .collect();
                Record::new(Arc::clone(&header), values)
            })
            .collect();

        Ok(Some(records))
    }
}
