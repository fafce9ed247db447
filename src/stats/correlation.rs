//! Correlation Module
//! Pearson correlation matrix over numeric record attributes, with t-test p-values.

use crate::config::SIGNIFICANCE_THRESHOLD;
use crate::data::Record;
use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Square correlation matrix with its row/column labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    #[serde(rename = "matrix")]
    pub values: Vec<Vec<f64>>,
}

/// Correlation of one attribute with a target attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributeCorrelation {
    pub attribute: String,
    pub correlation: f64,
    pub p_value: f64,
    pub is_significant: bool,
}

impl CorrelationMatrix {
    pub fn size(&self) -> usize {
        self.labels.len()
    }

    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        let i = self.labels.iter().position(|l| l == row)?;
        let j = self.labels.iter().position(|l| l == col)?;
        Some(self.values[i][j])
    }

    /// A zero diagonal entry marks an attribute with no variance.
    pub fn is_constant(&self, index: usize) -> bool {
        self.values[index][index] == 0.0
    }

    /// Every other attribute's correlation with `target`, strongest first.
    ///
    /// `p_values` must be aligned with this matrix, as returned by
    /// [`CorrelationCalculator::significance_matrix`]. Empty when `target` is
    /// not one of the labels.
    pub fn ranked_against(&self, target: &str, p_values: &[Vec<f64>]) -> Vec<AttributeCorrelation> {
        let Some(t) = self.labels.iter().position(|l| l == target) else {
            return Vec::new();
        };

        let mut ranked: Vec<AttributeCorrelation> = self
            .labels
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != t)
            .map(|(i, label)| {
                let p_value = p_values[i][t];
                AttributeCorrelation {
                    attribute: label.clone(),
                    correlation: self.values[i][t],
                    p_value,
                    is_significant: p_value <= SIGNIFICANCE_THRESHOLD,
                }
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.correlation
                .abs()
                .partial_cmp(&a.correlation.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }
}

/// Handles correlation calculations with multi-threading support.
pub struct CorrelationCalculator;

impl CorrelationCalculator {
    /// Numeric column view; absent or text cells read as 0.
    pub fn column_values(records: &[Record], column: &str) -> Vec<f64> {
        records.iter().map(|r| r.number_or_zero(column)).collect()
    }

    /// Pearson correlation of two equally long series.
    ///
    /// Zero variance on either side yields 0 rather than NaN, and so does an
    /// empty series.
    pub fn pearson_values(xs: &[f64], ys: &[f64]) -> f64 {
        let n = xs.len().min(ys.len());
        if n == 0 {
            return 0.0;
        }

        let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
        let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

        let mut numerator = 0.0;
        let mut denom_x = 0.0;
        let mut denom_y = 0.0;
        for (x, y) in xs[..n].iter().zip(&ys[..n]) {
            let dx = x - mean_x;
            let dy = y - mean_y;
            numerator += dx * dy;
            denom_x += dx * dx;
            denom_y += dy * dy;
        }

        if denom_x == 0.0 || denom_y == 0.0 {
            0.0
        } else {
            numerator / (denom_x * denom_y).sqrt()
        }
    }

    /// Pearson correlation between two record attributes.
    pub fn pearson(records: &[Record], x: &str, y: &str) -> f64 {
        let xs = Self::column_values(records, x);
        let ys = Self::column_values(records, y);
        Self::pearson_values(&xs, &ys)
    }

    /// Symmetric correlation matrix over `columns`, in the given order.
    ///
    /// The upper triangle (diagonal included) is computed in parallel and
    /// mirrored into the lower triangle.
    pub fn correlation_matrix(records: &[Record], columns: &[String]) -> CorrelationMatrix {
        let size = columns.len();
        if records.is_empty() {
            warn!("No records; correlation matrix is all zeros");
        }

        let series: Vec<Vec<f64>> = columns
            .iter()
            .map(|column| {
                if !records.is_empty() && records.iter().all(|r| r.number(column).is_none()) {
                    warn!("Column '{}' has no numeric values", column);
                }
                Self::column_values(records, column)
            })
            .collect();

        let pairs: Vec<(usize, usize)> = (0..size)
            .flat_map(|i| (i..size).map(move |j| (i, j)))
            .collect();

        let upper: Vec<(usize, usize, f64)> = pairs
            .par_iter()
            .map(|&(i, j)| (i, j, Self::pearson_values(&series[i], &series[j])))
            .collect();

        let mut values = vec![vec![0.0; size]; size];
        for (i, j, r) in upper {
            values[i][j] = r;
            values[j][i] = r;
        }

        debug!(
            "Computed {}x{} correlation matrix over {} records",
            size,
            size,
            records.len()
        );

        CorrelationMatrix {
            labels: columns.to_vec(),
            values,
        }
    }

    /// Two-tailed p-value for a correlation coefficient over `n` samples.
    ///
    /// Uses t = r * sqrt((n - 2) / (1 - r^2)) with n - 2 degrees of freedom.
    pub fn p_value(r: f64, n: usize) -> f64 {
        if n < 3 || r.is_nan() {
            return f64::NAN;
        }
        if r.abs() >= 1.0 {
            return 0.0;
        }

        let df = (n - 2) as f64;
        let t = r * (df / (1.0 - r * r)).sqrt();

        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
            Err(_) => f64::NAN,
        }
    }

    /// p-values aligned with `matrix`; NaN wherever a constant attribute is involved.
    pub fn significance_matrix(matrix: &CorrelationMatrix, n: usize) -> Vec<Vec<f64>> {
        let size = matrix.size();
        (0..size)
            .map(|i| {
                (0..size)
                    .map(|j| {
                        if matrix.is_constant(i) || matrix.is_constant(j) {
                            f64::NAN
                        } else {
                            Self::p_value(matrix.values[i][j], n)
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Value;

    const EPS: f64 = 1e-12;

    fn record(pairs: &[(&str, f64)]) -> Record {
        Record::from_pairs(pairs.iter().map(|(k, v)| (*k, Value::Number(*v))))
    }

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_perfect_positive_and_negative() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert!((CorrelationCalculator::pearson_values(&xs, &up) - 1.0).abs() < EPS);
        assert!((CorrelationCalculator::pearson_values(&xs, &down) + 1.0).abs() < EPS);
    }

    #[test]
    fn test_known_value() {
        // r = 0.8 for this classic textbook series
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let ys = [2.0, 1.0, 4.0, 3.0, 5.0];
        let r = CorrelationCalculator::pearson_values(&xs, &ys);
        assert!((r - 0.8).abs() < EPS, "r = {}", r);
    }

    #[test]
    fn test_zero_variance_is_zero() {
        let xs = [3.0, 3.0, 3.0];
        let ys = [1.0, 2.0, 3.0];
        assert_eq!(CorrelationCalculator::pearson_values(&xs, &ys), 0.0);
        assert_eq!(CorrelationCalculator::pearson_values(&xs, &xs), 0.0);
        assert_eq!(CorrelationCalculator::pearson_values(&[], &[]), 0.0);
    }

    #[test]
    fn test_missing_and_text_read_as_zero() {
        let records = vec![
            record(&[("a", 1.0), ("b", 1.0)]),
            Record::from_pairs([("a", Value::Number(2.0)), ("b", Value::Text("x".into()))]),
            record(&[("a", 3.0)]),
        ];
        // b is effectively [1, 0, 0]
        let expected = CorrelationCalculator::pearson_values(&[1.0, 2.0, 3.0], &[1.0, 0.0, 0.0]);
        assert_eq!(CorrelationCalculator::pearson(&records, "a", "b"), expected);
    }

    #[test]
    fn test_matrix_symmetric_bounded_unit_diagonal() {
        let records: Vec<Record> = (0..20)
            .map(|i| {
                let i = i as f64;
                record(&[("a", i), ("b", (i * 7.0) % 5.0), ("c", 20.0 - i * 0.5)])
            })
            .collect();
        let m = CorrelationCalculator::correlation_matrix(&records, &columns(&["a", "b", "c"]));

        assert_eq!(m.size(), 3);
        for i in 0..3 {
            assert!((m.values[i][i] - 1.0).abs() < EPS);
            for j in 0..3 {
                assert_eq!(m.values[i][j], m.values[j][i]);
                assert!(m.values[i][j].abs() <= 1.0 + EPS);
            }
        }
        assert!((m.get("a", "c").unwrap() + 1.0).abs() < EPS);
    }

    #[test]
    fn test_constant_column_row_is_zero() {
        let records: Vec<Record> = (0..5)
            .map(|i| record(&[("a", i as f64), ("k", 4.0)]))
            .collect();
        let m = CorrelationCalculator::correlation_matrix(&records, &columns(&["a", "k"]));

        assert_eq!(m.values[1], vec![0.0, 0.0]);
        assert_eq!(m.values[0][1], 0.0);
        assert!(m.is_constant(1));
        assert!(!m.is_constant(0));
    }

    #[test]
    fn test_empty_records_all_zero() {
        let m = CorrelationCalculator::correlation_matrix(&[], &columns(&["a", "b"]));
        assert_eq!(m.values, vec![vec![0.0, 0.0], vec![0.0, 0.0]]);
    }

    #[test]
    fn test_p_value() {
        assert!(CorrelationCalculator::p_value(0.5, 2).is_nan());
        assert_eq!(CorrelationCalculator::p_value(1.0, 10), 0.0);
        assert!((CorrelationCalculator::p_value(0.0, 10) - 1.0).abs() < 1e-9);

        // r = 0.8, n = 5: t = 2.3094, df = 3, p ~= 0.1041
        let p = CorrelationCalculator::p_value(0.8, 5);
        assert!((p - 0.1041).abs() < 1e-3, "p = {}", p);
    }

    #[test]
    fn test_ranked_against_target() {
        let records: Vec<Record> = (0..30)
            .map(|i| {
                let i = i as f64;
                record(&[
                    ("weak", (i * 13.0) % 7.0),
                    ("strong", i * 2.0 + 1.0),
                    ("neg", -i),
                    ("target", i),
                ])
            })
            .collect();
        let m = CorrelationCalculator::correlation_matrix(
            &records,
            &columns(&["weak", "strong", "neg", "target"]),
        );

        let p_values = CorrelationCalculator::significance_matrix(&m, records.len());
        let ranked = m.ranked_against("target", &p_values);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[2].attribute, "weak");
        assert!(ranked[0].is_significant);
        assert!(ranked[0].correlation.abs() >= ranked[2].correlation.abs());
        let weak = ranked.iter().find(|c| c.attribute == "weak").unwrap();
        assert_eq!(weak.p_value, p_values[0][3]);
        assert!(m.ranked_against("missing", &p_values).is_empty());
    }

    #[test]
    fn test_significance_matrix_nan_for_constant() {
        let records: Vec<Record> = (0..6)
            .map(|i| record(&[("a", i as f64), ("k", 1.0)]))
            .collect();
        let m = CorrelationCalculator::correlation_matrix(&records, &columns(&["a", "k"]));
        let p = CorrelationCalculator::significance_matrix(&m, records.len());

        assert_eq!(p[0][0], 0.0);
        assert!(p[0][1].is_nan());
        assert!(p[1][1].is_nan());
    }
}
