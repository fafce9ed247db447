//! Scatter Module
//! Point series for a two-attribute scatter plot, grouped by a categorical field.

use crate::data::Record;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub group: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub x_key: String,
    pub y_key: String,
    pub group_key: String,
    pub points: Vec<ScatterPoint>,
}

impl ScatterSeries {
    /// One point per record where both axes are numeric, in record order.
    pub fn extract(records: &[Record], x_key: &str, y_key: &str, group_key: &str) -> Self {
        let points = records
            .iter()
            .filter_map(|r| {
                Some(ScatterPoint {
                    x: r.number(x_key)?,
                    y: r.number(y_key)?,
                    group: r.text(group_key),
                })
            })
            .collect();

        Self {
            x_key: x_key.to_string(),
            y_key: y_key.to_string(),
            group_key: group_key.to_string(),
            points,
        }
    }

    /// Points of one group, or all points for `None`.
    pub fn filter_group(&self, group: Option<&str>) -> Vec<&ScatterPoint> {
        self.points
            .iter()
            .filter(|p| group.map_or(true, |g| p.group == g))
            .collect()
    }

    pub fn groups(&self) -> Vec<String> {
        self.points
            .iter()
            .map(|p| p.group.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Largest x value, or 0 for an empty series.
    pub fn x_max(&self) -> f64 {
        Self::max_or_zero(self.points.iter().map(|p| p.x))
    }

    pub fn y_max(&self) -> f64 {
        Self::max_or_zero(self.points.iter().map(|p| p.y))
    }

    fn max_or_zero(values: impl Iterator<Item = f64>) -> f64 {
        let max = values.fold(f64::NEG_INFINITY, f64::max);
        if max == f64::NEG_INFINITY {
            0.0
        } else {
            max
        }
    }
}
