//! Flow Module
//! Buckets records into qualitative tiers and aggregates factor -> outcome
//! counts into a node/link graph for a Sankey diagram.

use crate::config::{EDUCATION_LOWER_MAX, PASSING_GRADE, STUDYTIME_SHORTER_MAX};
use crate::data::Record;
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// Tier labels derived from one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowTiers {
    pub school: String,
    pub mother_education: &'static str,
    pub father_education: &'static str,
    pub studytime: &'static str,
    pub grade: &'static str,
}

impl FlowTiers {
    /// Classify a record. Missing or non-numeric fields read as 0 and land
    /// in the lower tier.
    pub fn classify(record: &Record) -> Self {
        let mother_education = if record.number_or_zero("Medu") <= EDUCATION_LOWER_MAX {
            "Lower Mother's Education"
        } else {
            "Higher Mother's Education"
        };
        let father_education = if record.number_or_zero("Fedu") <= EDUCATION_LOWER_MAX {
            "Lower Father's Education"
        } else {
            "Higher Father's Education"
        };
        let studytime = if record.number_or_zero("studytime") <= STUDYTIME_SHORTER_MAX {
            "Shorter Studytime"
        } else {
            "Longer Studytime"
        };
        let grade = if record.number_or_zero("G3") < PASSING_GRADE {
            "Lower Grade"
        } else {
            "Higher Grade"
        };

        Self {
            school: format!("School: {}", record.text("school")),
            mother_education,
            father_education,
            studytime,
            grade,
        }
    }

    /// Factor labels in traversal order.
    pub fn factors(&self) -> [&str; 4] {
        [
            self.school.as_str(),
            self.mother_education,
            self.father_education,
            self.studytime,
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowNode {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowEdge {
    pub source: usize,
    pub target: usize,
    pub value: u64,
}

/// Sankey input: index-aligned nodes and links referencing them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FlowGraph {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowEdge>,
}

impl FlowGraph {
    pub fn from_records(records: &[Record]) -> Self {
        let mut builder = FlowBuilder::new();
        for record in records {
            builder.add_record(record);
        }
        builder.build()
    }

    pub fn node_index(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    /// Total weight of links ending at `target`.
    pub fn inflow(&self, target: usize) -> u64 {
        self.links
            .iter()
            .filter(|l| l.target == target)
            .map(|l| l.value)
            .sum()
    }

    pub fn link(&self, source: &str, target: &str) -> Option<&FlowEdge> {
        let s = self.node_index(source)?;
        let t = self.node_index(target)?;
        self.links.iter().find(|l| l.source == s && l.target == t)
    }
}

/// Incremental aggregation. Nodes get indices on first encounter and links
/// are merged by `(source, target)`.
#[derive(Debug, Default)]
pub struct FlowBuilder {
    nodes: Vec<String>,
    node_index: HashMap<String, usize>,
    link_order: Vec<(usize, usize)>,
    weights: HashMap<(usize, usize), u64>,
}

impl FlowBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn intern(&mut self, label: &str) -> usize {
        if let Some(&i) = self.node_index.get(label) {
            return i;
        }
        let i = self.nodes.len();
        self.nodes.push(label.to_string());
        self.node_index.insert(label.to_string(), i);
        i
    }

    pub fn add_record(&mut self, record: &Record) {
        let tiers = FlowTiers::classify(record);

        let factors: Vec<usize> = tiers.factors().iter().map(|f| self.intern(f)).collect();
        let grade = self.intern(tiers.grade);

        for factor in factors {
            let key = (factor, grade);
            match self.weights.get_mut(&key) {
                Some(weight) => *weight += 1,
                None => {
                    self.weights.insert(key, 1);
                    self.link_order.push(key);
                }
            }
        }
    }

    pub fn build(self) -> FlowGraph {
        let node_count = self.nodes.len();
        let links: Vec<FlowEdge> = self
            .link_order
            .iter()
            .filter(|(s, t)| *s < node_count && *t < node_count)
            .filter_map(|key| {
                self.weights.get(key).map(|&value| FlowEdge {
                    source: key.0,
                    target: key.1,
                    value,
                })
            })
            .collect();

        debug!("Flow graph: {} nodes, {} links", node_count, links.len());

        FlowGraph {
            nodes: self
                .nodes
                .into_iter()
                .map(|name| FlowNode { name })
                .collect(),
            links,
        }
    }
}
