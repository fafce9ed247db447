//! Stats module - correlation matrix, flow aggregation and scatter series

mod correlation;
mod flow;
mod scatter;

pub use correlation::{AttributeCorrelation, CorrelationCalculator, CorrelationMatrix};
pub use flow::{FlowBuilder, FlowEdge, FlowGraph, FlowNode, FlowTiers};
pub use scatter::{ScatterPoint, ScatterSeries};
