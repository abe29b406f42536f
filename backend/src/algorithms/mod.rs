//! Pure shot chart algorithms: coordinate binning and cell aggregation.

pub mod aggregation;
pub mod binning;

pub use aggregation::{aggregate, aggregate_with_summary, Aggregation, AggregationSummary};
pub use binning::{bin, GridSize};
