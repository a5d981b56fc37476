pub mod aggregator;

pub use aggregator::{AggregateError, PositionAggregator};
