//! Market data aggregate: ticks, depth snapshots and the candle aggregator.

pub mod entities;
pub mod services;
pub mod value_objects;

pub use entities::*;
pub use services::{TickAggregator, aggregate_ticks};
pub use value_objects::*;
