//! Query construction.
//!
//! [`CostQuery`] and [`ForecastQuery`] describe what the caller wants;
//! [`QueryBuilder`] turns them into the parameter objects sent to Cost
//! Explorer. Building is pure: nothing here performs I/O.

mod builder;
mod intent;
mod types;

pub use builder::QueryBuilder;
pub use intent::{CostQuery, ForecastQuery};
pub use types::{
    CostQueryParams, DateInterval, Dimension, DimensionValues, Expression, ForecastMetric,
    ForecastParams, Granularity, GroupDefinition, GroupDefinitionType, Metric, ResourceId, TagKey,
    TagValues,
};
