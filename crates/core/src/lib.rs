pub mod entity;
pub mod threshold;

pub use entity::AuditedEntity;
pub use threshold::{AggregationStrategy, ThresholdKind, ThresholdPolicy};
