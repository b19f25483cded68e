//! Domain services module

pub mod bulk;
pub mod priority;

pub use bulk::{BulkAction, BulkOperator, BulkOutcome, DeleteOutcome, MergeOutcome};
pub use priority::PriorityCalculator;
