pub mod error;
pub mod sequence;
pub mod summary;
pub mod threshold;

pub use error::CompareError;
pub use sequence::{
    validate_against_store, validate_against_store_with_plan, validate_sequence,
    validate_sequence_eq, validate_sequence_with_plan,
};
pub use summary::validate_summary;
pub use threshold::is_within_threshold;
