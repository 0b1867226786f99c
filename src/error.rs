//! Engine error types.
//!
//! Only invalid-argument conditions surface as errors. Unknown subjects,
//! empty matrices, and zero-magnitude vectors are valid "no recommendation"
//! outcomes and are recovered internally with empty results.

/// Engine-level errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid interaction strength {strength} for ({user_id}, {item_id}): must be finite and within [0, 1]")]
    InvalidStrength {
        user_id: String,
        item_id: String,
        strength: f64,
    },

    #[error("invalid weight {name} = {value}: must be finite and non-negative")]
    InvalidWeight { name: &'static str, value: f64 },

    #[error("invalid count {name} = {value}: must be positive")]
    InvalidCount { name: &'static str, value: usize },

    #[error("invalid capacity {capacity} for venue {venue_id}: must be positive")]
    InvalidCapacity { venue_id: String, capacity: u32 },
}

pub type Result<T> = std::result::Result<T, EngineError>;
