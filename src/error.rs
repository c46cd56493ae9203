use thiserror::Error;

use crate::bit_set::MAX_CAPACITY;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BitSetError {
    #[error("OutOfRange: position {position} is outside [0, {capacity})")]
    OutOfRange { position: i128, capacity: usize },

    #[error("InvalidCapacity: {0} is not an integer in [0, {max}]", max = MAX_CAPACITY)]
    InvalidCapacity(f64),

    #[error("InvalidPosition: {0} is not an integer")]
    InvalidPosition(f64),

    #[error("InvalidMask: {0} is negative")]
    InvalidMask(i128),

    #[error("InvalidCount: {0} is not an integer in [0, {max}]", max = MAX_CAPACITY)]
    InvalidCount(f64),

    #[error("Parse: {0}")]
    Parse(String),
}

impl BitSetError {
    pub(crate) fn out_of_range(position: usize, capacity: usize) -> Self {
        Self::OutOfRange {
            position: position as i128,
            capacity,
        }
    }
}
