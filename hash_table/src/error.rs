use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("table capacity must be at least 1, got {0}")]
    InvalidCapacity(usize),
    #[error("can not allocate {capacity} slots")]
    Allocation {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}
