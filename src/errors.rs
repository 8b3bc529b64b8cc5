//! Error types for the spawn pool registry

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Resource kind {0} does not implement the pool hooks and can not be pooled")]
    InvalidType(String),

    #[error("A pool already exists for resource kind {0}")]
    AlreadyExists(String),

    #[error("No pool exists for resource kind {0}")]
    NotFound(String),

    #[error("Pool for resource kind {0} is at maximum capacity - resource was destroyed")]
    CapacityExceeded(String),

    #[error("Resource {0} is already idle inside its pool - resource was destroyed")]
    DuplicateMembership(String),

    #[error("Invalid pool configuration: {0}")]
    Config(String),

    #[error("Failed to read pool configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("Operation was cancelled")]
    Cancelled,
}

pub type PoolResult<T> = Result<T, PoolError>;
