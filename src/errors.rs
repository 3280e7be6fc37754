//! Error types for lifetrace
//!
//! Misuse of a moved-from vector is a programmer fault: the fallible `try_*`
//! APIs report it as [`LifetimeError::InvalidHandleUse`], the plain accessors
//! panic with the same message.

use crate::trace::InstanceId;
use thiserror::Error;

/// Main error type for lifetrace operations
#[derive(Error, Debug)]
pub enum LifetimeError {
    /// A coordinate operation was attempted on a moved-from vector
    #[error("{operation} on moved-from Vector3D #{instance}: no coordinates available")]
    InvalidHandleUse {
        /// The instance whose storage is empty
        instance: InstanceId,
        /// The operation that was attempted
        operation: &'static str,
    },

    /// A shared-ownership operation received a null handle
    #[error("null shared handle passed to {0}")]
    NullSharedReference(&'static str),

    /// Normalization was requested on a zero-length vector
    #[error("cannot normalize a zero-length vector")]
    DegenerateNormalization,

    /// A demonstration section number outside 1-6
    #[error("unknown demonstration section '{0}', expected a number from 1 to 6")]
    UnknownSection(String),

    /// Writing the demonstration narration failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for lifetrace operations
pub type Result<T> = std::result::Result<T, LifetimeError>;

/// Build the fault raised when `operation` touches the empty storage of `instance`
pub fn moved_from(instance: InstanceId, operation: &'static str) -> LifetimeError {
    LifetimeError::InvalidHandleUse {
        instance,
        operation,
    }
}
