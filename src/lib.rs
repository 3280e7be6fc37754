//! Lifetrace: observable ownership and lifetime of a small 3D vector
//!
//! This crate walks through construction, copying, moving, destruction and
//! unique/shared ownership transfer of a three-component vector, reporting
//! every lifecycle transition to a pluggable observer.

pub mod demo;
pub mod errors;
pub mod ownership;
pub mod trace;
pub mod vector;

// Re-export commonly used types
pub use errors::{LifetimeError, Result};
pub use ownership::{
    make_shared, make_unique, normalize_in_place, transfer_ownership, NormalizeOutcome,
    SharedVector, UniqueVector,
};
pub use trace::{LifecycleEvent, TraceObserver, Tracer};
pub use vector::Vector3D;
