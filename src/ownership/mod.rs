//! Unique and shared ownership of [`Vector3D`] values
//!
//! [`UniqueVector`] is a nullable exclusive handle: passing it by value to
//! [`transfer_ownership`] makes the caller's binding unusable at compile time,
//! and [`UniqueVector::take`] shows the same transfer as a runtime null left
//! behind. [`SharedVector`] is a reference-counted handle; the vector is
//! destroyed exactly once, when the last holder goes away.

use crate::errors::{LifetimeError, Result};
use crate::trace::{format_coords, Tracer};
use crate::vector::Vector3D;
use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

/// Exclusive, possibly empty, owning handle to a heap-allocated vector
#[derive(Debug, Default)]
pub struct UniqueVector(Option<Box<Vector3D>>);

impl UniqueVector {
    /// Moves `vector` onto the heap behind a new handle
    pub fn new(vector: Vector3D) -> Self {
        UniqueVector(Some(Box::new(vector)))
    }

    /// A handle that owns nothing
    pub fn null() -> Self {
        UniqueVector(None)
    }

    pub fn is_null(&self) -> bool {
        self.0.is_none()
    }

    pub fn get(&self) -> Option<&Vector3D> {
        self.0.as_deref()
    }

    pub fn get_mut(&mut self) -> Option<&mut Vector3D> {
        self.0.as_deref_mut()
    }

    /// Moves ownership out, leaving this handle null
    pub fn take(&mut self) -> UniqueVector {
        UniqueVector(self.0.take())
    }

    pub fn into_inner(self) -> Option<Box<Vector3D>> {
        self.0
    }
}

/// Allocates a vector and returns sole ownership of it
pub fn make_unique(tracer: &Tracer, x: f64, y: f64, z: f64) -> UniqueVector {
    UniqueVector::new(Vector3D::new_in(tracer, x, y, z))
}

/// Takes ownership of `handle`, doubles the x component of the pointee and
/// hands ownership back
///
/// A null handle passes through unchanged.
///
/// # Examples
///
/// ```rust
/// use lifetrace::ownership::{make_unique, transfer_ownership};
/// use lifetrace::trace::Tracer;
///
/// let owner = make_unique(&Tracer::default(), 13.0, 14.0, 15.0);
/// let new_owner = transfer_ownership(owner);
/// assert_eq!(new_owner.get().unwrap().coords(), [26.0, 14.0, 15.0]);
/// ```
pub fn transfer_ownership(mut handle: UniqueVector) -> UniqueVector {
    match handle.get_mut() {
        Some(vector) => {
            let x = vector.x();
            vector.set_x(x * 2.0);
            log::debug!("ownership of #{} transferred", vector.instance_id());
        }
        None => log::debug!("null handle passed through transfer_ownership"),
    }
    handle
}

/// Reference-counted handle to a vector
///
/// Cloning adds a holder; dropping removes one.
#[derive(Debug, Clone)]
pub struct SharedVector(Rc<RefCell<Vector3D>>);

impl SharedVector {
    pub fn new(vector: Vector3D) -> Self {
        SharedVector(Rc::new(RefCell::new(vector)))
    }

    /// Number of live holders of the vector
    pub fn use_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub fn borrow(&self) -> Ref<'_, Vector3D> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Vector3D> {
        self.0.borrow_mut()
    }

    /// True if both handles share the same vector
    pub fn ptr_eq(&self, other: &SharedVector) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

/// Allocates a vector owned by a single shared holder
pub fn make_shared(tracer: &Tracer, x: f64, y: f64, z: f64) -> SharedVector {
    SharedVector::new(Vector3D::new_in(tracer, x, y, z))
}

/// What [`normalize_in_place`] did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NormalizeOutcome {
    /// Scaled to unit length; holds the new components
    Normalized([f64; 3]),
    /// Zero or non-finite length, left unchanged
    Degenerate,
    /// No vector behind the handle
    NullHandle,
}

impl NormalizeOutcome {
    /// Console message describing the outcome
    pub fn diagnostic(&self) -> String {
        match self {
            NormalizeOutcome::Normalized(c) => format!("Normalized vector: {}", format_coords(c)),
            NormalizeOutcome::Degenerate => {
                "Zero-length or non-finite vector left unchanged".to_string()
            }
            NormalizeOutcome::NullHandle => "Null handle passed to normalize_in_place".to_string(),
        }
    }

    pub fn into_result(self) -> Result<[f64; 3]> {
        match self {
            NormalizeOutcome::Normalized(c) => Ok(c),
            NormalizeOutcome::Degenerate => Err(LifetimeError::DegenerateNormalization),
            NormalizeOutcome::NullHandle => {
                Err(LifetimeError::NullSharedReference("normalize_in_place"))
            }
        }
    }
}

/// Scales the shared vector to unit length
///
/// The handle is taken by value, so the vector has one extra holder for the
/// duration of the call. A null handle and a vector of zero or non-finite
/// length are both reported and otherwise ignored.
///
/// # Panics
///
/// Panics if the shared vector is moved-from, or if it is already borrowed.
pub fn normalize_in_place(handle: Option<SharedVector>) -> NormalizeOutcome {
    let Some(shared) = handle else {
        log::warn!("null handle passed to normalize_in_place");
        return NormalizeOutcome::NullHandle;
    };

    let mut vector = shared.borrow_mut();
    match vector.try_normalize() {
        Ok(coords) => NormalizeOutcome::Normalized(coords),
        Err(LifetimeError::DegenerateNormalization) => {
            log::info!(
                "#{} has zero or non-finite length, normalization skipped",
                vector.instance_id()
            );
            NormalizeOutcome::Degenerate
        }
        Err(e) => panic!("{}", e),
    }
}
