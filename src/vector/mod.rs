//! # Vector3D Module
//!
//! A three-component `f64` vector whose lifecycle is observable. Unlike a
//! plain `Copy` struct, the components live in a heap-allocated block so that
//! copying and moving are distinct operations:
//!
//! - **Copy** ([`Clone::clone`], [`Clone::clone_from`]) deep-copies the three
//!   components into storage owned by the target
//! - **Move** ([`Vector3D::move_from`], [`Vector3D::move_assign`]) hands the
//!   storage block itself to the target and leaves the source *moved-from*
//!
//! ## Storage States
//!
//! Storage is either `Valid` (exactly three components) or `Empty`. A vector
//! becomes `Empty` only as the source of a move and becomes `Valid` again only
//! as the target of a move or copy. Reading or writing the components of an
//! `Empty` vector is a programmer fault: the `try_*` methods return
//! [`LifetimeError::InvalidHandleUse`], everything else panics.
//!
//! A plain Rust move (`let b = a;`) relocates the whole value, tracer and
//! storage included, and is not a lifecycle transition.
//!
//! ## Examples
//!
//! ```rust
//! use lifetrace::trace::Tracer;
//! use lifetrace::vector::Vector3D;
//!
//! let tracer = Tracer::default();
//! let mut source = Vector3D::new_in(&tracer, 7.0, 8.0, 9.0);
//! let moved = Vector3D::move_from(&mut source);
//!
//! assert_eq!(moved.coords(), [7.0, 8.0, 9.0]);
//! assert!(!source.is_valid());
//! assert!(source.try_coords().is_err());
//! ```

use crate::errors::{moved_from, LifetimeError, Result};
use crate::trace::{format_coords, InstanceId, LifecycleEvent, Tracer};
use nalgebra::Vector3;
use std::fmt;
use std::mem;

/// Component selector for [`Vector3D::try_set`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Backing storage of a vector
enum Storage {
    /// Exactly three components on the heap
    Valid(Box<[f64; 3]>),
    /// Moved-from; no components
    Empty,
}

/// Three-dimensional vector with traced construction, copy, move and drop
///
/// Each instance reports its transitions to the [`Tracer`] it was built
/// against and carries an [`InstanceId`] issued by that tracer.
pub struct Vector3D {
    storage: Storage,
    id: InstanceId,
    tracer: Tracer,
}

/// Unwraps a result whose error is a programmer fault
fn fault<T>(result: Result<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => panic!("{}", e),
    }
}

impl Vector3D {
    fn born(tracer: &Tracer, storage: Storage, event: LifecycleEvent) -> Self {
        let id = tracer.issue_id();
        tracer.emit(id, event);
        Vector3D {
            storage,
            id,
            tracer: tracer.clone(),
        }
    }

    /// Creates a vector from components, reporting to a `log`-backed tracer
    ///
    /// Every call builds its own [`Tracer`], so instance ids are not
    /// comparable across vectors created this way. Use [`Vector3D::new_in`]
    /// to share a tracer.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self::new_in(&Tracer::default(), x, y, z)
    }

    /// Creates a vector from components
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lifetrace::trace::Tracer;
    /// use lifetrace::vector::Vector3D;
    ///
    /// let v = Vector3D::new_in(&Tracer::default(), 1.0, 2.0, 3.0);
    /// assert_eq!(v.x(), 1.0);
    /// assert_eq!(v.to_string(), "(1, 2, 3)");
    /// ```
    pub fn new_in(tracer: &Tracer, x: f64, y: f64, z: f64) -> Self {
        Self::born(
            tracer,
            Storage::Valid(Box::new([x, y, z])),
            LifecycleEvent::Constructed { x, y, z },
        )
    }

    /// Creates the zero vector
    pub fn default_in(tracer: &Tracer) -> Self {
        Self::born(
            tracer,
            Storage::Valid(Box::new([0.0; 3])),
            LifecycleEvent::DefaultConstructed,
        )
    }

    /// Creates a vector from an nalgebra `Vector3` (a value construction)
    pub fn from_vector3_in(tracer: &Tracer, vec: Vector3<f64>) -> Self {
        Self::new_in(tracer, vec.x, vec.y, vec.z)
    }

    /// Copy-constructs from `self`, failing if `self` is moved-from
    pub fn try_clone(&self) -> Result<Self> {
        let coords = *self.valid("copy construct")?;
        Ok(Self::born(
            &self.tracer,
            Storage::Valid(Box::new(coords)),
            LifecycleEvent::CopyConstructed,
        ))
    }

    /// Overwrites the components of `self` with those of `source`
    ///
    /// The existing storage block is reused. A moved-from target receives a
    /// fresh block. Fails if `source` is moved-from.
    pub fn try_copy_assign(&mut self, source: &Vector3D) -> Result<()> {
        let coords = *source.valid("copy assign")?;
        match &mut self.storage {
            Storage::Valid(block) => **block = coords,
            Storage::Empty => self.storage = Storage::Valid(Box::new(coords)),
        }
        self.tracer.emit(self.id, LifecycleEvent::CopyAssigned);
        Ok(())
    }

    /// Move-constructs a new vector from the storage of `source`
    ///
    /// `source` is left moved-from. It stays a live instance and is still
    /// destroyed (with no coordinates) when its scope ends. Moving from an
    /// already moved-from source yields a moved-from vector.
    pub fn move_from(source: &mut Vector3D) -> Self {
        let storage = mem::replace(&mut source.storage, Storage::Empty);
        Self::born(&source.tracer, storage, LifecycleEvent::MoveConstructed)
    }

    /// Move-assigns the storage of `source` into `self`
    ///
    /// The previous storage of `self` is released. `source` is left
    /// moved-from.
    pub fn move_assign(&mut self, source: &mut Vector3D) {
        self.storage = mem::replace(&mut source.storage, Storage::Empty);
        self.tracer.emit(self.id, LifecycleEvent::MoveAssigned);
    }

    /// Move-assigns from a temporary
    ///
    /// The emptied temporary is dropped before this returns, so its
    /// destruction is traced right after the assignment.
    pub fn move_assign_owned(&mut self, mut source: Vector3D) {
        self.move_assign(&mut source);
    }

    fn valid(&self, operation: &'static str) -> Result<&[f64; 3]> {
        match &self.storage {
            Storage::Valid(block) => Ok(&**block),
            Storage::Empty => Err(moved_from(self.id, operation)),
        }
    }

    fn valid_mut(&mut self, operation: &'static str) -> Result<&mut [f64; 3]> {
        let id = self.id;
        match &mut self.storage {
            Storage::Valid(block) => Ok(&mut **block),
            Storage::Empty => Err(moved_from(id, operation)),
        }
    }

    /// False once the vector has been moved from
    pub fn is_valid(&self) -> bool {
        matches!(self.storage, Storage::Valid(_))
    }

    pub fn instance_id(&self) -> InstanceId {
        self.id
    }

    pub fn try_coords(&self) -> Result<[f64; 3]> {
        self.valid("read coordinates").copied()
    }

    /// The three components
    ///
    /// # Panics
    ///
    /// Panics if the vector is moved-from.
    pub fn coords(&self) -> [f64; 3] {
        fault(self.try_coords())
    }

    pub fn x(&self) -> f64 {
        fault(self.valid("read x"))[0]
    }

    pub fn y(&self) -> f64 {
        fault(self.valid("read y"))[1]
    }

    pub fn z(&self) -> f64 {
        fault(self.valid("read z"))[2]
    }

    /// Sets one component, failing if the vector is moved-from
    pub fn try_set(&mut self, axis: Axis, value: f64) -> Result<()> {
        self.valid_mut("write coordinate")?[axis.index()] = value;
        Ok(())
    }

    pub fn set_x(&mut self, x: f64) {
        fault(self.valid_mut("write x"))[0] = x;
    }

    pub fn set_y(&mut self, y: f64) {
        fault(self.valid_mut("write y"))[1] = y;
    }

    pub fn set_z(&mut self, z: f64) {
        fault(self.valid_mut("write z"))[2] = z;
    }

    /// Euclidean length, failing if the vector is moved-from
    ///
    /// Computed with `hypot`, so components near `f64::MAX` do not overflow
    /// the intermediate squares.
    pub fn try_length(&self) -> Result<f64> {
        let [x, y, z] = *self.valid("length")?;
        Ok(x.hypot(y).hypot(z))
    }

    /// Euclidean length `sqrt(x² + y² + z²)`
    ///
    /// # Panics
    ///
    /// Panics if the vector is moved-from.
    pub fn length(&self) -> f64 {
        fault(self.try_length())
    }

    /// Scales the components in place to unit length
    ///
    /// Returns the new components. A vector whose length is zero or not
    /// finite (an infinite or NaN component) is left untouched and reported
    /// as [`LifetimeError::DegenerateNormalization`]; no division takes place.
    pub fn try_normalize(&mut self) -> Result<[f64; 3]> {
        let len = self.try_length()?;
        if !len.is_finite() || len == 0.0 {
            return Err(LifetimeError::DegenerateNormalization);
        }
        let block = self.valid_mut("normalize")?;
        for c in block.iter_mut() {
            *c /= len;
        }
        Ok(*block)
    }

    /// Converts to an nalgebra `Vector3`
    ///
    /// # Panics
    ///
    /// Panics if the vector is moved-from.
    pub fn to_vector3(&self) -> Vector3<f64> {
        let [x, y, z] = fault(self.valid("convert to Vector3"));
        Vector3::new(*x, *y, *z)
    }
}

impl Default for Vector3D {
    fn default() -> Self {
        Self::default_in(&Tracer::default())
    }
}

impl Clone for Vector3D {
    /// Copy construction
    ///
    /// # Panics
    ///
    /// Panics if `self` is moved-from.
    fn clone(&self) -> Self {
        fault(self.try_clone())
    }

    /// Copy assignment
    ///
    /// # Panics
    ///
    /// Panics if `source` is moved-from.
    fn clone_from(&mut self, source: &Self) {
        fault(self.try_copy_assign(source))
    }
}

impl Drop for Vector3D {
    fn drop(&mut self) {
        let coords = match &self.storage {
            Storage::Valid(block) => Some(**block),
            Storage::Empty => None,
        };
        self.tracer
            .emit(self.id, LifecycleEvent::Destroyed { coords });
    }
}

impl fmt::Display for Vector3D {
    /// Renders `(x, y, z)`
    ///
    /// # Panics
    ///
    /// Panics if the vector is moved-from.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_coords(fault(self.valid("print"))))
    }
}

impl fmt::Debug for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let coords = match &self.storage {
            Storage::Valid(block) => Some(**block),
            Storage::Empty => None,
        };
        f.debug_struct("Vector3D")
            .field("id", &self.id)
            .field("coords", &coords)
            .finish()
    }
}
