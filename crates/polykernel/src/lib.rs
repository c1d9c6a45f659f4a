//! Dimension-generic convex polytopes over a pluggable number field.
//!
//! Layers, bottom-up:
//! - `numeric`: the `Field` trait with `f64`, `DDouble` and `BigRational`.
//! - `cfg`: tolerance-aware comparisons (`GeomCfg`); every predicate in the
//!   crate goes through it.
//! - `linalg`, `hyperplane`: vectors, bases, small dense solves, oriented planes.
//! - `hull`: gift wrapping of a point swarm into a `FaceLattice`.
//! - `polytope`: `ConvexPolytope` with lazily derived V/H/face-lattice
//!   representations, transforms and canonical shapes.
//! - `minkowski`: sum and difference, each with two algorithms.
//!
//! API Policy
//! - Breaking changes are fine when they simplify the kernel; callers live in
//!   this workspace.

pub mod cfg;
pub mod error;
pub mod hull;
pub mod hyperplane;
pub mod lattice;
pub mod linalg;
pub mod minkowski;
pub mod numeric;
pub mod polytope;
mod util;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::GeomCfg;
pub use error::{GeomError, GeomResult};
pub use numeric::Field;
pub use polytope::ConvexPolytope;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::GeomCfg;
    pub use crate::error::{GeomError, GeomResult};
    pub use crate::hull::{wrap_face_lattice, GiftWrapping, InitialPlane};
    pub use crate::hyperplane::Hyperplane;
    pub use crate::lattice::{FLNode, FaceId, FaceLattice};
    pub use crate::linalg::{AffineBasis, LinearBasis, Matrix, Vector};
    pub use crate::minkowski::{minkowski_diff, minkowski_sum, DiffAlgo, SumAlgo};
    pub use crate::numeric::{BigRational, DDouble, Field};
    pub use crate::polytope::{special, ConvexPolytope};
}
