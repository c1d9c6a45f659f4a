//! Linear-algebra primitives: points/vectors, matrices, linear and affine bases.
//!
//! Purpose
//! - Provide the dimension-generic building blocks for hyperplanes, the hull
//!   engine and the face lattice, over any `Field`.
//!
//! References
//! - Code cross-refs: `GeomCfg::dot` (tolerant dot product used throughout),
//!   `Hyperplane`, `hull::GiftWrapping`.

mod basis;
pub mod matrix;
mod vector;

pub use basis::{AffineBasis, LinearBasis};
pub use matrix::Matrix;
pub use vector::Vector;

#[cfg(test)]
mod tests;
