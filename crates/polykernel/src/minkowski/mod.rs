//! Polytope algebra: Minkowski sum and difference.
//!
//! Purpose
//! - `sum`: `F ⊕ G` by hull of vertex sums or by merging face lattices.
//! - `diff`: `F ⊖ G` by shifting F's half-spaces with G's support values and
//!   enumerating the vertices naively or by an edge walk.
//!
//! Why this design
//! - Each operation has two independent algorithms; tests require identical
//!   lattices from both, which catches tolerance slips in either one.
//! - An empty difference is a value (`Ok(None)`), not an error.
//!
//! Code cross-refs: `ConvexPolytope::hrep`, `polytope::h_to_v_naive`,
//! `polytope::h_to_v_geometric`, `FaceLattice::from_sub_relations`.

pub mod diff;
pub mod sum;

use crate::error::GeomResult;
use crate::numeric::Field;
use crate::polytope::ConvexPolytope;

/// Algorithm for `F ⊕ G`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SumAlgo {
    ByConvexHull,
    #[default]
    BySandipDas,
}

/// Algorithm for `F ⊖ G`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiffAlgo {
    Naive,
    #[default]
    Geometric,
}

pub fn minkowski_sum<T: Field>(
    f: &ConvexPolytope<T>,
    g: &ConvexPolytope<T>,
    algo: SumAlgo,
) -> GeomResult<ConvexPolytope<T>> {
    match algo {
        SumAlgo::ByConvexHull => sum::by_convex_hull(f, g),
        SumAlgo::BySandipDas => sum::by_sandip_das(f, g),
    }
}

/// `Ok(None)` when no point `x` satisfies `x + G ⊆ F`.
pub fn minkowski_diff<T: Field>(
    f: &ConvexPolytope<T>,
    g: &ConvexPolytope<T>,
    algo: DiffAlgo,
) -> GeomResult<Option<ConvexPolytope<T>>> {
    match algo {
        DiffAlgo::Naive => diff::naive(f, g),
        DiffAlgo::Geometric => diff::geometric(f, g),
    }
}
