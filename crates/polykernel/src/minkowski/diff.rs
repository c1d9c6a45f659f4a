//! Minkowski (Pontryagin) difference `F ⊖ G = {x : x + G ⊆ F}`.
//!
//! For every outward plane `n · x <= c` of F the difference satisfies
//! `n · x <= c − h_G(n)` with the support value `h_G(n) = max_{g ∈ V(G)} n · g`;
//! the intersection of those half-spaces is exactly `F ⊖ G`. The two variants
//! differ only in how that system is turned into vertices.
//!
//! The result is `None` exactly when the shifted system has no feasible point.
//! A single point or any lower-dimensional set is a valid `Some` result.

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::hyperplane::Hyperplane;
use crate::linalg::Vector;
use crate::numeric::Field;
use crate::polytope::{h_to_v_geometric, h_to_v_naive, hrep_of_lattice, ConvexPolytope};

/// `max_{g} n · g` over the vertices of G.
fn support<T: Field>(vg: &[Vector<T>], n: &Vector<T>, cfg: &GeomCfg<T>) -> Option<T> {
    vg.iter().map(|v| cfg.dot(n, v)).max_by(|a, b| a.total_cmp(b))
}

/// `planes` pushed inwards by the support values of G.
fn shifted_planes<T: Field>(
    planes: &[Hyperplane<T>],
    g: &ConvexPolytope<T>,
    context: &'static str,
) -> GeomResult<Vec<Hyperplane<T>>> {
    let vg = g.vrep()?;
    planes
        .iter()
        .map(|hp| {
            let h = support(vg, hp.normal(), g.cfg()).ok_or(GeomError::EmptyInput { context })?;
            Ok(hp.with_offset(hp.offset().clone() - h))
        })
        .collect()
}

fn check_dims<T: Field>(
    f: &ConvexPolytope<T>,
    g: &ConvexPolytope<T>,
    context: &'static str,
) -> GeomResult<()> {
    if f.space_dim() != g.space_dim() {
        return Err(GeomError::mismatch(f.space_dim(), g.space_dim(), context));
    }
    Ok(())
}

fn finish<T: Field>(
    vertices: Vec<Vector<T>>,
    f: &ConvexPolytope<T>,
    context: &'static str,
) -> GeomResult<Option<ConvexPolytope<T>>> {
    if vertices.is_empty() {
        tracing::debug!(context, "minkowski difference is empty");
        return Ok(None);
    }
    let out = ConvexPolytope::from_points(&vertices, f.cfg())?;
    tracing::debug!(
        context,
        vertices = out.vrep()?.len(),
        dim = out.polytope_dim()?,
        "minkowski difference"
    );
    Ok(Some(out))
}

/// Difference with brute-force vertex enumeration of the shifted system.
pub fn naive<T: Field>(
    f: &ConvexPolytope<T>,
    g: &ConvexPolytope<T>,
) -> GeomResult<Option<ConvexPolytope<T>>> {
    const CONTEXT: &str = "minkowski::diff::naive";
    check_dims(f, g, CONTEXT)?;
    let planes = shifted_planes(f.hrep()?, g, CONTEXT)?;
    let vs = h_to_v_naive(&planes, f.space_dim(), f.cfg())?;
    finish(vs, f, CONTEXT)
}

/// Difference with an edge walk over the shifted system. F's planes are its
/// lattice facets (plus equality pairs), so a redundant input Hrep of F does
/// not reach the walk.
pub fn geometric<T: Field>(
    f: &ConvexPolytope<T>,
    g: &ConvexPolytope<T>,
) -> GeomResult<Option<ConvexPolytope<T>>> {
    const CONTEXT: &str = "minkowski::diff::geometric";
    check_dims(f, g, CONTEXT)?;
    let facets = hrep_of_lattice(f.flrep()?, f.cfg())?;
    let planes = shifted_planes(&facets, g, CONTEXT)?;
    let vs = h_to_v_geometric(&planes, f.space_dim(), f.cfg())?;
    finish(vs, f, CONTEXT)
}
