//! H→V conversions: vertex enumeration of `{x : n_i · x <= c_i}`.
//!
//! Both return the tolerance-distinct vertices (empty if the system is
//! infeasible) and accept lower-dimensional feasible sets, e.g. systems that
//! contain both `n · x <= c` and `−n · x <= −c`.
//!
//! - `h_to_v_naive`: every d-subset of planes is intersected; feasible
//!   intersection points are vertices. O(C(m, d) · d³).
//! - `h_to_v_geometric`: one vertex by the naive search, then a breadth-first
//!   walk over the edge graph. Edge directions at a vertex are the lines cut
//!   out by d − 1 independent active planes, kept when every other active plane
//!   agrees on the side.

use std::collections::VecDeque;

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::hyperplane::Hyperplane;
use crate::linalg::{matrix, LinearBasis, Vector};
use crate::numeric::Field;
use crate::util::{combinations, dedup_indices};

fn check_dims<T: Field>(hps: &[Hyperplane<T>], space_dim: usize) -> GeomResult<()> {
    if space_dim == 0 {
        return Err(GeomError::EmptyInput {
            context: "H→V in zero-dimensional space",
        });
    }
    match hps.iter().find(|hp| hp.dim() != space_dim) {
        Some(bad) => Err(GeomError::mismatch(space_dim, bad.dim(), "H→V conversion")),
        None => Ok(()),
    }
}

fn feasible<T: Field>(hps: &[Hyperplane<T>], p: &Vector<T>, cfg: &GeomCfg<T>) -> bool {
    hps.iter().all(|hp| cfg.le0(&hp.eval(p, cfg)))
}

/// Intersection point of the planes `subset`, if they meet in a single point.
fn intersect<T: Field>(
    hps: &[Hyperplane<T>],
    subset: &[usize],
    cfg: &GeomCfg<T>,
) -> GeomResult<Option<Vector<T>>> {
    let rows: Vec<Vector<T>> = subset.iter().map(|&i| hps[i].normal().clone()).collect();
    let rhs: Vec<T> = subset.iter().map(|&i| hps[i].offset().clone()).collect();
    Ok(matrix::solve(&matrix::from_rows(&rows)?, &rhs, cfg))
}

fn dedup<T: Field>(points: Vec<Vector<T>>, cfg: &GeomCfg<T>) -> Vec<Vector<T>> {
    let keep = dedup_indices(&points, cfg);
    keep.into_iter().map(|i| points[i].clone()).collect()
}

/// Brute-force vertex enumeration over all d-subsets of planes.
pub fn h_to_v_naive<T: Field>(
    hps: &[Hyperplane<T>],
    space_dim: usize,
    cfg: &GeomCfg<T>,
) -> GeomResult<Vec<Vector<T>>> {
    check_dims(hps, space_dim)?;
    let idxs: Vec<usize> = (0..hps.len()).collect();
    let mut out = Vec::new();
    for comb in combinations(&idxs, space_dim) {
        if let Some(x) = intersect(hps, &comb, cfg)? {
            if feasible(hps, &x, cfg) {
                out.push(x);
            }
        }
    }
    Ok(dedup(out, cfg))
}

/// First feasible d-subset intersection, if any.
fn initial_vertex<T: Field>(
    hps: &[Hyperplane<T>],
    space_dim: usize,
    cfg: &GeomCfg<T>,
) -> GeomResult<Option<Vector<T>>> {
    let idxs: Vec<usize> = (0..hps.len()).collect();
    for comb in combinations(&idxs, space_dim) {
        if let Some(x) = intersect(hps, &comb, cfg)? {
            if feasible(hps, &x, cfg) {
                return Ok(Some(x));
            }
        }
    }
    Ok(None)
}

/// Feasible edge directions leaving the vertex whose active planes are `active`.
fn edge_directions<T: Field>(
    hps: &[Hyperplane<T>],
    active: &[usize],
    space_dim: usize,
    cfg: &GeomCfg<T>,
) -> GeomResult<Vec<Vector<T>>> {
    let mut lines: Vec<Vector<T>> = Vec::new();
    if space_dim == 1 {
        lines.push(Vector::unit(1, 0));
    } else {
        for comb in combinations(active, space_dim - 1) {
            let basis =
                LinearBasis::from_vectors(space_dim, comb.iter().map(|&i| hps[i].normal()), cfg)?;
            if basis.rank() + 1 == space_dim {
                lines.push(basis.find_orthonormal_vector(cfg)?);
            }
        }
    }

    let mut out = Vec::new();
    for v in lines {
        let (mut pos, mut neg) = (false, false);
        for &i in active {
            match cfg.cmp0(&cfg.dot(&v, hps[i].normal())) {
                std::cmp::Ordering::Greater => pos = true,
                std::cmp::Ordering::Less => neg = true,
                std::cmp::Ordering::Equal => {}
            }
        }
        match (pos, neg) {
            (true, true) => {}
            (true, false) => out.push(-v),
            (false, true) => out.push(v),
            (false, false) => {
                out.push(-&v);
                out.push(v);
            }
        }
    }
    Ok(out)
}

/// Vertex enumeration by walking the edge graph from one vertex.
///
/// An unbounded edge means the system does not describe a polytope and is a
/// `DegenerateConfiguration` error.
pub fn h_to_v_geometric<T: Field>(
    hps: &[Hyperplane<T>],
    space_dim: usize,
    cfg: &GeomCfg<T>,
) -> GeomResult<Vec<Vector<T>>> {
    check_dims(hps, space_dim)?;
    let Some(first) = initial_vertex(hps, space_dim, cfg)? else {
        return Ok(Vec::new());
    };
    let mut found: Vec<Vector<T>> = vec![first.clone()];
    let mut queue: VecDeque<Vector<T>> = VecDeque::from([first]);
    while let Some(z) = queue.pop_front() {
        let active: Vec<usize> = (0..hps.len()).filter(|&i| hps[i].contains(&z, cfg)).collect();
        for v in edge_directions(hps, &active, space_dim, cfg)? {
            let mut t_min: Option<T> = None;
            for hp in hps {
                let den = cfg.dot(hp.normal(), &v);
                if !cfg.gt0(&den) {
                    continue;
                }
                let t = -hp.eval(&z, cfg) / den;
                if !cfg.gt0(&t) {
                    continue;
                }
                if t_min.as_ref().map_or(true, |m| t.total_cmp(m).is_lt()) {
                    t_min = Some(t);
                }
            }
            let Some(t) = t_min else {
                return Err(GeomError::degenerate(format!(
                    "half-space system is unbounded along {v} from {z}"
                )));
            };
            let next = z.add_scaled(&t, &v);
            if found.iter().any(|p| cfg.eq_vec(p, &next)) {
                continue;
            }
            tracing::trace!(from = %z, to = %next, "edge");
            found.push(next.clone());
            queue.push_back(next);
        }
    }
    Ok(dedup(found, cfg))
}
