//! Initial supporting hyperplane for gift wrapping.
//!
//! Two independent strategies; both return an outward-oriented hyperplane
//! that supports the (full-dimensional) swarm and contains at least `d`
//! affinely independent points of it.
//!
//! - `Rotation`: start at the lexicographic minimum with normal `−e₁` and
//!   repeatedly rotate the plane about the span of the points it already
//!   holds until those span rank `d − 1`. Each rotation happens in the 2D
//!   frame spanned by a free in-plane direction `e` and the current normal and
//!   fixes every vector orthogonal to both, so earlier hits stay on the plane.
//!   The basis grows by the hit offset `s − origin` itself, never by its
//!   projection onto the frame.
//! - `Projection`: drop the last coordinate, find a supporting plane of the
//!   projected swarm recursively, lift it to a vertical plane and, if that
//!   plane only touches a ridge, roll it once about the ridge.

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::hyperplane::Hyperplane;
use crate::linalg::{AffineBasis, LinearBasis, Vector};
use crate::numeric::Field;

use super::InitialPlane;

pub(super) fn initial_plane<T: Field>(
    points: &[Vector<T>],
    strategy: InitialPlane,
    cfg: &GeomCfg<T>,
) -> GeomResult<Hyperplane<T>> {
    if points.is_empty() {
        return Err(GeomError::EmptyInput {
            context: "initial supporting plane",
        });
    }
    match strategy {
        InitialPlane::Rotation => by_rotation(points, cfg),
        InitialPlane::Projection => by_projection(points, cfg),
    }
}

/// Outcome of rotating a supporting plane about a fixed subspace.
pub(super) struct Rotated<T: Field> {
    /// Offset `s − origin` of the newly hit point `s`.
    pub hit: Vector<T>,
    /// New normal candidate, orthogonal to `hit`; not yet oriented.
    pub normal: Vector<T>,
}

/// Rotate the supporting plane with outward normal `n` through `origin`
/// about the subspace orthogonal to `e` and `n`, towards the swarm, until it
/// hits the last point. The hit point has minimal cosine between `e` and
/// its projection onto span(e, n).
pub(super) fn rotate_about<T: Field>(
    points: &[Vector<T>],
    origin: &Vector<T>,
    e: &Vector<T>,
    n: &Vector<T>,
    cfg: &GeomCfg<T>,
) -> GeomResult<Rotated<T>> {
    let mut best: Option<(T, T, T, T, Vector<T>)> = None; // (cos, a, b, len, w)
    for s in points {
        let w = s - origin;
        let a = cfg.dot(&w, e);
        let b = cfg.dot(&w, n);
        if cfg.eq0(&a) && cfg.eq0(&b) {
            continue;
        }
        let len = (a.clone() * a.clone() + b.clone() * b.clone()).sqrt();
        let cos = a.clone() / len.clone();
        let better = match &best {
            None => true,
            Some((c, ..)) => cos.total_cmp(c).is_lt(),
        };
        if better {
            best = Some((cos, a, b, len, w));
        }
    }
    let Some((_, a, b, len, hit)) = best else {
        return Err(GeomError::degenerate(format!(
            "no point off the pivot subspace at {origin} while rotating"
        )));
    };
    let normal = e.scale(&(b / len.clone())).add_scaled(&(-(a / len)), n);
    Ok(Rotated { hit, normal })
}

/// Index of the exact lexicographic minimum.
fn lex_min<T: Field>(points: &[Vector<T>]) -> usize {
    (0..points.len())
        .min_by(|&i, &j| points[i].lex_cmp_exact(&points[j]))
        .unwrap_or(0)
}

fn by_rotation<T: Field>(points: &[Vector<T>], cfg: &GeomCfg<T>) -> GeomResult<Hyperplane<T>> {
    let d = points[0].dim();
    let origin = points[lex_min(points)].clone();
    let mut normal = -Vector::unit(d, 0);
    let mut basis = LinearBasis::empty(d);
    while basis.rank() + 1 < d {
        let mut frame = basis.clone();
        frame.add_vector(&normal, cfg);
        let e = frame.find_orthonormal_vector(cfg)?;
        let rot = rotate_about(points, &origin, &e, &normal, cfg)?;
        if !basis.add_vector(&rot.hit, cfg) {
            return Err(GeomError::degenerate(format!(
                "rotation at {origin} did not extend the plane basis (rank {})",
                basis.rank()
            )));
        }
        normal = cfg.normalize(&rot.normal)?;
        // Keep the normal outward for the next frame.
        normal = Hyperplane::from_normal_point(&normal, &origin, cfg)?
            .orient_outward(points, cfg)?
            .normal()
            .clone();
    }
    Hyperplane::from_normal_point(&normal, &origin, cfg)?.orient_outward(points, cfg)
}

fn by_projection<T: Field>(points: &[Vector<T>], cfg: &GeomCfg<T>) -> GeomResult<Hyperplane<T>> {
    let d = points[0].dim();
    if d == 1 {
        let min = points[lex_min(points)].clone();
        return Hyperplane::from_normal_point(&Vector::unit(1, 0), &min, cfg)?
            .orient_outward(points, cfg);
    }
    let projected: Vec<Vector<T>> = points
        .iter()
        .map(|p| Vector::from_slice(&p.as_slice()[..d - 1]))
        .collect();
    let lower = by_projection(&projected, cfg)?;
    let lifted_normal = lower.normal().expand_to(d);
    let vertical = Hyperplane::from_normal_offset(&lifted_normal, lower.offset().clone(), cfg)?;

    let on_plane = vertical.filter_in(points, cfg);
    let touched = AffineBasis::from_points(on_plane.iter().map(|&i| &points[i]), cfg)?;
    if touched.rank() + 1 == d {
        return vertical.orient_outward(points, cfg);
    }
    if touched.rank() + 2 != d {
        return Err(GeomError::degenerate(format!(
            "lifted plane {vertical} touches a {}-dimensional set in R^{d}",
            touched.rank()
        )));
    }
    // Roll about the touched ridge.
    let mut frame = touched.linear().clone();
    frame.add_vector(vertical.normal(), cfg);
    let e = frame.find_orthonormal_vector(cfg)?;
    let rot = rotate_about(points, touched.origin(), &e, vertical.normal(), cfg)?;
    Hyperplane::from_normal_point(&rot.normal, touched.origin(), cfg)?.orient_outward(points, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn swarm() -> Vec<Vector<f64>> {
        [
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
            [0.3, 0.3, 0.3],
            [0.5, 0.2, 0.9],
        ]
        .iter()
        .map(|c| Vector::from_f64s(c))
        .collect()
    }

    fn assert_supporting_facet(hp: &Hyperplane<f64>, points: &[Vector<f64>], cfg: &GeomCfg<f64>) {
        let (ok, side) = hp.all_at_one_side(points, cfg);
        assert!(ok);
        assert_eq!(side, std::cmp::Ordering::Less);
        let on: Vec<&Vector<f64>> = hp.filter_in(points, cfg).iter().map(|&i| &points[i]).collect();
        let basis = AffineBasis::from_points(on, cfg).unwrap();
        assert_eq!(basis.rank() + 1, points[0].dim());
    }

    #[test]
    fn both_strategies_find_supporting_facets() {
        let cfg = GeomCfg::<f64>::default();
        let pts = swarm();
        for s in [InitialPlane::Rotation, InitialPlane::Projection] {
            let hp = initial_plane(&pts, s, &cfg).unwrap();
            assert_supporting_facet(&hp, &pts, &cfg);
        }
    }

    #[test]
    fn strategies_handle_tilted_simplex_in_four_dimensions() {
        let cfg = GeomCfg::<f64>::default();
        let pts: Vec<Vector<f64>> = [
            [0.1, 0.2, 0.0, 0.5],
            [2.0, 0.1, 0.3, 0.2],
            [0.4, 1.7, 0.2, 0.1],
            [0.3, 0.5, 1.9, 0.4],
            [0.2, 0.3, 0.4, 2.2],
            [0.5, 0.5, 0.5, 0.5],
        ]
        .iter()
        .map(|c| Vector::from_f64s(c))
        .collect();
        for s in [InitialPlane::Rotation, InitialPlane::Projection] {
            let hp = initial_plane(&pts, s, &cfg).unwrap();
            assert_supporting_facet(&hp, &pts, &cfg);
        }
    }

    #[test]
    fn rotation_keeps_earlier_hits_on_random_swarms() {
        use rand::{rngs::StdRng, Rng, SeedableRng};
        let cfg = GeomCfg::<f64>::default();
        for seed in 0..60 {
            let mut rng = StdRng::seed_from_u64(seed);
            for d in 3..=5 {
                let pts: Vec<Vector<f64>> = (0..3 * d)
                    .map(|_| Vector::new((0..d).map(|_| rng.gen_range(-1.0..1.0)).collect()))
                    .collect();
                for s in [InitialPlane::Rotation, InitialPlane::Projection] {
                    let hp = initial_plane(&pts, s, &cfg).unwrap();
                    assert_supporting_facet(&hp, &pts, &cfg);
                }
            }
        }
    }

    #[test]
    fn one_dimensional_projection_base() {
        let cfg = GeomCfg::<f64>::default();
        let pts: Vec<Vector<f64>> = [[3.0], [1.0], [2.0]].iter().map(|c| Vector::from_f64s(c)).collect();
        let hp = initial_plane(&pts, InitialPlane::Projection, &cfg).unwrap();
        assert!(hp.contains(&pts[1], &cfg));
        assert_eq!(hp.side(&pts[0], &cfg), std::cmp::Ordering::Less);
    }
}
