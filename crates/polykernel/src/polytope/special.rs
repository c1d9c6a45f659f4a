//! Canonical polytope families used in tests, benchmarks and the CLI.
//!
//! Purpose
//! - Small explicit constructors with known combinatorics:
//!   - cube / box: f-vector entries `2^(d-k) · C(d, k)`;
//!   - simplex: `C(d+1, k+1)` k-faces;
//!   - cross polytope (ℓ1 ball): `2d` vertices, `2^d` facets;
//!   - cyclic polytope `C(n, d)`: neighbourly, every pair of vertices is an
//!     edge for `d >= 4`.
//! - Sphere and ellipsoid approximations from a hyperspherical angle grid.
//!
//! Exact vertex sets go through `ConvexPolytope::from_vrep` (lattice on
//! demand); sets that may contain duplicates or non-extreme points are
//! wrapped eagerly.

use rand::Rng;

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::hyperplane::Hyperplane;
use crate::linalg::{AffineBasis, Vector};
use crate::numeric::Field;
use crate::polytope::ConvexPolytope;

/// All `2^d` corners of the box spanned by `left` and `right`, in binary
/// order of the coordinate choices. Fails once `2^d` does not fit a `usize`.
fn corners<T: Field>(left: &Vector<T>, right: &Vector<T>) -> GeomResult<Vec<Vector<T>>> {
    let d = left.dim();
    let count = u32::try_from(d)
        .ok()
        .and_then(|shift| 1usize.checked_shl(shift))
        .ok_or_else(|| {
            GeomError::degenerate(format!("a box in R^{d} has too many corners to enumerate"))
        })?;
    Ok((0..count)
        .map(|mask| {
            Vector::new(
                (0..d)
                    .map(|i| {
                        if mask >> i & 1 == 1 {
                            right[i].clone()
                        } else {
                            left[i].clone()
                        }
                    })
                    .collect(),
            )
        })
        .collect())
}

/// `[0, 1]^d` by vertices.
pub fn cube01<T: Field>(d: usize, cfg: &GeomCfg<T>) -> GeomResult<ConvexPolytope<T>> {
    let ones = Vector::new(vec![T::one(); d]);
    ConvexPolytope::from_vrep(corners(&Vector::zeros(d), &ones)?, cfg)
}

/// `[0, 1]^d` by its 2d half-spaces.
pub fn cube01_hrep<T: Field>(d: usize, cfg: &GeomCfg<T>) -> GeomResult<ConvexPolytope<T>> {
    let mut hs = Vec::with_capacity(2 * d);
    for i in 0..d {
        let e = Vector::unit(d, i);
        hs.push(Hyperplane::from_normal_offset(&-&e, T::zero(), cfg)?);
        hs.push(Hyperplane::from_normal_offset(&e, T::one(), cfg)?);
    }
    ConvexPolytope::from_hrep(hs, d, cfg)
}

/// Axis-parallel box with opposite corners `left` and `right`. Equal
/// coordinates give a lower-dimensional box.
pub fn rect_parallel<T: Field>(
    left: &Vector<T>,
    right: &Vector<T>,
    cfg: &GeomCfg<T>,
) -> GeomResult<ConvexPolytope<T>> {
    if left.dim() != right.dim() {
        return Err(GeomError::mismatch(left.dim(), right.dim(), "special::rect_parallel"));
    }
    ConvexPolytope::from_points(&corners(left, right)?, cfg)
}

/// Standard simplex: the origin and `e_1, …, e_d`.
pub fn simplex<T: Field>(d: usize, cfg: &GeomCfg<T>) -> GeomResult<ConvexPolytope<T>> {
    let mut vs = Vec::with_capacity(d + 1);
    vs.push(Vector::zeros(d));
    vs.extend((0..d).map(|i| Vector::unit(d, i)));
    ConvexPolytope::from_vrep(vs, cfg)
}

/// Full-dimensional simplex with vertices drawn uniformly from `[0, 10)^d`.
pub fn simplex_random<T: Field, R: Rng + ?Sized>(
    d: usize,
    rng: &mut R,
    cfg: &GeomCfg<T>,
) -> GeomResult<ConvexPolytope<T>> {
    for _ in 0..64 {
        let vs: Vec<Vector<T>> = (0..=d)
            .map(|_| Vector::new((0..d).map(|_| T::from_f64(rng.gen_range(0.0..10.0))).collect()))
            .collect();
        if AffineBasis::from_points(&vs, cfg)?.is_full_dim() {
            return ConvexPolytope::from_vrep(vs, cfg);
        }
    }
    Err(GeomError::unstable(format!(
        "no full-dimensional random simplex in R^{d} after 64 draws"
    )))
}

/// Cyclic polytope: the origin and `n − 1` points `(t, t², …, t^d)` on the
/// moment curve, `t = 1 + step, 1 + 2·step, …`.
pub fn cyclic<T: Field>(
    d: usize,
    n: usize,
    step: &T,
    cfg: &GeomCfg<T>,
) -> GeomResult<ConvexPolytope<T>> {
    if n <= d {
        return Err(GeomError::degenerate(format!(
            "cyclic polytope in R^{d} needs more than {d} points, got {n}"
        )));
    }
    if !cfg.gt0(step) {
        return Err(GeomError::degenerate(format!("cyclic polytope step {step} must be positive")));
    }
    let mut vs = Vec::with_capacity(n);
    vs.push(Vector::zeros(d));
    let mut t = T::one() + step.clone();
    for _ in 1..n {
        let coords = (1..=d).map(|k| t.powi(k as u32)).collect();
        vs.push(Vector::new(coords));
        t = t + step.clone();
    }
    ConvexPolytope::from_vrep(vs, cfg)
}

/// Ellipsoid `center + diag(semi_axes) · S^(d−1)` sampled on a grid of
/// `polar` zenith steps over `[0, π]` and `azimuth` steps over `[0, 2π)`.
pub fn ellipsoid<T: Field>(
    center: &Vector<T>,
    semi_axes: &Vector<T>,
    polar: usize,
    azimuth: usize,
    cfg: &GeomCfg<T>,
) -> GeomResult<ConvexPolytope<T>> {
    let d = center.dim();
    if semi_axes.dim() != d {
        return Err(GeomError::mismatch(d, semi_axes.dim(), "special::ellipsoid"));
    }
    if let Some(bad) = semi_axes.iter().find(|a| !cfg.gt0(a)) {
        return Err(GeomError::degenerate(format!("ellipsoid semi-axis {bad} must be positive")));
    }
    if d == 0 {
        return Err(GeomError::EmptyInput {
            context: "special::ellipsoid in R^0",
        });
    }
    if d == 1 {
        let a = Vector::new(vec![semi_axes[0].clone()]);
        return ConvexPolytope::from_points(&[center - &a, center + &a], cfg);
    }
    if polar < 2 || azimuth < 3 {
        return Err(GeomError::degenerate(format!(
            "sphere grid {polar}x{azimuth} is too coarse"
        )));
    }

    let theta_step = T::pi() / T::from_i64(polar as i64);
    let phi_step = T::two() * T::pi() / T::from_i64(azimuth as i64);
    let thetas: Vec<T> = (0..=polar).map(|i| theta_step.clone() * T::from_i64(i as i64)).collect();

    // Every choice of d − 2 zenith angles.
    let mut zeniths: Vec<Vec<T>> = vec![Vec::new()];
    for _ in 0..d - 2 {
        zeniths = zeniths
            .into_iter()
            .flat_map(|prefix| {
                thetas.iter().map(move |t| {
                    let mut next = prefix.clone();
                    next.push(t.clone());
                    next
                })
            })
            .collect();
    }

    let mut pts = Vec::with_capacity(azimuth * zeniths.len());
    for j in 0..azimuth {
        let phi = phi_step.clone() * T::from_i64(j as i64);
        for angles in &zeniths {
            // x_k = cos θ_k · Π_{i<k} sin θ_i; the last two use φ.
            let mut coords = Vec::with_capacity(d);
            let mut sins = T::one();
            for theta in angles {
                coords.push(sins.clone() * theta.cos());
                sins = sins * theta.sin();
            }
            coords.push(sins.clone() * phi.cos());
            coords.push(sins * phi.sin());
            let p = Vector::new(
                coords
                    .into_iter()
                    .zip(semi_axes.iter())
                    .map(|(x, a)| x * a.clone())
                    .collect(),
            );
            pts.push(center + &p);
        }
    }
    ConvexPolytope::from_points(&pts, cfg)
}

/// Euclidean ball approximation; see `ellipsoid`.
pub fn sphere<T: Field>(
    center: &Vector<T>,
    radius: &T,
    polar: usize,
    azimuth: usize,
    cfg: &GeomCfg<T>,
) -> GeomResult<ConvexPolytope<T>> {
    let axes = Vector::new(vec![radius.clone(); center.dim()]);
    ellipsoid(center, &axes, polar, azimuth, cfg)
}

/// ℓ1 ball (cross polytope): `center ± r · e_i`.
pub fn ball_1<T: Field>(
    center: &Vector<T>,
    r: &T,
    cfg: &GeomCfg<T>,
) -> GeomResult<ConvexPolytope<T>> {
    if !cfg.gt0(r) {
        return Err(GeomError::degenerate(format!("ball radius {r} must be positive")));
    }
    let d = center.dim();
    let mut vs = Vec::with_capacity(2 * d);
    for i in 0..d {
        let e = Vector::unit(d, i).scale(r);
        vs.push(center + &e);
        vs.push(center - &e);
    }
    ConvexPolytope::from_vrep(vs, cfg)
}

/// ℓ∞ ball: the cube `center + [−r, r]^d`.
pub fn ball_oo<T: Field>(
    center: &Vector<T>,
    r: &T,
    cfg: &GeomCfg<T>,
) -> GeomResult<ConvexPolytope<T>> {
    if !cfg.gt0(r) {
        return Err(GeomError::degenerate(format!("ball radius {r} must be positive")));
    }
    let ones = Vector::new(vec![r.clone(); center.dim()]);
    ConvexPolytope::from_vrep(corners(&(center - &ones), &(center + &ones))?, cfg)
}
