//! Oriented affine hyperplanes `n · x = c` with unit normal.
//!
//! Convention: the closed half-space `n · x <= c` is the inside; outward
//! normals point away from the polytope. `side(p)` is `Less` inside,
//! `Equal` on the plane (within tolerance) and `Greater` outside.

use std::cmp::Ordering;
use std::fmt;

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::linalg::{AffineBasis, Vector};
use crate::numeric::Field;

/// Closed half-space boundary `n · x = c`.
///
/// Invariants:
/// - `|n| = 1` up to rounding;
/// - `side` is a consistent sign function once constructed (flip only via `flip`).
#[derive(Clone, Debug)]
pub struct Hyperplane<T: Field> {
    normal: Vector<T>,
    offset: T,
}

impl<T: Field> Hyperplane<T> {
    /// Plane through `point` with normal direction `normal` (normalized here).
    pub fn from_normal_point(
        normal: &Vector<T>,
        point: &Vector<T>,
        cfg: &GeomCfg<T>,
    ) -> GeomResult<Self> {
        if normal.dim() != point.dim() {
            return Err(GeomError::mismatch(normal.dim(), point.dim(), "Hyperplane::from_normal_point"));
        }
        let normal = cfg.normalize(normal)?;
        let offset = cfg.dot(&normal, point);
        Ok(Self { normal, offset })
    }

    /// `normal · x = offset`, rescaled so the normal has unit length.
    pub fn from_normal_offset(normal: &Vector<T>, offset: T, cfg: &GeomCfg<T>) -> GeomResult<Self> {
        let len = cfg.norm(normal);
        if cfg.eq0(&len) {
            return Err(GeomError::unstable(format!(
                "hyperplane normal {normal} has near-zero length"
            )));
        }
        Ok(Self {
            normal: normal.div_scalar(&len).map(T::snap),
            offset: offset / len,
        })
    }

    /// Plane spanned by a codimension-1 affine basis. The normal direction is
    /// arbitrary; orient it with `orient_outward` or `orient_against`.
    pub fn from_affine_basis(basis: &AffineBasis<T>, cfg: &GeomCfg<T>) -> GeomResult<Self> {
        let d = basis.space_dim();
        if d == 0 || basis.rank() + 1 != d {
            return Err(GeomError::mismatch(
                d.saturating_sub(1),
                basis.rank(),
                "Hyperplane::from_affine_basis (rank)",
            ));
        }
        let normal = basis.linear().find_orthonormal_vector(cfg)?;
        let offset = cfg.dot(&normal, basis.origin());
        Ok(Self { normal, offset })
    }

    #[inline]
    pub fn normal(&self) -> &Vector<T> {
        &self.normal
    }
    #[inline]
    pub fn offset(&self) -> &T {
        &self.offset
    }
    #[inline]
    pub fn dim(&self) -> usize {
        self.normal.dim()
    }

    /// Signed distance `n · p − c`.
    #[inline]
    pub fn eval(&self, p: &Vector<T>, cfg: &GeomCfg<T>) -> T {
        cfg.dot(&self.normal, p) - self.offset.clone()
    }

    #[inline]
    pub fn contains(&self, p: &Vector<T>, cfg: &GeomCfg<T>) -> bool {
        cfg.eq0(&self.eval(p, cfg))
    }

    #[inline]
    pub fn side(&self, p: &Vector<T>, cfg: &GeomCfg<T>) -> Ordering {
        cfg.cmp0(&self.eval(p, cfg))
    }

    /// Whether no two points lie strictly on opposite sides; the second value
    /// is the side of the off-plane points (`Equal` if every point is on it).
    pub fn all_at_one_side<'a>(
        &self,
        swarm: impl IntoIterator<Item = &'a Vector<T>>,
        cfg: &GeomCfg<T>,
    ) -> (bool, Ordering) {
        let mut seen = Ordering::Equal;
        for p in swarm {
            match (self.side(p, cfg), seen) {
                (Ordering::Equal, _) => {}
                (s, Ordering::Equal) => seen = s,
                (s, prev) if s != prev => return (false, Ordering::Equal),
                _ => {}
            }
        }
        (true, seen)
    }

    /// Indices of the points of `swarm` on the plane.
    pub fn filter_in(&self, swarm: &[Vector<T>], cfg: &GeomCfg<T>) -> Vec<usize> {
        (0..swarm.len())
            .filter(|&i| self.contains(&swarm[i], cfg))
            .collect()
    }

    /// Indices of the points of `swarm` off the plane.
    pub fn filter_not_in(&self, swarm: &[Vector<T>], cfg: &GeomCfg<T>) -> Vec<usize> {
        (0..swarm.len())
            .filter(|&i| !self.contains(&swarm[i], cfg))
            .collect()
    }

    /// Opposite orientation, same point set.
    pub fn flip(&self) -> Self {
        Self {
            normal: -&self.normal,
            offset: -self.offset.clone(),
        }
    }

    /// Orient so the first reference point off the plane lies inside.
    ///
    /// All references on the plane leave the orientation undetermined; that is
    /// an error, not a default.
    pub fn orient_outward<'a>(
        self,
        reference: impl IntoIterator<Item = &'a Vector<T>>,
        cfg: &GeomCfg<T>,
    ) -> GeomResult<Self> {
        for p in reference {
            match self.side(p, cfg) {
                Ordering::Equal => continue,
                Ordering::Less => return Ok(self),
                Ordering::Greater => return Ok(self.flip()),
            }
        }
        Err(GeomError::degenerate(format!(
            "cannot orient hyperplane {self}: every reference point lies on it"
        )))
    }

    #[inline]
    pub fn orient_against(self, inner: &Vector<T>, cfg: &GeomCfg<T>) -> GeomResult<Self> {
        self.orient_outward(std::iter::once(inner), cfg)
    }

    /// The plane translated by `v`.
    pub fn shifted(&self, v: &Vector<T>, cfg: &GeomCfg<T>) -> Self {
        Self {
            normal: self.normal.clone(),
            offset: self.offset.clone() + cfg.dot(&self.normal, v),
        }
    }

    /// Same normal, new offset.
    pub fn with_offset(&self, offset: T) -> Self {
        Self {
            normal: self.normal.clone(),
            offset,
        }
    }

    /// Orthogonal projection of `p` onto the plane.
    pub fn project_point(&self, p: &Vector<T>, cfg: &GeomCfg<T>) -> Vector<T> {
        p.add_scaled(&(-self.eval(p, cfg)), &self.normal)
    }

    /// Same oriented plane up to tolerance.
    pub fn approx_eq(&self, other: &Self, cfg: &GeomCfg<T>) -> bool {
        cfg.eq_vec(&self.normal, &other.normal) && cfg.eq(&self.offset, &other.offset)
    }
}

impl<T: Field> fmt::Display for Hyperplane<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[n = {}, c = {}]", self.normal, self.offset)
    }
}
