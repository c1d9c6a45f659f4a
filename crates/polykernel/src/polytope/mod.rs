//! Convex polytopes held in up to three representations at once.
//!
//! Purpose
//! - One facade over Vrep (extreme points), Hrep (outward half-spaces) and
//!   FLrep (face lattice). Any missing representation is derived on first use
//!   and cached.
//! - Transforms and queries that the Minkowski algorithms and callers need.
//!
//! Why this design
//! - Caches are `OnceLock`s: a polytope is immutable after construction and
//!   stays `Send + Sync`; derivation happens at most once.
//! - Derivation paths: Vrep → FLrep by gift wrapping; Hrep → Vrep by the
//!   geometric H→V walk; FLrep → Hrep by orienting every facet plane against
//!   the inner point of the polytope. Lower-dimensional polytopes get an extra
//!   pair of opposite planes per direction orthogonal to their affine hull.
//! - Transforms pick the richest representation present (lattice, then
//!   vertices, then half-spaces) so no wrap is redone for a shift or rotation.
//!
//! Code cross-refs: `hull::GiftWrapping`, `FaceLattice::map_vertices`,
//! `minkowski`.

mod convert;
pub mod special;

use std::sync::OnceLock;

use rand::Rng;

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::hull::wrap_face_lattice;
use crate::hyperplane::Hyperplane;
use crate::lattice::FaceLattice;
use crate::linalg::{matrix, Matrix, Vector};
use crate::numeric::Field;

pub use convert::{h_to_v_geometric, h_to_v_naive};

/// Convex polytope with lazily derived representations.
///
/// Invariants:
/// - at least one of the three caches is filled;
/// - every cached representation describes the same point set;
/// - all vectors and normals have dimension `space_dim`.
#[derive(Clone, Debug)]
pub struct ConvexPolytope<T: Field> {
    cfg: GeomCfg<T>,
    space_dim: usize,
    vrep: OnceLock<Vec<Vector<T>>>,
    hrep: OnceLock<Vec<Hyperplane<T>>>,
    flrep: OnceLock<FaceLattice<T>>,
}

impl<T: Field> ConvexPolytope<T> {
    fn bare(space_dim: usize, cfg: &GeomCfg<T>) -> Self {
        Self {
            cfg: cfg.clone(),
            space_dim,
            vrep: OnceLock::new(),
            hrep: OnceLock::new(),
            flrep: OnceLock::new(),
        }
    }

    /// conv(swarm); wraps eagerly, so Vrep and FLrep are both available.
    pub fn from_points(swarm: &[Vector<T>], cfg: &GeomCfg<T>) -> GeomResult<Self> {
        let lattice = wrap_face_lattice(swarm, cfg)?;
        Ok(Self::from_face_lattice(lattice))
    }

    /// Polytope whose vertices are exactly `vertices` (not checked). The
    /// lattice is built on first use.
    pub fn from_vrep(vertices: Vec<Vector<T>>, cfg: &GeomCfg<T>) -> GeomResult<Self> {
        let Some(first) = vertices.first() else {
            return Err(GeomError::EmptyInput {
                context: "ConvexPolytope::from_vrep",
            });
        };
        let space_dim = first.dim();
        if let Some(bad) = vertices.iter().find(|v| v.dim() != space_dim) {
            return Err(GeomError::mismatch(space_dim, bad.dim(), "ConvexPolytope::from_vrep"));
        }
        let mut p = Self::bare(space_dim, cfg);
        p.vrep = OnceLock::from(vertices);
        Ok(p)
    }

    /// `{x : n · x <= c for every plane}`; must be bounded and nonempty once
    /// another representation is requested.
    pub fn from_hrep(
        halfspaces: Vec<Hyperplane<T>>,
        space_dim: usize,
        cfg: &GeomCfg<T>,
    ) -> GeomResult<Self> {
        if halfspaces.is_empty() {
            return Err(GeomError::EmptyInput {
                context: "ConvexPolytope::from_hrep",
            });
        }
        if let Some(bad) = halfspaces.iter().find(|h| h.dim() != space_dim) {
            return Err(GeomError::mismatch(space_dim, bad.dim(), "ConvexPolytope::from_hrep"));
        }
        let mut p = Self::bare(space_dim, cfg);
        p.hrep = OnceLock::from(halfspaces);
        Ok(p)
    }

    /// `from_hrep` followed by redundancy removal. The vertices and the
    /// lattice derived on the way stay cached.
    pub fn from_hrep_irredundant(
        halfspaces: Vec<Hyperplane<T>>,
        space_dim: usize,
        cfg: &GeomCfg<T>,
    ) -> GeomResult<Self> {
        let given = Self::from_hrep(halfspaces, space_dim, cfg)?;
        let kept = given.irredundant_hrep()?;
        let Some(lattice) = given.flrep.into_inner() else {
            return Err(GeomError::EmptyInput {
                context: "ConvexPolytope::from_hrep_irredundant",
            });
        };
        let mut p = Self::from_face_lattice(lattice);
        p.hrep = OnceLock::from(kept);
        Ok(p)
    }

    pub fn from_face_lattice(lattice: FaceLattice<T>) -> Self {
        let mut p = Self::bare(lattice.space_dim(), lattice.cfg());
        p.vrep = OnceLock::from(lattice.vertices().to_vec());
        p.flrep = OnceLock::from(lattice);
        p
    }

    pub fn point(p: Vector<T>, cfg: &GeomCfg<T>) -> Self {
        Self::from_face_lattice(FaceLattice::from_point(p, cfg))
    }

    #[inline]
    pub fn cfg(&self) -> &GeomCfg<T> {
        &self.cfg
    }
    #[inline]
    pub fn space_dim(&self) -> usize {
        self.space_dim
    }
    #[inline]
    pub fn has_vrep(&self) -> bool {
        self.vrep.get().is_some()
    }
    #[inline]
    pub fn has_hrep(&self) -> bool {
        self.hrep.get().is_some()
    }
    #[inline]
    pub fn has_flrep(&self) -> bool {
        self.flrep.get().is_some()
    }

    /// Extreme points.
    pub fn vrep(&self) -> GeomResult<&[Vector<T>]> {
        if let Some(v) = self.vrep.get() {
            return Ok(v.as_slice());
        }
        let vs = self.flrep()?.vertices().to_vec();
        Ok(self.vrep.get_or_init(|| vs).as_slice())
    }

    /// Outward half-spaces: facet planes plus equality pairs for a
    /// lower-dimensional polytope.
    pub fn hrep(&self) -> GeomResult<&[Hyperplane<T>]> {
        if let Some(h) = self.hrep.get() {
            return Ok(h.as_slice());
        }
        let hs = hrep_of_lattice(self.flrep()?, &self.cfg)?;
        Ok(self.hrep.get_or_init(|| hs).as_slice())
    }

    pub fn flrep(&self) -> GeomResult<&FaceLattice<T>> {
        if let Some(fl) = self.flrep.get() {
            return Ok(fl);
        }
        let lattice = if let Some(vs) = self.vrep.get() {
            wrap_face_lattice(vs, &self.cfg)?
        } else if let Some(hs) = self.hrep.get() {
            let vs = h_to_v_geometric(hs, self.space_dim, &self.cfg)?;
            if vs.is_empty() {
                return Err(GeomError::degenerate(format!(
                    "half-space system of {} planes is infeasible",
                    hs.len()
                )));
            }
            wrap_face_lattice(&vs, &self.cfg)?
        } else {
            return Err(GeomError::EmptyInput {
                context: "ConvexPolytope without any representation",
            });
        };
        Ok(self.flrep.get_or_init(|| lattice))
    }

    pub fn f_vector(&self) -> GeomResult<&[usize]> {
        Ok(self.flrep()?.f_vector())
    }

    /// Dimension of the affine hull.
    pub fn polytope_dim(&self) -> GeomResult<usize> {
        Ok(self.flrep()?.dim())
    }

    /// A relative-interior point (centroid of the vertices).
    pub fn inner_point(&self) -> GeomResult<&Vector<T>> {
        Ok(self.flrep()?.top().inner_point())
    }

    /// Minimal distance between two distinct vertices.
    pub fn min_vertex_distance(&self) -> GeomResult<T> {
        let vs = self.vrep()?;
        if vs.len() < 2 {
            return Err(GeomError::degenerate(format!(
                "vertex distance needs two vertices, found {}",
                vs.len()
            )));
        }
        let mut best: Option<T> = None;
        for (i, a) in vs.iter().enumerate() {
            for b in &vs[i + 1..] {
                let d = self.cfg.dist(a, b);
                if best.as_ref().map_or(true, |m| d.total_cmp(m).is_lt()) {
                    best = Some(d);
                }
            }
        }
        best.ok_or(GeomError::EmptyInput {
            context: "ConvexPolytope::min_vertex_distance",
        })
    }

    /// The polytope moved so that its inner point is the origin, together
    /// with that inner point (shifting back by it restores `self`).
    pub fn shift_to_origin(&self) -> GeomResult<(Self, Vector<T>)> {
        let inner = self.inner_point()?.clone();
        Ok((self.shift(&-&inner)?, inner))
    }

    /// The half-spaces of `self` that define facets, in their given order.
    ///
    /// A full-dimensional polytope is moved so its inner point is the origin;
    /// every plane `n · x <= c` then has the polar point `n / c`, and a plane
    /// survives iff its polar point is a vertex of the hull of all polar
    /// points (the first of several equal planes wins). Planes touching the
    /// polytope in a lower-dimensional face land inside a face of that hull
    /// and drop out. A lower-dimensional polytope gets the Hrep of its
    /// lattice, which has no redundancy.
    pub fn irredundant_hrep(&self) -> GeomResult<Vec<Hyperplane<T>>> {
        let fl = self.flrep()?;
        let hs = match self.hrep.get() {
            Some(hs) if fl.dim() == self.space_dim => hs,
            _ => return hrep_of_lattice(fl, &self.cfg),
        };
        let inner = fl.top().inner_point();
        let mut polar_points = Vec::with_capacity(hs.len());
        for h in hs {
            let c = -h.eval(inner, &self.cfg);
            if !self.cfg.gt0(&c) {
                return Err(GeomError::degenerate(format!(
                    "plane {h} does not hold the inner point {inner} strictly"
                )));
            }
            polar_points.push(h.normal().div_scalar(&c));
        }
        let polar = wrap_face_lattice(&polar_points, &self.cfg)?;
        let mut taken = vec![false; polar.vertices().len()];
        let mut kept = Vec::new();
        for (h, q) in hs.iter().zip(&polar_points) {
            let hit = polar
                .vertices()
                .iter()
                .position(|v| self.cfg.eq_vec(v, q));
            if let Some(i) = hit {
                if !taken[i] {
                    taken[i] = true;
                    kept.push(h.clone());
                }
            }
        }
        tracing::debug!(given = hs.len(), kept = kept.len(), "hrep redundancy removal");
        Ok(kept)
    }

    /// `self + v`.
    pub fn shift(&self, v: &Vector<T>) -> GeomResult<Self> {
        self.check_dim(v.dim(), "ConvexPolytope::shift")?;
        if let Some(fl) = self.flrep.get() {
            return Ok(Self::from_face_lattice(fl.map_vertices(|p| Ok(p + v))?));
        }
        if let Some(vs) = self.vrep.get() {
            return Self::from_vrep(vs.iter().map(|p| p + v).collect(), &self.cfg);
        }
        let hs = self.hrep()?.iter().map(|h| h.shifted(v, &self.cfg)).collect();
        Self::from_hrep(hs, self.space_dim, &self.cfg)
    }

    /// Image under `x ↦ m · x` for an orthogonal `m`.
    pub fn rotate(&self, m: &Matrix<T>) -> GeomResult<Self> {
        if m.nrows() != self.space_dim || m.ncols() != self.space_dim {
            return Err(GeomError::mismatch(
                self.space_dim,
                m.nrows().max(m.ncols()),
                "ConvexPolytope::rotate",
            ));
        }
        if let Some(fl) = self.flrep.get() {
            return Ok(Self::from_face_lattice(
                fl.map_vertices(|p| matrix::mul_vec(m, p))?,
            ));
        }
        if let Some(vs) = self.vrep.get() {
            let moved = vs
                .iter()
                .map(|p| matrix::mul_vec(m, p))
                .collect::<GeomResult<Vec<_>>>()?;
            return Self::from_vrep(moved, &self.cfg);
        }
        let hs = self
            .hrep()?
            .iter()
            .map(|h| {
                let n = matrix::mul_vec(m, h.normal())?;
                Hyperplane::from_normal_offset(&n, h.offset().clone(), &self.cfg)
            })
            .collect::<GeomResult<Vec<_>>>()?;
        Self::from_hrep(hs, self.space_dim, &self.cfg)
    }

    pub fn rotate_random<R: Rng + ?Sized>(&self, rng: &mut R) -> GeomResult<Self> {
        let m = matrix::random_rotation(self.space_dim, rng, &self.cfg)?;
        self.rotate(&m)
    }

    /// Embed into R^dim, padding every vertex with `pad`.
    pub fn lift_up(&self, dim: usize, pad: &T) -> GeomResult<Self> {
        if dim < self.space_dim {
            return Err(GeomError::mismatch(self.space_dim, dim, "ConvexPolytope::lift_up"));
        }
        if let Some(fl) = self.flrep.get() {
            return Ok(Self::from_face_lattice(
                fl.map_vertices(|p| Ok(p.lift_up(dim, pad)))?,
            ));
        }
        let vs = self.vrep()?.iter().map(|p| p.lift_up(dim, pad)).collect();
        Self::from_vrep(vs, &self.cfg)
    }

    /// Embed into R^dim with zero padding.
    pub fn expand_to(&self, dim: usize) -> GeomResult<Self> {
        self.lift_up(dim, &T::zero())
    }

    /// Whether `p` lies in the closed polytope (within tolerance).
    pub fn contains(&self, p: &Vector<T>) -> GeomResult<bool> {
        self.check_dim(p.dim(), "ConvexPolytope::contains")?;
        Ok(self
            .hrep()?
            .iter()
            .all(|h| self.cfg.le0(&h.eval(p, &self.cfg))))
    }

    /// Polar body `{y : x · y <= 1 for x in self}`; the origin must be an
    /// interior point.
    pub fn polar(&self) -> GeomResult<Self> {
        let hs = self.hrep()?;
        let mut dual = Vec::with_capacity(hs.len());
        for h in hs {
            if !self.cfg.gt0(h.offset()) {
                return Err(GeomError::degenerate(format!(
                    "polar needs the origin in the interior; plane {h} does not separate it"
                )));
            }
            dual.push(h.normal().div_scalar(h.offset()));
        }
        Self::from_points(&dual, &self.cfg)
    }

    /// `self ∩ hp` as a polytope of the same ambient dimension; `None` if the
    /// plane misses the polytope.
    pub fn section_by_hyperplane(&self, hp: &Hyperplane<T>) -> GeomResult<Option<Self>> {
        self.check_dim(hp.dim(), "ConvexPolytope::section_by_hyperplane")?;
        let mut hs = self.hrep()?.to_vec();
        hs.push(hp.clone());
        hs.push(hp.flip());
        let vs = h_to_v_geometric(&hs, self.space_dim, &self.cfg)?;
        if vs.is_empty() {
            return Ok(None);
        }
        Self::from_points(&vs, &self.cfg).map(Some)
    }

    fn check_dim(&self, found: usize, context: &'static str) -> GeomResult<()> {
        if found == self.space_dim {
            Ok(())
        } else {
            Err(GeomError::mismatch(self.space_dim, found, context))
        }
    }
}

/// Same point set, decided on the face lattices. A polytope whose lattice
/// cannot be derived equals nothing.
impl<T: Field> PartialEq for ConvexPolytope<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self.flrep(), other.flrep()) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        }
    }
}

/// Outward Hrep of a lattice: one plane per facet, oriented against the inner
/// point of the top face, then `±u · x = u · o` for every direction `u`
/// orthogonal to the affine hull.
pub(crate) fn hrep_of_lattice<T: Field>(
    fl: &FaceLattice<T>,
    cfg: &GeomCfg<T>,
) -> GeomResult<Vec<Hyperplane<T>>> {
    let top = fl.top();
    let inner = top.inner_point();
    let mut out = Vec::with_capacity(fl.facets().len() + 2 * (fl.space_dim() - fl.dim()));
    for facet in fl.facets() {
        let origin = facet.affine().origin();
        // Inside the top's affine hull, orthogonal to the facet.
        let towards_inner = facet.affine().linear().residual(&(inner - origin), cfg);
        let hp = Hyperplane::from_normal_point(&-towards_inner, origin, cfg)?
            .orient_against(inner, cfg)?;
        out.push(hp);
    }
    let complement = top.affine().linear().orthogonal_complement(cfg);
    for u in complement.vectors() {
        let hp = Hyperplane::from_normal_point(u, top.affine().origin(), cfg)?;
        out.push(hp.flip());
        out.push(hp);
    }
    Ok(out)
}

#[cfg(test)]
mod tests;
