//! Linear and affine subspaces with orthonormal bases.
//!
//! Purpose
//! - `LinearBasis`: incremental Gram–Schmidt insertion, local coordinates,
//!   orthogonal complements.
//! - `AffineBasis`: origin + `LinearBasis`; maps ambient points to plane-local
//!   coordinates for the lower-dimensional sub-problems of the hull engine.
//!
//! Why this design
//! - Orthonormal storage makes projection a sequence of dot products and keeps
//!   local coordinates isometric to ambient ones, so one tolerance serves both.
//! - Insertion re-orthogonalizes once ("twice is enough"), which keeps bases
//!   orthonormal to working precision without pivoting.
//! - Stored vectors go through `GeomCfg::normalize`, which snaps them; over
//!   exact rationals a basis is orthonormal up to `2^-96`, not exactly.

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::linalg::Vector;
use crate::numeric::Field;

/// Orthonormal basis of a linear subspace of R^d.
///
/// Invariants:
/// - every stored vector has unit norm and they are pairwise orthogonal
///   (up to rounding, or the snap grid of the exact backend);
/// - `rank() <= space_dim()`.
#[derive(Clone, Debug)]
pub struct LinearBasis<T: Field> {
    space_dim: usize,
    vecs: Vec<Vector<T>>,
}

impl<T: Field> LinearBasis<T> {
    pub fn empty(space_dim: usize) -> Self {
        Self {
            space_dim,
            vecs: Vec::new(),
        }
    }

    /// The standard basis of R^d.
    pub fn full(space_dim: usize) -> Self {
        Self {
            space_dim,
            vecs: (0..space_dim).map(|i| Vector::unit(space_dim, i)).collect(),
        }
    }

    /// Basis of the span of `vs`; dependent vectors are skipped.
    pub fn from_vectors<'a>(
        space_dim: usize,
        vs: impl IntoIterator<Item = &'a Vector<T>>,
        cfg: &GeomCfg<T>,
    ) -> GeomResult<Self> {
        let mut basis = Self::empty(space_dim);
        for v in vs {
            if v.dim() != space_dim {
                return Err(GeomError::mismatch(space_dim, v.dim(), "LinearBasis::from_vectors"));
            }
            basis.add_vector(v, cfg);
        }
        Ok(basis)
    }

    #[inline]
    pub fn space_dim(&self) -> usize {
        self.space_dim
    }
    #[inline]
    pub fn rank(&self) -> usize {
        self.vecs.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vecs.is_empty()
    }
    #[inline]
    pub fn is_full_dim(&self) -> bool {
        self.vecs.len() == self.space_dim
    }
    #[inline]
    pub fn vectors(&self) -> &[Vector<T>] {
        &self.vecs
    }

    /// Component of `v` orthogonal to the span (two Gram–Schmidt sweeps).
    pub fn residual(&self, v: &Vector<T>, cfg: &GeomCfg<T>) -> Vector<T> {
        let mut w = v.clone();
        for _ in 0..2 {
            for b in &self.vecs {
                let c = cfg.dot(&w, b);
                if cfg.ne0(&c) {
                    w = w.add_scaled(&(-c), b);
                }
            }
        }
        w
    }

    /// Insert `v` if it is independent of the current span.
    ///
    /// Returns `false` for the zero vector, for dependent vectors and for a
    /// vector of the wrong dimension; the basis is left unchanged then.
    pub fn add_vector(&mut self, v: &Vector<T>, cfg: &GeomCfg<T>) -> bool {
        debug_assert_eq!(v.dim(), self.space_dim, "LinearBasis::add_vector");
        if v.dim() != self.space_dim || self.is_full_dim() || cfg.is_zero_vec(v) {
            return false;
        }
        let w = self.residual(v, cfg);
        match cfg.normalize(&w) {
            Ok(u) => {
                self.vecs.push(u);
                true
            }
            Err(_) => false,
        }
    }

    /// Whether `v` lies in the span.
    pub fn contains(&self, v: &Vector<T>, cfg: &GeomCfg<T>) -> bool {
        cfg.is_zero_vec(&self.residual(v, cfg))
    }

    /// Local coordinates `(b_i · v)_i` of `v`.
    pub fn project(&self, v: &Vector<T>, cfg: &GeomCfg<T>) -> Vector<T> {
        Vector::new(self.vecs.iter().map(|b| cfg.dot(b, v)).collect())
    }

    /// Orthogonal projection of `v` onto the span, in ambient coordinates.
    pub fn project_to_span(&self, v: &Vector<T>, cfg: &GeomCfg<T>) -> Vector<T> {
        self.to_original(&self.project(v, cfg))
    }

    /// Ambient vector with local coordinates `coords`.
    pub fn to_original(&self, coords: &Vector<T>) -> Vector<T> {
        debug_assert_eq!(coords.dim(), self.rank());
        self.vecs
            .iter()
            .zip(coords.iter())
            .fold(Vector::zeros(self.space_dim), |acc, (b, c)| acc.add_scaled(c, b))
    }

    /// Orthonormal basis of the orthogonal complement.
    pub fn orthogonal_complement(&self, cfg: &GeomCfg<T>) -> LinearBasis<T> {
        let mut joint = self.clone();
        let mut comp = LinearBasis::empty(self.space_dim);
        for i in 0..self.space_dim {
            if joint.is_full_dim() {
                break;
            }
            let e = Vector::unit(self.space_dim, i);
            let w = joint.residual(&e, cfg);
            if joint.add_vector(&w, cfg) {
                comp.add_vector(&w, cfg);
            }
        }
        comp
    }

    /// A unit vector orthogonal to the span.
    ///
    /// Picks the standard basis vector with the largest residual so the
    /// normalization is as well conditioned as possible.
    pub fn find_orthonormal_vector(&self, cfg: &GeomCfg<T>) -> GeomResult<Vector<T>> {
        if self.is_full_dim() {
            return Err(GeomError::degenerate(
                "full-dimensional basis has no orthogonal vector",
            ));
        }
        let mut best: Option<(T, Vector<T>)> = None;
        for i in 0..self.space_dim {
            let w = self.residual(&Vector::unit(self.space_dim, i), cfg);
            let n2 = cfg.dot(&w, &w);
            let better = match &best {
                None => true,
                Some((b, _)) => n2.total_cmp(b).is_gt(),
            };
            if better {
                best = Some((n2, w));
            }
        }
        match best {
            Some((_, w)) => cfg.normalize(&w),
            None => Err(GeomError::degenerate("zero-dimensional space")),
        }
    }

    /// Basis of the sum of both spans.
    pub fn merged(&self, other: &LinearBasis<T>, cfg: &GeomCfg<T>) -> LinearBasis<T> {
        let mut out = self.clone();
        for v in &other.vecs {
            out.add_vector(v, cfg);
        }
        out
    }
}

/// Affine subspace `origin + span(linear)`.
///
/// Invariants:
/// - `origin.dim() == linear.space_dim()`.
#[derive(Clone, Debug)]
pub struct AffineBasis<T: Field> {
    origin: Vector<T>,
    linear: LinearBasis<T>,
}

impl<T: Field> AffineBasis<T> {
    /// The zero-dimensional subspace `{origin}`.
    pub fn point(origin: Vector<T>) -> Self {
        let linear = LinearBasis::empty(origin.dim());
        Self { origin, linear }
    }

    pub fn new(origin: Vector<T>, linear: LinearBasis<T>) -> GeomResult<Self> {
        if origin.dim() != linear.space_dim() {
            return Err(GeomError::mismatch(
                linear.space_dim(),
                origin.dim(),
                "AffineBasis::new",
            ));
        }
        Ok(Self { origin, linear })
    }

    /// Affine hull of `points`; the first point becomes the origin.
    pub fn from_points<'a>(
        points: impl IntoIterator<Item = &'a Vector<T>>,
        cfg: &GeomCfg<T>,
    ) -> GeomResult<Self> {
        let mut it = points.into_iter();
        let first = it.next().ok_or(GeomError::EmptyInput {
            context: "AffineBasis::from_points",
        })?;
        let mut basis = Self::point(first.clone());
        for p in it {
            if p.dim() != first.dim() {
                return Err(GeomError::mismatch(first.dim(), p.dim(), "AffineBasis::from_points"));
            }
            basis.add_point(p, cfg);
        }
        Ok(basis)
    }

    pub fn from_vectors<'a>(
        origin: Vector<T>,
        vectors: impl IntoIterator<Item = &'a Vector<T>>,
        cfg: &GeomCfg<T>,
    ) -> GeomResult<Self> {
        let linear = LinearBasis::from_vectors(origin.dim(), vectors, cfg)?;
        Ok(Self { origin, linear })
    }

    #[inline]
    pub fn origin(&self) -> &Vector<T> {
        &self.origin
    }
    #[inline]
    pub fn linear(&self) -> &LinearBasis<T> {
        &self.linear
    }
    #[inline]
    pub fn rank(&self) -> usize {
        self.linear.rank()
    }
    #[inline]
    pub fn space_dim(&self) -> usize {
        self.origin.dim()
    }
    #[inline]
    pub fn is_full_dim(&self) -> bool {
        self.linear.is_full_dim()
    }

    /// Extend the subspace by `p`; returns whether the rank grew.
    pub fn add_point(&mut self, p: &Vector<T>, cfg: &GeomCfg<T>) -> bool {
        self.linear.add_vector(&(p - &self.origin), cfg)
    }

    #[inline]
    pub fn add_vector(&mut self, v: &Vector<T>, cfg: &GeomCfg<T>) -> bool {
        self.linear.add_vector(v, cfg)
    }

    /// Local coordinates of `p` (dimension = rank).
    pub fn project_point(&self, p: &Vector<T>, cfg: &GeomCfg<T>) -> Vector<T> {
        self.linear.project(&(p - &self.origin), cfg)
    }

    pub fn project_points<'a>(
        &self,
        swarm: impl IntoIterator<Item = &'a Vector<T>>,
        cfg: &GeomCfg<T>,
    ) -> Vec<Vector<T>> {
        swarm
            .into_iter()
            .map(|p| self.project_point(p, cfg))
            .collect()
    }

    /// Ambient point with local coordinates `coords`.
    pub fn to_original(&self, coords: &Vector<T>) -> Vector<T> {
        &self.origin + &self.linear.to_original(coords)
    }

    pub fn contains(&self, p: &Vector<T>, cfg: &GeomCfg<T>) -> bool {
        self.linear.contains(&(p - &self.origin), cfg)
    }

    /// Same subspace with another origin (which must lie in it).
    pub fn with_origin(&self, origin: Vector<T>) -> Self {
        Self {
            origin,
            linear: self.linear.clone(),
        }
    }
}
