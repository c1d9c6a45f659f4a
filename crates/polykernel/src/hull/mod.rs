//! Convex hulls of point swarms in any dimension (gift wrapping).
//!
//! Purpose
//! - Turn an arbitrary finite swarm (duplicates, collinear, coplanar and
//!   interior points allowed) into its extreme points and full face lattice.
//!
//! Why this design
//! - Tolerant dedup once up front; afterwards all combinatorics run on integer
//!   ids, so faces found in different local frames merge exactly.
//! - Lower-dimensional swarms are solved in the local coordinates of their
//!   affine hull; the lattice is rebuilt on the original coordinates.
//! - Ridges are processed from an explicit `VecDeque` worklist; recursion only
//!   descends into facet sub-problems, so its depth is bounded by the dimension.
//! - Two independent initial-plane strategies (`InitialPlane`) must yield the
//!   same lattice; tests cross-check them.
//!
//! Code cross-refs: `FaceLattice`, `ConvexPolytope::from_points`,
//! `minkowski::sum::by_convex_hull`.

mod engine;
mod initial;

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::lattice::FaceLattice;
use crate::linalg::{AffineBasis, Vector};
use crate::numeric::Field;
use crate::util::dedup_indices;

use engine::Engine;

/// How the first supporting hyperplane is found.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitialPlane {
    /// Rotate a plane through the lexicographic minimum one direction at a time.
    #[default]
    Rotation,
    /// Recurse on the projection that drops the last coordinate, then lift.
    Projection,
}

/// Gift-wrapping hull builder.
#[derive(Clone, Debug)]
pub struct GiftWrapping<T: Field> {
    cfg: GeomCfg<T>,
    strategy: InitialPlane,
}

impl<T: Field> GiftWrapping<T> {
    pub fn new(cfg: &GeomCfg<T>) -> Self {
        Self {
            cfg: cfg.clone(),
            strategy: InitialPlane::default(),
        }
    }

    pub fn with_strategy(mut self, strategy: InitialPlane) -> Self {
        self.strategy = strategy;
        self
    }

    /// Face lattice of conv(swarm); its vertices are the extreme points.
    pub fn wrap(&self, swarm: &[Vector<T>]) -> GeomResult<FaceLattice<T>> {
        let Some(first) = swarm.first() else {
            return Err(GeomError::EmptyInput {
                context: "GiftWrapping::wrap",
            });
        };
        let space_dim = first.dim();
        if let Some(bad) = swarm.iter().find(|p| p.dim() != space_dim) {
            return Err(GeomError::mismatch(space_dim, bad.dim(), "GiftWrapping::wrap"));
        }

        let keep = dedup_indices(swarm, &self.cfg);
        if keep.len() < swarm.len() {
            tracing::debug!(merged = swarm.len() - keep.len(), "dropped duplicate points");
        }
        let pts: Vec<Vector<T>> = keep.iter().map(|&i| swarm[i].clone()).collect();
        let aff = AffineBasis::from_points(&pts, &self.cfg)?;
        if pts.len() == 1 || aff.rank() == 0 {
            return Ok(FaceLattice::from_point(pts[0].clone(), &self.cfg));
        }
        let local = if aff.is_full_dim() {
            pts.clone()
        } else {
            aff.project_points(&pts, &self.cfg)
        };
        let ids: Vec<usize> = (0..pts.len()).collect();
        let engine = Engine {
            cfg: &self.cfg,
            strategy: self.strategy,
        };
        let faces = engine.hull(&local, &ids)?;

        // Compact vertex ids to 0..nv; faces are rebuilt on ambient coordinates.
        let verts: Vec<usize> = faces[0].iter().map(|v| v[0]).collect();
        let mut new_id = vec![usize::MAX; pts.len()];
        for (k, &v) in verts.iter().enumerate() {
            new_id[v] = k;
        }
        let points: Vec<Vector<T>> = verts.iter().map(|&v| pts[v].clone()).collect();
        let upper: Vec<Vec<Vec<usize>>> = faces[1..]
            .iter()
            .map(|level| {
                level
                    .iter()
                    .map(|f| f.iter().map(|&v| new_id[v]).collect())
                    .collect()
            })
            .collect();
        let lattice = FaceLattice::from_vertex_sets(points, upper, &self.cfg)?;
        tracing::debug!(
            space_dim,
            dim = lattice.dim(),
            input = swarm.len(),
            vertices = lattice.number_of_k_faces(0),
            faces = lattice.number_of_faces(),
            "wrapped"
        );
        Ok(lattice)
    }

    /// Extreme points of conv(swarm).
    pub fn wrap_vrep(&self, swarm: &[Vector<T>]) -> GeomResult<Vec<Vector<T>>> {
        Ok(self.wrap(swarm)?.vertices().to_vec())
    }
}

/// Face lattice of conv(points) with the default strategy.
pub fn wrap_face_lattice<T: Field>(
    points: &[Vector<T>],
    cfg: &GeomCfg<T>,
) -> GeomResult<FaceLattice<T>> {
    GiftWrapping::new(cfg).wrap(points)
}
