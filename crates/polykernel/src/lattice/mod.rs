//! Face lattice: the graded structure of all faces of a polytope.
//!
//! Purpose
//! - Store every face `0..=dim` of a polytope together with its vertex set,
//!   affine hull and a relative-interior point.
//! - Answer the combinatorial queries the facade and the Minkowski algorithms
//!   need (f-vector, sub/super faces, structural equality).
//!
//! Why this design
//! - Arena per dimension level with integer handles (`FaceId`). Sub/super face
//!   relations are index lists into the neighbouring level, so shared sub-faces
//!   need no reference counting and the lattice is plain data (`Send + Sync`).
//! - Level 0 is aligned with the vertex list: `levels[0][i]` is vertex `i`.
//! - Faces are identified by their sorted vertex-id sets. Incidence is
//!   containment of vertex sets between consecutive levels, which is exactly
//!   the face order of a polytope.
//!
//! Code cross-refs: `hull::GiftWrapping` (builds lattices),
//! `minkowski::sum::by_sandip_das` (builds from sub relations),
//! `ConvexPolytope::flrep`.

use std::collections::BTreeSet;

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::linalg::{AffineBasis, Vector};
use crate::numeric::Field;
use crate::util::is_sorted_subset;

/// Stable handle of a face: level and position within the level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FaceId {
    pub dim: usize,
    pub idx: usize,
}

impl FaceId {
    #[inline]
    pub fn new(dim: usize, idx: usize) -> Self {
        Self { dim, idx }
    }
}

/// One face of the lattice.
///
/// Invariants:
/// - `vertices` is sorted and non-empty;
/// - `affine.rank()` equals the level the node is stored at;
/// - `sub` indexes the level below, `sup` the level above.
#[derive(Clone, Debug)]
pub struct FLNode<T: Field> {
    vertices: Vec<usize>,
    affine: AffineBasis<T>,
    inner: Vector<T>,
    sub: Vec<usize>,
    sup: Vec<usize>,
}

impl<T: Field> FLNode<T> {
    #[inline]
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }
    #[inline]
    pub fn affine(&self) -> &AffineBasis<T> {
        &self.affine
    }
    /// A point in the relative interior (centroid of the vertices).
    #[inline]
    pub fn inner_point(&self) -> &Vector<T> {
        &self.inner
    }
    #[inline]
    pub fn sub(&self) -> &[usize] {
        &self.sub
    }
    #[inline]
    pub fn sup(&self) -> &[usize] {
        &self.sup
    }
    #[inline]
    pub fn dim(&self) -> usize {
        self.affine.rank()
    }
}

/// Face lattice of a polytope of dimension `dim()` in R^`space_dim()`.
///
/// Invariants:
/// - exactly one node at level `dim()` (the polytope itself);
/// - every (k>0)-face's vertex set is the union of its sub-faces' vertex sets;
/// - for `dim() >= 2` every ridge lies in exactly two facets;
/// - `f_vector[k] == levels[k].len()`.
#[derive(Clone, Debug)]
pub struct FaceLattice<T: Field> {
    cfg: GeomCfg<T>,
    points: Vec<Vector<T>>,
    levels: Vec<Vec<FLNode<T>>>,
    f_vector: Vec<usize>,
}

impl<T: Field> FaceLattice<T> {
    /// The zero-dimensional lattice of a single point.
    pub fn from_point(p: Vector<T>, cfg: &GeomCfg<T>) -> Self {
        let node = FLNode {
            vertices: vec![0],
            affine: AffineBasis::point(p.clone()),
            inner: p.clone(),
            sub: Vec::new(),
            sup: Vec::new(),
        };
        Self {
            cfg: cfg.clone(),
            points: vec![p],
            levels: vec![vec![node]],
            f_vector: vec![1],
        }
    }

    /// Build from vertex coordinates and the vertex sets of the faces of
    /// dimension `1..=dim` (`upper[k - 1]` holds the k-faces).
    ///
    /// Duplicated sets are merged; sub/super relations are derived from
    /// containment. Fails if a face does not span the dimension of its level
    /// or violates the union invariant.
    pub fn from_vertex_sets(
        points: Vec<Vector<T>>,
        upper: Vec<Vec<Vec<usize>>>,
        cfg: &GeomCfg<T>,
    ) -> GeomResult<Self> {
        let space_dim = match points.first() {
            Some(p) => p.dim(),
            None => {
                return Err(GeomError::EmptyInput {
                    context: "FaceLattice::from_vertex_sets",
                })
            }
        };
        if let Some(bad) = points.iter().find(|p| p.dim() != space_dim) {
            return Err(GeomError::mismatch(space_dim, bad.dim(), "FaceLattice vertices"));
        }
        if upper.is_empty() {
            if points.len() != 1 {
                return Err(GeomError::degenerate(format!(
                    "zero-dimensional lattice with {} vertices",
                    points.len()
                )));
            }
            let p = points.into_iter().next().ok_or(GeomError::EmptyInput {
                context: "FaceLattice::from_vertex_sets",
            })?;
            return Ok(Self::from_point(p, cfg));
        }

        let mut sets: Vec<Vec<Vec<usize>>> = Vec::with_capacity(upper.len() + 1);
        sets.push((0..points.len()).map(|i| vec![i]).collect());
        for level in upper {
            let mut uniq: BTreeSet<Vec<usize>> = BTreeSet::new();
            for mut face in level {
                face.sort_unstable();
                face.dedup();
                if let Some(&bad) = face.iter().find(|&&v| v >= points.len()) {
                    return Err(GeomError::invalid_lattice(format!(
                        "face refers to vertex {bad} of {}",
                        points.len()
                    )));
                }
                uniq.insert(face);
            }
            sets.push(uniq.into_iter().collect());
        }
        let top = sets.len() - 1;
        if sets[top].len() != 1 {
            return Err(GeomError::invalid_lattice(format!(
                "lattice must have one top face, found {}",
                sets[top].len()
            )));
        }

        let mut levels: Vec<Vec<FLNode<T>>> = Vec::with_capacity(sets.len());
        for (k, level) in sets.iter().enumerate() {
            let mut nodes = Vec::with_capacity(level.len());
            for face in level {
                let affine = AffineBasis::from_points(face.iter().map(|&v| &points[v]), cfg)?;
                if affine.rank() != k {
                    return Err(GeomError::degenerate(format!(
                        "face {face:?} stored as {k}-face spans dimension {}",
                        affine.rank()
                    )));
                }
                let inner = Vector::centroid(face.iter().map(|&v| &points[v])).ok_or(
                    GeomError::EmptyInput {
                        context: "FaceLattice face without vertices",
                    },
                )?;
                nodes.push(FLNode {
                    vertices: face.clone(),
                    affine,
                    inner,
                    sub: Vec::new(),
                    sup: Vec::new(),
                });
            }
            levels.push(nodes);
        }
        link_levels(&mut levels)?;

        let f_vector = levels.iter().map(Vec::len).collect();
        Ok(Self {
            cfg: cfg.clone(),
            points,
            levels,
            f_vector,
        })
    }

    /// Build from vertex coordinates and explicit sub relations:
    /// `subs[k - 1][i]` lists the (k-1)-faces below the i-th k-face. Vertex
    /// sets are rebuilt bottom-up; a face must list every face of the level
    /// below that its vertex set contains.
    pub fn from_sub_relations(
        points: Vec<Vector<T>>,
        subs: Vec<Vec<Vec<usize>>>,
        cfg: &GeomCfg<T>,
    ) -> GeomResult<Self> {
        let mut below: Vec<Vec<usize>> = (0..points.len()).map(|i| vec![i]).collect();
        let mut upper = Vec::with_capacity(subs.len());
        for level in subs {
            let mut sets = Vec::with_capacity(level.len());
            for mut listed in level {
                let mut vs: Vec<usize> = Vec::new();
                for &s in &listed {
                    let face = below.get(s).ok_or_else(|| {
                        GeomError::invalid_lattice(format!("sub-face index {s} out of range"))
                    })?;
                    vs.extend_from_slice(face);
                }
                vs.sort_unstable();
                vs.dedup();
                listed.sort_unstable();
                listed.dedup();
                let contained = below
                    .iter()
                    .enumerate()
                    .filter(|(_, f)| is_sorted_subset(f, &vs))
                    .map(|(i, _)| i);
                if !contained.eq(listed.iter().copied()) {
                    return Err(GeomError::invalid_lattice(format!(
                        "face {vs:?} lists sub-faces {listed:?} but contains others"
                    )));
                }
                sets.push(vs);
            }
            below = sets.clone();
            upper.push(sets);
        }
        Self::from_vertex_sets(points, upper, cfg)
    }

    #[inline]
    pub fn cfg(&self) -> &GeomCfg<T> {
        &self.cfg
    }
    /// Dimension of the polytope (level of the top node).
    #[inline]
    pub fn dim(&self) -> usize {
        self.levels.len() - 1
    }
    #[inline]
    pub fn space_dim(&self) -> usize {
        self.points[0].dim()
    }
    #[inline]
    pub fn top(&self) -> &FLNode<T> {
        &self.levels[self.dim()][0]
    }
    #[inline]
    pub fn top_id(&self) -> FaceId {
        FaceId::new(self.dim(), 0)
    }
    /// Vertex coordinates; index `i` is the vertex of `levels[0][i]`.
    #[inline]
    pub fn vertices(&self) -> &[Vector<T>] {
        &self.points
    }
    /// All k-faces; empty beyond the polytope dimension.
    pub fn level(&self, k: usize) -> &[FLNode<T>] {
        self.levels.get(k).map(Vec::as_slice).unwrap_or(&[])
    }
    #[inline]
    pub fn node(&self, id: FaceId) -> &FLNode<T> {
        &self.levels[id.dim][id.idx]
    }
    /// Facets (faces of dimension `dim() - 1`); empty for a point.
    pub fn facets(&self) -> &[FLNode<T>] {
        match self.dim() {
            0 => &[],
            d => self.levels[d - 1].as_slice(),
        }
    }

    pub fn number_of_k_faces(&self, k: usize) -> usize {
        self.f_vector.get(k).copied().unwrap_or(0)
    }
    pub fn number_of_faces(&self) -> usize {
        self.f_vector.iter().sum()
    }
    #[inline]
    pub fn f_vector(&self) -> &[usize] {
        &self.f_vector
    }

    pub fn sub_faces(&self, id: FaceId) -> impl Iterator<Item = FaceId> + '_ {
        self.node(id)
            .sub
            .iter()
            .map(move |&i| FaceId::new(id.dim - 1, i))
    }

    pub fn super_faces(&self, id: FaceId) -> impl Iterator<Item = FaceId> + '_ {
        self.node(id)
            .sup
            .iter()
            .map(move |&i| FaceId::new(id.dim + 1, i))
    }

    /// `id` and every face below it, by dimension descending.
    pub fn non_strict_sub_faces(&self, id: FaceId) -> Vec<FaceId> {
        let mut out = vec![id];
        let mut frontier = vec![id];
        while !frontier.is_empty() {
            let mut next: BTreeSet<FaceId> = BTreeSet::new();
            for f in &frontier {
                next.extend(self.sub_faces(*f));
            }
            frontier = next.into_iter().collect();
            out.extend(frontier.iter().copied());
        }
        out
    }

    /// Whether face `a` lies in face `b` (vertex-set containment).
    pub fn is_sub_face(&self, a: FaceId, b: FaceId) -> bool {
        a.dim <= b.dim && is_sorted_subset(&self.node(a).vertices, &self.node(b).vertices)
    }

    /// The same combinatorics with every vertex mapped through `f`.
    pub fn map_vertices(
        &self,
        f: impl Fn(&Vector<T>) -> GeomResult<Vector<T>>,
    ) -> GeomResult<Self> {
        let points = self.points.iter().map(f).collect::<GeomResult<Vec<_>>>()?;
        let upper = self.levels[1..]
            .iter()
            .map(|level| level.iter().map(|n| n.vertices.clone()).collect())
            .collect();
        Self::from_vertex_sets(points, upper, &self.cfg)
    }

    /// Verify the union invariant and the ridge/facet incidence.
    pub fn check_invariants(&self) -> GeomResult<()> {
        for k in 1..=self.dim() {
            for node in &self.levels[k] {
                let mut union: Vec<usize> = node
                    .sub
                    .iter()
                    .flat_map(|&s| self.levels[k - 1][s].vertices.iter().copied())
                    .collect();
                union.sort_unstable();
                union.dedup();
                if union != node.vertices {
                    return Err(GeomError::invalid_lattice(format!(
                        "face {:?} is not the union of its sub-faces",
                        node.vertices
                    )));
                }
            }
        }
        if self.dim() >= 2 {
            for ridge in &self.levels[self.dim() - 2] {
                if ridge.sup.len() != 2 {
                    return Err(GeomError::invalid_lattice(format!(
                        "ridge {:?} lies in {} facets",
                        ridge.vertices,
                        ridge.sup.len()
                    )));
                }
            }
        }
        Ok(())
    }

    /// Bijection between the vertices of `self` and `other` under tolerant
    /// equality, as `map[i] = j`.
    fn match_vertices(&self, other: &Self) -> Option<Vec<usize>> {
        if self.points.len() != other.points.len() {
            return None;
        }
        let mut order: Vec<usize> = (0..other.points.len()).collect();
        order.sort_by(|&a, &b| other.points[a].lex_cmp_exact(&other.points[b]));
        let key = |i: usize| &other.points[i][0];
        let mut used = vec![false; other.points.len()];
        let mut map = Vec::with_capacity(self.points.len());
        for p in &self.points {
            // First candidate whose leading coordinate is not below p[0] - eps.
            let start = order.partition_point(|&j| self.cfg.lt(key(j), &p[0]));
            let hit = order[start..]
                .iter()
                .take_while(|&&j| self.cfg.le(key(j), &p[0]))
                .copied()
                .find(|&j| !used[j] && self.cfg.eq_vec(&other.points[j], p))?;
            used[hit] = true;
            map.push(hit);
        }
        Some(map)
    }
}

/// Fill `sub`/`sup` from vertex-set containment between consecutive levels
/// and reject faces that are not the union of their sub-faces.
fn link_levels<T: Field>(levels: &mut [Vec<FLNode<T>>]) -> GeomResult<()> {
    for k in 1..levels.len() {
        let (lower, upper) = levels.split_at_mut(k);
        let below = &mut lower[k - 1];
        // vertex -> faces of the level below containing it
        let nverts = below
            .iter()
            .flat_map(|n| n.vertices.iter().copied())
            .max()
            .map_or(0, |m| m + 1);
        let mut incident: Vec<Vec<usize>> = vec![Vec::new(); nverts];
        for (i, n) in below.iter().enumerate() {
            for &v in &n.vertices {
                incident[v].push(i);
            }
        }
        for (j, node) in upper[0].iter_mut().enumerate() {
            let mut cands: Vec<usize> = node
                .vertices
                .iter()
                .filter(|&&v| v < nverts)
                .flat_map(|&v| incident[v].iter().copied())
                .collect();
            cands.sort_unstable();
            cands.dedup();
            node.sub = cands
                .into_iter()
                .filter(|&i| is_sorted_subset(&below[i].vertices, &node.vertices))
                .collect();
            let mut union: Vec<usize> = node
                .sub
                .iter()
                .flat_map(|&i| below[i].vertices.iter().copied())
                .collect();
            union.sort_unstable();
            union.dedup();
            if union != node.vertices {
                return Err(GeomError::invalid_lattice(format!(
                    "{k}-face {:?} is not the union of its sub-faces {union:?}",
                    node.vertices
                )));
            }
            for &i in &node.sub {
                below[i].sup.push(j);
            }
        }
    }
    Ok(())
}

/// Structural equality: per dimension, the same faces as sets of (tolerantly
/// matched) vertices. Handles and insertion order are irrelevant.
impl<T: Field> PartialEq for FaceLattice<T> {
    fn eq(&self, other: &Self) -> bool {
        if self.f_vector != other.f_vector || self.space_dim() != other.space_dim() {
            return false;
        }
        let Some(map) = self.match_vertices(other) else {
            return false;
        };
        for k in 1..=self.dim() {
            let mut mine: Vec<Vec<usize>> = self.levels[k]
                .iter()
                .map(|n| {
                    let mut vs: Vec<usize> = n.vertices.iter().map(|&v| map[v]).collect();
                    vs.sort_unstable();
                    vs
                })
                .collect();
            let mut theirs: Vec<Vec<usize>> =
                other.levels[k].iter().map(|n| n.vertices.clone()).collect();
            mine.sort();
            theirs.sort();
            if mine != theirs {
                return false;
            }
        }
        true
    }
}
