//! Gift-wrapping core on full-dimensional sub-problems.
//!
//! Every sub-problem is a slice of points in local coordinates (full
//! dimensional in R^d) plus a parallel slice of ids. The result lists all
//! faces as sorted id sets, so facet sub-hulls computed in plane-local
//! coordinates merge into the parent without any coordinate comparison.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::hyperplane::Hyperplane;
use crate::linalg::{AffineBasis, LinearBasis, Vector};
use crate::numeric::Field;
use crate::util::combinations;

use super::initial::{initial_plane, rotate_about};
use super::InitialPlane;

/// `faces[k]` holds the k-faces as sorted id sets, `k = 0..=dim`.
pub(super) type FaceSets = Vec<BTreeSet<Vec<usize>>>;

/// A discovered facet of the current sub-problem.
struct Facet<T: Field> {
    plane: Hyperplane<T>,
    /// Faces of the facet itself, levels `0..=d-1`.
    faces: FaceSets,
}

impl<T: Field> Facet<T> {
    fn key(&self) -> Option<&Vec<usize>> {
        self.faces.last().and_then(|top| top.iter().next())
    }
}

pub(super) struct Engine<'a, T: Field> {
    pub cfg: &'a GeomCfg<T>,
    pub strategy: InitialPlane,
}

impl<'a, T: Field> Engine<'a, T> {
    /// All faces of conv(points); `points` must be full dimensional in their
    /// ambient space and pairwise distinct.
    pub fn hull(&self, points: &[Vector<T>], ids: &[usize]) -> GeomResult<FaceSets> {
        debug_assert_eq!(points.len(), ids.len());
        let Some(first) = points.first() else {
            return Err(GeomError::EmptyInput {
                context: "hull sub-problem",
            });
        };
        let d = first.dim();
        match d {
            0 => Ok(vec![BTreeSet::from([vec![ids[0]]])]),
            1 => Ok(self.segment(points, ids)),
            _ if points.len() == d + 1 => Ok(simplex(ids)),
            2 => self.polygon(points, ids),
            _ => self.wrap(points, ids),
        }
    }

    fn segment(&self, points: &[Vector<T>], ids: &[usize]) -> FaceSets {
        let by_x = |i: &usize, j: &usize| points[*i][0].total_cmp(&points[*j][0]);
        let n = points.len();
        let lo = (0..n).min_by(by_x).unwrap_or(0);
        let hi = (0..n).max_by(by_x).unwrap_or(0);
        let mut edge = vec![ids[lo], ids[hi]];
        edge.sort_unstable();
        vec![
            BTreeSet::from([vec![ids[lo]], vec![ids[hi]]]),
            BTreeSet::from([edge]),
        ]
    }

    /// Signed distance of `b` from the directed line `o → a` (positive = left).
    fn turn(&self, o: &Vector<T>, a: &Vector<T>, b: &Vector<T>) -> T {
        let (ux, uy) = (a[0].clone() - o[0].clone(), a[1].clone() - o[1].clone());
        let (wx, wy) = (b[0].clone() - o[0].clone(), b[1].clone() - o[1].clone());
        let cross = ux.clone() * wy - uy.clone() * wx;
        let len = (ux.clone() * ux + uy.clone() * uy).sqrt();
        if self.cfg.eq0(&len) {
            return T::zero();
        }
        cross / len
    }

    /// Monotone chain; points within tolerance of an edge are dropped.
    fn polygon(&self, points: &[Vector<T>], ids: &[usize]) -> GeomResult<FaceSets> {
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&i, &j| points[i].lex_cmp_exact(&points[j]));
        let mut chain: Vec<usize> = Vec::with_capacity(2 * order.len());
        for pass in 0..2 {
            let start = chain.len();
            let iter: Box<dyn Iterator<Item = &usize>> = if pass == 0 {
                Box::new(order.iter())
            } else {
                Box::new(order.iter().rev())
            };
            for &i in iter {
                while chain.len() >= start + 2 {
                    let o = &points[chain[chain.len() - 2]];
                    let a = &points[chain[chain.len() - 1]];
                    if self.cfg.gt0(&self.turn(o, a, &points[i])) {
                        break;
                    }
                    chain.pop();
                }
                chain.push(i);
            }
            // The last point of each half starts the other one.
            chain.pop();
        }
        if chain.len() < 3 {
            return Err(GeomError::degenerate(format!(
                "planar sub-problem with {} points has only {} hull vertices",
                points.len(),
                chain.len()
            )));
        }
        let mut faces: FaceSets = vec![BTreeSet::new(), BTreeSet::new(), BTreeSet::new()];
        for (k, &i) in chain.iter().enumerate() {
            let j = chain[(k + 1) % chain.len()];
            faces[0].insert(vec![ids[i]]);
            let mut edge = vec![ids[i], ids[j]];
            edge.sort_unstable();
            faces[1].insert(edge);
        }
        let mut all: Vec<usize> = chain.iter().map(|&i| ids[i]).collect();
        all.sort_unstable();
        faces[2].insert(all);
        Ok(faces)
    }

    /// Facet-by-facet wrapping with an explicit ridge worklist.
    fn wrap(&self, points: &[Vector<T>], ids: &[usize]) -> GeomResult<FaceSets> {
        let d = points[0].dim();
        let pos: HashMap<usize, usize> = ids.iter().enumerate().map(|(p, &id)| (id, p)).collect();

        let start = initial_plane(points, self.strategy, self.cfg)?;
        let mut facets: Vec<Facet<T>> = Vec::new();
        let mut by_key: HashMap<Vec<usize>, usize> = HashMap::new();
        let mut incident: HashMap<Vec<usize>, Vec<usize>> = HashMap::new();
        let mut queue: VecDeque<(Vec<usize>, usize)> = VecDeque::new();

        let first = self.build_facet(points, ids, start)?;
        register(first, d, &mut facets, &mut by_key, &mut incident, &mut queue)?;

        while let Some((ridge, fi)) = queue.pop_front() {
            if incident.get(&ridge).map_or(0, Vec::len) >= 2 {
                continue;
            }
            let plane = self.roll(points, &pos, &facets[fi], &ridge)?;
            let next = self.build_facet(points, ids, plane)?;
            if !next.faces[d - 2].contains(&ridge) {
                return Err(GeomError::degenerate(format!(
                    "facet rolled over ridge {ridge:?} does not contain it"
                )));
            }
            if let Some(known) = next.key().and_then(|k| by_key.get(k)) {
                return Err(GeomError::degenerate(format!(
                    "rolling facet {fi} over ridge {ridge:?} returned known facet {known}"
                )));
            }
            tracing::trace!(facet = facets.len(), ridge = ?ridge, "rolled");
            register(next, d, &mut facets, &mut by_key, &mut incident, &mut queue)?;
        }

        if let Some((ridge, fs)) = incident.iter().find(|(_, fs)| fs.len() != 2) {
            return Err(GeomError::degenerate(format!(
                "boundary did not close: ridge {ridge:?} lies in {} facets",
                fs.len()
            )));
        }

        let mut out: FaceSets = vec![BTreeSet::new(); d + 1];
        for f in facets {
            for (k, level) in f.faces.into_iter().enumerate() {
                out[k].extend(level);
            }
        }
        let all: Vec<usize> = out[0].iter().map(|v| v[0]).collect();
        out[d].insert(all);
        Ok(out)
    }

    /// Collect the points on `plane`, check it supports the swarm, and wrap
    /// them in plane-local coordinates. Points on the plane that are not
    /// vertices of that sub-hull drop out here.
    fn build_facet(
        &self,
        points: &[Vector<T>],
        ids: &[usize],
        plane: Hyperplane<T>,
    ) -> GeomResult<Facet<T>> {
        let d = points[0].dim();
        let mut on = Vec::new();
        for (i, p) in points.iter().enumerate() {
            match plane.side(p, self.cfg) {
                Ordering::Equal => on.push(i),
                Ordering::Less => {}
                Ordering::Greater => {
                    return Err(GeomError::degenerate(format!(
                        "plane {plane} is not supporting: {p} lies outside"
                    )))
                }
            }
        }
        if on.len() < d {
            return Err(GeomError::degenerate(format!(
                "plane {plane} holds {} points, a facet in R^{d} needs {d}",
                on.len()
            )));
        }
        let mut normal_span = LinearBasis::empty(d);
        normal_span.add_vector(plane.normal(), self.cfg);
        let frame = AffineBasis::new(
            points[on[0]].clone(),
            normal_span.orthogonal_complement(self.cfg),
        )?;
        let local = frame.project_points(on.iter().map(|&i| &points[i]), self.cfg);
        let span = AffineBasis::from_points(&local, self.cfg)?;
        if span.rank() + 1 != d {
            return Err(GeomError::degenerate(format!(
                "points on plane {plane} span only dimension {}",
                span.rank()
            )));
        }
        let sub_ids: Vec<usize> = on.iter().map(|&i| ids[i]).collect();
        let faces = self.hull(&local, &sub_ids)?;
        Ok(Facet { plane, faces })
    }

    /// Rotate the facet's plane about `ridge` until it supports the swarm again.
    fn roll(
        &self,
        points: &[Vector<T>],
        pos: &HashMap<usize, usize>,
        facet: &Facet<T>,
        ridge: &[usize],
    ) -> GeomResult<Hyperplane<T>> {
        let d = points[0].dim();
        let lookup = |id: &usize| {
            pos.get(id)
                .map(|&p| &points[p])
                .ok_or_else(|| GeomError::degenerate(format!("unknown point id {id}")))
        };
        let ridge_pts = ridge.iter().map(lookup).collect::<GeomResult<Vec<_>>>()?;
        let ridge_aff = AffineBasis::from_points(ridge_pts.iter().copied(), self.cfg)?;
        if ridge_aff.rank() + 2 != d {
            return Err(GeomError::degenerate(format!(
                "ridge {ridge:?} spans dimension {} in R^{d}",
                ridge_aff.rank()
            )));
        }
        let origin = ridge_aff.origin();
        let n = facet.plane.normal();

        // In-facet direction pointing away from the ridge.
        let mut frame = ridge_aff.linear().clone();
        frame.add_vector(n, self.cfg);
        let key = facet
            .key()
            .ok_or_else(|| GeomError::degenerate("facet without vertices"))?;
        let mut best: Option<(T, Vector<T>)> = None;
        for id in key.iter().filter(|id| ridge.binary_search(id).is_err()) {
            let w = frame.residual(&(lookup(id)? - origin), self.cfg);
            let len2 = self.cfg.dot(&w, &w);
            if best.as_ref().map_or(true, |(b, _)| len2.total_cmp(b).is_gt()) {
                best = Some((len2, w));
            }
        }
        let (_, toward) = best.ok_or_else(|| {
            GeomError::degenerate(format!("facet has no vertex off ridge {ridge:?}"))
        })?;
        let v = self.cfg.normalize(&toward)?;

        let rot = rotate_about(points, origin, &v, n, self.cfg)?;
        Hyperplane::from_normal_point(&rot.normal, origin, self.cfg)?.orient_outward(points, self.cfg)
    }
}

fn register<T: Field>(
    facet: Facet<T>,
    d: usize,
    facets: &mut Vec<Facet<T>>,
    by_key: &mut HashMap<Vec<usize>, usize>,
    incident: &mut HashMap<Vec<usize>, Vec<usize>>,
    queue: &mut VecDeque<(Vec<usize>, usize)>,
) -> GeomResult<()> {
    let idx = facets.len();
    let key = facet
        .key()
        .cloned()
        .ok_or_else(|| GeomError::degenerate("facet without vertices"))?;
    for ridge in &facet.faces[d - 2] {
        let fs = incident.entry(ridge.clone()).or_default();
        fs.push(idx);
        if fs.len() == 1 {
            queue.push_back((ridge.clone(), idx));
        }
    }
    by_key.insert(key, idx);
    facets.push(facet);
    Ok(())
}

/// All faces of the simplex on `ids`.
fn simplex(ids: &[usize]) -> FaceSets {
    let mut sorted = ids.to_vec();
    sorted.sort_unstable();
    (1..=sorted.len())
        .map(|size| combinations(&sorted, size).into_iter().collect())
        .collect()
}
