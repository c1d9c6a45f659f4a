//! Minkowski sum `F ⊕ G = {f + g}`.
//!
//! - `by_convex_hull`: wrap all pairwise vertex sums. Simple, O(|V(F)|·|V(G)|)
//!   input points for the hull.
//! - `by_sandip_das`: build the face lattice of the sum top-down from the two
//!   lattices. Every face `z` of the sum is `x + y` for a unique pair of faces;
//!   the sub-faces of `z` are found among pairs `(xi ⊆ x, yj ⊆ y)` whose span
//!   has dimension `dim z − 1` and whose neighbouring pairs all lie strictly
//!   on the inner side of the candidate plane.
//!
//! References
//! - S. Das, S. R. Dev, "A worst-case optimal algorithm to compute the
//!   Minkowski sum of convex polytopes", 2021 (Lemma 3 is the neighbour test).

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::{GeomError, GeomResult};
use crate::hyperplane::Hyperplane;
use crate::lattice::{FaceId, FaceLattice};
use crate::linalg::{AffineBasis, LinearBasis, Vector};
use crate::numeric::Field;
use crate::polytope::ConvexPolytope;

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

/// Hull of all pairwise sums of vertices.
pub fn by_convex_hull<T: Field>(
    f: &ConvexPolytope<T>,
    g: &ConvexPolytope<T>,
) -> GeomResult<ConvexPolytope<T>> {
    check_dims(f, g, "minkowski::sum::by_convex_hull")?;
    let (vf, vg) = (f.vrep()?, g.vrep()?);
    let sums: Vec<Vector<T>> = vf
        .iter()
        .flat_map(|a| vg.iter().map(move |b| a + b))
        .collect();
    let out = ConvexPolytope::from_points(&sums, f.cfg())?;
    tracing::debug!(
        left = vf.len(),
        right = vg.len(),
        vertices = out.vrep()?.len(),
        "minkowski sum by convex hull"
    );
    Ok(out)
}

/// A face `x + y` of the sum under construction.
struct SumNode<T: Field> {
    x: FaceId,
    y: FaceId,
    affine: AffineBasis<T>,
    inner: Vector<T>,
    sub: Vec<usize>,
}

/// Face lattice of the sum from the face lattices of the summands.
pub fn by_sandip_das<T: Field>(
    f: &ConvexPolytope<T>,
    g: &ConvexPolytope<T>,
) -> GeomResult<ConvexPolytope<T>> {
    check_dims(f, g, "minkowski::sum::by_sandip_das")?;
    let cfg = f.cfg();
    let (lf, lg) = (f.flrep()?, g.flrep()?);
    let (tf, tg) = (lf.top(), lg.top());

    let linear = tf.affine().linear().merged(tg.affine().linear(), cfg);
    let dim = linear.rank();
    let inner = tf.inner_point() + tg.inner_point();
    if dim == 0 {
        return Ok(ConvexPolytope::point(inner, cfg));
    }
    let affine = AffineBasis::new(tf.affine().origin() + tg.affine().origin(), linear)?;

    let mut levels: Vec<Vec<SumNode<T>>> = (0..=dim).map(|_| Vec::new()).collect();
    levels[dim].push(SumNode {
        x: lf.top_id(),
        y: lg.top_id(),
        affine,
        inner,
        sub: Vec::new(),
    });
    // (x, y) -> index of x + y in its level.
    let mut built: HashMap<(FaceId, FaceId), usize> = HashMap::new();

    for d in (0..dim).rev() {
        let (lower, upper) = levels.split_at_mut(d + 1);
        let below = &mut lower[d];
        for z in upper[0].iter_mut() {
            let inner_local = z.affine.project_point(&z.inner, cfg);
            let xs = lf.non_strict_sub_faces(z.x);
            let ys = lg.non_strict_sub_faces(z.y);
            for &xi in &xs {
                for &yj in &ys {
                    // Both lists are sorted by dimension descending.
                    if xi.dim + yj.dim < d {
                        break;
                    }
                    let (nx, ny) = (lf.node(xi), lg.node(yj));
                    let cand = nx.affine().linear().merged(ny.affine().linear(), cfg);
                    if cand.rank() != d {
                        continue;
                    }
                    if let Some(&idx) = built.get(&(xi, yj)) {
                        if !z.sub.contains(&idx) {
                            z.sub.push(idx);
                        }
                        continue;
                    }

                    // Candidate plane inside the local coordinates of z.
                    let origin = nx.affine().origin() + ny.affine().origin();
                    let local_vecs: Vec<Vector<T>> = cand
                        .vectors()
                        .iter()
                        .map(|v| z.affine.linear().project(v, cfg))
                        .collect();
                    let local = AffineBasis::new(
                        z.affine.project_point(&origin, cfg),
                        LinearBasis::from_vectors(d + 1, &local_vecs, cfg)?,
                    )?;
                    if local.rank() != d {
                        continue;
                    }
                    let plane = Hyperplane::from_affine_basis(&local, cfg)?;
                    if plane.contains(&inner_local, cfg) {
                        continue;
                    }
                    let plane = plane.orient_against(&inner_local, cfg)?;

                    let strictly_inside = |p: Vector<T>| {
                        plane.side(&z.affine.project_point(&p, cfg), cfg) == Ordering::Less
                    };
                    let x_ok = lf
                        .super_faces(xi)
                        .filter(|&s| lf.is_sub_face(s, z.x))
                        .all(|s| strictly_inside(lf.node(s).inner_point() + ny.inner_point()));
                    let y_ok = x_ok
                        && lg
                            .super_faces(yj)
                            .filter(|&s| lg.is_sub_face(s, z.y))
                            .all(|s| strictly_inside(lg.node(s).inner_point() + nx.inner_point()));
                    if !y_ok {
                        continue;
                    }

                    let idx = below.len();
                    below.push(SumNode {
                        x: xi,
                        y: yj,
                        affine: AffineBasis::new(origin, cand)?,
                        inner: nx.inner_point() + ny.inner_point(),
                        sub: Vec::new(),
                    });
                    built.insert((xi, yj), idx);
                    z.sub.push(idx);
                }
            }
        }
        tracing::trace!(dim = d, faces = levels[d].len(), "sum level");
    }

    let points: Vec<Vector<T>> = levels[0].iter().map(|n| n.inner.clone()).collect();
    let subs: Vec<Vec<Vec<usize>>> = levels[1..]
        .iter()
        .map(|level| level.iter().map(|n| n.sub.clone()).collect())
        .collect();
    let lattice = FaceLattice::from_sub_relations(points, subs, cfg)?;
    tracing::debug!(
        dim,
        left = lf.number_of_faces(),
        right = lg.number_of_faces(),
        faces = lattice.number_of_faces(),
        "minkowski sum by face lattices"
    );
    Ok(ConvexPolytope::from_face_lattice(lattice))
}
