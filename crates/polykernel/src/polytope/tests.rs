use super::special::*;
use super::*;
use crate::numeric::{BigRational, DDouble};
use proptest::prelude::*;
use rand::{rngs::StdRng, SeedableRng};

fn v(c: &[f64]) -> Vector<f64> {
    Vector::from_f64s(c)
}

fn assert_hrep_supports(p: &ConvexPolytope<f64>) {
    let cfg = p.cfg().clone();
    let vs = p.vrep().unwrap();
    for h in p.hrep().unwrap() {
        assert!(vs.iter().all(|x| cfg.le0(&h.eval(x, &cfg))), "{h} cuts a vertex");
        assert!(vs.iter().any(|x| h.contains(x, &cfg)), "{h} touches nothing");
    }
}

#[test]
fn cube_and_simplex_counts() {
    let cfg = GeomCfg::<f64>::default();
    let cube = cube01::<f64>(3, &cfg).unwrap();
    assert!(cube.has_vrep() && !cube.has_flrep());
    assert_eq!(cube.hrep().unwrap().len(), 6);
    assert_eq!(cube.flrep().unwrap().number_of_faces(), 27);
    assert_eq!(cube.polytope_dim().unwrap(), 3);
    assert_hrep_supports(&cube);

    let s = simplex::<f64>(4, &cfg).unwrap();
    assert_eq!(s.hrep().unwrap().len(), 5);
    assert_eq!(s.flrep().unwrap().number_of_faces(), 31);
    assert_hrep_supports(&s);
}

#[test]
fn hrep_to_vrep_to_lattice_round_trip() {
    let cfg = GeomCfg::<f64>::default();
    let from_h = cube01_hrep::<f64>(3, &cfg).unwrap();
    assert!(from_h.has_hrep() && !from_h.has_vrep());
    assert_eq!(from_h.vrep().unwrap().len(), 8);
    let from_v = cube01::<f64>(3, &cfg).unwrap();
    assert_eq!(from_h.flrep().unwrap(), from_v.flrep().unwrap());

    // And back: the derived Hrep describes the same cube again.
    let again = ConvexPolytope::from_hrep(from_v.hrep().unwrap().to_vec(), 3, &cfg).unwrap();
    assert_eq!(again.flrep().unwrap(), from_v.flrep().unwrap());
}

#[test]
fn lower_dimensional_hrep_has_equality_pairs() {
    let cfg = GeomCfg::<f64>::default();
    let square = rect_parallel(&v(&[0.0, 0.0, 2.0]), &v(&[1.0, 1.0, 2.0]), &cfg).unwrap();
    assert_eq!(square.polytope_dim().unwrap(), 2);
    assert_eq!(square.hrep().unwrap().len(), 4 + 2);
    assert_hrep_supports(&square);
    assert!(square.contains(&v(&[0.5, 0.5, 2.0])).unwrap());
    assert!(square.contains(&v(&[1.0, 0.0, 2.0])).unwrap());
    assert!(!square.contains(&v(&[0.5, 0.5, 2.1])).unwrap());
    assert!(!square.contains(&v(&[1.5, 0.5, 2.0])).unwrap());

    let pt = ConvexPolytope::point(v(&[1.0, 2.0]), &cfg);
    assert_eq!(pt.hrep().unwrap().len(), 4);
    assert!(pt.contains(&v(&[1.0, 2.0])).unwrap());
    assert!(!pt.contains(&v(&[1.0, 2.1])).unwrap());
}

#[test]
fn redundant_half_spaces_are_dropped() {
    let cfg = GeomCfg::<f64>::default();
    let h = |n: &[f64], c: f64| Hyperplane::from_normal_offset(&v(n), c, &cfg).unwrap();
    let mut hs = cube01_hrep::<f64>(3, &cfg).unwrap().hrep().unwrap().to_vec();
    let facets = hs.clone();
    hs.insert(1, h(&[1.0, 0.0, 0.0], 2.0));
    // Touches the cube along the edge x = y = 1.
    hs.push(h(&[1.0, 1.0, 0.0], 2.0));
    hs.push(h(&[-1.0, -1.0, -1.0], 1.0));
    hs.push(facets[0].clone());

    let loose = ConvexPolytope::from_hrep(hs.clone(), 3, &cfg).unwrap();
    let kept = loose.irredundant_hrep().unwrap();
    assert_eq!(kept.len(), 6);
    for (a, b) in kept.iter().zip(&facets) {
        assert!(a.approx_eq(b, &cfg), "{a} vs {b}");
    }

    let tight = ConvexPolytope::from_hrep_irredundant(hs, 3, &cfg).unwrap();
    assert!(tight.has_flrep() && tight.has_hrep());
    assert_eq!(tight.hrep().unwrap().len(), 6);
    assert_eq!(tight, cube01::<f64>(3, &cfg).unwrap());

    let square = rect_parallel(&v(&[0.0, 0.0, 2.0]), &v(&[1.0, 1.0, 2.0]), &cfg).unwrap();
    let mut flat = square.hrep().unwrap().to_vec();
    flat.push(h(&[1.0, 0.0, 0.0], 5.0));
    let flat = ConvexPolytope::from_hrep_irredundant(flat, 3, &cfg).unwrap();
    assert_eq!(flat.hrep().unwrap().len(), 4 + 2);
    assert_eq!(flat, square);
}

#[test]
fn shift_to_origin_centers_the_inner_point() {
    let cfg = GeomCfg::<f64>::default();
    let cube = cube01::<f64>(3, &cfg).unwrap();
    let (centered, inner) = cube.shift_to_origin().unwrap();
    assert!(cfg.eq_vec(&inner, &v(&[0.5, 0.5, 0.5])));
    assert!(cfg.is_zero_vec(centered.inner_point().unwrap()));
    assert_eq!(centered.polar().unwrap().f_vector().unwrap(), &[6, 12, 8, 1]);
    assert_eq!(centered.shift(&inner).unwrap(), cube);
}

#[test]
fn min_vertex_distance_of_generators() {
    let cfg = GeomCfg::<f64>::default();
    let cube = cube01::<f64>(3, &cfg).unwrap();
    assert!((cube.min_vertex_distance().unwrap() - 1.0).abs() < 1e-12);
    let thin = rect_parallel(&v(&[0.0, 0.0]), &v(&[2.0, 0.25]), &cfg).unwrap();
    assert!((thin.min_vertex_distance().unwrap() - 0.25).abs() < 1e-12);
    let pt = ConvexPolytope::point(v(&[1.0, 1.0]), &cfg);
    assert!(matches!(
        pt.min_vertex_distance(),
        Err(GeomError::DegenerateConfiguration { .. })
    ));
}

#[test]
fn polytopes_compare_by_their_point_sets() {
    let cfg = GeomCfg::<f64>::default();
    let by_v = cube01::<f64>(3, &cfg).unwrap();
    let by_h = cube01_hrep::<f64>(3, &cfg).unwrap();
    let mut reversed = by_v.vrep().unwrap().to_vec();
    reversed.reverse();
    let by_points = ConvexPolytope::from_points(&reversed, &cfg).unwrap();
    assert_eq!(by_v, by_h);
    assert_eq!(by_v, by_points);
    assert_ne!(by_v, by_v.shift(&v(&[0.0, 0.0, 1e-3])).unwrap());
    assert_ne!(by_v, simplex::<f64>(3, &cfg).unwrap());
    let infeasible = ConvexPolytope::from_hrep(
        vec![
            Hyperplane::from_normal_offset(&v(&[1.0, 0.0]), 1.0, &cfg).unwrap(),
            Hyperplane::from_normal_offset(&v(&[-1.0, 0.0]), -2.0, &cfg).unwrap(),
        ],
        2,
        &cfg,
    )
    .unwrap();
    assert_ne!(infeasible.clone(), infeasible);
}

#[test]
fn inner_point_is_strictly_inside() {
    let cfg = GeomCfg::<f64>::default();
    let s = simplex::<f64>(3, &cfg).unwrap();
    let inner = s.inner_point().unwrap().clone();
    for h in s.hrep().unwrap() {
        assert_eq!(h.side(&inner, &cfg), std::cmp::Ordering::Less);
    }
}

#[test]
fn shift_keeps_combinatorics_in_every_representation() {
    let cfg = GeomCfg::<f64>::default();
    let d = v(&[1.0, -2.0, 0.5]);
    let expected = rect_parallel(&v(&[1.0, -2.0, 0.5]), &v(&[2.0, -1.0, 1.5]), &cfg).unwrap();

    let by_lattice = ConvexPolytope::from_points(cube01::<f64>(3, &cfg).unwrap().vrep().unwrap(), &cfg)
        .unwrap()
        .shift(&d)
        .unwrap();
    let by_vrep = cube01::<f64>(3, &cfg).unwrap().shift(&d).unwrap();
    let by_hrep = cube01_hrep::<f64>(3, &cfg).unwrap().shift(&d).unwrap();
    assert!(by_lattice.has_flrep());
    assert!(!by_vrep.has_flrep());
    assert!(by_hrep.has_hrep() && !by_hrep.has_vrep());
    for p in [&by_lattice, &by_vrep, &by_hrep] {
        assert_eq!(p.flrep().unwrap(), expected.flrep().unwrap());
    }
    assert!(matches!(
        by_vrep.shift(&v(&[1.0])),
        Err(GeomError::DimensionMismatch { .. })
    ));
}

#[test]
fn rotations_agree_across_representations() {
    let cfg = GeomCfg::<f64>::default();
    let mut rng = StdRng::seed_from_u64(7);
    let m = matrix::random_rotation(3, &mut rng, &cfg).unwrap();
    let a = cube01::<f64>(3, &cfg).unwrap().rotate(&m).unwrap();
    let b = cube01_hrep::<f64>(3, &cfg).unwrap().rotate(&m).unwrap();
    let c = ConvexPolytope::from_points(cube01::<f64>(3, &cfg).unwrap().vrep().unwrap(), &cfg)
        .unwrap()
        .rotate(&m)
        .unwrap();
    assert_eq!(a.flrep().unwrap(), b.flrep().unwrap());
    assert_eq!(a.flrep().unwrap(), c.flrep().unwrap());

    let r = simplex::<f64>(4, &cfg).unwrap().rotate_random(&mut rng).unwrap();
    assert_eq!(r.f_vector().unwrap(), &[5, 10, 10, 5, 1]);
}

#[test]
fn lifting_into_higher_space() {
    let cfg = GeomCfg::<f64>::default();
    let sq = cube01::<f64>(2, &cfg).unwrap();
    let lifted = sq.lift_up(4, &3.0).unwrap();
    assert_eq!(lifted.space_dim(), 4);
    assert_eq!(lifted.polytope_dim().unwrap(), 2);
    assert!(lifted.vrep().unwrap().iter().all(|p| (p[2] - 3.0).abs() < 1e-12));
    let expanded = sq.expand_to(3).unwrap();
    assert!(expanded.contains(&v(&[0.5, 0.5, 0.0])).unwrap());
    assert!(sq.lift_up(1, &0.0).is_err());
}

#[test]
fn polar_of_centered_cube_is_cross_polytope() {
    let cfg = GeomCfg::<f64>::default();
    let cube = ball_oo(&v(&[0.0, 0.0, 0.0]), &1.0, &cfg).unwrap();
    let polar = cube.polar().unwrap();
    assert_eq!(polar.f_vector().unwrap(), &[6, 12, 8, 1]);
    let cross = ball_1(&v(&[0.0, 0.0, 0.0]), &1.0, &cfg).unwrap();
    assert_eq!(polar.flrep().unwrap(), cross.flrep().unwrap());

    let off_center = cube01::<f64>(3, &cfg).unwrap();
    assert!(matches!(
        off_center.polar(),
        Err(GeomError::DegenerateConfiguration { .. })
    ));
}

#[test]
fn sections_by_hyperplanes() {
    let cfg = GeomCfg::<f64>::default();
    let cube = cube01::<f64>(3, &cfg).unwrap();
    let mid = Hyperplane::from_normal_offset(&v(&[1.0, 0.0, 0.0]), 0.5, &cfg).unwrap();
    let sec = cube.section_by_hyperplane(&mid).unwrap().unwrap();
    assert_eq!(sec.polytope_dim().unwrap(), 2);
    assert_eq!(sec.f_vector().unwrap(), &[4, 4, 1]);
    assert!(sec.vrep().unwrap().iter().all(|p| (p[0] - 0.5).abs() < 1e-9));

    let diag = Hyperplane::from_normal_offset(&v(&[1.0, 1.0, 1.0]), 1.5, &cfg).unwrap();
    let hexagon = cube.section_by_hyperplane(&diag).unwrap().unwrap();
    assert_eq!(hexagon.f_vector().unwrap(), &[6, 6, 1]);

    let miss = Hyperplane::from_normal_offset(&v(&[1.0, 0.0, 0.0]), 2.0, &cfg).unwrap();
    assert!(cube.section_by_hyperplane(&miss).unwrap().is_none());
}

#[test]
fn generator_counts() {
    let cfg = GeomCfg::<f64>::default();
    let c = cyclic(4, 7, &0.5, &cfg).unwrap();
    let fl = c.flrep().unwrap();
    assert_eq!(fl.number_of_k_faces(0), 7);
    assert_eq!(fl.number_of_k_faces(1), 21);
    assert_eq!(fl.facets().len(), 14);
    assert!(cyclic(4, 4, &0.5, &cfg).is_err());

    let b1 = ball_1(&v(&[1.0, 1.0, 1.0]), &2.0, &cfg).unwrap();
    assert_eq!(b1.f_vector().unwrap(), &[6, 12, 8, 1]);
    assert!(b1.contains(&v(&[1.0, 1.0, 1.0])).unwrap());
    assert!(b1.contains(&v(&[3.0, 1.0, 1.0])).unwrap());
    assert!(!b1.contains(&v(&[2.5, 2.0, 1.0])).unwrap());
    assert_eq!(ball_oo(&v(&[0.0, 0.0, 0.0, 0.0]), &0.5, &cfg).unwrap().f_vector().unwrap(), &[16, 32, 24, 8, 1]);

    let mut rng = StdRng::seed_from_u64(3);
    let s = simplex_random::<f64, _>(3, &mut rng, &cfg).unwrap();
    assert_eq!(s.f_vector().unwrap(), &[4, 6, 4, 1]);
}

#[test]
fn boxes_beyond_enumerable_corner_counts_fail() {
    let cfg = GeomCfg::<f64>::default();
    assert!(matches!(
        cube01::<f64>(64, &cfg),
        Err(GeomError::DegenerateConfiguration { .. })
    ));
    let far = Vector::<f64>::zeros(70);
    assert!(matches!(
        ball_oo(&far, &1.0, &cfg),
        Err(GeomError::DegenerateConfiguration { .. })
    ));
    assert!(matches!(
        rect_parallel(&far, &Vector::new(vec![1.0; 70]), &cfg),
        Err(GeomError::DegenerateConfiguration { .. })
    ));
}

#[test]
fn sphere_and_ellipsoid_grids() {
    let cfg = GeomCfg::<f64>::default();
    let s = sphere(&v(&[0.0, 0.0, 0.0]), &1.0, 4, 6, &cfg).unwrap();
    // Two poles and three rings of six.
    assert_eq!(s.vrep().unwrap().len(), 2 + 3 * 6);
    assert_eq!(s.polytope_dim().unwrap(), 3);
    assert!(s
        .vrep()
        .unwrap()
        .iter()
        .all(|p| (cfg.norm(p) - 1.0).abs() < 1e-9));

    let e = ellipsoid(&v(&[1.0, 0.0]), &v(&[2.0, 1.0]), 2, 8, &cfg).unwrap();
    assert_eq!(e.f_vector().unwrap(), &[8, 8, 1]);
    assert!(e.contains(&v(&[3.0, 0.0])).unwrap());
    assert!(ellipsoid(&v(&[0.0, 0.0]), &v(&[1.0, 0.0]), 2, 8, &cfg).is_err());

    let seg = sphere(&v(&[2.0]), &1.0, 2, 3, &cfg).unwrap();
    assert_eq!(seg.f_vector().unwrap(), &[2, 1]);
}

#[test]
fn invalid_constructions() {
    let cfg = GeomCfg::<f64>::default();
    assert!(matches!(
        ConvexPolytope::from_vrep(Vec::new(), &cfg),
        Err(GeomError::EmptyInput { .. })
    ));
    assert!(matches!(
        ConvexPolytope::from_vrep(vec![v(&[0.0]), v(&[0.0, 1.0])], &cfg),
        Err(GeomError::DimensionMismatch { .. })
    ));
    let h = Hyperplane::from_normal_offset(&v(&[1.0, 0.0]), 1.0, &cfg).unwrap();
    assert!(matches!(
        ConvexPolytope::from_hrep(vec![h.clone()], 3, &cfg),
        Err(GeomError::DimensionMismatch { .. })
    ));
    let infeasible = ConvexPolytope::from_hrep(
        vec![h.clone(), Hyperplane::from_normal_offset(&v(&[-1.0, 0.0]), -2.0, &cfg).unwrap()],
        2,
        &cfg,
    )
    .unwrap();
    assert!(infeasible.flrep().is_err());
}

#[test]
fn backends_agree_on_generators() {
    let f = cube01::<f64>(3, &GeomCfg::default()).unwrap();
    let dd = cube01::<DDouble>(3, &GeomCfg::default()).unwrap();
    let q = cube01::<BigRational>(3, &GeomCfg::default()).unwrap();
    assert_eq!(f.f_vector().unwrap(), dd.f_vector().unwrap());
    assert_eq!(f.f_vector().unwrap(), q.f_vector().unwrap());
    assert_eq!(q.hrep().unwrap().len(), 6);

    let qs = simplex::<BigRational>(4, &GeomCfg::default()).unwrap();
    assert_eq!(qs.hrep().unwrap().len(), 5);
    let qh = cube01_hrep::<BigRational>(3, &GeomCfg::default()).unwrap();
    assert_eq!(qh.vrep().unwrap().len(), 8);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(8))]

    #[test]
    fn ellipsoid_grids_in_four_dimensions(
        axes in proptest::collection::vec(0.5f64..2.0, 4),
        shift in proptest::collection::vec(-3.0f64..3.0, 4),
        polar in 2usize..=3,
        azimuth in 3usize..=5,
    ) {
        let cfg = GeomCfg::<f64>::default();
        let center = Vector::new(shift);
        let e = ellipsoid(&center, &Vector::new(axes.clone()), polar, azimuth, &cfg).unwrap();
        prop_assert_eq!(e.polytope_dim().unwrap(), 4);
        e.flrep().unwrap().check_invariants().unwrap();
        for p in e.vrep().unwrap() {
            let level: f64 = (0..4).map(|i| ((p[i] - center[i]) / axes[i]).powi(2)).sum();
            prop_assert!((level - 1.0).abs() < 1e-9);
        }
        prop_assert!(e.contains(&center).unwrap());
        assert_hrep_supports(&e);

        let s = sphere(&center, &1.0, polar, azimuth, &cfg).unwrap();
        let moved = s.shift(&-&center).unwrap();
        prop_assert_eq!(moved, sphere(&Vector::zeros(4), &1.0, polar, azimuth, &cfg).unwrap());
    }
}
