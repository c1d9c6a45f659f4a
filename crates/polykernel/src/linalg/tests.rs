use super::*;
use crate::cfg::GeomCfg;
use crate::numeric::BigRational;
use rand::{rngs::StdRng, SeedableRng};

fn v(xs: &[f64]) -> Vector<f64> {
    Vector::from_f64s(xs)
}

#[test]
fn add_vector_rejects_zero_and_dependent_vectors() {
    let cfg = GeomCfg::<f64>::default();
    let mut b = LinearBasis::empty(3);
    assert!(!b.add_vector(&v(&[0.0, 0.0, 0.0]), &cfg));
    assert!(b.add_vector(&v(&[1.0, 1.0, 0.0]), &cfg));
    assert!(!b.add_vector(&v(&[2.0, 2.0, 0.0]), &cfg));
    assert!(!b.add_vector(&v(&[-3.0, -3.0, 1e-10]), &cfg));
    assert!(b.add_vector(&v(&[1.0, 0.0, 0.0]), &cfg));
    assert_eq!(b.rank(), 2);
    assert!(b.add_vector(&v(&[0.0, 0.0, 5.0]), &cfg));
    assert!(b.is_full_dim());
    assert!(!b.add_vector(&v(&[1.0, 2.0, 3.0]), &cfg));
}

#[test]
fn basis_stays_orthonormal() {
    let cfg = GeomCfg::<f64>::default();
    let b = LinearBasis::from_vectors(
        4,
        &[
            v(&[1.0, 2.0, 3.0, 4.0]),
            v(&[1.0, 0.0, 1.0, 0.0]),
            v(&[0.3, -2.0, 0.0, 1.0]),
        ],
        &cfg,
    )
    .unwrap();
    for (i, a) in b.vectors().iter().enumerate() {
        for (j, c) in b.vectors().iter().enumerate() {
            let expect = if i == j { 1.0 } else { 0.0 };
            assert!((cfg.dot(a, c) - expect).abs() < 1e-12);
        }
    }
    let comp = b.orthogonal_complement(&cfg);
    assert_eq!(comp.rank(), 1);
    let n = b.find_orthonormal_vector(&cfg).unwrap();
    for a in b.vectors() {
        assert!(cfg.dot(a, &n).abs() < 1e-12);
    }
}

#[test]
fn affine_projection_round_trips() {
    let cfg = GeomCfg::<f64>::default();
    let pts = [v(&[1.0, 1.0, 1.0]), v(&[2.0, 1.0, 1.0]), v(&[1.0, 3.0, 1.0])];
    let aff = AffineBasis::from_points(&pts, &cfg).unwrap();
    assert_eq!(aff.rank(), 2);
    assert!(!aff.is_full_dim());
    let local = aff.project_points(&pts, &cfg);
    assert!(local.iter().all(|p| p.dim() == 2));
    for (p, q) in pts.iter().zip(&local) {
        assert!(cfg.eq_vec(&aff.to_original(q), p));
    }
    assert!(aff.contains(&v(&[7.0, -2.0, 1.0]), &cfg));
    assert!(!aff.contains(&v(&[1.0, 1.0, 1.1]), &cfg));
    // Local coordinates are isometric.
    let d_amb = cfg.dist(&pts[1], &pts[2]);
    let d_loc = cfg.dist(&local[1], &local[2]);
    assert!((d_amb - d_loc).abs() < 1e-12);
}

#[test]
fn exact_bases_keep_bounded_denominators() {
    use crate::numeric::Field;
    let cfg = GeomCfg::<BigRational>::default();
    let q = |xs: &[f64]| Vector::<BigRational>::from_f64s(xs);
    let pts = [
        q(&[0.25, -1.5, 2.0, 0.75]),
        q(&[1.0, 0.5, -0.25, 2.0]),
        q(&[-2.0, 1.25, 0.5, -0.5]),
        q(&[0.5, 0.5, 1.75, -1.0]),
    ];
    let outer = AffineBasis::from_points(&pts, &cfg).unwrap();
    let local = outer.project_points(&pts, &cfg);
    let inner = AffineBasis::from_points(&local, &cfg).unwrap();
    assert_eq!((outer.rank(), inner.rank()), (3, 3));
    let bounded = |b: &LinearBasis<BigRational>| {
        b.vectors()
            .iter()
            .all(|u| u.iter().all(|x| x.denom().bits() <= 97))
    };
    assert!(bounded(outer.linear()));
    assert!(bounded(inner.linear()));
    for a in inner.linear().vectors() {
        assert!((cfg.dot(a, a).to_f64() - 1.0).abs() < 1e-20);
    }
}

#[test]
fn affine_basis_from_no_points_is_an_error() {
    let cfg = GeomCfg::<f64>::default();
    let none: Vec<Vector<f64>> = Vec::new();
    assert!(AffineBasis::from_points(&none, &cfg).is_err());
}

#[test]
fn solve_and_singular_detection() {
    let cfg = GeomCfg::<f64>::default();
    let a = matrix::from_rows(&[v(&[2.0, 1.0]), v(&[1.0, 3.0])]).unwrap();
    let x = matrix::solve(&a, &[3.0, 5.0], &cfg).unwrap();
    assert!((x[0] - 0.8).abs() < 1e-12 && (x[1] - 1.4).abs() < 1e-12);
    let s = matrix::from_rows(&[v(&[1.0, 2.0]), v(&[2.0, 4.0])]).unwrap();
    assert!(matrix::solve(&s, &[1.0, 2.0], &cfg).is_none());
}

#[test]
fn solve_is_exact_over_rationals() {
    let cfg = GeomCfg::<BigRational>::default();
    let a = matrix::from_rows(&[
        Vector::<BigRational>::from_f64s(&[3.0, 1.0]),
        Vector::<BigRational>::from_f64s(&[1.0, 2.0]),
    ])
    .unwrap();
    let b = [
        <BigRational as crate::numeric::Field>::from_i64(1),
        <BigRational as crate::numeric::Field>::from_i64(1),
    ];
    let x = matrix::solve(&a, &b, &cfg).unwrap();
    // 3x + y = 1, x + 2y = 1  =>  x = 1/5, y = 2/5
    let five = <BigRational as crate::numeric::Field>::from_i64(5);
    assert_eq!(x[0].clone() * five.clone(), <BigRational as crate::numeric::Field>::from_i64(1));
    assert_eq!(x[1].clone() * five, <BigRational as crate::numeric::Field>::from_i64(2));
}

#[test]
fn random_rotation_is_orthogonal_with_positive_determinant() {
    let cfg = GeomCfg::<f64>::default();
    let mut rng = StdRng::seed_from_u64(7);
    for dim in 2..=5 {
        let m = matrix::random_rotation::<f64, _>(dim, &mut rng, &cfg).unwrap();
        for i in 0..dim {
            for j in 0..dim {
                let dot: f64 = (0..dim).map(|k| m[(i, k)] * m[(j, k)]).sum();
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!((dot - expect).abs() < 1e-10);
            }
        }
        assert!(matrix::determinant(&m, &cfg) > 0.0);
    }
}

#[test]
fn plane_rotation_maps_e1_to_e2() {
    let cfg = GeomCfg::<f64>::default();
    let m = matrix::plane_rotation(3, 0, 1, &(std::f64::consts::PI / 2.0));
    let r = matrix::mul_vec(&m, &v(&[1.0, 0.0, 0.0])).unwrap();
    assert!(cfg.eq_vec(&r, &v(&[0.0, 1.0, 0.0])));
    assert!(matrix::mul_vec(&m, &v(&[1.0, 0.0])).is_err());
}

#[test]
fn lift_and_centroid() {
    let p = v(&[1.0, 2.0]);
    let q = p.lift_up(4, &7.0);
    assert_eq!(q.as_slice(), &[1.0, 2.0, 7.0, 7.0]);
    assert_eq!(p.expand_to(3).as_slice(), &[1.0, 2.0, 0.0]);
    let c = Vector::centroid(&[v(&[0.0, 0.0]), v(&[2.0, 0.0]), v(&[1.0, 3.0])]).unwrap();
    assert_eq!(c.as_slice(), &[1.0, 1.0]);
}
