//! Dense matrices over a generic field.
//!
//! `Matrix<T>` is `nalgebra::DMatrix<T>`; the routines here only rely on the
//! `Scalar` level of nalgebra (construction, indexing, shape) so they work for
//! every `Field`, including the exact backend.

use nalgebra::DMatrix;
use rand::Rng;

use crate::cfg::GeomCfg;
use crate::error::{GeomError, GeomResult};
use crate::linalg::{LinearBasis, Vector};
use crate::numeric::Field;

pub type Matrix<T> = DMatrix<T>;

pub fn identity<T: Field>(dim: usize) -> Matrix<T> {
    DMatrix::from_fn(dim, dim, |i, j| if i == j { T::one() } else { T::zero() })
}

/// Matrix whose rows are `rows`.
pub fn from_rows<T: Field>(rows: &[Vector<T>]) -> GeomResult<Matrix<T>> {
    let ncols = rows.first().map_or(0, Vector::dim);
    if let Some(bad) = rows.iter().find(|r| r.dim() != ncols) {
        return Err(GeomError::mismatch(ncols, bad.dim(), "matrix::from_rows"));
    }
    Ok(DMatrix::from_fn(rows.len(), ncols, |i, j| rows[i][j].clone()))
}

/// `m · v`.
pub fn mul_vec<T: Field>(m: &Matrix<T>, v: &Vector<T>) -> GeomResult<Vector<T>> {
    if m.ncols() != v.dim() {
        return Err(GeomError::mismatch(m.ncols(), v.dim(), "matrix::mul_vec"));
    }
    Ok(Vector::new(
        (0..m.nrows())
            .map(|i| {
                (0..m.ncols()).fold(T::zero(), |acc, j| acc + m[(i, j)].clone() * v[j].clone())
            })
            .collect(),
    ))
}

/// Solve the square system `a · x = b` by Gaussian elimination with partial
/// pivoting. Returns `None` when a pivot is tolerance-zero (singular system).
pub fn solve<T: Field>(a: &Matrix<T>, b: &[T], cfg: &GeomCfg<T>) -> Option<Vector<T>> {
    let n = a.nrows();
    if a.ncols() != n || b.len() != n {
        return None;
    }
    let mut m: Vec<Vec<T>> = (0..n)
        .map(|i| {
            let mut row: Vec<T> = (0..n).map(|j| a[(i, j)].clone()).collect();
            row.push(b[i].clone());
            row
        })
        .collect();
    for col in 0..n {
        let pivot = (col..n).max_by(|&r1, &r2| m[r1][col].abs().total_cmp(&m[r2][col].abs()))?;
        if cfg.eq0(&m[pivot][col]) {
            return None;
        }
        m.swap(col, pivot);
        for r in col + 1..n {
            let f = m[r][col].clone() / m[col][col].clone();
            if f.is_zero() {
                continue;
            }
            for c in col..=n {
                let delta = f.clone() * m[col][c].clone();
                m[r][c] = m[r][c].clone() - delta;
            }
        }
    }
    let mut x = vec![T::zero(); n];
    for r in (0..n).rev() {
        let mut s = m[r][n].clone();
        for c in r + 1..n {
            s = s - m[r][c].clone() * x[c].clone();
        }
        x[r] = s / m[r][r].clone();
    }
    Some(Vector::new(x))
}

/// Rotation by `angle` in the coordinate plane `(i, j)` of R^dim.
pub fn plane_rotation<T: Field>(dim: usize, i: usize, j: usize, angle: &T) -> Matrix<T> {
    let (c, s) = (angle.cos(), angle.sin());
    let mut m = identity::<T>(dim);
    m[(i, i)] = c.clone();
    m[(j, j)] = c;
    m[(i, j)] = -s.clone();
    m[(j, i)] = s;
    m
}

/// Random rotation: Gram–Schmidt on uniform samples, first row flipped if the
/// determinant came out negative.
pub fn random_rotation<T: Field, R: Rng + ?Sized>(
    dim: usize,
    rng: &mut R,
    cfg: &GeomCfg<T>,
) -> GeomResult<Matrix<T>> {
    let mut basis = LinearBasis::empty(dim);
    let mut attempts = 0usize;
    while !basis.is_full_dim() {
        attempts += 1;
        if attempts > 64 * (dim + 1) {
            return Err(GeomError::unstable("random rotation: sampling kept failing"));
        }
        let v = Vector::new((0..dim).map(|_| T::from_f64(rng.gen_range(-1.0..1.0))).collect());
        basis.add_vector(&v, cfg);
    }
    let mut rows: Vec<Vector<T>> = basis.vectors().to_vec();
    if dim > 0 && cfg.lt0(&determinant(&from_rows(&rows)?, cfg)) {
        rows[0] = -&rows[0];
    }
    from_rows(&rows)
}

/// Determinant by elimination (zero on a tolerance-zero pivot).
pub fn determinant<T: Field>(a: &Matrix<T>, cfg: &GeomCfg<T>) -> T {
    let n = a.nrows();
    let mut m: Vec<Vec<T>> = (0..n)
        .map(|i| (0..a.ncols()).map(|j| a[(i, j)].clone()).collect())
        .collect();
    let mut det = T::one();
    for col in 0..n {
        let Some(pivot) =
            (col..n).max_by(|&r1, &r2| m[r1][col].abs().total_cmp(&m[r2][col].abs()))
        else {
            return T::zero();
        };
        if cfg.eq0(&m[pivot][col]) {
            return T::zero();
        }
        if pivot != col {
            m.swap(col, pivot);
            det = -det;
        }
        det = det * m[col][col].clone();
        for r in col + 1..n {
            let f = m[r][col].clone() / m[col][col].clone();
            for c in col..n {
                let delta = f.clone() * m[col][c].clone();
                m[r][c] = m[r][c].clone() - delta;
            }
        }
    }
    det
}
