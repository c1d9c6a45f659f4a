//! Points and vectors of fixed dimension over a generic field.
//!
//! Storage is an `nalgebra::DVector`; arithmetic is written elementwise so the
//! only bound needed from nalgebra is `Scalar`. There is deliberately no
//! `PartialEq`: point equality is tolerance-aware and goes through
//! `GeomCfg::eq_vec`.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Index, Mul, Neg, Sub};

use nalgebra::DVector;

use crate::numeric::Field;

/// Point or direction in R^d.
///
/// Invariants:
/// - `dim()` never changes after construction.
#[derive(Clone, Debug)]
pub struct Vector<T: Field> {
    coords: DVector<T>,
}

impl<T: Field> Vector<T> {
    #[inline]
    pub fn new(coords: Vec<T>) -> Self {
        Self {
            coords: DVector::from_vec(coords),
        }
    }

    #[inline]
    pub fn from_slice(coords: &[T]) -> Self {
        Self::new(coords.to_vec())
    }

    /// Convenience for literals in tests and generators.
    pub fn from_f64s(coords: &[f64]) -> Self {
        Self::new(coords.iter().map(|&x| T::from_f64(x)).collect())
    }

    #[inline]
    pub fn zeros(dim: usize) -> Self {
        Self::new(vec![T::zero(); dim])
    }

    /// Standard basis vector `e_i`.
    pub fn unit(dim: usize, i: usize) -> Self {
        let mut coords = vec![T::zero(); dim];
        coords[i] = T::one();
        Self::new(coords)
    }

    #[inline]
    pub fn from_dvector(coords: DVector<T>) -> Self {
        Self { coords }
    }

    #[inline]
    pub fn dim(&self) -> usize {
        self.coords.len()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.coords.as_slice()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.coords.iter()
    }

    #[inline]
    pub fn as_dvector(&self) -> &DVector<T> {
        &self.coords
    }

    pub fn scale(&self, s: &T) -> Self {
        self.map(|x| x.clone() * s.clone())
    }

    pub fn div_scalar(&self, s: &T) -> Self {
        self.map(|x| x.clone() / s.clone())
    }

    pub fn map(&self, f: impl Fn(&T) -> T) -> Self {
        Self::new(self.iter().map(f).collect())
    }

    /// `self + s * other` without an intermediate allocation for `s * other`.
    pub fn add_scaled(&self, s: &T, other: &Self) -> Self {
        debug_assert_eq!(self.dim(), other.dim());
        Self::new(
            self.iter()
                .zip(other.iter())
                .map(|(a, b)| a.clone() + s.clone() * b.clone())
                .collect(),
        )
    }

    /// Append coordinates equal to `pad` until the dimension is `dim`.
    pub fn lift_up(&self, dim: usize, pad: &T) -> Self {
        let mut coords: Vec<T> = self.iter().cloned().collect();
        while coords.len() < dim {
            coords.push(pad.clone());
        }
        Self::new(coords)
    }

    #[inline]
    pub fn expand_to(&self, dim: usize) -> Self {
        self.lift_up(dim, &T::zero())
    }

    /// Exact lexicographic order; a total order for sorting, not a geometric test.
    pub fn lex_cmp_exact(&self, other: &Self) -> Ordering {
        for (a, b) in self.iter().zip(other.iter()) {
            match a.total_cmp(b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        self.dim().cmp(&other.dim())
    }

    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.iter().map(Field::to_f64).collect()
    }

    /// Arithmetic mean of a non-empty set of points.
    pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Vector<T>>) -> Option<Self> {
        let mut it = points.into_iter();
        let first = it.next()?.clone();
        let mut count = 1i64;
        let sum = it.fold(first, |acc, p| {
            count += 1;
            &acc + p
        });
        Some(sum.div_scalar(&T::from_i64(count)))
    }
}

impl<T: Field> Index<usize> for Vector<T> {
    type Output = T;
    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.coords[i]
    }
}

impl<T: Field> Add<&Vector<T>> for &Vector<T> {
    type Output = Vector<T>;
    fn add(self, rhs: &Vector<T>) -> Vector<T> {
        debug_assert_eq!(self.dim(), rhs.dim());
        Vector::new(
            self.iter()
                .zip(rhs.iter())
                .map(|(a, b)| a.clone() + b.clone())
                .collect(),
        )
    }
}

impl<T: Field> Sub<&Vector<T>> for &Vector<T> {
    type Output = Vector<T>;
    fn sub(self, rhs: &Vector<T>) -> Vector<T> {
        debug_assert_eq!(self.dim(), rhs.dim());
        Vector::new(
            self.iter()
                .zip(rhs.iter())
                .map(|(a, b)| a.clone() - b.clone())
                .collect(),
        )
    }
}

impl<T: Field> Add for Vector<T> {
    type Output = Vector<T>;
    #[inline]
    fn add(self, rhs: Vector<T>) -> Vector<T> {
        &self + &rhs
    }
}

impl<T: Field> Sub for Vector<T> {
    type Output = Vector<T>;
    #[inline]
    fn sub(self, rhs: Vector<T>) -> Vector<T> {
        &self - &rhs
    }
}

impl<T: Field> Neg for &Vector<T> {
    type Output = Vector<T>;
    fn neg(self) -> Vector<T> {
        self.map(|x| -x.clone())
    }
}

impl<T: Field> Neg for Vector<T> {
    type Output = Vector<T>;
    #[inline]
    fn neg(self) -> Vector<T> {
        -&self
    }
}

impl<T: Field> Mul<&T> for &Vector<T> {
    type Output = Vector<T>;
    #[inline]
    fn mul(self, rhs: &T) -> Vector<T> {
        self.scale(rhs)
    }
}

impl<T: Field> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, x) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{x}")?;
        }
        write!(f, ")")
    }
}

impl<T: Field> From<Vec<T>> for Vector<T> {
    #[inline]
    fn from(coords: Vec<T>) -> Self {
        Self::new(coords)
    }
}
