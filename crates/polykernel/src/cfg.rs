//! Tolerance kernel: every geometric decision goes through `GeomCfg`.
//!
//! Policy
//! - One epsilon per context, passed explicitly (no process-wide statics).
//!   Polytopes and lattices carry a clone of the config they were built with.
//! - `EQ(a) ⇔ |a| < eps`, `GT(a) ⇔ a > eps`, `GE(a) ⇔ a ≥ −eps`,
//!   `LT(a) ⇔ a < −eps`, `LE(a) ⇔ a ≤ eps`; binary forms compare `a − b`.
//! - Exact comparisons of field values are reserved for structural sorting
//!   (`Field::total_cmp`, `Vector::lex_cmp_exact`).

use std::cmp::Ordering;

use crate::error::{GeomError, GeomResult};
use crate::linalg::Vector;
use crate::numeric::Field;

/// Default comparison tolerance.
pub const DEFAULT_EPS: f64 = 1e-8;

/// Geometry configuration (tolerance).
///
/// Invariants:
/// - `eps > 0`.
#[derive(Clone, Debug)]
pub struct GeomCfg<T: Field = f64> {
    eps: T,
}

impl<T: Field> Default for GeomCfg<T> {
    fn default() -> Self {
        Self {
            eps: T::from_f64(DEFAULT_EPS),
        }
    }
}

impl<T: Field> GeomCfg<T> {
    pub fn new(eps: T) -> GeomResult<Self> {
        if eps > T::zero() {
            Ok(Self { eps })
        } else {
            Err(GeomError::InvalidTolerance {
                eps: eps.to_string(),
            })
        }
    }

    #[inline]
    pub fn eps(&self) -> &T {
        &self.eps
    }

    #[inline]
    pub fn eq0(&self, a: &T) -> bool {
        a.abs() < self.eps
    }
    #[inline]
    pub fn ne0(&self, a: &T) -> bool {
        !self.eq0(a)
    }
    #[inline]
    pub fn gt0(&self, a: &T) -> bool {
        *a > self.eps
    }
    #[inline]
    pub fn ge0(&self, a: &T) -> bool {
        *a >= -self.eps.clone()
    }
    #[inline]
    pub fn lt0(&self, a: &T) -> bool {
        *a < -self.eps.clone()
    }
    #[inline]
    pub fn le0(&self, a: &T) -> bool {
        *a <= self.eps
    }
    pub fn cmp0(&self, a: &T) -> Ordering {
        if self.eq0(a) {
            Ordering::Equal
        } else if *a > T::zero() {
            Ordering::Greater
        } else {
            Ordering::Less
        }
    }

    #[inline]
    pub fn eq(&self, a: &T, b: &T) -> bool {
        self.eq0(&(a.clone() - b.clone()))
    }
    #[inline]
    pub fn ne(&self, a: &T, b: &T) -> bool {
        !self.eq(a, b)
    }
    #[inline]
    pub fn gt(&self, a: &T, b: &T) -> bool {
        self.gt0(&(a.clone() - b.clone()))
    }
    #[inline]
    pub fn ge(&self, a: &T, b: &T) -> bool {
        self.ge0(&(a.clone() - b.clone()))
    }
    #[inline]
    pub fn lt(&self, a: &T, b: &T) -> bool {
        self.lt0(&(a.clone() - b.clone()))
    }
    #[inline]
    pub fn le(&self, a: &T, b: &T) -> bool {
        self.le0(&(a.clone() - b.clone()))
    }
    #[inline]
    pub fn cmp(&self, a: &T, b: &T) -> Ordering {
        self.cmp0(&(a.clone() - b.clone()))
    }

    /// Dot product that skips terms with a tolerance-zero factor.
    pub fn dot(&self, a: &Vector<T>, b: &Vector<T>) -> T {
        debug_assert_eq!(a.dim(), b.dim());
        a.iter()
            .zip(b.iter())
            .filter(|(x, y)| self.ne0(x) && self.ne0(y))
            .fold(T::zero(), |acc, (x, y)| acc + x.clone() * y.clone())
    }

    #[inline]
    pub fn norm(&self, a: &Vector<T>) -> T {
        self.dot(a, a).sqrt()
    }

    #[inline]
    pub fn dist(&self, a: &Vector<T>, b: &Vector<T>) -> T {
        self.norm(&(a - b))
    }

    pub fn is_zero_vec(&self, a: &Vector<T>) -> bool {
        a.iter().all(|x| self.eq0(x))
    }

    /// Unit vector in the direction of `a`, snapped (`Field::snap`); a
    /// tolerance-zero `a` is an error.
    pub fn normalize(&self, a: &Vector<T>) -> GeomResult<Vector<T>> {
        let n = self.norm(a);
        if self.eq0(&n) {
            return Err(GeomError::unstable(format!(
                "cannot normalize near-zero vector {a}"
            )));
        }
        Ok(a.div_scalar(&n).map(T::snap))
    }

    /// Lexicographic tolerant order of points.
    pub fn cmp_vec(&self, a: &Vector<T>, b: &Vector<T>) -> Ordering {
        for (x, y) in a.iter().zip(b.iter()) {
            match self.cmp(x, y) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        a.dim().cmp(&b.dim())
    }

    #[inline]
    pub fn eq_vec(&self, a: &Vector<T>, b: &Vector<T>) -> bool {
        self.cmp_vec(a, b) == Ordering::Equal
    }

    /// Converts the tolerance to another field (e.g. for mixed-precision checks).
    pub fn convert<U: Field>(&self) -> GeomCfg<U> {
        GeomCfg {
            eps: U::from_f64(self.eps.to_f64()),
        }
    }
}
