//! Coefficient fields for the geometry kernel.
//!
//! Purpose
//! - Abstract the scalar type so every algorithm runs unchanged over `f64`,
//!   double-double (`DDouble`) and exact rationals (`BigRational`).
//! - Bundle arithmetic identities, ordering, transcendental functions and
//!   conversions into a single trait instead of a numeric type plus a converter.
//!
//! Why this design
//! - Algorithms clone values instead of borrowing through operator bounds; the
//!   bounds stay readable and `BigRational` needs the clones anyway.
//! - Transcendental functions of the exact backend go through `f64`; they are
//!   only used by shape generators, never by predicates.
//!
//! Code cross-refs: `GeomCfg` (all comparisons), `special` (trig users).

use std::fmt::{Debug, Display};
use std::ops::{Add, Div, Mul, Neg, Sub};

use num::traits::{One, Zero};

mod ddouble;
mod rational;

pub use ddouble::DDouble;
pub use num::BigRational;

/// Scalar type usable by the kernel.
///
/// Invariants:
/// - `PartialOrd` must be total on the values the kernel produces (no NaN).
/// - `from_f64(x).to_f64() == x` for finite `x`.
pub trait Field:
    Clone
    + Debug
    + Display
    + PartialEq
    + PartialOrd
    + Send
    + Sync
    + 'static
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
{
    fn abs(&self) -> Self;
    fn sqrt(&self) -> Self;
    fn sin(&self) -> Self;
    fn cos(&self) -> Self;
    fn acos(&self) -> Self;
    fn pi() -> Self;

    fn from_f64(x: f64) -> Self;
    fn to_f64(&self) -> f64;
    fn from_i64(x: i64) -> Self;
    fn to_i64(&self) -> i64;

    /// Rounds a value of magnitude about one (a unit-vector coordinate) onto
    /// a fixed dyadic grid. Identity for the floating backends; the exact
    /// backend uses it so repeated normalization keeps denominators bounded.
    #[inline]
    fn snap(&self) -> Self {
        self.clone()
    }

    /// Integer power by repeated squaring.
    fn powi(&self, n: u32) -> Self {
        let mut base = self.clone();
        let mut acc = Self::one();
        let mut e = n;
        while e > 0 {
            if e & 1 == 1 {
                acc = acc * base.clone();
            }
            base = base.clone() * base;
            e >>= 1;
        }
        acc
    }

    #[inline]
    fn two() -> Self {
        Self::one() + Self::one()
    }

    #[inline]
    fn half(&self) -> Self {
        self.clone() / Self::two()
    }

    /// Exact total order used for structural sorting (never for geometry).
    /// NaN has a fixed place in it, so sorts and argmins stay deterministic.
    fn total_cmp(&self, other: &Self) -> std::cmp::Ordering;
}

impl Field for f64 {
    #[inline]
    fn abs(&self) -> Self {
        f64::abs(*self)
    }
    #[inline]
    fn sqrt(&self) -> Self {
        f64::sqrt(*self)
    }
    #[inline]
    fn sin(&self) -> Self {
        f64::sin(*self)
    }
    #[inline]
    fn cos(&self) -> Self {
        f64::cos(*self)
    }
    #[inline]
    fn acos(&self) -> Self {
        f64::acos(self.clamp(-1.0, 1.0))
    }
    #[inline]
    fn pi() -> Self {
        std::f64::consts::PI
    }
    #[inline]
    fn from_f64(x: f64) -> Self {
        x
    }
    #[inline]
    fn to_f64(&self) -> f64 {
        *self
    }
    #[inline]
    fn from_i64(x: i64) -> Self {
        x as f64
    }
    #[inline]
    fn to_i64(&self) -> i64 {
        *self as i64
    }
    #[inline]
    fn powi(&self, n: u32) -> Self {
        f64::powi(*self, n as i32)
    }
    #[inline]
    fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        f64::total_cmp(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_identities<T: Field>() {
        let two = T::two();
        assert_eq!(two.clone() * T::one(), two);
        assert_eq!(T::from_i64(3).powi(4).to_i64(), 81);
        assert_eq!(T::from_i64(-7).abs(), T::from_i64(7));
        assert!((T::from_f64(2.25).sqrt().to_f64() - 1.5).abs() < 1e-12);
        assert!((T::pi().to_f64() - std::f64::consts::PI).abs() < 1e-12);
        let half_pi = T::pi() / T::two();
        assert!((half_pi.sin().to_f64() - 1.0).abs() < 1e-12);
        assert!(half_pi.cos().to_f64().abs() < 1e-12);
        assert!((T::from_f64(-1.0).acos().to_f64() - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn field_identities_hold_for_all_backends() {
        check_identities::<f64>();
        check_identities::<DDouble>();
        check_identities::<BigRational>();
    }

    #[test]
    fn total_order_places_nan_after_every_number() {
        use std::cmp::Ordering;
        let mut xs = vec![f64::NAN, 1.0, -3.0, 0.5];
        xs.sort_by(Field::total_cmp);
        assert_eq!(&xs[..3], &[-3.0, 0.5, 1.0]);
        assert!(xs[3].is_nan());
        assert_eq!(Field::total_cmp(&f64::NAN, &f64::INFINITY), Ordering::Greater);

        let nan = DDouble::from(f64::NAN);
        assert_eq!(Field::total_cmp(&nan, &DDouble::from(1.0)), Ordering::Greater);
        assert_eq!(Field::total_cmp(&DDouble::from(1.0), &nan), Ordering::Less);
        let above = DDouble::from(1.0) + DDouble::from(1e-20);
        assert_eq!(Field::total_cmp(&DDouble::from(1.0), &above), Ordering::Less);

        let third = <BigRational as Field>::from_i64(1) / <BigRational as Field>::from_i64(3);
        assert_eq!(Field::total_cmp(&third, &<BigRational as Field>::from_f64(0.5)), Ordering::Less);
    }

    #[test]
    fn powi_zero_is_one() {
        assert_eq!(DDouble::from_f64(5.0).powi(0), DDouble::one());
        assert_eq!(<BigRational as Field>::from_i64(5).powi(0), BigRational::one());
    }
}
