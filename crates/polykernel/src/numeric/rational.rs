//! Exact rational backend (`num::BigRational`).
//!
//! Arithmetic is exact; `sqrt` and the trigonometric functions round through
//! `f64` and convert back exactly, so generated shapes are rational
//! approximations while every later predicate is exact.
//!
//! Unit vectors (basis vectors, plane normals) are snapped to a `2^-96` grid
//! after normalization. Points keep their exact coordinates; only the frames
//! they are projected with are rounded, and a slightly skewed frame is still
//! an injective linear map, so the face lattice does not change.

use num::bigint::BigInt;
use num::traits::{One, Signed, ToPrimitive, Zero};
use num::BigRational;

use super::Field;

/// Fractional bits kept by `snap`.
const SNAP_BITS: usize = 96;

#[inline]
fn rat(x: f64) -> BigRational {
    BigRational::from_float(x).unwrap_or_else(BigRational::zero)
}

impl Field for BigRational {
    #[inline]
    fn abs(&self) -> Self {
        Signed::abs(self)
    }

    fn sqrt(&self) -> Self {
        if !self.is_positive() {
            return Self::zero();
        }
        // One Newton step in exact arithmetic, then round the result back to
        // f64 precision so denominators stay bounded.
        let x = rat(Field::to_f64(self).sqrt());
        if x.is_zero() {
            return x;
        }
        let refined = (x.clone() + self / &x) / BigRational::from_integer(BigInt::from(2));
        rat(Field::to_f64(&refined))
    }

    fn sin(&self) -> Self {
        rat(Field::to_f64(self).sin())
    }

    fn cos(&self) -> Self {
        rat(Field::to_f64(self).cos())
    }

    fn acos(&self) -> Self {
        rat(Field::to_f64(self).clamp(-1.0, 1.0).acos())
    }

    fn pi() -> Self {
        rat(std::f64::consts::PI)
    }

    #[inline]
    fn from_f64(x: f64) -> Self {
        rat(x)
    }

    /// Scales numerator and denominator to a ~64-bit quotient first, so huge
    /// denominators do not overflow to `inf / inf`.
    fn to_f64(&self) -> f64 {
        let (n, d) = (self.numer(), self.denom());
        if n.is_zero() {
            return 0.0;
        }
        let shift = 64i64 - (n.bits() as i64 - d.bits() as i64);
        let q = if shift >= 0 {
            (n << shift as usize) / d
        } else {
            n / (d << (-shift) as usize)
        };
        q.to_f64().unwrap_or(f64::NAN) * 2f64.powi(-shift as i32)
    }

    #[inline]
    fn from_i64(x: i64) -> Self {
        BigRational::from_integer(BigInt::from(x))
    }

    fn to_i64(&self) -> i64 {
        self.to_integer().to_i64().unwrap_or(0)
    }

    /// Nearest multiple of `2^-SNAP_BITS`.
    fn snap(&self) -> Self {
        let scale = BigRational::from_integer(BigInt::one() << SNAP_BITS);
        (self * &scale).round() / scale
    }

    #[inline]
    fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        Ord::cmp(self, other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arithmetic_is_exact() {
        let third = <BigRational as Field>::from_i64(1) / <BigRational as Field>::from_i64(3);
        let sum = third.clone() + third.clone() + third;
        assert_eq!(sum, <BigRational as Field>::from_i64(1));
    }

    #[test]
    fn from_f64_is_exact_for_dyadics() {
        let x = <BigRational as Field>::from_f64(0.375);
        assert_eq!(x * <BigRational as Field>::from_i64(8), <BigRational as Field>::from_i64(3));
    }

    #[test]
    fn snap_rounds_onto_the_dyadic_grid() {
        let third = <BigRational as Field>::from_i64(1) / <BigRational as Field>::from_i64(3);
        let s = third.snap();
        assert!(s.denom().bits() <= SNAP_BITS as u64 + 1);
        let err = Signed::abs(&(s - third));
        let ulp = BigRational::new(BigInt::one(), BigInt::one() << (SNAP_BITS + 1));
        assert!(err <= ulp);
        let dyadic = <BigRational as Field>::from_f64(-0.375);
        assert_eq!(dyadic.snap(), dyadic);
    }

    #[test]
    fn sqrt_of_perfect_square() {
        let nine = <BigRational as Field>::from_i64(9);
        assert_eq!(Field::sqrt(&nine), <BigRational as Field>::from_i64(3));
    }
}
