//! Double-double arithmetic: an unevaluated sum `hi + lo` of two `f64`.
//!
//! Gives roughly 106 bits of mantissa using error-free transformations
//! (`two_sum`, `two_prod` via fused multiply-add). Transcendentals are
//! accurate to first order in `lo`, which is enough for shape generators.
//!
//! References
//! - Hida, Li, Bailey: "Library for Double-Double and Quad-Double Arithmetic".

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use num::traits::{One, Zero};

use super::Field;

/// Extended precision scalar.
///
/// Invariants:
/// - Normalized: `|lo| <= ulp(hi) / 2`, so derived equality is value equality.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DDouble {
    hi: f64,
    lo: f64,
}

#[inline]
fn two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let bb = s - a;
    let err = (a - (s - bb)) + (b - bb);
    (s, err)
}

#[inline]
fn quick_two_sum(a: f64, b: f64) -> (f64, f64) {
    let s = a + b;
    let err = b - (s - a);
    (s, err)
}

#[inline]
fn two_prod(a: f64, b: f64) -> (f64, f64) {
    let p = a * b;
    let err = a.mul_add(b, -p);
    (p, err)
}

impl DDouble {
    pub const PI: DDouble = DDouble {
        hi: std::f64::consts::PI,
        lo: 1.224_646_799_147_353_2e-16,
    };

    #[inline]
    pub fn new(hi: f64, lo: f64) -> Self {
        let (hi, lo) = two_sum(hi, lo);
        Self { hi, lo }
    }

    #[inline]
    pub fn hi(&self) -> f64 {
        self.hi
    }

    #[inline]
    pub fn lo(&self) -> f64 {
        self.lo
    }
}

impl From<f64> for DDouble {
    #[inline]
    fn from(x: f64) -> Self {
        Self { hi: x, lo: 0.0 }
    }
}

impl fmt::Display for DDouble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.lo == 0.0 {
            write!(f, "{}", self.hi)
        } else {
            write!(f, "{}{:+e}", self.hi, self.lo)
        }
    }
}

impl PartialOrd for DDouble {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.hi.partial_cmp(&other.hi) {
            Some(Ordering::Equal) => self.lo.partial_cmp(&other.lo),
            ord => ord,
        }
    }
}

impl Neg for DDouble {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self {
            hi: -self.hi,
            lo: -self.lo,
        }
    }
}

impl Add for DDouble {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        let (s, e) = two_sum(self.hi, rhs.hi);
        let (t, f) = two_sum(self.lo, rhs.lo);
        let (s, e) = quick_two_sum(s, e + t);
        let (hi, lo) = quick_two_sum(s, e + f);
        Self { hi, lo }
    }
}

impl Sub for DDouble {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self + (-rhs)
    }
}

impl Mul for DDouble {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let (p, e) = two_prod(self.hi, rhs.hi);
        let e = e + (self.hi * rhs.lo + self.lo * rhs.hi);
        let (hi, lo) = quick_two_sum(p, e);
        Self { hi, lo }
    }
}

impl Div for DDouble {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        let q1 = self.hi / rhs.hi;
        let r = self - rhs * DDouble::from(q1);
        let q2 = r.hi / rhs.hi;
        let r = r - rhs * DDouble::from(q2);
        let q3 = r.hi / rhs.hi;
        let (hi, lo) = quick_two_sum(q1, q2);
        DDouble { hi, lo } + DDouble::from(q3)
    }
}

impl AddAssign for DDouble {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for DDouble {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for DDouble {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Zero for DDouble {
    #[inline]
    fn zero() -> Self {
        Self { hi: 0.0, lo: 0.0 }
    }
    #[inline]
    fn is_zero(&self) -> bool {
        self.hi == 0.0 && self.lo == 0.0
    }
}

impl One for DDouble {
    #[inline]
    fn one() -> Self {
        Self { hi: 1.0, lo: 0.0 }
    }
}

impl Field for DDouble {
    #[inline]
    fn abs(&self) -> Self {
        if self.hi < 0.0 {
            -*self
        } else {
            *self
        }
    }

    /// One Newton step on top of the `f64` square root.
    fn sqrt(&self) -> Self {
        if self.hi <= 0.0 {
            return Self::zero();
        }
        let x = DDouble::from(self.hi.sqrt());
        let residual = *self - x * x;
        x + DDouble::from(residual.hi * (0.5 / x.hi))
    }

    fn sin(&self) -> Self {
        DDouble::from(self.hi.sin()) + DDouble::from(self.lo * self.hi.cos())
    }

    fn cos(&self) -> Self {
        DDouble::from(self.hi.cos()) - DDouble::from(self.lo * self.hi.sin())
    }

    fn acos(&self) -> Self {
        DDouble::from(self.to_f64().clamp(-1.0, 1.0).acos())
    }

    #[inline]
    fn pi() -> Self {
        Self::PI
    }

    #[inline]
    fn from_f64(x: f64) -> Self {
        DDouble::from(x)
    }

    #[inline]
    fn to_f64(&self) -> f64 {
        self.hi + self.lo
    }

    fn from_i64(x: i64) -> Self {
        let hi = x as f64;
        // i64 values above 2^53 do not fit in one f64.
        let lo = (x as i128 - hi as i128) as f64;
        DDouble::new(hi, lo)
    }

    fn to_i64(&self) -> i64 {
        (self.hi.trunc() as i64).saturating_add(self.lo.trunc() as i64)
    }

    /// `f64::total_cmp` on the high word, then on the low word.
    #[inline]
    fn total_cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.hi
            .total_cmp(&other.hi)
            .then_with(|| self.lo.total_cmp(&other.lo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn third_times_three_is_one_to_double_double_precision() {
        let third = DDouble::one() / DDouble::from(3.0);
        let back = third * DDouble::from(3.0);
        let err = (back - DDouble::one()).abs();
        assert!(err.to_f64() < 1e-30);
    }

    #[test]
    fn addition_keeps_low_order_bits() {
        let big = DDouble::from(1.0);
        let tiny = DDouble::from(1e-20);
        let sum = big + tiny;
        assert_eq!(sum.hi(), 1.0);
        assert!((sum.lo() - 1e-20).abs() < 1e-35);
        assert!(sum > big);
    }

    #[test]
    fn sqrt_two_squared() {
        let r = DDouble::from(2.0).sqrt();
        let err = (r * r - DDouble::from(2.0)).abs();
        assert!(err.to_f64() < 1e-30);
    }

    #[test]
    fn large_integers_round_trip() {
        let x = (1i64 << 60) + 7;
        assert_eq!(DDouble::from_i64(x).to_i64(), x);
    }
}
