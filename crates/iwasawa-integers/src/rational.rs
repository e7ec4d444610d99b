//! Exact rational coefficients for the Bernoulli layer.
//!
//! Generalized Bernoulli numbers are assembled as f^{n−1}·Σ χ(a)·B_n(a/f),
//! and everything in that expression must stay exact until the final
//! reduction into Q_p: the recurrence for B_k, the binomial-weighted
//! polynomial B_n(x), and the powers of a/f. `Rational` carries those
//! intermediate coefficients as reduced fractions over `dashu::RBig`,
//! exposing only what the assembly performs — ratio construction, the
//! ring operations, non-negative powers, a reciprocal for the n = 0
//! normalization, and a numerator/denominator split in exactly the form
//! `Qp::from_rational` consumes.

use dashu::base::{Inverse, UnsignedAbs};
use dashu::rational::RBig;
use num_traits::{One, Zero};
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::Integer;

/// A reduced fraction with a positive denominator; the sign rides on the
/// numerator.
#[derive(Clone, PartialEq, Eq)]
pub struct Rational(RBig);

impl Rational {
    /// The fraction num/den in lowest terms.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    #[must_use]
    pub fn ratio(num: i64, den: i64) -> Self {
        Self::reduced(Integer::new(num), Integer::new(den))
    }

    /// The fraction num/den in lowest terms, from arbitrary-precision
    /// parts.
    ///
    /// # Panics
    ///
    /// Panics if `den` is zero.
    #[must_use]
    pub fn reduced(num: Integer, den: Integer) -> Self {
        assert!(!den.is_zero(), "denominator cannot be zero");
        let num = if den.is_negative() { -num } else { num };
        Self(RBig::from_parts(
            num.into_inner(),
            den.into_inner().unsigned_abs(),
        ))
    }

    /// Splits into (numerator, denominator) — the argument pair
    /// `Qp::from_rational` takes when a finished coefficient is reduced
    /// p-adically.
    #[must_use]
    pub fn to_parts(&self) -> (Integer, Integer) {
        (
            Integer::from(self.0.numerator().clone()),
            Integer::from(dashu::integer::IBig::from(self.0.denominator().clone())),
        )
    }

    /// The reciprocal, for the f^{n−1} factor at n = 0.
    ///
    /// # Panics
    ///
    /// Panics if the value is zero.
    #[must_use]
    pub fn recip(&self) -> Self {
        assert!(!self.is_zero(), "cannot take reciprocal of zero");
        Self(self.0.clone().inv())
    }

    /// self^exp for exp ≥ 0 — the powers of a/f inside B_n(a/f).
    #[must_use]
    pub fn pow(&self, exp: u32) -> Self {
        Self(self.0.pow(exp as usize))
    }
}

impl From<Integer> for Rational {
    fn from(value: Integer) -> Self {
        Self(RBig::from(value.into_inner()))
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Self::from(Integer::new(value))
    }
}

impl Zero for Rational {
    fn zero() -> Self {
        Self(RBig::ZERO)
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl One for Rational {
    fn one() -> Self {
        Self(RBig::ONE)
    }

    fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }
}

impl Add for Rational {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self(self.0 * rhs.0)
    }
}

impl Mul for &Rational {
    type Output = Rational;

    fn mul(self, rhs: Self) -> Self::Output {
        Rational(&self.0 * &rhs.0)
    }
}

impl Div for Rational {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        assert!(!rhs.is_zero(), "division by zero");
        Self(self.0 / rhs.0)
    }
}

impl Neg for Rational {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({})", self.0)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduction_and_sign() {
        let r = Rational::ratio(6, -4);
        let (num, den) = r.to_parts();
        assert_eq!(num.to_i64(), Some(-3));
        assert_eq!(den.to_i64(), Some(2));
    }

    #[test]
    fn test_coefficient_assembly_ops() {
        // The shape of one Bernoulli-polynomial term: C(n,k)·B_k·x^{n−k}
        let binom = Rational::from(Integer::new(15));
        let b_k = Rational::ratio(1, 6);
        let x_power = Rational::ratio(1, 2).pow(4);
        let term = binom * b_k * x_power;
        assert_eq!(term, Rational::ratio(5, 32));

        // The recurrence step: −(acc / (m+1))
        let acc = Rational::ratio(-1, 2);
        assert_eq!(-(acc / Rational::from(3)), Rational::ratio(1, 6));
    }

    #[test]
    fn test_sub_and_ref_mul() {
        let diff = Rational::ratio(1, 16) - Rational::ratio(1, 4);
        assert_eq!(diff, Rational::ratio(-3, 16));

        let f_power = Rational::from(12);
        assert_eq!(&f_power * &diff, Rational::ratio(-9, 4));
    }

    #[test]
    fn test_recip() {
        assert_eq!(Rational::ratio(-3, 7).recip(), Rational::ratio(-7, 3));
        assert!(Rational::from(4).recip().pow(0).is_one());
    }

    #[test]
    fn test_to_parts_of_integer_value() {
        let (num, den) = Rational::from(-12).to_parts();
        assert_eq!(num.to_i64(), Some(-12));
        assert_eq!(den.to_i64(), Some(1));
    }
}
