//! The ring of p-adic integers with tracked precision.
//!
//! A `Zp` is a residue class modulo p^N interpreted as an element of Z_p
//! known to absolute precision N. The precision of every arithmetic result
//! is derived from the operands: binary operations return min(N_a, N_b),
//! and extracting k factors of p (`unit_part`) costs exactly k digits.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use iwasawa_integers::modular::{p_adic_valuation, sqrt_mod_prime, teichmuller_character};
use iwasawa_integers::Integer;
use num_traits::{One, Zero};

use crate::error::{PadicError, Result};

/// A p-adic integer with tracked absolute precision.
///
/// Invariants: the stored value lies in [0, p^N); `prime` and `precision`
/// are immutable after construction. The prime is taken on the caller's
/// word — it is validated to be ≥ 2 but not tested for primality.
#[derive(Clone)]
pub struct Zp {
    prime: u64,
    precision: usize,
    value: Integer,
}

pub(crate) fn validate(prime: u64, precision: usize) -> Result<()> {
    if prime < 2 {
        return Err(PadicError::invalid(format!("prime must be >= 2, got {prime}")));
    }
    if precision < 1 {
        return Err(PadicError::invalid("precision must be >= 1"));
    }
    Ok(())
}

impl Zp {
    /// Creates the zero element of Z_p at the given precision.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `prime < 2` or `precision < 1`.
    pub fn new(prime: u64, precision: usize) -> Result<Self> {
        validate(prime, precision)?;
        Ok(Self {
            prime,
            precision,
            value: Integer::zero(),
        })
    }

    /// Creates a p-adic integer from an arbitrary-precision value.
    ///
    /// The value is reduced into the canonical range [0, p^N); negative
    /// inputs land on their non-negative residue.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `prime < 2` or `precision < 1`.
    pub fn from_integer(prime: u64, precision: usize, value: Integer) -> Result<Self> {
        validate(prime, precision)?;
        let p_power = power_of(prime, precision);
        Ok(Self {
            prime,
            precision,
            value: value.rem_euclid(&p_power),
        })
    }

    /// Creates a p-adic integer from an i64.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `prime < 2` or `precision < 1`.
    pub fn from_i64(prime: u64, precision: usize, value: i64) -> Result<Self> {
        Self::from_integer(prime, precision, Integer::new(value))
    }

    /// Creates a p-adic integer from a u64.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `prime < 2` or `precision < 1`.
    pub fn from_u64(prime: u64, precision: usize, value: u64) -> Result<Self> {
        Self::from_integer(prime, precision, Integer::from(value))
    }

    /// The multiplicative identity at the given precision.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `prime < 2` or `precision < 1`.
    pub fn one(prime: u64, precision: usize) -> Result<Self> {
        Self::from_integer(prime, precision, Integer::one())
    }

    /// Reduces a rational a/b into Z_p.
    ///
    /// The fraction is put in lowest terms first; the reduced denominator
    /// must then be a p-adic unit.
    ///
    /// # Errors
    ///
    /// `Domain` if `den` is zero or if p divides the reduced denominator
    /// (such values live in Q_p, not Z_p); `InvalidArgument` on bad
    /// prime/precision.
    pub fn from_rational(num: Integer, den: Integer, prime: u64, precision: usize) -> Result<Self> {
        validate(prime, precision)?;
        if den.is_zero() {
            return Err(PadicError::domain("denominator cannot be zero"));
        }
        if num.is_zero() {
            return Self::new(prime, precision);
        }

        let g = num.gcd(&den);
        let num = num / &g;
        let den = den / &g;

        let p = Integer::from(prime);
        if den.is_divisible_by(&p) {
            return Err(PadicError::domain(
                "denominator is not a p-adic unit; use Qp for negative valuation",
            ));
        }

        let p_power = power_of(prime, precision);
        let inv = den
            .rem_euclid(&p_power)
            .mod_inverse(&p_power)
            .expect("unit denominator is invertible");
        Self::from_integer(prime, precision, num * inv)
    }

    /// Returns the prime p.
    #[must_use]
    pub fn prime(&self) -> u64 {
        self.prime
    }

    /// Returns the absolute precision N.
    #[must_use]
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Returns the canonical representative in [0, p^N).
    #[must_use]
    pub fn to_integer(&self) -> Integer {
        self.value.clone()
    }

    /// Returns p^N for this value's precision.
    pub(crate) fn modulus(&self) -> Integer {
        power_of(self.prime, self.precision)
    }

    /// Truncates to a lower precision, or formally lifts to a higher one.
    ///
    /// Lifting never refines the value: the extra digits are zero.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `new_precision < 1`.
    pub fn with_precision(&self, new_precision: usize) -> Result<Self> {
        validate(self.prime, new_precision)?;
        Self::from_integer(self.prime, new_precision, self.value.clone())
    }

    /// Extends the formal precision; a no-op when `new_precision <= N`.
    ///
    /// The mathematical value is not refined — the new digits are zero.
    #[must_use]
    pub fn lift_precision(&self, new_precision: usize) -> Self {
        if new_precision <= self.precision {
            return self.clone();
        }
        Self {
            prime: self.prime,
            precision: new_precision,
            value: self.value.clone(),
        }
    }

    /// Returns true if the representative is zero (the value is O(p^N)).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    /// Returns true if the representative is one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.value.is_one()
    }

    /// Returns true if this value is a unit in Z_p (p does not divide it).
    #[must_use]
    pub fn is_unit(&self) -> bool {
        !self.value.is_divisible_by(&Integer::from(self.prime))
    }

    /// The p-adic valuation of the representative.
    ///
    /// Zero is only known to be divisible by p^N, so its valuation is
    /// reported as the precision.
    #[must_use]
    pub fn valuation(&self) -> u64 {
        if self.is_zero() {
            return self.precision as u64;
        }
        p_adic_valuation(&self.value, self.prime)
    }

    /// Strips the p-part, returning value / p^v at precision N − v.
    ///
    /// Pulling out k factors of p costs k digits of precision; this
    /// deduction is a hard invariant. Zero and units are returned as-is.
    #[must_use]
    pub fn unit_part(&self) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let val = self.valuation();
        if val == 0 {
            return self.clone();
        }
        let divisor = power_of(self.prime, val as usize);
        Self {
            prime: self.prime,
            precision: self.precision - val as usize,
            value: self.value.clone() / divisor,
        }
    }

    /// Divides by a unit.
    ///
    /// # Errors
    ///
    /// `Domain` on a zero divisor or a divisor divisible by p (division by
    /// non-units leaves Z_p — promote to `Qp`); `InvalidArgument` on
    /// mismatched primes.
    pub fn div(&self, other: &Self) -> Result<Self> {
        if self.prime != other.prime {
            return Err(mismatched_primes(self.prime, other.prime));
        }
        if other.is_zero() {
            return Err(PadicError::domain("division by zero"));
        }
        if !other.is_unit() {
            return Err(PadicError::domain("cannot divide by non-unit in Zp"));
        }

        let min_prec = self.precision.min(other.precision);
        let p_power = power_of(self.prime, min_prec);
        let inv = other
            .value
            .rem_euclid(&p_power)
            .mod_inverse(&p_power)
            .expect("unit is invertible modulo p^N");
        Self::from_integer(self.prime, min_prec, self.value.clone() * inv)
    }

    /// The reciprocal of a unit.
    ///
    /// # Errors
    ///
    /// `Domain` if this value is zero or not a unit.
    pub fn inv(&self) -> Result<Self> {
        Zp::div(&Self::one(self.prime, self.precision)?, self)
    }

    /// Raises to a non-negative machine-word power via modular
    /// exponentiation in Z/p^N.
    #[must_use]
    pub fn pow(&self, exp: u64) -> Self {
        Self {
            prime: self.prime,
            precision: self.precision,
            value: self.value.pow_mod(&Integer::from(exp), &self.modulus()),
        }
    }

    /// Raises to a non-negative arbitrary-precision power.
    ///
    /// # Errors
    ///
    /// `Domain` on a negative exponent — inverses leave Z_p; promote to
    /// `Qp` instead.
    pub fn pow_big(&self, exp: &Integer) -> Result<Self> {
        if exp.is_negative() {
            return Err(PadicError::domain(
                "negative exponents are not defined on Zp; promote to Qp",
            ));
        }
        Ok(Self {
            prime: self.prime,
            precision: self.precision,
            value: self.value.pow_mod(exp, &self.modulus()),
        })
    }

    /// The Teichmüller lift: the unique ω with ω^{p−1} = 1 and
    /// ω ≡ self (mod p), to full precision N.
    ///
    /// # Errors
    ///
    /// `Domain` if this value is not a unit.
    pub fn teichmuller(&self) -> Result<Self> {
        if !self.is_unit() {
            return Err(PadicError::domain(
                "Teichmüller lift requires a unit in Zp",
            ));
        }
        Ok(Self {
            prime: self.prime,
            precision: self.precision,
            value: teichmuller_character(&self.value, self.prime, self.precision),
        })
    }

    /// A square root in Z_p, Hensel-lifted to full precision.
    ///
    /// For odd p the residue mod p must be a quadratic residue; for p = 2
    /// the value must be ≡ 1 (mod 8).
    ///
    /// # Errors
    ///
    /// `Domain` for non-units and for values with no square root.
    pub fn sqrt(&self) -> Result<Self> {
        if !self.is_unit() {
            return Err(PadicError::domain(
                "square root only defined for units in Zp",
            ));
        }

        if self.prime == 2 {
            return self.sqrt_two_adic();
        }

        let root0 = sqrt_mod_prime(&self.value, self.prime).ok_or_else(|| {
            PadicError::domain("no square root exists (not a quadratic residue)")
        })?;

        // Linear Hensel lifting: one digit per step. With r^2 ≡ x (mod p^k)
        // and f = (r^2 − x)/p^k, the correction c = f · (2r)^{-1} (mod p)
        // gives r − c·p^k ≡ sqrt(x) (mod p^{k+1}).
        let p = Integer::from(self.prime);
        let mut root = root0;
        let two_root_inv = (Integer::new(2) * &root)
            .mod_inverse(&p)
            .expect("2r is a unit for odd p");

        for k in 1..self.precision {
            let pk = power_of(self.prime, k);
            let pk1 = &pk * &p;
            let f = (&root * &root - &self.value).rem_euclid(&pk1);
            if !f.is_zero() {
                let correction = ((f / &pk) * &two_root_inv).rem_euclid(&p);
                root = (root - correction * pk).rem_euclid(&pk1);
            }
        }

        Self::from_integer(self.prime, self.precision, root)
    }

    /// 2-adic square root: requires x ≡ 1 (mod 8), lifts from root 1.
    fn sqrt_two_adic(&self) -> Result<Self> {
        // The stored value is in [0, 2^N), so below precision 3 this
        // reduces to the value itself and still rejects 3 (mod 4).
        let eight = Integer::new(8);
        if self.value.rem_euclid(&eight) != Integer::one() {
            return Err(PadicError::domain("no square root exists (mod 8 condition)"));
        }

        // If r^2 ≡ x (mod 2^k) with k ≥ 3 and r odd, then r or r + 2^{k−1}
        // is a root mod 2^{k+1}.
        let mut root = Integer::one();
        for k in 3..self.precision {
            let pk1 = power_of(2, k + 1);
            let f = (&root * &root - &self.value).rem_euclid(&pk1);
            if !f.is_zero() {
                root = root + power_of(2, k - 1);
            }
        }

        Self::from_integer(self.prime, self.precision, root)
    }

    /// The base-p digits [v mod p, (v/p) mod p, ...], of length N.
    #[must_use]
    pub fn p_adic_digits(&self) -> Vec<u64> {
        let p = Integer::from(self.prime);
        let mut digits = Vec::with_capacity(self.precision);
        let mut temp = self.value.clone();

        for _ in 0..self.precision {
            digits.push(
                (&temp % &p)
                    .to_u64()
                    .expect("a base-p digit fits in a machine word"),
            );
            temp = temp / &p;
        }

        digits
    }
}

pub(crate) fn power_of(prime: u64, exp: usize) -> Integer {
    Integer::from(prime).pow(u32::try_from(exp).expect("precision fits u32"))
}

fn mismatched_primes(a: u64, b: u64) -> PadicError {
    PadicError::invalid(format!("cannot mix p-adic numbers with primes {a} and {b}"))
}

fn binary_op(lhs: &Zp, rhs: &Zp, f: impl FnOnce(&Integer, &Integer) -> Integer) -> Zp {
    assert_eq!(
        lhs.prime, rhs.prime,
        "cannot mix p-adic numbers with different primes"
    );
    let precision = lhs.precision.min(rhs.precision);
    let p_power = power_of(lhs.prime, precision);
    Zp {
        prime: lhs.prime,
        precision,
        value: f(&lhs.value, &rhs.value).rem_euclid(&p_power),
    }
}

impl Add for &Zp {
    type Output = Zp;

    /// # Panics
    ///
    /// Panics if the operands carry different primes.
    fn add(self, rhs: Self) -> Zp {
        binary_op(self, rhs, |a, b| a + b)
    }
}

impl Sub for &Zp {
    type Output = Zp;

    /// # Panics
    ///
    /// Panics if the operands carry different primes.
    fn sub(self, rhs: Self) -> Zp {
        binary_op(self, rhs, |a, b| a - b)
    }
}

impl Mul for &Zp {
    type Output = Zp;

    /// # Panics
    ///
    /// Panics if the operands carry different primes.
    fn mul(self, rhs: Self) -> Zp {
        binary_op(self, rhs, |a, b| a * b)
    }
}

impl Add for Zp {
    type Output = Zp;

    fn add(self, rhs: Self) -> Zp {
        &self + &rhs
    }
}

impl Sub for Zp {
    type Output = Zp;

    fn sub(self, rhs: Self) -> Zp {
        &self - &rhs
    }
}

impl Mul for Zp {
    type Output = Zp;

    fn mul(self, rhs: Self) -> Zp {
        &self * &rhs
    }
}

impl Div for &Zp {
    type Output = Zp;

    /// # Panics
    ///
    /// Panics on division by zero or by a non-unit; use [`Zp::div`] for a
    /// fallible version.
    fn div(self, rhs: Self) -> Zp {
        Zp::div(self, rhs).expect("division by non-unit in Zp")
    }
}

impl Div for Zp {
    type Output = Zp;

    fn div(self, rhs: Self) -> Zp {
        &self / &rhs
    }
}

impl Neg for &Zp {
    type Output = Zp;

    fn neg(self) -> Zp {
        let p_power = self.modulus();
        let value = (&p_power - &self.value).rem_euclid(&p_power);
        Zp {
            prime: self.prime,
            precision: self.precision,
            value,
        }
    }
}

impl Neg for Zp {
    type Output = Zp;

    fn neg(self) -> Zp {
        -&self
    }
}

impl PartialEq for Zp {
    /// Residue equality truncated to min(N_a, N_b).
    ///
    /// Truncated equality is not transitive across mixed precisions, so
    /// `Eq` and `Hash` are deliberately not implemented.
    fn eq(&self, other: &Self) -> bool {
        if self.prime != other.prime {
            return false;
        }
        let p_power = power_of(self.prime, self.precision.min(other.precision));
        self.value.rem_euclid(&p_power) == other.value.rem_euclid(&p_power)
    }
}

impl fmt::Debug for Zp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {}^{})", self.value, self.prime, self.precision)
    }
}

impl fmt::Display for Zp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (mod {}^{})", self.value, self.prime, self.precision)
    }
}
