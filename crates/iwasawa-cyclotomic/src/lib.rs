//! # iwasawa-cyclotomic
//!
//! The p-adic cyclotomic ring Q_p[X]/(X^{p−1} − 1).
//!
//! The class of X, written `zeta`, is a primitive (p−1)-th root of unity;
//! character values and Gauss sums are accumulated here as formal sums of
//! root-of-unity powers with `Qp` coefficients. The (p−1)-th roots of
//! unity also live inside Z_p itself as Teichmüller lifts, which is what
//! `to_qp` exploits: evaluating ζ ↦ ω(g) (g the smallest primitive root
//! mod p) maps a finished sum back into Q_p exactly.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use iwasawa_integers::modular::primitive_root;
use iwasawa_padic::error::Result;
use iwasawa_padic::{Qp, Zp};

/// An element of Q_p[X]/(X^{p−1} − 1).
///
/// Stored as the coefficient vector of 1, ζ, ..., ζ^{p−2}. For p = 2 the
/// ring collapses to Q_2 (a single coefficient).
#[derive(Clone)]
pub struct Cyclotomic {
    prime: u64,
    precision: usize,
    coeffs: Vec<Qp>,
}

/// The number of coefficients: p − 1, or 1 when p = 2.
fn ring_rank(prime: u64) -> usize {
    usize::try_from(prime - 1).expect("rank fits usize").max(1)
}

impl Cyclotomic {
    /// The zero element.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` on bad prime/precision.
    pub fn new(prime: u64, precision: usize) -> Result<Self> {
        let zero = Qp::new(prime, precision)?;
        Ok(Self {
            prime,
            precision,
            coeffs: vec![zero; ring_rank(prime)],
        })
    }

    /// Embeds a Q_p scalar as a constant.
    #[must_use]
    pub fn from_qp(scalar: Qp) -> Self {
        let prime = scalar.prime();
        let precision = scalar.precision();
        let mut coeffs = vec![
            Qp::new(prime, precision).expect("scalar carries valid parameters");
            ring_rank(prime)
        ];
        coeffs[0] = scalar;
        Self {
            prime,
            precision,
            coeffs,
        }
    }

    /// The primitive (p−1)-th root of unity ζ.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` on bad prime/precision.
    pub fn zeta(prime: u64, precision: usize) -> Result<Self> {
        Self::zeta_pow(prime, precision, 1)
    }

    /// ζ^k, with k reduced modulo p − 1.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` on bad prime/precision.
    pub fn zeta_pow(prime: u64, precision: usize, k: u64) -> Result<Self> {
        let mut result = Self::new(prime, precision)?;
        let rank = ring_rank(prime) as u64;
        let index = usize::try_from(k % rank).expect("index fits usize");
        result.coeffs[index] = Qp::one(prime, precision)?;
        Ok(result)
    }

    /// Returns the prime p.
    #[must_use]
    pub fn prime(&self) -> u64 {
        self.prime
    }

    /// Returns the construction precision.
    #[must_use]
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// The coefficient of ζ^i.
    ///
    /// # Panics
    ///
    /// Panics if `i >= p − 1`.
    #[must_use]
    pub fn coefficient(&self, i: usize) -> &Qp {
        &self.coeffs[i]
    }

    /// Returns true when every coefficient is zero to its precision.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.iter().all(Qp::is_zero)
    }

    /// Multiplies every coefficient by a Q_p scalar.
    ///
    /// # Panics
    ///
    /// Panics if the scalar carries a different prime.
    #[must_use]
    pub fn scale(&self, scalar: &Qp) -> Self {
        Self {
            prime: self.prime,
            precision: self.precision.min(scalar.precision()),
            coeffs: self.coeffs.iter().map(|c| c * scalar).collect(),
        }
    }

    /// Raises to a non-negative power by repeated squaring.
    #[must_use]
    pub fn pow(&self, mut exp: u64) -> Self {
        let mut result = Self::from_qp(
            Qp::one(self.prime, self.precision).expect("element carries valid parameters"),
        );
        let mut base = self.clone();

        while exp > 0 {
            if exp & 1 == 1 {
                result = &result * &base;
            }
            base = &base * &base;
            exp >>= 1;
        }

        result
    }

    /// Evaluates at ζ ↦ ω(g), mapping the element into Q_p.
    ///
    /// ω(g) is the Teichmüller lift of the smallest primitive root mod p,
    /// a primitive (p−1)-th root of unity in Z_p — the evaluation is a
    /// ring homomorphism onto Q_p and is exact on everything the character
    /// layer produces.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` propagated from construction edge cases.
    pub fn to_qp(&self) -> Result<Qp> {
        if self.prime == 2 {
            return Ok(self.coeffs[0].clone());
        }

        let g = primitive_root(self.prime);
        let omega = Qp::from(Zp::from_u64(self.prime, self.precision, g)?.teichmuller()?);

        // Horner evaluation at ω
        let mut acc = Qp::new(self.prime, self.precision)?;
        for c in self.coeffs.iter().rev() {
            acc = &(&acc * &omega) + c;
        }
        Ok(acc)
    }
}

impl Add for &Cyclotomic {
    type Output = Cyclotomic;

    /// # Panics
    ///
    /// Panics if the operands carry different primes.
    fn add(self, rhs: Self) -> Cyclotomic {
        assert_eq!(
            self.prime, rhs.prime,
            "cannot mix cyclotomic elements with different primes"
        );
        Cyclotomic {
            prime: self.prime,
            precision: self.precision.min(rhs.precision),
            coeffs: self
                .coeffs
                .iter()
                .zip(&rhs.coeffs)
                .map(|(a, b)| a + b)
                .collect(),
        }
    }
}

impl Sub for &Cyclotomic {
    type Output = Cyclotomic;

    /// # Panics
    ///
    /// Panics if the operands carry different primes.
    fn sub(self, rhs: Self) -> Cyclotomic {
        self + &(-rhs)
    }
}

impl Neg for &Cyclotomic {
    type Output = Cyclotomic;

    fn neg(self) -> Cyclotomic {
        Cyclotomic {
            prime: self.prime,
            precision: self.precision,
            coeffs: self.coeffs.iter().map(|c| -c).collect(),
        }
    }
}

impl Mul for &Cyclotomic {
    type Output = Cyclotomic;

    /// Cyclic convolution: ζ^{p−1} = 1.
    ///
    /// # Panics
    ///
    /// Panics if the operands carry different primes.
    fn mul(self, rhs: Self) -> Cyclotomic {
        assert_eq!(
            self.prime, rhs.prime,
            "cannot mix cyclotomic elements with different primes"
        );

        let rank = self.coeffs.len();
        let precision = self.precision.min(rhs.precision);
        let zero = Qp::new(self.prime, precision).expect("element carries valid parameters");
        let mut coeffs = vec![zero; rank];

        for (i, a) in self.coeffs.iter().enumerate() {
            if a.is_zero() {
                continue;
            }
            for (j, b) in rhs.coeffs.iter().enumerate() {
                if b.is_zero() {
                    continue;
                }
                let k = (i + j) % rank;
                coeffs[k] = &coeffs[k] + &(a * b);
            }
        }

        Cyclotomic {
            prime: self.prime,
            precision,
            coeffs,
        }
    }
}

impl Add for Cyclotomic {
    type Output = Cyclotomic;

    fn add(self, rhs: Self) -> Cyclotomic {
        &self + &rhs
    }
}

impl Sub for Cyclotomic {
    type Output = Cyclotomic;

    fn sub(self, rhs: Self) -> Cyclotomic {
        &self - &rhs
    }
}

impl Mul for Cyclotomic {
    type Output = Cyclotomic;

    fn mul(self, rhs: Self) -> Cyclotomic {
        &self * &rhs
    }
}

impl Neg for Cyclotomic {
    type Output = Cyclotomic;

    fn neg(self) -> Cyclotomic {
        -&self
    }
}

impl PartialEq for Cyclotomic {
    fn eq(&self, other: &Self) -> bool {
        self.prime == other.prime
            && self
                .coeffs
                .iter()
                .zip(&other.coeffs)
                .all(|(a, b)| a == b)
    }
}

impl fmt::Debug for Cyclotomic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (i, c) in self.coeffs.iter().enumerate() {
            if c.is_zero() {
                continue;
            }
            if !first {
                write!(f, " + ")?;
            }
            first = false;
            if i == 0 {
                write!(f, "{c}")?;
            } else {
                write!(f, "({c})*z^{i}")?;
            }
        }
        if first {
            write!(f, "0 (mod {}^{})", self.prime, self.precision)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeta_has_full_order() {
        let zeta = Cyclotomic::zeta(5, 8).unwrap();
        let one = Cyclotomic::from_qp(Qp::one(5, 8).unwrap());

        assert_eq!(zeta.pow(4), one);
        assert_ne!(zeta.pow(2), one);
    }

    #[test]
    fn test_ring_arithmetic() {
        let zeta = Cyclotomic::zeta(5, 8).unwrap();
        let z3 = Cyclotomic::zeta_pow(5, 8, 3).unwrap();

        // ζ * ζ^3 = ζ^4 = 1
        let prod = &zeta * &z3;
        assert_eq!(prod, Cyclotomic::from_qp(Qp::one(5, 8).unwrap()));

        // (1 + ζ) − ζ = 1
        let sum = &Cyclotomic::from_qp(Qp::one(5, 8).unwrap()) + &zeta;
        assert_eq!(
            &sum - &zeta,
            Cyclotomic::from_qp(Qp::one(5, 8).unwrap())
        );
    }

    #[test]
    fn test_to_qp_sends_zeta_to_teichmuller_root() {
        // For p = 5 the smallest primitive root is 2; ω(2)^2 = ω(4) = −1
        let z2 = Cyclotomic::zeta_pow(5, 8, 2).unwrap();
        let value = z2.to_qp().unwrap();
        let minus_one = Qp::from_i64(5, 8, -1).unwrap();
        assert_eq!(value, minus_one);
    }

    #[test]
    fn test_to_qp_is_multiplicative() {
        let a = &Cyclotomic::zeta(7, 6).unwrap()
            + &Cyclotomic::from_qp(Qp::from_i64(7, 6, 3).unwrap());
        let b = Cyclotomic::zeta_pow(7, 6, 4).unwrap();
        let prod = &a * &b;

        let lhs = prod.to_qp().unwrap();
        let rhs = &a.to_qp().unwrap() * &b.to_qp().unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_scale() {
        let zeta = Cyclotomic::zeta(5, 8).unwrap();
        let two = Qp::from_i64(5, 8, 2).unwrap();
        let scaled = zeta.scale(&two);
        assert_eq!(scaled.coefficient(1), &two);
        assert!(scaled.coefficient(0).is_zero());
    }

    #[test]
    fn test_p_equals_two_collapses() {
        let x = Cyclotomic::from_qp(Qp::from_i64(2, 6, 3).unwrap());
        assert_eq!(x.to_qp().unwrap(), Qp::from_i64(2, 6, 3).unwrap());
    }
}
