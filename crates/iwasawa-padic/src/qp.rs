//! The field of p-adic numbers.
//!
//! A nonzero `Qp` is a pair (valuation v ∈ Z, unit u ∈ Z_p^×): the value
//! p^v · u. The tracked precision N is the absolute precision of the unit
//! part, so the whole value is known to absolute precision v + N. Zero is
//! stored with a zero unit; it is only known to be O(p^N).
//!
//! Addition follows the O(·) calculus: the sum of p^{v₁}u₁ + O(p^{v₁+N₁})
//! and p^{v₂}u₂ + O(p^{v₂+N₂}) is known to absolute precision
//! min(v₁+N₁, v₂+N₂), and any cancellation re-extracts the valuation at
//! the cost of unit digits. Cancelling everything degenerates to zero at
//! the available precision — correct p-adic semantics, not an error.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use iwasawa_integers::modular::p_adic_valuation;
use iwasawa_integers::Integer;
use num_traits::Zero;

use crate::error::{PadicError, Result};
use crate::zp::{power_of, validate, Zp};

/// A p-adic number: signed valuation plus a unit part in Z_p.
#[derive(Clone)]
pub struct Qp {
    valuation: i64,
    unit: Zp,
}

impl Qp {
    /// Creates the zero element, known to be O(p^N).
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `prime < 2` or `precision < 1`.
    pub fn new(prime: u64, precision: usize) -> Result<Self> {
        Ok(Self {
            valuation: 0,
            unit: Zp::new(prime, precision)?,
        })
    }

    /// Creates a p-adic number from an exact integer.
    ///
    /// The valuation is extracted exactly; the coprime part becomes the
    /// unit at the full requested precision.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `prime < 2` or `precision < 1`.
    pub fn from_integer(prime: u64, precision: usize, value: Integer) -> Result<Self> {
        validate(prime, precision)?;
        if value.is_zero() {
            return Self::new(prime, precision);
        }

        let v = p_adic_valuation(&value, prime);
        let unit_value = value / power_of(prime, v as usize);
        Ok(Self {
            valuation: i64::try_from(v).expect("valuation fits i64"),
            unit: Zp::from_integer(prime, precision, unit_value)?,
        })
    }

    /// Creates a p-adic number from an i64.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `prime < 2` or `precision < 1`.
    pub fn from_i64(prime: u64, precision: usize, value: i64) -> Result<Self> {
        Self::from_integer(prime, precision, Integer::new(value))
    }

    /// The multiplicative identity at the given precision.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `prime < 2` or `precision < 1`.
    pub fn one(prime: u64, precision: usize) -> Result<Self> {
        Self::from_integer(prime, precision, Integer::new(1))
    }

    /// Reduces a rational a/b into Q_p with its exact (possibly negative)
    /// valuation.
    ///
    /// # Errors
    ///
    /// `Domain` if `den` is zero; `InvalidArgument` on bad
    /// prime/precision.
    pub fn from_rational(num: Integer, den: Integer, prime: u64, precision: usize) -> Result<Self> {
        validate(prime, precision)?;
        if den.is_zero() {
            return Err(PadicError::domain("denominator cannot be zero"));
        }
        if num.is_zero() {
            return Self::new(prime, precision);
        }

        let v_num = p_adic_valuation(&num, prime);
        let v_den = p_adic_valuation(&den, prime);
        let num = num / power_of(prime, v_num as usize);
        let den = den / power_of(prime, v_den as usize);

        Ok(Self {
            valuation: i64::try_from(v_num).expect("valuation fits i64")
                - i64::try_from(v_den).expect("valuation fits i64"),
            unit: Zp::from_rational(num, den, prime, precision)?,
        })
    }

    /// Builds p^v · u from parts. The unit must be an actual unit.
    pub(crate) fn from_parts(valuation: i64, unit: Zp) -> Self {
        debug_assert!(unit.is_unit() || unit.is_zero());
        if unit.is_zero() {
            return Self { valuation: 0, unit };
        }
        Self { valuation, unit }
    }

    /// Returns the prime p.
    #[must_use]
    pub fn prime(&self) -> u64 {
        self.unit.prime()
    }

    /// Returns the precision of the unit part.
    #[must_use]
    pub fn precision(&self) -> usize {
        self.unit.precision()
    }

    /// The p-adic valuation. Zero reports its absolute precision: the
    /// value is only known to be divisible by p^N.
    #[must_use]
    pub fn valuation(&self) -> i64 {
        if self.is_zero() {
            return i64::try_from(self.precision()).expect("precision fits i64");
        }
        self.valuation
    }

    /// The absolute precision v + N of the whole value (N for zero).
    #[must_use]
    pub fn absolute_precision(&self) -> i64 {
        let n = i64::try_from(self.precision()).expect("precision fits i64");
        if self.is_zero() {
            n
        } else {
            self.valuation + n
        }
    }

    /// The unit part as a `Zp`.
    #[must_use]
    pub fn unit_part(&self) -> Zp {
        self.unit.clone()
    }

    /// Returns true if this value is zero (to its tracked precision).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.unit.is_zero()
    }

    /// Returns true if this value is one.
    #[must_use]
    pub fn is_one(&self) -> bool {
        !self.is_zero() && self.valuation == 0 && self.unit.is_one()
    }

    /// Truncates or formally lifts the unit precision.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `new_precision < 1`.
    pub fn with_precision(&self, new_precision: usize) -> Result<Self> {
        let unit = self.unit.with_precision(new_precision)?;
        if unit.is_zero() {
            // Truncation can hide a formerly-visible unit
            return Ok(Self { valuation: 0, unit });
        }
        Ok(Self {
            valuation: self.valuation,
            unit,
        })
    }

    /// Converts to `Zp` when the valuation is non-negative.
    ///
    /// The result carries absolute precision v + N.
    ///
    /// # Errors
    ///
    /// `Domain` on negative valuation.
    pub fn to_zp(&self) -> Result<Zp> {
        if self.is_zero() {
            return Zp::new(self.prime(), self.precision());
        }
        if self.valuation < 0 {
            return Err(PadicError::domain(
                "negative valuation: value does not lie in Zp",
            ));
        }
        let v = usize::try_from(self.valuation).expect("checked non-negative");
        Zp::from_integer(
            self.prime(),
            self.precision() + v,
            self.unit.to_integer() * power_of(self.prime(), v),
        )
    }

    /// The canonical integer representative of a non-negative-valuation
    /// value, in [0, p^{v+N}).
    ///
    /// # Errors
    ///
    /// `Domain` on negative valuation.
    pub fn to_integer(&self) -> Result<Integer> {
        Ok(self.to_zp()?.to_integer())
    }

    /// Raises to an integer power; negative exponents invert the unit.
    ///
    /// # Errors
    ///
    /// `Domain` when raising zero to a non-positive power.
    pub fn pow(&self, exp: i64) -> Result<Self> {
        if self.is_zero() {
            if exp <= 0 {
                return Err(PadicError::domain("zero to a non-positive power"));
            }
            return Self::new(self.prime(), self.precision());
        }

        let base = if exp < 0 { self.unit.inv()? } else { self.unit.clone() };
        let magnitude = exp.unsigned_abs();
        Ok(Self::from_parts(
            self.valuation * exp,
            base.pow(magnitude),
        ))
    }

    /// Division.
    ///
    /// # Errors
    ///
    /// `Domain` on a zero divisor; `InvalidArgument` on mismatched primes.
    pub fn div(&self, other: &Self) -> Result<Self> {
        if self.prime() != other.prime() {
            return Err(PadicError::invalid(format!(
                "cannot mix p-adic numbers with primes {} and {}",
                self.prime(),
                other.prime()
            )));
        }
        if other.is_zero() {
            return Err(PadicError::domain("division by zero"));
        }
        if self.is_zero() {
            let abs = self.absolute_precision() - other.valuation;
            return Self::new(self.prime(), clamp_precision(abs));
        }
        Ok(Self::from_parts(
            self.valuation - other.valuation,
            Zp::div(&self.unit, &other.unit)?,
        ))
    }
}

/// Clamps an absolute precision to a representable positive value.
fn clamp_precision(abs: i64) -> usize {
    usize::try_from(abs.max(1)).expect("clamped precision fits usize")
}

impl From<Zp> for Qp {
    /// Promotes a p-adic integer, preserving its absolute precision: the
    /// valuation is extracted and the unit keeps N − v digits.
    fn from(x: Zp) -> Self {
        if x.is_zero() {
            return Self {
                valuation: 0,
                unit: x,
            };
        }
        let v = x.valuation();
        Self {
            valuation: i64::try_from(v).expect("valuation fits i64"),
            unit: x.unit_part(),
        }
    }
}

impl From<&Zp> for Qp {
    fn from(x: &Zp) -> Self {
        Self::from(x.clone())
    }
}

impl Add for &Qp {
    type Output = Qp;

    /// # Panics
    ///
    /// Panics if the operands carry different primes.
    fn add(self, rhs: Self) -> Qp {
        assert_eq!(
            self.prime(),
            rhs.prime(),
            "cannot mix p-adic numbers with different primes"
        );

        if self.is_zero() {
            return truncate_to_abs(rhs, self.absolute_precision());
        }
        if rhs.is_zero() {
            return truncate_to_abs(self, rhs.absolute_precision());
        }

        let prime = self.prime();
        let abs = self.absolute_precision().min(rhs.absolute_precision());
        let v_min = self.valuation.min(rhs.valuation);
        // abs > v_min always: each operand's absolute precision exceeds
        // its own valuation by at least one digit.
        let width = usize::try_from(abs - v_min).expect("width fits usize");
        let modulus = power_of(prime, width);

        let aligned = |x: &Qp| {
            let shift = usize::try_from(x.valuation - v_min).expect("shift fits usize");
            x.unit.to_integer() * power_of(prime, shift)
        };
        let sum = (aligned(self) + aligned(rhs)).rem_euclid(&modulus);

        if sum.is_zero() {
            // Complete cancellation: zero at the surviving precision
            return Qp::new(prime, clamp_precision(abs)).expect("valid precision");
        }

        let k = p_adic_valuation(&sum, prime) as usize;
        let unit_value = sum / power_of(prime, k);
        let unit = Zp::from_integer(prime, width - k, unit_value).expect("width exceeds k");
        Qp::from_parts(v_min + i64::try_from(k).expect("k fits i64"), unit)
    }
}

/// Truncates `x` so its absolute precision does not exceed `abs`.
fn truncate_to_abs(x: &Qp, abs: i64) -> Qp {
    if x.is_zero() {
        return Qp::new(x.prime(), clamp_precision(abs.min(x.absolute_precision())))
            .expect("valid precision");
    }
    if abs <= x.valuation {
        // The other operand's uncertainty swallows this value entirely
        return Qp::new(x.prime(), clamp_precision(abs)).expect("valid precision");
    }
    let unit_prec = usize::try_from(abs - x.valuation)
        .expect("positive by the check above")
        .min(x.precision());
    Qp::from_parts(
        x.valuation,
        x.unit.with_precision(unit_prec).expect("valid precision"),
    )
}

impl Sub for &Qp {
    type Output = Qp;

    /// # Panics
    ///
    /// Panics if the operands carry different primes.
    fn sub(self, rhs: Self) -> Qp {
        self + &(-rhs)
    }
}

impl Mul for &Qp {
    type Output = Qp;

    /// # Panics
    ///
    /// Panics if the operands carry different primes.
    fn mul(self, rhs: Self) -> Qp {
        assert_eq!(
            self.prime(),
            rhs.prime(),
            "cannot mix p-adic numbers with different primes"
        );

        if self.is_zero() {
            let abs = self.absolute_precision() + rhs.valuation();
            return Qp::new(self.prime(), clamp_precision(abs)).expect("valid precision");
        }
        if rhs.is_zero() {
            let abs = rhs.absolute_precision() + self.valuation();
            return Qp::new(self.prime(), clamp_precision(abs)).expect("valid precision");
        }

        Qp::from_parts(self.valuation + rhs.valuation, &self.unit * &rhs.unit)
    }
}

impl Div for &Qp {
    type Output = Qp;

    /// # Panics
    ///
    /// Panics on division by zero; use [`Qp::div`] for a fallible version.
    fn div(self, rhs: Self) -> Qp {
        Qp::div(self, rhs).expect("division by zero in Qp")
    }
}

impl Neg for &Qp {
    type Output = Qp;

    fn neg(self) -> Qp {
        Qp {
            valuation: self.valuation,
            unit: -&self.unit,
        }
    }
}

impl Add for Qp {
    type Output = Qp;

    fn add(self, rhs: Self) -> Qp {
        &self + &rhs
    }
}

impl Sub for Qp {
    type Output = Qp;

    fn sub(self, rhs: Self) -> Qp {
        &self - &rhs
    }
}

impl Mul for Qp {
    type Output = Qp;

    fn mul(self, rhs: Self) -> Qp {
        &self * &rhs
    }
}

impl Div for Qp {
    type Output = Qp;

    fn div(self, rhs: Self) -> Qp {
        &self / &rhs
    }
}

impl Neg for Qp {
    type Output = Qp;

    fn neg(self) -> Qp {
        -&self
    }
}

impl PartialEq for Qp {
    /// Equality to the common absolute precision.
    fn eq(&self, other: &Self) -> bool {
        if self.prime() != other.prime() {
            return false;
        }
        (self - other).is_zero()
    }
}

impl fmt::Debug for Qp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Qp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "0 (mod {}^{})", self.prime(), self.precision());
        }
        if self.valuation == 0 {
            return fmt::Display::fmt(&self.unit, f);
        }
        write!(
            f,
            "{}^{} * {} (mod {}^{})",
            self.prime(),
            self.valuation,
            self.unit.to_integer(),
            self.prime(),
            self.precision()
        )
    }
}
