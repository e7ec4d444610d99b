//! Morita's p-adic gamma function.
//!
//! Γ_p is the continuous extension of the sign-twisted factorial
//! Γ_p(n) = (−1)^n ∏_{0 < j < n, p∤j} j to Z_p. The L-function layer only
//! evaluates it at small integer arguments (the Taylor base points of
//! fractional log-gamma values), so the recurrence is computed directly
//! from the integer representative.

use iwasawa_integers::Integer;
use num_traits::One;

use crate::error::{PadicError, Result};
use crate::log::{log, principal_unit};
use crate::qp::Qp;
use crate::zp::{validate, Zp};

/// Morita's Γ_p at an integer argument.
///
/// # Errors
///
/// `Domain` when the representative does not fit in a machine word —
/// genuinely p-adic arguments are outside this component's contract.
pub fn gamma(z: &Zp) -> Result<Zp> {
    let n = z.to_integer().to_u64().ok_or_else(|| {
        PadicError::domain("gamma is only supported at small integer arguments")
    })?;

    let p = z.prime();
    let p_power = Integer::from(p).pow(
        u32::try_from(z.precision()).expect("precision fits u32"),
    );

    let mut product = Integer::one();
    for j in 1..n {
        if j % p != 0 {
            product = (product * Integer::from(j)).rem_euclid(&p_power);
        }
    }

    let value = if n % 2 == 1 {
        (&p_power - &product).rem_euclid(&p_power)
    } else {
        product
    };

    Zp::from_integer(p, z.precision(), value)
}

/// log Γ_p at an integer argument, along the Iwasawa branch.
///
/// Γ_p(z) is always a unit but rarely ≡ 1 (mod p); the logarithm is taken
/// of its principal-unit part Γ_p(z)/ω(Γ_p(z)). Under this branch the
/// reflection relation log Γ_p(x) + log Γ_p(1−x) = 0 holds exactly.
///
/// # Errors
///
/// `Domain` propagated from [`gamma`].
pub fn log_gamma(z: &Zp) -> Result<Qp> {
    let g = gamma(z)?;
    let principal = principal_unit(&g)?;
    log(&Qp::from(principal))
}

/// The truncated p-adic digamma series
/// ψ_p(n) = −Σ_{1 ≤ k ≤ 2N, p∤k} 1/(n + k − 1).
///
/// The term with n + k − 1 = 0 is skipped. The truncation at 2N terms is
/// inherited from the L-function layer's Taylor expansion of fractional
/// log-gamma arguments; it is a fixed, reproducible rule rather than a
/// convergent tail bound.
///
/// # Errors
///
/// `InvalidArgument` on bad prime/precision.
pub fn digamma(n: i64, prime: u64, precision: usize) -> Result<Qp> {
    validate(prime, precision)?;

    let mut sum = Qp::new(prime, precision)?;
    let bound = 2 * i64::try_from(precision).expect("precision fits i64");

    for k in 1..=bound {
        if u64::try_from(k).expect("k is positive") % prime == 0 {
            continue;
        }
        let denominator = n + k - 1;
        if denominator == 0 {
            continue;
        }
        let term = Qp::one(prime, precision)?.div(&Qp::from_i64(prime, precision, denominator)?)?;
        sum = &sum + &term;
    }

    Ok(-&sum)
}
