//! The p-adic logarithm and exponential.
//!
//! `log` converges exactly on units congruent to 1 modulo p (modulo 4 for
//! p = 2) and is evaluated by the Mercator series log(1+u) = Σ (−1)^{n+1}
//! u^n/n. Every term with p | n loses digits to the division, so the
//! series runs at a raised working precision N' = N + ⌊log_p(2N)⌋ + 5 and
//! the sum is truncated back to N at the end. Naive truncation produces
//! silently wrong low-order digits.
//!
//! `exp` is the verification helper for `log`; `iwasawa_log` extends the
//! logarithm to all of Q_p^× along the Iwasawa branch (log p = 0,
//! log ω(u) = 0).

use crate::error::{PadicError, Result};
use crate::qp::Qp;
use crate::zp::Zp;

use iwasawa_integers::Integer;
use num_traits::One;

/// Minimal valuation of x − 1 for the Mercator series to converge.
fn convergence_valuation(p: u64) -> i64 {
    if p == 2 {
        2
    } else {
        1
    }
}

/// Digits lost to divisions by powers of p among the first `terms`
/// denominators: ⌊log_p(terms)⌋.
fn division_losses(p: u64, terms: usize) -> usize {
    let mut losses = 0;
    let mut pk = u128::from(p);
    while pk <= terms as u128 {
        losses += 1;
        pk *= u128::from(p);
    }
    losses
}

/// The p-adic logarithm.
///
/// Defined exactly when x has valuation 0 and x ≡ 1 (mod p) — mod 4 for
/// p = 2. Satisfies log(xy) = log(x) + log(y) on that domain and
/// exp(log(x)) = x to the returned precision.
///
/// # Errors
///
/// `Domain` for zero, for nonzero valuation, and for units outside the
/// congruence domain.
pub fn log(x: &Qp) -> Result<Qp> {
    if x.is_zero() {
        return Err(PadicError::domain("logarithm of zero is undefined"));
    }
    if x.valuation() != 0 {
        return Err(PadicError::domain("p-adic logarithm requires valuation 0"));
    }

    let p = x.prime();
    let n = x.precision();

    let u0 = x - &Qp::one(p, n)?;
    if u0.is_zero() {
        // x ≡ 1 to full precision: the series vanishes at this precision
        return Qp::new(p, n);
    }
    if u0.valuation() < convergence_valuation(p) {
        return Err(PadicError::domain(if p == 2 {
            "p-adic logarithm does not converge: x must be ≡ 1 (mod 4)"
        } else {
            "p-adic logarithm does not converge: x must be ≡ 1 (mod p)"
        }));
    }

    let working = n + division_losses(p, 2 * n) + 5;
    let x_w = x.with_precision(working)?;
    let u = &x_w - &Qp::one(p, working)?;

    // Termination: the term u^k/k has valuation ≥ k·v(u) − v_p(k), so the
    // tail past `terms` cannot touch the working window.
    let v_u = usize::try_from(u.valuation()).expect("convergent u has positive valuation");
    let terms = (working / v_u + 10).min(3 * working);

    let mut result = u.clone();
    let mut u_power = &u * &u;

    for k in 2..=terms {
        let divisor = Qp::from_i64(p, working, i64::try_from(k).expect("term index fits i64"))?;
        let term = u_power.div(&divisor)?;

        if term.valuation() < working as i64 {
            if k % 2 == 1 {
                result = &result + &term;
            } else {
                result = &result - &term;
            }
        } else {
            break;
        }

        u_power = &u_power * &u;
        if u_power.valuation() >= working as i64 {
            break;
        }
    }

    result.with_precision(n)
}

/// The logarithm of a unit in Z_p.
///
/// # Errors
///
/// `Domain` for non-units and for units not ≡ 1 (mod p).
pub fn log_unit(x: &Zp) -> Result<Qp> {
    if !x.is_unit() {
        return Err(PadicError::domain("log_unit requires a unit in Zp"));
    }
    log(&Qp::from(x))
}

/// The p-adic exponential Σ x^n/n!.
///
/// Converges exactly when v(x) ≥ 1 (≥ 2 for p = 2). This is the
/// component's verification helper: `exp(log(x)) = x` on the log domain.
///
/// # Errors
///
/// `Domain` when the convergence condition fails.
pub fn exp(x: &Qp) -> Result<Qp> {
    let p = x.prime();
    let n = x.precision();

    if x.is_zero() {
        return Qp::one(p, n);
    }
    if x.valuation() < convergence_valuation(p) {
        return Err(PadicError::domain(
            "p-adic exponential requires valuation >= 1 (>= 2 for p = 2)",
        ));
    }

    // v_p(k!) ≤ k/(p−1), so pad the working window against the factorial
    // divisions over the whole term range.
    let working = n + (2 * n) / (p as usize - 1).max(1) + 5;
    let terms = 2 * working;

    let x_w = x.with_precision(working)?;
    let mut result = Qp::one(p, working)?;
    let mut x_power = x_w.clone();
    let mut factorial = Integer::one();

    for k in 1..=terms {
        let term = x_power.div(&Qp::from_integer(p, working, factorial.clone())?)?;
        if term.valuation() >= working as i64 {
            break;
        }
        result = &result + &term;

        x_power = &x_power * &x_w;
        factorial = factorial * Integer::from(u64::try_from(k + 1).expect("term index fits u64"));
    }

    result.with_precision(n)
}

/// The principal-unit part u / ω(u) of a unit, congruent to 1 (mod p)
/// — mod 4 for p = 2, where ω is the sign ±1.
///
/// # Errors
///
/// `Domain` for non-units.
pub fn principal_unit(u: &Zp) -> Result<Zp> {
    if !u.is_unit() {
        return Err(PadicError::domain("principal unit part requires a unit in Zp"));
    }

    if u.prime() == 2 {
        if u.precision() >= 2
            && u.to_integer().rem_euclid(&Integer::new(4)) == Integer::new(3)
        {
            return Ok(-u);
        }
        return Ok(u.clone());
    }

    let omega = u.teichmuller()?;
    u.div(&omega)
}

/// The Iwasawa-branch logarithm, total on Q_p^×.
///
/// Defined by log p := 0 and log ω(u) := 0: the valuation is discarded
/// and the Teichmüller part of the unit divided out, after which the
/// ordinary series applies. Agrees with [`log`] on its domain.
///
/// # Errors
///
/// `Domain` only for zero.
pub fn iwasawa_log(x: &Qp) -> Result<Qp> {
    if x.is_zero() {
        return Err(PadicError::domain("logarithm of zero is undefined"));
    }
    if x.prime() == 2 && x.precision() < 2 {
        // At one digit of precision every 2-adic logarithm is O(2)
        return Qp::new(2, 1);
    }
    let principal = principal_unit(&x.unit_part())?;
    log(&Qp::from(principal))
}
