//! Bernoulli numbers, exact and character-twisted.
//!
//! Ordinary B_k are carried as exact rationals and memoized globally;
//! generalized Bernoulli numbers B_{n,χ} are assembled from the Bernoulli
//! polynomials, B_{n,χ} = f^{n−1} Σ_{a=1}^{f} χ(a)·B_n(a/f), with the
//! character values accumulated in the cyclotomic ring and the finished
//! sum evaluated back into Q_p.

use std::sync::LazyLock;

use iwasawa_cyclotomic::Cyclotomic;
use iwasawa_integers::{Integer, Rational};
use iwasawa_padic::error::Result;
use iwasawa_padic::Qp;
use num_traits::{One, Zero};
use parking_lot::Mutex;

static BERNOULLI_CACHE: LazyLock<Mutex<Vec<Rational>>> =
    LazyLock::new(|| Mutex::new(vec![Rational::one(), Rational::ratio(-1, 2)]));

/// The binomial coefficient C(n, k) by the multiplicative formula.
fn binomial(n: u64, k: u64) -> Integer {
    let k = k.min(n - k);
    let mut result = Integer::one();
    for i in 1..=k {
        result = result * Integer::from(n - k + i) / Integer::from(i);
    }
    result
}

/// The k-th Bernoulli number, exactly.
///
/// Computed by the recurrence B_m = −(1/(m+1)) Σ_{j<m} C(m+1, j) B_j and
/// memoized in an append-only global table.
#[must_use]
pub fn bernoulli_number(k: usize) -> Rational {
    let mut cache = BERNOULLI_CACHE.lock();

    while cache.len() <= k {
        let m = cache.len();
        if m % 2 == 1 {
            // Odd Bernoulli numbers past B_1 vanish
            cache.push(Rational::zero());
            continue;
        }

        let mut acc = Rational::zero();
        for (j, b) in cache.iter().enumerate() {
            if b.is_zero() {
                continue;
            }
            let c = binomial(
                u64::try_from(m + 1).expect("index fits u64"),
                u64::try_from(j).expect("index fits u64"),
            );
            acc = acc + Rational::from(c) * b.clone();
        }

        let divisor = Rational::from(i64::try_from(m + 1).expect("index fits i64"));
        cache.push(-(acc / divisor));
    }

    cache[k].clone()
}

/// The Bernoulli polynomial B_n(x) = Σ_k C(n, k) B_k x^{n−k}, exactly.
#[must_use]
pub fn bernoulli_polynomial(n: u64, x: &Rational) -> Rational {
    let mut result = Rational::zero();
    for k in 0..=n {
        let b = bernoulli_number(usize::try_from(k).expect("index fits usize"));
        if b.is_zero() {
            continue;
        }
        let c = Rational::from(binomial(n, k));
        let power = x.pow(u32::try_from(n - k).expect("exponent fits u32"));
        result = result + c * b * power;
    }
    result
}

/// The generalized Bernoulli number B_{n,χ} as a p-adic number.
///
/// `chi` supplies χ(a) in the cyclotomic ring; the higher-order passing
/// lets the caller decide how values are produced and cached.
///
/// # Errors
///
/// Propagates `Domain`/`InvalidArgument` errors from the character
/// callback and the p-adic reduction of the exact coefficients.
pub fn generalized_bernoulli<F>(
    n: u64,
    conductor: u64,
    chi: F,
    prime: u64,
    precision: usize,
) -> Result<Qp>
where
    F: Fn(i64) -> Result<Cyclotomic>,
{
    let f = Rational::from(i64::try_from(conductor).expect("conductor fits i64"));
    let f_power = if n == 0 {
        f.recip()
    } else {
        f.pow(u32::try_from(n - 1).expect("exponent fits u32"))
    };

    let mut sum = Cyclotomic::new(prime, precision)?;

    for a in 1..=conductor {
        let chi_a = chi(i64::try_from(a).expect("residue fits i64"))?;
        if chi_a.is_zero() {
            continue;
        }

        let x = Rational::ratio(
            i64::try_from(a).expect("residue fits i64"),
            i64::try_from(conductor).expect("conductor fits i64"),
        );
        let coefficient = &f_power * &bernoulli_polynomial(n, &x);
        let (num, den) = coefficient.to_parts();
        let scalar = Qp::from_rational(num, den, prime, precision)?;

        sum = &sum + &chi_a.scale(&scalar);
    }

    sum.to_qp()
}
