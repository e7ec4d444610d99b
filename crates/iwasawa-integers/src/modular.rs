//! Modular arithmetic helpers.
//!
//! Free functions shared by the p-adic layers: p-adic valuations of
//! integers, Teichmüller characters modulo p^N, primitive roots, and
//! square roots modulo a prime.

use num_traits::{One, Zero};

use crate::Integer;

/// Computes base^exp mod modulus over machine words.
///
/// # Panics
///
/// Panics if `modulus` is zero.
#[must_use]
pub fn pow_mod(base: u64, mut exp: u64, modulus: u64) -> u64 {
    assert!(modulus != 0, "modulus cannot be zero");
    if modulus == 1 {
        return 0;
    }

    let mut result = 1u64;
    let mut base = u128::from(base % modulus);
    let m = u128::from(modulus);

    while exp > 0 {
        if exp & 1 == 1 {
            result = ((u128::from(result) * base) % m) as u64;
        }
        base = (base * base) % m;
        exp >>= 1;
    }

    result
}

/// Counts the factors of `p` in a nonzero integer.
///
/// The zero element has infinite valuation; callers representing zero must
/// handle it before calling (`Zp::valuation` reports its precision there).
///
/// # Panics
///
/// Panics if `value` is zero or `p < 2`.
#[must_use]
pub fn p_adic_valuation(value: &Integer, p: u64) -> u64 {
    assert!(!value.is_zero(), "valuation of zero is infinite");
    assert!(p >= 2, "prime must be >= 2");

    let p = Integer::from(p);
    let mut v = value.clone();
    let mut count = 0;

    while v.is_divisible_by(&p) {
        v = v / &p;
        count += 1;
    }

    count
}

/// Computes the Teichmüller character ω(x) modulo p^N.
///
/// ω(x) is the unique (p−1)-th root of unity in Z/p^N congruent to x
/// modulo p, reached as the fixed point of the Frobenius x ↦ x^p. Each
/// iteration gains one p-adic digit, so N iterations suffice.
///
/// The caller guarantees that x is a unit modulo p; a non-unit input maps
/// to 0.
#[must_use]
pub fn teichmuller_character(x: &Integer, p: u64, precision: usize) -> Integer {
    let p_big = Integer::from(p);
    let p_power = p_big.pow(u32::try_from(precision).expect("precision fits u32"));

    let mut omega = x.rem_euclid(&p_power);
    if omega.is_divisible_by(&p_big) {
        return Integer::zero();
    }

    for _ in 0..precision {
        omega = omega.pow_mod(&p_big, &p_power);
    }

    omega
}

/// Finds the smallest primitive root modulo an odd prime p.
///
/// g is primitive iff g^((p−1)/q) ≢ 1 (mod p) for every prime q | p−1.
///
/// # Panics
///
/// Panics if `p < 3` (2 has the trivial unit group and no use for this).
#[must_use]
pub fn primitive_root(p: u64) -> u64 {
    assert!(p >= 3, "primitive_root requires an odd prime");

    let prime_divisors: Vec<u64> = factorize(p - 1).into_iter().map(|(q, _)| q).collect();

    let mut g = 2;
    loop {
        if prime_divisors
            .iter()
            .all(|&q| pow_mod(g, (p - 1) / q, p) != 1)
        {
            return g;
        }
        g += 1;
    }
}

/// Factors n into prime powers by trial division, smallest prime first.
#[must_use]
pub fn factorize(mut n: u64) -> Vec<(u64, u32)> {
    let mut factors = Vec::new();
    if n < 2 {
        return factors;
    }

    let mut p = 2;
    while p * p <= n {
        if n % p == 0 {
            let mut k = 0;
            while n % p == 0 {
                n /= p;
                k += 1;
            }
            factors.push((p, k));
        }
        p += if p == 2 { 1 } else { 2 };
    }
    if n > 1 {
        factors.push((n, 1));
    }

    factors
}

/// Returns the divisors of n in ascending order.
#[must_use]
pub fn divisors(n: u64) -> Vec<u64> {
    let mut result = vec![1];
    for (p, k) in factorize(n) {
        let current = result.clone();
        let mut power = 1;
        for _ in 0..k {
            power *= p;
            result.extend(current.iter().map(|d| d * power));
        }
    }
    result.sort_unstable();
    result
}

/// Euler's totient φ(n).
#[must_use]
pub fn euler_phi(n: u64) -> u64 {
    if n == 0 {
        return 0;
    }
    factorize(n)
        .into_iter()
        .map(|(p, k)| p.pow(k - 1) * (p - 1))
        .product()
}

/// Computes a square root of `a` modulo an odd prime p by Tonelli–Shanks.
///
/// Returns `None` when `a` is a quadratic non-residue. Zero maps to zero.
///
/// # Panics
///
/// Panics if `p` is even.
#[must_use]
pub fn sqrt_mod_prime(a: &Integer, p: u64) -> Option<Integer> {
    assert!(p % 2 == 1, "sqrt_mod_prime requires an odd prime");

    let a = a.rem_euclid(&Integer::from(p)).to_u64().expect("residue fits u64");
    if a == 0 {
        return Some(Integer::zero());
    }

    // Legendre symbol
    if pow_mod(a, (p - 1) / 2, p) != 1 {
        return None;
    }

    // p ≡ 3 (mod 4): a^((p+1)/4) is a root
    if p % 4 == 3 {
        return Some(Integer::from(pow_mod(a, (p + 1) / 4, p)));
    }

    // Write p − 1 = q · 2^s with q odd
    let mut q = p - 1;
    let mut s = 0u32;
    while q % 2 == 0 {
        q /= 2;
        s += 1;
    }

    // Any non-residue serves as the twiddle base
    let mut z = 2;
    while pow_mod(z, (p - 1) / 2, p) != p - 1 {
        z += 1;
    }

    let mul = |x: u64, y: u64| ((u128::from(x) * u128::from(y)) % u128::from(p)) as u64;

    let mut m = s;
    let mut c = pow_mod(z, q, p);
    let mut t = pow_mod(a, q, p);
    let mut r = pow_mod(a, (q + 1) / 2, p);

    while t != 1 {
        let mut i = 0u32;
        let mut t2 = t;
        while t2 != 1 {
            t2 = mul(t2, t2);
            i += 1;
        }

        let mut b = c;
        for _ in 0..(m - i - 1) {
            b = mul(b, b);
        }

        m = i;
        c = mul(b, b);
        t = mul(t, c);
        r = mul(r, b);
    }

    Some(Integer::from(r))
}
