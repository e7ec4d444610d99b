//! Property-based tests for arbitrary precision arithmetic.

#[cfg(test)]
mod tests {
    use num_traits::{One, Zero};
    use proptest::prelude::*;

    use crate::modular::{p_adic_valuation, pow_mod, sqrt_mod_prime, teichmuller_character};
    use crate::{Integer, Rational};

    // Strategy for generating small integers
    fn small_int() -> impl Strategy<Value = i64> {
        -1000i64..1000i64
    }

    // Strategy for generating non-zero integers
    fn non_zero_int() -> impl Strategy<Value = i64> {
        prop_oneof![(-1000i64..=-1i64), (1i64..=1000i64)]
    }

    proptest! {
        // Integer ring axioms

        #[test]
        fn integer_add_commutative(a in small_int(), b in small_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            prop_assert_eq!(a.clone() + b.clone(), b + a);
        }

        #[test]
        fn integer_distributive(a in small_int(), b in small_int(), c in small_int()) {
            let a = Integer::new(a);
            let b = Integer::new(b);
            let c = Integer::new(c);
            prop_assert_eq!(
                a.clone() * (b.clone() + c.clone()),
                a.clone() * b + a * c
            );
        }

        #[test]
        fn integer_additive_inverse(a in small_int()) {
            let a = Integer::new(a);
            let neg_a = -a.clone();
            prop_assert!((a + neg_a).is_zero());
        }

        // Modular arithmetic laws

        #[test]
        fn mod_inverse_multiplies_to_one(a in non_zero_int(), m in 2i64..10_000) {
            let a = Integer::new(a);
            let m = Integer::new(m);
            if a.gcd(&m).is_one() {
                let inv = a.mod_inverse(&m).expect("coprime values are invertible");
                prop_assert!((a * inv).rem_euclid(&m).is_one());
            } else {
                prop_assert!(a.mod_inverse(&m).is_none());
            }
        }

        #[test]
        fn pow_mod_matches_exact(base in 0u64..100, exp in 0u64..12, m in 2u64..1000) {
            let exact = Integer::from(base).pow(u32::try_from(exp).unwrap());
            let expected = exact.rem_euclid(&Integer::from(m)).to_u64().unwrap();
            prop_assert_eq!(pow_mod(base, exp, m), expected);
        }

        #[test]
        fn valuation_strips_exactly(unit in 1u64..500, k in 0u64..8) {
            // 5 ∤ unit after this adjustment
            let unit = if unit % 5 == 0 { unit + 1 } else { unit };
            let value = Integer::from(unit) * Integer::from(5u64).pow(u32::try_from(k).unwrap());
            prop_assert_eq!(p_adic_valuation(&value, 5), k);
        }

        #[test]
        fn teichmuller_is_root_of_unity(x in 1u64..13) {
            let p = 13u64;
            let precision = 6usize;
            let p_power = Integer::from(p).pow(6);
            let omega = teichmuller_character(&Integer::from(x), p, precision);

            prop_assert_eq!(
                omega.pow_mod(&Integer::new(12), &p_power),
                Integer::one()
            );
            prop_assert_eq!(
                omega.rem_euclid(&Integer::from(p)),
                Integer::from(x)
            );
        }

        #[test]
        fn sqrt_mod_prime_squares_back(a in 1u64..13) {
            let root = sqrt_mod_prime(&Integer::from(a), 13);
            if let Some(r) = root {
                let r = r.to_u64().unwrap();
                prop_assert_eq!((r * r) % 13, a);
            }
        }

        // Rational coefficient laws

        #[test]
        fn rational_mul_commutative(
            num_a in small_int(),
            den_a in non_zero_int(),
            num_b in small_int(),
            den_b in non_zero_int()
        ) {
            let a = Rational::ratio(num_a, den_a);
            let b = Rational::ratio(num_b, den_b);
            prop_assert_eq!(a.clone() * b.clone(), b * a);
        }

        #[test]
        fn rational_multiplicative_inverse(
            num in non_zero_int(),
            den in non_zero_int()
        ) {
            let a = Rational::ratio(num, den);
            let inv = a.recip();
            prop_assert!((a * inv).is_one());
        }

        #[test]
        fn rational_parts_are_reduced(num in small_int(), den in non_zero_int()) {
            let (n, d) = Rational::ratio(num, den).to_parts();

            // Positive denominator, lowest terms, same fraction
            prop_assert!(!d.is_negative());
            prop_assert!(n.gcd(&d).is_one() || n.is_zero());
            prop_assert_eq!(n * Integer::new(den), Integer::new(num) * d);
        }
    }
}
