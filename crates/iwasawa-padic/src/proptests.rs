//! Property-based tests for tracked-precision p-adic arithmetic.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::log::{exp, log};
    use crate::qp::Qp;
    use crate::zp::Zp;
    use iwasawa_integers::Integer;

    fn primes() -> impl Strategy<Value = u64> {
        prop_oneof![Just(3u64), Just(5), Just(7), Just(13)]
    }

    proptest! {
        // Precision propagation: results carry min(N_a, N_b) and stay in
        // canonical range.

        #[test]
        fn zp_binary_ops_take_min_precision(
            p in primes(),
            na in 1usize..12,
            nb in 1usize..12,
            a in 0i64..10_000,
            b in 0i64..10_000
        ) {
            let x = Zp::from_i64(p, na, a).unwrap();
            let y = Zp::from_i64(p, nb, b).unwrap();
            let expected = na.min(nb);

            for result in [&x + &y, &x - &y, &x * &y] {
                prop_assert_eq!(result.precision(), expected);
                let modulus = Integer::from(p).pow(u32::try_from(expected).unwrap());
                prop_assert!(!result.to_integer().is_negative());
                prop_assert!(result.to_integer() < modulus);
            }
        }

        #[test]
        fn zp_add_commutative(p in primes(), a in 0i64..10_000, b in 0i64..10_000) {
            let x = Zp::from_i64(p, 8, a).unwrap();
            let y = Zp::from_i64(p, 8, b).unwrap();
            prop_assert_eq!(&x + &y, &y + &x);
        }

        #[test]
        fn zp_mul_distributes(p in primes(), a in 0i64..1000, b in 0i64..1000, c in 0i64..1000) {
            let x = Zp::from_i64(p, 8, a).unwrap();
            let y = Zp::from_i64(p, 8, b).unwrap();
            let z = Zp::from_i64(p, 8, c).unwrap();
            prop_assert_eq!(&x * &(&y + &z), &(&x * &y) + &(&x * &z));
        }

        // Unit-part extraction costs exactly the valuation.

        #[test]
        fn zp_unit_part_precision_deduction(
            p in primes(),
            unit in 1i64..200,
            k in 0usize..4
        ) {
            let n = 10usize;
            let unit = if unit % (p as i64) == 0 { unit + 1 } else { unit };
            let value = Integer::new(unit) * Integer::from(p).pow(u32::try_from(k).unwrap());
            let x = Zp::from_integer(p, n, value).unwrap();

            prop_assert_eq!(x.valuation(), k as u64);
            let u = x.unit_part();
            prop_assert_eq!(u.precision(), n - k);
            prop_assert!(u.is_unit());
        }

        // Teichmüller laws to full precision.

        #[test]
        fn teichmuller_laws(p in primes(), a in 1i64..1000) {
            let n = 8usize;
            let a = if a % (p as i64) == 0 { a + 1 } else { a };
            let x = Zp::from_i64(p, n, a).unwrap();
            let omega = x.teichmuller().unwrap();

            prop_assert_eq!(omega.pow(p - 1), Zp::one(p, n).unwrap());
            prop_assert_eq!(
                omega.to_integer().rem_euclid(&Integer::from(p)),
                x.to_integer().rem_euclid(&Integer::from(p))
            );
        }

        // Square-root round trip where defined.

        #[test]
        fn sqrt_squares_back(p in primes(), a in 1i64..1000) {
            let n = 8usize;
            let a = if a % (p as i64) == 0 { a + 1 } else { a };
            let x = Zp::from_i64(p, n, a).unwrap();
            if let Ok(r) = x.sqrt() {
                prop_assert_eq!(&r * &r, x);
            }
        }

        // from_rational round trip: multiplying the denominator back
        // recovers the numerator.

        #[test]
        fn from_rational_round_trip(
            p in primes(),
            a in -500i64..500,
            b in 1i64..500
        ) {
            let n = 8usize;
            if let Ok(x) = Zp::from_rational(Integer::new(a), Integer::new(b), p, n) {
                let back = &x * &Zp::from_i64(p, n, b).unwrap();
                // The reduced denominator may differ from b by the gcd,
                // but x * b ≡ a always holds in Z/p^N
                prop_assert_eq!(back, Zp::from_i64(p, n, a).unwrap());
            }
        }

        // Qp division round trip.

        #[test]
        fn qp_div_mul_round_trip(
            p in primes(),
            a in 1i64..10_000,
            b in 1i64..10_000
        ) {
            let n = 8usize;
            let x = Qp::from_i64(p, n, a).unwrap();
            let y = Qp::from_i64(p, n, b).unwrap();
            let q = x.div(&y).unwrap();
            prop_assert_eq!(&q * &y, x);
        }

        // log turns products into sums on its domain.

        #[test]
        fn log_additivity(p in primes(), s in 0i64..40, t in 0i64..40) {
            let n = 10usize;
            let x = Qp::from_i64(p, n, 1 + (p as i64) * s).unwrap();
            let y = Qp::from_i64(p, n, 1 + (p as i64) * t).unwrap();

            let lhs = log(&(&x * &y)).unwrap();
            let rhs = &log(&x).unwrap() + &log(&y).unwrap();

            let check = n - 2;
            prop_assert_eq!(
                lhs.with_precision(check).unwrap(),
                rhs.with_precision(check).unwrap()
            );
        }

        // exp inverts log to the returned precision.

        #[test]
        fn exp_log_round_trip(p in primes(), s in 1i64..40) {
            let n = 10usize;
            let x = Qp::from_i64(p, n, 1 + (p as i64) * s).unwrap();
            let back = exp(&log(&x).unwrap()).unwrap();

            let check = n - 2;
            prop_assert_eq!(
                back.with_precision(check).unwrap(),
                x.with_precision(check).unwrap()
            );
        }
    }
}
