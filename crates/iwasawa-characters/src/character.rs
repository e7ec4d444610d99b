//! Dirichlet characters and their p-adic evaluation.

use std::cell::RefCell;

use iwasawa_cyclotomic::Cyclotomic;
use iwasawa_integers::modular::{divisors, factorize, pow_mod, primitive_root};
use iwasawa_padic::error::{PadicError, Result};
use iwasawa_padic::Zp;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// One cyclic factor of (Z/nZ)*: a prime-power block with its generator,
/// the generator's order, and a discrete-log table over the block.
///
/// A power of two 2^k (k ≥ 3) contributes two factors over the same
/// block, ⟨−1⟩ of order 2 and ⟨3⟩ of order 2^{k−2}; their tables are
/// built jointly from the decomposition a ≡ (−1)^s 3^t.
#[derive(Clone, Debug)]
struct CyclicFactor {
    prime_power: u64,
    order: u64,
    dlog: FxHashMap<u64, u64>,
}

/// Builds the generator decomposition of (Z/nZ)* per the structure
/// theorem.
fn cyclic_factors(n: u64) -> Vec<CyclicFactor> {
    let mut factors = Vec::new();

    for (p, k) in factorize(n) {
        let q = p.pow(k);

        if p == 2 {
            match k {
                1 => {} // (Z/2)* is trivial
                2 => {
                    // (Z/4)* = ⟨−1⟩
                    let mut dlog = FxHashMap::default();
                    dlog.insert(1, 0);
                    dlog.insert(3, 1);
                    factors.push(CyclicFactor {
                        prime_power: q,
                        order: 2,
                        dlog,
                    });
                }
                _ => {
                    // (Z/2^k)* = ⟨−1⟩ × ⟨3⟩
                    let half_order = q / 4;
                    let mut minus_dlog = FxHashMap::default();
                    let mut three_dlog = FxHashMap::default();
                    for s in 0..2 {
                        for t in 0..half_order {
                            let r = u128::from(pow_mod(q - 1, s, q))
                                * u128::from(pow_mod(3, t, q))
                                % u128::from(q);
                            let r = r as u64;
                            minus_dlog.insert(r, s);
                            three_dlog.insert(r, t);
                        }
                    }
                    factors.push(CyclicFactor {
                        prime_power: q,
                        order: 2,
                        dlog: minus_dlog,
                    });
                    factors.push(CyclicFactor {
                        prime_power: q,
                        order: half_order,
                        dlog: three_dlog,
                    });
                }
            }
            continue;
        }

        // Odd prime power: cyclic of order p^{k−1}(p−1). A primitive root
        // g mod p generates mod p^k unless g^{p−1} ≡ 1 (mod p^2), in
        // which case g + p does.
        let mut g = primitive_root(p);
        if k > 1 && pow_mod(g, p - 1, p * p) == 1 {
            g += p;
        }

        let order = q - q / p;
        let mut dlog = FxHashMap::default();
        let mut acc = 1u64;
        for e in 0..order {
            dlog.insert(acc, e);
            acc = (u128::from(acc) * u128::from(g) % u128::from(q)) as u64;
        }

        factors.push(CyclicFactor {
            prime_power: q,
            order,
            dlog,
        });
    }

    factors
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

fn lcm(a: u64, b: u64) -> u64 {
    if a == 0 || b == 0 {
        return 0;
    }
    a / gcd(a, b) * b
}

/// A Dirichlet character χ modulo n with an attached prime p for its
/// p-adic lifts.
///
/// χ is the completely multiplicative map sending the i-th generator to
/// ζ_{m_i}^{e_i} and everything off (Z/nZ)* to 0. The conductor is
/// computed eagerly at construction; per-value cyclotomic evaluations are
/// cached lazily, keyed by argument and precision, in a cache owned by
/// this character alone.
#[derive(Clone, Debug)]
pub struct DirichletCharacter {
    modulus: u64,
    prime: u64,
    conductor: u64,
    factors: Vec<CyclicFactor>,
    exponents: SmallVec<[u64; 4]>,
    value_cache: RefCell<FxHashMap<(u64, usize), Cyclotomic>>,
}

impl DirichletCharacter {
    /// The principal character modulo n.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `modulus < 1` or `prime < 2`.
    pub fn new(modulus: u64, prime: u64) -> Result<Self> {
        let factors = Self::validated_factors(modulus, prime)?;
        let exponents = SmallVec::from_elem(0, factors.len());
        Ok(Self::assemble(modulus, prime, factors, exponents))
    }

    /// A character from its exponents on the canonical generators:
    /// χ(g_i) = ζ_{m_i}^{e_i}.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` on a bad modulus/prime, a wrong number of
    /// exponents, or an exponent outside [0, m_i).
    pub fn with_exponents(modulus: u64, prime: u64, exponents: &[u64]) -> Result<Self> {
        let factors = Self::validated_factors(modulus, prime)?;

        if exponents.len() != factors.len() {
            return Err(PadicError::invalid(format!(
                "expected {} character exponents, got {}",
                factors.len(),
                exponents.len()
            )));
        }
        for (e, factor) in exponents.iter().zip(&factors) {
            if *e >= factor.order {
                return Err(PadicError::invalid(format!(
                    "character exponent {} exceeds generator order {}",
                    e, factor.order
                )));
            }
        }

        Ok(Self::assemble(
            modulus,
            prime,
            factors,
            SmallVec::from_slice(exponents),
        ))
    }

    fn validated_factors(modulus: u64, prime: u64) -> Result<Vec<CyclicFactor>> {
        if modulus < 1 {
            return Err(PadicError::invalid("modulus must be >= 1"));
        }
        if prime < 2 {
            return Err(PadicError::invalid(format!("prime must be >= 2, got {prime}")));
        }
        Ok(cyclic_factors(modulus))
    }

    fn assemble(
        modulus: u64,
        prime: u64,
        factors: Vec<CyclicFactor>,
        exponents: SmallVec<[u64; 4]>,
    ) -> Self {
        let mut character = Self {
            modulus,
            prime,
            conductor: modulus,
            factors,
            exponents,
            value_cache: RefCell::new(FxHashMap::default()),
        };
        character.conductor = character.compute_conductor();
        character
    }

    /// Smallest f | n such that χ factors through (Z/fZ)*: the least
    /// divisor d with χ(a) = 1 for every a ≡ 1 (mod d) coprime to n.
    fn compute_conductor(&self) -> u64 {
        for d in divisors(self.modulus) {
            if self.factors_through(d) {
                return d;
            }
        }
        self.modulus
    }

    fn factors_through(&self, d: u64) -> bool {
        let mut a = 1;
        while a <= self.modulus {
            if gcd(a, self.modulus) == 1
                && self.evaluate_at(i64::try_from(a).expect("residue fits i64")) != Some(0)
            {
                return false;
            }
            a += d;
        }
        true
    }

    /// Returns the modulus n.
    #[must_use]
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Returns the attached prime p.
    #[must_use]
    pub fn prime(&self) -> u64 {
        self.prime
    }

    /// Returns the conductor f.
    #[must_use]
    pub fn conductor(&self) -> u64 {
        self.conductor
    }

    /// The exponents (e_1, ..., e_r) on the canonical generators. This
    /// tuple identifies the character uniquely for a fixed modulus.
    #[must_use]
    pub fn exponents(&self) -> &[u64] {
        &self.exponents
    }

    /// lcm of the generator orders carrying a nonzero exponent; the
    /// character's values are powers of a primitive L-th root of unity.
    fn value_order(&self) -> u64 {
        let mut l = 1;
        for (factor, &e) in self.factors.iter().zip(&self.exponents) {
            if e != 0 {
                l = lcm(l, factor.order);
            }
        }
        l
    }

    /// Evaluates χ(a) as an exponent: `Some(c)` means χ(a) = ζ_L^c with
    /// L = the value order; `None` means gcd(a, n) > 1 and χ(a) = 0.
    #[must_use]
    pub fn evaluate_at(&self, a: i64) -> Option<u64> {
        if self.modulus == 1 {
            return Some(0);
        }

        let n = self.modulus;
        let a = a.rem_euclid(i64::try_from(n).expect("modulus fits i64"));
        let a = u64::try_from(a).expect("non-negative after rem_euclid");
        if gcd(a, n) != 1 {
            return None;
        }

        let l = self.value_order();
        let mut total: u64 = 0;

        for (factor, &e) in self.factors.iter().zip(&self.exponents) {
            if e == 0 {
                continue;
            }
            let residue = a % factor.prime_power;
            let x = factor.dlog[&residue];
            // χ(g_i)^{x} = ζ_{m_i}^{e x} = ζ_L^{e x L / m_i}
            let contribution =
                u128::from(e) * u128::from(x) % u128::from(l) * u128::from(l / factor.order)
                    % u128::from(l);
            total = ((u128::from(total) + contribution) % u128::from(l)) as u64;
        }

        Some(total)
    }

    /// Whether this character's values embed in Z_p.
    ///
    /// # Errors
    ///
    /// `Domain` when the value order does not divide p − 1.
    fn require_values_in_zp(&self) -> Result<u64> {
        let l = self.value_order();
        if (self.prime - 1) % l != 0 {
            return Err(PadicError::domain(format!(
                "character value order {} does not divide p - 1 = {}; \
                 values lie outside Q_p(zeta_(p-1))",
                l,
                self.prime - 1
            )));
        }
        Ok(l)
    }

    /// Evaluates χ(a) as a p-adic integer: the Teichmüller lift of the
    /// root of unity ζ_L^c, i.e. ω(g^{c(p−1)/L}) for g the smallest
    /// primitive root mod p. Zero off (Z/nZ)*.
    ///
    /// # Errors
    ///
    /// `Domain` when the character's value order does not divide p − 1
    /// (those values require the cyclotomic extension).
    pub fn evaluate(&self, a: i64, precision: usize) -> Result<Zp> {
        let Some(c) = self.evaluate_at(a) else {
            return Zp::new(self.prime, precision);
        };
        let l = self.require_values_in_zp()?;

        if c == 0 {
            return Zp::one(self.prime, precision);
        }

        let g = primitive_root(self.prime);
        let residue = pow_mod(g, c * ((self.prime - 1) / l), self.prime);
        Zp::from_u64(self.prime, precision, residue)?.teichmuller()
    }

    /// Evaluates the primitive character of conductor f inducing χ.
    ///
    /// For a coprime to f but not to n, the mod-n character vanishes
    /// while the primitive one does not; the value is read off any lift
    /// a' ≡ a (mod f) with gcd(a', n) = 1. The L-function layer needs
    /// this for Euler factors and conductor-indexed sums.
    ///
    /// # Errors
    ///
    /// `Domain` when the value order does not divide p − 1.
    pub fn evaluate_primitive(&self, a: i64, precision: usize) -> Result<Zp> {
        if self.conductor == self.modulus {
            return self.evaluate(a, precision);
        }
        if self.conductor == 1 {
            return Zp::one(self.prime, precision);
        }

        let f = i64::try_from(self.conductor).expect("conductor fits i64");
        let a0 = a.rem_euclid(f);
        let a0 = u64::try_from(a0).expect("non-negative after rem_euclid");
        if gcd(a0, self.conductor) != 1 {
            return Zp::new(self.prime, precision);
        }

        // A coprime lift exists because (Z/n)* -> (Z/f)* is surjective
        let mut candidate = a0;
        while gcd(candidate, self.modulus) != 1 {
            candidate += self.conductor;
        }
        self.evaluate(i64::try_from(candidate).expect("lift fits i64"), precision)
    }

    /// Evaluates χ(a) in the cyclotomic ring as ζ^{c(p−1)/L}.
    ///
    /// Results are cached per (argument, precision).
    ///
    /// # Errors
    ///
    /// `Domain` when the value order does not divide p − 1.
    pub fn evaluate_cyclotomic(&self, a: i64, precision: usize) -> Result<Cyclotomic> {
        let n = i64::try_from(self.modulus).expect("modulus fits i64");
        let key = (u64::try_from(a.rem_euclid(n)).expect("non-negative"), precision);

        if let Some(cached) = self.value_cache.borrow().get(&key) {
            return Ok(cached.clone());
        }

        let value = match self.evaluate_at(a) {
            None => Cyclotomic::new(self.prime, precision)?,
            Some(c) => {
                let l = self.require_values_in_zp()?;
                Cyclotomic::zeta_pow(self.prime, precision, c * ((self.prime - 1) / l))?
            }
        };

        self.value_cache.borrow_mut().insert(key, value.clone());
        Ok(value)
    }

    /// χ(−1) = 1.
    #[must_use]
    pub fn is_even(&self) -> bool {
        self.evaluate_at(-1) == Some(0)
    }

    /// χ(−1) = −1 (the exponent L/2).
    #[must_use]
    pub fn is_odd(&self) -> bool {
        matches!(self.evaluate_at(-1), Some(c) if c != 0)
    }

    /// The order of χ in the character group: lcm of m_i / gcd(e_i, m_i).
    #[must_use]
    pub fn order(&self) -> u64 {
        let mut result = 1;
        for (factor, &e) in self.factors.iter().zip(&self.exponents) {
            if e != 0 {
                result = lcm(result, factor.order / gcd(e, factor.order));
            }
        }
        result
    }

    /// Every exponent is zero.
    #[must_use]
    pub fn is_principal(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// The conductor equals the modulus.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.conductor == self.modulus
    }

    /// Every character modulo n, as the Cartesian product of exponents
    /// over the generator orders. Yields φ(n) characters.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` on a bad modulus/prime.
    pub fn enumerate_characters(modulus: u64, prime: u64) -> Result<Vec<Self>> {
        let base = Self::new(modulus, prime)?;
        let orders: Vec<u64> = base.factors.iter().map(|f| f.order).collect();

        let mut result = Vec::new();
        let mut current = vec![0u64; orders.len()];

        loop {
            result.push(Self::with_exponents(modulus, prime, &current)?);

            // Odometer increment over the exponent tuple
            let mut i = 0;
            loop {
                if i == orders.len() {
                    return Ok(result);
                }
                current[i] += 1;
                if current[i] < orders[i] {
                    break;
                }
                current[i] = 0;
                i += 1;
            }
        }
    }

    /// The characters of conductor exactly n.
    ///
    /// # Errors
    ///
    /// `InvalidArgument` on a bad modulus/prime.
    pub fn enumerate_primitive_characters(modulus: u64, prime: u64) -> Result<Vec<Self>> {
        Ok(Self::enumerate_characters(modulus, prime)?
            .into_iter()
            .filter(Self::is_primitive)
            .collect())
    }

    /// The Gauss sum g(χ) = Σ_{gcd(a,n)=1} χ(a) · ζ^{a(p−1)/n} in the
    /// cyclotomic ring.
    ///
    /// # Errors
    ///
    /// `Domain` when n does not divide p − 1 (the additive twist
    /// ζ^{a(p−1)/n} must be an n-th root of unity), or when the value
    /// order does not divide p − 1.
    pub fn gauss_sum(&self, precision: usize) -> Result<Cyclotomic> {
        if (self.prime - 1) % self.modulus != 0 {
            return Err(PadicError::domain(format!(
                "modulus {} must divide p - 1 = {} for the Gauss sum twist",
                self.modulus,
                self.prime - 1
            )));
        }

        let mut sum = Cyclotomic::new(self.prime, precision)?;
        for a in 1..=self.modulus {
            if gcd(a, self.modulus) != 1 {
                continue;
            }
            let chi_a =
                self.evaluate_cyclotomic(i64::try_from(a).expect("residue fits i64"), precision)?;
            let twist =
                Cyclotomic::zeta_pow(self.prime, precision, a * ((self.prime - 1) / self.modulus))?;
            sum = &sum + &(&chi_a * &twist);
        }

        Ok(sum)
    }
}

impl PartialEq for DirichletCharacter {
    /// Same modulus, same attached prime, same exponent tuple. The value
    /// cache is ignored.
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus
            && self.prime == other.prime
            && self.exponents == other.exponents
    }
}

impl Eq for DirichletCharacter {}

/// A borrowed character plus a precision, exposing the single call the
/// Bernoulli layer consumes.
#[derive(Clone, Copy)]
pub struct CharacterEvaluator<'a> {
    character: &'a DirichletCharacter,
    precision: usize,
}

impl<'a> CharacterEvaluator<'a> {
    /// Wraps a character at a fixed precision.
    #[must_use]
    pub fn new(character: &'a DirichletCharacter, precision: usize) -> Self {
        Self {
            character,
            precision,
        }
    }

    /// χ(a) in the cyclotomic ring at the wrapped precision.
    ///
    /// # Errors
    ///
    /// Propagates the character's `Domain` errors.
    pub fn eval(&self, a: i64) -> Result<Cyclotomic> {
        self.character.evaluate_cyclotomic(a, self.precision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iwasawa_integers::modular::euler_phi;

    fn nontrivial_mod_4(p: u64) -> DirichletCharacter {
        DirichletCharacter::with_exponents(4, p, &[1]).unwrap()
    }

    fn nontrivial_mod_3(p: u64) -> DirichletCharacter {
        DirichletCharacter::with_exponents(3, p, &[1]).unwrap()
    }

    #[test]
    fn test_generator_structure() {
        // 12 = 4 * 3: ⟨−1 mod 4⟩ of order 2, ⟨2 mod 3⟩ of order 2
        let chi = DirichletCharacter::new(12, 3).unwrap();
        let orders: Vec<u64> = chi.factors.iter().map(|f| f.order).collect();
        assert_eq!(orders, vec![2, 2]);

        // 8: ⟨−1⟩ of order 2 and ⟨3⟩ of order 2
        let chi = DirichletCharacter::new(8, 3).unwrap();
        let orders: Vec<u64> = chi.factors.iter().map(|f| f.order).collect();
        assert_eq!(orders, vec![2, 2]);

        // 25: cyclic of order 20
        let chi = DirichletCharacter::new(25, 7).unwrap();
        let orders: Vec<u64> = chi.factors.iter().map(|f| f.order).collect();
        assert_eq!(orders, vec![20]);
    }

    #[test]
    fn test_principal_character() {
        let chi = DirichletCharacter::new(12, 3).unwrap();
        assert!(chi.is_principal());
        assert!(chi.is_even());
        assert_eq!(chi.order(), 1);
        assert_eq!(chi.conductor(), 1);

        for a in 1..12 {
            let expected = if gcd(a, 12) == 1 { Some(0) } else { None };
            assert_eq!(chi.evaluate_at(i64::try_from(a).unwrap()), expected);
        }
    }

    #[test]
    fn test_wrong_exponent_count() {
        assert!(matches!(
            DirichletCharacter::with_exponents(12, 3, &[1]),
            Err(PadicError::InvalidArgument(_))
        ));
        assert!(matches!(
            DirichletCharacter::with_exponents(4, 3, &[2]),
            Err(PadicError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mod_4_character() {
        let chi = nontrivial_mod_4(5);
        assert!(chi.is_odd());
        assert!(!chi.is_even());
        assert!(chi.is_primitive());
        assert_eq!(chi.order(), 2);
        assert_eq!(chi.conductor(), 4);

        // χ(1) = 1, χ(3) = −1, χ(even) = 0
        assert_eq!(chi.evaluate_at(1), Some(0));
        assert_eq!(chi.evaluate_at(3), Some(1));
        assert_eq!(chi.evaluate_at(2), None);

        // 5 ≡ 1 (mod 4)
        assert_eq!(chi.evaluate_at(5), Some(0));
    }

    #[test]
    fn test_complete_multiplicativity() {
        for chi in DirichletCharacter::enumerate_characters(12, 5).unwrap() {
            let l = chi.value_order();
            for a in 1..12i64 {
                for b in 1..12i64 {
                    let lhs = chi.evaluate_at(a * b);
                    let rhs = match (chi.evaluate_at(a), chi.evaluate_at(b)) {
                        (Some(x), Some(y)) => Some((x + y) % l),
                        _ => None,
                    };
                    assert_eq!(lhs, rhs, "multiplicativity at ({a}, {b})");
                }
            }
        }
    }

    #[test]
    fn test_teichmuller_evaluation() {
        // χ mod 3 at p = 5: χ(2) = −1 lifted to Z_5
        let chi = nontrivial_mod_3(5);
        let value = chi.evaluate(2, 10).unwrap();
        assert_eq!(value, Zp::from_i64(5, 10, -1).unwrap());
        assert_eq!(chi.evaluate(1, 10).unwrap(), Zp::one(5, 10).unwrap());
        assert!(chi.evaluate(3, 10).unwrap().is_zero());

        // Values are roots of unity of the character's order
        let sq = &value * &value;
        assert_eq!(sq, Zp::one(5, 10).unwrap());
    }

    #[test]
    fn test_order_restriction() {
        // The character of order 4 mod 5 has values outside Z_3
        let chi = DirichletCharacter::with_exponents(5, 3, &[1]).unwrap();
        assert_eq!(chi.order(), 4);
        assert!(matches!(
            chi.evaluate(2, 8),
            Err(PadicError::Domain(_))
        ));

        // The same character embeds fine at p = 13 (4 | 12)
        let chi = DirichletCharacter::with_exponents(5, 13, &[1]).unwrap();
        let omega = chi.evaluate(2, 8).unwrap();
        assert_eq!(omega.pow(4), Zp::one(13, 8).unwrap());
        assert!(omega.pow(2) != Zp::one(13, 8).unwrap());
    }

    #[test]
    fn test_enumeration_scenario_mod_12() {
        // Scenario: p = 3, n = 12 = 4 · 3
        let chars = DirichletCharacter::enumerate_characters(12, 3).unwrap();
        assert_eq!(chars.len(), 4);
        assert_eq!(chars.len() as u64, euler_phi(12));

        let mut conductors: Vec<u64> = chars.iter().map(DirichletCharacter::conductor).collect();
        conductors.sort_unstable();
        assert_eq!(conductors, vec![1, 3, 4, 12]);

        let primitive = DirichletCharacter::enumerate_primitive_characters(12, 3).unwrap();
        assert_eq!(primitive.len(), 1);
        assert_eq!(primitive[0].conductor(), 12);
        assert!(primitive[0].is_even());
    }

    #[test]
    fn test_enumeration_cardinality() {
        for n in [1u64, 2, 3, 4, 5, 7, 8, 9, 12, 15, 16] {
            let chars = DirichletCharacter::enumerate_characters(n, 13).unwrap();
            assert_eq!(chars.len() as u64, euler_phi(n), "phi({n})");
        }
    }

    #[test]
    fn test_primitive_count_by_moebius() {
        // Σ_{d | n} μ(n/d) φ(d) for n = 12: φ(12) − φ(6) − φ(4) + φ(2) = 2
        let primitive = DirichletCharacter::enumerate_primitive_characters(12, 13).unwrap();
        assert_eq!(primitive.len(), 2);

        // n = 8: φ(8) − φ(4) = 2
        let primitive = DirichletCharacter::enumerate_primitive_characters(8, 13).unwrap();
        assert_eq!(primitive.len(), 2);
    }

    #[test]
    fn test_parity_partition() {
        for chi in DirichletCharacter::enumerate_characters(12, 5).unwrap() {
            assert!(chi.is_even() != chi.is_odd());
        }
    }

    #[test]
    fn test_gauss_sum_quadratic_mod_4() {
        // g(χ)^2 ↦ χ(−1) · f = −4 under evaluation at ω
        let chi = nontrivial_mod_4(5);
        let g = chi.gauss_sum(10).unwrap();
        let squared = (&g * &g).to_qp().unwrap();
        assert_eq!(
            squared,
            iwasawa_padic::Qp::from_i64(5, 10, -4).unwrap()
        );
    }

    #[test]
    fn test_gauss_sum_quadratic_mod_3() {
        let chi = nontrivial_mod_3(7);
        assert!(chi.is_odd());
        let g = chi.gauss_sum(8).unwrap();
        let squared = (&g * &g).to_qp().unwrap();
        assert_eq!(
            squared,
            iwasawa_padic::Qp::from_i64(7, 8, -3).unwrap()
        );
    }

    #[test]
    fn test_gauss_sum_requires_dividing_twist() {
        // 4 does not divide 7 − 1
        let chi = nontrivial_mod_4(7);
        assert!(matches!(
            chi.gauss_sum(8),
            Err(PadicError::Domain(_))
        ));
    }

    #[test]
    fn test_character_evaluator() {
        let chi = nontrivial_mod_3(7);
        let evaluator = CharacterEvaluator::new(&chi, 8);
        let direct = chi.evaluate_cyclotomic(2, 8).unwrap();
        assert_eq!(evaluator.eval(2).unwrap(), direct);
    }

    #[test]
    fn test_value_cache_keyed_by_precision() {
        let chi = nontrivial_mod_3(7);
        let low = chi.evaluate_cyclotomic(2, 4).unwrap();
        let high = chi.evaluate_cyclotomic(2, 12).unwrap();
        assert_eq!(low.precision(), 4);
        assert_eq!(high.precision(), 12);
    }

    #[test]
    fn test_evaluate_matches_cyclotomic_through_to_qp() {
        let chi = nontrivial_mod_3(7);
        for a in 1..3i64 {
            let direct = chi.evaluate(a, 8).unwrap();
            let via_ring = chi.evaluate_cyclotomic(a, 8).unwrap().to_qp().unwrap();
            assert_eq!(via_ring, iwasawa_padic::Qp::from(direct));
        }
    }

    #[test]
    fn test_conductor_of_imprimitive_character() {
        // Induce the mod-3 character to modulus 12: exponents (0, 1)
        let chi = DirichletCharacter::with_exponents(12, 5, &[0, 1]).unwrap();
        assert_eq!(chi.conductor(), 3);
        assert!(!chi.is_primitive());

        // It agrees with the primitive mod-3 character on units mod 12
        let base = nontrivial_mod_3(5);
        for a in (1..12i64).filter(|a| gcd(u64::try_from(*a).unwrap(), 12) == 1) {
            assert_eq!(chi.evaluate_at(a), base.evaluate_at(a));
        }
    }

    #[test]
    fn test_evaluate_primitive_lifts_through_conductor() {
        // Mod-12 character induced from the mod-3 one
        let chi = DirichletCharacter::with_exponents(12, 5, &[0, 1]).unwrap();
        let base = nontrivial_mod_3(5);

        // 4 is a zero of the mod-12 character but not of the primitive one
        assert!(chi.evaluate(4, 8).unwrap().is_zero());
        assert_eq!(
            chi.evaluate_primitive(4, 8).unwrap(),
            base.evaluate(1, 8).unwrap()
        );
        assert_eq!(
            chi.evaluate_primitive(2, 8).unwrap(),
            base.evaluate(2, 8).unwrap()
        );

        // Conductor-1 characters evaluate to 1 everywhere
        let principal = DirichletCharacter::new(12, 5).unwrap();
        assert_eq!(
            principal.evaluate_primitive(6, 8).unwrap(),
            Zp::one(5, 8).unwrap()
        );
    }

    #[test]
    fn test_b1_style_weighted_sum() {
        // Σ χ(a)·a over a mod 3 with the Teichmüller lift: 1·1 + (−1)·2 = −1
        let chi = nontrivial_mod_3(5);
        let mut sum = Zp::new(5, 10).unwrap();
        for a in 1..3i64 {
            let chi_a = chi.evaluate(a, 10).unwrap();
            sum = &sum + &(&chi_a * &Zp::from_i64(5, 10, a).unwrap());
        }
        assert_eq!(sum, Zp::from_i64(5, 10, -1).unwrap());
    }
}
