//! # iwasawa-lfunctions
//!
//! Kubota–Leopoldt p-adic L-functions.
//!
//! `kubota_leopoldt` evaluates L_p(s, χ) at integer s: at non-positive
//! integers through generalized Bernoulli numbers and Euler factors, at
//! positive integers through a p-skipping partial sum. Its derivative at
//! s = 0 assembles Morita log-gamma and digamma terms (odd characters)
//! or Iwasawa-branch logarithms (even characters).
//!
//! Results are memoized in two process-wide caches keyed by
//! (s, modulus, exponent tuple, p, precision) — the exponent tuple is the
//! character fingerprint, so distinct characters of the same modulus
//! never collide. Each cache sits behind a mutex that is held for lookup
//! and insert only, never across an evaluation, so recursive population
//! stays deadlock-free and the order in which keys are filled cannot
//! change any returned value.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bernoulli;
mod kubota_leopoldt;

pub use kubota_leopoldt::{clear_cache, kubota_leopoldt, kubota_leopoldt_derivative};
