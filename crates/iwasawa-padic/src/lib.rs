//! # iwasawa-padic
//!
//! Tracked-precision p-adic arithmetic.
//!
//! This crate provides:
//! - `Zp`: the ring of p-adic integers, every value carrying an absolute
//!   precision that all operations propagate deterministically
//! - `Qp`: the fraction field, as a signed valuation plus a unit in `Zp`
//! - `log`: the p-adic logarithm on 1 + pZ_p (1 + 4Z_2 for p = 2), the
//!   internal exponential, and the Iwasawa-branch logarithm on all of Q_p^×
//! - `gamma`: Morita's p-adic gamma, its logarithm, and the truncated
//!   digamma series
//!
//! ## Precision model
//!
//! A `Zp` of precision N is a residue known modulo p^N. Binary operations
//! return min(N_a, N_b); extracting k factors of p costs k digits; series
//! that divide by multiples of p are evaluated at a raised working
//! precision and truncated back. None of this is optional — a result's
//! precision is always derived from its inputs, never supplied.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod gamma;
pub mod log;
pub mod qp;
pub mod zp;

#[cfg(test)]
mod proptests;

pub use error::{PadicError, Result};
pub use qp::Qp;
pub use zp::Zp;
