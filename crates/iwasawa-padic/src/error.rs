//! Error types for p-adic computations.

use thiserror::Error;

/// Errors surfaced by fallible p-adic operations.
///
/// Every failure is one of two kinds: the input lies outside the
/// operation's mathematical domain, or the input is structurally
/// malformed. There are no recoverable retries; the message names the
/// violated precondition.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum PadicError {
    /// The input is mathematically outside the operation's domain
    /// (logarithm of zero, square root of a non-residue, division by a
    /// non-unit, ...).
    #[error("domain error: {0}")]
    Domain(String),

    /// The input is structurally malformed (prime < 2, precision < 1,
    /// wrong number of character exponents, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl PadicError {
    /// Builds a `Domain` error from anything printable.
    pub fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }

    /// Builds an `InvalidArgument` error from anything printable.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

/// Result alias used across the p-adic crates.
pub type Result<T> = std::result::Result<T, PadicError>;
