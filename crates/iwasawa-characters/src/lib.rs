//! # iwasawa-characters
//!
//! Dirichlet characters modulo n with p-adic values.
//!
//! A character is stored on the canonical generator decomposition of
//! (Z/nZ)*: one cyclic factor per odd prime power, and the ⟨−1⟩ × ⟨3⟩
//! pair for powers of two. Evaluation projects an argument into each
//! factor by the Chinese remainder theorem, reads a discrete log from a
//! per-factor lookup table, and combines the exponents. Values are
//! exponents of a root of unity; they lift to Z_p through the Teichmüller
//! character or into the cyclotomic ring as powers of ζ.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod character;

pub use character::{CharacterEvaluator, DirichletCharacter};
