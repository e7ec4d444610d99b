//! # Iwasawa
//!
//! Computation in p-adic number fields for analytic number theory:
//! tracked-precision arithmetic in Z_p and Q_p, the p-adic logarithm and
//! Morita gamma, Dirichlet characters with Teichmüller-valued evaluation,
//! and Kubota–Leopoldt p-adic L-functions with their derivatives.
//!
//! ## Quick Start
//!
//! ```rust
//! use iwasawa::prelude::*;
//!
//! // The unique odd primitive character mod 4, lifted 5-adically
//! let chi = DirichletCharacter::with_exponents(4, 5, &[1]).unwrap();
//! assert!(chi.is_odd());
//!
//! // L_5(0, chi) = 2/5
//! let value = kubota_leopoldt(0, &chi, 20).unwrap();
//! assert_eq!(value.valuation(), -1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub use iwasawa_characters as characters;
pub use iwasawa_cyclotomic as cyclotomic;
pub use iwasawa_integers as integers;
pub use iwasawa_lfunctions as lfunctions;
pub use iwasawa_padic as padic;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use iwasawa_characters::{CharacterEvaluator, DirichletCharacter};
    pub use iwasawa_cyclotomic::Cyclotomic;
    pub use iwasawa_integers::{Integer, Rational};
    pub use iwasawa_lfunctions::bernoulli::{bernoulli_number, generalized_bernoulli};
    pub use iwasawa_lfunctions::{clear_cache, kubota_leopoldt, kubota_leopoldt_derivative};
    pub use iwasawa_padic::gamma::{digamma, gamma, log_gamma};
    pub use iwasawa_padic::log::{exp, iwasawa_log, log, log_unit};
    pub use iwasawa_padic::{PadicError, Qp, Zp};
}
