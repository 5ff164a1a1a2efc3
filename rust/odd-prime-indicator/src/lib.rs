//! Prime indicator for odd integers.
//!
//! T[n] = 1 iff o_n = 2n + 1 is prime, for n in 0..=N. Three independent
//! constructions (odd-only sieve, progression marking, per-index formula)
//! are provided along with a cross-verification routine that compares them
//! with each other and with an independent primality oracle.

pub mod error;
pub mod indicator;
pub mod oracle;
pub mod primes;
pub mod verify;

pub use error::{IndicatorError, Result};
pub use indicator::{
    checked_odd, formula_indicator, formula_indicator_table, parse_table_size, progression,
    progression_base, progression_indicator, progression_indicator_with, sieve_indicator,
    sieve_indicator_with, Indicator, IndicatorMethod, Limits, DEFAULT_MAX_N,
};
pub use oracle::{is_prime_trial, is_prime_u64, MillerRabin, PrimalityOracle, TrialDivision};
pub use primes::{isqrt, primes_up_to, PrimeTable};
pub use verify::{
    sample_indices, verify_equivalence, verify_equivalence_with, CheckKind, CheckOutcome,
    Mismatch, VerificationReport, VerifyConfig,
};
