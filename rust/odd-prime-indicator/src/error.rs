//! Errors raised while building or checking indicator tables.

/// Failures of the indicator constructions.
///
/// Disagreements between constructions are not errors: they are collected
/// as [`crate::verify::Mismatch`] entries in a verification report.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IndicatorError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "prime table up to {covered} cannot decide index {index}: primes up to {needed} are required"
    )]
    InsufficientCoverage { index: u64, needed: u64, covered: u64 },
}

pub type Result<T> = std::result::Result<T, IndicatorError>;
