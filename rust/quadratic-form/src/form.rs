//! The form f(m,n) = 4 + 3m + 3n + 2mn and its value counts over a grid.
//!
//! 2 f(m,n) + 1 = (2m + 3)(2n + 3): the values of f are exactly the indices
//! whose odd number 2x + 1 is a composite with both cofactors >= 3.

use std::collections::BTreeMap;

use odd_prime_indicator::PrimalityOracle;
use serde::Serialize;

/// Value -> number of ordered pairs (m, n) in the grid producing it.
pub type Counts = BTreeMap<u64, u32>;

pub fn f(m: u64, n: u64) -> u64 {
    4 + 3 * m + 3 * n + 2 * m * n
}

/// 2 f(m,n) + 1, which factors as (2m + 3)(2n + 3).
pub fn odd_value(m: u64, n: u64) -> u64 {
    2 * f(m, n) + 1
}

/// Count every value of f over 0..=max_m x 0..=max_n.
pub fn generate_counts(max_m: u64, max_n: u64) -> Counts {
    let mut counts = Counts::new();
    for m in 0..=max_m {
        for n in 0..=max_n {
            *counts.entry(f(m, n)).or_insert(0) += 1;
        }
    }
    log::debug!(
        "grid {}x{}: {} distinct values",
        max_m + 1,
        max_n + 1,
        counts.len()
    );
    counts
}

/// Aggregate statistics of a value count table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Distinct values.
    pub distinct: usize,
    /// Values hit by two or more pairs.
    pub collisions: usize,
    /// Values hit once that are prime.
    pub unique_primes: usize,
    /// Values hit once that are not prime.
    pub unique_nonprimes: usize,
}

pub fn summarize<O: PrimalityOracle + ?Sized>(counts: &Counts, oracle: &O) -> Summary {
    let mut summary = Summary {
        distinct: counts.len(),
        collisions: 0,
        unique_primes: 0,
        unique_nonprimes: 0,
    };
    for (&value, &count) in counts {
        if count >= 2 {
            summary.collisions += 1;
        } else if oracle.is_prime(value) {
            summary.unique_primes += 1;
        } else {
            summary.unique_nonprimes += 1;
        }
    }
    summary
}

/// Solve f(m,n) = x with m <= n, returning the pair with the smallest m.
pub fn in_image(x: u64) -> Option<(u64, u64)> {
    let c = x.checked_mul(2)?.checked_add(1)?;
    let mut u = 3u64;
    while u <= c / u {
        if c % u == 0 {
            return Some(((u - 3) / 2, (c / u - 3) / 2));
        }
        u += 2;
    }
    None
}
