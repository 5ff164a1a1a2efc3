//! Preimage multiplicity of odd composites under (m, n) -> 2 f(m,n) + 1.
//!
//! Each ordered factorization c = u * v with u, v >= 3 gives exactly one
//! preimage (m, n) = ((u - 3) / 2, (v - 3) / 2), so an odd composite c has
//! d(c) - 2 ordered preimages (every divisor except 1 and c) and
//! ceil((d(c) - 2) / 2) unordered ones.

use rayon::prelude::*;
use serde::Serialize;

use crate::form::odd_value;

/// Largest m (and n) enumerated per sample.
const ENUMERATION_BOUND: u64 = 2000;

/// Mismatches kept as examples.
const MAX_REPORTED: usize = 10;

/// Number of divisors of an odd integer, by trial division over odd primes.
pub fn odd_divisor_count(c: u64) -> u64 {
    debug_assert!(c % 2 == 1, "odd_divisor_count expects an odd argument");
    let mut count = 1u64;
    let mut n = c;
    let mut p = 3u64;
    while p <= n / p {
        if n % p == 0 {
            let mut e = 0u64;
            while n % p == 0 {
                n /= p;
                e += 1;
            }
            count *= e + 1;
        }
        p += 2;
    }
    if n > 1 {
        count *= 2;
    }
    count
}

/// Ordered pairs (m, n), both <= `bound`, with 2 f(m,n) + 1 = c.
pub fn ordered_preimages(c: u64, bound: u64) -> Vec<(u64, u64)> {
    let mut pairs = Vec::new();
    for m in 0..=bound {
        let u = 2 * m + 3;
        if u > c / 3 {
            break;
        }
        if c % u != 0 {
            continue;
        }
        let n = (c / u - 3) / 2;
        if n <= bound {
            debug_assert_eq!(odd_value(m, n), c);
            pairs.push((m, n));
        }
    }
    pairs
}

pub fn ordered_preimage_count(c: u64, bound: u64) -> usize {
    ordered_preimages(c, bound).len()
}

/// Pairs with m <= n.
pub fn unordered_preimage_count(c: u64, bound: u64) -> usize {
    ordered_preimages(c, bound)
        .into_iter()
        .filter(|&(m, n)| m <= n)
        .count()
}

/// d(c) - 2.
pub fn expected_ordered(c: u64) -> usize {
    odd_divisor_count(c).saturating_sub(2) as usize
}

/// ceil((d(c) - 2) / 2).
pub fn expected_unordered(c: u64) -> usize {
    expected_ordered(c).div_ceil(2)
}

/// The first `limit` odd k in 9..=max divisible by 3, 5 or 7.
pub fn sample_odd_composites(max: u64, limit: usize) -> Vec<u64> {
    (9..=max)
        .step_by(2)
        .filter(|k| k % 3 == 0 || k % 5 == 0 || k % 7 == 0)
        .take(limit)
        .collect()
}

/// One disagreement between enumeration and the divisor formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CountMismatch {
    pub c: u64,
    pub got: usize,
    pub expected: usize,
}

/// Outcome of [`verify_multiplicity`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MultiplicityReport {
    pub samples: usize,
    pub ordered_mismatches: Vec<CountMismatch>,
    pub unordered_mismatches: Vec<CountMismatch>,
}

impl MultiplicityReport {
    pub fn passed(&self) -> bool {
        self.ordered_mismatches.is_empty() && self.unordered_mismatches.is_empty()
    }
}

/// Compare enumerated preimage counts with d(c) - 2 and ceil((d(c) - 2) / 2)
/// on the samples of [`sample_odd_composites`].
pub fn verify_multiplicity(max: u64, limit: usize) -> MultiplicityReport {
    let samples = sample_odd_composites(max, limit);

    // (c, ordered got/expected, unordered got/expected)
    let rows: Vec<(u64, (usize, usize), (usize, usize))> = samples
        .par_iter()
        .map(|&c| {
            let bound = ENUMERATION_BOUND.min((c - 3) / 2);
            let pairs = ordered_preimages(c, bound);
            let unordered = pairs.iter().filter(|&&(m, n)| m <= n).count();
            (
                c,
                (pairs.len(), expected_ordered(c)),
                (unordered, expected_unordered(c)),
            )
        })
        .collect();

    let mismatches_of = |pick: fn(&(u64, (usize, usize), (usize, usize))) -> (usize, usize)| {
        rows.iter()
            .filter_map(|row| {
                let (got, expected) = pick(row);
                (got != expected).then_some(CountMismatch {
                    c: row.0,
                    got,
                    expected,
                })
            })
            .take(MAX_REPORTED)
            .collect::<Vec<_>>()
    };

    let report = MultiplicityReport {
        samples: samples.len(),
        ordered_mismatches: mismatches_of(|row| row.1),
        unordered_mismatches: mismatches_of(|row| row.2),
    };
    log::info!(
        "multiplicity: {} samples, {} ordered / {} unordered mismatches",
        report.samples,
        report.ordered_mismatches.len(),
        report.unordered_mismatches.len()
    );
    report
}
