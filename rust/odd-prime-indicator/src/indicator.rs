//! The indicator T[0..N] of primality of o_n = 2n + 1, built three ways.
//!
//! - [`sieve_indicator`]: odd-only Eratosthenes sieve (reference).
//! - [`progression_indicator`]: zero out the composite progressions
//!   base(p) + p*m for odd primes p.
//! - [`formula_indicator`]: decide a single index by scanning those
//!   progressions.
//!
//! The progression view rests on one identity: for odd p >= 3 and m >= 0,
//! p * (2m + 3) = 2 * (base(p) + p*m) + 1 with base(p) = (3p - 1) / 2.
//! So o_n is an odd composite exactly when n lies on the progression of one
//! of its prime factors.

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{IndicatorError, Result};
use crate::primes::{isqrt, primes_up_to, PrimeTable};

/// Default ceiling on N. A table is N+1 bytes; the sieve adds N+1 flags and
/// progression marking a prime sieve up to 2N+1, so a single build stays
/// under about a gigabyte.
pub const DEFAULT_MAX_N: u64 = 1 << 28;

/// Resource limits for table construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Limits {
    /// Largest accepted table size N (inclusive).
    pub max_n: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_n: DEFAULT_MAX_N,
        }
    }
}

impl Limits {
    /// Validate N and return the table length N+1.
    pub fn table_len(&self, n: u64) -> Result<usize> {
        checked_odd(n)?;
        if n > self.max_n {
            return Err(IndicatorError::InvalidArgument(format!(
                "table size N={} exceeds the configured maximum {}",
                n, self.max_n
            )));
        }
        usize::try_from(n)
            .ok()
            .and_then(|n| n.checked_add(1))
            .ok_or_else(|| {
                IndicatorError::InvalidArgument(format!("table size N={n} does not fit in memory"))
            })
    }
}

/// o_n = 2n + 1, rejecting indices whose odd value does not fit in u64.
pub fn checked_odd(n: u64) -> Result<u64> {
    n.checked_mul(2)
        .and_then(|d| d.checked_add(1))
        .ok_or_else(|| {
            IndicatorError::InvalidArgument(format!("index {n} is too large: 2n+1 overflows u64"))
        })
}

/// Parse a table size from text, rejecting negative values.
pub fn parse_table_size(text: &str) -> Result<u64> {
    let value: i64 = text.trim().parse().map_err(|e| {
        IndicatorError::InvalidArgument(format!("table size '{text}' is not an integer: {e}"))
    })?;
    u64::try_from(value).map_err(|_| {
        IndicatorError::InvalidArgument(format!("table size must be non-negative, got {value}"))
    })
}

/// T[0..N]: `T[n] == 1` iff 2n+1 is prime. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Indicator {
    values: Vec<u8>,
}

impl Indicator {
    /// The table size N (last valid index).
    pub fn n(&self) -> u64 {
        (self.values.len() - 1) as u64
    }

    /// Number of entries, N+1.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false: a table holds at least T[0].
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, n: u64) -> Option<u8> {
        usize::try_from(n).ok().and_then(|i| self.values.get(i).copied())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.values
    }

    /// Number of odd primes 3 <= p <= 2N+1.
    pub fn prime_count(&self) -> usize {
        self.values.iter().filter(|&&t| t == 1).count()
    }

    /// Indices n with T[n] = 1.
    pub fn prime_indices(&self) -> impl Iterator<Item = u64> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, &t)| t == 1)
            .map(|(i, _)| i as u64)
    }

    /// The odd primes 2n+1 marked by the table, ascending.
    pub fn odd_primes(&self) -> impl Iterator<Item = u64> + '_ {
        self.prime_indices().map(|n| 2 * n + 1)
    }

    /// Indices where the two tables differ, as (index, self, other).
    /// Only the common prefix is compared.
    pub fn differences<'a>(
        &'a self,
        other: &'a Indicator,
    ) -> impl Iterator<Item = (u64, u8, u8)> + 'a {
        self.values
            .iter()
            .zip(other.values.iter())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, (&a, &b))| (i as u64, a, b))
    }
}

impl Index<usize> for Indicator {
    type Output = u8;

    fn index(&self, n: usize) -> &u8 {
        &self.values[n]
    }
}

/// base(p) = (3p - 1) / 2, the first index on the progression of p.
/// It is the index of o = 3p.
pub fn progression_base(p: u64) -> u64 {
    (3 * p - 1) / 2
}

/// Indices base(p), base(p) + p, ... up to and including `n`.
pub fn progression(p: u64, n: u64) -> impl Iterator<Item = u64> {
    (progression_base(p)..=n).step_by(p as usize)
}

/// Exact T[0..N] by an odd-only sieve up to 2N+1.
pub fn sieve_indicator(n: u64) -> Result<Indicator> {
    sieve_indicator_with(n, &Limits::default())
}

/// [`sieve_indicator`] under explicit limits.
pub fn sieve_indicator_with(n: u64, limits: &Limits) -> Result<Indicator> {
    let len = limits.table_len(n)?;
    let limit = 2 * n + 1;
    if limit < 2 {
        return Ok(Indicator {
            values: vec![0; len],
        });
    }

    // slot i represents the odd number 2i + 1
    let size = ((limit + 1) / 2) as usize;
    let mut is_prime_odd = vec![true; size];
    is_prime_odd[0] = false;
    let max_i = (isqrt(limit) / 2) as usize;
    for i in 1..=max_i {
        if !is_prime_odd[i] {
            continue;
        }
        let p = 2 * i + 1;
        let start = (p * p - 1) / 2;
        for j in (start..size).step_by(p) {
            is_prime_odd[j] = false;
        }
    }

    let values: Vec<u8> = (0..len)
        .map(|idx| u8::from(idx < size && is_prime_odd[idx]))
        .collect();
    let indicator = Indicator { values };
    log::debug!(
        "sieve: N={} -> {} odd primes up to {}",
        n,
        indicator.prime_count(),
        limit
    );
    Ok(indicator)
}

/// T[0..N] by marking the composite progressions of every odd prime
/// p <= `p_max` (default 2N+1, which is exhaustive).
///
/// A smaller `p_max` can only leave composites unmarked; it never marks a
/// prime.
pub fn progression_indicator(n: u64, p_max: Option<u64>) -> Result<Indicator> {
    progression_indicator_with(n, p_max, &Limits::default())
}

/// [`progression_indicator`] under explicit limits.
pub fn progression_indicator_with(
    n: u64,
    p_max: Option<u64>,
    limits: &Limits,
) -> Result<Indicator> {
    let len = limits.table_len(n)?;
    let mut values = vec![1u8; len];
    values[0] = 0;

    // primes above 2N+1 have base > N; clamping keeps the prime sieve O(N)
    let exhaustive = 2 * n + 1;
    let p_max = p_max.unwrap_or(exhaustive).min(exhaustive);
    let primes = primes_up_to(p_max);

    let mut last_base = 0u64;
    let mut used = 0usize;
    for &p in primes.iter().filter(|&&p| p >= 3) {
        let base = progression_base(p);
        debug_assert!(base > last_base, "base(p) must increase with p");
        last_base = base;
        if base > n {
            break;
        }
        for idx in progression(p, n) {
            values[idx as usize] = 0;
        }
        used += 1;
    }

    log::debug!(
        "progression: N={} p_max={} -> {} progressions marked",
        n,
        p_max,
        used
    );
    Ok(Indicator { values })
}

/// Decide T[n] from the progressions of the primes in `primes`.
///
/// Without a table, primes up to sqrt(2n+1) + 1 are generated. The scan
/// stops at the first prime whose base exceeds n (no later progression can
/// reach n) or at the first progression that contains n.
///
/// If the table runs out first, the answer "prime" is only returned when the
/// table covers sqrt(2n+1); otherwise the call fails with
/// [`IndicatorError::InsufficientCoverage`]. A composite verdict needs no
/// coverage and is always returned.
pub fn formula_indicator(n: u64, primes: Option<&PrimeTable>) -> Result<u8> {
    if n < 1 {
        return Ok(0);
    }
    let odd = checked_odd(n)?;
    if odd == 3 {
        return Ok(1);
    }

    let generated;
    let table = match primes {
        Some(table) => table,
        None => {
            generated = PrimeTable::up_to(isqrt(odd) + 1);
            &generated
        }
    };

    for p in table.odd_primes() {
        let base = progression_base(p);
        if base > n {
            return Ok(1);
        }
        if (n - base) % p == 0 {
            return Ok(0);
        }
    }

    if table.decides(odd) {
        Ok(1)
    } else {
        Err(IndicatorError::InsufficientCoverage {
            index: n,
            needed: isqrt(odd),
            covered: table.limit(),
        })
    }
}

/// T[0..N] by evaluating [`formula_indicator`] at every index against one
/// shared table up to sqrt(2N+1).
pub fn formula_indicator_table(n: u64, limits: &Limits) -> Result<Indicator> {
    let len = limits.table_len(n)?;
    let table = PrimeTable::up_to(isqrt(2 * n + 1) + 1);
    let values = (0..len as u64)
        .map(|idx| formula_indicator(idx, Some(&table)))
        .collect::<Result<Vec<u8>>>()?;
    Ok(Indicator { values })
}

/// Selector for one of the three constructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndicatorMethod {
    Sieve,
    Progression { p_max: Option<u64> },
    Formula,
}

impl IndicatorMethod {
    /// Build T[0..N] with this construction.
    pub fn build(&self, n: u64, limits: &Limits) -> Result<Indicator> {
        match *self {
            IndicatorMethod::Sieve => sieve_indicator_with(n, limits),
            IndicatorMethod::Progression { p_max } => progression_indicator_with(n, p_max, limits),
            IndicatorMethod::Formula => formula_indicator_table(n, limits),
        }
    }

    /// Same construction with a prime bound; only progression marking uses it.
    pub fn with_p_max(self, p_max: Option<u64>) -> Self {
        match self {
            IndicatorMethod::Progression { .. } => IndicatorMethod::Progression { p_max },
            other => other,
        }
    }
}

impl fmt::Display for IndicatorMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorMethod::Sieve => write!(f, "sieve"),
            IndicatorMethod::Progression { p_max: None } => write!(f, "progression"),
            IndicatorMethod::Progression { p_max: Some(p) } => {
                write!(f, "progression (p_max={})", p)
            }
            IndicatorMethod::Formula => write!(f, "formula"),
        }
    }
}

impl FromStr for IndicatorMethod {
    type Err = IndicatorError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sieve" => Ok(IndicatorMethod::Sieve),
            "progression" => Ok(IndicatorMethod::Progression { p_max: None }),
            "formula" => Ok(IndicatorMethod::Formula),
            other => Err(IndicatorError::InvalidArgument(format!(
                "unknown indicator method '{other}' (expected sieve|progression|formula)"
            ))),
        }
    }
}
