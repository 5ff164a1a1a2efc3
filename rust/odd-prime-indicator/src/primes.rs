//! Complete prime tables.

use num_integer::Roots;

use crate::error::{IndicatorError, Result};
use crate::oracle::is_prime_u64;

/// Generate all primes up to `limit` using the Sieve of Eratosthenes.
pub fn primes_up_to(limit: u64) -> Vec<u64> {
    if limit < 2 {
        return Vec::new();
    }
    let size = (limit + 1) as usize;
    let mut is_prime = vec![true; size];
    is_prime[0] = false;
    is_prime[1] = false;
    let mut i = 2usize;
    while i * i < size {
        if is_prime[i] {
            let mut j = i * i;
            while j < size {
                is_prime[j] = false;
                j += i;
            }
        }
        i += 1;
    }
    is_prime
        .iter()
        .enumerate()
        .filter(|(_, &p)| p)
        .map(|(i, _)| i as u64)
        .collect()
}

/// Floor of the square root.
pub fn isqrt(n: u64) -> u64 {
    n.sqrt()
}

/// Every prime up to `limit`, ascending.
///
/// The limit is kept alongside the list: a table built up to 10 covers 8, 9
/// and 10 even though its last prime is 7.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrimeTable {
    limit: u64,
    primes: Vec<u64>,
}

impl PrimeTable {
    /// Sieve a complete table up to `limit`.
    pub fn up_to(limit: u64) -> Self {
        PrimeTable {
            limit,
            primes: primes_up_to(limit),
        }
    }

    /// Wrap an externally supplied prime list.
    ///
    /// Entries must be strictly increasing primes with no gaps, starting at
    /// 2. The covered limit is the last entry.
    pub fn from_primes(primes: Vec<u64>) -> Result<Self> {
        if let Some(w) = primes.windows(2).find(|w| w[0] >= w[1]) {
            return Err(IndicatorError::InvalidArgument(format!(
                "prime list must be strictly increasing, found {} before {}",
                w[0], w[1]
            )));
        }
        if let Some(&bad) = primes.iter().find(|&&p| !is_prime_u64(p)) {
            return Err(IndicatorError::InvalidArgument(format!(
                "prime list contains non-prime {bad}"
            )));
        }
        let limit = primes.last().copied().unwrap_or(0);
        let complete = primes_up_to(limit);
        if let Some((&missing, _)) = complete
            .iter()
            .zip(primes.iter())
            .find(|(expected, given)| expected != given)
        {
            return Err(IndicatorError::InvalidArgument(format!(
                "prime list skips {missing} (ends at {limit})"
            )));
        }
        Ok(PrimeTable { limit, primes })
    }

    /// Largest value up to which the table is known to hold every prime.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    /// The odd primes of the table (everything except 2).
    pub fn odd_primes(&self) -> impl Iterator<Item = u64> + '_ {
        self.primes.iter().copied().filter(|&p| p >= 3)
    }

    pub fn len(&self) -> usize {
        self.primes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primes.is_empty()
    }

    /// Whether every prime factor up to `sqrt(x)` is present, i.e. whether
    /// trial division by this table decides the primality of `x`.
    pub fn decides(&self, x: u64) -> bool {
        self.limit >= isqrt(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primes_up_to_small() {
        assert!(primes_up_to(0).is_empty());
        assert!(primes_up_to(1).is_empty());
        assert_eq!(primes_up_to(2), vec![2]);
        assert_eq!(primes_up_to(30), vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
        assert_eq!(primes_up_to(49).last(), Some(&47));
    }

    #[test]
    fn test_prime_count_10k() {
        // pi(10^4) = 1229
        assert_eq!(primes_up_to(10_000).len(), 1229);
    }

    #[test]
    fn test_isqrt() {
        assert_eq!(isqrt(0), 0);
        assert_eq!(isqrt(8), 2);
        assert_eq!(isqrt(9), 3);
        assert_eq!(isqrt(u64::MAX), 4_294_967_295);
    }

    #[test]
    fn test_table_limit_beyond_last_prime() {
        let table = PrimeTable::up_to(10);
        assert_eq!(table.primes(), &[2, 3, 5, 7]);
        assert_eq!(table.limit(), 10);
        // sqrt(100) = 10 is covered even though 10 is not prime
        assert!(table.decides(100));
        assert!(!table.decides(121));
        assert_eq!(table.odd_primes().collect::<Vec<_>>(), vec![3, 5, 7]);
    }

    #[test]
    fn test_from_primes_validation() {
        let table = PrimeTable::from_primes(vec![2, 3, 5, 7, 11]).unwrap();
        assert_eq!(table.limit(), 11);

        assert!(matches!(
            PrimeTable::from_primes(vec![3, 2]),
            Err(IndicatorError::InvalidArgument(_))
        ));
        assert!(matches!(
            PrimeTable::from_primes(vec![3, 5, 9]),
            Err(IndicatorError::InvalidArgument(_))
        ));

        // gaps would let a composite through the coverage check
        match PrimeTable::from_primes(vec![2, 3, 7]) {
            Err(IndicatorError::InvalidArgument(msg)) => assert!(msg.contains("skips 5"), "{msg}"),
            other => panic!("expected a gap error, got {:?}", other),
        }
        assert!(PrimeTable::from_primes(vec![3, 5, 7]).is_err());
        assert_eq!(
            PrimeTable::from_primes(primes_up_to(1_000)).unwrap(),
            PrimeTable {
                limit: 997,
                primes: primes_up_to(1_000)
            }
        );

        let empty = PrimeTable::from_primes(Vec::new()).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.limit(), 0);
    }
}
