//! Independent primality tests used as ground truth for spot checks.

/// Anything that can answer "is this integer prime?".
///
/// Implemented for [`MillerRabin`], [`TrialDivision`] and for any
/// `Fn(u64) -> bool` closure.
pub trait PrimalityOracle {
    fn is_prime(&self, n: u64) -> bool;

    /// Label used in reports.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<F: Fn(u64) -> bool> PrimalityOracle for F {
    fn is_prime(&self, n: u64) -> bool {
        self(n)
    }
}

/// Deterministic Miller-Rabin over the full u64 range.
#[derive(Debug, Clone, Copy, Default)]
pub struct MillerRabin;

impl PrimalityOracle for MillerRabin {
    fn is_prime(&self, n: u64) -> bool {
        is_prime_u64(n)
    }

    fn name(&self) -> &str {
        "miller-rabin"
    }
}

/// Naive odd trial division up to `sqrt(n)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialDivision;

impl PrimalityOracle for TrialDivision {
    fn is_prime(&self, n: u64) -> bool {
        is_prime_trial(n)
    }

    fn name(&self) -> &str {
        "trial-division"
    }
}

/// Modular exponentiation: base^exp mod m using binary method.
pub fn mod_pow(base: u64, mut exp: u64, m: u64) -> u64 {
    if m == 1 {
        return 0;
    }
    let m = m as u128;
    let mut result = 1u128;
    let mut b = base as u128 % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * b % m;
        }
        exp >>= 1;
        b = b * b % m;
    }
    result as u64
}

/// Deterministic Miller-Rabin primality test for n < 3.3 * 10^24.
/// Uses witnesses {2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37}.
pub fn is_prime_u64(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }

    // Write n-1 = 2^s * d
    let mut d = n - 1;
    let mut s = 0u32;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }

    let witnesses = [2u64, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];
    'outer: for &a in &witnesses {
        if a >= n {
            continue;
        }
        let mut x = mod_pow(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 0..s - 1 {
            x = (x as u128 * x as u128 % n as u128) as u64;
            if x == n - 1 {
                continue 'outer;
            }
        }
        return false;
    }
    true
}

/// Trial division by 2 and every odd d with d*d <= n.
pub fn is_prime_trial(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }
    let mut d = 3u64;
    while d <= n / d {
        if n % d == 0 {
            return false;
        }
        d += 2;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mod_pow_basic() {
        assert_eq!(mod_pow(2, 10, 1000), 24);
        assert_eq!(mod_pow(3, 0, 7), 1);
        assert_eq!(mod_pow(5, 690, 691), 1); // Fermat's little theorem
        assert_eq!(mod_pow(7, 1, 7), 0);
        assert_eq!(mod_pow(9, 9, 1), 0);
    }

    #[test]
    fn test_miller_rabin_small() {
        let primes: Vec<u64> = (0..100).filter(|&n| is_prime_u64(n)).collect();
        assert_eq!(
            primes,
            vec![
                2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73,
                79, 83, 89, 97
            ]
        );
    }

    #[test]
    fn test_miller_rabin_strong_pseudoprimes() {
        // Carmichael numbers and strong pseudoprimes to small bases
        for n in [561u64, 1105, 1729, 2047, 3215031751, 3825123056546413051] {
            assert!(!is_prime_u64(n), "{} is composite", n);
        }
        assert!(is_prime_u64(1_000_000_007));
        assert!(is_prime_u64(18_446_744_073_709_551_557)); // largest 64-bit prime
    }

    #[test]
    fn test_trial_division_agrees_with_miller_rabin() {
        for n in 0..20_000u64 {
            assert_eq!(is_prime_trial(n), is_prime_u64(n), "disagreement at {}", n);
        }
    }

    #[test]
    fn test_closure_oracle() {
        let odd_only = |n: u64| n % 2 == 1;
        assert!(odd_only.is_prime(9));
        assert_eq!(odd_only.name(), "custom");
        assert_eq!(MillerRabin.name(), "miller-rabin");
        assert!(TrialDivision.is_prime(97));
    }
}
