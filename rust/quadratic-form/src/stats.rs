//! Residue and divisibility statistics over the distinct values of f.

use serde::Serialize;

use crate::error::{FormError, Result};
use crate::form::Counts;

/// Histogram of distinct values by residue mod `modulus`.
pub fn residue_distribution(counts: &Counts, modulus: u64) -> Result<Vec<usize>> {
    if modulus == 0 {
        return Err(FormError::InvalidArgument(
            "residue modulus must be positive".to_string(),
        ));
    }
    let mut buckets = vec![0usize; modulus as usize];
    for &value in counts.keys() {
        buckets[(value % modulus) as usize] += 1;
    }
    Ok(buckets)
}

/// (r0, r1, r2): distinct values congruent to 0, 1, 2 mod 3.
pub fn mod3_distribution(counts: &Counts) -> (usize, usize, usize) {
    let mut r = [0usize; 3];
    for &value in counts.keys() {
        r[(value % 3) as usize] += 1;
    }
    (r[0], r[1], r[2])
}

/// Distinct values divisible by a given prime.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DivisibilityCount {
    pub prime: u64,
    pub divisible: usize,
    /// Share of distinct values divisible by `prime`.
    pub fraction: f64,
}

/// For each entry of `primes`, count the distinct values it divides.
pub fn divisibility_counts(counts: &Counts, primes: &[u64]) -> Result<Vec<DivisibilityCount>> {
    if let Some(&zero) = primes.iter().find(|&&p| p == 0) {
        return Err(FormError::InvalidArgument(format!(
            "cannot count divisibility by {zero}"
        )));
    }
    let total = counts.len();
    Ok(primes
        .iter()
        .map(|&p| {
            let divisible = counts.keys().filter(|&&v| v % p == 0).count();
            DivisibilityCount {
                prime: p,
                divisible,
                fraction: if total == 0 {
                    0.0
                } else {
                    divisible as f64 / total as f64
                },
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::generate_counts;

    #[test]
    fn test_residue_distribution() {
        let counts = generate_counts(1, 1); // {4, 7, 12}
        assert_eq!(residue_distribution(&counts, 3).unwrap(), vec![1, 2, 0]);
        assert_eq!(residue_distribution(&counts, 4).unwrap(), vec![2, 0, 0, 1]);
        assert_eq!(residue_distribution(&counts, 1).unwrap(), vec![3]);
        assert!(matches!(
            residue_distribution(&counts, 0),
            Err(FormError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_mod3_matches_histogram() {
        let counts = generate_counts(40, 40);
        let (r0, r1, r2) = mod3_distribution(&counts);
        assert_eq!(
            residue_distribution(&counts, 3).unwrap(),
            vec![r0, r1, r2]
        );
        assert_eq!(r0 + r1 + r2, counts.len());
    }

    #[test]
    fn test_divisibility_counts() {
        let counts = generate_counts(1, 1); // {4, 7, 12}
        let result = divisibility_counts(&counts, &[2, 3, 7]).unwrap();
        let divisible: Vec<usize> = result.iter().map(|d| d.divisible).collect();
        assert_eq!(divisible, vec![2, 1, 1]);
        assert!((result[0].fraction - 2.0 / 3.0).abs() < 1e-12);
        assert!(divisibility_counts(&counts, &[3, 0]).is_err());
    }
}
