//! Integration tests for the indicator constructions.

use odd_prime_indicator::{
    formula_indicator, is_prime_trial, primes_up_to, progression_base, progression_indicator,
    sieve_indicator, verify_equivalence, PrimeTable,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_sieve_matches_independent_primality() {
    for n in [0u64, 1, 50, 1000, 100_000] {
        let t = sieve_indicator(n).unwrap();
        assert_eq!(t.len() as u64, n + 1);
        for idx in 0..=n {
            let expected = u8::from(is_prime_trial(2 * idx + 1));
            assert_eq!(
                t[idx as usize], expected,
                "N={}: T[{}] for o={}",
                n, idx, 2 * idx + 1
            );
        }
    }
}

#[test]
fn test_exhaustive_progression_equals_sieve() {
    for n in [0u64, 1, 2, 7, 50, 1000, 100_000] {
        let sieve = sieve_indicator(n).unwrap();
        let progression = progression_indicator(n, Some(2 * n + 1)).unwrap();
        assert_eq!(sieve, progression, "N={}", n);
        assert_eq!(progression_indicator(n, None).unwrap(), sieve, "N={}", n);
    }
}

#[test]
fn test_first_entries_fixed() {
    for n in [1u64, 2, 10, 1000] {
        let t = sieve_indicator(n).unwrap();
        assert_eq!(t[0], 0, "o_0 = 1 is not prime");
        assert_eq!(t[1], 1, "o_1 = 3 is prime");
        let p = progression_indicator(n, Some(1)).unwrap();
        assert_eq!(p[0], 0);
    }
}

#[test]
fn test_relaxed_bound_only_removes_marks() {
    let n = 5_000u64;
    let exact = sieve_indicator(n).unwrap();
    let bounds = [0u64, 3, 5, 7, 11, 30, 71, 100, 1_000, 2 * n + 1];
    let tables: Vec<_> = bounds
        .iter()
        .map(|&b| progression_indicator(n, Some(b)).unwrap())
        .collect();

    for (i, small) in tables.iter().enumerate() {
        // every composite mark is a true composite
        for idx in 0..=n as usize {
            if small[idx] == 0 {
                assert_eq!(exact[idx], 0, "p_max={} marks prime o={}", bounds[i], 2 * idx + 1);
            }
        }
        // a larger bound keeps every mark of a smaller one
        for (j, large) in tables.iter().enumerate().skip(i) {
            for idx in 0..=n as usize {
                if small[idx] == 0 {
                    assert_eq!(
                        large[idx], 0,
                        "p_max={} drops mark at {} made by p_max={}",
                        bounds[j], idx, bounds[i]
                    );
                }
            }
        }
    }

    // primes above sqrt(2N+1) add no marks beyond those of smaller primes
    let sqrt_bound = odd_prime_indicator::isqrt(2 * n + 1);
    assert_eq!(progression_indicator(n, Some(sqrt_bound)).unwrap(), exact);
}

#[test]
fn test_progression_base_strictly_increasing() {
    let odd_primes: Vec<u64> = primes_up_to(100_000)
        .into_iter()
        .filter(|&p| p >= 3)
        .collect();
    for w in odd_primes.windows(2) {
        assert!(
            progression_base(w[0]) < progression_base(w[1]),
            "base({}) >= base({})",
            w[0],
            w[1]
        );
    }
}

#[test]
fn test_progression_points_are_odd_multiples() {
    for p in [3u64, 5, 7, 11, 97] {
        let base = progression_base(p);
        for m in 0..20u64 {
            let idx = base + p * m;
            assert_eq!(2 * idx + 1, p * (2 * m + 3));
        }
    }
}

#[test]
fn test_formula_random_indices_against_sieve() {
    let n = 200_000u64;
    let exact = sieve_indicator(n).unwrap();
    let table = PrimeTable::up_to(2 * n + 1);
    let mut rng = StdRng::seed_from_u64(0x0dd_5eed);
    for _ in 0..2_000 {
        let idx = rng.gen_range(0..=n);
        assert_eq!(
            formula_indicator(idx, Some(&table)).unwrap(),
            exact[idx as usize],
            "index {}",
            idx
        );
        // the default sqrt-sized table gives the same verdict
        assert_eq!(formula_indicator(idx, None).unwrap(), exact[idx as usize]);
    }
}

#[test]
fn test_formula_with_external_prime_list() {
    let table = PrimeTable::from_primes(vec![2, 3, 5, 7, 11, 13]).unwrap();
    // 169 = 13^2, n = 84
    assert_eq!(formula_indicator(84, Some(&table)), Ok(0));
    // 167 is prime and sqrt(167) = 12 <= 13
    assert_eq!(formula_indicator(83, Some(&table)), Ok(1));
    // 17 * 19 = 323, n = 161: beyond the table
    assert!(formula_indicator(161, Some(&table)).is_err());
}

#[test]
fn test_prime_list_with_gap_is_rejected() {
    // without 5, index 12 (o = 25) would be reported prime
    assert!(PrimeTable::from_primes(vec![2, 3, 7]).is_err());
    let complete = PrimeTable::from_primes(vec![2, 3, 5, 7]).unwrap();
    assert_eq!(formula_indicator(12, Some(&complete)), Ok(0));
    assert_eq!(sieve_indicator(12).unwrap()[12], 0);
}

#[test]
fn test_verify_small_sizes_have_no_mismatches() {
    for n in [0u64, 1] {
        let report = verify_equivalence(n, None).unwrap();
        assert_eq!(report.total_mismatches(), 0, "{}", report);
    }
}

#[test]
fn test_verify_medium_exhaustive() {
    let report = verify_equivalence(20_000, None).unwrap();
    assert!(report.passed(), "{}", report);
    assert!(report.to_string().contains("[PASS] formula vs sieve"));
}
