//! Scaling runs for the three indicator constructions.
//!
//! Times sieve, progression marking and per-index formula evaluation for
//! increasing N, spot-checks the formula against Miller-Rabin at random
//! indices far beyond any table, and tracks how collisions of
//! f(m,n) = 4 + 3m + 3n + 2mn grow with the grid.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::mpsc;
use std::time::{Duration, Instant};

use odd_prime_indicator::{
    formula_indicator, formula_indicator_table, isqrt, progression_indicator, sieve_indicator,
    verify_equivalence, Limits, MillerRabin, PrimalityOracle, PrimeTable,
};
use quadratic_form::{generate_counts, summarize, verify_multiplicity};

/// Maximum time per single construction (seconds).
const TIMEOUT_SECS: u64 = 30;

/// Run a closure with a timeout. Returns None if timed out.
fn with_timeout<T: Send + 'static>(
    timeout: Duration,
    f: impl FnOnce() -> T + Send + 'static,
) -> Option<(T, Duration)> {
    let (tx, rx) = mpsc::channel();
    let start = Instant::now();
    std::thread::spawn(move || {
        let result = f();
        let _ = tx.send(result);
    });
    match rx.recv_timeout(timeout) {
        Ok(result) => Some((result, start.elapsed())),
        Err(_) => None,
    }
}

fn main() {
    println!("================================================================");
    println!("  SCALING: Odd-Prime Indicator Constructions");
    println!("================================================================\n");

    let sizes: Vec<u64> = vec![1_000, 10_000, 100_000, 1_000_000, 10_000_000];

    bench_constructions(&sizes);
    bench_formula_spot_checks();
    bench_verification(&sizes);
    bench_collisions();
}

// ============================================================================
// Whole-table constructions
// ============================================================================

fn bench_constructions(sizes: &[u64]) {
    println!("================================================================");
    println!("  Whole-table constructions");
    println!("================================================================\n");
    println!(
        "  {:>10} {:>12} {:>12} {:>12} {:>10} {:>8}",
        "N", "sieve_us", "progr_us", "formula_us", "#primes", "agree"
    );
    println!("  {}", "-".repeat(70));

    let timeout = Duration::from_secs(TIMEOUT_SECS);
    for &n in sizes {
        let sieve = with_timeout(timeout, move || sieve_indicator(n));
        let progression = with_timeout(timeout, move || progression_indicator(n, None));
        let formula = with_timeout(timeout, move || {
            formula_indicator_table(n, &Limits::default())
        });

        let (sieve_t, sieve_us) = match sieve {
            Some((Ok(t), d)) => (Some(t), d.as_micros().to_string()),
            Some((Err(e), _)) => (None, format!("ERR {e}")),
            None => (None, "TIMEOUT".to_string()),
        };
        let (progression_t, progression_us) = match progression {
            Some((Ok(t), d)) => (Some(t), d.as_micros().to_string()),
            Some((Err(e), _)) => (None, format!("ERR {e}")),
            None => (None, "TIMEOUT".to_string()),
        };
        let (formula_t, formula_us) = match formula {
            Some((Ok(t), d)) => (Some(t), d.as_micros().to_string()),
            Some((Err(e), _)) => (None, format!("ERR {e}")),
            None => (None, "TIMEOUT".to_string()),
        };

        let primes = sieve_t
            .as_ref()
            .map(|t| t.prime_count().to_string())
            .unwrap_or_else(|| "-".to_string());
        let agree = match (&sieve_t, &progression_t, &formula_t) {
            (Some(s), Some(p), Some(f)) => {
                if s == p && s == f {
                    "yes"
                } else {
                    "NO"
                }
            }
            _ => "-",
        };

        println!(
            "  {:>10} {:>12} {:>12} {:>12} {:>10} {:>8}",
            n, sieve_us, progression_us, formula_us, primes, agree
        );
    }
    println!();
}

// ============================================================================
// Single-index formula far beyond any table
// ============================================================================

fn bench_formula_spot_checks() {
    println!("================================================================");
    println!("  Single-index formula vs Miller-Rabin");
    println!("================================================================\n");
    println!(
        "  {:>14} {:>8} {:>10} {:>10} {:>10}",
        "max index", "samples", "table", "time_us", "mismatch"
    );
    println!("  {}", "-".repeat(58));

    let mut rng = StdRng::seed_from_u64(12345);
    let samples = 500;

    for exp in [6u32, 9, 12] {
        let max_index = 10u64.pow(exp);
        let table = PrimeTable::up_to(isqrt(2 * max_index + 1) + 1);
        let indices: Vec<u64> = (0..samples).map(|_| rng.gen_range(1..=max_index)).collect();

        let start = Instant::now();
        let mut mismatches = 0usize;
        let mut undecided = 0usize;
        for &idx in &indices {
            match formula_indicator(idx, Some(&table)) {
                Ok(v) => {
                    let expected = MillerRabin.is_prime(2 * idx + 1) as u8;
                    if v != expected {
                        mismatches += 1;
                    }
                }
                Err(_) => undecided += 1,
            }
        }
        let elapsed = start.elapsed();

        println!(
            "  {:>14} {:>8} {:>10} {:>10} {:>10}",
            max_index,
            samples,
            table.limit(),
            elapsed.as_micros(),
            if undecided > 0 {
                format!("{mismatches} ({undecided} undecided)")
            } else {
                mismatches.to_string()
            }
        );
    }
    println!();
}

// ============================================================================
// Equivalence verification
// ============================================================================

fn bench_verification(sizes: &[u64]) {
    println!("================================================================");
    println!("  Equivalence verification");
    println!("================================================================\n");
    println!(
        "  {:>10} {:>10} {:>12} {:>10}",
        "N", "sample", "time_us", "status"
    );
    println!("  {}", "-".repeat(46));

    for &n in sizes {
        match with_timeout(Duration::from_secs(TIMEOUT_SECS), move || {
            verify_equivalence(n, None)
        }) {
            Some((Ok(report), d)) => println!(
                "  {:>10} {:>10} {:>12} {:>10}",
                n,
                report.sample_size,
                d.as_micros(),
                if report.passed() { "PASS" } else { "FAIL" }
            ),
            Some((Err(e), _)) => println!("  {:>10} {:>10} {:>12} ERR {}", n, "-", "-", e),
            None => println!("  {:>10} {:>10} {:>12} {:>10}", n, "-", "-", "TIMEOUT"),
        }
    }
    println!();
}

// ============================================================================
// Quadratic form collisions
// ============================================================================

fn bench_collisions() {
    println!("================================================================");
    println!("  f(m,n) collisions by grid size");
    println!("================================================================\n");
    println!(
        "  {:>6} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "bound", "distinct", "collide", "u_prime", "u_other", "time_us"
    );
    println!("  {}", "-".repeat(62));

    for bound in [50u64, 100, 200, 400, 800] {
        let start = Instant::now();
        let counts = generate_counts(bound, bound);
        let summary = summarize(&counts, &MillerRabin);
        let elapsed = start.elapsed();
        println!(
            "  {:>6} {:>10} {:>10} {:>10} {:>10} {:>10}",
            bound,
            summary.distinct,
            summary.collisions,
            summary.unique_primes,
            summary.unique_nonprimes,
            elapsed.as_micros()
        );
    }
    println!();

    let start = Instant::now();
    let report = verify_multiplicity(1_000_000, 2_000);
    println!(
        "  multiplicity on {} odd composites: {} in {} ms",
        report.samples,
        if report.passed() { "PASS" } else { "FAIL" },
        start.elapsed().as_millis()
    );
}
