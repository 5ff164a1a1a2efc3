//! Cross-verification of the three constructions against each other and an
//! independent primality oracle.
//!
//! Disagreements are collected, never raised: every check runs to the end,
//! counts all mismatches and keeps the first few as examples.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::indicator::{
    formula_indicator, progression_indicator_with, sieve_indicator_with, Limits,
};
use crate::oracle::{MillerRabin, PrimalityOracle};
use crate::primes::{isqrt, PrimeTable};

/// Mismatch examples kept per check.
pub const MAX_REPORTED: usize = 10;

/// Knobs for [`verify_equivalence_with`].
#[derive(Debug, Clone, Serialize)]
pub struct VerifyConfig {
    /// Prime bound for progression marking (None = exhaustive).
    pub p_max: Option<u64>,
    pub limits: Limits,
    /// Sample the indices 0..min(N, head).
    pub head: u64,
    /// Sample N/2 + i for -window <= i < window.
    pub window: u64,
    /// Sample the last `tail` indices.
    pub tail: u64,
    pub max_reported: usize,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        VerifyConfig {
            p_max: None,
            limits: Limits::default(),
            head: 2000,
            window: 100,
            tail: 1000,
            max_reported: MAX_REPORTED,
        }
    }
}

/// Which pair of answers a check compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CheckKind {
    /// Full range: sieve (expected) vs progression marking (actual).
    SieveVsProgression,
    /// Sampled: oracle (expected) vs sieve (actual).
    SieveVsOracle,
    /// Sampled: sieve (expected) vs per-index formula (actual).
    FormulaVsSieve,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckKind::SieveVsProgression => write!(f, "sieve vs progression"),
            CheckKind::SieveVsOracle => write!(f, "sieve vs primality oracle"),
            CheckKind::FormulaVsSieve => write!(f, "formula vs sieve"),
        }
    }
}

/// One disagreeing index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Mismatch {
    pub index: u64,
    /// The odd value 2*index + 1.
    pub odd: u64,
    pub expected: u8,
    pub actual: u8,
}

/// Result of one check.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub kind: CheckKind,
    /// Indices compared.
    pub compared: usize,
    /// All disagreements seen, including those not kept in `mismatches`.
    pub mismatch_count: usize,
    /// The first disagreements, at most `max_reported`.
    pub mismatches: Vec<Mismatch>,
    #[serde(skip)]
    max_reported: usize,
}

impl CheckOutcome {
    fn new(kind: CheckKind, max_reported: usize) -> Self {
        CheckOutcome {
            kind,
            compared: 0,
            mismatch_count: 0,
            mismatches: Vec::new(),
            max_reported,
        }
    }

    fn compare(&mut self, index: u64, expected: u8, actual: u8) {
        self.compared += 1;
        if expected == actual {
            return;
        }
        self.mismatch_count += 1;
        if self.mismatches.len() < self.max_reported {
            self.mismatches.push(Mismatch {
                index,
                odd: 2 * index + 1,
                expected,
                actual,
            });
        }
    }

    pub fn passed(&self) -> bool {
        self.mismatch_count == 0
    }
}

/// Outcome of [`verify_equivalence`].
#[derive(Debug, Clone, Serialize)]
pub struct VerificationReport {
    pub n: u64,
    pub p_max: Option<u64>,
    pub oracle: String,
    /// Number of sampled indices used by the oracle and formula checks.
    pub sample_size: usize,
    pub checks: Vec<CheckOutcome>,
}

impl VerificationReport {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(CheckOutcome::passed)
    }

    pub fn total_mismatches(&self) -> usize {
        self.checks.iter().map(|c| c.mismatch_count).sum()
    }

    pub fn check(&self, kind: CheckKind) -> Option<&CheckOutcome> {
        self.checks.iter().find(|c| c.kind == kind)
    }
}

impl fmt::Display for VerificationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.p_max {
            Some(p) => writeln!(f, "Verifying T up to N={} (p_max={}) ...", self.n, p)?,
            None => writeln!(f, "Verifying T up to N={} ...", self.n)?,
        }
        for check in &self.checks {
            let status = if check.passed() { "PASS" } else { "FAIL" };
            writeln!(
                f,
                "[{}] {}: {} indices compared, {} mismatches",
                status, check.kind, check.compared, check.mismatch_count
            )?;
            for m in &check.mismatches {
                writeln!(
                    f,
                    "    n={} (odd={}): expected={}, actual={}",
                    m.index, m.odd, m.expected, m.actual
                )?;
            }
            if check.mismatch_count > check.mismatches.len() {
                writeln!(
                    f,
                    "    ... {} more not shown",
                    check.mismatch_count - check.mismatches.len()
                )?;
            }
        }
        write!(
            f,
            "Oracle: {}, sampled indices: {}",
            self.oracle, self.sample_size
        )
    }
}

/// The spot-check sample: the head 0..min(N, head), a window around N/2,
/// and the last `tail` indices, sorted and deduplicated.
pub fn sample_indices(n: u64, config: &VerifyConfig) -> Vec<u64> {
    let mut sample = BTreeSet::new();
    sample.extend(0..n.min(config.head));

    let mid = n / 2;
    let lo = mid.saturating_sub(config.window);
    let hi = mid.saturating_add(config.window).min(n.saturating_add(1));
    sample.extend(lo..hi);

    let tail = config.tail.min(n.saturating_add(1));
    if tail > 0 {
        sample.extend((n - (tail - 1))..=n);
    }

    sample.into_iter().collect()
}

/// Cross-check the three constructions up to N with the default settings
/// and a Miller-Rabin oracle.
pub fn verify_equivalence(n: u64, p_max: Option<u64>) -> Result<VerificationReport> {
    let config = VerifyConfig {
        p_max,
        ..VerifyConfig::default()
    };
    verify_equivalence_with(n, &config, &MillerRabin)
}

/// Cross-check with explicit settings and oracle.
///
/// Fails only on invalid arguments; disagreements end up in the report.
pub fn verify_equivalence_with<O: PrimalityOracle + ?Sized>(
    n: u64,
    config: &VerifyConfig,
    oracle: &O,
) -> Result<VerificationReport> {
    let sieve = sieve_indicator_with(n, &config.limits)?;
    let progression = progression_indicator_with(n, config.p_max, &config.limits)?;

    let mut full = CheckOutcome::new(CheckKind::SieveVsProgression, config.max_reported);
    for (idx, (&expected, &actual)) in sieve
        .as_slice()
        .iter()
        .zip(progression.as_slice())
        .enumerate()
    {
        full.compare(idx as u64, expected, actual);
    }

    let sample = sample_indices(n, config);

    let mut against_oracle = CheckOutcome::new(CheckKind::SieveVsOracle, config.max_reported);
    for &idx in &sample {
        let truth = u8::from(oracle.is_prime(2 * idx + 1));
        against_oracle.compare(idx, truth, sieve[idx as usize]);
    }

    // sqrt(2N+1) suffices for the formula to decide every sampled index
    let table = PrimeTable::up_to(isqrt(2 * n + 1) + 1);
    let mut formula = CheckOutcome::new(CheckKind::FormulaVsSieve, config.max_reported);
    for &idx in &sample {
        let value = formula_indicator(idx, Some(&table))?;
        formula.compare(idx, sieve[idx as usize], value);
    }

    let report = VerificationReport {
        n,
        p_max: config.p_max,
        oracle: oracle.name().to_string(),
        sample_size: sample.len(),
        checks: vec![full, against_oracle, formula],
    };

    for check in report.checks.iter().filter(|c| !c.passed()) {
        log::warn!(
            "N={}: {} disagrees at {} indices",
            n,
            check.kind,
            check.mismatch_count
        );
    }
    log::info!(
        "verified N={}: {} mismatches over {} checks",
        n,
        report.total_mismatches(),
        report.checks.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::TrialDivision;

    #[test]
    fn test_sample_indices_degenerate() {
        let config = VerifyConfig::default();
        assert_eq!(sample_indices(0, &config), vec![0]);
        assert_eq!(sample_indices(1, &config), vec![0, 1]);
    }

    #[test]
    fn test_sample_indices_layout() {
        let config = VerifyConfig::default();
        let sample = sample_indices(100_000, &config);
        // 2000 head + 200 window + 1000 tail, disjoint at this size
        assert_eq!(sample.len(), 3200);
        assert_eq!(sample[0], 0);
        assert_eq!(sample[1999], 1999);
        assert_eq!(sample[2000], 49_900);
        assert_eq!(sample[2199], 50_099);
        assert_eq!(sample[2200], 99_001);
        assert_eq!(*sample.last().unwrap(), 100_000);
        assert!(sample.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_sample_indices_overlap_small() {
        let config = VerifyConfig::default();
        let sample = sample_indices(500, &config);
        assert_eq!(sample, (0..=500).collect::<Vec<u64>>());
    }

    #[test]
    fn test_verify_degenerate_sizes_pass() {
        for n in [0u64, 1] {
            let report = verify_equivalence(n, None).unwrap();
            assert!(report.passed(), "N={}: {}", n, report);
            assert_eq!(report.total_mismatches(), 0);
        }
    }

    #[test]
    fn test_verify_exhaustive_pass() {
        let report = verify_equivalence(5_000, None).unwrap();
        assert!(report.passed(), "{}", report);
        let full = report.check(CheckKind::SieveVsProgression).unwrap();
        assert_eq!(full.compared, 5_001);
    }

    #[test]
    fn test_verify_formula_check_decides_with_sqrt_table() {
        // an undecided formula verdict would surface as an error here
        for n in [2u64, 24, 120, 99_999, 1_000_000] {
            let report = verify_equivalence(n, None).unwrap();
            let formula = report.check(CheckKind::FormulaVsSieve).unwrap();
            assert!(formula.passed(), "N={}: {}", n, report);
            assert_eq!(formula.compared, report.sample_size);
        }
    }

    #[test]
    fn test_verify_relaxed_reports_capped_mismatches() {
        // p_max = 3 leaves every composite without a factor 3 unmarked
        let report = verify_equivalence(1_000, Some(3)).unwrap();
        assert!(!report.passed());

        let full = report.check(CheckKind::SieveVsProgression).unwrap();
        assert!(full.mismatch_count > MAX_REPORTED);
        assert_eq!(full.mismatches.len(), MAX_REPORTED);
        let first = full.mismatches[0];
        assert_eq!(first.index, 12); // 25 = 5 * 5
        assert_eq!(first.odd, 25);
        assert_eq!((first.expected, first.actual), (0, 1));

        // the other checks do not depend on p_max
        assert!(report.check(CheckKind::SieveVsOracle).unwrap().passed());
        assert!(report.check(CheckKind::FormulaVsSieve).unwrap().passed());

        let text = report.to_string();
        assert!(text.contains("[FAIL] sieve vs progression"));
        assert!(text.contains("more not shown"));
    }

    #[test]
    fn test_verify_faulty_oracle_is_reported() {
        // an oracle that believes 9 is prime
        let faulty = |x: u64| x == 9 || TrialDivision.is_prime(x);
        let report = verify_equivalence_with(50, &VerifyConfig::default(), &faulty).unwrap();
        let oracle = report.check(CheckKind::SieveVsOracle).unwrap();
        assert_eq!(oracle.mismatch_count, 1);
        assert_eq!(
            oracle.mismatches[0],
            Mismatch {
                index: 4,
                odd: 9,
                expected: 1,
                actual: 0
            }
        );
        assert_eq!(report.oracle, "custom");
    }

    #[test]
    fn test_verify_respects_limits() {
        let config = VerifyConfig {
            limits: Limits { max_n: 10 },
            ..VerifyConfig::default()
        };
        assert!(verify_equivalence_with(11, &config, &MillerRabin).is_err());
    }

    #[test]
    fn test_report_serializes() {
        let report = verify_equivalence(20, None).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["n"], 20);
        assert_eq!(json["checks"].as_array().unwrap().len(), 3);
        assert_eq!(json["checks"][0]["kind"], "SieveVsProgression");
    }
}
