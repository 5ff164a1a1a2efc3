/// Quadratic form f(m,n) = 4 + 3m + 3n + 2mn: CLI
///
/// Usage:
///   quadratic-form --mode=collisions   [--max-m=200] [--max-n=200] [--list-first=20] [--mods=3,4,8] [--primes=3,5,7] [--json=path]
///   quadratic-form --mode=multiplicity [--max=100000] [--limit=200]
///   quadratic-form --mode=coverage     [--max=20000]
///   quadratic-form --mode=generate     [--max-m=200] [--max-n=200] [--state=path]
///
/// Modes:
///   collisions   : value counts over the grid, residues and divisibility
///   multiplicity : enumerated preimage counts vs d(c) - 2
///   coverage     : every odd composite 9..=max has a preimage
///   generate     : row-by-row collision table, resumable from --state

use odd_prime_indicator::MillerRabin;
use quadratic_form::{
    coverage_scan, divisibility_counts, generate_counts, residue_distribution, summarize,
    verify_multiplicity, CollisionGenerator, EntryKind, FormError, Result,
};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_args(&args);

    let mode = opts.get("mode").map(|s| s.as_str()).unwrap_or("collisions");

    let outcome = match mode {
        "collisions" => run_collisions(&opts),
        "multiplicity" => run_multiplicity(&opts),
        "coverage" => run_coverage(&opts),
        "generate" => run_generate(&opts),
        other => Err(FormError::InvalidArgument(format!(
            "unknown mode '{other}', use --mode=collisions|multiplicity|coverage|generate"
        ))),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

#[derive(Serialize)]
struct CollisionsOutput {
    max_m: u64,
    max_n: u64,
    summary: quadratic_form::Summary,
    residues: Vec<(u64, Vec<usize>)>,
    divisibility: Vec<quadratic_form::DivisibilityCount>,
}

fn run_collisions(opts: &HashMap<String, String>) -> Result<()> {
    let max_m = get_u64(opts, "max-m", 200)?;
    let max_n = get_u64(opts, "max-n", 200)?;
    let list_first = get_u64(opts, "list-first", 20)? as usize;
    let mods = get_list(opts, "mods", &[3, 4, 8])?;
    let primes = get_list(opts, "primes", &[3, 5, 7])?;

    let counts = generate_counts(max_m, max_n);
    let summary = summarize(&counts, &MillerRabin);

    println!("f(m,n) = 4 + 3m + 3n + 2mn over m<={max_m}, n<={max_n}");
    println!("  distinct values:   {}", summary.distinct);
    println!("  collisions:        {}", summary.collisions);
    println!("  unique, prime:     {}", summary.unique_primes);
    println!("  unique, not prime: {}", summary.unique_nonprimes);

    println!("\nFirst {list_first} values (value: count)");
    for (value, count) in counts.iter().take(list_first) {
        println!("  {value:6}: {count}");
    }

    let mut residues = Vec::with_capacity(mods.len());
    for &modulus in &mods {
        let buckets = residue_distribution(&counts, modulus)?;
        println!("\nResidues mod {modulus}: {buckets:?}");
        residues.push((modulus, buckets));
    }

    let divisibility = divisibility_counts(&counts, &primes)?;
    println!();
    for d in &divisibility {
        println!(
            "  divisible by {:3}: {:7} ({:.4})",
            d.prime, d.divisible, d.fraction
        );
    }

    if let Some(path) = opts.get("json") {
        let output = CollisionsOutput {
            max_m,
            max_n,
            summary,
            residues,
            divisibility,
        };
        write_json(&output, path);
    }
    Ok(())
}

fn run_multiplicity(opts: &HashMap<String, String>) -> Result<()> {
    let max = get_u64(opts, "max", 100_000)?;
    let limit = get_u64(opts, "limit", 200)? as usize;

    let report = verify_multiplicity(max, limit);
    println!("Preimage multiplicity over {} samples", report.samples);
    if report.passed() {
        println!("  ordered = d(c) - 2 and unordered = ceil((d(c) - 2) / 2) for every sample");
    }
    for m in &report.ordered_mismatches {
        println!("  ordered   c={}: got {}, expected {}", m.c, m.got, m.expected);
    }
    for m in &report.unordered_mismatches {
        println!("  unordered c={}: got {}, expected {}", m.c, m.got, m.expected);
    }
    if let Some(path) = opts.get("json") {
        write_json(&report, path);
    }
    Ok(())
}

fn run_coverage(opts: &HashMap<String, String>) -> Result<()> {
    let max = get_u64(opts, "max", 20_000)?;
    let report = coverage_scan(max, &MillerRabin);
    println!(
        "Odd composites 9..={}: {} checked, {} without a preimage",
        report.max, report.checked, report.miss_count
    );
    if !report.misses.is_empty() {
        println!("  first misses: {:?}", report.misses);
    }
    if let Some(path) = opts.get("json") {
        write_json(&report, path);
    }
    Ok(())
}

fn run_generate(opts: &HashMap<String, String>) -> Result<()> {
    let max_m = get_u64(opts, "max-m", 200)?;
    let max_n = get_u64(opts, "max-n", 200)?;
    let state = opts.get("state").map(Path::new);

    let mut generator = match state {
        Some(path) => CollisionGenerator::resume_or_new(path, max_n)?,
        None => CollisionGenerator::new(max_n),
    };
    let processed = generator.generate_up_to(max_m, state)?;
    println!(
        "Processed {} new rows, table now has {} rows and {} values",
        processed,
        generator.rows_completed(),
        generator.state().values.len()
    );

    let entries = generator.classified_entries(&MillerRabin);
    let count = |kind: EntryKind| entries.iter().filter(|(_, k)| *k == kind).count();
    println!("  collisions:        {}", count(EntryKind::Collision));
    println!("  unique, prime:     {}", count(EntryKind::Prime));
    println!("  unique, composite: {}", count(EntryKind::UniqueComposite));
    Ok(())
}

// ---------------------------------------------------------------------------
// Argument parsing helpers
// ---------------------------------------------------------------------------

fn parse_args(args: &[String]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for arg in args {
        if let Some(kv) = arg.strip_prefix("--") {
            if let Some((k, v)) = kv.split_once('=') {
                map.insert(k.to_string(), v.to_string());
            } else {
                map.insert(kv.to_string(), "true".to_string());
            }
        }
    }
    map
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|e| FormError::InvalidArgument(format!("--{key}={value}: {e}")))
}

fn get_u64(opts: &HashMap<String, String>, key: &str, default: u64) -> Result<u64> {
    opts.get(key)
        .map(|v| parse_u64(key, v))
        .unwrap_or(Ok(default))
}

fn get_list(opts: &HashMap<String, String>, key: &str, default: &[u64]) -> Result<Vec<u64>> {
    match opts.get(key) {
        Some(v) => v
            .split(',')
            .filter(|s| !s.trim().is_empty())
            .map(|s| parse_u64(key, s))
            .collect(),
        None => Ok(default.to_vec()),
    }
}

fn write_json<T: Serialize>(value: &T, path: &str) {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Warning: could not create directory {parent:?}: {e}");
                return;
            }
        }
    }
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            if let Err(e) = std::fs::write(path, json) {
                eprintln!("Warning: could not write {path}: {e}");
            } else {
                println!("\nResults written to {path}");
            }
        }
        Err(e) => eprintln!("Warning: could not serialize results: {e}"),
    }
}
