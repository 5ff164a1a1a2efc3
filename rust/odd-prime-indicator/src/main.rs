/// Odd-prime indicator: CLI
///
/// Usage:
///   odd-prime-indicator --mode=verify  [--n=200000] [--p-max=P] [--max-n=M] [--json=path]
///   odd-prime-indicator --mode=sample  [--n=50] [--method=sieve|progression|formula] [--p-max=P] [--rows=40]
///   odd-prime-indicator --mode=formula [--indices=1,5,10,20] [--table=1000]
///
/// Modes:
///   verify  : sieve vs progression on every index, oracle and formula spot checks
///   sample  : print the first rows of T built by one construction
///   formula : single-index formula against the sieve

use odd_prime_indicator::{
    formula_indicator, parse_table_size, sieve_indicator_with, verify_equivalence_with,
    IndicatorError, IndicatorMethod, Limits, MillerRabin, PrimeTable, Result, VerifyConfig,
};
use std::collections::HashMap;

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = parse_args(&args);

    let mode = opts.get("mode").map(|s| s.as_str()).unwrap_or("verify");

    let outcome = match mode {
        "verify" => run_verify(&opts),
        "sample" => run_sample(&opts),
        "formula" => run_formula(&opts),
        other => Err(IndicatorError::InvalidArgument(format!(
            "unknown mode '{other}', use --mode=verify|sample|formula"
        ))),
    };

    if let Err(e) = outcome {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run_verify(opts: &HashMap<String, String>) -> Result<()> {
    let n = table_size(opts, 200_000)?;
    let config = VerifyConfig {
        p_max: optional_u64(opts, "p-max")?,
        limits: limits(opts)?,
        ..VerifyConfig::default()
    };

    let report = verify_equivalence_with(n, &config, &MillerRabin)?;
    println!("{report}");

    if let Some(path) = opts.get("json") {
        write_json(&report, path);
    }
    Ok(())
}

fn run_sample(opts: &HashMap<String, String>) -> Result<()> {
    let n = table_size(opts, 50)?;
    let method: IndicatorMethod = opts
        .get("method")
        .map(|s| s.parse::<IndicatorMethod>())
        .transpose()?
        .unwrap_or(IndicatorMethod::Sieve);
    let method = method.with_p_max(optional_u64(opts, "p-max")?);
    let rows = optional_u64(opts, "rows")?.unwrap_or(40);

    let t = method.build(n, &limits(opts)?)?;

    println!("T[n] via {method} (N={n})");
    println!(" n   o_n   T[n]");
    for (idx, value) in t.as_slice().iter().enumerate().take(rows as usize) {
        println!("{:2}  {:5}   {}", idx, 2 * idx + 1, value);
    }
    println!(
        "\n{} odd primes up to {}",
        t.prime_count(),
        2 * t.n() + 1
    );
    Ok(())
}

fn run_formula(opts: &HashMap<String, String>) -> Result<()> {
    let indices = opts
        .get("indices")
        .map(|v| parse_list(v))
        .transpose()?
        .unwrap_or_else(|| vec![1, 5, 10, 20]);
    let table = PrimeTable::up_to(optional_u64(opts, "table")?.unwrap_or(1000));
    let largest = indices.iter().copied().max().unwrap_or(0);
    let exact = sieve_indicator_with(largest, &limits(opts)?)?;

    println!("Single-index formula (primes up to {})", table.limit());
    for &idx in &indices {
        let verdict = match formula_indicator(idx, Some(&table)) {
            Ok(v) => v.to_string(),
            Err(e) => format!("undecided ({e})"),
        };
        println!(
            "n={}, o_n={}, formula={}, sieve={}",
            idx,
            2 * idx + 1,
            verdict,
            exact[idx as usize]
        );
    }
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

fn table_size(opts: &HashMap<String, String>, default: u64) -> Result<u64> {
    opts.get("n")
        .map(|v| parse_table_size(v))
        .unwrap_or(Ok(default))
}

fn optional_u64(opts: &HashMap<String, String>, key: &str) -> Result<Option<u64>> {
    opts.get(key)
        .map(|v| {
            v.parse::<u64>().map_err(|e| {
                IndicatorError::InvalidArgument(format!("--{key}={v} is not a valid count: {e}"))
            })
        })
        .transpose()
}

fn limits(opts: &HashMap<String, String>) -> Result<Limits> {
    Ok(match optional_u64(opts, "max-n")? {
        Some(max_n) => Limits { max_n },
        None => Limits::default(),
    })
}

fn parse_list(value: &str) -> Result<Vec<u64>> {
    value
        .split(',')
        .filter(|s| !s.trim().is_empty())
        .map(parse_table_size)
        .collect()
}

fn write_json<T: serde::Serialize>(value: &T, path: &str) {
    if let Some(parent) = std::path::Path::new(path).parent() {
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
                println!("\nReport written to {path}");
            }
        }
        Err(e) => eprintln!("Warning: could not serialize report: {e}"),
    }
}
