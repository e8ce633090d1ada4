//! Build schedules for every loan in a CSV file
//!
//! Usage: run_batch [loans.csv] [summary.csv]
//!
//! Input columns: Principal,Rate,Term,Method
//! Output: one summary row per loan, in input order

use anyhow::{Context, Result};
use matfin::batch::{load_requests, run_batch, write_summaries_csv};
use matfin::amortization::DEFAULT_ROUNDING_DECIMALS;
use std::env;
use std::fs::File;
use std::time::Instant;

fn main() -> Result<()> {
    env_logger::init();

    let mut args = env::args().skip(1);
    let input_path = args.next().unwrap_or_else(|| "loans.csv".to_string());
    let output_path = args.next().unwrap_or_else(|| "batch_summary.csv".to_string());

    let start = Instant::now();
    println!("Loading loans from {}...", input_path);

    let requests = load_requests(&input_path)
        .with_context(|| format!("Failed to load loans from {}", input_path))?;
    println!("Loaded {} loans in {:?}", requests.len(), start.elapsed());

    println!("Building schedules...");
    let build_start = Instant::now();
    let summaries = run_batch(&requests, DEFAULT_ROUNDING_DECIMALS);
    println!("Schedules complete in {:?}", build_start.elapsed());

    let file = File::create(&output_path)
        .with_context(|| format!("Failed to create {}", output_path))?;
    write_summaries_csv(&summaries, file)?;
    println!("Output written to {}", output_path);

    let total_principal: f64 = summaries.iter().map(|s| s.principal).sum();
    let total_interest: f64 = summaries.iter().map(|s| s.total_interest).sum();
    println!("\nBatch Summary:");
    println!("  Loans:           {}", summaries.len());
    println!("  Total principal: {:.2}", total_principal);
    println!("  Total interest:  {:.2}", total_interest);

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}
