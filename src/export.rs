use crate::matcher::{Outcome, ValidationResult};
use anyhow::Result;
use chrono::Utc;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use tracing::{debug, info};

/// CSV column order matches the report table: URL, File, Result, Details, Reference
const CSV_HEADERS: [&str; 5] = ["URL", "File", "Result", "Details", "Reference"];

pub fn export_csv(results: &[ValidationResult], output_path: &str) -> Result<()> {
    debug!("Exporting {} result rows to CSV: {}", results.len(), output_path);

    let file = File::create(output_path)?;
    write_csv(results, file)?;

    info!("Successfully exported {} result rows to CSV: {}", results.len(), output_path);
    Ok(())
}

/// Write the report as CSV to any writer. The `csv` crate handles quoting of
/// fields containing commas or quotes.
pub fn write_csv<W: Write>(results: &[ValidationResult], writer: W) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);

    wtr.write_record(CSV_HEADERS)?;

    for row in results {
        wtr.write_record(&[
            &row.target_domain,
            &row.file_name,
            &row.outcome.to_string(),
            &row.detail,
            &row.reference,
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn export_json(results: &[ValidationResult], output_path: &str) -> Result<()> {
    debug!("Exporting {} result rows to JSON: {}", results.len(), output_path);

    let json_output = JsonExport {
        summary: run_summary(results),
        results: results.to_vec(),
    };

    let json_string = serde_json::to_string_pretty(&json_output)?;

    let mut file = File::create(output_path)?;
    file.write_all(json_string.as_bytes())?;

    info!("Successfully exported {} result rows to JSON: {}", results.len(), output_path);
    Ok(())
}

#[derive(serde::Serialize)]
struct JsonExport {
    summary: RunSummary,
    results: Vec<ValidationResult>,
}

#[derive(serde::Serialize)]
pub struct RunSummary {
    pub total_rows: usize,
    pub unique_targets: usize,
    pub valid: usize,
    pub partially_matched: usize,
    pub not_found: usize,
    pub errors: usize,
    pub system_errors: usize,
    pub generated_at: String,
}

fn count(results: &[ValidationResult], outcome: Outcome) -> usize {
    results.iter().filter(|r| r.outcome == outcome).count()
}

pub fn run_summary(results: &[ValidationResult]) -> RunSummary {
    let unique_targets = results
        .iter()
        .map(|r| r.target_domain.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len();

    RunSummary {
        total_rows: results.len(),
        unique_targets,
        valid: count(results, Outcome::Valid),
        partially_matched: count(results, Outcome::PartiallyMatched),
        not_found: count(results, Outcome::NotFound),
        errors: count(results, Outcome::Error),
        system_errors: count(results, Outcome::SystemError),
        generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    }
}

pub fn print_run_summary(results: &[ValidationResult]) {
    if results.is_empty() {
        println!("No validation results.");
        return;
    }

    let summary = run_summary(results);

    println!("\n=== Validation Summary ===");
    println!("Targets checked:     {}", summary.unique_targets);
    println!("Result rows:         {}", summary.total_rows);
    println!("  Valid:             {}", summary.valid);
    println!("  Partially matched: {}", summary.partially_matched);
    println!("  Not found:         {}", summary.not_found);
    println!("  Errors:            {}", summary.errors);
    if summary.system_errors > 0 {
        println!("  System errors:     {}", summary.system_errors);
    }
    println!("==========================\n");
}
