use adstxt_validator::cli::Args;
use adstxt_validator::config::{init_config_file, AppConfig};
use adstxt_validator::export;
use adstxt_validator::matcher::{Outcome, ValidationResult};
use adstxt_validator::runner::{execute, ProgressUpdate, ValidationRun};
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.verbose);

    if args.init {
        let path = init_config_file()?;
        println!("Created default configuration file: {}", path.display());
        return Ok(());
    }

    args.validate().map_err(|e| anyhow!(e))?;

    let config = AppConfig::load()?;

    let targets_path = args.targets.as_deref().unwrap_or_default();
    let references_path = args.references.as_deref().unwrap_or_default();

    let targets_raw = fs::read_to_string(targets_path)
        .with_context(|| format!("Failed to read targets file: {}", targets_path))?;
    let references_raw = fs::read_to_string(references_path)
        .with_context(|| format!("Failed to read references file: {}", references_path))?;

    let run = ValidationRun::from_raw(&targets_raw, &references_raw, args.file_type)?;
    let parallel_jobs = args.parallel_jobs.unwrap_or(config.runner.parallel_jobs);
    let total_targets = run.targets.len();

    println!(
        "Validating {} against {} target(s) with {} reference rule(s)...",
        run.file_kind,
        total_targets,
        run.references.len()
    );

    let progress_bar = ProgressBar::new(total_targets as u64);
    progress_bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let pb = progress_bar.clone();
    let on_progress = move |update: ProgressUpdate| {
        pb.set_position(update.completed as u64);
        pb.set_message(format!("Checking: {} ...", update.target));
    };

    let results = execute(run, config.http, parallel_jobs, Some(&on_progress)).await;

    progress_bar.finish_and_clear();

    print_results_table(&results, &args.show);
    export::print_run_summary(&results);

    let output_path = args.output_path();
    match args.output_format.as_str() {
        "json" => export::export_json(&results, &output_path)?,
        _ => export::export_csv(&results, &output_path)?,
    }
    println!("Report written to: {}", output_path);

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("adstxt_validator={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Print the result rows as a plain text table. `--show issues` hides Valid
/// rows from the printout; exports are unaffected.
fn print_results_table(results: &[ValidationResult], show: &str) {
    let rows: Vec<&ValidationResult> = results
        .iter()
        .filter(|r| show != "issues" || r.outcome != Outcome::Valid)
        .collect();

    if rows.is_empty() {
        if show == "issues" {
            println!("\nNo issues found: all rows are Valid.");
        }
        return;
    }

    println!();
    println!(
        "{:<30} {:<13} {:<18} {:<48} {}",
        "URL", "File", "Result", "Details", "Reference"
    );
    println!("{}", "-".repeat(130));

    for row in rows {
        println!(
            "{:<30} {:<13} {:<18} {:<48} {}",
            row.target_domain,
            row.file_name,
            row.outcome.to_string(),
            row.detail,
            row.reference
        );
    }
}
