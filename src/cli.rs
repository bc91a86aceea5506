use crate::runner::FileKind;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "adstxt-validator")]
#[command(about = "Validates ads.txt / app-ads.txt declarations against expected seller entries")]
#[command(version)]
pub struct Args {
    /// Create default configuration file at ./config/adstxt-validator.toml
    #[arg(long)]
    pub init: bool,

    /// File with target domains, one per line
    #[arg(short, long, value_name = "FILE")]
    pub targets: Option<String>,

    /// File with reference lines `domain, id[, relationship]`, one per line
    #[arg(short, long, value_name = "FILE")]
    pub references: Option<String>,

    /// Which declaration file to check on each target
    #[arg(long, value_enum, default_value_t = FileKind::AdsTxt)]
    pub file_type: FileKind,

    /// Output format: 'csv' or 'json'
    #[arg(short = 'f', long, default_value = "csv")]
    pub output_format: String,

    /// Output filename (extension will be set based on format if not provided)
    #[arg(short, long, default_value = "report")]
    pub output: String,

    /// Rows to print: 'all' or 'issues' (hide Valid rows). Exports always carry all rows.
    #[arg(long, default_value = "all")]
    pub show: String,

    /// Number of concurrent target validations (overrides config)
    #[arg(short = 'j', long, value_name = "N")]
    pub parallel_jobs: Option<usize>,

    /// Verbose logging (use -v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub fn validate(&self) -> Result<(), String> {
        if !self.init {
            if self.targets.is_none() {
                return Err("Targets file is required (use --targets)".to_string());
            }
            if self.references.is_none() {
                return Err("References file is required (use --references)".to_string());
            }
        }

        if !["csv", "json"].contains(&self.output_format.as_str()) {
            return Err("Output format must be 'csv' or 'json'".to_string());
        }

        if !["all", "issues"].contains(&self.show.as_str()) {
            return Err("Show mode must be 'all' or 'issues'".to_string());
        }

        if let Some(jobs) = self.parallel_jobs {
            if jobs == 0 {
                return Err("Parallel jobs must be greater than 0".to_string());
            }
            if jobs > 100 {
                return Err(
                    "Parallel jobs cannot exceed 100 to avoid overwhelming target servers"
                        .to_string(),
                );
            }
        }

        Ok(())
    }

    /// Output path with the format extension appended when none was given
    pub fn output_path(&self) -> String {
        if self.output.contains('.') {
            self.output.clone()
        } else {
            format!("{}.{}", self.output, self.output_format)
        }
    }
}
