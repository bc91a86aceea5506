//! Concurrent validation runner
//!
//! Splits the raw target and reference blocks, rejects empty inputs before
//! any network call, then fans out one independent task per target domain
//! with bounded concurrency. Each task owns its fetched content and derived
//! records; the reference set is shared read-only. Results are merged in
//! completion order - no global ordering is guaranteed.

use crate::config::HttpConfig;
use crate::fetch::Fetcher;
use crate::matcher::{validate_target, Outcome, ValidationResult};
use crate::parser::{parse_reference_line, ReferenceRule};
use futures::{stream, StreamExt};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Which declaration file to check on each target
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FileKind {
    #[value(name = "ads.txt")]
    AdsTxt,
    #[value(name = "app-ads.txt")]
    AppAdsTxt,
}

impl FileKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            FileKind::AdsTxt => "ads.txt",
            FileKind::AppAdsTxt => "app-ads.txt",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}

/// Caller-visible empty-input conditions, surfaced before any network call
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RunError {
    #[error("No target domains supplied")]
    NoTargets,

    #[error("No valid reference lines found")]
    NoReferences,
}

/// Prepared inputs for one validation run
#[derive(Debug, Clone)]
pub struct ValidationRun {
    pub targets: Vec<String>,
    pub references: Vec<ReferenceRule>,
    pub file_kind: FileKind,
}

impl ValidationRun {
    /// Split both raw newline-separated blocks into non-empty trimmed lines
    /// and parse every reference line, discarding unparsable ones.
    pub fn from_raw(
        targets_raw: &str,
        references_raw: &str,
        file_kind: FileKind,
    ) -> Result<Self, RunError> {
        let targets: Vec<String> = targets_raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if targets.is_empty() {
            return Err(RunError::NoTargets);
        }

        let references: Vec<ReferenceRule> = references_raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .filter_map(parse_reference_line)
            .collect();

        if references.is_empty() {
            return Err(RunError::NoReferences);
        }

        debug!(
            targets = targets.len(),
            references = references.len(),
            file = %file_kind,
            "prepared validation run"
        );

        Ok(Self { targets, references, file_kind })
    }
}

/// Fractional progress reported after each task completion, in completion order
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub completed: usize,
    pub total: usize,
    /// The target whose task just finished
    pub target: String,
}

/// Run all per-target validations with bounded concurrency and merge the rows.
///
/// A task that fails unexpectedly (panics) is converted into a single
/// `SystemError` row for its target; it never aborts the other tasks.
pub async fn execute(
    run: ValidationRun,
    http: HttpConfig,
    parallel_jobs: usize,
    on_progress: Option<&(dyn Fn(ProgressUpdate) + Send + Sync)>,
) -> Vec<ValidationResult> {
    let total = run.targets.len();
    let file_name = run.file_kind.file_name().to_string();
    let fetcher = Arc::new(Fetcher::new(http));
    let references = Arc::new(run.references);
    let completed = AtomicUsize::new(0);

    info!(targets = total, file = %file_name, jobs = parallel_jobs, "starting validation run");

    let per_target: Vec<Vec<ValidationResult>> = stream::iter(run.targets.into_iter().map(|target| {
        let fetcher = Arc::clone(&fetcher);
        let references = Arc::clone(&references);
        let file_name = file_name.clone();

        async move {
            let task = tokio::spawn({
                let target = target.clone();
                let file_name = file_name.clone();
                async move { validate_target(&fetcher, &target, &file_name, &references).await }
            });

            let rows = match task.await {
                Ok(rows) => rows,
                Err(join_err) => {
                    error!(target = %target, error = %join_err, "validation task failed unexpectedly");
                    vec![ValidationResult {
                        target_domain: target.clone(),
                        file_name,
                        outcome: Outcome::SystemError,
                        detail: join_err.to_string(),
                        reference: "-".to_string(),
                    }]
                }
            };

            (target, rows)
        }
    }))
    .buffer_unordered(parallel_jobs.max(1))
    .map(|(target, rows)| {
        let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(callback) = on_progress {
            callback(ProgressUpdate { completed: done, total, target });
        }
        rows
    })
    .collect()
    .await;

    per_target.into_iter().flatten().collect()
}
