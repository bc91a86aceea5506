//! Per-target validation: fetch, parse, and match references against records
//!
//! Matching is per-reference and independent. For a reference without a
//! relationship requirement the first domain+id match wins and scanning
//! stops. For a reference with a relationship requirement a type mismatch
//! only sets a provisional partial match - scanning continues because a
//! later record in the same file may still be an exact match.

use crate::fetch::{FetchOutcome, Fetcher};
use crate::parser::{parse_ads_file, AdsRecord, ReferenceRule};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Closed set of per-pair outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Valid,
    #[serde(rename = "Partially matched")]
    PartiallyMatched,
    #[serde(rename = "Not found")]
    NotFound,
    Error,
    #[serde(rename = "System Error")]
    SystemError,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Valid => write!(f, "Valid"),
            Outcome::PartiallyMatched => write!(f, "Partially matched"),
            Outcome::NotFound => write!(f, "Not found"),
            Outcome::Error => write!(f, "Error"),
            Outcome::SystemError => write!(f, "System Error"),
        }
    }
}

/// One row of the final report: one per (target, reference) pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub target_domain: String,
    pub file_name: String,
    pub outcome: Outcome,
    pub detail: String,
    /// The originating reference rule's verbatim source line, or `-` for system errors
    pub reference: String,
}

/// Validate one target domain against the full reference set.
///
/// A failed fetch yields one `Error` row per reference so counts stay
/// uniform; no parsing is attempted in that case.
pub async fn validate_target(
    fetcher: &Fetcher,
    target_domain: &str,
    file_name: &str,
    references: &[ReferenceRule],
) -> Vec<ValidationResult> {
    match fetcher.fetch(target_domain, file_name).await {
        FetchOutcome::Failed { reason } => {
            debug!(target_domain, %reason, "fetch failed, emitting error rows");
            error_results(target_domain, file_name, &reason, references)
        }
        FetchOutcome::Success { body, ssl_warning } => {
            if ssl_warning {
                warn!(target_domain, "content retrieved with certificate validation disabled");
            }
            let records = parse_ads_file(&body);
            debug!(target_domain, record_count = records.len(), "parsed declaration file");
            match_references(target_domain, file_name, &records, references)
        }
    }
}

/// One `Error` row per reference, all carrying the same fetch failure detail
pub fn error_results(
    target_domain: &str,
    file_name: &str,
    detail: &str,
    references: &[ReferenceRule],
) -> Vec<ValidationResult> {
    references
        .iter()
        .map(|reference| ValidationResult {
            target_domain: target_domain.to_string(),
            file_name: file_name.to_string(),
            outcome: Outcome::Error,
            detail: detail.to_string(),
            reference: reference.original.clone(),
        })
        .collect()
}

/// Match every reference independently against the target's parsed records
pub fn match_references(
    target_domain: &str,
    file_name: &str,
    records: &[AdsRecord],
    references: &[ReferenceRule],
) -> Vec<ValidationResult> {
    references
        .iter()
        .map(|reference| {
            let (outcome, detail) = match_one(records, reference);
            ValidationResult {
                target_domain: target_domain.to_string(),
                file_name: file_name.to_string(),
                outcome,
                detail,
                reference: reference.original.clone(),
            }
        })
        .collect()
}

fn match_one(records: &[AdsRecord], reference: &ReferenceRule) -> (Outcome, String) {
    let mut outcome = Outcome::NotFound;
    let mut detail = "No matching Domain+ID pair".to_string();

    for record in records {
        if record.domain != reference.domain || record.id != reference.id {
            continue;
        }

        let Some(expected) = &reference.relationship else {
            // No relationship requirement: first domain+id match wins
            return (Outcome::Valid, "Matched by Domain + ID".to_string());
        };

        if record.relationship.as_ref() == Some(expected) {
            return (Outcome::Valid, "Full match".to_string());
        }

        // Keep scanning: a later record may still be an exact match
        outcome = Outcome::PartiallyMatched;
        detail = format!(
            "Type mismatch: found {}, expected {}",
            record.relationship.as_deref().unwrap_or("none"),
            expected
        );
    }

    (outcome, detail)
}
