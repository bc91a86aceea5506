//! Line-oriented parsing of ads.txt / app-ads.txt content and reference rules
//!
//! Parsing is deliberately lenient: comments are stripped, malformed lines
//! (fewer than two comma-separated fields) are dropped silently. A file that
//! contributes zero usable records is not an error.

use serde::Serialize;

/// One parsed line from a fetched declaration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdsRecord {
    /// Advertising system domain, lower-cased
    pub domain: String,
    /// Publisher account identifier, lower-cased
    pub id: String,
    /// Seller relationship tag, upper-cased; absent if the line had fewer than 3 fields
    pub relationship: Option<String>,
}

/// One expectation supplied by the caller: `domain, id[, relationship]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceRule {
    pub domain: String,
    pub id: String,
    pub relationship: Option<String>,
    /// The untrimmed source line, retained verbatim for display
    pub original: String,
}

/// Parse full declaration-file content into records.
///
/// Everything from the first `#` on a line is a comment. Lines that yield
/// fewer than two non-empty comma-separated fields are skipped.
pub fn parse_ads_file(content: &str) -> Vec<AdsRecord> {
    let mut records = Vec::new();

    for line in content.lines() {
        let clean_line = line.split('#').next().unwrap_or("").trim();
        if clean_line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = clean_line.split(',').map(str::trim).collect();
        if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
            continue;
        }

        records.push(AdsRecord {
            domain: parts[0].to_lowercase(),
            id: parts[1].to_lowercase(),
            relationship: parts.get(2).filter(|p| !p.is_empty()).map(|p| p.to_uppercase()),
        });
    }

    records
}

/// Parse a single caller-supplied reference line.
///
/// Same field splitting and normalization as a record line, but without
/// comment stripping. Returns `None` for lines with fewer than two fields;
/// the caller drops those. The raw line is always retained verbatim.
pub fn parse_reference_line(line: &str) -> Option<ReferenceRule> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    if parts.len() < 2 || parts[0].is_empty() || parts[1].is_empty() {
        return None;
    }

    Some(ReferenceRule {
        domain: parts[0].to_lowercase(),
        id: parts[1].to_lowercase(),
        relationship: parts.get(2).filter(|p| !p.is_empty()).map(|p| p.to_uppercase()),
        original: line.to_string(),
    })
}
