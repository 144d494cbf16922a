//! Dataset ingestion — reduces an uploaded text file to [`MetaFeatures`].
//!
//! The audit core only accepts structured metadata; this is the boundary
//! where free-form CSV-ish text becomes numbers. The scan is shallow on
//! purpose: keyword hits, a bounded numeric sample, and a few shape
//! heuristics.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;

use quantaudit_core::{MetaFeatures, sha256_hex};

/// Vocabulary counted toward the semantic score. Matched
/// case-insensitively, each keyword at most once.
pub const QUANTUM_KEYWORDS: &[&str] = &[
    "QUBIT",
    "ENTANGLEMENT",
    "TRL",
    "FEASIBILITY",
    "ALGORITHM",
    "FIDELITY",
    "SHOR",
    "GROVER",
    "GHZ",
    "BELL STATE",
    "HILBERT",
];

/// Leading lines scanned for numeric values.
const SCAN_LINES: usize = 100;

/// Everything derived from one dataset file.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    /// File stem, or the full path when there is none.
    pub name: String,
    /// SHA-256 hex digest of the raw contents.
    pub fingerprint: String,
    /// Non-blank line count.
    pub line_count: usize,
    /// Numeric values found in the scanned prefix.
    pub values_scanned: usize,
    pub meta: MetaFeatures,
}

/// Read `path` and profile its contents.
pub fn ingest_file(path: &Path) -> io::Result<DatasetProfile> {
    let content = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    Ok(ingest_content(&name, &content))
}

/// Profile in-memory text.
///
/// Shape heuristics: `size` is the comma-field count of the first
/// non-blank line; values are parsed from the first 100 non-blank lines;
/// the semantic score saturates at four distinct keyword hits; entropy
/// is a flat 4.2 prior bumped to 5.95 for high-variance content with no
/// quantum vocabulary.
pub fn ingest_content(name: &str, content: &str) -> DatasetProfile {
    let upper = content.to_uppercase();
    let lines: Vec<&str> = content.lines().filter(|l| !l.trim().is_empty()).collect();

    let matches = QUANTUM_KEYWORDS
        .iter()
        .filter(|k| upper.contains(*k))
        .count();
    let semantic_score = (matches as f64 / 4.0).min(1.0);

    let size = lines.first().map_or(0, |l| l.split(',').count());

    let values: Vec<f64> = lines
        .iter()
        .take(SCAN_LINES)
        .flat_map(|l| l.split(','))
        .filter_map(|field| field.trim().parse::<f64>().ok())
        .collect();

    let max_val = values.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let mean = if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    };
    let variance = if values.is_empty() {
        0.0
    } else {
        values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / values.len() as f64
    };

    let is_complex = upper.contains('J') || upper.contains("COMPLEX");

    // High variance with no quantum vocabulary reads as raw noise.
    let entropy = if variance > 10.0 && semantic_score < 0.2 {
        5.95
    } else {
        4.2
    };

    DatasetProfile {
        name: name.to_string(),
        fingerprint: sha256_hex(content.as_bytes()),
        line_count: lines.len(),
        values_scanned: values.len(),
        meta: MetaFeatures {
            ndim: 2,
            size,
            max_val,
            is_complex,
            norm: 1.0,
            entropy,
            semantic_score,
            variance,
        },
    }
}
