//! # Distance Metrics
//!
//! Distances between barcodes drive the entire search: the fitness of a
//! barcode set is its minimum pairwise distance. Two metrics are supported:
//!
//! - **Hamming**: number of differing positions; only defined for
//!   equal-length inputs.
//! - **Levenshtein**: edit distance with unit-cost substitutions,
//!   insertions and deletions; defined for any two strings.
//!
//! The active metric is an ordinary value carried in the search
//! configuration, so concurrent searches with different metrics are safe.
//!
//! ## Examples
//!
//! ```rust
//! use barcode_designer::metric::DistanceMetric;
//!
//! let d = DistanceMetric::Hamming.distance("ACGT", "ACGA").unwrap();
//! assert_eq!(d, 1);
//!
//! let d = DistanceMetric::Levenshtein.distance("ACGT", "AGT").unwrap();
//! assert_eq!(d, 1);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{DesignError, Result};

/// The distance metric used to compare barcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Number of positions at which two equal-length barcodes differ.
    Hamming,
    /// Unit-cost edit distance (substitution, insertion, deletion).
    Levenshtein,
}

impl DistanceMetric {
    /// Computes the distance between two barcodes.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::MetricMismatch` if the metric is Hamming and
    /// the inputs have different lengths.
    pub fn distance(&self, a: &str, b: &str) -> Result<usize> {
        match self {
            DistanceMetric::Hamming => hamming(a.as_bytes(), b.as_bytes()),
            DistanceMetric::Levenshtein => {
                let mut row = Vec::new();
                Ok(levenshtein_into(a.as_bytes(), b.as_bytes(), &mut row))
            }
        }
    }

    /// Computes the distance, reusing `row` as scratch space for the
    /// Levenshtein dynamic program. Hot loops call this to avoid one
    /// allocation per comparison.
    pub(crate) fn distance_with_buffer(
        &self,
        a: &str,
        b: &str,
        row: &mut Vec<usize>,
    ) -> Result<usize> {
        match self {
            DistanceMetric::Hamming => hamming(a.as_bytes(), b.as_bytes()),
            DistanceMetric::Levenshtein => Ok(levenshtein_into(a.as_bytes(), b.as_bytes(), row)),
        }
    }

    /// The lowercase name used in the structured output form.
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Hamming => "hamming",
            DistanceMetric::Levenshtein => "levenshtein",
        }
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn hamming(a: &[u8], b: &[u8]) -> Result<usize> {
    if a.len() != b.len() {
        return Err(DesignError::MetricMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(a.iter().zip(b.iter()).filter(|(x, y)| x != y).count())
}

/// Two-row Levenshtein dynamic program. `row` holds the previous matrix row
/// and is resized as needed.
fn levenshtein_into(a: &[u8], b: &[u8], row: &mut Vec<usize>) -> usize {
    row.clear();
    row.extend(0..=b.len());

    for (i, &ca) in a.iter().enumerate() {
        let mut prev_diag = row[0];
        row[0] = i + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            let val = (prev_diag + cost).min(row[j] + 1).min(row[j + 1] + 1);
            prev_diag = row[j + 1];
            row[j + 1] = val;
        }
    }
    row[b.len()]
}
