//! # Results
//!
//! Each run of the search yields one [`BarcodeSet`]; a whole invocation
//! yields a [`BarcodeSetCollection`], sorted so the highest-distance set
//! comes first. Collections render as human-readable text (`Display`) or as
//! JSON that parses back into an equivalent collection.
//!
//! Identical sets produced by different runs are kept verbatim — the
//! collection never deduplicates.
//!
//! ## Example
//!
//! ```rust
//! use barcode_designer::results::{BarcodeSet, BarcodeSetCollection};
//! use barcode_designer::metric::DistanceMetric;
//!
//! let mut collection = BarcodeSetCollection::new();
//! collection.push(BarcodeSet::new(
//!     vec!["ACGT".into(), "TGCA".into()],
//!     4,
//!     DistanceMetric::Hamming,
//! ));
//!
//! let json = collection.to_json().unwrap();
//! let parsed = BarcodeSetCollection::from_json(&json).unwrap();
//! assert_eq!(collection, parsed);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::balance;
use crate::error::Result;
use crate::metric::DistanceMetric;

/// The outcome of one run: a barcode set with its achieved minimum pairwise
/// distance and per-position color-balance percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarcodeSet {
    barcodes: Vec<String>,
    min_distance: usize,
    metric: DistanceMetric,
    /// Percentage of A/C nucleotides at each position across the set.
    color_balance: Vec<f64>,
}

impl BarcodeSet {
    /// Creates a set from its barcodes and achieved minimum distance.
    /// Barcodes are stored sorted lexicographically; the color-balance
    /// statistics are derived from them.
    pub fn new(mut barcodes: Vec<String>, min_distance: usize, metric: DistanceMetric) -> Self {
        barcodes.sort();
        let color_balance = balance::channel_percentages(&barcodes);
        Self {
            barcodes,
            min_distance,
            metric,
            color_balance,
        }
    }

    /// The barcodes of this set, lexicographically sorted.
    pub fn barcodes(&self) -> &[String] {
        &self.barcodes
    }

    /// The achieved minimum pairwise distance.
    pub fn min_distance(&self) -> usize {
        self.min_distance
    }

    /// The metric the distance was measured under.
    pub fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Percentage of A/C nucleotides per position.
    pub fn color_balance(&self) -> &[f64] {
        &self.color_balance
    }
}

/// The ordered results of a whole invocation, one set per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarcodeSetCollection {
    sets: Vec<BarcodeSet>,
}

impl BarcodeSetCollection {
    /// An empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a run's result.
    pub fn push(&mut self, set: BarcodeSet) {
        self.sets.push(set);
    }

    /// The number of sets collected.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    /// `true` if no run contributed a set.
    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// The set at `index`, best sets first after sorting.
    pub fn get(&self, index: usize) -> Option<&BarcodeSet> {
        self.sets.get(index)
    }

    /// Iterates the sets in order.
    pub fn iter(&self) -> impl Iterator<Item = &BarcodeSet> {
        self.sets.iter()
    }

    /// Sorts by descending minimum pairwise distance; ties keep their run
    /// order (stable).
    pub fn sort_by_quality(&mut self) {
        self.sets
            .sort_by(|a, b| b.min_distance.cmp(&a.min_distance));
    }

    /// Renders the structured JSON form.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a collection back from its structured JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl fmt::Display for BarcodeSetCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, set) in self.sets.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            writeln!(f, "Set {}:", i + 1)?;
            for barcode in &set.barcodes {
                writeln!(f, "{barcode}")?;
            }
            writeln!(f, "Minimum pairwise distance: {}", set.min_distance)?;
        }
        Ok(())
    }
}
