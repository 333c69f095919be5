//! # Fitness
//!
//! The quality of a barcode set is its minimum pairwise distance under the
//! configured metric — the worst case is what determines how reliably the
//! set can be demultiplexed. When color balancing is enabled, a secondary
//! penalty term reflects per-position A/C vs G/T imbalance; it never
//! overrides the primary term and only breaks ties between sets of equal
//! minimum distance.

use std::cell::RefCell;
use std::cmp::Ordering;

use thread_local::ThreadLocal;

use crate::balance;
use crate::error::Result;
use crate::metric::DistanceMetric;

/// The fitness of one individual. Ordered so that `a > b` means `a` is the
/// better solution.
#[derive(Debug, Clone, Copy)]
pub struct Fitness {
    /// Minimum pairwise distance across the individual's barcodes.
    pub min_distance: usize,
    /// Mean per-position deviation from balanced color channels; 0 when
    /// balancing is disabled.
    pub balance_penalty: f64,
}

impl Fitness {
    /// A fitness with no balance term.
    pub fn from_distance(min_distance: usize) -> Self {
        Self {
            min_distance,
            balance_penalty: 0.0,
        }
    }
}

impl PartialEq for Fitness {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Fitness {}

impl PartialOrd for Fitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Fitness {
    fn cmp(&self, other: &Self) -> Ordering {
        // Larger minimum distance wins; the balance penalty is inverted
        // (smaller is better) and consulted only on equal distances.
        self.min_distance
            .cmp(&other.min_distance)
            .then_with(|| other.balance_penalty.total_cmp(&self.balance_penalty))
    }
}

/// Computes fitness values for barcode sets given as string slices.
///
/// Keeps one Levenshtein scratch row per worker thread so parallel fitness
/// evaluation does not allocate per comparison.
pub(crate) struct FitnessEvaluator {
    metric: DistanceMetric,
    balance_colors: bool,
    scratch: ThreadLocal<RefCell<Vec<usize>>>,
}

impl FitnessEvaluator {
    pub(crate) fn new(metric: DistanceMetric, balance_colors: bool) -> Self {
        Self {
            metric,
            balance_colors,
            scratch: ThreadLocal::new(),
        }
    }

    /// The distance between two barcodes, using the per-thread scratch row.
    pub(crate) fn distance(&self, a: &str, b: &str) -> Result<usize> {
        let cell = self.scratch.get_or(|| RefCell::new(Vec::new()));
        let mut row = cell.borrow_mut();
        self.metric.distance_with_buffer(a, b, &mut row)
    }

    /// Evaluates the minimum pairwise distance (and balance penalty, if
    /// enabled) of a barcode set.
    pub(crate) fn evaluate(&self, barcodes: &[&str]) -> Result<Fitness> {
        let mut min_distance = usize::MAX;
        for i in 0..barcodes.len() {
            for j in (i + 1)..barcodes.len() {
                let d = self.distance(barcodes[i], barcodes[j])?;
                min_distance = min_distance.min(d);
            }
        }

        let balance_penalty = if self.balance_colors {
            balance::balance_deviation(&balance::channel_percentages(barcodes))
        } else {
            0.0
        };

        Ok(Fitness {
            min_distance,
            balance_penalty,
        })
    }
}
