//! # Candidate Pools
//!
//! A [`CandidatePool`] is the ordered, immutable collection of barcodes the
//! selection-mode search picks subsets from. Pools are either loaded from a
//! plain text list (one barcode per line) or generated from a pattern with
//! the [`CandidatePoolBuilder`].
//!
//! ## Examples
//!
//! ```rust
//! use barcode_designer::pool::CandidatePoolBuilder;
//! use barcode_designer::pattern::{BarcodePattern, GcWindow};
//!
//! let pattern = BarcodePattern::parse("______").unwrap();
//! let gc = GcWindow::new(0.2, 0.8).unwrap();
//! let pool = CandidatePoolBuilder::new(pattern, gc, 50)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//! assert_eq!(pool.len(), 50);
//! ```

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::coding::CodewordSampler;
use crate::engine::{ProgressListener, SilentProgress};
use crate::error::{DesignError, Result};
use crate::pattern::{BarcodePattern, GcWindow};
use crate::rng;

/// Default number of sampling attempts per requested candidate.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// An ordered collection of unique, equal-length candidate barcodes.
/// Immutable once built; safe to share across runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePool {
    barcodes: Vec<String>,
    length: usize,
}

impl CandidatePool {
    /// Builds a pool from literal barcode strings.
    ///
    /// Input is case-insensitive and normalized to uppercase. Duplicates are
    /// dropped, keeping the first occurrence.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::Configuration` for an empty list and
    /// `DesignError::InvalidBarcode` for non-nucleotide characters or
    /// unequal lengths.
    pub fn from_barcodes<I, S>(barcodes: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut seen = HashSet::new();
        let mut normalized = Vec::new();
        let mut length = None;

        for barcode in barcodes {
            let upper = barcode.as_ref().to_ascii_uppercase();
            if upper.is_empty() {
                return Err(DesignError::InvalidBarcode(
                    "empty barcode string".to_string(),
                ));
            }
            if let Some(bad) = upper.chars().find(|c| !matches!(c, 'A' | 'C' | 'G' | 'T')) {
                return Err(DesignError::InvalidBarcode(format!(
                    "invalid character '{bad}' in barcode {upper}"
                )));
            }
            match length {
                None => length = Some(upper.len()),
                Some(expected) if expected != upper.len() => {
                    return Err(DesignError::InvalidBarcode(format!(
                        "barcode {upper} has length {}, expected {expected}",
                        upper.len()
                    )))
                }
                Some(_) => {}
            }
            if seen.insert(upper.clone()) {
                normalized.push(upper);
            }
        }

        let Some(length) = length else {
            return Err(DesignError::Configuration(
                "candidate pool must not be empty".to_string(),
            ));
        };

        Ok(Self {
            barcodes: normalized,
            length,
        })
    }

    /// Reads a pool from a candidate list: one barcode per line, surrounding
    /// whitespace trimmed, blank lines skipped.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = Vec::new();
        for line in reader.lines() {
            let line = line?;
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                lines.push(trimmed.to_string());
            }
        }
        Self::from_barcodes(lines)
    }

    /// Reads a pool from a candidate file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// The number of candidates.
    pub fn len(&self) -> usize {
        self.barcodes.len()
    }

    /// `true` if the pool holds no candidates.
    pub fn is_empty(&self) -> bool {
        self.barcodes.is_empty()
    }

    /// The common barcode length.
    pub fn barcode_length(&self) -> usize {
        self.length
    }

    /// The candidate at `index`.
    pub fn get(&self, index: usize) -> &str {
        &self.barcodes[index]
    }

    /// All candidates, in order.
    pub fn barcodes(&self) -> &[String] {
        &self.barcodes
    }
}

/// Generates a [`CandidatePool`] from a pattern and a GC window.
///
/// Candidates are sampled by filling the pattern's free positions uniformly
/// at random, or by drawing codewords of a quaternary Hamming code when
/// code seeding is enabled. A candidate is accepted if its GC fraction lies
/// within the window and it is not already in the pool; every requested
/// candidate gets its own attempt budget.
#[derive(Debug, Clone)]
pub struct CandidatePoolBuilder {
    pattern: BarcodePattern,
    gc: GcWindow,
    count: usize,
    max_attempts: usize,
    code_seeding: bool,
    seed: Option<u64>,
}

impl CandidatePoolBuilder {
    /// Starts a builder for `count` candidates matching `pattern` within the
    /// GC window.
    pub fn new(pattern: BarcodePattern, gc: GcWindow, count: usize) -> Self {
        Self {
            pattern,
            gc,
            count,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            code_seeding: false,
            seed: None,
        }
    }

    /// Overrides the per-candidate attempt budget.
    pub fn max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Draws candidates from a minimum-distance-3 quaternary Hamming code
    /// instead of free random sampling.
    pub fn code_seeding(mut self, enabled: bool) -> Self {
        self.code_seeding = enabled;
        self
    }

    /// Seeds the sampling RNG for reproducible pools.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the pool without progress reporting.
    pub fn build(self) -> Result<CandidatePool> {
        self.build_with_progress(&SilentProgress)
    }

    /// Builds the pool, reporting coarse progress.
    ///
    /// # Errors
    ///
    /// - `DesignError::Configuration` for a zero count or an attempt budget
    ///   of zero.
    /// - `DesignError::GenerationExhausted` if the requested count cannot be
    ///   reached within the attempt budget; no partial pool is returned.
    /// - `DesignError::Cancelled` if the listener requests cancellation.
    pub fn build_with_progress<P>(self, progress: &P) -> Result<CandidatePool>
    where
        P: ProgressListener + ?Sized,
    {
        if self.count == 0 {
            return Err(DesignError::Configuration(
                "requested candidate count must be greater than 0".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(DesignError::Configuration(
                "per-candidate attempt budget must be greater than 0".to_string(),
            ));
        }

        let sampler = if self.code_seeding {
            Some(CodewordSampler::new(self.pattern.clone())?)
        } else {
            None
        };

        if !progress.report(0.0, "generating candidate barcodes") {
            return Err(DesignError::Cancelled(
                "candidate generation aborted".to_string(),
            ));
        }

        let mut rng = rng::seeded_or_entropy(self.seed);
        let mut seen: HashSet<String> = HashSet::with_capacity(self.count);
        let mut barcodes = Vec::with_capacity(self.count);
        let report_step = (self.count / 20).max(1);
        let mut attempts_total = 0usize;

        while barcodes.len() < self.count {
            let mut accepted = None;
            for _ in 0..self.max_attempts {
                attempts_total += 1;
                let candidate = match &sampler {
                    Some(code) => code.sample(&mut rng),
                    None => self.pattern.fill_random(&mut rng),
                };
                if self.gc.accepts(&self.pattern, &candidate) && !seen.contains(&candidate) {
                    accepted = Some(candidate);
                    break;
                }
            }

            let Some(candidate) = accepted else {
                return Err(DesignError::GenerationExhausted {
                    requested: self.count,
                    generated: barcodes.len(),
                });
            };
            seen.insert(candidate.clone());
            barcodes.push(candidate);

            if barcodes.len() % report_step == 0 {
                let pct = 100.0 * barcodes.len() as f64 / self.count as f64;
                let msg = format!("generated {} of {} candidates", barcodes.len(), self.count);
                if !progress.report(pct, &msg) {
                    return Err(DesignError::Cancelled(
                        "candidate generation aborted".to_string(),
                    ));
                }
            }
        }

        debug!(
            count = barcodes.len(),
            attempts = attempts_total,
            code_seeding = self.code_seeding,
            "candidate pool generated"
        );

        CandidatePool::from_barcodes(barcodes)
    }
}
