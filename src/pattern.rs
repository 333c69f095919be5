//! # Barcode Patterns and Composition Constraints
//!
//! A pattern is a template of fixed nucleotides (`A`/`C`/`G`/`T`) and free
//! positions (`_`) that are filled randomly during candidate generation.
//! The GC-content window constrains the fraction of G/C nucleotides of every
//! generated barcode.
//!
//! ## Examples
//!
//! ```rust
//! use barcode_designer::pattern::{BarcodePattern, GcWindow};
//!
//! let pattern = BarcodePattern::parse("AG______").unwrap();
//! assert_eq!(pattern.len(), 8);
//! assert_eq!(pattern.num_free(), 6);
//!
//! let gc = GcWindow::new(0.4, 0.6).unwrap();
//! assert!(gc.accepts(&pattern, "AGCCGTAT"));
//! ```

use rand::RngCore;
use rand::Rng;

use crate::error::{DesignError, Result};

/// The nucleotide alphabet, in the symbol order used throughout the crate.
pub const NUCLEOTIDES: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// A barcode template marking fixed and free (randomized) positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarcodePattern {
    template: Vec<u8>,
    free: Vec<usize>,
}

impl BarcodePattern {
    /// Parses a pattern string. Input is case-insensitive; valid characters
    /// are `A`, `C`, `G`, `T` and `_` for free positions.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::Configuration` for an empty pattern or invalid
    /// characters.
    pub fn parse(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Err(DesignError::Configuration(
                "barcode pattern must not be empty".to_string(),
            ));
        }

        let mut template = Vec::with_capacity(pattern.len());
        let mut free = Vec::new();
        for (i, ch) in pattern.chars().enumerate() {
            match ch.to_ascii_uppercase() {
                '_' => {
                    free.push(i);
                    template.push(b'_');
                }
                c @ ('A' | 'C' | 'G' | 'T') => template.push(c as u8),
                other => {
                    return Err(DesignError::Configuration(format!(
                        "invalid character '{other}' in barcode pattern; \
                         allowed: A, C, G, T, _"
                    )))
                }
            }
        }

        Ok(Self { template, free })
    }

    /// A pattern of the given length with every position free.
    pub fn unconstrained(length: usize) -> Result<Self> {
        Self::parse(&"_".repeat(length))
    }

    /// The barcode length this pattern describes.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.template.len()
    }

    /// The indices of the free positions, in ascending order.
    pub fn free_positions(&self) -> &[usize] {
        &self.free
    }

    /// The number of free positions.
    pub fn num_free(&self) -> usize {
        self.free.len()
    }

    /// Returns a new barcode with every free position filled uniformly at
    /// random.
    pub fn fill_random(&self, rng: &mut dyn RngCore) -> String {
        let mut barcode = self.template.clone();
        for &pos in &self.free {
            barcode[pos] = NUCLEOTIDES[rng.gen_range(0..NUCLEOTIDES.len())];
        }
        // The template only ever contains ASCII nucleotides.
        String::from_utf8(barcode).unwrap_or_default()
    }

    /// Writes `symbols` (one per free position) into a copy of the template.
    pub(crate) fn fill_with(&self, symbols: &[u8]) -> String {
        debug_assert_eq!(symbols.len(), self.free.len());
        let mut barcode = self.template.clone();
        for (&pos, &base) in self.free.iter().zip(symbols.iter()) {
            barcode[pos] = base;
        }
        String::from_utf8(barcode).unwrap_or_default()
    }

    /// Checks whether a barcode matches this pattern: equal length and
    /// identical nucleotides at every fixed position.
    pub fn matches(&self, barcode: &str) -> bool {
        let bytes = barcode.as_bytes();
        if bytes.len() != self.template.len() {
            return false;
        }
        self.template
            .iter()
            .zip(bytes.iter())
            .all(|(&t, &b)| t == b'_' || t == b.to_ascii_uppercase())
    }
}

/// Scope over which the GC fraction of a candidate is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GcScope {
    /// Fraction of G/C over the full barcode length, fixed positions
    /// included.
    #[default]
    FullLength,
    /// Fraction of G/C over the pattern's free positions only.
    FreePositions,
}

/// An inclusive window on the GC fraction of generated barcodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcWindow {
    min: f64,
    max: f64,
    scope: GcScope,
}

/// Tolerance for comparing a count-derived fraction against the bounds.
const GC_EPSILON: f64 = 1e-9;

impl GcWindow {
    /// Creates a window with bounds given as fractions in `[0, 1]`,
    /// evaluated over the full barcode length.
    ///
    /// # Errors
    ///
    /// Returns `DesignError::Configuration` if the bounds are outside
    /// `[0, 1]` or `min > max`.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) {
            return Err(DesignError::Configuration(format!(
                "GC bounds must lie within [0, 1] (got {min} and {max})"
            )));
        }
        if min > max {
            return Err(DesignError::Configuration(format!(
                "minimum GC fraction {min} exceeds maximum {max}"
            )));
        }
        Ok(Self {
            min,
            max,
            scope: GcScope::default(),
        })
    }

    /// Changes the scope the window is evaluated over.
    pub fn with_scope(mut self, scope: GcScope) -> Self {
        self.scope = scope;
        self
    }

    /// The lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// The upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// The evaluation scope.
    pub fn scope(&self) -> GcScope {
        self.scope
    }

    /// Checks whether a barcode's GC fraction lies within the window.
    ///
    /// With `GcScope::FreePositions` on a pattern without free positions the
    /// constraint is vacuously satisfied.
    pub fn accepts(&self, pattern: &BarcodePattern, barcode: &str) -> bool {
        let fraction = match self.scope {
            GcScope::FullLength => gc_fraction(barcode),
            GcScope::FreePositions => {
                if pattern.num_free() == 0 {
                    return true;
                }
                let bytes = barcode.as_bytes();
                let gc = pattern
                    .free_positions()
                    .iter()
                    .filter(|&&p| is_gc(bytes[p]))
                    .count();
                gc as f64 / pattern.num_free() as f64
            }
        };
        fraction >= self.min - GC_EPSILON && fraction <= self.max + GC_EPSILON
    }
}

/// The fraction of G/C nucleotides in a barcode. Empty input yields 0.
pub fn gc_fraction(barcode: &str) -> f64 {
    if barcode.is_empty() {
        return 0.0;
    }
    let gc = barcode.bytes().filter(|&b| is_gc(b)).count();
    gc as f64 / barcode.len() as f64
}

fn is_gc(base: u8) -> bool {
    matches!(base.to_ascii_uppercase(), b'G' | b'C')
}
