//! # Error Types
//!
//! This module defines the error type shared by all fallible operations in
//! the crate, together with a specialized `Result` alias.
//!
//! ## Examples
//!
//! ```rust
//! use barcode_designer::error::{DesignError, Result};
//!
//! fn parse_count(input: &str) -> Result<usize> {
//!     input
//!         .parse()
//!         .map_err(|_| DesignError::Configuration(format!("invalid count: {input}")))
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while building candidate pools or
/// searching for barcode sets.
#[derive(Error, Debug)]
pub enum DesignError {
    /// An invalid configuration was provided. Raised before any search
    /// starts; no partial state is produced.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Candidate generation could not reach the requested pool size within
    /// its per-candidate attempt budget.
    #[error(
        "Candidate generation exhausted: generated {generated} of {requested} \
         barcodes within the attempt budget"
    )]
    GenerationExhausted {
        /// The number of barcodes that was requested.
        requested: usize,
        /// The number of barcodes that could actually be generated.
        generated: usize,
    },

    /// Hamming distance was requested for barcodes of unequal length.
    #[error("Metric mismatch: Hamming distance requires equal-length inputs (got {left} and {right})")]
    MetricMismatch {
        /// Length of the left-hand barcode.
        left: usize,
        /// Length of the right-hand barcode.
        right: usize,
    },

    /// A candidate barcode contains invalid characters or does not match the
    /// length of its companions.
    #[error("Invalid barcode: {0}")]
    InvalidBarcode(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: cannot operate on an empty population")]
    EmptyPopulation,

    /// Candidate pool construction was aborted through the progress
    /// callback. Cancelling a running search is *not* an error; this variant
    /// only occurs while a pool is still being built.
    #[error("Cancelled: {0}")]
    Cancelled(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error that occurs when serializing or parsing the structured result
    /// form fails.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for barcode design operations.
pub type Result<T> = std::result::Result<T, DesignError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use barcode_designer::error::ResultExt;
/// use std::fs::File;
///
/// fn open_candidates(path: &str) -> barcode_designer::Result<File> {
///     File::open(path).context("failed to open candidate file")
/// }
/// ```
pub trait ResultExt<T, E> {
    /// Converts the error to a `DesignError::Configuration` carrying the
    /// provided context and the original error message.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| DesignError::Configuration(format!("{}: {}", context, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DesignError::GenerationExhausted {
            requested: 100,
            generated: 42,
        };
        let msg = err.to_string();
        assert!(msg.contains("42"));
        assert!(msg.contains("100"));

        let err = DesignError::MetricMismatch { left: 8, right: 10 };
        assert!(err.to_string().contains("equal-length"));
    }

    #[test]
    fn test_context_wraps_foreign_errors() {
        let io_err: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "no such file",
        ));
        let err = io_err.context("loading candidates").unwrap_err();
        match err {
            DesignError::Configuration(msg) => {
                assert!(msg.contains("loading candidates"));
                assert!(msg.contains("no such file"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
