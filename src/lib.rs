pub mod balance;
pub mod coding;
pub mod engine;
pub mod error;
pub mod metric;
pub mod pattern;
pub mod pool;
pub mod results;

mod rng;

// Re-export commonly used types for convenience
pub use engine::{
    optimize_barcode_sets, select_barcode_sets, ConstructionDomain, Fitness, GeneticSearch,
    Initialization, ProgressListener, SearchConfig, SearchDomain, SelectionDomain, SilentProgress,
};
pub use error::{DesignError, Result, ResultExt};
pub use metric::DistanceMetric;
pub use pattern::{BarcodePattern, GcScope, GcWindow};
pub use pool::{CandidatePool, CandidatePoolBuilder};
pub use results::{BarcodeSet, BarcodeSetCollection};
