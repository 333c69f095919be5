//! # Search Configuration
//!
//! [`SearchConfig`] is the single record describing a search: the size of
//! the barcode sets to produce and the genetic-algorithm parameters. It is
//! validated once when an engine is constructed, before any run starts.
//!
//! Defaults match the conventional command-line surface of barcode design
//! tools: a population of 100 with twice as many offspring, 1000
//! generations, a single run, 4 parallel streams, Levenshtein distance.
//!
//! ## Example
//!
//! ```rust
//! use barcode_designer::engine::SearchConfig;
//! use barcode_designer::metric::DistanceMetric;
//!
//! let config = SearchConfig::builder(8)
//!     .population_size(50)
//!     .num_generations(200)
//!     .num_runs(3)
//!     .metric(DistanceMetric::Hamming)
//!     .build();
//! assert_eq!(config.num_offspring, 100); // defaults to 2x population
//! ```

use crate::error::{DesignError, Result};
use crate::metric::DistanceMetric;

/// Upper bound on the number of parallel streams.
pub const MAX_STREAMS: usize = 12;

/// How the initial population of a run is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Initialization {
    /// Sample each individual's barcodes uniformly at random.
    Random,
    /// Deterministic forward-greedy seed: grow each individual from a
    /// distinct starting candidate, always adding the barcode that
    /// maximizes the minimum distance to the set so far.
    #[default]
    ForwardGreedy,
}

/// Configuration record for a genetic barcode search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Number of barcodes per set (the genome size k).
    pub set_size: usize,
    /// Number of individuals kept between generations.
    pub population_size: usize,
    /// Number of children produced each generation.
    pub num_offspring: usize,
    /// Maximum number of generations per run.
    pub num_generations: usize,
    /// Number of independent runs; each contributes one result set.
    pub num_runs: usize,
    /// Number of parallel streams for recombination, mutation and fitness
    /// evaluation (1 to [`MAX_STREAMS`]).
    pub num_streams: usize,
    /// Initial-population strategy.
    pub initialization: Initialization,
    /// Balance A/C vs G/T color channels per position (selection mode).
    pub balance_colors: bool,
    /// Stop a run early once the best minimum pairwise distance reaches
    /// this value (construction mode). `None` disables early stopping.
    pub early_stopping_min_dist: Option<usize>,
    /// The distance metric for fitness evaluation.
    pub metric: DistanceMetric,
    /// Seed for the driver-side RNG. Initialization and sequential
    /// decisions become reproducible; parallel worker phases stay
    /// nondeterministic.
    pub seed: Option<u64>,
}

impl SearchConfig {
    /// Returns a builder for sets of `set_size` barcodes.
    pub fn builder(set_size: usize) -> SearchConfigBuilder {
        SearchConfigBuilder::new(set_size)
    }

    /// Checks the parameter ranges shared by both search modes.
    pub(crate) fn validate(&self) -> Result<()> {
        if self.set_size < 2 {
            return Err(DesignError::Configuration(
                "a barcode set needs at least 2 barcodes".to_string(),
            ));
        }
        if self.population_size == 0 {
            return Err(DesignError::Configuration(
                "population size must be greater than 0".to_string(),
            ));
        }
        if self.num_offspring == 0 {
            return Err(DesignError::Configuration(
                "number of offspring must be greater than 0".to_string(),
            ));
        }
        if self.num_generations == 0 {
            return Err(DesignError::Configuration(
                "number of generations must be greater than 0".to_string(),
            ));
        }
        if self.num_runs == 0 {
            return Err(DesignError::Configuration(
                "number of runs must be greater than 0".to_string(),
            ));
        }
        if self.num_streams == 0 || self.num_streams > MAX_STREAMS {
            return Err(DesignError::Configuration(format!(
                "number of parallel streams must lie between 1 and {MAX_STREAMS}"
            )));
        }
        Ok(())
    }
}

/// Fluent builder for [`SearchConfig`].
#[derive(Debug, Clone)]
pub struct SearchConfigBuilder {
    set_size: usize,
    population_size: usize,
    num_offspring: Option<usize>,
    num_generations: usize,
    num_runs: usize,
    num_streams: usize,
    initialization: Initialization,
    balance_colors: bool,
    early_stopping_min_dist: Option<usize>,
    metric: DistanceMetric,
    seed: Option<u64>,
}

impl SearchConfigBuilder {
    fn new(set_size: usize) -> Self {
        Self {
            set_size,
            population_size: 100,
            num_offspring: None,
            num_generations: 1000,
            num_runs: 1,
            num_streams: 4,
            initialization: Initialization::default(),
            balance_colors: false,
            early_stopping_min_dist: None,
            metric: DistanceMetric::Levenshtein,
            seed: None,
        }
    }

    /// Sets the population size.
    pub fn population_size(mut self, value: usize) -> Self {
        self.population_size = value;
        self
    }

    /// Sets the number of offspring per generation. Defaults to twice the
    /// population size.
    pub fn num_offspring(mut self, value: usize) -> Self {
        self.num_offspring = Some(value);
        self
    }

    /// Sets the number of generations per run.
    pub fn num_generations(mut self, value: usize) -> Self {
        self.num_generations = value;
        self
    }

    /// Sets the number of independent runs.
    pub fn num_runs(mut self, value: usize) -> Self {
        self.num_runs = value;
        self
    }

    /// Sets the number of parallel streams.
    pub fn num_streams(mut self, value: usize) -> Self {
        self.num_streams = value;
        self
    }

    /// Sets the initialization strategy.
    pub fn initialization(mut self, value: Initialization) -> Self {
        self.initialization = value;
        self
    }

    /// Enables per-position color balancing (selection mode).
    pub fn balance_colors(mut self, value: bool) -> Self {
        self.balance_colors = value;
        self
    }

    /// Enables early stopping at the given minimum distance (construction
    /// mode).
    pub fn early_stopping_min_dist(mut self, value: usize) -> Self {
        self.early_stopping_min_dist = Some(value);
        self
    }

    /// Sets the distance metric.
    pub fn metric(mut self, value: DistanceMetric) -> Self {
        self.metric = value;
        self
    }

    /// Seeds the driver-side RNG.
    pub fn seed(mut self, value: u64) -> Self {
        self.seed = Some(value);
        self
    }

    /// Builds the configuration. Range validation happens when an engine is
    /// constructed from it.
    pub fn build(self) -> SearchConfig {
        let num_offspring = self.num_offspring.unwrap_or(self.population_size * 2);
        SearchConfig {
            set_size: self.set_size,
            population_size: self.population_size,
            num_offspring,
            num_generations: self.num_generations,
            num_runs: self.num_runs,
            num_streams: self.num_streams,
            initialization: self.initialization,
            balance_colors: self.balance_colors,
            early_stopping_min_dist: self.early_stopping_min_dist,
            metric: self.metric,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SearchConfig::builder(8).build();
        assert_eq!(config.population_size, 100);
        assert_eq!(config.num_offspring, 200);
        assert_eq!(config.num_generations, 1000);
        assert_eq!(config.num_runs, 1);
        assert_eq!(config.num_streams, 4);
        assert_eq!(config.metric, DistanceMetric::Levenshtein);
        assert!(config.early_stopping_min_dist.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_offspring_follows_population_unless_set() {
        let config = SearchConfig::builder(4).population_size(30).build();
        assert_eq!(config.num_offspring, 60);

        let config = SearchConfig::builder(4)
            .population_size(30)
            .num_offspring(45)
            .build();
        assert_eq!(config.num_offspring, 45);
    }

    #[test]
    fn test_validation_rejects_out_of_range_values() {
        assert!(SearchConfig::builder(1).build().validate().is_err());
        assert!(SearchConfig::builder(4)
            .population_size(0)
            .build()
            .validate()
            .is_err());
        assert!(SearchConfig::builder(4)
            .num_offspring(0)
            .build()
            .validate()
            .is_err());
        assert!(SearchConfig::builder(4)
            .num_generations(0)
            .build()
            .validate()
            .is_err());
        assert!(SearchConfig::builder(4)
            .num_runs(0)
            .build()
            .validate()
            .is_err());
        assert!(SearchConfig::builder(4)
            .num_streams(0)
            .build()
            .validate()
            .is_err());
        assert!(SearchConfig::builder(4)
            .num_streams(MAX_STREAMS + 1)
            .build()
            .validate()
            .is_err());
    }
}
