//! # Genetic Search
//!
//! [`GeneticSearch`] drives the shared generation loop over a
//! [`SearchDomain`]: initialize a population, then repeatedly recombine,
//! mutate and evaluate offspring in parallel, keep the best individuals, and
//! stop on generation count, early-stopping threshold or cancellation.
//! Independent runs execute sequentially; each contributes its best
//! individual to the returned collection.
//!
//! Within a generation, the offspring buffer is partitioned into
//! `num_streams` disjoint contiguous ranges. Each range is handled by one
//! worker of a dedicated thread pool, and a barrier separates the
//! recombination, mutation and evaluation phases: replacement never observes
//! a partially processed generation.

use std::ops::Range;

use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use super::config::SearchConfig;
use super::construction::ConstructionDomain;
use super::domain::SearchDomain;
use super::fitness::Fitness;
use super::progress::ProgressListener;
use super::selection::SelectionDomain;
use crate::error::{DesignError, Result};
use crate::pattern::{BarcodePattern, GcWindow};
use crate::pool::CandidatePool;
use crate::results::{BarcodeSet, BarcodeSetCollection};
use crate::rng;

/// One member of a population: genome, fitness, and the discovery sequence
/// number used for deterministic tie-breaking (earlier wins).
#[derive(Debug, Clone)]
struct Individual<G> {
    genome: G,
    fitness: Fitness,
    seq: u64,
}

/// A genetic search over a domain, ready to run.
pub struct GeneticSearch<D: SearchDomain> {
    domain: D,
    config: SearchConfig,
    workers: rayon::ThreadPool,
}

impl GeneticSearch<SelectionDomain> {
    /// Prepares a selection-mode search over a candidate pool.
    ///
    /// # Errors
    ///
    /// `DesignError::Configuration` for out-of-range parameters, a pool
    /// smaller than the requested set size, or an early-stopping threshold
    /// (early stopping only applies when constructing sets from a pattern).
    pub fn selection(pool: CandidatePool, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        if config.early_stopping_min_dist.is_some() {
            return Err(DesignError::Configuration(
                "early stopping is not available when selecting from a candidate pool"
                    .to_string(),
            ));
        }
        let workers = build_workers(config.num_streams)?;
        let domain = workers.install(|| SelectionDomain::new(pool, &config))?;
        Ok(Self {
            domain,
            config,
            workers,
        })
    }
}

impl GeneticSearch<ConstructionDomain> {
    /// Prepares a construction-mode search that builds sets directly from a
    /// pattern and GC window. With `code_seeding`, initial barcodes are
    /// drawn from a minimum-distance-3 quaternary Hamming code.
    ///
    /// # Errors
    ///
    /// `DesignError::Configuration` for out-of-range parameters, a pattern
    /// without free positions, or color balancing (which requires a
    /// candidate pool).
    pub fn construction(
        pattern: BarcodePattern,
        gc: GcWindow,
        code_seeding: bool,
        config: SearchConfig,
    ) -> Result<Self> {
        config.validate()?;
        if config.balance_colors {
            return Err(DesignError::Configuration(
                "color balancing is only available when selecting from a candidate pool"
                    .to_string(),
            ));
        }
        let workers = build_workers(config.num_streams)?;
        let domain = ConstructionDomain::new(pattern, gc, code_seeding, &config)?;
        Ok(Self {
            domain,
            config,
            workers,
        })
    }
}

impl<D: SearchDomain> GeneticSearch<D> {
    /// The configuration this search was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Executes all runs sequentially and collects each run's best set,
    /// sorted by descending minimum pairwise distance (stable in run order
    /// for ties).
    ///
    /// Cancellation through the listener stops the current run at the next
    /// generation boundary; the run still contributes its best-so-far set
    /// and no further runs are started.
    pub fn run<P>(&self, progress: &P) -> Result<BarcodeSetCollection>
    where
        P: ProgressListener + ?Sized,
    {
        let mut collection = BarcodeSetCollection::new();

        for run in 0..self.config.num_runs {
            info!(run = run + 1, total = self.config.num_runs, "starting run");
            let (best, cancelled) = self.run_once(run, progress)?;

            let barcodes = self.domain.materialize(&best.genome);
            collection.push(BarcodeSet::new(
                barcodes,
                best.fitness.min_distance,
                self.config.metric,
            ));
            info!(
                run = run + 1,
                min_distance = best.fitness.min_distance,
                cancelled,
                "run finished"
            );

            if cancelled {
                break;
            }
        }

        collection.sort_by_quality();
        progress.report(100.0, "barcode set search finished");
        Ok(collection)
    }

    /// One run: fresh population, generation loop, best individual out. The
    /// boolean is `true` when the run was cancelled.
    fn run_once<P>(&self, run: usize, progress: &P) -> Result<(Individual<D::Genome>, bool)>
    where
        P: ProgressListener + ?Sized,
    {
        let mut driver_rng = rng::run_rng(self.config.seed, run);
        let mut seq = 0u64;

        let genomes: Vec<D::Genome> = (0..self.config.population_size)
            .map(|i| {
                self.domain
                    .initialize(i, self.config.initialization, &mut driver_rng)
            })
            .collect::<Result<_>>()?;
        let fitnesses = self.evaluate_batch(&genomes)?;

        let mut population: Vec<Individual<D::Genome>> = genomes
            .into_iter()
            .zip(fitnesses)
            .map(|(genome, fitness)| {
                let individual = Individual {
                    genome,
                    fitness,
                    seq,
                };
                seq += 1;
                individual
            })
            .collect();
        sort_population(&mut population);

        let label = format!("run {} of {}", run + 1, self.config.num_runs);
        if !progress.report(0.0, &format!("{label}: population initialized")) {
            return Ok((population[0].clone(), true));
        }
        if self.reached_early_stop(&population) {
            return Ok((population[0].clone(), false));
        }

        for generation in 0..self.config.num_generations {
            self.advance_generation(&mut population, &mut seq)?;

            let best = &population[0];
            debug!(
                run = run + 1,
                generation = generation + 1,
                best_min_distance = best.fitness.min_distance,
                "generation complete"
            );

            let pct = 100.0 * (generation + 1) as f64 / self.config.num_generations as f64;
            let message = format!(
                "{label}: generation {} of {}, best distance {}",
                generation + 1,
                self.config.num_generations,
                best.fitness.min_distance
            );
            if !progress.report(pct, &message) {
                return Ok((population[0].clone(), true));
            }
            if self.reached_early_stop(&population) {
                debug!(
                    run = run + 1,
                    generation = generation + 1,
                    "early-stopping threshold reached"
                );
                break;
            }
        }

        Ok((population[0].clone(), false))
    }

    /// Advances the population by one generation: recombination, mutation
    /// and evaluation fan out over disjoint offspring ranges with a barrier
    /// between the phases, then elitist truncation merges parents and
    /// children.
    fn advance_generation(
        &self,
        population: &mut Vec<Individual<D::Genome>>,
        seq: &mut u64,
    ) -> Result<()> {
        if population.is_empty() {
            return Err(DesignError::EmptyPopulation);
        }

        let num_offspring = self.config.num_offspring;
        let ranges = partition_ranges(num_offspring, self.config.num_streams);
        let chunk = chunk_size(num_offspring, self.config.num_streams);

        // Phase 1: recombination.
        let parents: &[Individual<D::Genome>] = population;
        let mut offspring: Vec<D::Genome> = self
            .workers
            .install(|| {
                ranges
                    .par_iter()
                    .map(|range| {
                        let mut rng = rand::thread_rng();
                        range
                            .clone()
                            .map(|_| {
                                let (a, b) = pick_parents(parents.len(), &mut rng);
                                self.domain.recombine(
                                    &parents[a].genome,
                                    &parents[b].genome,
                                    &mut rng,
                                )
                            })
                            .collect::<Vec<_>>()
                    })
                    .collect::<Vec<_>>()
            })
            .into_iter()
            .flatten()
            .collect();

        // Phase 2: mutation, on disjoint contiguous chunks.
        self.workers.install(|| {
            offspring.par_chunks_mut(chunk).for_each(|children| {
                let mut rng = rand::thread_rng();
                for child in children {
                    self.domain.mutate(child, &mut rng);
                }
            });
        });

        // Phase 3: evaluation.
        let fitnesses = self.evaluate_batch(&offspring)?;

        // Replacement: merge and keep the best, earlier discoveries first on
        // ties.
        for (genome, fitness) in offspring.into_iter().zip(fitnesses) {
            *seq += 1;
            population.push(Individual {
                genome,
                fitness,
                seq: *seq,
            });
        }
        sort_population(population);
        population.truncate(self.config.population_size);
        Ok(())
    }

    /// Evaluates a batch of genomes in parallel over disjoint chunks.
    fn evaluate_batch(&self, genomes: &[D::Genome]) -> Result<Vec<Fitness>> {
        if genomes.is_empty() {
            return Ok(Vec::new());
        }
        let chunk = chunk_size(genomes.len(), self.config.num_streams);
        let per_chunk: Vec<Vec<Fitness>> = self.workers.install(|| {
            genomes
                .par_chunks(chunk)
                .map(|chunk| {
                    chunk
                        .iter()
                        .map(|genome| self.domain.evaluate(genome))
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<Vec<_>>>()
        })?;
        Ok(per_chunk.into_iter().flatten().collect())
    }

    fn reached_early_stop(&self, population: &[Individual<D::Genome>]) -> bool {
        match self.config.early_stopping_min_dist {
            Some(threshold) => population
                .first()
                .is_some_and(|best| best.fitness.min_distance >= threshold),
            None => false,
        }
    }
}

/// Builds the worker pool that executes the per-phase ranges.
fn build_workers(num_streams: usize) -> Result<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(num_streams)
        .build()
        .map_err(|e| DesignError::Configuration(format!("failed to build worker pool: {e}")))
}

/// Sorts best-first: higher fitness, then earlier discovery.
fn sort_population<G>(population: &mut [Individual<G>]) {
    population.sort_by(|a, b| b.fitness.cmp(&a.fitness).then_with(|| a.seq.cmp(&b.seq)));
}

/// Splits `total` items into up to `streams` contiguous, disjoint,
/// near-equal ranges covering all items.
fn partition_ranges(total: usize, streams: usize) -> Vec<Range<usize>> {
    let base = total / streams;
    let remainder = total % streams;
    let mut ranges = Vec::with_capacity(streams);
    let mut start = 0;
    for worker in 0..streams {
        let len = base + usize::from(worker < remainder);
        if len == 0 {
            break;
        }
        ranges.push(start..start + len);
        start += len;
    }
    ranges
}

fn chunk_size(total: usize, streams: usize) -> usize {
    ((total + streams - 1) / streams).max(1)
}

/// Picks two parent indices, biased quadratically toward the front of the
/// best-first population; the parents differ whenever the population allows.
fn pick_parents(len: usize, rng: &mut impl Rng) -> (usize, usize) {
    let first = biased_index(len, rng);
    if len == 1 {
        return (first, first);
    }
    let mut second = biased_index(len, rng);
    while second == first {
        second = biased_index(len, rng);
    }
    (first, second)
}

fn biased_index(len: usize, rng: &mut impl Rng) -> usize {
    let r: f64 = rng.gen();
    (((r * r) * len as f64) as usize).min(len - 1)
}

/// Selects maximum-distance barcode subsets from a candidate pool.
///
/// Convenience wrapper over [`GeneticSearch::selection`] + [`GeneticSearch::run`].
pub fn select_barcode_sets<P>(
    pool: CandidatePool,
    config: SearchConfig,
    progress: &P,
) -> Result<BarcodeSetCollection>
where
    P: ProgressListener + ?Sized,
{
    GeneticSearch::selection(pool, config)?.run(progress)
}

/// Builds maximum-distance barcode sets directly from a pattern and GC
/// window.
///
/// Convenience wrapper over [`GeneticSearch::construction`] +
/// [`GeneticSearch::run`].
pub fn optimize_barcode_sets<P>(
    pattern: BarcodePattern,
    gc: GcWindow,
    code_seeding: bool,
    config: SearchConfig,
    progress: &P,
) -> Result<BarcodeSetCollection>
where
    P: ProgressListener + ?Sized,
{
    GeneticSearch::construction(pattern, gc, code_seeding, config)?.run(progress)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::Initialization;
    use crate::metric::DistanceMetric;
    use crate::pool::CandidatePoolBuilder;

    fn small_selection_search() -> GeneticSearch<SelectionDomain> {
        let pattern = BarcodePattern::unconstrained(8).unwrap();
        let gc = GcWindow::new(0.25, 0.75).unwrap();
        let pool = CandidatePoolBuilder::new(pattern, gc, 40)
            .seed(13)
            .build()
            .unwrap();
        let config = SearchConfig::builder(5)
            .population_size(8)
            .num_offspring(16)
            .num_generations(10)
            .num_streams(2)
            .metric(DistanceMetric::Hamming)
            .initialization(Initialization::Random)
            .seed(13)
            .build();
        GeneticSearch::selection(pool, config).unwrap()
    }

    #[test]
    fn test_partition_ranges_cover_everything() {
        for (total, streams) in [(10, 3), (7, 7), (3, 8), (100, 12), (1, 1)] {
            let ranges = partition_ranges(total, streams);
            assert!(ranges.len() <= streams);
            let mut covered = 0;
            let mut expected_start = 0;
            for range in &ranges {
                assert_eq!(range.start, expected_start, "ranges must be contiguous");
                assert!(!range.is_empty());
                covered += range.len();
                expected_start = range.end;
            }
            assert_eq!(covered, total);
        }
    }

    #[test]
    fn test_biased_index_stays_in_bounds() {
        let mut rng = rand::thread_rng();
        for len in [1usize, 2, 5, 100] {
            for _ in 0..200 {
                assert!(biased_index(len, &mut rng) < len);
            }
        }
    }

    #[test]
    fn test_pick_parents_distinct() {
        let mut rng = rand::thread_rng();
        for _ in 0..100 {
            let (a, b) = pick_parents(5, &mut rng);
            assert_ne!(a, b);
            assert!(a < 5 && b < 5);
        }
        let (a, b) = pick_parents(1, &mut rng);
        assert_eq!((a, b), (0, 0));
    }

    #[test]
    fn test_best_fitness_never_decreases() {
        let search = small_selection_search();
        let mut driver_rng = rng::run_rng(Some(1), 0);
        let mut seq = 0u64;

        let genomes: Vec<_> = (0..search.config.population_size)
            .map(|i| {
                search
                    .domain
                    .initialize(i, Initialization::Random, &mut driver_rng)
                    .unwrap()
            })
            .collect();
        let fitnesses = search.evaluate_batch(&genomes).unwrap();
        let mut population: Vec<_> = genomes
            .into_iter()
            .zip(fitnesses)
            .map(|(genome, fitness)| {
                let individual = Individual {
                    genome,
                    fitness,
                    seq,
                };
                seq += 1;
                individual
            })
            .collect();
        sort_population(&mut population);

        let mut best = population[0].fitness;
        for _ in 0..15 {
            search
                .advance_generation(&mut population, &mut seq)
                .unwrap();
            assert_eq!(population.len(), search.config.population_size);
            let current = population[0].fitness;
            assert!(current >= best, "elitism lost the incumbent best");
            best = current;
        }
    }

    #[test]
    fn test_population_sorted_best_first_with_stable_ties() {
        let mut population = vec![
            Individual {
                genome: (),
                fitness: Fitness::from_distance(3),
                seq: 2,
            },
            Individual {
                genome: (),
                fitness: Fitness::from_distance(5),
                seq: 1,
            },
            Individual {
                genome: (),
                fitness: Fitness::from_distance(5),
                seq: 0,
            },
        ];
        sort_population(&mut population);
        assert_eq!(population[0].seq, 0);
        assert_eq!(population[1].seq, 1);
        assert_eq!(population[2].seq, 2);
    }
}
