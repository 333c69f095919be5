//! # Selection Mode
//!
//! Picks maximum-distance subsets of size k from a fixed candidate pool.
//! The genome is a set of k distinct indices into the pool.
//!
//! All pairwise distances over the pool are computed once up front, so each
//! fitness evaluation is k² table lookups instead of k² string comparisons.

use rand::seq::index::sample;
use rand::rngs::StdRng;
use rand::{Rng, RngCore};
use rayon::prelude::*;

use super::config::{Initialization, SearchConfig};
use super::domain::SearchDomain;
use super::fitness::Fitness;
use crate::balance;
use crate::error::{DesignError, Result};
use crate::metric::DistanceMetric;
use crate::pool::CandidatePool;

/// Bounded attempts at finding a replacement index during mutation.
const MAX_SWAP_ATTEMPTS: usize = 100;

/// A genome in selection mode: k distinct indices into the candidate pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexGenome {
    pub(crate) indices: Vec<usize>,
}

/// Symmetric pairwise distance table over a candidate pool.
#[derive(Debug, Clone)]
pub(crate) struct DistanceMatrix {
    n: usize,
    data: Vec<u16>,
}

impl DistanceMatrix {
    /// Computes all pairwise distances. Rows are computed in parallel on the
    /// current rayon pool.
    pub(crate) fn compute(pool: &CandidatePool, metric: DistanceMetric) -> Result<Self> {
        let n = pool.len();
        let rows: Vec<Vec<u16>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut scratch = Vec::new();
                (0..n)
                    .map(|j| {
                        metric
                            .distance_with_buffer(pool.get(i), pool.get(j), &mut scratch)
                            .map(|d| d as u16)
                    })
                    .collect::<Result<Vec<u16>>>()
            })
            .collect::<Result<Vec<_>>>()?;

        let mut data = Vec::with_capacity(n * n);
        for row in rows {
            data.extend(row);
        }
        Ok(Self { n, data })
    }

    #[inline]
    pub(crate) fn get(&self, i: usize, j: usize) -> usize {
        self.data[i * self.n + j] as usize
    }
}

/// Selection-mode search domain: a candidate pool plus its distance table.
pub struct SelectionDomain {
    pool: CandidatePool,
    matrix: DistanceMatrix,
    set_size: usize,
    balance_colors: bool,
}

impl SelectionDomain {
    /// Builds the domain, precomputing the distance matrix. Call inside the
    /// engine's thread pool so the computation respects the stream bound.
    pub(crate) fn new(pool: CandidatePool, config: &SearchConfig) -> Result<Self> {
        if pool.len() < config.set_size {
            return Err(DesignError::Configuration(format!(
                "candidate pool holds {} barcodes but sets of {} were requested",
                pool.len(),
                config.set_size
            )));
        }
        let matrix = DistanceMatrix::compute(&pool, config.metric)?;
        Ok(Self {
            pool,
            matrix,
            set_size: config.set_size,
            balance_colors: config.balance_colors,
        })
    }

    /// The candidate pool this domain selects from.
    pub fn pool(&self) -> &CandidatePool {
        &self.pool
    }

    /// Greedily grows a set from `start`: always add the candidate whose
    /// minimum distance to the chosen set is largest, ties to the lowest
    /// index. Deterministic for a given start.
    fn forward_greedy(&self, start: usize) -> Vec<usize> {
        let n = self.pool.len();
        let mut chosen = Vec::with_capacity(self.set_size);
        chosen.push(start % n);

        while chosen.len() < self.set_size {
            let mut best_idx = None;
            let mut best_dist = 0usize;
            for candidate in 0..n {
                if chosen.contains(&candidate) {
                    continue;
                }
                let dist = chosen
                    .iter()
                    .map(|&c| self.matrix.get(candidate, c))
                    .min()
                    .unwrap_or(usize::MAX);
                if best_idx.is_none() || dist > best_dist {
                    best_idx = Some(candidate);
                    best_dist = dist;
                }
            }
            // set_size <= pool size, so a candidate always remains.
            if let Some(idx) = best_idx {
                chosen.push(idx);
            }
        }
        chosen
    }
}

impl SearchDomain for SelectionDomain {
    type Genome = IndexGenome;

    fn set_size(&self) -> usize {
        self.set_size
    }

    fn initialize(
        &self,
        index: usize,
        strategy: Initialization,
        rng: &mut StdRng,
    ) -> Result<Self::Genome> {
        let indices = match strategy {
            Initialization::Random => {
                sample(rng, self.pool.len(), self.set_size).into_vec()
            }
            Initialization::ForwardGreedy => self.forward_greedy(index),
        };
        Ok(IndexGenome { indices })
    }

    fn recombine(
        &self,
        a: &Self::Genome,
        b: &Self::Genome,
        rng: &mut dyn RngCore,
    ) -> Self::Genome {
        // Union of both parents' picks, trimmed back to k at random.
        let mut union = a.indices.clone();
        for &idx in &b.indices {
            if !union.contains(&idx) {
                union.push(idx);
            }
        }
        while union.len() > self.set_size {
            let victim = rng.gen_range(0..union.len());
            union.swap_remove(victim);
        }
        IndexGenome { indices: union }
    }

    fn mutate(&self, genome: &mut Self::Genome, rng: &mut dyn RngCore) {
        if self.pool.len() <= self.set_size {
            return; // no index outside the genome to swap in
        }
        for _ in 0..MAX_SWAP_ATTEMPTS {
            let replacement = rng.gen_range(0..self.pool.len());
            if !genome.indices.contains(&replacement) {
                let slot = rng.gen_range(0..genome.indices.len());
                genome.indices[slot] = replacement;
                return;
            }
        }
    }

    fn evaluate(&self, genome: &Self::Genome) -> Result<Fitness> {
        let mut min_distance = usize::MAX;
        for (i, &a) in genome.indices.iter().enumerate() {
            for &b in &genome.indices[(i + 1)..] {
                min_distance = min_distance.min(self.matrix.get(a, b));
            }
        }

        let balance_penalty = if self.balance_colors {
            let barcodes: Vec<&str> = genome.indices.iter().map(|&i| self.pool.get(i)).collect();
            balance::balance_deviation(&balance::channel_percentages(&barcodes))
        } else {
            0.0
        };

        Ok(Fitness {
            min_distance,
            balance_penalty,
        })
    }

    fn materialize(&self, genome: &Self::Genome) -> Vec<String> {
        genome
            .indices
            .iter()
            .map(|&i| self.pool.get(i).to_string())
            .collect()
    }
}
