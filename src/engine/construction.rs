//! # Construction Mode
//!
//! Builds barcode sets directly from a pattern and GC window instead of
//! selecting from a pre-built pool. The genome carries the k barcode strings
//! themselves; mutation resamples single free positions and re-validates the
//! constraints.

use rand::rngs::StdRng;
use rand::{Rng, RngCore};

use super::config::{Initialization, SearchConfig};
use super::domain::SearchDomain;
use super::fitness::{Fitness, FitnessEvaluator};
use crate::coding::CodewordSampler;
use crate::error::{DesignError, Result};
use crate::pattern::{BarcodePattern, GcWindow, NUCLEOTIDES};

/// Attempt budget for sampling one valid, unseen barcode.
const MAX_SAMPLE_ATTEMPTS: usize = 1000;

/// Bounded attempts at finding a valid point mutation.
const MAX_MUTATION_ATTEMPTS: usize = 20;

/// Batch size multiplier for the greedy initialization.
const GREEDY_BATCH_FACTOR: usize = 4;

/// A genome in construction mode: k distinct, pattern- and GC-valid
/// barcodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetGenome {
    pub(crate) barcodes: Vec<String>,
}

/// Construction-mode search domain.
pub struct ConstructionDomain {
    pattern: BarcodePattern,
    gc: GcWindow,
    sampler: Option<CodewordSampler>,
    evaluator: FitnessEvaluator,
    set_size: usize,
}

impl ConstructionDomain {
    pub(crate) fn new(
        pattern: BarcodePattern,
        gc: GcWindow,
        code_seeding: bool,
        config: &SearchConfig,
    ) -> Result<Self> {
        if pattern.num_free() == 0 {
            return Err(DesignError::Configuration(
                "construction requires a pattern with at least one free position".to_string(),
            ));
        }
        let sampler = if code_seeding {
            Some(CodewordSampler::new(pattern.clone())?)
        } else {
            None
        };
        Ok(Self {
            pattern,
            gc,
            sampler,
            evaluator: FitnessEvaluator::new(config.metric, false),
            set_size: config.set_size,
        })
    }

    /// The pattern barcodes are built from.
    pub fn pattern(&self) -> &BarcodePattern {
        &self.pattern
    }

    fn sample_valid(
        &self,
        rng: &mut dyn RngCore,
        taken: &[String],
    ) -> std::result::Result<String, ()> {
        for _ in 0..MAX_SAMPLE_ATTEMPTS {
            let candidate = match &self.sampler {
                Some(code) => code.sample(rng),
                None => self.pattern.fill_random(rng),
            };
            if self.gc.accepts(&self.pattern, &candidate)
                && !taken.iter().any(|b| b == &candidate)
            {
                return Ok(candidate);
            }
        }
        Err(())
    }

    fn sample_set(&self, count: usize, rng: &mut dyn RngCore) -> Result<Vec<String>> {
        let mut barcodes: Vec<String> = Vec::with_capacity(count);
        while barcodes.len() < count {
            match self.sample_valid(rng, &barcodes) {
                Ok(barcode) => barcodes.push(barcode),
                Err(()) => {
                    return Err(DesignError::GenerationExhausted {
                        requested: count,
                        generated: barcodes.len(),
                    })
                }
            }
        }
        Ok(barcodes)
    }

    /// Greedy pick of k barcodes out of a freshly sampled batch, maximizing
    /// the minimum distance to the already-chosen set at every step.
    fn greedy_from_batch(&self, rng: &mut StdRng) -> Result<Vec<String>> {
        let batch = self.sample_set(self.set_size * GREEDY_BATCH_FACTOR, rng)?;
        let mut chosen: Vec<String> = Vec::with_capacity(self.set_size);
        chosen.push(batch[0].clone());

        while chosen.len() < self.set_size {
            let mut best: Option<(usize, usize)> = None; // (batch index, distance)
            for (i, candidate) in batch.iter().enumerate() {
                if chosen.contains(candidate) {
                    continue;
                }
                let mut dist = usize::MAX;
                for picked in &chosen {
                    dist = dist.min(self.evaluator.distance(candidate, picked)?);
                }
                if best.map_or(true, |(_, d)| dist > d) {
                    best = Some((i, dist));
                }
            }
            match best {
                Some((i, _)) => chosen.push(batch[i].clone()),
                None => break, // batch exhausted; cannot happen while batch > set
            }
        }
        Ok(chosen)
    }
}

impl SearchDomain for ConstructionDomain {
    type Genome = SetGenome;

    fn set_size(&self) -> usize {
        self.set_size
    }

    fn initialize(
        &self,
        _index: usize,
        strategy: Initialization,
        rng: &mut StdRng,
    ) -> Result<Self::Genome> {
        let barcodes = match strategy {
            Initialization::Random => self.sample_set(self.set_size, rng)?,
            Initialization::ForwardGreedy => self.greedy_from_batch(rng)?,
        };
        Ok(SetGenome { barcodes })
    }

    fn recombine(
        &self,
        a: &Self::Genome,
        b: &Self::Genome,
        rng: &mut dyn RngCore,
    ) -> Self::Genome {
        let mut union = a.barcodes.clone();
        for barcode in &b.barcodes {
            if !union.contains(barcode) {
                union.push(barcode.clone());
            }
        }
        while union.len() > self.set_size {
            let victim = rng.gen_range(0..union.len());
            union.swap_remove(victim);
        }
        SetGenome { barcodes: union }
    }

    fn mutate(&self, genome: &mut Self::Genome, rng: &mut dyn RngCore) {
        let slot = rng.gen_range(0..genome.barcodes.len());
        let free = self.pattern.free_positions();

        for _ in 0..MAX_MUTATION_ATTEMPTS {
            let pos = free[rng.gen_range(0..free.len())];
            let current = genome.barcodes[slot].as_bytes()[pos];
            let replacement = NUCLEOTIDES[rng.gen_range(0..NUCLEOTIDES.len())];
            if replacement == current {
                continue;
            }

            let mut candidate = genome.barcodes[slot].clone().into_bytes();
            candidate[pos] = replacement;
            let candidate = String::from_utf8(candidate).unwrap_or_default();

            if self.gc.accepts(&self.pattern, &candidate)
                && !genome.barcodes.iter().any(|b| b == &candidate)
            {
                genome.barcodes[slot] = candidate;
                return;
            }
        }
        // No valid point mutation found within the budget; keep the genome.
    }

    fn evaluate(&self, genome: &Self::Genome) -> Result<Fitness> {
        let refs: Vec<&str> = genome.barcodes.iter().map(String::as_str).collect();
        self.evaluator.evaluate(&refs)
    }

    fn materialize(&self, genome: &Self::Genome) -> Vec<String> {
        genome.barcodes.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::DistanceMetric;
    use rand::SeedableRng;

    fn test_domain(set_size: usize) -> ConstructionDomain {
        let pattern = BarcodePattern::parse("________").unwrap();
        let gc = GcWindow::new(0.25, 0.75).unwrap();
        let config = SearchConfig::builder(set_size)
            .metric(DistanceMetric::Hamming)
            .build();
        ConstructionDomain::new(pattern, gc, false, &config).unwrap()
    }

    fn assert_valid(domain: &ConstructionDomain, genome: &SetGenome, set_size: usize) {
        assert_eq!(genome.barcodes.len(), set_size);
        let mut sorted = genome.barcodes.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), set_size, "duplicate barcodes in genome");
        for barcode in &genome.barcodes {
            assert!(domain.pattern.matches(barcode));
            assert!(domain.gc.accepts(&domain.pattern, barcode));
        }
    }

    #[test]
    fn test_rejects_pattern_without_free_positions() {
        let pattern = BarcodePattern::parse("ACGT").unwrap();
        let gc = GcWindow::new(0.0, 1.0).unwrap();
        let config = SearchConfig::builder(2).build();
        assert!(matches!(
            ConstructionDomain::new(pattern, gc, false, &config),
            Err(DesignError::Configuration(_))
        ));
    }

    #[test]
    fn test_initialize_random_and_greedy() {
        let domain = test_domain(6);
        let mut rng = StdRng::seed_from_u64(17);
        for strategy in [Initialization::Random, Initialization::ForwardGreedy] {
            let genome = domain.initialize(0, strategy, &mut rng).unwrap();
            assert_valid(&domain, &genome, 6);
        }
    }

    #[test]
    fn test_initialize_exhaustion() {
        // A window only GC-only barcodes satisfy: 2^4 = 16 exist, 20 wanted.
        let pattern = BarcodePattern::unconstrained(4).unwrap();
        let gc = GcWindow::new(1.0, 1.0).unwrap();
        let config = SearchConfig::builder(20).build();
        let domain = ConstructionDomain::new(pattern, gc, false, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(23);
        assert!(matches!(
            domain.initialize(0, Initialization::Random, &mut rng),
            Err(DesignError::GenerationExhausted { .. })
        ));
    }

    #[test]
    fn test_recombine_and_mutate_keep_invariants() {
        let domain = test_domain(4);
        let mut rng = StdRng::seed_from_u64(31);
        let a = domain
            .initialize(0, Initialization::Random, &mut rng)
            .unwrap();
        let b = domain
            .initialize(1, Initialization::Random, &mut rng)
            .unwrap();

        for _ in 0..20 {
            let mut child = domain.recombine(&a, &b, &mut rng);
            assert_valid(&domain, &child, 4);
            domain.mutate(&mut child, &mut rng);
            assert_valid(&domain, &child, 4);
        }
    }

    #[test]
    fn test_code_seeded_initialization() {
        let pattern = BarcodePattern::unconstrained(8).unwrap();
        let gc = GcWindow::new(0.0, 1.0).unwrap();
        let config = SearchConfig::builder(4)
            .metric(DistanceMetric::Hamming)
            .build();
        let domain = ConstructionDomain::new(pattern, gc, true, &config).unwrap();
        let mut rng = StdRng::seed_from_u64(41);
        let genome = domain
            .initialize(0, Initialization::Random, &mut rng)
            .unwrap();
        let fitness = domain.evaluate(&genome).unwrap();
        assert!(fitness.min_distance >= 3);
    }
}
