//! The seam between the generation loop and the two operating modes.
//!
//! The engine itself is mode-agnostic: it evolves genomes it cannot inspect,
//! through the operations defined here. Selection mode represents an
//! individual as index subsets into a candidate pool; construction mode as
//! the barcode strings themselves. The two modes differ only in genome
//! representation and in how recombination, mutation and evaluation are
//! carried out.

use std::fmt::Debug;

use rand::rngs::StdRng;
use rand::RngCore;

use super::config::Initialization;
use super::fitness::Fitness;
use crate::error::Result;

/// One operating mode of the search: genome representation plus the genetic
/// operators over it.
///
/// Implementations must uphold the set invariant: every genome holds
/// `set_size` pairwise-distinct barcodes at all times.
pub trait SearchDomain: Send + Sync {
    /// The genome representation of one individual.
    type Genome: Clone + Debug + Send + Sync;

    /// The number of barcodes per individual.
    fn set_size(&self) -> usize;

    /// Builds the genome of individual `index` of a fresh population.
    fn initialize(
        &self,
        index: usize,
        strategy: Initialization,
        rng: &mut StdRng,
    ) -> Result<Self::Genome>;

    /// Combines two parents into a child genome.
    fn recombine(&self, a: &Self::Genome, b: &Self::Genome, rng: &mut dyn RngCore)
        -> Self::Genome;

    /// Mutates a genome in place, keeping it valid.
    fn mutate(&self, genome: &mut Self::Genome, rng: &mut dyn RngCore);

    /// Computes the fitness of a genome.
    fn evaluate(&self, genome: &Self::Genome) -> Result<Fitness>;

    /// Resolves a genome into its barcode strings.
    fn materialize(&self, genome: &Self::Genome) -> Vec<String>;
}
