//! Built-in interpreter for anonymous deleterious mutations and inbreeding
//! tracking.

use rand::{Rng, RngCore};

use crate::genome::Genome;
use crate::genotype::AlleleFrequencies;
use crate::interpret::{GeneInterpreter, Phenotype};

/// Anonymous group read for recessive deleterious mutations.
const DELETERIOUS_GROUP: &str = "deleterious";
/// Bitwise group read for the inbreeding coefficient stat.
const COI_GROUP: &str = "coi";
/// Homozygous deleterious loci at or above this count kill the embryo.
const LETHAL_HOMOZYGOTES: usize = 4;

/// Interprets the `deleterious` anonymous group as recessive harmful
/// mutations and the `coi` bitwise group as an inbreeding coefficient.
///
/// A genome type without those groups gets no-op behavior from every hook.
#[derive(Debug, Clone)]
pub struct PolygeneInterpreter {
    inbreeding_resistance: f32,
}

impl PolygeneInterpreter {
    /// Create an interpreter with the given resistance, clamped to
    /// `0.05..=0.9`.
    ///
    /// Resistance is the per-copy probability that a founder's deleterious
    /// locus is cleared during spawn finalization. Higher values make wild
    /// populations healthier and inbreeding depression slower to surface.
    pub fn new(inbreeding_resistance: f32) -> Self {
        Self {
            inbreeding_resistance: inbreeding_resistance.clamp(0.05, 0.9),
        }
    }

    /// Configured per-copy clearing probability.
    #[inline]
    pub fn inbreeding_resistance(&self) -> f32 {
        self.inbreeding_resistance
    }

    fn homozygous_deleterious(&self, genome: &Genome) -> usize {
        let range = genome.genome_type().anonymous().try_range(DELETERIOUS_GROUP);
        let anonymous = genome.anonymous();
        range
            .filter(|&locus| {
                let row = anonymous.row(locus);
                row[0] != 0 && row.iter().all(|&a| a == row[0])
            })
            .count()
    }
}

impl Default for PolygeneInterpreter {
    fn default() -> Self {
        Self::new(0.6)
    }
}

impl GeneInterpreter for PolygeneInterpreter {
    fn name(&self) -> &str {
        "polygenes"
    }

    fn finalize_spawn(
        &self,
        genome: &mut Genome,
        _frequencies: &AlleleFrequencies,
        rng: &mut dyn RngCore,
    ) {
        let range = genome.genome_type().anonymous().try_range(DELETERIOUS_GROUP);
        let copies = genome.anonymous().copies();
        let anonymous = genome.anonymous_mut();
        for locus in range.clone() {
            for copy in 0..copies {
                if rng.random::<f32>() < self.inbreeding_resistance {
                    anonymous.set(locus, copy, 0);
                }
            }
        }
        // Founders never start out homozygous for a deleterious allele.
        for locus in range {
            let row = anonymous.row(locus);
            if row[0] != 0 && row.iter().all(|&a| a == row[0]) {
                for copy in 0..copies {
                    anonymous.set(locus, copy, 0);
                }
            }
        }
    }

    fn is_embryonic_lethal(&self, genome: &Genome) -> bool {
        self.homozygous_deleterious(genome) >= LETHAL_HOMOZYGOTES
    }

    fn interpret(&self, genome: &Genome, phenotype: &mut Phenotype) {
        let range = genome.genome_type().bitwise().try_range(COI_GROUP);
        let loci = range.len();
        if loci > 0 {
            let repeats = genome.bitwise_homozygotes_in(range);
            phenotype.set_stat("coi", repeats as f32 / loci as f32);
        }
    }
}
