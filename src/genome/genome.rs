//! The per-individual genome: sampling, meiosis, fertilization, mutation,
//! and allele queries.

use std::error;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use rand::Rng;

use crate::catalog::LookupError;
use crate::genome::buffers::{BitBuffer, ByteMatrix};
use crate::genotype::{AlleleFrequencies, GenomeType};

/// Error raised by genome operations that depend on structural preconditions.
#[derive(Debug)]
pub enum GenomeError {
    /// Meiosis requires an even ploidy.
    OddPloidy { ploidy: usize, genome_type: String },
    /// A YW-category query was made on a homogametic genome.
    NotHeterogametic { genome_type: String },
    /// A name failed to resolve against the genome type's catalogs.
    Lookup(LookupError),
}

impl fmt::Display for GenomeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OddPloidy {
                ploidy,
                genome_type,
            } => write!(
                f,
                "Gamete formation is not supported for odd ploidy (n={ploidy}). \
                 Genome type: {genome_type}"
            ),
            Self::NotHeterogametic { genome_type } => write!(
                f,
                "YW gene query on a homogametic genome of type {genome_type}"
            ),
            Self::Lookup(e) => write!(f, "{e}"),
        }
    }
}

impl error::Error for GenomeError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Lookup(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LookupError> for GenomeError {
    fn from(e: LookupError) -> Self {
        Self::Lookup(e)
    }
}

/// One individual's genetic state across all five locus categories.
///
/// Buffers are sized by the owning [`GenomeType`]'s catalogs and the genome's
/// ploidy. The presence of the `yw` buffer is the sole heterogametic-status
/// flag; sex-linked `xz` buffers carry `ploidy` copies on homogametic
/// genomes and `ploidy / 2` on heterogametic ones.
#[derive(Debug, Clone)]
pub struct Genome {
    genome_type: Arc<GenomeType>,
    ploidy: usize,
    autosomal: ByteMatrix,
    anonymous: ByteMatrix,
    bitwise: BitBuffer,
    xz: ByteMatrix,
    yw: Option<ByteMatrix>,
}

impl Genome {
    /// Zeroed genome with uninitialized (zero-copy) sex chromosomes.
    fn blank(genome_type: Arc<GenomeType>, ploidy: usize) -> Self {
        let autosomal = ByteMatrix::new(genome_type.autosomal().gene_count(), ploidy);
        let anonymous = ByteMatrix::new(genome_type.anonymous().gene_count(), ploidy);
        let bitwise = BitBuffer::new(genome_type.bitwise().gene_count(), ploidy);
        let xz = ByteMatrix::new(genome_type.xz().gene_count(), 0);
        Self {
            genome_type,
            ploidy,
            autosomal,
            anonymous,
            bitwise,
            xz,
            yw: None,
        }
    }

    /// Sample a fresh diploid genome from population allele frequencies.
    ///
    /// Byte loci draw an allele id from their cumulative table (allele 0
    /// when no table is configured), anonymous markers are filled with
    /// uniform random bytes, and each bitwise copy is set with its per-locus
    /// probability. The heterogametic sex receives `ploidy / 2` xz copies
    /// plus a yw haplotype.
    pub fn sample<R: Rng + ?Sized>(
        genome_type: Arc<GenomeType>,
        frequencies: &AlleleFrequencies,
        heterogametic: bool,
        rng: &mut R,
    ) -> Self {
        let ploidy = 2;
        let mut genome = Self::blank(genome_type, ploidy);
        let ty = Arc::clone(&genome.genome_type);

        for gene in 0..ty.autosomal().gene_count() {
            for copy in 0..ploidy {
                let allele = draw_allele(frequencies.autosomal_table(gene), rng);
                genome.autosomal.set(gene, copy, allele);
            }
        }

        rng.fill(genome.anonymous.as_bytes_mut());

        let mut locus = 0;
        for group in 0..ty.bitwise().group_count() {
            for in_group in 0..ty.bitwise().size_of(group) {
                let chance = frequencies.bitwise_chance(group, in_group);
                for copy in 0..ploidy {
                    if rng.random::<f32>() < chance {
                        genome.bitwise.set(locus, copy, true);
                    }
                }
                locus += 1;
            }
        }

        let xz_copies = if heterogametic { ploidy / 2 } else { ploidy };
        genome.xz = ByteMatrix::new(ty.xz().gene_count(), xz_copies);
        for gene in 0..ty.xz().gene_count() {
            for copy in 0..xz_copies {
                let allele = draw_allele(frequencies.xz_table(gene), rng);
                genome.xz.set(gene, copy, allele);
            }
        }

        if heterogametic {
            let mut yw = ByteMatrix::new(ty.yw().gene_count(), ploidy / 2);
            for gene in 0..ty.yw().gene_count() {
                for copy in 0..ploidy / 2 {
                    let allele = draw_allele(frequencies.yw_table(gene), rng);
                    yw.set(gene, copy, allele);
                }
            }
            genome.yw = Some(yw);
        }

        genome
    }

    /// Rebuild a genome from raw buffers, zero-extending each one to the
    /// genome type's current catalog sizes. `yw = Some` marks the genome
    /// heterogametic even when the yw catalog is empty.
    pub(crate) fn from_buffers(
        genome_type: Arc<GenomeType>,
        ploidy: usize,
        autosomal: Vec<u8>,
        anonymous: Vec<u8>,
        bitwise: Vec<u8>,
        xz: Vec<u8>,
        yw: Option<Vec<u8>>,
    ) -> Self {
        let heterogametic = yw.is_some();
        let xz_copies = if heterogametic { ploidy / 2 } else { ploidy };
        Self {
            autosomal: ByteMatrix::from_bytes(autosomal, genome_type.autosomal().gene_count(), ploidy),
            anonymous: ByteMatrix::from_bytes(anonymous, genome_type.anonymous().gene_count(), ploidy),
            bitwise: BitBuffer::from_bytes(bitwise, genome_type.bitwise().gene_count(), ploidy),
            xz: ByteMatrix::from_bytes(xz, genome_type.xz().gene_count(), xz_copies),
            yw: yw.map(|data| {
                ByteMatrix::from_bytes(data, genome_type.yw().gene_count(), ploidy / 2)
            }),
            genome_type,
            ploidy,
        }
    }

    /// Perform meiosis: produce a gamete of half this genome's ploidy.
    ///
    /// Autosomal and anonymous loci pick one parental homolog uniformly per
    /// gene per gamete copy-slot; genes are not linked. Bitwise loci copy
    /// one bit from a uniformly chosen parental copy. A heterogametic
    /// parent transmits its yw haplotype unchanged into a
    /// heterogametic-destined gamete, or one xz haplotype unchanged
    /// otherwise; a homogametic parent's xz loci split like autosomal ones.
    pub fn create_gamete<R: Rng + ?Sized>(
        &self,
        heterogametic: bool,
        rng: &mut R,
    ) -> Result<Genome, GenomeError> {
        if self.ploidy % 2 != 0 {
            return Err(GenomeError::OddPloidy {
                ploidy: self.ploidy,
                genome_type: self.genome_type.name().to_string(),
            });
        }
        let mut gamete = Self::blank(Arc::clone(&self.genome_type), self.ploidy / 2);

        split_genes(&mut gamete.autosomal, &self.autosomal, rng);
        split_genes(&mut gamete.anonymous, &self.anonymous, rng);

        for copy in 0..gamete.ploidy {
            for locus in 0..self.genome_type.bitwise().gene_count() {
                let n = rng.random_range(0..2);
                let bit = self.bitwise.get(locus, 2 * copy + n);
                gamete.bitwise.set(locus, copy, bit);
            }
        }

        if self.is_heterogametic() {
            if heterogametic {
                // xz stays at zero copies; the yw haplotype rides along
                // without recombining.
                gamete.yw = self.yw.clone();
            } else {
                gamete.xz = self.xz.clone();
            }
        } else {
            gamete.xz = ByteMatrix::new(self.genome_type.xz().gene_count(), gamete.ploidy);
            split_genes(&mut gamete.xz, &self.xz, rng);
        }

        Ok(gamete)
    }

    /// Fertilization: concatenate the copy-axis of every category from two
    /// gametes. The zygote's yw is whichever gamete carries one.
    pub fn join(&self, other: &Genome) -> Genome {
        let ploidy = self.ploidy + other.ploidy;
        let ty = Arc::clone(&self.genome_type);

        let autosomal = join_genes(&self.autosomal, &other.autosomal, ty.autosomal().gene_count());
        let anonymous = join_genes(&self.anonymous, &other.anonymous, ty.anonymous().gene_count());

        let bit_loci = ty.bitwise().gene_count();
        let mut bitwise = BitBuffer::new(bit_loci, ploidy);
        for locus in 0..bit_loci {
            for copy in 0..self.ploidy {
                bitwise.set(locus, copy, self.bitwise.get(locus, copy));
            }
            for copy in 0..other.ploidy {
                bitwise.set(locus, self.ploidy + copy, other.bitwise.get(locus, copy));
            }
        }

        let xz = join_genes(&self.xz, &other.xz, ty.xz().gene_count());
        let yw = self.yw.clone().or_else(|| other.yw.clone());

        Genome {
            genome_type: ty,
            ploidy,
            autosomal,
            anonymous,
            bitwise,
            xz,
            yw,
        }
    }

    /// Derive an offspring genome from two parents.
    pub fn inherit<R: Rng + ?Sized>(
        mother: &Genome,
        father: &Genome,
        heterogametic: bool,
        rng: &mut R,
    ) -> Result<Genome, GenomeError> {
        let egg = mother.create_gamete(heterogametic, rng)?;
        let sperm = father.create_gamete(heterogametic, rng)?;
        Ok(egg.join(&sperm))
    }

    /// Mutate every locus copy independently with probability `p` per
    /// generation. Byte loci resample uniformly over their allele count,
    /// anonymous markers resample a full byte, bitwise loci flip. Genes
    /// configured hypermutable use their multiplied rate instead of `p`.
    pub fn mutate<R: Rng + ?Sized>(&mut self, p: f64, rng: &mut R) {
        let ty = Arc::clone(&self.genome_type);

        for gene in 0..ty.autosomal().gene_count() {
            let rate = match ty.hypermutable_multiplier(gene) {
                Some(multiplier) => multiplier * p,
                None => p,
            };
            let allele_count = ty.autosomal().allele_count(gene);
            for copy in 0..self.ploidy {
                if rng.random::<f64>() < rate {
                    let allele = rng.random_range(0..allele_count) as u8;
                    self.autosomal.set(gene, copy, allele);
                }
            }
        }

        for locus in 0..ty.anonymous().gene_count() {
            for copy in 0..self.ploidy {
                if rng.random::<f64>() < p {
                    self.anonymous.set(locus, copy, rng.random::<u8>());
                }
            }
        }

        for locus in 0..ty.bitwise().gene_count() {
            for copy in 0..self.ploidy {
                if rng.random::<f64>() < p {
                    self.bitwise.flip(locus, copy);
                }
            }
        }

        for gene in 0..ty.xz().gene_count() {
            let allele_count = ty.xz().allele_count(gene);
            for copy in 0..self.xz.copies() {
                if rng.random::<f64>() < p {
                    self.xz.set(gene, copy, rng.random_range(0..allele_count) as u8);
                }
            }
        }

        if let Some(yw) = &mut self.yw {
            for gene in 0..ty.yw().gene_count() {
                let allele_count = ty.yw().allele_count(gene);
                for copy in 0..yw.copies() {
                    if rng.random::<f64>() < p {
                        yw.set(gene, copy, rng.random_range(0..allele_count) as u8);
                    }
                }
            }
        }
    }

    /// Whether any autosomal copy matches any of the given allele ids.
    pub fn has_allele(&self, gene: usize, alleles: &[u8]) -> bool {
        self.autosomal
            .row(gene)
            .iter()
            .any(|a| alleles.contains(a))
    }

    /// Whether every autosomal copy matches at least one of the given
    /// allele ids.
    pub fn has_only_alleles(&self, gene: usize, alleles: &[u8]) -> bool {
        self.autosomal
            .row(gene)
            .iter()
            .all(|a| alleles.contains(a))
    }

    /// Name-based form of [`Genome::has_allele`].
    pub fn has_allele_named(&self, gene: &str, alleles: &[&str]) -> Result<bool, LookupError> {
        let (gene, ids) = self.resolve_alleles(self.genome_type.autosomal(), gene, alleles)?;
        Ok(self.has_allele(gene, &ids))
    }

    /// Name-based form of [`Genome::has_only_alleles`].
    pub fn has_only_alleles_named(
        &self,
        gene: &str,
        alleles: &[&str],
    ) -> Result<bool, LookupError> {
        let (gene, ids) = self.resolve_alleles(self.genome_type.autosomal(), gene, alleles)?;
        Ok(self.has_only_alleles(gene, &ids))
    }

    /// Whether any xz copy matches any of the given allele ids.
    pub fn has_sexlinked(&self, gene: usize, alleles: &[u8]) -> bool {
        self.xz.row(gene).iter().any(|a| alleles.contains(a))
    }

    /// Whether every xz copy matches at least one of the given allele ids.
    /// Vacuously true on a zero-copy xz buffer.
    pub fn has_only_sexlinked(&self, gene: usize, alleles: &[u8]) -> bool {
        self.xz.row(gene).iter().all(|a| alleles.contains(a))
    }

    /// Name-based form of [`Genome::has_sexlinked`].
    pub fn has_sexlinked_named(&self, gene: &str, alleles: &[&str]) -> Result<bool, LookupError> {
        let (gene, ids) = self.resolve_alleles(self.genome_type.xz(), gene, alleles)?;
        Ok(self.has_sexlinked(gene, &ids))
    }

    /// Name-based form of [`Genome::has_only_sexlinked`].
    pub fn has_only_sexlinked_named(
        &self,
        gene: &str,
        alleles: &[&str],
    ) -> Result<bool, LookupError> {
        let (gene, ids) = self.resolve_alleles(self.genome_type.xz(), gene, alleles)?;
        Ok(self.has_only_sexlinked(gene, &ids))
    }

    /// Whether any yw copy matches any of the given allele ids. Fails on a
    /// homogametic genome.
    pub fn has_heterogametic(&self, gene: usize, alleles: &[u8]) -> Result<bool, GenomeError> {
        let yw = self.require_yw()?;
        Ok(yw.row(gene).iter().any(|a| alleles.contains(a)))
    }

    /// Whether every yw copy matches at least one of the given allele ids.
    /// Fails on a homogametic genome.
    pub fn has_only_heterogametic(
        &self,
        gene: usize,
        alleles: &[u8],
    ) -> Result<bool, GenomeError> {
        let yw = self.require_yw()?;
        Ok(yw.row(gene).iter().all(|a| alleles.contains(a)))
    }

    /// Name-based form of [`Genome::has_heterogametic`].
    pub fn has_heterogametic_named(
        &self,
        gene: &str,
        alleles: &[&str],
    ) -> Result<bool, GenomeError> {
        let (gene, ids) = self.resolve_alleles(self.genome_type.yw(), gene, alleles)?;
        self.has_heterogametic(gene, &ids)
    }

    /// Name-based form of [`Genome::has_only_heterogametic`].
    pub fn has_only_heterogametic_named(
        &self,
        gene: &str,
        alleles: &[&str],
    ) -> Result<bool, GenomeError> {
        let (gene, ids) = self.resolve_alleles(self.genome_type.yw(), gene, alleles)?;
        self.has_only_heterogametic(gene, &ids)
    }

    fn resolve_alleles(
        &self,
        map: &crate::catalog::GeneMap,
        gene: &str,
        alleles: &[&str],
    ) -> Result<(usize, Vec<u8>), LookupError> {
        let gene_id = map.gene_id(gene)?;
        let mut ids = Vec::with_capacity(alleles.len());
        for allele in alleles {
            ids.push(map.allele_id(gene_id, allele)?);
        }
        Ok((gene_id, ids))
    }

    fn require_yw(&self) -> Result<&ByteMatrix, GenomeError> {
        self.yw.as_ref().ok_or_else(|| GenomeError::NotHeterogametic {
            genome_type: self.genome_type.name().to_string(),
        })
    }

    /// Count of set bits over all copies of the loci in `range`.
    pub fn bitwise_sum_in(&self, range: Range<usize>) -> usize {
        let copies = self.bitwise.copies();
        range
            .map(|locus| (0..copies).filter(|&c| self.bitwise.get(locus, c)).count())
            .sum()
    }

    /// Count of loci in `range` with at least one set copy.
    pub fn bitwise_dominant_in(&self, range: Range<usize>) -> usize {
        let copies = self.bitwise.copies();
        range
            .filter(|&locus| (0..copies).any(|c| self.bitwise.get(locus, c)))
            .count()
    }

    /// Count of loci in `range` with every copy set.
    pub fn bitwise_recessive_in(&self, range: Range<usize>) -> usize {
        let copies = self.bitwise.copies();
        range
            .filter(|&locus| (0..copies).all(|c| self.bitwise.get(locus, c)))
            .count()
    }

    /// Count of loci in `range` whose copies all carry the same bit.
    pub fn bitwise_homozygotes_in(&self, range: Range<usize>) -> usize {
        let copies = self.bitwise.copies();
        range
            .filter(|&locus| {
                let first = self.bitwise.get(locus, 0);
                (1..copies).all(|c| self.bitwise.get(locus, c) == first)
            })
            .count()
    }

    /// [`Genome::bitwise_sum_in`] over a named bitwise group; 0 when the
    /// group is absent.
    pub fn bitwise_sum(&self, group: &str) -> usize {
        self.bitwise_sum_in(self.genome_type.bitwise().try_range(group))
    }

    /// [`Genome::bitwise_dominant_in`] over a named bitwise group.
    pub fn bitwise_dominant(&self, group: &str) -> usize {
        self.bitwise_dominant_in(self.genome_type.bitwise().try_range(group))
    }

    /// [`Genome::bitwise_recessive_in`] over a named bitwise group.
    pub fn bitwise_recessive(&self, group: &str) -> usize {
        self.bitwise_recessive_in(self.genome_type.bitwise().try_range(group))
    }

    /// [`Genome::bitwise_homozygotes_in`] over a named bitwise group.
    pub fn bitwise_homozygotes(&self, group: &str) -> usize {
        self.bitwise_homozygotes_in(self.genome_type.bitwise().try_range(group))
    }

    /// Overwrite one autosomal copy by name.
    pub fn set_autosomal(&mut self, gene: &str, copy: usize, allele: &str) -> Result<(), LookupError> {
        let gene_id = self.genome_type.autosomal().gene_id(gene)?;
        let allele_id = self.genome_type.autosomal().allele_id(gene_id, allele)?;
        self.autosomal.set(gene_id, copy, allele_id);
        Ok(())
    }

    /// Overwrite every copy of an autosomal gene by name.
    pub fn set_homozygous(&mut self, gene: &str, allele: &str) -> Result<(), LookupError> {
        let gene_id = self.genome_type.autosomal().gene_id(gene)?;
        let allele_id = self.genome_type.autosomal().allele_id(gene_id, allele)?;
        for copy in 0..self.ploidy {
            self.autosomal.set(gene_id, copy, allele_id);
        }
        Ok(())
    }

    /// If the genome is homozygous for `avoid`, replace copy 0 with the
    /// first other allele of positive population frequency, falling back to
    /// `fallback` when none has one.
    pub fn set_not_homozygous_for(
        &mut self,
        gene: &str,
        avoid: &str,
        frequencies: &AlleleFrequencies,
        fallback: &str,
    ) -> Result<(), LookupError> {
        let map = self.genome_type.autosomal();
        let gene_id = map.gene_id(gene)?;
        let avoid_id = map.allele_id(gene_id, avoid)?;
        if !self.has_only_alleles(gene_id, &[avoid_id]) {
            return Ok(());
        }
        if let Some(table) = frequencies.autosomal_table(gene_id) {
            let mut previous = 0.0;
            for (allele, &cumulative) in table.iter().enumerate() {
                if allele != avoid_id as usize && cumulative > previous {
                    self.autosomal.set(gene_id, 0, allele as u8);
                    break;
                }
                previous = cumulative;
            }
        }
        if self.autosomal.get(gene_id, 0) == avoid_id {
            let fallback_id = self.genome_type.autosomal().allele_id(gene_id, fallback)?;
            self.autosomal.set(gene_id, 0, fallback_id);
        }
        Ok(())
    }

    /// Whether any of the genome type's interpreters rules this genome
    /// nonviable.
    pub fn is_embryonic_lethal(&self) -> bool {
        self.genome_type
            .interpreters()
            .iter()
            .any(|interpreter| interpreter.is_embryonic_lethal(self))
    }

    /// Whether this genome carries a yw haplotype.
    #[inline]
    pub fn is_heterogametic(&self) -> bool {
        self.yw.is_some()
    }

    /// Whether this genome carries a full complement of xz copies.
    #[inline]
    pub fn is_homogametic(&self) -> bool {
        self.yw.is_none()
    }

    /// Number of genome copies.
    #[inline]
    pub fn ploidy(&self) -> usize {
        self.ploidy
    }

    /// The owning genome type.
    #[inline]
    pub fn genome_type(&self) -> &Arc<GenomeType> {
        &self.genome_type
    }

    /// Autosomal allele matrix.
    #[inline]
    pub fn autosomal(&self) -> &ByteMatrix {
        &self.autosomal
    }

    /// Anonymous marker matrix.
    #[inline]
    pub fn anonymous(&self) -> &ByteMatrix {
        &self.anonymous
    }

    /// Mutable anonymous marker matrix, for interpreter finalize hooks.
    #[inline]
    pub fn anonymous_mut(&mut self) -> &mut ByteMatrix {
        &mut self.anonymous
    }

    /// Bitwise trait buffer.
    #[inline]
    pub fn bitwise(&self) -> &BitBuffer {
        &self.bitwise
    }

    /// Mutable bitwise trait buffer.
    #[inline]
    pub fn bitwise_mut(&mut self) -> &mut BitBuffer {
        &mut self.bitwise
    }

    /// Sex-linked allele matrix.
    #[inline]
    pub fn xz(&self) -> &ByteMatrix {
        &self.xz
    }

    /// Heterogametic-only allele matrix, when present.
    #[inline]
    pub fn yw(&self) -> Option<&ByteMatrix> {
        self.yw.as_ref()
    }
}

impl PartialEq for Genome {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.genome_type, &other.genome_type)
            && self.ploidy == other.ploidy
            && self.autosomal == other.autosomal
            && self.anonymous == other.anonymous
            && self.bitwise == other.bitwise
            && self.xz == other.xz
            && self.yw == other.yw
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Genome << type:{}, ploidy={}, autosomal={:?}, xz={:?}, yw={:?}, \
             anonymous={:?}, bitwise={:?} >>",
            self.genome_type.name(),
            self.ploidy,
            self.autosomal.as_bytes(),
            self.xz.as_bytes(),
            self.yw.as_ref().map(|m| m.as_bytes()),
            self.anonymous.as_bytes(),
            self.bitwise.as_bytes(),
        )
    }
}

/// Inverse-CDF draw over a cumulative table; allele 0 when no table is
/// configured.
fn draw_allele<R: Rng + ?Sized>(table: Option<&[f32]>, rng: &mut R) -> u8 {
    let Some(table) = table else {
        return 0;
    };
    let f = rng.random::<f32>();
    let mut allele = 0;
    while allele < table.len() && table[allele] < f {
        allele += 1;
    }
    allele as u8
}

/// Copy one uniformly chosen parental homolog per gene per gamete slot.
fn split_genes<R: Rng + ?Sized>(gamete: &mut ByteMatrix, parent: &ByteMatrix, rng: &mut R) {
    for copy in 0..gamete.copies() {
        for gene in 0..parent.genes() {
            let n = rng.random_range(0..2);
            gamete.set(gene, copy, parent.get(gene, 2 * copy + n));
        }
    }
}

/// Concatenate the copy-axis of two matrices gene by gene.
fn join_genes(first: &ByteMatrix, second: &ByteMatrix, genes: usize) -> ByteMatrix {
    let copies = first.copies() + second.copies();
    let mut joined = ByteMatrix::new(genes, copies);
    for gene in 0..genes {
        for copy in 0..first.copies() {
            joined.set(gene, copy, first.get(gene, copy));
        }
        for copy in 0..second.copies() {
            joined.set(gene, first.copies() + copy, second.get(gene, copy));
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genotype::GenomeType;
    use crate::interpret::InterpreterRegistry;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    const MAMMAL: &str = r#"{
        "genes": {
            "autosomal": [
                { "extension": ["wildtype", "black", "red"] },
                { "KIT": ["wildtype", "spotted"] }
            ],
            "xz": [ { "xlinked1": ["a", "b"] } ],
            "yw": [ { "ylinked1": ["a", "b"] } ],
            "anonymous": [ { "deleterious": 16 } ],
            "bitwise": [ { "vigor": 12 } ]
        },
        "sexdetermination": "xy"
    }"#;

    fn mammal() -> Arc<GenomeType> {
        Arc::new(
            GenomeType::from_json("mammal", MAMMAL, &InterpreterRegistry::with_defaults()).unwrap(),
        )
    }

    fn rng(seed: u64) -> Xoshiro256PlusPlus {
        Xoshiro256PlusPlus::seed_from_u64(seed)
    }

    #[test]
    fn test_sample_shapes_homogametic() {
        let ty = mammal();
        let genome = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), false, &mut rng(1));
        assert_eq!(genome.ploidy(), 2);
        assert_eq!(genome.autosomal().copies(), 2);
        assert_eq!(genome.xz().copies(), 2);
        assert!(genome.is_homogametic());
        assert!(genome.yw().is_none());
    }

    #[test]
    fn test_sample_shapes_heterogametic() {
        let ty = mammal();
        let genome = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), true, &mut rng(1));
        assert_eq!(genome.xz().copies(), 1);
        assert!(genome.is_heterogametic());
        assert_eq!(genome.yw().unwrap().copies(), 1);
    }

    #[test]
    fn test_sample_without_tables_gives_allele_zero() {
        let ty = mammal();
        let genome = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), false, &mut rng(3));
        for gene in 0..2 {
            assert_eq!(genome.autosomal().row(gene), &[0, 0]);
        }
        assert_eq!(genome.bitwise_sum("vigor"), 0);
    }

    #[test]
    fn test_sample_is_deterministic() {
        let ty = mammal();
        let a = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), true, &mut rng(42));
        let b = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), true, &mut rng(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_gamete_halves_ploidy_and_join_restores_it() {
        let ty = mammal();
        let mother = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), false, &mut rng(5));
        let gamete = mother.create_gamete(false, &mut rng(6)).unwrap();
        assert_eq!(gamete.ploidy(), 1);
        let zygote = gamete.join(&gamete.clone());
        assert_eq!(zygote.ploidy(), 2);
    }

    #[test]
    fn test_gamete_copies_come_from_parent() {
        let ty = mammal();
        let mut mother =
            Genome::sample(Arc::clone(&ty), ty.default_frequencies(), false, &mut rng(7));
        mother.set_autosomal("extension", 0, "black").unwrap();
        mother.set_autosomal("extension", 1, "red").unwrap();
        for _ in 0..10 {
            let gamete = mother.create_gamete(false, &mut rng(8)).unwrap();
            let allele = gamete.autosomal().get(0, 0);
            assert!(allele == 1 || allele == 2);
        }
    }

    #[test]
    fn test_heterogametic_parent_transmits_yw_unchanged() {
        let ty = mammal();
        let father = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), true, &mut rng(9));
        let gamete = father.create_gamete(true, &mut rng(10)).unwrap();
        assert!(gamete.is_heterogametic());
        assert_eq!(gamete.yw(), father.yw());
        assert_eq!(gamete.xz().copies(), 0);

        let gamete = father.create_gamete(false, &mut rng(11)).unwrap();
        assert!(gamete.is_homogametic());
        assert_eq!(gamete.xz(), father.xz());
    }

    #[test]
    fn test_inherit_sexes() {
        let ty = mammal();
        let mother = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), false, &mut rng(12));
        let father = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), true, &mut rng(13));

        let daughter = Genome::inherit(&mother, &father, false, &mut rng(14)).unwrap();
        assert!(daughter.is_homogametic());
        assert_eq!(daughter.ploidy(), 2);
        assert_eq!(daughter.xz().copies(), 2);

        let son = Genome::inherit(&mother, &father, true, &mut rng(15)).unwrap();
        assert!(son.is_heterogametic());
        assert_eq!(son.xz().copies(), 1);
        assert_eq!(son.yw(), father.yw());
    }

    #[test]
    fn test_odd_ploidy_gamete_fails() {
        let ty = mammal();
        let mother = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), false, &mut rng(16));
        let gamete = mother.create_gamete(false, &mut rng(17)).unwrap();
        assert!(matches!(
            gamete.create_gamete(false, &mut rng(18)),
            Err(GenomeError::OddPloidy { ploidy: 1, .. })
        ));
    }

    #[test]
    fn test_mutate_zero_rate_is_identity() {
        let ty = mammal();
        let mut genome =
            Genome::sample(Arc::clone(&ty), ty.default_frequencies(), true, &mut rng(19));
        let before = genome.clone();
        genome.mutate(0.0, &mut rng(20));
        assert_eq!(genome, before);
    }

    #[test]
    fn test_mutate_full_rate_resamples_in_catalog_bounds() {
        let ty = mammal();
        let mut genome =
            Genome::sample(Arc::clone(&ty), ty.default_frequencies(), false, &mut rng(21));
        genome.mutate(1.0, &mut rng(22));
        for copy in 0..2 {
            assert!(genome.autosomal().get(0, copy) < 3);
            assert!(genome.autosomal().get(1, copy) < 2);
            assert!(genome.xz().get(0, copy) < 2);
        }
    }

    #[test]
    fn test_allele_queries() {
        let ty = mammal();
        let mut genome =
            Genome::sample(Arc::clone(&ty), ty.default_frequencies(), false, &mut rng(23));
        genome.set_autosomal("extension", 0, "black").unwrap();
        genome.set_autosomal("extension", 1, "red").unwrap();

        assert!(genome.has_allele_named("extension", &["black"]).unwrap());
        assert!(!genome.has_allele_named("extension", &["wildtype"]).unwrap());
        assert!(genome
            .has_only_alleles_named("extension", &["black", "red"])
            .unwrap());
        assert!(!genome
            .has_only_alleles_named("extension", &["black"])
            .unwrap());
        assert!(genome.has_allele_named("agouti", &["black"]).is_err());
    }

    #[test]
    fn test_heterogametic_queries_require_yw() {
        let ty = mammal();
        let female = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), false, &mut rng(24));
        assert!(matches!(
            female.has_heterogametic(0, &[0]),
            Err(GenomeError::NotHeterogametic { .. })
        ));
        let male = Genome::sample(Arc::clone(&ty), ty.default_frequencies(), true, &mut rng(25));
        assert!(male.has_heterogametic_named("ylinked1", &["a"]).unwrap());
    }

    #[test]
    fn test_set_homozygous_and_avoidance() {
        let ty = mammal();
        let mut genome =
            Genome::sample(Arc::clone(&ty), ty.default_frequencies(), false, &mut rng(26));
        genome.set_homozygous("extension", "black").unwrap();
        assert!(genome.has_only_alleles_named("extension", &["black"]).unwrap());

        genome
            .set_not_homozygous_for("extension", "black", ty.default_frequencies(), "wildtype")
            .unwrap();
        // No frequency table configured, so the fallback applies to copy 0.
        assert_eq!(genome.autosomal().get(0, 0), 0);
        assert_eq!(genome.autosomal().get(0, 1), 1);
    }

    #[test]
    fn test_bitwise_counts_sum_rule() {
        let ty = mammal();
        let mut genome =
            Genome::sample(Arc::clone(&ty), ty.default_frequencies(), false, &mut rng(27));
        // Locus 0 homozygous set, locus 1 heterozygous, rest clear.
        genome.bitwise_mut().set(0, 0, true);
        genome.bitwise_mut().set(0, 1, true);
        genome.bitwise_mut().set(1, 0, true);

        assert_eq!(genome.bitwise_sum("vigor"), 3);
        assert_eq!(genome.bitwise_dominant("vigor"), 2);
        assert_eq!(genome.bitwise_recessive("vigor"), 1);
        assert_eq!(
            genome.bitwise_sum("vigor"),
            genome.bitwise_dominant("vigor") + genome.bitwise_recessive("vigor")
        );
        // 10 clear loci plus the homozygous-set one.
        assert_eq!(genome.bitwise_homozygotes("vigor"), 11);
        // Absent group reads as empty.
        assert_eq!(genome.bitwise_sum("luck"), 0);
    }
}
