use serde::{Deserialize, Serialize};

use crate::catalog::LookupError;

/// A name catalog for genes with named alleles.
///
/// A gene's id is its position in the catalog; an allele's id is its position
/// in the gene's allele list. Allele id 0 is the implicit default allele
/// unless a frequency table says otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneMap {
    genes: Vec<String>,
    alleles: Vec<Vec<String>>,
}

impl GeneMap {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from ordered gene names and their ordered allele names.
    ///
    /// The two vectors must be the same length; position defines the id.
    pub fn from_entries(genes: Vec<String>, alleles: Vec<Vec<String>>) -> Self {
        debug_assert_eq!(genes.len(), alleles.len());
        Self { genes, alleles }
    }

    /// Number of genes in the catalog.
    #[inline]
    pub fn gene_count(&self) -> usize {
        self.genes.len()
    }

    /// Check if the catalog has no genes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Number of alleles of the gene with the given id.
    #[inline]
    pub fn allele_count(&self, gene: usize) -> usize {
        self.alleles[gene].len()
    }

    /// Resolve a gene name to its id, failing on an unknown name.
    pub fn gene_id(&self, name: &str) -> Result<usize, LookupError> {
        self.try_gene_id(name).ok_or_else(|| LookupError::Gene {
            name: name.to_string(),
        })
    }

    /// Resolve a gene name to its id, or `None` if absent.
    pub fn try_gene_id(&self, name: &str) -> Option<usize> {
        self.genes.iter().position(|g| g == name)
    }

    /// Resolve an allele name to its id within a gene, failing on an unknown
    /// name.
    pub fn allele_id(&self, gene: usize, name: &str) -> Result<u8, LookupError> {
        self.alleles[gene]
            .iter()
            .position(|a| a == name)
            .map(|id| id as u8)
            .ok_or_else(|| LookupError::Allele {
                gene: self.genes[gene].clone(),
                name: name.to_string(),
            })
    }

    /// Name of the gene with the given id.
    #[inline]
    pub fn gene_name(&self, gene: usize) -> &str {
        &self.genes[gene]
    }

    /// Name of an allele of a gene.
    #[inline]
    pub fn allele_name(&self, gene: usize, allele: u8) -> &str {
        &self.alleles[gene][allele as usize]
    }

    /// Borrow the ordered gene names.
    #[inline]
    pub fn gene_names(&self) -> &[String] {
        &self.genes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coat_map() -> GeneMap {
        GeneMap::from_entries(
            vec!["extension".into(), "tyrosinase".into()],
            vec![
                vec!["wildtype".into(), "black".into(), "red".into()],
                vec!["wildtype".into(), "white".into()],
            ],
        )
    }

    #[test]
    fn test_gene_map_ids() {
        let map = coat_map();
        assert_eq!(map.gene_count(), 2);
        assert_eq!(map.gene_id("extension").unwrap(), 0);
        assert_eq!(map.gene_id("tyrosinase").unwrap(), 1);
        assert_eq!(map.allele_id(0, "red").unwrap(), 2);
        assert_eq!(map.allele_id(1, "white").unwrap(), 1);
    }

    #[test]
    fn test_gene_map_counts() {
        let map = coat_map();
        assert_eq!(map.allele_count(0), 3);
        assert_eq!(map.allele_count(1), 2);
        assert!(!map.is_empty());
        assert!(GeneMap::new().is_empty());
    }

    #[test]
    fn test_gene_map_unknown_gene() {
        let map = coat_map();
        assert_eq!(
            map.gene_id("agouti"),
            Err(LookupError::Gene {
                name: "agouti".into()
            })
        );
        assert_eq!(map.try_gene_id("agouti"), None);
    }

    #[test]
    fn test_gene_map_unknown_allele() {
        let map = coat_map();
        let err = map.allele_id(0, "blue").unwrap_err();
        assert_eq!(
            err,
            LookupError::Allele {
                gene: "extension".into(),
                name: "blue".into()
            }
        );
    }

    #[test]
    fn test_gene_map_names_round_trip() {
        let map = coat_map();
        assert_eq!(map.gene_name(1), "tyrosinase");
        assert_eq!(map.allele_name(0, 1), "black");
        assert_eq!(map.gene_names().len(), 2);
    }
}
