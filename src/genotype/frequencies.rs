//! Population allele frequency tables.
//!
//! Each table is an ascending cumulative-probability array over allele ids,
//! ready for inverse-CDF sampling: a uniform draw `f` in `[0, 1)` selects
//! the first allele id whose prefix sum exceeds `f`.

use std::collections::BTreeMap;

use crate::catalog::{GeneGroupMap, GeneMap};
use crate::genotype::config::{
    BitwiseFrequencyConfig, ConfigError, FrequencyEntry, FrequencyMapConfig,
};

/// Cumulative allele-frequency tables for every locus category.
///
/// An absent (`None`) entry for a gene means "no distribution configured";
/// samplers treat it as "always allele 0" (byte loci) or probability 0
/// (bitwise loci). The empty instance serves as the fallback when no
/// initializer applies.
#[derive(Debug, Clone, PartialEq)]
pub struct AlleleFrequencies {
    autosomal: Vec<Option<Vec<f32>>>,
    xz: Vec<Option<Vec<f32>>>,
    yw: Vec<Option<Vec<f32>>>,
    /// Indexed by group ordinal; per-locus probabilities, the final entry
    /// reused for loci beyond the array's end.
    bitwise: Vec<Option<Vec<f32>>>,
}

impl AlleleFrequencies {
    /// Create an empty table set sized for the given catalogs. Every draw
    /// against it yields allele 0 and no set bits.
    pub fn empty(
        autosomal: &GeneMap,
        xz: &GeneMap,
        yw: &GeneMap,
        bitwise: &GeneGroupMap,
    ) -> Self {
        Self {
            autosomal: vec![None; autosomal.gene_count()],
            xz: vec![None; xz.gene_count()],
            yw: vec![None; yw.gene_count()],
            bitwise: vec![None; bitwise.group_count()],
        }
    }

    /// Build tables from config weight maps.
    ///
    /// Explicit allele weights are summed; the `default` allele absorbs
    /// `max(0, 1 - sum)`; if the sum exceeds 1 every weight is rescaled by
    /// `1 / sum`; the stored arrays are ascending prefix sums.
    pub(crate) fn from_config(
        autosomal_cfg: Option<&FrequencyMapConfig>,
        xz_cfg: Option<&FrequencyMapConfig>,
        yw_cfg: Option<&FrequencyMapConfig>,
        bitwise_cfg: Option<&BTreeMap<String, BitwiseFrequencyConfig>>,
        autosomal: &GeneMap,
        xz: &GeneMap,
        yw: &GeneMap,
        bitwise: &GeneGroupMap,
        type_name: &str,
    ) -> Result<Self, ConfigError> {
        let mut frequencies = Self::empty(autosomal, xz, yw, bitwise);
        parse_category(&mut frequencies.autosomal, autosomal_cfg, autosomal, type_name)?;
        parse_category(&mut frequencies.xz, xz_cfg, xz, type_name)?;
        parse_category(&mut frequencies.yw, yw_cfg, yw, type_name)?;

        if let Some(groups) = bitwise_cfg {
            for (group, entry) in groups {
                let ordinal = bitwise.group_ordinal(group)?;
                let size = bitwise.size_of(ordinal);
                let values = match entry {
                    BitwiseFrequencyConfig::Single(chance) => vec![*chance],
                    BitwiseFrequencyConfig::PerLocus(values) => {
                        if values.is_empty() || values.len() > size {
                            return Err(ConfigError::BitwiseValues {
                                group: group.clone(),
                                genome_type: type_name.to_string(),
                            });
                        }
                        values.clone()
                    }
                };
                frequencies.bitwise[ordinal] = Some(values);
            }
        }

        Ok(frequencies)
    }

    /// Cumulative table for an autosomal gene, if configured.
    #[inline]
    pub fn autosomal_table(&self, gene: usize) -> Option<&[f32]> {
        self.autosomal.get(gene).and_then(|t| t.as_deref())
    }

    /// Cumulative table for an xz gene, if configured.
    #[inline]
    pub fn xz_table(&self, gene: usize) -> Option<&[f32]> {
        self.xz.get(gene).and_then(|t| t.as_deref())
    }

    /// Cumulative table for a yw gene, if configured.
    #[inline]
    pub fn yw_table(&self, gene: usize) -> Option<&[f32]> {
        self.yw.get(gene).and_then(|t| t.as_deref())
    }

    /// Bernoulli probability for one locus of a bitwise group.
    ///
    /// A short per-locus array reuses its final entry for the remaining
    /// loci; an absent group table means probability 0.
    #[inline]
    pub fn bitwise_chance(&self, group: usize, locus_in_group: usize) -> f32 {
        match self.bitwise.get(group).and_then(|t| t.as_deref()) {
            Some(table) => table[locus_in_group.min(table.len() - 1)],
            None => 0.0,
        }
    }
}

fn parse_category(
    out: &mut [Option<Vec<f32>>],
    config: Option<&FrequencyMapConfig>,
    map: &GeneMap,
    type_name: &str,
) -> Result<(), ConfigError> {
    let Some(config) = config else {
        return Ok(());
    };

    for (gene_name, entries) in config {
        let gene = map.gene_id(gene_name)?;

        let default_name = entries.get("default").and_then(|e| match e {
            FrequencyEntry::AlleleName(name) => Some(name.as_str()),
            FrequencyEntry::Weight(_) => None,
        });
        let default_id = match default_name {
            Some(name) => map.allele_id(gene, name)? as usize,
            None => 0,
        };

        let mut weights: Vec<f32> = Vec::new();
        for (allele_name, entry) in entries {
            if allele_name == "default" && default_name.is_some() {
                continue;
            }
            let weight = match entry {
                FrequencyEntry::Weight(w) => *w,
                FrequencyEntry::AlleleName(_) => {
                    return Err(ConfigError::AlleleWeight {
                        gene: gene_name.clone(),
                        genome_type: type_name.to_string(),
                    })
                }
            };
            let allele = map.allele_id(gene, allele_name)? as usize;
            if weights.len() <= allele {
                weights.resize(allele + 1, 0.0);
            }
            weights[allele] = weight;
        }

        let sum: f32 = weights.iter().sum();
        if weights.len() <= default_id {
            weights.resize(default_id + 1, 0.0);
        }
        weights[default_id] = (1.0 - sum).max(0.0);
        let scale = if sum > 1.0 { 1.0 / sum } else { 1.0 };

        let mut cumulative = Vec::with_capacity(weights.len());
        let mut total = 0.0;
        for weight in &weights {
            total += scale * weight;
            cumulative.push(total);
        }
        out[gene] = Some(cumulative);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maps() -> (GeneMap, GeneMap, GeneMap, GeneGroupMap) {
        let autosomal = GeneMap::from_entries(
            vec!["extension".into(), "tyrosinase".into()],
            vec![
                vec!["wildtype".into(), "black".into(), "red".into()],
                vec!["wildtype".into(), "white".into()],
            ],
        );
        let groups = GeneGroupMap::from_groups(vec![("coi".into(), 8), ("vigor".into(), 4)]);
        (autosomal, GeneMap::new(), GeneMap::new(), groups)
    }

    fn build(json: &str) -> Result<AlleleFrequencies, ConfigError> {
        let (a, x, y, b) = maps();
        let cfg: crate::genotype::config::InitializerConfig = serde_json::from_str(json).unwrap();
        AlleleFrequencies::from_config(
            cfg.autosomal.as_ref(),
            cfg.xz_section(),
            cfg.yw.as_ref(),
            cfg.bitwise.as_ref(),
            &a,
            &x,
            &y,
            &b,
            "test",
        )
    }

    #[test]
    fn test_empty_has_no_tables() {
        let (a, x, y, b) = maps();
        let freq = AlleleFrequencies::empty(&a, &x, &y, &b);
        assert_eq!(freq.autosomal_table(0), None);
        assert_eq!(freq.bitwise_chance(0, 3), 0.0);
    }

    #[test]
    fn test_default_allele_absorbs_remainder() {
        let freq = build(r#"{ "autosomal": { "extension": { "black": 0.25 } } }"#).unwrap();
        let table = freq.autosomal_table(0).unwrap();
        // wildtype (implicit default) gets 0.75, cumulative [0.75, 1.0].
        assert!((table[0] - 0.75).abs() < 1e-6);
        assert!((table[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_named_default_allele() {
        let freq = build(r#"{ "autosomal": { "extension": { "default": "black" } } }"#).unwrap();
        let table = freq.autosomal_table(0).unwrap();
        // No explicit weights: black (id 1) absorbs the whole mass.
        assert_eq!(table[0], 0.0);
        assert!((table[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rescale_when_sum_exceeds_one() {
        let freq =
            build(r#"{ "autosomal": { "extension": { "black": 3.0, "red": 1.0 } } }"#).unwrap();
        let table = freq.autosomal_table(0).unwrap();
        // Weights rescale by 1/4; the default slot is forced to zero first.
        assert_eq!(table[0], 0.0);
        assert!((table[1] - 0.75).abs() < 1e-6);
        assert!((table[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_tables_are_ascending() {
        let freq = build(
            r#"{ "autosomal": { "extension": { "black": 0.2, "red": 0.3 } } }"#,
        )
        .unwrap();
        let table = freq.autosomal_table(0).unwrap();
        for pair in table.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert!((table[table.len() - 1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_unconfigured_gene_stays_none() {
        let freq = build(r#"{ "autosomal": { "extension": { "black": 0.5 } } }"#).unwrap();
        assert!(freq.autosomal_table(1).is_none());
    }

    #[test]
    fn test_bitwise_single_and_array() {
        let freq = build(r#"{ "bitwise": { "coi": 0.5, "vigor": [0.0, 1.0] } }"#).unwrap();
        assert_eq!(freq.bitwise_chance(0, 0), 0.5);
        assert_eq!(freq.bitwise_chance(0, 7), 0.5);
        assert_eq!(freq.bitwise_chance(1, 0), 0.0);
        // The final array entry is reused for the remaining loci.
        assert_eq!(freq.bitwise_chance(1, 1), 1.0);
        assert_eq!(freq.bitwise_chance(1, 3), 1.0);
    }

    #[test]
    fn test_bitwise_array_too_long_fails() {
        let err = build(r#"{ "bitwise": { "vigor": [0.1, 0.2, 0.3, 0.4, 0.5] } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::BitwiseValues { .. }));
    }

    #[test]
    fn test_unknown_gene_fails() {
        let err = build(r#"{ "autosomal": { "agouti": { "black": 0.5 } } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Lookup(_)));
    }

    #[test]
    fn test_unknown_group_fails() {
        let err = build(r#"{ "bitwise": { "luck": 0.5 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Lookup(_)));
    }

    #[test]
    fn test_string_weight_for_non_default_key_fails() {
        let err =
            build(r#"{ "autosomal": { "extension": { "black": "wildtype" } } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::AlleleWeight { .. }));
    }
}
