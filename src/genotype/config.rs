//! Serde types for the declarative genome type config grammar.
//!
//! A config asset describes the five gene catalogs, the sex-determination
//! mode, the interpreter list, and zero or more initializers. One malformed
//! asset must not block the rest of the catalog, so parsing reports a
//! [`ConfigError`] per asset and callers continue with the others.

use std::collections::BTreeMap;
use std::error;
use std::fmt;

use serde::Deserialize;

use crate::catalog::LookupError;
use crate::genotype::SpawnConditions;

/// Top-level config for one genome type asset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenomeTypeConfig {
    #[serde(default)]
    pub genes: GeneSectionsConfig,
    #[serde(default)]
    pub sexdetermination: Option<String>,
    #[serde(default)]
    pub interpreters: Vec<String>,
    #[serde(default)]
    pub initializers: BTreeMap<String, InitializerConfig>,
    /// Per-gene mutation rate multipliers, e.g. `{ "KIT": 10.0 }`.
    /// When absent, the historical KIT default applies.
    #[serde(default)]
    pub hypermutable: Option<BTreeMap<String, f64>>,
}

/// The `genes` section: ordered single-entry maps so that config order
/// defines gene and group ids.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneSectionsConfig {
    #[serde(default)]
    pub autosomal: Vec<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub xz: Vec<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub yw: Vec<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub anonymous: Vec<BTreeMap<String, usize>>,
    #[serde(default)]
    pub bitwise: Vec<BTreeMap<String, usize>>,
}

/// Config for one named initializer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitializerConfig {
    #[serde(default)]
    pub autosomal: Option<FrequencyMapConfig>,
    #[serde(default)]
    pub xz: Option<FrequencyMapConfig>,
    /// Older assets use `sexlinked` for the xz section; `xz` wins when both
    /// are present.
    #[serde(default)]
    pub sexlinked: Option<FrequencyMapConfig>,
    #[serde(default)]
    pub yw: Option<FrequencyMapConfig>,
    #[serde(default)]
    pub bitwise: Option<BTreeMap<String, BitwiseFrequencyConfig>>,
    #[serde(default)]
    pub conditions: Option<SpawnConditions>,
}

impl InitializerConfig {
    /// The effective xz frequency section.
    pub fn xz_section(&self) -> Option<&FrequencyMapConfig> {
        self.xz.as_ref().or(self.sexlinked.as_ref())
    }
}

/// `{geneName: {alleleName: weight, default: alleleName}}`.
pub type FrequencyMapConfig = BTreeMap<String, BTreeMap<String, FrequencyEntry>>;

/// A value in a per-gene frequency map: either an allele weight or, under
/// the `default` key, the name of the allele that absorbs the remainder.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FrequencyEntry {
    Weight(f32),
    AlleleName(String),
}

/// A bitwise group entry: one probability applied to every locus, or an
/// explicit per-locus array (a short array reuses its final entry).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BitwiseFrequencyConfig {
    Single(f32),
    PerLocus(Vec<f32>),
}

/// Error raised while loading a single genome type asset.
#[derive(Debug)]
pub enum ConfigError {
    /// The asset was not valid JSON for the config grammar.
    Json(serde_json::Error),
    /// A configured name did not resolve against a catalog or registry.
    Lookup(LookupError),
    /// A gene list entry did not hold exactly one `{name: value}` pair.
    GeneEntry {
        section: &'static str,
        genome_type: String,
    },
    /// A bitwise group's probability array was empty or longer than the
    /// group.
    BitwiseValues {
        group: String,
        genome_type: String,
    },
    /// A weight map held a string where a number was expected.
    AlleleWeight {
        gene: String,
        genome_type: String,
    },
    /// Unrecognized sex-determination mode.
    SexDetermination(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(e) => write!(f, "Malformed genome type config: {e}"),
            Self::Lookup(e) => write!(f, "{e}"),
            Self::GeneEntry {
                section,
                genome_type,
            } => write!(
                f,
                "Each entry of the '{section}' gene list must hold exactly one gene \
                 in genome type {genome_type}"
            ),
            Self::BitwiseValues { group, genome_type } => write!(
                f,
                "Incorrect number of values for initializing bitwise gene group \
                 {group} in genome type {genome_type}"
            ),
            Self::AlleleWeight { gene, genome_type } => write!(
                f,
                "Expected a numeric weight for an allele of gene {gene} in genome \
                 type {genome_type}"
            ),
            Self::SexDetermination(s) => {
                write!(f, "Unrecognized sex determination mode: '{s}'")
            }
        }
    }
}

impl error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Lookup(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}

impl From<LookupError> for ConfigError {
    fn from(e: LookupError) -> Self {
        Self::Lookup(e)
    }
}
